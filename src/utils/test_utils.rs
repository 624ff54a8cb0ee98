use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::core::booking::{Booking, BookingStatus, StayDate};
use crate::core::config::data::Config;
use crate::core::config::settings::Settings;
use crate::core::config::store::ConfigStore;
use crate::core::manager::BookingManager;
use crate::core::message::ChatMessage;
use crate::core::mode::ModeSelector;
use crate::core::transport::{BookingQuery, Transport};

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
}

impl CannedResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

pub struct TestServer {
    pub base_url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl TestServer {
    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().await.clone()
    }
}

/// Serve `responses` in order, one per connection, then stop accepting.
pub async fn spawn_http_server(responses: Vec<CannedResponse>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let captured = Arc::new(Mutex::new(Vec::new()));
    let captured_for_server = Arc::clone(&captured);

    tokio::spawn(async move {
        for canned in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(request) = read_http_request(&mut stream).await else {
                return;
            };
            captured_for_server.lock().await.push(request);

            let response = format!(
                "HTTP/1.1 {} Test\r\ncontent-type: application/json\r\nconnection: close\r\ncontent-length: {}\r\n\r\n{}",
                canned.status,
                canned.body.len(),
                canned.body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    TestServer {
        base_url: format!("http://{addr}"),
        captured,
    }
}

/// A base URL on which nothing is listening.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    drop(listener);
    format!("http://{addr}")
}

async fn read_http_request(stream: &mut TcpStream) -> Result<CapturedRequest, String> {
    let mut buffer = Vec::new();
    let mut header_end = None;
    while header_end.is_none() {
        let mut chunk = [0_u8; 1024];
        let read = stream.read(&mut chunk).await.map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        header_end = buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|index| index + 4);
    }

    let header_end = header_end.unwrap_or(buffer.len());
    let header_text =
        std::str::from_utf8(&buffer[..header_end]).map_err(|err| err.to_string())?;
    let mut lines = header_text.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines
        .next()
        .ok_or_else(|| "Missing HTTP request line".to_string())?
        .to_string();

    let mut headers = Vec::new();
    let mut content_length = 0_usize;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse::<usize>().map_err(|err| err.to_string())?;
        }
        headers.push((name.to_string(), value));
    }

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length - body.len()];
        let read = stream.read(&mut chunk).await.map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP body".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);

    Ok(CapturedRequest {
        request_line,
        headers,
        body,
    })
}

/// Scripted transport that records every call made through it.
#[derive(Default)]
pub struct ScriptedTransport {
    pub history: Vec<ChatMessage>,
    pub bookings: Vec<Booking>,
    pub calendar: Vec<String>,
    pub replies: std::sync::Mutex<VecDeque<String>>,
    pub sent: std::sync::Mutex<Vec<String>>,
    pub booking_queries: std::sync::Mutex<Vec<BookingQuery>>,
    pub send_calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: std::sync::Mutex::new(replies.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn send_count(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_chat_history(&self) -> Vec<ChatMessage> {
        self.history.clone()
    }

    async fn send_message(&self, text: &str) -> String {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(text.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "ok".to_string())
    }

    async fn fetch_bookings(&self, query: &BookingQuery) -> Vec<Booking> {
        self.booking_queries.lock().unwrap().push(query.clone());
        self.bookings.clone()
    }

    async fn fetch_calendar_dates(&self) -> Vec<String> {
        self.calendar.clone()
    }
}

pub fn create_test_booking(id: &str, guest: &str, check_in: &str, check_out: &str) -> Booking {
    Booking {
        id: id.to_string(),
        guest_name: guest.to_string(),
        contact_number: None,
        check_in: StayDate::new(check_in),
        check_out: StayDate::new(check_out),
        guest_count: 1,
        status: BookingStatus::Confirmed,
    }
}

/// A selector persisting into `config_path`, with no reply delay and a
/// registered phone number.
pub fn create_test_selector(config_path: &std::path::Path) -> ModeSelector {
    let config = Config {
        use_mock: Some(true),
        registered_number: Some("919834069861".to_string()),
        reply_delay_ms: Some(0),
        mock_delay_ms: Some(0),
        ..Default::default()
    };
    let settings = Settings::resolve(&config, |_| None);
    let store = ConfigStore::new(config_path);
    ModeSelector::new(store, settings)
}

pub fn create_test_manager(
    config_path: &std::path::Path,
    transport: Arc<dyn Transport>,
) -> BookingManager {
    let mut manager = BookingManager::with_transport(create_test_selector(config_path), transport);
    manager.set_reply_delay(Duration::ZERO);
    manager
}

/// A confirmation in the shape the assistant writes them.
pub const SAMPLE_CONFIRMATION: &str = "✅ Your booking is confirmed!\n\
Guest: **Rajesh Kumar** (Contact: +91 98340 69861)\n\
Booking ID: **10234**\n\
Check-in: 10 Oct 2025\n\
Check-out: 12 Oct 2025\n\
Guests: 2\n\
Thank you for choosing us!";
