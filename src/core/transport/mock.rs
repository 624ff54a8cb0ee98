use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{BookingQuery, Transport};
use crate::core::booking::{Booking, BookingStatus, StayDate};
use crate::core::message::{ChatMessage, Sender};

/// Canned backend for demos and development; answers after `delay`.
#[derive(Debug, Clone)]
pub struct MockTransport {
    delay: Duration,
}

impl MockTransport {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

pub fn mock_reply(text: &str) -> String {
    format!("Acknowledged: \"{text}\" (mock reply)")
}

fn canned_history() -> Vec<ChatMessage> {
    vec![ChatMessage {
        id: "1".to_string(),
        sender: Sender::Assistant,
        text: "Hi! I'm Aastha, your AI booking manager.".to_string(),
        time: "10:00".to_string(),
        status: None,
    }]
}

fn canned_bookings() -> Vec<Booking> {
    vec![Booking {
        id: "B1".to_string(),
        guest_name: "Rajesh Kumar".to_string(),
        contact_number: Some("98765".to_string()),
        check_in: StayDate::new("2025-10-10"),
        check_out: StayDate::new("2025-10-12"),
        guest_count: 1,
        status: BookingStatus::Confirmed,
    }]
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_chat_history(&self) -> Vec<ChatMessage> {
        self.simulate_latency().await;
        canned_history()
    }

    async fn send_message(&self, text: &str) -> String {
        debug!(len = text.len(), "mock transport received message");
        self.simulate_latency().await;
        mock_reply(text)
    }

    async fn fetch_bookings(&self, query: &BookingQuery) -> Vec<Booking> {
        debug!(?query, "mock transport ignores the booking window");
        self.simulate_latency().await;
        canned_bookings()
    }

    async fn fetch_calendar_dates(&self) -> Vec<String> {
        vec!["2025-10-10".to_string(), "2025-10-11".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn replies_echo_the_message() {
        let transport = MockTransport::new(Duration::ZERO);
        let reply = transport.send_message("Any rooms free?").await;
        assert_eq!(reply, "Acknowledged: \"Any rooms free?\" (mock reply)");
    }

    #[tokio::test]
    async fn serves_canned_data() {
        let transport = MockTransport::new(Duration::ZERO);
        let today = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();

        assert_eq!(transport.fetch_chat_history().await.len(), 1);
        let bookings = transport
            .fetch_bookings(&BookingQuery::window(today, 1, None))
            .await;
        assert_eq!(bookings[0].guest_name, "Rajesh Kumar");
        assert_eq!(bookings[0].status, BookingStatus::Confirmed);
        assert_eq!(transport.fetch_calendar_dates().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_the_simulated_delay() {
        let transport = MockTransport::new(Duration::from_millis(300));
        let started = tokio::time::Instant::now();
        transport.fetch_chat_history().await;
        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}
