use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{BookingQuery, Transport, TransportError, ERROR_REPLY};
use crate::api::{
    BookingsPayload, CalendarPayload, HistoryPayload, SendMessageRequest, SendMessageResponse,
};
use crate::core::booking::Booking;
use crate::core::config::settings::Settings;
use crate::core::message::ChatMessage;

const SEND_ENDPOINT: &str = "test";
const HISTORY_ENDPOINT: &str = "chat-history";
const BOOKINGS_ENDPOINT: &str = "bookings";
const CALENDAR_ENDPOINT: &str = "calendar";

/// Talks to the real chat and booking backends over JSON/HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    chat_base_url: String,
    bookings_base_url: String,
    api_token: Option<String>,
    from_number: Option<String>,
}

impl HttpTransport {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            chat_base_url: settings.chat_base_url.clone(),
            bookings_base_url: settings.bookings_base_url.clone(),
            api_token: settings.api_token.clone(),
            from_number: settings.registered_number.clone(),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    async fn try_send_message(&self, text: &str) -> Result<String, TransportError> {
        let url = endpoint_url(&self.chat_base_url, SEND_ENDPOINT);
        let body = SendMessageRequest {
            from: self.from_number.as_deref(),
            text,
        };
        let request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&body);

        let response = self.authorize(request).send().await?;
        let payload: SendMessageResponse = read_json(response).await?;
        Ok(payload.into_reply_text())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        base_url: &str,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let url = endpoint_url(base_url, endpoint);
        debug!(%url, "GET");
        let request = self.client.get(url).query(query);
        let response = self.authorize(request).send().await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            body: text,
        });
    }
    Ok(serde_json::from_str(&text)?)
}

/// Join a base URL and an endpoint path without doubling slashes.
fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_chat_history(&self) -> Vec<ChatMessage> {
        match self
            .get_json::<HistoryPayload>(&self.chat_base_url, HISTORY_ENDPOINT, &[])
            .await
        {
            Ok(payload) => payload.into_messages(),
            Err(err) => {
                warn!(error = %err, "failed to fetch chat history");
                Vec::new()
            }
        }
    }

    async fn send_message(&self, text: &str) -> String {
        match self.try_send_message(text).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "failed to send chat message");
                ERROR_REPLY.to_string()
            }
        }
    }

    async fn fetch_bookings(&self, query: &BookingQuery) -> Vec<Booking> {
        match self
            .get_json::<BookingsPayload>(
                &self.bookings_base_url,
                BOOKINGS_ENDPOINT,
                &query.query_pairs(),
            )
            .await
        {
            Ok(payload) => payload.into_bookings(),
            Err(err) => {
                warn!(error = %err, "failed to fetch bookings");
                Vec::new()
            }
        }
    }

    async fn fetch_calendar_dates(&self) -> Vec<String> {
        match self
            .get_json::<CalendarPayload>(&self.bookings_base_url, CALENDAR_ENDPOINT, &[])
            .await
        {
            Ok(payload) => payload.into_dates(),
            Err(err) => {
                warn!(error = %err, "failed to fetch calendar dates");
                Vec::new()
            }
        }
    }
}
