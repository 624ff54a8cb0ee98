//! JSON payloads exchanged with the chat and booking backends.
//!
//! The backends are loose about envelope shapes: list endpoints answer with
//! either a bare array or an object wrapping one, and the chat endpoint puts
//! its answer under `reply` or `response`. The types here accept every shape
//! seen in practice and normalize it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::core::booking::Booking;
use crate::core::message::ChatMessage;

pub const NO_REPLY_TEXT: &str = "No reply received";

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<&'a str>,
    pub text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

impl SendMessageResponse {
    pub fn into_reply_text(self) -> String {
        self.reply
            .filter(|text| !text.is_empty())
            .or(self.response.filter(|text| !text.is_empty()))
            .unwrap_or_else(|| NO_REPLY_TEXT.to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HistoryPayload {
    List(Vec<ChatMessage>),
    Wrapped {
        #[serde(default)]
        messages: Vec<ChatMessage>,
    },
}

impl HistoryPayload {
    pub fn into_messages(self) -> Vec<ChatMessage> {
        match self {
            HistoryPayload::List(messages) | HistoryPayload::Wrapped { messages } => messages,
        }
    }
}

/// Bookings endpoint answer. Entries are kept as raw JSON so one malformed
/// record is dropped on its own instead of failing the whole list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BookingsPayload {
    List(Vec<Value>),
    Wrapped {
        #[serde(default)]
        bookings: Vec<Value>,
    },
}

impl BookingsPayload {
    pub fn into_bookings(self) -> Vec<Booking> {
        let entries = match self {
            BookingsPayload::List(entries) | BookingsPayload::Wrapped { bookings: entries } => {
                entries
            }
        };
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(booking) => Some(booking),
                Err(err) => {
                    warn!(index, error = %err, "skipping unreadable booking");
                    None
                }
            })
            .collect()
    }
}

/// Calendar endpoint answer: only a bare array of date strings is meaningful.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CalendarPayload {
    Dates(Vec<String>),
    Other(Value),
}

impl CalendarPayload {
    pub fn into_dates(self) -> Vec<String> {
        match self {
            CalendarPayload::Dates(dates) => dates,
            CalendarPayload::Other(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_prefers_reply_then_response() {
        let both: SendMessageResponse =
            serde_json::from_str(r#"{"reply": "a", "response": "b"}"#).unwrap();
        assert_eq!(both.into_reply_text(), "a");

        let response_only: SendMessageResponse =
            serde_json::from_str(r#"{"response": "b"}"#).unwrap();
        assert_eq!(response_only.into_reply_text(), "b");

        let neither: SendMessageResponse = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert_eq!(neither.into_reply_text(), NO_REPLY_TEXT);
    }

    #[test]
    fn request_omits_missing_sender() {
        let body = serde_json::to_value(SendMessageRequest {
            from: None,
            text: "hi",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"text": "hi"}));
    }

    #[test]
    fn history_accepts_bare_and_wrapped_arrays() {
        let entry = r#"{"id": "1", "from": "aastha", "text": "Hi", "time": "10:00"}"#;
        let bare: HistoryPayload = serde_json::from_str(&format!("[{entry}]")).unwrap();
        assert_eq!(bare.into_messages().len(), 1);

        let wrapped: HistoryPayload =
            serde_json::from_str(&format!(r#"{{"messages": [{entry}]}}"#)).unwrap();
        assert_eq!(wrapped.into_messages().len(), 1);

        let unrelated: HistoryPayload = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(unrelated.into_messages().is_empty());
    }

    #[test]
    fn bookings_accept_wrapped_arrays() {
        let json = r#"{"bookings": [{
            "id": "B1", "guest": "Rajesh Kumar", "phone": "98765",
            "checkIn": "2025-10-10", "checkOut": "2025-10-12", "status": "Confirmed"
        }]}"#;
        let payload: BookingsPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.into_bookings()[0].id, "B1");
    }

    #[test]
    fn one_unreadable_booking_does_not_drop_the_rest() {
        let json = r#"[
            {"id": "B1", "guest": "Asha", "checkIn": "2025-10-10", "checkOut": "2025-10-12",
             "status": "Confirmed"},
            {"id": "B2", "checkIn": "2025-10-11"},
            {"id": 7.0, "guest": "Ravi", "checkIn": "2025-10-14", "checkOut": "2025-10-15",
             "status": null, "guests": 2.0}
        ]"#;
        let payload: BookingsPayload = serde_json::from_str(json).unwrap();
        let bookings = payload.into_bookings();

        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].id, "B1");
        assert_eq!(bookings[1].id, "7");
        assert_eq!(bookings[1].guest_count, 2);
        assert_eq!(bookings[1].status.label(), "Unknown");
    }

    #[test]
    fn calendar_ignores_non_array_answers() {
        let dates: CalendarPayload = serde_json::from_str(r#"["2025-10-10"]"#).unwrap();
        assert_eq!(dates.into_dates(), vec!["2025-10-10".to_string()]);

        let other: CalendarPayload = serde_json::from_str(r#"{"dates": []}"#).unwrap();
        assert!(other.into_dates().is_empty());
    }
}
