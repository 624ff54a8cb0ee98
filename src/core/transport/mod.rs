//! The four backend operations and their two interchangeable implementations.
//!
//! Implementations never surface failures to the caller: a list operation
//! that fails answers with an empty list and a failed send answers with
//! [`ERROR_REPLY`]. The failure itself goes to the diagnostics log.

pub mod http;
pub mod mock;

use std::fmt;

use async_trait::async_trait;
use chrono::{Datelike, Months, NaiveDate};

use crate::core::booking::Booking;
use crate::core::message::ChatMessage;

/// Reply shown in the chat when the backend could not be reached.
pub const ERROR_REPLY: &str = "⚠️ Error connecting to backend.";

#[async_trait]
pub trait Transport: Send + Sync {
    /// Short identifier used in logs and the status line.
    fn name(&self) -> &'static str;

    async fn fetch_chat_history(&self) -> Vec<ChatMessage>;

    /// Send the host's message and return the assistant's reply text.
    async fn send_message(&self, text: &str) -> String;

    async fn fetch_bookings(&self, query: &BookingQuery) -> Vec<Booking>;

    /// Dates the backend wants highlighted on the calendar, as it wrote them.
    async fn fetch_calendar_dates(&self) -> Vec<String>;
}

/// Date range and owner of a bookings fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub phone: Option<String>,
}

impl BookingQuery {
    /// From the first day of `today`'s month to the last day of the month
    /// `months_ahead` months later.
    pub fn window(today: NaiveDate, months_ahead: u32, phone: Option<String>) -> Self {
        let start_date = today.with_day(1).unwrap_or(today);
        let end_date = start_date
            .checked_add_months(Months::new(months_ahead.saturating_add(1)))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self {
            start_date,
            end_date,
            phone,
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("startDate", self.start_date.format("%Y-%m-%d").to_string()),
            ("endDate", self.end_date.format("%Y-%m-%d").to_string()),
        ];
        if let Some(phone) = &self.phone {
            pairs.push(("phone", phone.clone()));
        }
        pairs
    }
}

/// Why a backend call failed. Only ever logged; see the module docs.
#[derive(Debug)]
pub enum TransportError {
    /// The request never produced a response (DNS, refused, timeout).
    Request(reqwest::Error),
    /// The backend answered with a non-success status.
    Status { status: u16, body: String },
    /// The response body was not the JSON we expected.
    Decode(serde_json::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request(err) => write!(f, "request failed: {err}"),
            TransportError::Status { status, body } => {
                write!(f, "backend returned HTTP {status}: {body}")
            }
            TransportError::Decode(err) => write!(f, "unexpected response body: {err}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Request(err) => Some(err),
            TransportError::Status { .. } => None,
            TransportError::Decode(err) => Some(err),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Request(err)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Decode(err)
    }
}
