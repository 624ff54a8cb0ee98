use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sender {
    Host,
    Assistant,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::Host => "host",
            Sender::Assistant => "aastha",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Sender::Host => "You",
            Sender::Assistant => "Aastha",
        }
    }

    pub fn is_host(self) -> bool {
        self == Sender::Host
    }
}

impl TryFrom<&str> for Sender {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "host" | "user" => Ok(Sender::Host),
            "aastha" | "assistant" | "bot" => Ok(Sender::Assistant),
            other => Err(format!("invalid message sender: {other}")),
        }
    }
}

impl TryFrom<String> for Sender {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Sender> for String {
    fn from(value: Sender) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Seen,
}

impl DeliveryStatus {
    /// Tick marks shown next to outgoing messages.
    pub fn ticks(self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "✓",
            DeliveryStatus::Delivered => "✓✓",
            DeliveryStatus::Seen => "✓✓ seen",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    #[serde(rename = "from")]
    pub sender: Sender,
    pub text: String,
    #[serde(default)]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeliveryStatus>,
}

impl ChatMessage {
    /// An outgoing host message stamped at `now`, marked as sent.
    pub fn outgoing(text: impl Into<String>, now: DateTime<Local>) -> Self {
        Self {
            id: message_id(now, 0),
            sender: Sender::Host,
            text: text.into(),
            time: display_time(now),
            status: Some(DeliveryStatus::Sent),
        }
    }

    /// An assistant reply stamped at `now`.
    pub fn reply(text: impl Into<String>, now: DateTime<Local>) -> Self {
        Self {
            id: message_id(now, 1),
            sender: Sender::Assistant,
            text: text.into(),
            time: display_time(now),
            status: None,
        }
    }
}

/// `HH:MM` in local time, the way messages are stamped in the chat tab.
pub fn display_time(now: DateTime<Local>) -> String {
    now.format("%H:%M").to_string()
}

fn message_id(now: DateTime<Local>, offset: i64) -> String {
    (now.timestamp_millis() + offset).to_string()
}
