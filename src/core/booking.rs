use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Shown wherever a booking carries no contact number.
pub const CONTACT_PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    CheckedIn,
    Other(String),
}

impl BookingStatus {
    pub fn label(&self) -> &str {
        match self {
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::CheckedIn => "Checked-in",
            BookingStatus::Other(label) => label,
        }
    }
}

impl From<String> for BookingStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "confirmed" => BookingStatus::Confirmed,
            "cancelled" | "canceled" => BookingStatus::Cancelled,
            "checked-in" | "checked in" | "checkedin" => BookingStatus::CheckedIn,
            _ => BookingStatus::Other(value),
        }
    }
}

impl From<BookingStatus> for String {
    fn from(value: BookingStatus) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A check-in or check-out date as the backend or the assistant wrote it.
///
/// The raw phrase is always kept for display; `date` is filled in when the
/// phrase matches one of the understood formats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StayDate {
    raw: String,
    date: Option<NaiveDate>,
}

impl StayDate {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let date = parse_date_phrase(&raw);
        Self { raw, date }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl From<String> for StayDate {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<StayDate> for String {
    fn from(value: StayDate) -> Self {
        value.raw
    }
}

impl fmt::Display for StayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "guest", alias = "guestName")]
    pub guest_name: String,
    #[serde(
        rename = "phone",
        alias = "contactNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_number: Option<String>,
    pub check_in: StayDate,
    pub check_out: StayDate,
    #[serde(
        rename = "guests",
        alias = "guestCount",
        default = "default_guest_count",
        deserialize_with = "guest_count"
    )]
    pub guest_count: u32,
    #[serde(default = "default_status", deserialize_with = "status_or_unknown")]
    pub status: BookingStatus,
}

impl Booking {
    pub fn contact_display(&self) -> &str {
        self.contact_number
            .as_deref()
            .filter(|number| !number.trim().is_empty())
            .unwrap_or(CONTACT_PLACEHOLDER)
    }

    /// Whether `day` falls inside the stay, both ends inclusive.
    pub fn covers(&self, day: NaiveDate) -> bool {
        match (self.check_in.date(), self.check_out.date()) {
            (Some(start), Some(end)) => start <= day && day <= end,
            _ => false,
        }
    }

    /// First letter of the guest name, used as the list avatar.
    pub fn initial(&self) -> char {
        self.guest_name
            .chars()
            .find(|c| c.is_alphanumeric())
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('?')
    }
}

fn default_guest_count() -> u32 {
    1
}

fn default_status() -> BookingStatus {
    BookingStatus::Other("Unknown".to_string())
}

fn status_or_unknown<'de, D>(deserializer: D) -> Result<BookingStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(BookingStatus::from)
        .unwrap_or_else(default_status))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(u64),
    Float(f64),
    Text(String),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Number(n) => n.to_string(),
        Loose::Float(n) if n.fract() == 0.0 && n >= 0.0 => format!("{n:.0}"),
        Loose::Float(n) => n.to_string(),
        Loose::Text(s) => s,
    })
}

fn guest_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Number(n)) => u32::try_from(n).ok(),
        // Saturating cast; NaN becomes 0 and then the default
        Some(Loose::Float(n)) => Some(n as u32),
        Some(Loose::Text(s)) => s.trim().parse::<u32>().ok(),
        None => None,
    };
    Ok(normalize_guest_count(parsed))
}

/// Guest counts are at least one; anything missing or zero counts as one.
pub fn normalize_guest_count(count: Option<u32>) -> u32 {
    count.filter(|n| *n >= 1).unwrap_or(1)
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%B %d %Y",
];

const WEEKDAYS: &[&str] = &["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Parse a free-form date phrase such as `2025-10-10`, `10th Oct 2025` or
/// `Friday, October 10, 2025`.
pub fn parse_date_phrase(phrase: &str) -> Option<NaiveDate> {
    let cleaned = phrase.replace(',', " ");
    let mut tokens: Vec<String> = cleaned
        .split_whitespace()
        .map(strip_ordinal_suffix)
        .collect();

    if tokens.len() > 1 {
        let first = tokens[0].to_ascii_lowercase();
        if first.len() >= 3 && WEEKDAYS.iter().any(|day| first.starts_with(day)) {
            tokens.remove(0);
        }
    }

    // Longest prefix first, so trailing words such as "after 2 PM" are ignored.
    (1..=tokens.len()).rev().find_map(|len| {
        let candidate = tokens[..len].join(" ");
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(&candidate, format).ok())
    })
}

fn strip_ordinal_suffix(token: &str) -> String {
    let lower = token.to_ascii_lowercase();
    for suffix in ["st", "nd", "rd", "th"] {
        if let Some(number) = lower.strip_suffix(suffix) {
            if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
                return number.to_string();
            }
        }
    }
    token.to_string()
}
