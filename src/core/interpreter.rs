//! Turns booking confirmations written by the assistant into [`Booking`]s.
//!
//! The assistant answers in free text, so this is a heuristic. A reply is
//! only considered when it mentions `booking id` (any case). Each mention
//! anchors one confirmation, read in this order:
//!
//! ```text
//! Guest: **Rajesh Kumar** (Contact: +91 98340 69861)   <- name, contact
//! Booking ID: **10234**                                <- trigger, id
//! Check-in: 10 Oct 2025                                <- check-in phrase
//! Check-out: 12 Oct 2025                               <- check-out phrase
//! Guests: 2                                            <- guest count
//! ```
//!
//! The name is the last bold span before the mention, the contact is the
//! first long digit run between the name and the mention, and the remaining
//! fields follow the mention. Contact and guest count are optional; a
//! confirmation missing any other field is skipped. Confirmations never
//! share text, and are returned left to right.

use std::fmt;

use tracing::{debug, warn};

use crate::core::booking::{
    normalize_guest_count, parse_date_phrase, Booking, BookingStatus, StayDate,
};

pub const TRIGGER: &str = "booking id";

const CHECK_IN_KEYWORDS: &[&str] = &["check-in", "check in", "checkin", "arrival"];
const CHECK_OUT_KEYWORDS: &[&str] = &["check-out", "check out", "checkout", "departure"];
const GUEST_KEYWORDS: &[&str] = &["guest"];

const MIN_CONTACT_DIGITS: usize = 5;
const MAX_CONTACT_DIGITS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    BookingId,
    CheckIn,
    CheckOut,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Name => "guest name",
            Field::BookingId => "booking id",
            Field::CheckIn => "check-in date",
            Field::CheckOut => "check-out date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
    /// The reply mentions a booking id but no mention yielded a full record.
    Incomplete { mentions: usize, missing: Field },
}

impl fmt::Display for InterpretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpretError::Incomplete { mentions, missing } => write!(
                f,
                "{mentions} booking id mention(s) but no complete confirmation (missing {})",
                missing.label()
            ),
        }
    }
}

impl std::error::Error for InterpretError {}

/// Whether a reply is worth interpreting at all.
pub fn mentions_booking(reply: &str) -> bool {
    reply.to_ascii_lowercase().contains(TRIGGER)
}

/// Every booking confirmation in `reply`, or an empty list.
///
/// Never fails: replies that look like confirmations but cannot be read are
/// logged and treated as containing none.
pub fn interpret(reply: &str) -> Vec<Booking> {
    if !mentions_booking(reply) {
        return Vec::new();
    }

    match extract_bookings(reply) {
        Ok(bookings) => {
            debug!(count = bookings.len(), "interpreted booking confirmations");
            bookings
        }
        Err(err) => {
            warn!(error = %err, "could not interpret booking reply");
            Vec::new()
        }
    }
}

/// Like [`interpret`], but reports why a reply mentioning a booking id
/// produced nothing.
pub fn extract_bookings(reply: &str) -> Result<Vec<Booking>, InterpretError> {
    let scanner = Scanner::new(reply);
    let mentions = scanner.find_all(TRIGGER);
    if mentions.is_empty() {
        return Ok(Vec::new());
    }

    let mut bookings = Vec::new();
    let mut first_missing = None;
    let mut lower_bound = 0;

    for (index, &mention) in mentions.iter().enumerate() {
        let next_mention = mentions.get(index + 1).copied();
        let block = Block {
            lower_bound,
            mention,
            upper_bound: next_mention.unwrap_or(reply.len()),
            has_successor: next_mention.is_some(),
        };

        match read_block(&scanner, &block) {
            Ok((booking, consumed)) => {
                bookings.push(booking);
                lower_bound = consumed;
            }
            Err(missing) => {
                debug!(offset = mention, missing = missing.label(), "skipping mention");
                first_missing.get_or_insert(missing);
                lower_bound = mention + TRIGGER.len();
            }
        }
    }

    match (bookings.is_empty(), first_missing) {
        (true, Some(missing)) => Err(InterpretError::Incomplete {
            mentions: mentions.len(),
            missing,
        }),
        _ => Ok(bookings),
    }
}

/// Byte offsets bounding one confirmation.
struct Block {
    /// End of the text consumed by the previous confirmation.
    lower_bound: usize,
    /// Start of this confirmation's `booking id` mention.
    mention: usize,
    /// Start of the next mention, or the end of the reply.
    upper_bound: usize,
    has_successor: bool,
}

fn read_block(scanner: &Scanner<'_>, block: &Block) -> Result<(Booking, usize), Field> {
    let (guest_name, name_end) =
        name_field(scanner, block.lower_bound, block.mention).ok_or(Field::Name)?;
    let contact_number = contact_field(scanner, name_end, block.mention);

    let mention_end = block.mention + TRIGGER.len();
    let (id, id_end) =
        booking_id_field(scanner, mention_end, block.upper_bound).ok_or(Field::BookingId)?;

    let check_in_stops: Vec<&str> = [CHECK_OUT_KEYWORDS, GUEST_KEYWORDS].concat();
    let (check_in, check_in_end) = date_field(
        scanner,
        id_end,
        block.upper_bound,
        CHECK_IN_KEYWORDS,
        &check_in_stops,
    )
    .ok_or(Field::CheckIn)?;

    let check_out_stops: Vec<&str> = [CHECK_IN_KEYWORDS, GUEST_KEYWORDS].concat();
    let (check_out, check_out_end) = date_field(
        scanner,
        check_in_end,
        block.upper_bound,
        CHECK_OUT_KEYWORDS,
        &check_out_stops,
    )
    .ok_or(Field::CheckOut)?;

    // Leave the next confirmation's bold name alone.
    let guest_limit = if block.has_successor {
        scanner
            .bold_spans(check_out_end, block.upper_bound)
            .last()
            .map(|span| span.start)
            .unwrap_or(block.upper_bound)
    } else {
        block.upper_bound
    };
    let (guest_count, guest_end) = guest_field(scanner, check_out_end, guest_limit);

    let booking = Booking {
        id,
        guest_name,
        contact_number,
        check_in: StayDate::new(check_in),
        check_out: StayDate::new(check_out),
        guest_count,
        status: BookingStatus::Confirmed,
    };
    Ok((booking, check_out_end.max(guest_end)))
}

/// Cursor-free view over a reply with an ASCII-lowercased twin for
/// case-insensitive keyword search. Both share byte offsets.
struct Scanner<'a> {
    text: &'a str,
    lower: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoldSpan {
    start: usize,
    end: usize,
}

impl BoldSpan {
    fn inner<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start + 2..self.end - 2]
    }
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            lower: text.to_ascii_lowercase(),
        }
    }

    fn find_all(&self, needle: &str) -> Vec<usize> {
        self.lower.match_indices(needle).map(|(at, _)| at).collect()
    }

    /// Earliest occurrence of any of `needles` in `from..to`, as `(start, end)`.
    fn find_any(&self, needles: &[&str], from: usize, to: usize) -> Option<(usize, usize)> {
        let haystack = self.lower.get(from..to)?;
        needles
            .iter()
            .filter_map(|needle| {
                haystack
                    .find(needle)
                    .map(|at| (from + at, from + at + needle.len()))
            })
            .min()
    }

    /// `**bold**` spans lying entirely within `from..to`, never crossing a line.
    fn bold_spans(&self, from: usize, to: usize) -> Vec<BoldSpan> {
        let mut spans = Vec::new();
        let Some(region) = self.text.get(from..to) else {
            return spans;
        };

        let mut cursor = 0;
        while let Some(open) = region[cursor..].find("**").map(|at| cursor + at) {
            let body_start = open + 2;
            let opens = region[body_start..]
                .chars()
                .next()
                .is_some_and(|c| !c.is_whitespace() && c != '*');
            if !opens {
                cursor = body_start;
                continue;
            }

            let line_end = region[body_start..]
                .find('\n')
                .map(|at| body_start + at)
                .unwrap_or(region.len());
            let close = region[body_start..line_end]
                .match_indices("**")
                .map(|(at, _)| body_start + at)
                .find(|&at| {
                    region[..at]
                        .chars()
                        .next_back()
                        .is_some_and(|c| !c.is_whitespace())
                });

            match close {
                Some(close) => {
                    spans.push(BoldSpan {
                        start: from + open,
                        end: from + close + 2,
                    });
                    cursor = close + 2;
                }
                None => cursor = body_start,
            }
        }
        spans
    }

    /// Advance past any of `chars` starting at `at`.
    fn skip_chars(&self, mut at: usize, to: usize, chars: &[char]) -> usize {
        while at < to {
            match self.text[at..].chars().next() {
                Some(c) if chars.contains(&c) => at += c.len_utf8(),
                _ => break,
            }
        }
        at
    }

    fn take_digits(&self, from: usize, to: usize) -> Option<(&'a str, usize)> {
        let region = self.text.get(from..to)?;
        let len = region
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(region.len());
        (len > 0).then(|| (&region[..len], from + len))
    }

    fn starts_with_word(&self, at: usize, word: &str) -> bool {
        self.lower
            .get(at..)
            .is_some_and(|rest| rest.starts_with(word))
    }
}

const FIELD_SEPARATORS: &[char] = &[' ', '\t', ':', '#', '-', '.', '=', '*'];

/// Last bold span in `from..to` that reads like a name.
fn name_field(scanner: &Scanner<'_>, from: usize, to: usize) -> Option<(String, usize)> {
    scanner
        .bold_spans(from, to)
        .into_iter()
        .rev()
        .find_map(|span| {
            let name = span
                .inner(scanner.text)
                .trim()
                .trim_end_matches([':', ','])
                .trim();
            let readable = name.chars().any(char::is_alphabetic)
                && !name.to_ascii_lowercase().contains(TRIGGER);
            readable.then(|| (name.to_string(), span.end))
        })
}

/// First phone-like digit run in `from..to`: a leading `+` or digit, then
/// digits, spaces and dashes, with enough digits to be a number.
fn contact_field(scanner: &Scanner<'_>, from: usize, to: usize) -> Option<String> {
    let region = scanner.text.get(from..to)?;
    let mut search = 0;

    while let Some(start) = region[search..]
        .find(|c: char| c.is_ascii_digit() || c == '+')
        .map(|at| search + at)
    {
        let run_len = region[start + 1..]
            .find(|c: char| !(c.is_ascii_digit() || c == ' ' || c == '-'))
            .map(|at| at + 1)
            .unwrap_or(region.len() - start);
        let run = region[start..start + run_len].trim_end_matches([' ', '-']);
        let digits = run.chars().filter(char::is_ascii_digit).count();

        if (MIN_CONTACT_DIGITS..=MAX_CONTACT_DIGITS).contains(&digits) {
            return Some(run.to_string());
        }
        search = start + run_len.max(1);
    }
    None
}

/// Digits following the mention, bold or not.
fn booking_id_field(scanner: &Scanner<'_>, from: usize, to: usize) -> Option<(String, usize)> {
    let start = scanner.skip_chars(from, to, FIELD_SEPARATORS);
    let (digits, end) = scanner.take_digits(start, to)?;
    let end = scanner.skip_chars(end, to, &['*']);
    Some((digits.to_string(), end))
}

/// The phrase after the first of `keywords` in `from..to`.
///
/// The phrase runs to the end of the line, a `|`, `;`, `*` or `(`, or the
/// start of any `stops` keyword, whichever comes first.
fn date_field(
    scanner: &Scanner<'_>,
    from: usize,
    to: usize,
    keywords: &[&str],
    stops: &[&str],
) -> Option<(String, usize)> {
    let (_, keyword_end) = scanner.find_any(keywords, from, to)?;
    let mut start = scanner.skip_chars(keyword_end, to, FIELD_SEPARATORS);
    if scanner.starts_with_word(start, "date") {
        start = scanner.skip_chars(start + "date".len(), to, FIELD_SEPARATORS);
    }

    let region = scanner.text.get(start..to)?;
    let mut end = region
        .find(['\n', '|', ';', '*', '('])
        .map(|at| start + at)
        .unwrap_or(to);
    let mut cut_at_guests = false;
    if let Some((stop, _)) = scanner.find_any(stops, start, end) {
        end = stop;
        cut_at_guests = GUEST_KEYWORDS
            .iter()
            .any(|keyword| scanner.starts_with_word(stop, keyword));
    }

    let mut phrase = trim_phrase(&scanner.text[start..end]);
    if cut_at_guests {
        phrase = strip_trailing_count(phrase);
    }
    (!phrase.is_empty()).then(|| (phrase.to_string(), start + phrase.len()))
}

const PHRASE_TRAILERS: [char; 7] = [' ', '\t', ',', '.', ':', '-', '&'];

fn trim_phrase(phrase: &str) -> &str {
    let mut phrase = phrase.trim_end_matches(PHRASE_TRAILERS);
    for connector in [" and", " to", " for"] {
        if phrase.to_ascii_lowercase().ends_with(connector) {
            phrase = phrase[..phrase.len() - connector.len()].trim_end_matches(PHRASE_TRAILERS);
        }
    }
    phrase
}

/// `12 Oct 2025, 3` cut short by `guests` loses the `3`, as long as what
/// remains is still a date.
fn strip_trailing_count(phrase: &str) -> &str {
    let Some((rest, last)) = phrase.rsplit_once([' ', ',']) else {
        return phrase;
    };
    let is_count = (1..=3).contains(&last.len()) && last.chars().all(|c| c.is_ascii_digit());
    if is_count && parse_date_phrase(rest).is_some() {
        trim_phrase(rest)
    } else {
        phrase
    }
}

/// Guest count near a `guest` keyword in `from..to`: `Guests: 2` or
/// `2 guests`. Defaults to 1 when absent, unreadable, or zero.
fn guest_field(scanner: &Scanner<'_>, from: usize, to: usize) -> (u32, usize) {
    let Some((keyword_start, keyword_end)) = scanner.find_any(GUEST_KEYWORDS, from, to) else {
        return (1, from);
    };

    let after_word = scanner
        .text
        .get(keyword_end..to)
        .and_then(|rest| rest.find(|c: char| !c.is_alphabetic()))
        .map(|at| keyword_end + at)
        .unwrap_or(to);
    let mut value_start = scanner.skip_chars(after_word, to, FIELD_SEPARATORS);
    for filler in ["count", "number"] {
        if scanner.starts_with_word(value_start, filler) {
            value_start = scanner.skip_chars(value_start + filler.len(), to, FIELD_SEPARATORS);
        }
    }

    if let Some((digits, end)) = scanner.take_digits(value_start, to) {
        return (normalize_guest_count(digits.parse().ok()), end);
    }

    let before = scanner.text[from..keyword_start].trim_end_matches([' ', '*']);
    let leading_digits = before
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .count();
    let count = before[before.len() - leading_digits..].parse().ok();
    (normalize_guest_count(count), after_word)
}
