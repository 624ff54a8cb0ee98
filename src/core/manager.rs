//! The chat/booking view-model shared by the terminal UI and the CLI.
//!
//! `BookingManager` owns everything the three tabs show. The UI mutates it
//! only from its event loop; network work happens in futures built by
//! [`BookingManager::reply_task`] whose results are fed back through
//! [`BookingManager::receive_reply`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::core::booking::Booking;
use crate::core::calendar::{month_grid, parse_marked_dates, MonthGrid};
use crate::core::config::io::ConfigError;
use crate::core::interpreter;
use crate::core::message::{ChatMessage, DeliveryStatus};
use crate::core::mode::{ApiMode, ModeSelector};
use crate::core::transport::{BookingQuery, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Chat,
    Bookings,
    Calendar,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Chat, Tab::Bookings, Tab::Calendar];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Chat => "Chat",
            Tab::Bookings => "Bookings",
            Tab::Calendar => "Calendar",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Chat => 0,
            Tab::Bookings => 1,
            Tab::Calendar => 2,
        }
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    EmptyMessage,
    EmptyPhone,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::EmptyMessage => write!(f, "Type a message first"),
            InputError::EmptyPhone => write!(f, "Enter your WhatsApp number to continue"),
        }
    }
}

impl std::error::Error for InputError {}

#[derive(Debug)]
pub enum ManagerError {
    Input(InputError),
    Config(ConfigError),
}

impl fmt::Display for ManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerError::Input(err) => write!(f, "{err}"),
            ManagerError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ManagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManagerError::Input(err) => Some(err),
            ManagerError::Config(err) => Some(err),
        }
    }
}

impl From<InputError> for ManagerError {
    fn from(err: InputError) -> Self {
        ManagerError::Input(err)
    }
}

impl From<ConfigError> for ManagerError {
    fn from(err: ConfigError) -> Self {
        ManagerError::Config(err)
    }
}

pub struct BookingManager {
    selector: ModeSelector,
    transport: Arc<dyn Transport>,
    messages: Vec<ChatMessage>,
    bookings: Vec<Booking>,
    calendar_dates: Vec<String>,
    tab: Tab,
    input: String,
    typing: bool,
    notice: Option<String>,
    reply_delay: Duration,
    loaded: bool,
}

impl BookingManager {
    /// A manager talking to whichever transport `selector` currently selects.
    pub fn new(selector: ModeSelector) -> Self {
        let transport = selector.transport();
        Self::with_transport(selector, transport)
    }

    pub fn with_transport(selector: ModeSelector, transport: Arc<dyn Transport>) -> Self {
        let reply_delay = selector.settings().reply_delay;
        Self {
            selector,
            transport,
            messages: Vec::new(),
            bookings: Vec::new(),
            calendar_dates: Vec::new(),
            tab: Tab::Chat,
            input: String::new(),
            typing: false,
            notice: None,
            reply_delay,
            loaded: false,
        }
    }

    pub fn set_reply_delay(&mut self, delay: Duration) {
        self.reply_delay = delay;
    }

    // Input buffer

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Turn the input buffer into an outgoing message.
    ///
    /// On success the host message is in the log, the buffer is empty, the
    /// typing indicator is on, and the returned text is what to send.
    /// Blank input changes nothing.
    pub fn submit_input(&mut self) -> Result<String, InputError> {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return Err(InputError::EmptyMessage);
        }

        self.messages.push(ChatMessage::outgoing(&text, Local::now()));
        self.input.clear();
        self.typing = true;
        Ok(text)
    }

    /// The send plus the reply delay, detached from `self` so the UI can
    /// run it on its own task.
    pub fn reply_task(&self, text: String) -> impl Future<Output = String> + Send + 'static {
        let transport = Arc::clone(&self.transport);
        let delay = self.reply_delay;
        async move {
            let reply = transport.send_message(&text).await;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            reply
        }
    }

    /// Submit the input buffer and wait for the assistant's answer.
    pub async fn send_message(&mut self) -> Result<(), InputError> {
        let text = self.submit_input()?;
        let reply = self.reply_task(text).await;
        self.receive_reply(reply);
        Ok(())
    }

    /// Record the assistant's answer and pick up any bookings it confirms.
    pub fn receive_reply(&mut self, reply: impl Into<String>) {
        let reply = reply.into();
        for message in self.messages.iter_mut().filter(|m| m.sender.is_host()) {
            if message.status == Some(DeliveryStatus::Sent) {
                message.status = Some(DeliveryStatus::Delivered);
            }
        }

        let confirmed = interpreter::interpret(&reply);
        self.messages.push(ChatMessage::reply(reply, Local::now()));
        self.typing = false;

        if !confirmed.is_empty() {
            info!(count = confirmed.len(), "bookings confirmed in chat");
            self.notice = Some(match confirmed.len() {
                1 => "1 booking confirmed".to_string(),
                n => format!("{n} bookings confirmed"),
            });
            self.bookings = confirmed;
            self.tab = Tab::Bookings;
        }
    }

    /// Fetch history, bookings and calendar dates. Only the first call does
    /// anything until the next [`reload`](Self::reload).
    pub async fn load_initial(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;

        let settings = self.selector.settings();
        let query = BookingQuery::window(
            Local::now().date_naive(),
            settings.booking_months_ahead,
            settings.registered_number.clone(),
        );
        debug!(transport = self.transport.name(), ?query, "loading initial state");

        let (history, bookings, calendar_dates) = tokio::join!(
            self.transport.fetch_chat_history(),
            self.transport.fetch_bookings(&query),
            self.transport.fetch_calendar_dates(),
        );
        self.messages = history;
        self.bookings = bookings;
        self.calendar_dates = calendar_dates;
    }

    /// Remember the host's phone number for bookings lookups and sends.
    pub fn register_phone(&mut self, number: &str) -> Result<(), ManagerError> {
        let number = number.trim();
        if number.is_empty() {
            return Err(InputError::EmptyPhone.into());
        }
        self.selector.set_registered_number(number)?;
        // Live sends carry the number, so the transport has to be rebuilt.
        self.transport = self.selector.transport();
        self.loaded = false;
        self.notice = Some(format!("Registered {number}"));
        Ok(())
    }

    pub fn needs_registration(&self) -> bool {
        self.registered_number().is_none()
    }

    pub fn registered_number(&self) -> Option<&str> {
        self.selector
            .settings()
            .registered_number
            .as_deref()
            .map(str::trim)
            .filter(|number| !number.is_empty())
    }

    /// Flip between mock and live, persist the choice, and start over.
    pub fn toggle_mode(&mut self) -> Result<ApiMode, ConfigError> {
        let mock = !self.selector.is_mock();
        self.selector.set_mode(mock)?;
        self.reload()?;
        Ok(self.mode())
    }

    /// Re-read the config and drop all loaded state, as after a restart.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.selector = self.selector.reload()?;
        self.transport = self.selector.transport();
        self.reply_delay = self.selector.settings().reply_delay;
        self.messages.clear();
        self.bookings.clear();
        self.calendar_dates.clear();
        self.typing = false;
        self.loaded = false;
        self.notice = Some(self.mode().badge().to_string());
        Ok(())
    }

    // Tabs

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn previous_tab(&mut self) {
        self.tab = self.tab.previous();
    }

    // Read access for views

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn calendar_dates(&self) -> &[String] {
        &self.calendar_dates
    }

    pub fn month_grid(&self, today: NaiveDate) -> MonthGrid<'_> {
        let marked = parse_marked_dates(&self.calendar_dates);
        month_grid(today, &self.bookings, &marked)
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn mode(&self) -> ApiMode {
        self.selector.mode()
    }

    pub fn selector(&self) -> &ModeSelector {
        &self.selector
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }
}
