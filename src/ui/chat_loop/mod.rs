//! Main booking manager event loop
//!
//! The loop owns the [`BookingManager`]. Key presses mutate it directly;
//! sends run on spawned tasks whose replies come back over a channel and
//! are applied here, so nothing else ever touches the view-model.

mod keybindings;
mod lifecycle;

use std::error::Error;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use self::keybindings::{action_for, KeyAction};
use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::core::manager::{BookingManager, Tab};
use crate::ui::renderer::{ui, ViewState};
use crate::utils::logging::Transcript;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
enum UiEvent {
    /// An assistant reply, tagged with the session it was sent from.
    Reply { session: u64, text: String },
}

struct ChatSession {
    manager: BookingManager,
    transcript: Transcript,
    view: ViewState,
    /// Bumped whenever the manager is reloaded; replies from older sessions
    /// are dropped.
    session: u64,
    tx: mpsc::UnboundedSender<UiEvent>,
}

pub async fn run_chat(manager: BookingManager, transcript: Transcript) -> Result<(), Box<dyn Error>> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, manager, transcript).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    manager: BookingManager,
    transcript: Transcript,
) -> Result<(), Box<dyn Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<UiEvent>();
    let mut session = ChatSession {
        manager,
        transcript,
        view: ViewState::default(),
        session: 0,
        tx,
    };

    terminal.draw(|f| ui(f, &session.manager, &session.view, &session.transcript))?;
    session.load_if_registered().await;

    loop {
        terminal.draw(|f| ui(f, &session.manager, &session.view, &session.transcript))?;

        while let Ok(event) = rx.try_recv() {
            session.apply(event);
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(action) = action_for(&key) else {
            continue;
        };
        if action == KeyAction::Quit {
            return Ok(());
        }
        session.handle(action).await;
    }
}

impl ChatSession {
    async fn load_if_registered(&mut self) {
        if !self.manager.needs_registration() {
            self.manager.load_initial().await;
        }
    }

    fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Reply { session, text } if session == self.session => {
                self.manager.receive_reply(text);
                self.view.chat_scroll = 0;
                self.record_last_message();
            }
            UiEvent::Reply { session, .. } => {
                debug!(session, current = self.session, "dropping reply from earlier session");
            }
        }
    }

    async fn handle(&mut self, action: KeyAction) {
        match action {
            KeyAction::Quit => {}
            KeyAction::NextTab => {
                self.manager.next_tab();
                self.view.list_scroll = 0;
            }
            KeyAction::PreviousTab => {
                self.manager.previous_tab();
                self.view.list_scroll = 0;
            }
            KeyAction::ToggleMode => match self.manager.toggle_mode() {
                Ok(_) => {
                    self.session += 1;
                    self.view = ViewState::default();
                    self.load_if_registered().await;
                }
                Err(err) => self.manager.set_notice(format!("Could not save mode: {err}")),
            },
            KeyAction::ClearNotice => self.manager.clear_notice(),
            KeyAction::Submit => self.submit().await,
            KeyAction::InsertChar(c) => self.manager.push_input(c),
            KeyAction::DeleteChar => self.manager.pop_input(),
            KeyAction::ClearInput => self.manager.clear_input(),
            KeyAction::ScrollUp(lines) => self.view.scroll_up(self.manager.tab(), lines),
            KeyAction::ScrollDown(lines) => self.view.scroll_down(self.manager.tab(), lines),
            KeyAction::ScrollToEnd => self.view = ViewState::default(),
        }
    }

    async fn submit(&mut self) {
        if self.manager.needs_registration() {
            let number = self.manager.input().to_string();
            match self.manager.register_phone(&number) {
                Ok(()) => {
                    self.manager.clear_input();
                    self.manager.load_initial().await;
                }
                Err(err) => self.manager.set_notice(err.to_string()),
            }
            return;
        }

        if self.manager.tab() != Tab::Chat {
            self.manager.select_tab(Tab::Chat);
        }

        match self.manager.submit_input() {
            Ok(text) => {
                self.view.chat_scroll = 0;
                self.record_last_message();
                let reply = self.manager.reply_task(text);
                let tx = self.tx.clone();
                let session = self.session;
                tokio::spawn(async move {
                    let text = reply.await;
                    let _ = tx.send(UiEvent::Reply { session, text });
                });
            }
            Err(err) => self.manager.set_notice(err.to_string()),
        }
    }

    fn record_last_message(&mut self) {
        let Some(message) = self.manager.messages().last() else {
            return;
        };
        if let Err(err) = self.transcript.log_message(message) {
            warn!(error = %err, "transcript write failed");
            self.manager.set_notice(format!("Transcript write failed: {err}"));
        }
    }
}
