use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::booking::{Booking, BookingStatus};
use crate::core::calendar::WEEKDAY_HEADERS;
use crate::core::manager::{BookingManager, Tab};
use crate::core::message::Sender;
use crate::ui::layout::{center, fit};
use crate::utils::logging::Transcript;

/// Scroll positions, owned by the event loop rather than the view-model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Lines scrolled up from the newest chat message.
    pub chat_scroll: u16,
    /// Lines scrolled down from the top of the bookings or calendar tab.
    pub list_scroll: u16,
}

impl ViewState {
    pub fn scroll_up(&mut self, tab: Tab, lines: u16) {
        match tab {
            Tab::Chat => self.chat_scroll = self.chat_scroll.saturating_add(lines),
            Tab::Bookings | Tab::Calendar => {
                self.list_scroll = self.list_scroll.saturating_sub(lines)
            }
        }
    }

    pub fn scroll_down(&mut self, tab: Tab, lines: u16) {
        match tab {
            Tab::Chat => self.chat_scroll = self.chat_scroll.saturating_sub(lines),
            Tab::Bookings | Tab::Calendar => {
                self.list_scroll = self.list_scroll.saturating_add(lines)
            }
        }
    }
}

pub fn ui(f: &mut Frame, manager: &BookingManager, view: &ViewState, transcript: &Transcript) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_tabs(f, manager, chunks[0]);

    if manager.needs_registration() {
        render_registration(f, chunks[1]);
        render_input(f, manager, chunks[2], "WhatsApp number (Enter to register, Ctrl+C to quit)");
    } else {
        match manager.tab() {
            Tab::Chat => render_chat(f, manager, view, chunks[1]),
            Tab::Bookings => render_bookings(f, manager, view, chunks[1]),
            Tab::Calendar => render_calendar(f, manager, view, chunks[1]),
        }
        render_input(
            f,
            manager,
            chunks[2],
            "Type your message (Enter to send, Tab to switch tabs, Ctrl+T mode, Ctrl+C to quit)",
        );
    }

    render_status(f, manager, transcript, chunks[3]);
}

fn render_tabs(f: &mut Frame, manager: &BookingManager, area: Rect) {
    let title = format!("Aastha v{} • {}", env!("CARGO_PKG_VERSION"), manager.mode().badge());
    let tabs = Tabs::new(Tab::ALL.iter().map(|tab| tab.title()))
        .select(manager.tab().index())
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn render_registration(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to Aastha",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Enter the WhatsApp number you book with."),
        Line::from("Your bookings are looked up by this number."),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_chat(f: &mut Frame, manager: &BookingManager, view: &ViewState, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for message in manager.messages() {
        let name_style = match message.sender {
            Sender::Host => Style::default().fg(Color::Cyan),
            Sender::Assistant => Style::default().fg(Color::Green),
        }
        .add_modifier(Modifier::BOLD);

        let mut header = vec![
            Span::styled(message.sender.display_name(), name_style),
            Span::styled(
                format!("  {}", message.time),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if let Some(status) = message.status {
            header.push(Span::styled(
                format!(" {}", status.ticks()),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(header));
        for text_line in message.text.lines() {
            lines.push(Line::from(text_line.to_string()));
        }
        lines.push(Line::from(""));
    }

    if manager.is_typing() {
        lines.push(Line::from(Span::styled(
            "Aastha is typing…",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Say hello to start a booking.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Pin the newest message to the bottom unless scrolled back.
    let total = wrapped_height(&lines, area.width);
    let bottom = total.saturating_sub(area.height);
    let offset = bottom.saturating_sub(view.chat_scroll);

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));
    f.render_widget(paragraph, area);
}

fn render_bookings(f: &mut Frame, manager: &BookingManager, view: &ViewState, area: Rect) {
    let bookings = manager.bookings();
    if bookings.is_empty() {
        let empty = Paragraph::new("No bookings yet. Bookings confirmed in the chat show up here.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        f.render_widget(empty, area);
        return;
    }

    let width = usize::from(area.width);
    let mut lines = Vec::new();
    for booking in bookings {
        lines.extend(booking_lines(booking, width));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).scroll((view.list_scroll, 0));
    f.render_widget(paragraph, area);
}

fn booking_lines(booking: &Booking, width: usize) -> Vec<Line<'static>> {
    let status = booking.status.label().to_string();
    let badge_width = status.width() + 3;
    let headline = format!(
        "({}) {}  #{}",
        booking.initial(),
        booking.guest_name,
        booking.id
    );

    vec![
        Line::from(vec![
            Span::styled(
                fit(&headline, width.saturating_sub(badge_width)),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(status, status_style(&booking.status)),
        ]),
        Line::from(fit(
            &format!(
                "    📞 {}  •  {} → {}  •  {} guest{}",
                booking.contact_display(),
                booking.check_in,
                booking.check_out,
                booking.guest_count,
                if booking.guest_count == 1 { "" } else { "s" }
            ),
            width,
        )),
    ]
}

fn status_style(status: &BookingStatus) -> Style {
    let color = match status {
        BookingStatus::Confirmed => Color::Green,
        BookingStatus::Cancelled => Color::Red,
        BookingStatus::CheckedIn => Color::Blue,
        BookingStatus::Other(_) => Color::Gray,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn render_calendar(f: &mut Frame, manager: &BookingManager, view: &ViewState, area: Rect) {
    let today = Local::now().date_naive();
    let grid = manager.month_grid(today);
    let cell = (usize::from(area.width) / 7).clamp(4, 12);

    let mut lines = vec![
        Line::from(Span::styled(
            center(&grid.title(), cell * 7),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(
            WEEKDAY_HEADERS
                .iter()
                .map(|day| Span::styled(center(day, cell), Style::default().fg(Color::DarkGray)))
                .collect::<Vec<_>>(),
        ),
    ];

    for week in &grid.weeks {
        let spans: Vec<Span> = week
            .iter()
            .map(|day| {
                if !day.in_month {
                    return Span::raw(" ".repeat(cell));
                }
                let mut style = Style::default();
                if day.is_booked() {
                    style = style.fg(Color::Black).bg(Color::Green);
                }
                if day.marked {
                    style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
                }
                if day.date == today {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Span::styled(center(&day.date.format("%-d").to_string(), cell), style)
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    let in_month: Vec<&Booking> = manager
        .bookings()
        .iter()
        .filter(|booking| {
            grid.weeks
                .iter()
                .flatten()
                .any(|day| day.in_month && booking.covers(day.date))
        })
        .collect();
    if in_month.is_empty() {
        lines.push(Line::from(Span::styled(
            "No stays this month.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for booking in in_month {
        let summary = format!(
            "{} → {}  {}",
            booking.check_in, booking.check_out, booking.guest_name
        );
        lines.push(Line::from(fit(&summary, usize::from(area.width))));
    }

    let paragraph = Paragraph::new(lines).scroll((view.list_scroll, 0));
    f.render_widget(paragraph, area);
}

fn render_input(f: &mut Frame, manager: &BookingManager, area: Rect, title: &str) {
    let input = Paragraph::new(manager.input())
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);

    let inner_width = area.width.saturating_sub(2);
    let typed = u16::try_from(manager.input().width()).unwrap_or(u16::MAX);
    let cursor_x = area.x + 1 + typed.min(inner_width.saturating_sub(1));
    f.set_cursor_position((cursor_x, area.y + 1));
}

fn render_status(f: &mut Frame, manager: &BookingManager, transcript: &Transcript, area: Rect) {
    let mut text = match manager.notice() {
        Some(notice) => notice.to_string(),
        None => match manager.registered_number() {
            Some(number) => format!("Registered as {number} • {} backend", manager.transport_name()),
            None => "Not registered".to_string(),
        },
    };
    if transcript.is_active() {
        text.push_str(&format!(" • Transcript: {}", transcript.status_string()));
    }
    let status = Paragraph::new(fit(&text, usize::from(area.width)))
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(status, area);
}

/// Rows `lines` occupy once wrapped to `width` columns.
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}
