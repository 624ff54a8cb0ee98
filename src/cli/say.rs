//! TUI-less "say" command

use std::error::Error;
use std::time::Duration;

use crate::cli::listing::print_booking_lines;
use crate::core::manager::{BookingManager, Tab};
use crate::core::mode::ModeSelector;
use crate::utils::logging::Transcript;

pub async fn run_say(
    message: Vec<String>,
    selector: &ModeSelector,
    transcript: &Transcript,
) -> Result<(), Box<dyn Error>> {
    let mut manager = BookingManager::new(selector.clone());
    // Nobody is watching a typing indicator here.
    manager.set_reply_delay(Duration::ZERO);
    manager.set_input(message.join(" "));
    manager.send_message().await?;

    for sent in manager.messages() {
        transcript.log_message(sent)?;
    }
    if let Some(reply) = manager.messages().last() {
        println!("{}", reply.text);
    }

    if manager.tab() == Tab::Bookings {
        println!();
        println!("Confirmed:");
        print_booking_lines(manager.bookings());
    }
    Ok(())
}
