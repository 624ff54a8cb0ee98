//! Terminal UI layer for the booking manager.
//!
//! - [`chat_loop`]: terminal setup and the event loop driving a
//!   [`crate::core::manager::BookingManager`].
//! - [`renderer`]: draws the tab bar, the active tab, the input box and the
//!   status line.
//! - [`layout`]: display-width helpers, also used by the CLI listings.

pub mod chat_loop;
pub mod layout;
pub mod renderer;
