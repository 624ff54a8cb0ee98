//! Aastha is a terminal front end for a booking-management chat assistant.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the data model, API-mode selection, the mock and HTTP
//!   transports, the reply interpreter that turns booking confirmations
//!   into records, and the view-model that ties them together.
//! - [`ui`] renders the three-tab terminal interface (chat, bookings,
//!   calendar) and runs the interactive event loop.
//! - [`api`] defines the JSON payloads exchanged with the booking backend.
//! - [`cli`] parses command-line arguments and dispatches subcommands.
//! - [`utils`] holds diagnostics and transcript logging.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
