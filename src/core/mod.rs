//! Domain logic: bookings and chat messages, the reply interpreter, the
//! transports and the view-model that ties them together.

pub mod booking;
pub mod calendar;
pub mod config;
pub mod interpreter;
pub mod manager;
pub mod message;
pub mod mode;
pub mod transport;
