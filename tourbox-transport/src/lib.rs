//! Transport layer for the TourBox NEO controller
//!
//! The controller enumerates as a CDC-ACM serial device and speaks a tiny
//! one-way protocol: after a fixed two-sequence wake-up handshake it emits a
//! single status byte for every control edge (button press/release, rotary
//! step, wheel step). This crate owns that boundary:
//!
//! - [`protocol`]: the literal handshake sequences, identity, and timing
//! - [`serial`]: the serial session and handshake execution
//! - [`event`]: status byte to [`LogicalKey`] decoding
//! - [`error`]: the transport error taxonomy

pub mod error;
pub mod event;
pub mod protocol;
pub mod serial;

pub use error::TransportError;
pub use event::{decode, Button, LogicalKey, Rotary, ScrollDir, Spin};
pub use serial::{SerialSession, StatusSource};
