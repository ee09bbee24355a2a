//! Driver error types

use thiserror::Error;

use crate::uinput::SinkError;
use tourbox_transport::TransportError;

/// Errors that abort the run loop
#[derive(Error, Debug)]
pub enum DriverError {
    /// Serial transport error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Virtual keyboard error
    #[error("Virtual keyboard error: {0}")]
    Sink(#[from] SinkError),
}
