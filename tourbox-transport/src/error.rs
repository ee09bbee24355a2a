//! Transport error types

use thiserror::Error;

/// Errors that can occur while talking to the controller
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to open serial device {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Short write during wake-up: wrote {written} of {expected} bytes")]
    ShortWrite { expected: usize, written: usize },

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("Serial I/O error: {0}")]
    Io(#[from] std::io::Error),
}
