//! Serial session with the controller
//!
//! Owns the tty, runs the wake-up handshake, and hands out status bytes one
//! at a time. Open and handshake failures are unrecoverable: the caller is
//! expected to abort, not retry.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, trace};

use crate::error::TransportError;
use crate::protocol::{self, timing};

/// Anything the run loop can poll for status bytes.
///
/// Implemented by [`SerialSession`] for the real device; tests drive the
/// loop with a scripted source instead.
pub trait StatusSource {
    /// Read one status byte.
    ///
    /// `Ok(None)` means no byte is pending and the caller should back off;
    /// it is never an error.
    fn read_status(&mut self) -> Result<Option<u8>, TransportError>;
}

/// An open, activated serial channel to the controller.
pub struct SerialSession {
    port: Box<dyn SerialPort>,
    path: String,
}

impl SerialSession {
    /// Open the serial device and wake it into reporting mode.
    ///
    /// Configures the port for raw 8N1 I/O at the fixed bit rate, flushes
    /// anything pending, then transmits the wake and activation sequences.
    pub fn open(path: &str) -> Result<Self, TransportError> {
        let port = serialport::new(path, protocol::BAUD_RATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(timing::READ_TIMEOUT_MS))
            .open()
            .map_err(|source| TransportError::Open {
                path: path.to_string(),
                source,
            })?;

        let mut session = Self {
            port,
            path: path.to_string(),
        };
        session.handshake()?;
        Ok(session)
    }

    /// Transmit the two literal wake-up sequences.
    ///
    /// The device sends a short response to the first sequence; its size and
    /// content carry no information and it is discarded. Neither sequence is
    /// acknowledged.
    fn handshake(&mut self) -> Result<(), TransportError> {
        self.port.clear(ClearBuffer::All)?;

        debug!("Sending wake sequence ({} bytes)", protocol::WAKE_SEQUENCE.len());
        self.write_exact(&protocol::WAKE_SEQUENCE)?;
        self.port.flush()?;

        std::thread::sleep(Duration::from_millis(timing::HANDSHAKE_DELAY_MS));
        self.drain_response();

        debug!(
            "Sending activation sequence ({} bytes)",
            protocol::ACTIVATION_SEQUENCE.len()
        );
        self.write_exact(&protocol::ACTIVATION_SEQUENCE)?;
        self.port.flush()?;

        debug!("Handshake complete on {}", self.path);
        Ok(())
    }

    /// Write a full sequence in one call; a short write is fatal.
    fn write_exact(&mut self, sequence: &[u8]) -> Result<(), TransportError> {
        let written = self.port.write(sequence)?;
        if written != sequence.len() {
            return Err(TransportError::ShortWrite {
                expected: sequence.len(),
                written,
            });
        }
        Ok(())
    }

    /// Read and discard whatever the device sent back during the handshake.
    fn drain_response(&mut self) {
        let mut scratch = [0u8; 256];
        match self.port.read(&mut scratch) {
            Ok(n) => trace!("Discarded {n} handshake response bytes"),
            Err(_) => trace!("No handshake response pending"),
        }
    }

    /// The device node this session was opened on.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl StatusSource for SerialSession {
    fn read_status(&mut self) -> Result<Option<u8>, TransportError> {
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Ok(Some(byte[0])),
            Ok(_) => Ok(None),
            Err(e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
