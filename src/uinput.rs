//! Virtual keyboard device using evdev/uinput
//!
//! Registers a virtual keyboard carrying the controller's USB identity and
//! forwards synthesized key events to the host input subsystem.

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, BusType, EventType, InputEvent, InputId, Key,
};
use thiserror::Error;
use tracing::debug;

/// Errors from virtual keyboard operations
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create virtual device: {0}")]
    CreateDevice(#[source] std::io::Error),
    #[error("Failed to emit event: {0}")]
    EmitEvent(#[source] std::io::Error),
}

/// Sink for synthesized key events.
///
/// Key state changes accumulate until [`commit`](KeySink::commit) flushes
/// them to the host as one coherent input report. Implemented by
/// [`VirtualKeyboard`]; tests substitute a recording sink.
pub trait KeySink {
    fn key_down(&mut self, key: Key) -> Result<(), SinkError>;
    fn key_up(&mut self, key: Key) -> Result<(), SinkError>;
    fn commit(&mut self) -> Result<(), SinkError>;
}

/// Virtual keyboard device
pub struct VirtualKeyboard {
    device: VirtualDevice,
    /// Events buffered since the last commit.
    pending: Vec<InputEvent>,
}

impl VirtualKeyboard {
    /// Create a new virtual keyboard device.
    ///
    /// Every key code the driver can ever emit must be in `keys`; the
    /// kernel rejects events for unregistered codes.
    ///
    /// # Arguments
    /// * `name` - Device name (shown in `evtest` and input device listings)
    /// * `vendor`, `product` - USB identity to report for the virtual device
    /// * `keys` - The full set of key codes this device may emit
    pub fn new(
        name: &str,
        vendor: u16,
        product: u16,
        keys: impl IntoIterator<Item = Key>,
    ) -> Result<Self, SinkError> {
        let mut key_set = AttributeSet::<Key>::new();
        for key in keys {
            key_set.insert(key);
        }

        let device = VirtualDeviceBuilder::new()
            .map_err(SinkError::CreateDevice)?
            .name(name)
            .input_id(InputId::new(BusType::BUS_USB, vendor, product, 1))
            .with_keys(&key_set)
            .map_err(SinkError::CreateDevice)?
            .build()
            .map_err(SinkError::CreateDevice)?;

        Ok(Self {
            device,
            pending: Vec::new(),
        })
    }

    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<std::path::PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }

    fn push(&mut self, key: Key, value: i32) {
        self.pending
            .push(InputEvent::new(EventType::KEY, key.code(), value));
    }
}

impl KeySink for VirtualKeyboard {
    fn key_down(&mut self, key: Key) -> Result<(), SinkError> {
        self.push(key, 1);
        Ok(())
    }

    fn key_up(&mut self, key: Key) -> Result<(), SinkError> {
        self.push(key, 0);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        // emit() appends the SYN_REPORT that delivers the batch as one
        // input report.
        self.device
            .emit(&self.pending)
            .map_err(SinkError::EmitEvent)?;
        debug!("Committed {} key events", self.pending.len());
        self.pending.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap;
    use tourbox_transport::protocol::{PRODUCT_ID, PRODUCT_NAME, VENDOR_ID};

    #[test]
    #[ignore] // Requires uinput access (run with: cargo test -- --ignored)
    fn test_create_virtual_keyboard() {
        let keyboard =
            VirtualKeyboard::new(PRODUCT_NAME, VENDOR_ID, PRODUCT_ID, keymap::emitted_keys());
        assert!(keyboard.is_ok());
    }
}
