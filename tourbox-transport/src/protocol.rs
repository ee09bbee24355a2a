//! Protocol constants for TourBox NEO serial communication
//!
//! The controller enumerates as a CDC-ACM serial device and stays silent
//! until it receives two fixed byte sequences. Both sequences were captured
//! from the vendor software and are literal protocol constants, not
//! negotiated. After activation the device reports one status byte per
//! control edge (see [`crate::event`]).

/// USB identity, reused for the virtual device the driver registers.
pub const VENDOR_ID: u16 = 0x2e3c;
pub const PRODUCT_ID: u16 = 0x5740;
pub const PRODUCT_NAME: &str = "TourBox NEO";

/// Serial device node the controller enumerates as by default.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/ttyACM0";

/// Fixed serial bit rate. The controller ignores other rates.
pub const BAUD_RATE: u32 = 115_200;

/// Wake sequence, the first write after opening the port.
///
/// The device answers with a short blob that carries no useful
/// information; it is read and discarded.
pub const WAKE_SEQUENCE: [u8; 8] = [0x55, 0x00, 0x07, 0x88, 0x94, 0x00, 0x1A, 0xFE];

/// Activation sequence. Switches the device into status reporting mode.
///
/// Must be transmitted unmodified in a single write. The trailing 0xFE
/// terminator matches the wake sequence; the 0x08-prefixed pairs in the
/// body enumerate the control codes the device should report.
pub const ACTIVATION_SEQUENCE: [u8; 94] = [
    0xB5, 0x00, 0x5D, 0x04, 0x08, 0x05, 0x08, 0x06, //
    0x08, 0x07, 0x08, 0x08, 0x08, 0x09, 0x08, 0x0B, //
    0x08, 0x0C, 0x08, 0x0D, 0x08, 0x0E, 0x08, 0x0F, //
    0x08, 0x26, 0x08, 0x27, 0x08, 0x28, 0x08, 0x29, //
    0x08, 0x3B, 0x08, 0x3C, 0x08, 0x3D, 0x08, 0x3E, //
    0x08, 0x3F, 0x08, 0x40, 0x08, 0x41, 0x08, 0x42, //
    0x08, 0x43, 0x08, 0x44, 0x08, 0x45, 0x08, 0x46, //
    0x08, 0x47, 0x08, 0x48, 0x08, 0x49, 0x08, 0x4A, //
    0x08, 0x4B, 0x08, 0x4C, 0x08, 0x4D, 0x08, 0x4E, //
    0x08, 0x4F, 0x08, 0x50, 0x08, 0x51, 0x08, 0x52, //
    0x08, 0x53, 0x08, 0x54, 0x08, 0xA8, 0x08, 0xA9, //
    0x08, 0xAA, 0x08, 0xAB, 0x08, 0xFE,
];

/// Timing constants
pub mod timing {
    /// Pause between the wake and activation sequences.
    pub const HANDSHAKE_DELAY_MS: u64 = 100;

    /// Backoff when no status byte is pending.
    pub const READ_BACKOFF_MS: u64 = 100;

    /// Serial read timeout; reads that expire count as "no byte pending".
    pub const READ_TIMEOUT_MS: u64 = 50;

    /// Settle time between activation and the first status read.
    pub const SETTLE_DELAY_MS: u64 = 1000;
}
