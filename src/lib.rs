// TourBox NEO Linux Driver - Shared Library
// Action table, event synthesis, and the virtual keyboard bridge

pub mod dispatch;
pub mod error;
pub mod keymap;
pub mod run_loop;
pub mod uinput;

pub use dispatch::dispatch;
pub use error::DriverError;
pub use keymap::{ActionEntry, Handler, Modifiers, KEYMAP};
pub use run_loop::CancelToken;
pub use uinput::{KeySink, SinkError, VirtualKeyboard};
