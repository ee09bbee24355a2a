//! The read → decode → lookup → dispatch loop
//!
//! Single-threaded and blocking. The only suspension point is a fixed
//! backoff while no status byte is pending. Cancellation is a flag set from
//! the signal handler and polled once per iteration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::dispatch::dispatch;
use crate::error::DriverError;
use crate::keymap;
use crate::uinput::KeySink;
use tourbox_transport::event;
use tourbox_transport::protocol::timing;
use tourbox_transport::StatusSource;

/// Cooperative cancellation flag.
///
/// `cancel` is async-signal-safe in the way that matters here: a single
/// atomic store, no allocation, no locks, so it can run inside the signal
/// handler while the loop polls [`is_cancelled`](CancelToken::is_cancelled).
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Callable from a signal handler.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Pull status bytes and synthesize key events until cancelled.
///
/// Transient read unavailability backs off and retries forever; transport
/// and sink errors abort with `Err`. Returns `Ok(())` only on cancellation.
pub fn run(
    source: &mut impl StatusSource,
    sink: &mut impl KeySink,
    cancel: &CancelToken,
) -> Result<(), DriverError> {
    while !cancel.is_cancelled() {
        let raw = match source.read_status()? {
            Some(byte) => byte,
            None => {
                std::thread::sleep(Duration::from_millis(timing::READ_BACKOFF_MS));
                continue;
            }
        };
        debug!("-> 0x{raw:02x}");

        let Some(key) = event::decode(raw) else {
            trace!("0x{raw:02x} is not a known control edge");
            continue;
        };
        match keymap::find(key) {
            Some(entry) => dispatch(entry, sink)?,
            None => trace!("{key:?} has no binding"),
        }
    }

    debug!("Cancellation observed, leaving read loop");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uinput::SinkError;
    use evdev::Key;
    use tourbox_transport::TransportError;

    /// Replays a fixed script of read results, then cancels the loop.
    struct ScriptedSource {
        script: Vec<Option<u8>>,
        cancel: CancelToken,
    }

    impl ScriptedSource {
        fn new(script: Vec<Option<u8>>, cancel: CancelToken) -> Self {
            Self { script, cancel }
        }
    }

    impl StatusSource for ScriptedSource {
        fn read_status(&mut self) -> Result<Option<u8>, TransportError> {
            if self.script.is_empty() {
                self.cancel.cancel();
                return Ok(None);
            }
            Ok(self.script.remove(0))
        }
    }

    #[derive(Default)]
    struct CountingSink {
        downs: Vec<Key>,
        ups: Vec<Key>,
        commits: usize,
    }

    impl KeySink for CountingSink {
        fn key_down(&mut self, key: Key) -> Result<(), SinkError> {
            self.downs.push(key);
            Ok(())
        }
        fn key_up(&mut self, key: Key) -> Result<(), SinkError> {
            self.ups.push(key);
            Ok(())
        }
        fn commit(&mut self) -> Result<(), SinkError> {
            self.commits += 1;
            Ok(())
        }
    }

    #[test]
    fn cancelled_token_stops_before_reading() {
        let cancel = CancelToken::new();
        cancel.cancel();

        let mut source = ScriptedSource::new(vec![Some(0x01)], cancel.clone());
        let mut sink = CountingSink::default();
        run(&mut source, &mut sink, &cancel).unwrap();

        assert!(sink.downs.is_empty());
        assert_eq!(sink.commits, 0);
    }

    #[test]
    fn mapped_byte_dispatches_and_unmapped_is_dropped() {
        let cancel = CancelToken::new();
        // Side press, undefined byte, side release.
        let mut source =
            ScriptedSource::new(vec![Some(0x01), Some(0xFF), Some(0x81)], cancel.clone());
        let mut sink = CountingSink::default();
        run(&mut source, &mut sink, &cancel).unwrap();

        assert_eq!(sink.downs, vec![Key::KEY_LEFTSHIFT]);
        assert_eq!(sink.ups, vec![Key::KEY_LEFTSHIFT]);
        assert_eq!(sink.commits, 2);
    }

    #[test]
    fn decodable_but_unbound_byte_dispatches_nothing() {
        let cancel = CancelToken::new();
        // 0x0a is the wheel click: decodes fine, deliberately unbound.
        let mut source = ScriptedSource::new(vec![Some(0x0A)], cancel.clone());
        let mut sink = CountingSink::default();
        run(&mut source, &mut sink, &cancel).unwrap();

        assert_eq!(sink.commits, 0);
    }

    #[test]
    fn transient_unavailability_backs_off_and_retries() {
        let cancel = CancelToken::new();
        // Two empty reads around a real byte; the loop must ride them out.
        let mut source = ScriptedSource::new(vec![None, Some(0x02), None], cancel.clone());
        let mut sink = CountingSink::default();

        let started = std::time::Instant::now();
        run(&mut source, &mut sink, &cancel).unwrap();
        let elapsed = started.elapsed();

        // Top button taps backslash: one full cycle, two commits.
        assert_eq!(sink.downs, vec![Key::KEY_BACKSLASH]);
        assert_eq!(sink.commits, 2);
        // Two backoff sleeps of READ_BACKOFF_MS each.
        assert!(elapsed >= Duration::from_millis(2 * timing::READ_BACKOFF_MS));
    }

    #[test]
    fn transport_error_aborts_the_loop() {
        struct BrokenSource;

        impl StatusSource for BrokenSource {
            fn read_status(&mut self) -> Result<Option<u8>, TransportError> {
                Err(TransportError::Io(std::io::Error::other("unplugged")))
            }
        }

        let cancel = CancelToken::new();
        let mut sink = CountingSink::default();
        let result = run(&mut BrokenSource, &mut sink, &cancel);
        assert!(matches!(result, Err(DriverError::Transport(_))));
    }
}
