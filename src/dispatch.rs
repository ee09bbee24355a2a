//! Key event synthesis
//!
//! Turns one action table entry into the ordered event sequence the sink
//! expects. Chord bracketing invariant: modifiers go down strictly before
//! the primary key and come up strictly after it, in mirrored order.

use crate::keymap::{ActionEntry, Handler};
use crate::uinput::{KeySink, SinkError};

/// Execute one table entry against the sink.
pub fn dispatch(entry: &ActionEntry, sink: &mut impl KeySink) -> Result<(), SinkError> {
    match entry.handler {
        Handler::Press => press(entry, sink),
        Handler::Release => release(entry, sink),
        // A tap is both halves back to back; each half delivers its own
        // input report, the same shape a real press-then-release has.
        Handler::Tap => {
            press(entry, sink)?;
            release(entry, sink)
        }
    }
}

/// Assert modifiers in canonical order, press the primary, commit.
///
/// No release is emitted: the key stays logically held until the paired
/// [`Handler::Release`] entry fires.
fn press(entry: &ActionEntry, sink: &mut impl KeySink) -> Result<(), SinkError> {
    for modifier in entry.mods.keys() {
        sink.key_down(modifier)?;
    }
    sink.key_down(entry.code)?;
    sink.commit()
}

/// Release the primary, drop modifiers in reverse order, commit.
fn release(entry: &ActionEntry, sink: &mut impl KeySink) -> Result<(), SinkError> {
    sink.key_up(entry.code)?;
    for modifier in entry.mods.keys().rev() {
        sink.key_up(modifier)?;
    }
    sink.commit()
}
