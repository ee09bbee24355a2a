//! Status byte decoding
//!
//! After activation the controller reports one byte per control edge. The
//! byte space is a fixed assignment with two flag bits layered on top:
//!
//! - bit 7 (0x80) marks the release edge of a momentary button
//! - bit 6 (0x40) marks the right/up direction of a rotary or the wheel
//!
//! [`decode`] is the only place those bits are interpreted. It is total and
//! stateless: every byte maps to exactly one [`LogicalKey`] or `None`, and
//! bytes outside the assignment (the device emits plenty) map to `None`.

/// A momentary control. `Scroll`, `Knob` and `Dial` here mean the click of
/// the respective wheel, not its rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Tall,
    Side,
    Top,
    Short,
    Scroll,
    Up,
    Down,
    Left,
    Right,
    C1,
    C2,
    Tour,
    Knob,
    Dial,
}

/// A horizontal rotary control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotary {
    Knob,
    Dial,
}

/// Rotation direction of a [`Rotary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spin {
    Left,
    Right,
}

/// Movement direction of the scroll wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDir {
    Up,
    Down,
}

/// The decoded identity of one control edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Press(Button),
    Release(Button),
    Rotate(Rotary, Spin),
    Scroll(ScrollDir),
}

/// Marks the release edge of a momentary button.
const RELEASE_BIT: u8 = 0x80;

/// Marks right (rotaries) or up (scroll wheel).
const DIRECTION_BIT: u8 = 0x40;

/// Decode one status byte into a [`LogicalKey`].
///
/// Returns `None` for every byte outside the device's assignment.
pub fn decode(raw: u8) -> Option<LogicalKey> {
    if let Some(button) = button_from_code(raw & !RELEASE_BIT) {
        return Some(if raw & RELEASE_BIT == 0 {
            LogicalKey::Press(button)
        } else {
            LogicalKey::Release(button)
        });
    }

    // Directional controls never set the release bit.
    if raw & RELEASE_BIT != 0 {
        return None;
    }
    let forward = raw & DIRECTION_BIT != 0;
    match raw & !DIRECTION_BIT {
        0x04 => Some(LogicalKey::Rotate(
            Rotary::Knob,
            if forward { Spin::Right } else { Spin::Left },
        )),
        0x0F => Some(LogicalKey::Rotate(
            Rotary::Dial,
            if forward { Spin::Right } else { Spin::Left },
        )),
        0x09 => Some(LogicalKey::Scroll(if forward {
            ScrollDir::Up
        } else {
            ScrollDir::Down
        })),
        _ => None,
    }
}

/// The device's button code assignment.
fn button_from_code(code: u8) -> Option<Button> {
    let button = match code {
        0x00 => Button::Tall,
        0x01 => Button::Side,
        0x02 => Button::Top,
        0x03 => Button::Short,
        0x0A => Button::Scroll,
        0x10 => Button::Up,
        0x11 => Button::Down,
        0x12 => Button::Left,
        0x13 => Button::Right,
        0x22 => Button::C1,
        0x23 => Button::C2,
        0x2A => Button::Tour,
        0x37 => Button::Knob,
        0x38 => Button::Dial,
        _ => return None,
    };
    Some(button)
}
