//! Static mapping from decoded control edges to keyboard output
//!
//! One table entry per control edge the driver reacts to. Edges without an
//! entry (the wheel click, the knob click, most release edges) are
//! intentionally unbound: the device reports them, the driver drops them.

use evdev::Key;

use tourbox_transport::event::{Button, LogicalKey, Rotary, ScrollDir, Spin};

/// A composable set of chord modifiers.
///
/// Membership is order-independent; emission order is fixed by
/// [`Modifiers::keys`] so that asserting and releasing a set is symmetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0x01);
    pub const SHIFT: Modifiers = Modifiers(0x02);
    pub const ALT: Modifiers = Modifiers(0x04);
    pub const META: Modifiers = Modifiers(0x08);

    /// Every modifier the table can reference, for sink registration.
    pub const ALL: Modifiers = Modifiers(0x0F);

    /// Canonical emission order: ctrl, shift, alt, meta.
    const CANONICAL: [(Modifiers, Key); 4] = [
        (Self::CTRL, Key::KEY_LEFTCTRL),
        (Self::SHIFT, Key::KEY_LEFTSHIFT),
        (Self::ALT, Key::KEY_LEFTALT),
        (Self::META, Key::KEY_LEFTMETA),
    ];

    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Member key codes in canonical order. Reverse the iterator to release.
    pub fn keys(self) -> impl DoubleEndedIterator<Item = Key> {
        Self::CANONICAL
            .into_iter()
            .filter(move |(modifier, _)| self.contains(*modifier))
            .map(|(_, key)| key)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        self.union(rhs)
    }
}

/// How an entry drives the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Assert modifiers, press the key, commit. The key stays held until the
    /// paired [`Handler::Release`] entry fires.
    Press,
    /// Release the key, drop the modifiers, commit.
    Release,
    /// A full press-then-release cycle in one dispatch, for edges with no
    /// independent release signal.
    Tap,
}

/// One binding: a control edge and the key chord it produces.
#[derive(Debug, Clone, Copy)]
pub struct ActionEntry {
    pub key: LogicalKey,
    pub code: Key,
    pub mods: Modifiers,
    pub handler: Handler,
}

const fn entry(key: LogicalKey, code: Key, mods: Modifiers, handler: Handler) -> ActionEntry {
    ActionEntry {
        key,
        code,
        mods,
        handler,
    }
}

/// The binding table. First match wins; entries carry unique edges.
pub static KEYMAP: &[ActionEntry] = &[
    // Side: held as a shift-like modifier, so both edges are bound.
    entry(
        LogicalKey::Press(Button::Side),
        Key::KEY_LEFTSHIFT,
        Modifiers::NONE,
        Handler::Press,
    ),
    entry(
        LogicalKey::Release(Button::Side),
        Key::KEY_LEFTSHIFT,
        Modifiers::NONE,
        Handler::Release,
    ),
    // Scroll wheel
    entry(
        LogicalKey::Scroll(ScrollDir::Up),
        Key::KEY_LEFTBRACE,
        Modifiers::NONE,
        Handler::Tap,
    ),
    entry(
        LogicalKey::Scroll(ScrollDir::Down),
        Key::KEY_RIGHTBRACE,
        Modifiers::NONE,
        Handler::Tap,
    ),
    // Top
    entry(
        LogicalKey::Press(Button::Top),
        Key::KEY_BACKSLASH,
        Modifiers::NONE,
        Handler::Tap,
    ),
    // C1, C2
    entry(
        LogicalKey::Press(Button::C1),
        Key::KEY_1,
        Modifiers::NONE,
        Handler::Tap,
    ),
    entry(
        LogicalKey::Press(Button::C2),
        Key::KEY_2,
        Modifiers::NONE,
        Handler::Tap,
    ),
    // Tour
    entry(
        LogicalKey::Press(Button::Tour),
        Key::KEY_SLASH,
        Modifiers::NONE,
        Handler::Tap,
    ),
    // Knob
    entry(
        LogicalKey::Rotate(Rotary::Knob, Spin::Right),
        Key::KEY_RIGHT,
        Modifiers::ALT,
        Handler::Tap,
    ),
    entry(
        LogicalKey::Rotate(Rotary::Knob, Spin::Left),
        Key::KEY_LEFT,
        Modifiers::ALT,
        Handler::Tap,
    ),
    // Dial
    entry(
        LogicalKey::Rotate(Rotary::Dial, Spin::Right),
        Key::KEY_DOT,
        Modifiers::CTRL.union(Modifiers::ALT),
        Handler::Tap,
    ),
    entry(
        LogicalKey::Rotate(Rotary::Dial, Spin::Left),
        Key::KEY_DOT,
        Modifiers::CTRL.union(Modifiers::ALT).union(Modifiers::SHIFT),
        Handler::Tap,
    ),
    entry(
        LogicalKey::Press(Button::Dial),
        Key::KEY_EQUAL,
        Modifiers::NONE,
        Handler::Tap,
    ),
    // D-pad: held keys, so both edges are bound.
    entry(
        LogicalKey::Press(Button::Up),
        Key::KEY_DOT,
        Modifiers::CTRL.union(Modifiers::ALT).union(Modifiers::SHIFT),
        Handler::Press,
    ),
    entry(
        LogicalKey::Release(Button::Up),
        Key::KEY_DOT,
        Modifiers::CTRL.union(Modifiers::ALT).union(Modifiers::SHIFT),
        Handler::Release,
    ),
    entry(
        LogicalKey::Press(Button::Right),
        Key::KEY_RIGHT,
        Modifiers::ALT,
        Handler::Press,
    ),
    entry(
        LogicalKey::Release(Button::Right),
        Key::KEY_RIGHT,
        Modifiers::ALT,
        Handler::Release,
    ),
    entry(
        LogicalKey::Press(Button::Down),
        Key::KEY_DOT,
        Modifiers::CTRL.union(Modifiers::ALT),
        Handler::Press,
    ),
    entry(
        LogicalKey::Release(Button::Down),
        Key::KEY_DOT,
        Modifiers::CTRL.union(Modifiers::ALT),
        Handler::Release,
    ),
    entry(
        LogicalKey::Press(Button::Left),
        Key::KEY_LEFT,
        Modifiers::ALT,
        Handler::Press,
    ),
    entry(
        LogicalKey::Release(Button::Left),
        Key::KEY_LEFT,
        Modifiers::ALT,
        Handler::Release,
    ),
    // Tall, Short
    entry(
        LogicalKey::Press(Button::Tall),
        Key::KEY_3,
        Modifiers::NONE,
        Handler::Tap,
    ),
    entry(
        LogicalKey::Press(Button::Short),
        Key::KEY_4,
        Modifiers::NONE,
        Handler::Tap,
    ),
];

/// Look up the binding for a decoded edge.
///
/// `None` is the common case: the device reports many edges that have no
/// binding on purpose.
pub fn find(key: LogicalKey) -> Option<&'static ActionEntry> {
    KEYMAP.iter().find(|e| e.key == key)
}

/// Every key code the table can emit, primaries and modifiers both.
///
/// The virtual device must register all of these before the first event.
pub fn emitted_keys() -> impl Iterator<Item = Key> {
    KEYMAP
        .iter()
        .map(|e| e.code)
        .chain(Modifiers::ALL.keys())
}
