#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! Widgets in arbor never look at host-specific event objects. A host (a
//! browser binding, a terminal loop, a test) normalizes whatever it receives
//! into these types and feeds them to the widget.
//!
//! # Design Notes
//!
//! - `KeyEventKind` defaults to `Press` when the host cannot tell.
//! - `Modifiers` use bitflags for easy combination.
//! - Pointer events address their target by the node id the widget handed
//!   out, not by coordinates; hit testing is the host's job.

use bitflags::bitflags;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A pointer (mouse or touch) event.
    Pointer(PointerEvent),

    /// Focus gained or lost.
    ///
    /// `true` = focus gained, `false` = focus lost.
    Focus(bool),
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Translate a DOM `KeyboardEvent.key` value.
    ///
    /// Returns `None` for named keys arbor has no use for (`"Shift"`,
    /// `"F5"`, ...). Single-character values map to [`KeyCode::Char`].
    #[must_use]
    pub fn from_dom_key(key: &str) -> Option<Self> {
        let code = match key {
            "Enter" => KeyCode::Enter,
            "Escape" | "Esc" => KeyCode::Escape,
            "Backspace" => KeyCode::Backspace,
            "Tab" => KeyCode::Tab,
            "Home" => KeyCode::Home,
            "End" => KeyCode::End,
            "PageUp" => KeyCode::PageUp,
            "PageDown" => KeyCode::PageDown,
            "ArrowUp" | "Up" => KeyCode::Up,
            "ArrowDown" | "Down" => KeyCode::Down,
            "ArrowLeft" | "Left" => KeyCode::Left,
            "ArrowRight" | "Right" => KeyCode::Right,
            "Spacebar" => KeyCode::Char(' '),
            other => {
                let mut chars = other.chars();
                let ch = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                KeyCode::Char(ch)
            }
        };
        Some(Self::new(code))
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Alt modifier is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Check if Super/Meta/Cmd modifier is held.
    #[must_use]
    pub const fn super_key(&self) -> bool {
        self.modifiers.contains(Modifiers::SUPER)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key (including space).
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Backspace key.
    Backspace,

    /// Tab key.
    Tab,

    /// Home key.
    Home,

    /// End key.
    End,

    /// Page Up key.
    PageUp,

    /// Page Down key.
    PageDown,

    /// Up arrow key.
    Up,

    /// Down arrow key.
    Down,

    /// Left arrow key.
    Left,

    /// Right arrow key.
    Right,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A pointer event aimed at a widget node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,

    /// Id of the node under the pointer, if the host resolved one.
    pub target: Option<String>,
}

impl PointerEvent {
    /// Create a pointer event without a resolved target.
    #[must_use]
    pub const fn new(kind: PointerEventKind) -> Self {
        Self { kind, target: None }
    }

    /// Create a click aimed at the node with the given id.
    #[must_use]
    pub fn click(target: impl Into<String>) -> Self {
        Self {
            kind: PointerEventKind::Click,
            target: Some(target.into()),
        }
    }

    /// Set the resolved target node id.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Mouse button pressed on the widget.
    Down,

    /// Touch started on the widget.
    TouchStart,

    /// Completed click (press + release) on the widget.
    Click,
}

impl PointerEventKind {
    /// Whether this event precedes a host-driven focus change.
    #[must_use]
    pub const fn grabs_focus(self) -> bool {
        matches!(self, Self::Down | Self::TouchStart)
    }
}
