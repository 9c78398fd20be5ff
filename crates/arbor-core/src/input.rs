use crate::{Size, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PointerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerEnter,
    PointerLeave,
    PointerDown,
    PointerMove,
    /// Move while a button is held.
    PointerDrag,
    PointerUp,
    PointerCancel,
    PointerScroll,
    KeyDown,
}

impl EventKind {
    pub fn is_pointer(self) -> bool {
        !matches!(self, EventKind::KeyDown)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Cmd on Mac, Win key on Windows
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Character(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    F(u8), // F1-F12
}

impl Key {
    /// Enter or Space.
    pub fn is_activation(self) -> bool {
        matches!(self, Key::Enter | Key::Space | Key::Character(' '))
    }
}

/// One event as delivered to a node callback.
///
/// `local` is relative to the target node's origin and `size` is the
/// target's measured size, so `local.x / size.width` is the horizontal
/// fraction of the hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputEvent {
    pub kind: EventKind,
    pub local: Vec2,
    pub size: Size,
    pub absolute: Vec2,
    pub pointer: PointerId,
    pub key: Option<Key>,
    pub scroll: Vec2,
    pub modifiers: Modifiers,
}

impl InputEvent {
    pub fn pointer(kind: EventKind, local: Vec2, size: Size) -> Self {
        Self {
            kind,
            local,
            size,
            absolute: local,
            pointer: PointerId::default(),
            key: None,
            scroll: Vec2::ZERO,
            modifiers: Modifiers::default(),
        }
    }

    pub fn key(key: Key, size: Size) -> Self {
        Self {
            key: Some(key),
            ..Self::pointer(EventKind::KeyDown, Vec2::ZERO, size)
        }
    }

    pub fn scroll(delta: Vec2, local: Vec2, size: Size) -> Self {
        Self {
            scroll: delta,
            ..Self::pointer(EventKind::PointerScroll, local, size)
        }
    }

    pub fn with_absolute(mut self, absolute: Vec2) -> Self {
        self.absolute = absolute;
        self
    }

    pub fn with_pointer(mut self, pointer: PointerId) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether `local` lies within `[0, size]` on both axes.
    pub fn is_inside(&self) -> bool {
        self.local.x >= 0.0
            && self.local.y >= 0.0
            && self.local.x <= self.size.width
            && self.local.y <= self.size.height
    }

    /// Horizontal hit fraction clamped to `[0, 1]`. Zero-width targets report 0.
    pub fn fraction_x(&self) -> f32 {
        if self.size.width > 0.0 && self.local.x.is_finite() {
            (self.local.x / self.size.width).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
