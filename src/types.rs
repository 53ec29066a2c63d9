//! Core types - Position, Rect, pointer events.
//!
//! Coordinates are `f32` client-space values, the same unit taffy computes
//! layouts in.

// =============================================================================
// Position
// =============================================================================

/// Pointer position relative to a surface's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// =============================================================================
// Rect
// =============================================================================

/// Bounding box of a surface in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a rect from its origin and size.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Rect anchored at (left, top) with no extent.
    pub fn at(left: f32, top: f32) -> Self {
        Self::new(left, top, 0.0, 0.0)
    }

    /// Translate a client-space point into this rect's coordinate space.
    pub fn relative(&self, client_x: f32, client_y: f32) -> Position {
        Position::new(client_x - self.left, client_y - self.top)
    }
}

// =============================================================================
// Pointer Event
// =============================================================================

bitflags::bitflags! {
    /// Buttons held while the pointer moved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
    }
}

bitflags::bitflags! {
    /// Modifier keys held during the event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

/// Event types a surface can deliver to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerMove,
    PointerDown,
    PointerUp,
}

/// A pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub client_x: f32,
    pub client_y: f32,
    pub buttons: Buttons,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Pointer at (client_x, client_y) with nothing held.
    pub fn at(client_x: f32, client_y: f32) -> Self {
        Self {
            client_x,
            client_y,
            ..Default::default()
        }
    }

    pub fn with_buttons(mut self, buttons: Buttons) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
