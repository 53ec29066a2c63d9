//! Input Bridge - Terminal mouse events onto a surface
//!
//! Converts crossterm mouse events into [`PointerEvent`]s (terminal cells
//! become client coordinates) and dispatches them on a [`SurfaceElement`].
//!
//! # Example
//!
//! ```ignore
//! use crossterm::event::{read, Event};
//! use spark_pointer::surface::input::{enable_mouse, route_mouse_event};
//!
//! enable_mouse()?;
//! loop {
//!     if let Event::Mouse(mouse) = read()? {
//!         route_mouse_event(&surface, mouse);
//!     }
//! }
//! ```

use std::io::{self, stdout};

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyModifiers,
    MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};
use crossterm::execute;

use super::SurfaceElement;
use crate::types::{Buttons, EventKind, Modifiers, PointerEvent};

// =============================================================================
// CONVERSION
// =============================================================================

/// Which surface event a crossterm mouse event maps to. Scrolls map to none.
pub fn event_kind_of(kind: MouseEventKind) -> Option<EventKind> {
    match kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(EventKind::PointerMove),
        MouseEventKind::Down(_) => Some(EventKind::PointerDown),
        MouseEventKind::Up(_) => Some(EventKind::PointerUp),
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => None,
    }
}

/// Convert a crossterm mouse event. Returns None for events with no surface kind.
pub fn pointer_event_from(event: CrosstermMouseEvent) -> Option<(EventKind, PointerEvent)> {
    let kind = event_kind_of(event.kind)?;
    let buttons = match event.kind {
        MouseEventKind::Down(btn) | MouseEventKind::Drag(btn) => convert_button(btn),
        _ => Buttons::empty(),
    };

    let pointer = PointerEvent::at(event.column as f32, event.row as f32)
        .with_buttons(buttons)
        .with_modifiers(convert_modifiers(event.modifiers));
    Some((kind, pointer))
}

fn convert_button(btn: CrosstermMouseButton) -> Buttons {
    match btn {
        CrosstermMouseButton::Left => Buttons::LEFT,
        CrosstermMouseButton::Right => Buttons::RIGHT,
        CrosstermMouseButton::Middle => Buttons::MIDDLE,
    }
}

fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    if mods.contains(KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if mods.contains(KeyModifiers::SUPER) || mods.contains(KeyModifiers::META) {
        out |= Modifiers::META;
    }
    out
}

// =============================================================================
// ROUTING
// =============================================================================

/// Convert and dispatch on `surface`. Returns how many listeners ran.
pub fn route_mouse_event(surface: &SurfaceElement, event: CrosstermMouseEvent) -> usize {
    match pointer_event_from(event) {
        Some((kind, pointer)) => surface.dispatch(kind, &pointer),
        None => 0,
    }
}

/// Enable terminal mouse capture.
pub fn enable_mouse() -> io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable terminal mouse capture.
pub fn disable_mouse() -> io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}
