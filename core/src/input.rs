//! Input events delivered by the host and the cursor hint returned to it.
//!
//! Positions and deltas are already in world space: screen-to-world mapping
//! belongs to the camera collaborator.

use crate::geometry::{Point3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKey {
    Shift,
    Ctrl,
    Alt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false, alt: false };

    pub fn with(key: ModifierKey) -> Self {
        let mut m = Self::NONE;
        match key {
            ModifierKey::Shift => m.shift = true,
            ModifierKey::Ctrl => m.ctrl = true,
            ModifierKey::Alt => m.alt = true,
        }
        m
    }

    pub fn has(&self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::Shift => self.shift,
            ModifierKey::Ctrl => self.ctrl,
            ModifierKey::Alt => self.alt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Escape,
    /// Toggle hidden on the selection (or the hovered entity)
    Hide,
    /// Toggle pinned-as-target on the selection (or the hovered entity)
    Pin,
    Other(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputEvent {
    PointerPress {
        button: PointerButton,
        /// World-space point under the cursor
        position: Point3,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerRelease {
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        /// World-space translation of the drag since the last event
        delta: Vector3,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Scroll {
        /// World-space depth push applied to a dragged entity
        delta: Vector3,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyPress {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
}

impl InputEvent {
    pub fn modifiers(&self) -> Modifiers {
        match self {
            InputEvent::PointerPress { modifiers, .. }
            | InputEvent::PointerRelease { modifiers, .. }
            | InputEvent::PointerMove { modifiers, .. }
            | InputEvent::Scroll { modifiers, .. }
            | InputEvent::KeyPress { modifiers, .. } => *modifiers,
        }
    }
}

/// Presentation hint for the cursor/crosshair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorHint {
    #[default]
    Neutral,
    Hoverable,
    Dragging,
    Connectable,
}
