//! # Input Manager
//!
//! This module handles input processing for the application, including:
//! - Mapping key transitions to movement flags through the binding table
//! - Tracking whether the pointer is captured
//! - Gating raw mouse motion on pointer capture

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::config::KeyBinding;

use super::input_state::{MoveFlag, MoveFlags};

/// What pressing Escape should do in the current capture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    /// The pointer was captured and has been released
    ReleaseCapture,
    /// The pointer was already free, so the application should close
    Exit,
}

/// Owns the held movement flags and the pointer capture state.
#[derive(Debug, Clone)]
pub struct InputManager {
    bindings: HashMap<KeyCode, MoveFlag>,
    move_flags: MoveFlags,
    pointer_captured: bool,
}

impl InputManager {
    /// Creates an input manager from a key binding table.
    ///
    /// When the same key appears more than once the last entry wins.
    pub fn new(bindings: &[KeyBinding]) -> Self {
        Self {
            bindings: bindings.iter().map(|binding| (binding.key, binding.action)).collect(),
            move_flags: MoveFlags::default(),
            pointer_captured: false,
        }
    }

    /// Processes a window event, updating the movement flags for bound keys.
    pub fn intake_input(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    state,
                    physical_key: PhysicalKey::Code(key),
                    ..
                },
            ..
        } = event
        {
            self.intake_key(*key, *state == ElementState::Pressed);
        }
    }

    /// Sets or clears the flag bound to `key`. Returns false for unbound keys.
    pub fn intake_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match self.bindings.get(&key) {
            Some(&flag) => {
                self.move_flags.set(flag, pressed);
                true
            }
            None => false,
        }
    }

    /// Passes raw mouse motion through only while the pointer is captured.
    pub fn filter_mouse_motion(&self, delta: (f64, f64)) -> Option<(f64, f64)> {
        self.pointer_captured.then_some(delta)
    }

    /// The currently held movement flags.
    pub fn move_flags(&self) -> &MoveFlags {
        &self.move_flags
    }

    /// Whether mouse motion currently steers the camera.
    pub fn is_pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    /// Records that the cursor was grabbed or released.
    pub fn set_pointer_captured(&mut self, captured: bool) {
        self.pointer_captured = captured;
    }

    /// Releases capture if it is held, otherwise asks to exit.
    pub fn escape_pressed(&mut self) -> EscapeOutcome {
        if self.pointer_captured {
            self.pointer_captured = false;
            EscapeOutcome::ReleaseCapture
        } else {
            EscapeOutcome::Exit
        }
    }

    /// Releases every held flag.
    ///
    /// This is typically called when the window loses focus to prevent
    /// stuck keys.
    pub fn reset_inputs(&mut self) {
        self.move_flags.clear();
    }

    /// Drops capture and held keys together.
    pub fn focus_lost(&mut self) {
        self.reset_inputs();
        self.pointer_captured = false;
    }
}
