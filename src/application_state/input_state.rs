//! # Input State
//!
//! The movement flags held between frames. Key events set and clear them
//! through the binding table; the camera reads them once per tick.

use serde::Deserialize;

/// One of the four directional movement actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveFlag {
    /// Along the view direction
    Forward,
    /// Against the view direction
    Backward,
    /// Strafe left of the view direction
    Left,
    /// Strafe right of the view direction
    Right,
}

/// Which movement actions are currently held.
///
/// Opposing flags may be held together; their contributions cancel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveFlags {
    /// Forward key is down
    pub forward: bool,
    /// Backward key is down
    pub backward: bool,
    /// Left key is down
    pub left: bool,
    /// Right key is down
    pub right: bool,
}

impl MoveFlags {
    /// Sets or clears a single flag.
    pub fn set(&mut self, flag: MoveFlag, held: bool) {
        match flag {
            MoveFlag::Forward => self.forward = held,
            MoveFlag::Backward => self.backward = held,
            MoveFlag::Left => self.left = held,
            MoveFlag::Right => self.right = held,
        }
    }

    /// Whether `flag` is held.
    pub fn is_held(&self, flag: MoveFlag) -> bool {
        match flag {
            MoveFlag::Forward => self.forward,
            MoveFlag::Backward => self.backward,
            MoveFlag::Left => self.left,
            MoveFlag::Right => self.right,
        }
    }

    /// True when any flag is held.
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Releases every flag.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear() {
        let mut flags = MoveFlags::default();
        assert!(!flags.any());

        flags.set(MoveFlag::Forward, true);
        flags.set(MoveFlag::Right, true);
        assert!(flags.is_held(MoveFlag::Forward));
        assert!(flags.is_held(MoveFlag::Right));
        assert!(!flags.is_held(MoveFlag::Left));

        flags.set(MoveFlag::Forward, false);
        assert!(!flags.forward);
        assert!(flags.any());

        flags.clear();
        assert_eq!(flags, MoveFlags::default());
    }

    #[test]
    fn flag_names_deserialize_lowercase() {
        let flags: Vec<MoveFlag> = serde_json::from_str(r#"["forward", "backward", "left", "right"]"#).unwrap();
        assert_eq!(
            flags,
            vec![MoveFlag::Forward, MoveFlag::Backward, MoveFlag::Left, MoveFlag::Right]
        );
        assert!(serde_json::from_str::<MoveFlag>(r#""Forward""#).is_err());
    }
}
