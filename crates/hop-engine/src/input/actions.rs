use std::collections::HashMap;

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Logical actions the host's input layer can report for a frame.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Actions: u8 {
        const MOVE_LEFT    = 1 << 0;
        const MOVE_RIGHT   = 1 << 1;
        const JUMP         = 1 << 2;
        const DASH         = 1 << 3;
        const RESTART      = 1 << 4;
        const DEBUG_TOGGLE = 1 << 5;
        const QUIT         = 1 << 6;
    }
}

/// Input state for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameActions {
    /// Actions down this frame (level-triggered).
    pub held: Actions,
    /// Actions that went down this frame (edge-triggered).
    pub pressed: Actions,
}

impl FrameActions {
    /// Treat every held action as freshly pressed.
    pub fn pressed(actions: Actions) -> Self {
        Self {
            held: actions,
            pressed: actions,
        }
    }
}

impl From<Actions> for FrameActions {
    fn from(actions: Actions) -> Self {
        Self::pressed(actions)
    }
}

/// Maps host key codes to logical actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMap {
    bindings: HashMap<u32, u8>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn bind(mut self, key_code: u32, action: Actions) -> Self {
        self.bindings.insert(key_code, action.bits());
        self
    }

    pub fn lookup(&self, key_code: u32) -> Actions {
        self.bindings
            .get(&key_code)
            .map(|bits| Actions::from_bits_truncate(*bits))
            .unwrap_or_else(Actions::empty)
    }
}

impl Default for KeyMap {
    /// ASCII-style codes: A/D move, W or space jump, Shift dash, R restart,
    /// backtick debug room, Escape quit.
    fn default() -> Self {
        Self::new()
            .bind(b'A' as u32, Actions::MOVE_LEFT)
            .bind(b'D' as u32, Actions::MOVE_RIGHT)
            .bind(b'W' as u32, Actions::JUMP)
            .bind(b' ' as u32, Actions::JUMP)
            .bind(16, Actions::DASH)
            .bind(b'R' as u32, Actions::RESTART)
            .bind(b'`' as u32, Actions::DEBUG_TOGGLE)
            .bind(27, Actions::QUIT)
    }
}

/// Edge detector: turns the level-triggered action set of each frame into
/// `{ held, pressed }`.
#[derive(Debug, Clone, Default)]
pub struct ActionTracker {
    keys: KeyMap,
    down: Actions,
    previous: Actions,
}

impl ActionTracker {
    pub fn new(keys: KeyMap) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }

    pub fn key_down(&mut self, key_code: u32) {
        self.down |= self.keys.lookup(key_code);
    }

    pub fn key_up(&mut self, key_code: u32) {
        self.down -= self.keys.lookup(key_code);
    }

    /// Replace the whole held set, for hosts that poll instead of sending key events.
    pub fn set_held(&mut self, actions: Actions) {
        self.down = actions;
    }

    /// Close the frame: report what is held and what was pressed since the last call.
    pub fn frame(&mut self) -> FrameActions {
        let frame = FrameActions {
            held: self.down,
            pressed: self.down - self.previous,
        };
        self.previous = self.down;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_once() {
        let mut tracker = ActionTracker::default();
        tracker.set_held(Actions::JUMP);
        let first = tracker.frame();
        assert_eq!(first.pressed, Actions::JUMP);
        let second = tracker.frame();
        assert_eq!(second.held, Actions::JUMP);
        assert!(second.pressed.is_empty());
    }

    #[test]
    fn release_and_repress() {
        let mut tracker = ActionTracker::default();
        tracker.set_held(Actions::RESTART);
        tracker.frame();
        tracker.set_held(Actions::empty());
        assert!(tracker.frame().held.is_empty());
        tracker.set_held(Actions::RESTART);
        assert!(tracker.frame().pressed.contains(Actions::RESTART));
    }

    #[test]
    fn key_events_go_through_the_key_map() {
        let mut tracker = ActionTracker::new(KeyMap::default());
        tracker.key_down(b'D' as u32);
        tracker.key_down(b' ' as u32);
        let f = tracker.frame();
        assert_eq!(f.held, Actions::MOVE_RIGHT | Actions::JUMP);
        tracker.key_up(b' ' as u32);
        let f = tracker.frame();
        assert_eq!(f.held, Actions::MOVE_RIGHT);
        assert!(f.pressed.is_empty());
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut tracker = ActionTracker::new(KeyMap::new().bind(1, Actions::QUIT));
        tracker.key_down(2);
        assert!(tracker.frame().held.is_empty());
        tracker.key_down(1);
        assert_eq!(tracker.frame().pressed, Actions::QUIT);
    }
}
