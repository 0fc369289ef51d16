//! Keyboard to control-signal mapping
//!
//! Holds the current up/down state of the driving keys. The simulation
//! samples it once per frame; there is no event queue.

use crate::sim::ControlSignal;

/// A driving control a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Accelerate,
    Brake,
    SteerLeft,
    SteerRight,
}

impl Control {
    /// Binding for a `KeyboardEvent.code` value (arrow keys and WASD)
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "KeyW" => Some(Control::Accelerate),
            "ArrowDown" | "KeyS" => Some(Control::Brake),
            "ArrowLeft" | "KeyA" => Some(Control::SteerLeft),
            "ArrowRight" | "KeyD" => Some(Control::SteerRight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    signal: ControlSignal,
}

impl KeyboardState {
    /// Record a key transition. Returns true if the key is a driving key.
    pub fn set_key(&mut self, code: &str, down: bool) -> bool {
        let Some(control) = Control::from_code(code) else {
            return false;
        };
        match control {
            Control::Accelerate => self.signal.accelerate = down,
            Control::Brake => self.signal.brake = down,
            Control::SteerLeft => self.signal.steer_left = down,
            Control::SteerRight => self.signal.steer_right = down,
        }
        true
    }

    /// Release everything (focus lost)
    pub fn clear(&mut self) {
        self.signal = ControlSignal::default();
    }

    pub fn sample(&self) -> ControlSignal {
        self.signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys_and_wasd() {
        let mut keys = KeyboardState::default();
        assert!(keys.set_key("ArrowUp", true));
        assert!(keys.set_key("KeyA", true));
        assert!(!keys.set_key("Space", true));

        let signal = keys.sample();
        assert!(signal.accelerate);
        assert!(signal.steer_left);
        assert!(!signal.brake);

        keys.set_key("KeyW", false);
        assert!(!keys.sample().accelerate);
    }

    #[test]
    fn test_clear_releases_all() {
        let mut keys = KeyboardState::default();
        keys.set_key("ArrowDown", true);
        keys.set_key("ArrowRight", true);
        keys.clear();
        assert_eq!(keys.sample(), ControlSignal::default());
    }
}
