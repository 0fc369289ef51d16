//! Control signal sampled once per tick

use serde::{Deserialize, Serialize};

/// Abstract driver controls for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSignal {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
}

impl ControlSignal {
    /// Steering target in [-1, 1]. Left and right together cancel out.
    pub fn steer_target(&self) -> f32 {
        let left: f32 = if self.steer_left { -1.0 } else { 0.0 };
        let right: f32 = if self.steer_right { 1.0 } else { 0.0 };
        (left + right).clamp(-1.0, 1.0)
    }

    /// Neither pedal held
    pub fn is_coasting(&self) -> bool {
        !self.accelerate && !self.brake
    }

    pub fn throttle() -> Self {
        Self {
            accelerate: true,
            ..Default::default()
        }
    }

    pub fn braking() -> Self {
        Self {
            brake: true,
            ..Default::default()
        }
    }
}
