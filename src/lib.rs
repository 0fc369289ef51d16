//! Road Test - a browser driving-test simulator
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, course, collisions, grading)
//! - `camera`: First/third-person camera framing
//! - `hud`: HUD and overlay text derived from snapshots
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction (clock, keyboard)
//! - `tuning`: Data-driven grading thresholds

pub mod audio;
pub mod camera;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

/// Simulation constants
pub mod consts {
    /// Largest time step a single tick integrates (seconds)
    pub const MAX_DT: f32 = 0.033;

    /// Kinematics
    pub const WHEEL_BASE: f32 = 2.2;
    pub const MAX_STEER_ANGLE: f32 = 0.25; // radians
    pub const STEER_SPEED: f32 = 3.0;
    pub const THROTTLE_ACCEL: f32 = 0.18;
    pub const BRAKE_DECEL: f32 = 0.22;
    pub const BASE_DRAG: f32 = 0.010;
    pub const QUADRATIC_DRAG: f32 = 0.000_05;
    pub const STEER_DRAG: f32 = 0.05;
    pub const MAX_SPEED: f32 = 10.5;
    pub const MIN_SPEED: f32 = -3.0;
    /// Speed at which steering authority bottoms out (see `MAX_STEER_FALLOFF`)
    pub const STEER_FALLOFF_SPEED: f32 = 14.0;
    pub const MAX_STEER_FALLOFF: f32 = 0.6;

    /// Flat ground height everywhere off the hill
    pub const GROUND_HEIGHT: f32 = 0.5;
    /// Vehicle spawn point
    pub const START_X: f32 = 0.0;
    pub const START_Z: f32 = 0.0;

    /// Rig dimensions (fallback car)
    pub const WHEEL_RADIUS: f32 = 0.35;
    pub const WHEEL_WIDTH: f32 = 0.3;
    pub const BODY_LEAN: f32 = 0.08;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Unit forward vector for a heading. Yaw 0 faces -Z.
#[inline]
pub fn forward_from_yaw(yaw: f32) -> glam::Vec3 {
    glam::Vec3::new(yaw.sin(), 0.0, -yaw.cos())
}
