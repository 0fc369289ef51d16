//! Deterministic simulation module
//!
//! All driving-test logic lives here. This module must stay pure:
//! - Time enters only as `dt` and `now_ms` arguments
//! - Walls are tested in definition order
//! - No rendering or platform dependencies

pub mod aabb;
pub mod collision;
pub mod course;
pub mod grading;
pub mod input;
pub mod rig;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use aabb::Aabb;
pub use collision::{Footprint, TriggerHits, first_wall_hit};
pub use course::{Course, HillSpec, TriggerKind, Triggers, WallBox};
pub use grading::{FailReason, Maneuver, ManeuverStatus, Maneuvers, Verdict};
pub use input::ControlSignal;
pub use rig::{PartRole, RigPart, RigPose, VehicleRig};
pub use snapshot::{HudSnapshot, Snapshot, VehiclePose};
pub use state::{CameraMode, GameEvent, Outcome, SessionState};
pub use tick::tick;
pub use vehicle::VehicleState;
