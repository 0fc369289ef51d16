//! Read-only view of the session for presentation

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::grading::{FailReason, Maneuver, ManeuverStatus};
use super::state::{CameraMode, Outcome, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehiclePose {
    pub position: Vec3,
    pub yaw: f32,
    pub steer: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManeuverEntry {
    pub maneuver: Maneuver,
    pub status: ManeuverStatus,
    pub label: &'static str,
}

/// Everything the HUD shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub running: bool,
    pub time_remaining: f32,
    pub speed: f32,
    pub score: i32,
    pub maneuvers: [ManeuverEntry; 4],
    pub active: Option<Maneuver>,
    /// Seconds left on the junction allowance, while turning
    pub t_turn_remaining: Option<f32>,
    pub emergency_signalled: bool,
    pub fail_reason: Option<FailReason>,
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub vehicle: VehiclePose,
    pub camera_mode: CameraMode,
    pub hud: HudSnapshot,
}

impl Snapshot {
    pub fn capture(state: &SessionState) -> Self {
        let v = &state.vehicle;
        let m = &state.maneuvers;
        let entry = |maneuver: Maneuver| ManeuverEntry {
            maneuver,
            status: m.status(maneuver),
            label: m.label(maneuver),
        };
        Self {
            vehicle: VehiclePose {
                position: v.position,
                yaw: v.yaw,
                steer: v.steer,
                speed: v.speed,
            },
            camera_mode: state.camera_mode,
            hud: HudSnapshot {
                running: state.running,
                time_remaining: state.time_remaining,
                speed: v.speed,
                score: state.score,
                maneuvers: Maneuver::ALL.map(entry),
                active: m.active(),
                t_turn_remaining: m.t_turn.remaining_s(),
                emergency_signalled: m.emergency.is_signalled(),
                fail_reason: state.fail_reason,
                outcome: state.outcome(),
            },
        }
    }
}

impl HudSnapshot {
    /// Entry for one maneuver
    pub fn maneuver(&self, maneuver: Maneuver) -> &ManeuverEntry {
        let index = Maneuver::ALL
            .iter()
            .position(|m| *m == maneuver)
            .unwrap_or(0);
        &self.maneuvers[index]
    }
}
