//! Maneuver grading state machines
//!
//! One small machine per exercise. Each consumes an [`Observation`] of the
//! vehicle after kinematics and reports a [`Verdict`]. A machine never leaves
//! `Passed`; failures are reported upward and the session decides what they
//! mean (every failure ends the attempt).
//!
//! All four follow the same shape: an entry condition on a trigger volume,
//! then a timed or positional evaluation that ends in a pass or a failure.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::TriggerHits;
use crate::tuning::Tuning;

/// The graded exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Maneuver {
    HillStart,
    TTurn,
    Acceleration,
    EmergencyStop,
}

impl Maneuver {
    pub const ALL: [Maneuver; 4] = [
        Maneuver::HillStart,
        Maneuver::TTurn,
        Maneuver::Acceleration,
        Maneuver::EmergencyStop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Maneuver::HillStart => "Hill",
            Maneuver::TTurn => "T-Junction",
            Maneuver::Acceleration => "Acceleration",
            Maneuver::EmergencyStop => "Emergency Stop",
        }
    }
}

impl Maneuver {
    /// The order a car meets the maneuvers driving the course from the start box
    pub const DRIVING_ORDER: [Maneuver; 4] = [
        Maneuver::Acceleration,
        Maneuver::EmergencyStop,
        Maneuver::HillStart,
        Maneuver::TTurn,
    ];
}

/// Why an attempt ended in failure. Display strings are shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailReason {
    Collision,
    HillBackward,
    HillStartTimeout,
    TimeOver,
    TTurnTimeout,
    AccelerationTooSlow,
    EmergencyStopLate,
}

impl FailReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailReason::Collision => "Collision",
            FailReason::HillBackward => "Hill Backward",
            FailReason::HillStartTimeout => "Hill Start Timeout",
            FailReason::TimeOver => "Time Over",
            FailReason::TTurnTimeout => "T Turn Timeout",
            FailReason::AccelerationTooSlow => "Acceleration Too Slow",
            FailReason::EmergencyStopLate => "Emergency Stop Late",
        }
    }
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse progress of a maneuver for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManeuverStatus {
    Ready,
    InProgress,
    Passed,
}

/// Outcome of one grading step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing changed that the session needs to hear about
    Pending,
    /// Entry condition met this tick
    Started,
    Passed,
    Failed(FailReason),
}

/// What the graders see of the vehicle after a tick
#[derive(Debug, Clone, Copy)]
pub struct Observation {
    pub position: Vec3,
    pub speed: f32,
    pub hits: TriggerHits,
    /// Clamped tick length (seconds)
    pub dt: f32,
    /// Monotonic clock (milliseconds)
    pub now_ms: f64,
}

// ============================================================================
// HILL START
// ============================================================================

/// Stop on the line, then pull away without rolling back, within the grace
/// period. The stop point is captured once and never moves.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum HillStart {
    #[default]
    Ready,
    /// Stopped on the line; checks begin on the first tick in the hill zone
    StoppedOnLine { deadline_ms: f64, stop_z: f32 },
    /// Stop recorded and the car is being judged in the hill zone
    Evaluating { deadline_ms: f64, stop_z: f32 },
    Passed,
}

impl HillStart {
    pub fn update(&mut self, obs: &Observation, tuning: &Tuning) -> Verdict {
        let mut verdict = Verdict::Pending;

        if *self == HillStart::Ready
            && obs.hits.hill_stop_line
            && obs.speed.abs() < tuning.hill_stop_speed
        {
            *self = HillStart::StoppedOnLine {
                deadline_ms: obs.now_ms + tuning.hill_start_grace_ms,
                stop_z: obs.position.z,
            };
            verdict = Verdict::Started;
        }

        match *self {
            HillStart::StoppedOnLine { deadline_ms, stop_z }
            | HillStart::Evaluating { deadline_ms, stop_z }
                if obs.hits.hill_zone =>
            {
                *self = HillStart::Evaluating {
                    deadline_ms,
                    stop_z,
                };
                // Climbing is toward -Z, so rolling back increases z
                if obs.position.z - stop_z > tuning.hill_rollback_limit {
                    return Verdict::Failed(FailReason::HillBackward);
                }
                if obs.now_ms > deadline_ms {
                    return Verdict::Failed(FailReason::HillStartTimeout);
                }
                if obs.speed.abs() > tuning.hill_restart_speed {
                    *self = HillStart::Passed;
                    return Verdict::Passed;
                }
            }
            _ => {}
        }

        verdict
    }

    pub fn status(&self) -> ManeuverStatus {
        match self {
            HillStart::Ready => ManeuverStatus::Ready,
            HillStart::StoppedOnLine { .. } | HillStart::Evaluating { .. } => {
                ManeuverStatus::InProgress
            }
            HillStart::Passed => ManeuverStatus::Passed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HillStart::Ready => "Ready",
            HillStart::StoppedOnLine { .. } | HillStart::Evaluating { .. } => "Waiting Start",
            HillStart::Passed => "Passed",
        }
    }
}

// ============================================================================
// T-JUNCTION
// ============================================================================

/// Enter the junction mouth, then reach the exit gate in the left arm
/// before the allowance runs out.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum TTurn {
    #[default]
    Ready,
    Turning { remaining_s: f32 },
    Passed,
}

impl TTurn {
    pub fn update(&mut self, obs: &Observation, tuning: &Tuning) -> Verdict {
        match *self {
            TTurn::Ready => {
                if obs.hits.junction_entry {
                    *self = TTurn::Turning {
                        remaining_s: tuning.t_turn_time_s,
                    };
                    return Verdict::Started;
                }
                Verdict::Pending
            }
            TTurn::Turning { remaining_s } => {
                let remaining_s = remaining_s - obs.dt;
                if obs.hits.junction_exit {
                    *self = TTurn::Passed;
                    return Verdict::Passed;
                }
                *self = TTurn::Turning { remaining_s };
                if remaining_s <= 0.0 {
                    return Verdict::Failed(FailReason::TTurnTimeout);
                }
                Verdict::Pending
            }
            TTurn::Passed => Verdict::Pending,
        }
    }

    pub fn status(&self) -> ManeuverStatus {
        match self {
            TTurn::Ready => ManeuverStatus::Ready,
            TTurn::Turning { .. } => ManeuverStatus::InProgress,
            TTurn::Passed => ManeuverStatus::Passed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TTurn::Ready => "Ready",
            TTurn::Turning { .. } => "Turning",
            TTurn::Passed => "Passed",
        }
    }

    /// Seconds left on the junction allowance while turning
    pub fn remaining_s(&self) -> Option<f32> {
        match self {
            TTurn::Turning { remaining_s } => Some(remaining_s.max(0.0)),
            _ => None,
        }
    }
}

// ============================================================================
// ACCELERATION RUN
// ============================================================================

/// Cross the start line, then reach the target speed before the end line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Acceleration {
    #[default]
    Ready,
    Running,
    Passed,
}

impl Acceleration {
    pub fn update(&mut self, obs: &Observation, tuning: &Tuning) -> Verdict {
        let mut verdict = Verdict::Pending;

        if *self == Acceleration::Ready && obs.hits.accel_start {
            *self = Acceleration::Running;
            verdict = Verdict::Started;
        }

        if *self == Acceleration::Running {
            if obs.speed >= tuning.accel_target_speed {
                *self = Acceleration::Passed;
                return Verdict::Passed;
            }
            if obs.hits.accel_end {
                return Verdict::Failed(FailReason::AccelerationTooSlow);
            }
        }

        verdict
    }

    pub fn status(&self) -> ManeuverStatus {
        match self {
            Acceleration::Ready => ManeuverStatus::Ready,
            Acceleration::Running => ManeuverStatus::InProgress,
            Acceleration::Passed => ManeuverStatus::Passed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Acceleration::Ready => "Ready",
            Acceleration::Running => "Accelerating",
            Acceleration::Passed => "Passed",
        }
    }
}

// ============================================================================
// EMERGENCY STOP
// ============================================================================

/// Entering the zone at speed raises the stop signal; the car must come to
/// rest inside the reaction window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum EmergencyStop {
    #[default]
    Ready,
    Signalled { elapsed_s: f32 },
    Passed,
}

impl EmergencyStop {
    pub fn update(&mut self, obs: &Observation, tuning: &Tuning) -> Verdict {
        match *self {
            EmergencyStop::Ready => {
                if obs.hits.emergency_zone && obs.speed >= tuning.emergency_min_entry_speed {
                    *self = EmergencyStop::Signalled { elapsed_s: 0.0 };
                    return Verdict::Started;
                }
                Verdict::Pending
            }
            EmergencyStop::Signalled { elapsed_s } => {
                let elapsed_s = elapsed_s + obs.dt;
                if obs.speed.abs() < tuning.emergency_stop_speed {
                    *self = EmergencyStop::Passed;
                    return Verdict::Passed;
                }
                *self = EmergencyStop::Signalled { elapsed_s };
                if elapsed_s > tuning.emergency_window_s {
                    return Verdict::Failed(FailReason::EmergencyStopLate);
                }
                Verdict::Pending
            }
            EmergencyStop::Passed => Verdict::Pending,
        }
    }

    /// Stop signal is showing
    pub fn is_signalled(&self) -> bool {
        matches!(self, EmergencyStop::Signalled { .. })
    }

    pub fn status(&self) -> ManeuverStatus {
        match self {
            EmergencyStop::Ready => ManeuverStatus::Ready,
            EmergencyStop::Signalled { .. } => ManeuverStatus::InProgress,
            EmergencyStop::Passed => ManeuverStatus::Passed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmergencyStop::Ready => "Ready",
            EmergencyStop::Signalled { .. } => "STOP!",
            EmergencyStop::Passed => "Passed",
        }
    }
}

// ============================================================================
// ALL MANEUVERS
// ============================================================================

/// Grading state for every maneuver in one attempt
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Maneuvers {
    pub hill: HillStart,
    pub t_turn: TTurn,
    pub accel: Acceleration,
    pub emergency: EmergencyStop,
}

impl Maneuvers {
    /// Step every machine in a fixed order. Returns the verdicts that are not
    /// `Pending`, tagged with their maneuver.
    pub fn update(&mut self, obs: &Observation, tuning: &Tuning) -> Vec<(Maneuver, Verdict)> {
        let verdicts = [
            (Maneuver::HillStart, self.hill.update(obs, tuning)),
            (Maneuver::Acceleration, self.accel.update(obs, tuning)),
            (Maneuver::EmergencyStop, self.emergency.update(obs, tuning)),
            (Maneuver::TTurn, self.t_turn.update(obs, tuning)),
        ];
        verdicts
            .into_iter()
            .filter(|(_, v)| *v != Verdict::Pending)
            .collect()
    }

    pub fn status(&self, maneuver: Maneuver) -> ManeuverStatus {
        match maneuver {
            Maneuver::HillStart => self.hill.status(),
            Maneuver::TTurn => self.t_turn.status(),
            Maneuver::Acceleration => self.accel.status(),
            Maneuver::EmergencyStop => self.emergency.status(),
        }
    }

    pub fn label(&self, maneuver: Maneuver) -> &'static str {
        match maneuver {
            Maneuver::HillStart => self.hill.label(),
            Maneuver::TTurn => self.t_turn.label(),
            Maneuver::Acceleration => self.accel.label(),
            Maneuver::EmergencyStop => self.emergency.label(),
        }
    }

    pub fn all_passed(&self) -> bool {
        Maneuver::ALL
            .iter()
            .all(|m| self.status(*m) == ManeuverStatus::Passed)
    }

    /// The maneuver currently being judged, if any
    pub fn active(&self) -> Option<Maneuver> {
        Maneuver::ALL
            .into_iter()
            .find(|m| self.status(*m) == ManeuverStatus::InProgress)
    }
}
