//! Data-driven grading thresholds
//!
//! Every number the examiner judges against lives here so a course can be
//! made stricter or more forgiving without touching the state machines.
//! Missing JSON fields fall back to the defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Global countdown for one attempt (seconds)
    pub session_time_s: f32,
    /// Score shown at the start of an attempt
    pub starting_score: i32,

    // === Hill start ===
    /// Below this |speed| on the stop line the car counts as stopped
    pub hill_stop_speed: f32,
    /// Above this |speed| in the hill zone the restart succeeds
    pub hill_restart_speed: f32,
    /// Allowed roll back toward +Z from the stop point (metres)
    pub hill_rollback_limit: f32,
    /// Time allowed to restart after stopping (milliseconds)
    pub hill_start_grace_ms: f64,

    // === T-junction ===
    /// Time allowed from the junction mouth to the exit gate (seconds)
    pub t_turn_time_s: f32,

    // === Acceleration run ===
    /// Speed to reach between the start and end lines
    pub accel_target_speed: f32,

    // === Emergency stop ===
    /// The stop signal only fires for a car entering at least this fast
    pub emergency_min_entry_speed: f32,
    /// Below this |speed| the car counts as stopped
    pub emergency_stop_speed: f32,
    /// Time allowed to stop once signalled (seconds)
    pub emergency_window_s: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            session_time_s: 180.0,
            starting_score: 100,

            hill_stop_speed: 0.2,
            hill_restart_speed: 0.6,
            hill_rollback_limit: 1.2,
            hill_start_grace_ms: 5000.0,

            t_turn_time_s: 30.0,

            accel_target_speed: 8.0,

            emergency_min_entry_speed: 2.0,
            emergency_stop_speed: 0.2,
            emergency_window_s: 2.0,
        }
    }
}

impl Tuning {
    /// Parse from JSON. Unknown fields are ignored, missing ones default.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "session_time_s": 90.0, "t_turn_time_s": 12 }"#)
            .unwrap();
        assert_eq!(tuning.session_time_s, 90.0);
        assert_eq!(tuning.t_turn_time_s, 12.0);
        assert_eq!(tuning.hill_rollback_limit, 1.2);
        assert_eq!(tuning.hill_start_grace_ms, 5000.0);
    }

    #[test]
    fn test_round_trip() {
        let tuning = Tuning {
            accel_target_speed: 9.5,
            ..Default::default()
        };
        let back = Tuning::from_json(&tuning.to_json()).unwrap();
        assert_eq!(back, tuning);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ session_time_s: }").is_err());
    }
}
