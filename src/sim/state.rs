//! Session state and controller commands
//!
//! Everything that changes during an attempt lives here. Course geometry is
//! immutable and passed separately into `tick`.

use serde::{Deserialize, Serialize};

use super::collision::Footprint;
use super::course::Course;
use super::grading::{FailReason, Maneuver, Maneuvers};
use super::vehicle::VehicleState;
use crate::tuning::Tuning;

/// Camera framing selected by the player. Survives reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraMode {
    /// Driver's seat
    #[default]
    FirstPerson,
    /// Chase camera behind and above the car
    ThirdPerson,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::FirstPerson => CameraMode::ThirdPerson,
            CameraMode::ThirdPerson => CameraMode::FirstPerson,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraMode::FirstPerson => "First Person",
            CameraMode::ThirdPerson => "Third Person",
        }
    }
}

/// Terminal result of an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Passed,
    Failed(FailReason),
}

/// Discrete events for the presentation layer, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    ManeuverStarted(Maneuver),
    ManeuverPassed(Maneuver),
    Failed(FailReason),
    Passed,
}

/// Complete session state (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub vehicle: VehicleState,
    pub running: bool,
    /// Seconds left on the global countdown
    pub time_remaining: f32,
    pub score: i32,
    pub fail_reason: Option<FailReason>,
    pub maneuvers: Maneuvers,
    pub camera_mode: CameraMode,
    pub tuning: Tuning,
    pub footprint: Footprint,
    /// Pending events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    passed_emitted: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&Course::standard(), Tuning::default(), Footprint::default())
    }
}

impl SessionState {
    pub fn new(course: &Course, tuning: Tuning, footprint: Footprint) -> Self {
        Self {
            vehicle: VehicleState::at_start(course),
            running: false,
            time_remaining: tuning.session_time_s,
            score: tuning.starting_score,
            fail_reason: None,
            maneuvers: Maneuvers::default(),
            camera_mode: CameraMode::default(),
            tuning,
            footprint,
            events: Vec::new(),
            passed_emitted: false,
        }
    }

    /// Back to the start box, stopped. Keeps tuning, footprint and camera mode.
    pub fn reset(&mut self, course: &Course) {
        *self = Self {
            camera_mode: self.camera_mode,
            ..Self::new(course, self.tuning, self.footprint)
        };
    }

    pub fn start(&mut self, course: &Course) {
        self.reset(course);
        self.running = true;
        self.events.push(GameEvent::Started);
        log::info!(
            "Session started ({:.0}s on the clock)",
            self.time_remaining
        );
    }

    pub fn retry(&mut self, course: &Course) {
        log::info!("Retry");
        self.start(course);
    }

    /// End the attempt. The first reason wins; later calls do nothing.
    pub fn fail(&mut self, reason: FailReason) {
        if self.fail_reason.is_some() {
            return;
        }
        self.fail_reason = Some(reason);
        self.running = false;
        self.events.push(GameEvent::Failed(reason));
        log::info!("FAIL: {reason}");
    }

    /// Finish the attempt once every maneuver has passed
    pub fn pass_all_if_ready(&mut self) {
        if self.passed_emitted || self.fail_reason.is_some() || !self.maneuvers.all_passed() {
            return;
        }
        self.passed_emitted = true;
        self.running = false;
        self.events.push(GameEvent::Passed);
        log::info!(
            "PASS with {:.1}s remaining",
            self.time_remaining.max(0.0)
        );
    }

    pub fn toggle_camera_mode(&mut self) {
        self.camera_mode = self.camera_mode.toggled();
        log::debug!("Camera: {}", self.camera_mode.as_str());
    }

    pub fn outcome(&self) -> Option<Outcome> {
        if let Some(reason) = self.fail_reason {
            Some(Outcome::Failed(reason))
        } else if self.maneuvers.all_passed() {
            Some(Outcome::Passed)
        } else {
            None
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
