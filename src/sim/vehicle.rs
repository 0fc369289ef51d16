//! Vehicle kinematics
//!
//! Arcade bicycle model: smoothed steering, per-tick throttle/brake impulses,
//! quadratic drag, and yaw rate from wheelbase and steer angle. Position only
//! advances while the session runs; height always snaps to the ground.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::course::Course;
use super::input::ControlSignal;
use crate::consts::*;
use crate::forward_from_yaw;

/// Kinematic state of the player's car
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// World position; `y` tracks the ground surface
    pub position: Vec3,
    /// Heading about +Y (radians). 0 faces -Z.
    pub yaw: f32,
    /// Signed speed along the heading, within [MIN_SPEED, MAX_SPEED]
    pub speed: f32,
    /// Normalized steering in [-1, 1]
    pub steer: f32,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            position: Vec3::new(START_X, GROUND_HEIGHT, START_Z),
            yaw: 0.0,
            speed: 0.0,
            steer: 0.0,
        }
    }
}

impl VehicleState {
    /// Parked at the start box, facing down the corridor
    pub fn at_start(course: &Course) -> Self {
        Self {
            position: Vec3::new(START_X, course.ground_height(START_X, START_Z), START_Z),
            ..Default::default()
        }
    }

    /// Front-wheel angle in radians
    #[inline]
    pub fn steer_angle(&self) -> f32 {
        self.steer * MAX_STEER_ANGLE
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.yaw)
    }

    /// Advance one step. `moving` gates the position update (the session is
    /// running); speed, steer and yaw integrate either way.
    pub fn integrate(
        &self,
        input: &ControlSignal,
        dt: f32,
        moving: bool,
        course: &Course,
    ) -> VehicleState {
        let dt = dt.clamp(0.0, MAX_DT);

        let target = input.steer_target();
        let steer = (self.steer + (target - self.steer) * (STEER_SPEED * dt).min(1.0))
            .clamp(-1.0, 1.0);
        let steer_angle = steer * MAX_STEER_ANGLE;

        let accel = if input.accelerate { THROTTLE_ACCEL } else { 0.0 };
        let brake = if input.brake { BRAKE_DECEL } else { 0.0 };
        let drag = BASE_DRAG + self.speed * self.speed * QUADRATIC_DRAG;
        let steer_drag = steer_angle.abs() * self.speed.max(0.0) * STEER_DRAG;

        let mut speed = self.speed + accel - brake - drag - steer_drag;
        if input.is_coasting() {
            // Coasting friction settles at rest instead of pushing through zero
            speed = if self.speed >= 0.0 {
                speed.max(0.0)
            } else {
                (self.speed + drag).min(0.0)
            };
        }
        let speed = speed.clamp(MIN_SPEED, MAX_SPEED);

        let forward_speed = speed.max(0.0);
        let steer_effect = 1.0 - (forward_speed / STEER_FALLOFF_SPEED).min(MAX_STEER_FALLOFF);
        let yaw = self.yaw + (forward_speed / WHEEL_BASE) * (steer_angle * steer_effect).tan() * dt;

        let mut position = self.position;
        if moving {
            position += forward_from_yaw(yaw) * speed * dt;
        }
        position.y = course.ground_height(position.x, position.z);

        VehicleState {
            position,
            yaw,
            speed,
            steer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 0.016;

    #[test]
    fn test_throttle_from_rest() {
        let course = Course::standard();
        let v = VehicleState::at_start(&course);
        let next = v.integrate(&ControlSignal::throttle(), DT, true, &course);
        // 0 + 0.18 - 0.010
        assert!((next.speed - 0.17).abs() < 1e-6);
        assert!(next.position.z < v.position.z, "moves toward -Z");
    }

    #[test]
    fn test_coasting_comes_to_rest() {
        let course = Course::standard();
        let mut v = VehicleState::at_start(&course);
        v.speed = 0.5;
        for _ in 0..200 {
            v = v.integrate(&ControlSignal::default(), DT, true, &course);
        }
        assert_eq!(v.speed, 0.0);

        // Reverse coast also decays to zero
        v.speed = -0.5;
        for _ in 0..200 {
            v = v.integrate(&ControlSignal::default(), DT, true, &course);
        }
        assert_eq!(v.speed, 0.0);
    }

    #[test]
    fn test_idle_vehicle_stays_put() {
        let course = Course::standard();
        let start = VehicleState::at_start(&course);
        let mut v = start;
        for _ in 0..300 {
            v = v.integrate(&ControlSignal::default(), DT, true, &course);
        }
        assert_eq!(v.position, start.position);
        assert_eq!(v.speed, 0.0);
    }

    #[test]
    fn test_brake_reverses_to_limit() {
        let course = Course::standard();
        let mut v = VehicleState::at_start(&course);
        for _ in 0..100 {
            v = v.integrate(&ControlSignal::braking(), DT, true, &course);
        }
        assert_eq!(v.speed, MIN_SPEED);
        assert!(v.position.z > START_Z, "reversed toward +Z");
    }

    #[test]
    fn test_position_frozen_when_not_moving() {
        let course = Course::standard();
        let start = VehicleState::at_start(&course);
        let next = start.integrate(&ControlSignal::throttle(), DT, false, &course);
        assert!(next.speed > 0.0);
        assert_eq!(next.position, start.position);
    }

    #[test]
    fn test_steering_turns_right_when_moving() {
        let course = Course::standard();
        let mut v = VehicleState::at_start(&course);
        v.speed = 5.0;
        let input = ControlSignal {
            accelerate: true,
            steer_right: true,
            ..Default::default()
        };
        for _ in 0..30 {
            v = v.integrate(&input, DT, true, &course);
        }
        assert!(v.steer > 0.0);
        assert!(v.yaw > 0.0);
        assert!(v.position.x > 0.0, "heading swings toward +X");
    }

    #[test]
    fn test_no_yaw_when_stationary() {
        let course = Course::standard();
        let v = VehicleState::at_start(&course);
        let input = ControlSignal {
            steer_left: true,
            ..Default::default()
        };
        let next = v.integrate(&input, DT, true, &course);
        assert!(next.steer < 0.0);
        assert_eq!(next.yaw, 0.0);
    }

    #[test]
    fn test_steer_smoothing_rate() {
        let course = Course::standard();
        let v = VehicleState::at_start(&course);
        let input = ControlSignal {
            steer_right: true,
            ..Default::default()
        };
        let next = v.integrate(&input, 0.02, false, &course);
        assert!((next.steer - 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_height_follows_ramp() {
        let course = Course::standard();
        let mut v = VehicleState::at_start(&course);
        v.position = Vec3::new(0.0, 0.0, -54.0);
        v.speed = 2.0;
        let next = v.integrate(&ControlSignal::throttle(), DT, true, &course);
        let expected = course.ground_height(next.position.x, next.position.z);
        assert_eq!(next.position.y, expected);
        assert!(next.position.y > GROUND_HEIGHT);
    }

    #[test]
    fn test_oversized_dt_is_clamped() {
        let course = Course::standard();
        let mut v = VehicleState::at_start(&course);
        v.speed = 10.0;
        let big = v.integrate(&ControlSignal::default(), 1.0, true, &course);
        let capped = v.integrate(&ControlSignal::default(), MAX_DT, true, &course);
        assert_eq!(big.position, capped.position);
    }

    fn arb_input() -> impl Strategy<Value = ControlSignal> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(accelerate, brake, steer_left, steer_right)| ControlSignal {
                accelerate,
                brake,
                steer_left,
                steer_right,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_speed_and_steer_stay_bounded(
            speed in MIN_SPEED..=MAX_SPEED,
            steer in -1.0f32..=1.0,
            yaw in -3.2f32..3.2,
            inputs in proptest::collection::vec(arb_input(), 1..60),
            dt in 0.0f32..=MAX_DT,
        ) {
            let course = Course::standard();
            let mut v = VehicleState { speed, steer, yaw, ..VehicleState::at_start(&course) };
            for input in &inputs {
                v = v.integrate(input, dt, true, &course);
                prop_assert!(v.speed >= MIN_SPEED && v.speed <= MAX_SPEED);
                prop_assert!(v.steer >= -1.0 && v.steer <= 1.0);
                prop_assert_eq!(v.position.y, course.ground_height(v.position.x, v.position.z));
            }
        }
    }
}
