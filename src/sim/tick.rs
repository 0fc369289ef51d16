//! Per-frame simulation step
//!
//! One call advances the session by one animation frame: countdown, vehicle
//! kinematics, wall collisions, then maneuver grading. There is no
//! accumulator; long frames are clamped and the excess time is dropped.

use super::collision::{TriggerHits, first_wall_hit};
use super::course::Course;
use super::grading::{FailReason, Observation, Verdict};
use super::input::ControlSignal;
use super::state::{GameEvent, SessionState};
use crate::consts::MAX_DT;

/// Advance the session by one frame
pub fn tick(state: &mut SessionState, course: &Course, input: &ControlSignal, dt: f32, now_ms: f64) {
    let dt = dt.clamp(0.0, MAX_DT);

    if state.running {
        state.time_remaining -= dt;
        if state.time_remaining <= 0.0 {
            state.fail(FailReason::TimeOver);
        }
    }

    state.vehicle = state.vehicle.integrate(input, dt, state.running, course);

    // Nothing below may change the outcome once the attempt is over
    if !state.running {
        return;
    }

    let bounds = state
        .footprint
        .bounds_at(state.vehicle.position, state.vehicle.yaw);

    if let Some(wall) = first_wall_hit(&bounds, &course.walls) {
        log::debug!("Hit wall {wall} at {:?}", state.vehicle.position);
        state.fail(FailReason::Collision);
        return;
    }

    let obs = Observation {
        position: state.vehicle.position,
        speed: state.vehicle.speed,
        hits: TriggerHits::test(&bounds, &course.triggers),
        dt,
        now_ms,
    };

    let tuning = state.tuning;
    for (maneuver, verdict) in state.maneuvers.update(&obs, &tuning) {
        if state.fail_reason.is_some() {
            break;
        }
        match verdict {
            Verdict::Started => {
                log::debug!("{} started", maneuver.as_str());
                state.events.push(GameEvent::ManeuverStarted(maneuver));
            }
            Verdict::Passed => {
                log::debug!("{} passed", maneuver.as_str());
                state.events.push(GameEvent::ManeuverPassed(maneuver));
            }
            Verdict::Failed(reason) => state.fail(reason),
            Verdict::Pending => {}
        }
    }

    state.pass_all_if_ready();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_SPEED, MIN_SPEED};
    use crate::sim::grading::{EmergencyStop, HillStart, Maneuver, ManeuverStatus};
    use crate::sim::state::Outcome;
    use glam::Vec3;

    const DT: f32 = 0.016;

    fn running_session(course: &Course) -> SessionState {
        let mut state = SessionState::default();
        state.start(course);
        state.drain_events();
        state
    }

    fn place(state: &mut SessionState, course: &Course, x: f32, z: f32) {
        state.vehicle.position = Vec3::new(x, course.ground_height(x, z), z);
        state.vehicle.speed = 0.0;
    }

    /// Run `ticks` frames starting at `now_ms`, returning the clock afterwards
    fn run(
        state: &mut SessionState,
        course: &Course,
        input: &ControlSignal,
        ticks: usize,
        mut now_ms: f64,
    ) -> f64 {
        for _ in 0..ticks {
            now_ms += f64::from(DT) * 1000.0;
            tick(state, course, input, DT, now_ms);
        }
        now_ms
    }

    #[test]
    fn test_idle_before_start() {
        let course = Course::standard();
        let mut state = SessionState::default();
        run(&mut state, &course, &ControlSignal::throttle(), 120, 0.0);
        assert!(!state.running);
        assert_eq!(state.time_remaining, 180.0);
        assert_eq!(state.vehicle.position, SessionState::default().vehicle.position);
        // Speed still integrates
        assert!(state.vehicle.speed > 0.0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_countdown_only_while_running() {
        let course = Course::standard();
        let mut state = running_session(&course);
        run(&mut state, &course, &ControlSignal::default(), 10, 0.0);
        assert!((state.time_remaining - (180.0 - 10.0 * DT)).abs() < 1e-3);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let course = Course::standard();
        let mut state = running_session(&course);
        tick(&mut state, &course, &ControlSignal::default(), 0.5, 500.0);
        assert!((state.time_remaining - (180.0 - MAX_DT)).abs() < 1e-4);
    }

    // Scenario A: five seconds of full throttle from rest
    #[test]
    fn test_scenario_full_throttle_from_rest() {
        let course = Course::standard();
        let mut state = running_session(&course);
        let mut now_ms = 0.0;
        for _ in 0..312 {
            now_ms += 16.0;
            tick(&mut state, &course, &ControlSignal::throttle(), DT, now_ms);
            assert!(state.vehicle.speed <= MAX_SPEED);
            assert!(state.vehicle.speed >= MIN_SPEED);
        }
        assert!(state.vehicle.speed > MAX_SPEED - 0.1);
        assert_ne!(state.fail_reason, Some(FailReason::Collision));
    }

    // Scenario B: stop on the line and never pull away
    #[test]
    fn test_scenario_hill_start_timeout() {
        let course = Course::standard();
        let mut state = running_session(&course);
        place(&mut state, &course, 0.0, -66.0);

        let now = run(&mut state, &course, &ControlSignal::default(), 1, 10_000.0);
        assert!(matches!(state.maneuvers.hill, HillStart::Evaluating { .. }));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ManeuverStarted(Maneuver::HillStart)]
        );

        // 5.1 s at 16 ms per frame
        run(&mut state, &course, &ControlSignal::default(), 319, now);
        assert_eq!(state.fail_reason, Some(FailReason::HillStartTimeout));
        assert!(!state.running);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Failed(FailReason::HillStartTimeout)]
        );
    }

    // Scenario C: roll back more than 1.2 m after stopping
    #[test]
    fn test_scenario_hill_backward() {
        let course = Course::standard();
        let mut state = running_session(&course);
        place(&mut state, &course, 0.0, -66.0);
        let mut now_ms = run(&mut state, &course, &ControlSignal::default(), 1, 0.0);
        assert!(matches!(state.maneuvers.hill, HillStart::Evaluating { .. }));

        // Feathering the brake creeps backward below the restart speed
        let mut ticks = 0;
        while state.running && ticks < 300 {
            let input = if state.vehicle.speed > -0.35 {
                ControlSignal::braking()
            } else {
                ControlSignal::default()
            };
            now_ms = run(&mut state, &course, &input, 1, now_ms);
            assert!(state.vehicle.speed.abs() < 0.6);
            ticks += 1;
        }
        assert_eq!(state.fail_reason, Some(FailReason::HillBackward));
        assert!(state.vehicle.speed < 0.0);
        assert!(state.vehicle.position.z > -66.0 + 1.2);
        assert!(state.vehicle.position.z < -66.0 + 1.25, "fails on the first tick past the limit");
        assert!(now_ms < 5000.0, "inside the restart grace period");
    }

    // Scenario D: pull away within the grace period
    #[test]
    fn test_scenario_hill_start_passes() {
        let course = Course::standard();
        let mut state = running_session(&course);
        place(&mut state, &course, 0.0, -66.0);
        let now = run(&mut state, &course, &ControlSignal::default(), 30, 0.0);

        run(&mut state, &course, &ControlSignal::throttle(), 10, now);
        assert_eq!(state.maneuvers.hill, HillStart::Passed);
        assert_eq!(state.fail_reason, None);
        assert!(state.running);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::ManeuverPassed(Maneuver::HillStart))
        );
    }

    // Scenario E: touching a wall
    #[test]
    fn test_scenario_collision_is_sticky() {
        let course = Course::standard();
        let mut state = running_session(&course);
        place(&mut state, &course, 3.8, -10.0);

        tick(&mut state, &course, &ControlSignal::default(), DT, 16.0);
        assert_eq!(state.fail_reason, Some(FailReason::Collision));

        tick(&mut state, &course, &ControlSignal::default(), DT, 32.0);
        assert_eq!(state.fail_reason, Some(FailReason::Collision));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Failed(FailReason::Collision)]
        );
    }

    // Scenario F: countdown reaching exactly zero
    #[test]
    fn test_scenario_time_over_same_tick() {
        let course = Course::standard();
        let mut state = running_session(&course);
        state.time_remaining = DT;
        tick(&mut state, &course, &ControlSignal::default(), DT, 16.0);
        assert_eq!(state.fail_reason, Some(FailReason::TimeOver));
        assert!(!state.running);
    }

    #[test]
    fn test_no_collision_when_not_running() {
        let course = Course::standard();
        let mut state = SessionState::default();
        place(&mut state, &course, 3.8, -10.0);
        tick(&mut state, &course, &ControlSignal::default(), DT, 16.0);
        assert_eq!(state.fail_reason, None);
    }

    #[test]
    fn test_pass_survives_later_contact() {
        let course = Course::standard();
        let mut state = running_session(&course);
        state.maneuvers.hill = HillStart::Passed;
        state.maneuvers.t_turn = crate::sim::grading::TTurn::Passed;
        state.maneuvers.accel = crate::sim::grading::Acceleration::Passed;
        state.maneuvers.emergency = crate::sim::grading::EmergencyStop::Passed;

        tick(&mut state, &course, &ControlSignal::default(), DT, 16.0);
        assert_eq!(state.outcome(), Some(Outcome::Passed));
        assert!(!state.running);

        place(&mut state, &course, 3.8, -10.0);
        state.time_remaining = 0.0;
        run(&mut state, &course, &ControlSignal::default(), 5, 32.0);
        assert_eq!(state.outcome(), Some(Outcome::Passed));
        assert_eq!(state.drain_events(), vec![GameEvent::Passed]);
    }

    /// Examiner's route: floor it down the straight, stop on the signal,
    /// creep onto the hill stop line, pull away, then turn left at the junction
    fn drive_course(state: &SessionState) -> ControlSignal {
        const STOP_Z: f32 = -65.5;
        const CRUISE: f32 = 3.0;
        const TURN_Z: f32 = -76.0;

        let v = &state.vehicle;
        let m = &state.maneuvers;
        let mut input = ControlSignal::default();

        match m.emergency {
            EmergencyStop::Ready => {
                input.accelerate = true;
                return input;
            }
            EmergencyStop::Signalled { .. } => {
                input.brake = true;
                return input;
            }
            EmergencyStop::Passed => {}
        }

        match m.hill {
            HillStart::Ready => {
                let to_go = v.position.z - STOP_Z;
                if to_go <= 0.0 {
                    input.brake = v.speed > 0.0;
                } else if v.speed > 0.0 && v.speed * v.speed > 20.0 * to_go {
                    input.brake = true;
                } else {
                    input.accelerate = v.speed < CRUISE;
                }
                return input;
            }
            HillStart::StoppedOnLine { .. } | HillStart::Evaluating { .. } => {
                input.accelerate = true;
                return input;
            }
            HillStart::Passed => {}
        }

        input.accelerate = v.speed < CRUISE;
        if v.position.z <= TURN_Z {
            let target = -std::f32::consts::FRAC_PI_2;
            input.steer_left = v.yaw > target + 0.05;
            input.steer_right = v.yaw < target - 0.05;
        }
        input
    }

    #[test]
    fn test_standard_course_can_be_driven_to_a_pass() {
        let course = Course::standard();
        let mut state = running_session(&course);
        let mut events = Vec::new();
        let mut now_ms = 0.0;

        for _ in 0..(180.0 / DT) as usize {
            let input = drive_course(&state);
            now_ms += f64::from(DT) * 1000.0;
            tick(&mut state, &course, &input, DT, now_ms);
            events.extend(state.drain_events());
            if state.is_terminal() {
                break;
            }
        }

        assert_eq!(state.outcome(), Some(Outcome::Passed), "events: {events:?}");
        assert_eq!(
            events,
            vec![
                GameEvent::ManeuverPassed(Maneuver::Acceleration),
                GameEvent::ManeuverStarted(Maneuver::EmergencyStop),
                GameEvent::ManeuverPassed(Maneuver::EmergencyStop),
                GameEvent::ManeuverStarted(Maneuver::HillStart),
                GameEvent::ManeuverPassed(Maneuver::HillStart),
                GameEvent::ManeuverStarted(Maneuver::TTurn),
                GameEvent::ManeuverPassed(Maneuver::TTurn),
                GameEvent::Passed,
            ]
        );
        assert!(!state.running);
        assert!(state.time_remaining > 90.0, "well inside the time limit");
        assert!(state.vehicle.position.x < -20.0);
    }

    #[test]
    fn test_acceleration_run_from_start() {
        let course = Course::standard();
        let mut state = running_session(&course);
        // Full throttle is already past target speed at the start line
        run(&mut state, &course, &ControlSignal::throttle(), 150, 0.0);
        assert_eq!(state.maneuvers.status(Maneuver::Acceleration), ManeuverStatus::Passed);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ManeuverPassed(Maneuver::Acceleration)]
        );
        assert_eq!(state.fail_reason, None);
    }

    #[test]
    fn test_crawling_through_acceleration_run_fails() {
        let course = Course::standard();
        let mut state = running_session(&course);
        place(&mut state, &course, 0.0, -4.5);
        state.vehicle.speed = 2.0;
        let mut now_ms = 0.0;
        // Feather the throttle to hold roughly walking pace
        for i in 0..2000 {
            if state.fail_reason.is_some() {
                break;
            }
            now_ms += 16.0;
            let input = if state.vehicle.speed < 2.0 && i % 2 == 0 {
                ControlSignal::throttle()
            } else {
                ControlSignal::default()
            };
            tick(&mut state, &course, &input, DT, now_ms);
        }
        assert_eq!(state.fail_reason, Some(FailReason::AccelerationTooSlow));
    }

    #[test]
    fn test_emergency_stop_in_zone() {
        let course = Course::standard();
        let mut state = running_session(&course);
        place(&mut state, &course, 0.0, -25.6);
        state.maneuvers.accel = crate::sim::grading::Acceleration::Passed;
        state.vehicle.speed = 6.0;

        let now = run(&mut state, &course, &ControlSignal::default(), 2, 0.0);
        assert!(state.maneuvers.emergency.is_signalled());
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::ManeuverStarted(Maneuver::EmergencyStop))
        );

        // Braking from 6 m/s takes about 28 frames
        run(&mut state, &course, &ControlSignal::braking(), 40, now);
        assert_eq!(
            state.maneuvers.status(Maneuver::EmergencyStop),
            ManeuverStatus::Passed
        );
        assert_eq!(state.fail_reason, None);
    }

    #[test]
    fn test_emergency_stop_ignored_then_late() {
        let course = Course::standard();
        let mut state = running_session(&course);
        place(&mut state, &course, 0.0, -25.6);
        state.maneuvers.accel = crate::sim::grading::Acceleration::Passed;
        state.vehicle.speed = 3.0;

        // Keep rolling at about 3 m/s for well over two seconds
        let mut now_ms = 0.0;
        for _ in 0..200 {
            now_ms += 16.0;
            let input = if state.vehicle.speed < 3.0 {
                ControlSignal::throttle()
            } else {
                ControlSignal::default()
            };
            tick(&mut state, &course, &input, DT, now_ms);
        }
        assert_eq!(state.fail_reason, Some(FailReason::EmergencyStopLate));
    }

    #[test]
    fn test_t_turn_through_junction() {
        let course = Course::standard();
        let mut state = running_session(&course);
        place(&mut state, &course, 0.0, -77.0);

        run(&mut state, &course, &ControlSignal::default(), 1, 0.0);
        assert_eq!(state.maneuvers.status(Maneuver::TTurn), ManeuverStatus::InProgress);

        // Jump to the exit gate in the left arm
        state.vehicle.yaw = -std::f32::consts::FRAC_PI_2;
        place(&mut state, &course, -26.0, -86.0);
        run(&mut state, &course, &ControlSignal::default(), 1, 16.0);
        assert_eq!(state.maneuvers.status(Maneuver::TTurn), ManeuverStatus::Passed);
        assert_eq!(state.fail_reason, None);
    }

    #[test]
    fn test_t_turn_timeout() {
        let course = Course::standard();
        let mut state = SessionState::new(
            &course,
            crate::Tuning {
                t_turn_time_s: 0.5,
                ..Default::default()
            },
            Default::default(),
        );
        state.start(&course);
        place(&mut state, &course, 0.0, -77.0);
        run(&mut state, &course, &ControlSignal::default(), 40, 0.0);
        assert_eq!(state.fail_reason, Some(FailReason::TTurnTimeout));
    }

    #[test]
    fn test_determinism() {
        let course = Course::standard();
        let mut a = running_session(&course);
        let mut b = running_session(&course);
        let inputs = [
            ControlSignal::throttle(),
            ControlSignal {
                accelerate: true,
                steer_left: true,
                ..Default::default()
            },
            ControlSignal::braking(),
            ControlSignal::default(),
        ];
        for (i, input) in inputs.iter().cycle().take(400).enumerate() {
            let now_ms = i as f64 * 16.0;
            tick(&mut a, &course, input, DT, now_ms);
            tick(&mut b, &course, input, DT, now_ms);
        }
        assert_eq!(a.vehicle, b.vehicle);
        assert_eq!(a.fail_reason, b.fail_reason);
        assert_eq!(a.maneuvers, b.maneuvers);
    }
}
