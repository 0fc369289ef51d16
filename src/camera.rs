//! Camera framing
//!
//! Chases the vehicle in one of two framings. The eye eases toward its
//! target each frame; the look-at point is applied directly.

use glam::{Mat4, Vec3};

use crate::forward_from_yaw;
use crate::sim::{CameraMode, VehicleState};

pub const FOV_Y_DEGREES: f32 = 60.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 2000.0;

/// Per-frame easing toward the target eye position
pub const FIRST_PERSON_FOLLOW: f32 = 0.3;
pub const THIRD_PERSON_FOLLOW: f32 = 0.15;

/// Target eye and look-at point for a framing
pub fn framing(mode: CameraMode, vehicle: &VehicleState) -> (Vec3, Vec3) {
    let pos = vehicle.position;
    match mode {
        CameraMode::FirstPerson => {
            let fwd = forward_from_yaw(vehicle.yaw);
            let mut eye = pos + fwd * 0.9;
            eye.y = pos.y + 1.1;
            let mut look = pos + fwd * 10.0;
            look.y = pos.y + 1.0;
            (eye, look)
        }
        CameraMode::ThirdPerson => {
            let (s, c) = vehicle.yaw.sin_cos();
            let eye = Vec3::new(pos.x - s * 8.0, pos.y + 4.0, pos.z + c * 8.0);
            let look = Vec3::new(pos.x, pos.y + 1.0, pos.z);
            (eye, look)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub aspect: f32,
}

impl Camera {
    pub fn new(mode: CameraMode, vehicle: &VehicleState, aspect: f32) -> Self {
        let (eye, target) = framing(mode, vehicle);
        Self {
            eye,
            target,
            aspect,
        }
    }

    /// Jump straight to the framing (used on reset)
    pub fn snap(&mut self, mode: CameraMode, vehicle: &VehicleState) {
        let (eye, target) = framing(mode, vehicle);
        self.eye = eye;
        self.target = target;
    }

    /// Ease toward the framing by one frame
    pub fn follow(&mut self, mode: CameraMode, vehicle: &VehicleState) {
        let (eye, target) = framing(mode, vehicle);
        let k = match mode {
            CameraMode::FirstPerson => FIRST_PERSON_FOLLOW,
            CameraMode::ThirdPerson => THIRD_PERSON_FOLLOW,
        };
        self.eye = self.eye.lerp(eye, k);
        self.target = target;
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            FOV_Y_DEGREES.to_radians(),
            self.aspect.max(0.01),
            Z_NEAR,
            Z_FAR,
        );
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_person_framing() {
        let vehicle = VehicleState::default();
        let (eye, look) = framing(CameraMode::FirstPerson, &vehicle);
        assert!((eye - Vec3::new(0.0, 1.6, -0.9)).length() < 1e-5);
        assert!((look - Vec3::new(0.0, 1.5, -10.0)).length() < 1e-5);
    }

    #[test]
    fn test_third_person_framing_sits_behind() {
        let vehicle = VehicleState::default();
        let (eye, look) = framing(CameraMode::ThirdPerson, &vehicle);
        assert!((eye - Vec3::new(0.0, 4.5, 8.0)).length() < 1e-5);
        assert!((look - Vec3::new(0.0, 1.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_follow_eases_and_snap_jumps() {
        let start = VehicleState::default();
        let mut camera = Camera::new(CameraMode::ThirdPerson, &start, 1.5);

        let moved = VehicleState {
            position: Vec3::new(0.0, 0.5, -10.0),
            ..start
        };
        camera.follow(CameraMode::ThirdPerson, &moved);
        // 15% of the way from z=8 to z=-2
        assert!((camera.eye.z - 6.5).abs() < 1e-4);

        camera.snap(CameraMode::ThirdPerson, &moved);
        assert!((camera.eye.z + 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_view_proj_puts_car_in_view() {
        let vehicle = VehicleState::default();
        let camera = Camera::new(CameraMode::ThirdPerson, &vehicle, 16.0 / 9.0);
        let clip = camera.view_proj() * vehicle.position.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(clip.w > 0.0);
        assert!(ndc.x.abs() < 1.0 && ndc.y.abs() < 1.0);
    }
}
