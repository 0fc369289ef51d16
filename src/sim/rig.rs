//! Vehicle rig descriptor
//!
//! The car is an arena of parts, each tagged with the role it plays. Roles
//! drive wheel spin, steering and body lean, and the rig's combined extents
//! are the collision footprint. The rig is built once; nothing here is
//! inferred from mesh names.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::Footprint;
use super::vehicle::VehicleState;
use crate::consts::{BODY_LEAN, MAX_STEER_ANGLE, WHEEL_RADIUS, WHEEL_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartRole {
    Body,
    FrontWheel,
    RearWheel,
}

impl PartRole {
    pub fn is_wheel(&self) -> bool {
        matches!(self, PartRole::FrontWheel | PartRole::RearWheel)
    }
}

/// One box-shaped part, positioned relative to the vehicle reference point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigPart {
    pub name: String,
    pub role: PartRole,
    pub offset: Vec3,
    /// Full extents along local X, Y, Z
    pub size: Vec3,
}

impl RigPart {
    fn new(name: &str, role: PartRole, offset: Vec3, size: Vec3) -> Self {
        Self {
            name: name.to_string(),
            role,
            offset,
            size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRig {
    pub parts: Vec<RigPart>,
}

impl Default for VehicleRig {
    fn default() -> Self {
        Self::fallback()
    }
}

impl VehicleRig {
    /// Stock car: a 1.8 x 0.8 x 3.0 body on four wheels
    pub fn fallback() -> Self {
        let wheel_size = Vec3::new(WHEEL_WIDTH, WHEEL_RADIUS * 2.0, WHEEL_RADIUS * 2.0);
        let mut parts = vec![RigPart::new(
            "body",
            PartRole::Body,
            Vec3::ZERO,
            Vec3::new(1.8, 0.8, 3.0),
        )];
        for (name, x, z) in [
            ("wheel_fl", -0.8, -1.1),
            ("wheel_fr", 0.8, -1.1),
            ("wheel_rl", -0.8, 1.1),
            ("wheel_rr", 0.8, 1.1),
        ] {
            // Forward is -Z, so the front axle sits at negative z
            let role = if z < 0.0 {
                PartRole::FrontWheel
            } else {
                PartRole::RearWheel
            };
            parts.push(RigPart::new(name, role, Vec3::new(x, -0.3, z), wheel_size));
        }
        Self { parts }
    }

    pub fn parts_with_role(&self, role: PartRole) -> impl Iterator<Item = &RigPart> {
        self.parts.iter().filter(move |p| p.role == role)
    }

    /// Collision extents covering every part
    pub fn footprint(&self) -> Footprint {
        if self.parts.is_empty() {
            return Footprint::default();
        }
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for part in &self.parts {
            let half = part.size * 0.5;
            min = min.min(part.offset - half);
            max = max.max(part.offset + half);
        }
        Footprint {
            half_width: (-min.x).max(max.x),
            half_length: (-min.z).max(max.z),
            below: -min.y,
            above: max.y,
        }
    }

    /// Model matrix of a unit cube scaled and placed as `part`
    pub fn part_transform(&self, part: &RigPart, vehicle: &VehicleState, pose: &RigPose) -> Mat4 {
        let root = Mat4::from_rotation_translation(
            Quat::from_rotation_y(-vehicle.yaw),
            vehicle.position,
        );
        let local = match part.role {
            PartRole::Body => Quat::from_rotation_z(pose.lean),
            PartRole::FrontWheel => {
                Quat::from_rotation_y(-pose.wheel_steer) * Quat::from_rotation_x(-pose.wheel_roll)
            }
            PartRole::RearWheel => Quat::from_rotation_x(-pose.wheel_roll),
        };
        root * Mat4::from_scale_rotation_translation(part.size, local, part.offset)
    }
}

/// Animated state of the rig (presentation only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RigPose {
    /// Accumulated wheel rotation (radians)
    pub wheel_roll: f32,
    /// Front wheel yaw relative to the body (radians)
    pub wheel_steer: f32,
    /// Body roll about the forward axis (radians)
    pub lean: f32,
}

impl RigPose {
    pub fn advance(&mut self, vehicle: &VehicleState, dt: f32) {
        self.wheel_roll = (self.wheel_roll + vehicle.speed * dt / WHEEL_RADIUS)
            .rem_euclid(std::f32::consts::TAU);
        self.wheel_steer = vehicle.steer * MAX_STEER_ANGLE;
        self.lean = -vehicle.steer * BODY_LEAN;
    }
}
