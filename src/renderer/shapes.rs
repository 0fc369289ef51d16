//! Mesh generation for the course and the vehicle
//!
//! Everything is built from boxes and flat quads, emitted as non-indexed
//! triangle lists.

use glam::{Mat3, Mat4, Vec3};

use super::vertex::{Vertex, colors};
use crate::sim::{Course, PartRole, RigPose, TriggerKind, VehicleRig, VehicleState};

/// Drop from the vehicle reference height to the road surface under it
/// (wheel hub offset plus wheel radius)
pub const SURFACE_DROP: f32 = 0.65;
/// Lift for paint so it does not z-fight with the road
const PAINT_LIFT: f32 = 0.02;
/// Steps used to tessellate the ramp and its run-off
const RAMP_STEPS: usize = 24;

/// Faces of the unit cube: outward normal, then the four corners
const CUBE_FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    (
        [1.0, 0.0, 0.0],
        [[0.5, -0.5, 0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5]],
    ),
    (
        [-1.0, 0.0, 0.0],
        [[-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5]],
    ),
    (
        [0.0, 1.0, 0.0],
        [[-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5]],
    ),
    (
        [0.0, -1.0, 0.0],
        [[-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5]],
    ),
    (
        [0.0, 0.0, 1.0],
        [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]],
    ),
    (
        [0.0, 0.0, -1.0],
        [[0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5]],
    ),
];

/// Push two triangles for a quad given in counter-clockwise order
fn push_quad(out: &mut Vec<Vertex>, corners: [Vec3; 4], normal: Vec3, color: [f32; 4]) {
    let n = normal.to_array();
    for i in [0, 1, 2, 0, 2, 3] {
        out.push(Vertex::new(corners[i].to_array(), n, color));
    }
}

/// Unit cube transformed by `transform` (36 vertices)
pub fn cuboid(out: &mut Vec<Vertex>, transform: Mat4, color: [f32; 4]) {
    let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();
    for (normal, corners) in CUBE_FACES {
        let n = (normal_matrix * Vec3::from(normal)).normalize_or_zero();
        let corners = corners.map(|c| transform.transform_point3(Vec3::from(c)));
        push_quad(out, corners, n, color);
    }
}

/// Axis-aligned box from center and size
pub fn boxed(out: &mut Vec<Vertex>, center: Vec3, size: Vec3, color: [f32; 4]) {
    cuboid(
        out,
        Mat4::from_scale_rotation_translation(size, glam::Quat::IDENTITY, center),
        color,
    );
}

/// Horizontal quad at height `y`
fn flat_quad(out: &mut Vec<Vertex>, min: (f32, f32), max: (f32, f32), y: f32, color: [f32; 4]) {
    push_quad(
        out,
        [
            Vec3::new(min.0, y, max.1),
            Vec3::new(max.0, y, max.1),
            Vec3::new(max.0, y, min.1),
            Vec3::new(min.0, y, min.1),
        ],
        Vec3::Y,
        color,
    );
}

/// Static course geometry: ground, ramp, walls and road markings
pub fn course_mesh(course: &Course) -> Vec<Vertex> {
    let mut out = Vec::new();

    // Ground, sized to the walls with a margin
    let ground_y = crate::consts::GROUND_HEIGHT - SURFACE_DROP;
    let (gmin, gmax) = match course.extent() {
        Some(b) => (b.min - Vec3::splat(60.0), b.max + Vec3::splat(60.0)),
        None => (Vec3::splat(-500.0), Vec3::splat(500.0)),
    };
    flat_quad(&mut out, (gmin.x, gmin.z), (gmax.x, gmax.z), ground_y, colors::GROUND);

    // Ramp surface following the height profile, foot to end of run-off
    let hill = &course.hill;
    let z_far = hill.z_end - hill.run_off;
    for i in 0..RAMP_STEPS {
        let z0 = hill.z_start + (z_far - hill.z_start) * i as f32 / RAMP_STEPS as f32;
        let z1 = hill.z_start + (z_far - hill.z_start) * (i + 1) as f32 / RAMP_STEPS as f32;
        let y0 = course.ground_height(0.0, z0) - SURFACE_DROP + PAINT_LIFT * 0.5;
        let y1 = course.ground_height(0.0, z1) - SURFACE_DROP + PAINT_LIFT * 0.5;
        let normal = Vec3::new(0.0, z0 - z1, y1 - y0).normalize_or_zero();
        push_quad(
            &mut out,
            [
                Vec3::new(hill.x_min, y0, z0),
                Vec3::new(hill.x_max, y0, z0),
                Vec3::new(hill.x_max, y1, z1),
                Vec3::new(hill.x_min, y1, z1),
            ],
            normal,
            colors::RAMP,
        );
    }

    // Walls keep their collision top but reach down to the road surface
    for wall in &course.walls {
        let b = wall.bounds();
        let bottom = b.min.y.min(ground_y);
        boxed(
            &mut out,
            Vec3::new(wall.center.x, (bottom + b.max.y) * 0.5, wall.center.z),
            Vec3::new(wall.size.x, b.max.y - bottom, wall.size.z),
            colors::WALL,
        );
    }

    for kind in TriggerKind::ALL.into_iter().filter(TriggerKind::is_marking) {
        let color = match kind {
            TriggerKind::HillStopLine => colors::LINE,
            TriggerKind::AccelStart | TriggerKind::AccelEnd => colors::ACCEL_LINE,
            TriggerKind::EmergencyZone => colors::EMERGENCY_ZONE,
            _ => colors::JUNCTION_EXIT,
        };
        let b = course.trigger(kind);
        let c = b.center();
        let y = course.ground_height(c.x, c.z) - SURFACE_DROP + PAINT_LIFT;
        flat_quad(&mut out, (b.min.x, b.min.z), (b.max.x, b.max.z), y, color);
    }

    out
}

/// Vehicle parts posed for this frame
pub fn vehicle_mesh(rig: &VehicleRig, vehicle: &VehicleState, pose: &RigPose) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(rig.parts.len() * 36);
    for role in [PartRole::Body, PartRole::FrontWheel, PartRole::RearWheel] {
        let color = if role.is_wheel() {
            colors::WHEEL
        } else {
            colors::BODY
        };
        for part in rig.parts_with_role(role) {
            cuboid(&mut out, rig.part_transform(part, vehicle, pose), color);
        }
    }
    out
}

/// Beacon above the emergency-stop zone while the stop signal is showing
pub fn stop_signal_mesh(course: &Course) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(36);
    let zone = course.trigger(TriggerKind::EmergencyZone);
    let c = zone.center();
    boxed(
        &mut out,
        Vec3::new(c.x, 4.0, zone.max.z),
        Vec3::new(zone.size().x, 0.6, 0.3),
        colors::EMERGENCY_ACTIVE,
    );
    out
}
