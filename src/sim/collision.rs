//! Vehicle bounding volume, wall collisions and trigger membership
//!
//! The vehicle is boxed as the axis-aligned bound of its footprint rotated by
//! yaw, the same box a renderer would compute from the car's meshes. Walls
//! and triggers are plain AABBs, so every test here is a box-box overlap.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::course::{Triggers, WallBox};

/// Physical extents of the vehicle relative to its reference point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Half extent across the car (local X)
    pub half_width: f32,
    /// Half extent along the car (local Z)
    pub half_length: f32,
    /// Distance from the reference point down to the wheel bottoms
    pub below: f32,
    /// Distance from the reference point up to the roof
    pub above: f32,
}

impl Default for Footprint {
    /// Extents of the stock car: 1.8 x 0.8 x 3.0 body with 0.35 m wheels
    /// hung 0.3 m below centre
    fn default() -> Self {
        Self {
            half_width: 0.95,
            half_length: 1.5,
            below: 0.65,
            above: 0.4,
        }
    }
}

impl Footprint {
    /// World-space bounding box at the given pose
    pub fn bounds_at(&self, position: Vec3, yaw: f32) -> Aabb {
        let (s, c) = (yaw.sin().abs(), yaw.cos().abs());
        let hx = c * self.half_width + s * self.half_length;
        let hz = s * self.half_width + c * self.half_length;
        Aabb {
            min: Vec3::new(position.x - hx, position.y - self.below, position.z - hz),
            max: Vec3::new(position.x + hx, position.y + self.above, position.z + hz),
        }
    }
}

/// First wall (in definition order) the vehicle box overlaps
pub fn first_wall_hit(vehicle: &Aabb, walls: &[WallBox]) -> Option<usize> {
    walls
        .iter()
        .position(|wall| vehicle.intersects(&wall.bounds()))
}

/// Which trigger volumes the vehicle overlaps this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerHits {
    pub hill_stop_line: bool,
    pub hill_zone: bool,
    pub accel_start: bool,
    pub accel_end: bool,
    pub emergency_zone: bool,
    pub junction_entry: bool,
    pub junction_exit: bool,
}

impl TriggerHits {
    pub fn test(vehicle: &Aabb, triggers: &Triggers) -> Self {
        Self {
            hill_stop_line: vehicle.intersects(&triggers.hill_stop_line),
            hill_zone: vehicle.intersects(&triggers.hill_zone),
            accel_start: vehicle.intersects(&triggers.accel_start),
            accel_end: vehicle.intersects(&triggers.accel_end),
            emergency_zone: vehicle.intersects(&triggers.emergency_zone),
            junction_entry: vehicle.intersects(&triggers.junction_entry),
            junction_exit: vehicle.intersects(&triggers.junction_exit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::course::Course;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_bounds_axis_aligned_heading() {
        let fp = Footprint::default();
        let b = fp.bounds_at(Vec3::new(0.0, 0.5, 0.0), 0.0);
        assert!((b.min.x + 0.95).abs() < 1e-5);
        assert!((b.max.z - 1.5).abs() < 1e-5);
        assert!((b.min.y - (0.5 - 0.65)).abs() < 1e-5);
        assert!((b.max.y - 0.9).abs() < 1e-5);
    }

    #[test]
    fn test_bounds_swap_when_turned_sideways() {
        let fp = Footprint::default();
        let b = fp.bounds_at(Vec3::ZERO, FRAC_PI_2);
        assert!((b.max.x - 1.5).abs() < 1e-4);
        assert!((b.max.z - 0.95).abs() < 1e-4);
    }

    #[test]
    fn test_bounds_grow_on_diagonal() {
        let fp = Footprint::default();
        let straight = fp.bounds_at(Vec3::ZERO, 0.0);
        let diagonal = fp.bounds_at(Vec3::ZERO, FRAC_PI_2 * 0.5);
        assert!(diagonal.size().x > straight.size().x);
        assert!(diagonal.size().x < straight.size().z + straight.size().x);
    }

    #[test]
    fn test_spawn_is_collision_free() {
        let course = Course::standard();
        let b = Footprint::default().bounds_at(Vec3::new(0.0, 0.5, 0.0), 0.0);
        assert_eq!(first_wall_hit(&b, &course.walls), None);
        assert_eq!(TriggerHits::test(&b, &course.triggers), TriggerHits::default());
    }

    #[test]
    fn test_first_wall_hit_reports_definition_order() {
        let course = Course::standard();
        // Wide enough to reach both corridor walls
        let b = Aabb::from_center_size(Vec3::new(0.0, 0.5, -20.0), Vec3::new(12.0, 1.0, 1.0));
        assert_eq!(first_wall_hit(&b, &course.walls), Some(0));

        let right_only =
            Aabb::from_center_size(Vec3::new(4.2, 0.5, -20.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(first_wall_hit(&right_only, &course.walls), Some(1));
    }

    #[test]
    fn test_trigger_hits_on_stop_line() {
        let course = Course::standard();
        let y = course.ground_height(0.0, -66.0);
        let b = Footprint::default().bounds_at(Vec3::new(0.0, y, -66.0), 0.0);
        let hits = TriggerHits::test(&b, &course.triggers);
        assert!(hits.hill_stop_line);
        assert!(hits.hill_zone);
        assert!(!hits.emergency_zone);
    }
}
