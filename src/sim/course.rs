//! Course geometry
//!
//! The test ground is one walled corridor running toward -Z from the start
//! box, followed by a T-junction crossbar. Along the corridor, in driving
//! order: acceleration run, emergency-stop zone, hill with stop line, crest
//! run-off, junction mouth. The junction's left arm holds the exit gate.
//!
//! Geometry is built once per page load and reused across every reset.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::consts::GROUND_HEIGHT;
use crate::lerp;

/// A solid obstacle. Touching one fails the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallBox {
    pub center: Vec3,
    pub size: Vec3,
}

impl WallBox {
    pub const fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.center, self.size)
    }
}

/// The hill ramp. Climbing means driving toward -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HillSpec {
    pub x_min: f32,
    pub x_max: f32,
    /// Foot of the ramp (less negative)
    pub z_start: f32,
    /// Top of the ramp (more negative)
    pub z_end: f32,
    /// Ramp angle in radians
    pub angle: f32,
    /// Length of the crest run-off past `z_end` back down to flat ground
    pub run_off: f32,
}

impl Default for HillSpec {
    fn default() -> Self {
        Self {
            x_min: -3.5,
            x_max: 3.5,
            z_start: -40.0,
            z_end: -70.0,
            angle: 12.0 * PI / 180.0,
            run_off: 6.0,
        }
    }
}

impl HillSpec {
    /// Surface height at the top of the ramp
    pub fn peak_height(&self) -> f32 {
        GROUND_HEIGHT + self.angle.sin() * 2.0
    }

    #[inline]
    fn in_x_range(&self, x: f32) -> bool {
        x >= self.x_min && x <= self.x_max
    }

    /// Ground height at (x, z). Flat at `GROUND_HEIGHT` off the hill.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        if !self.in_x_range(x) {
            return GROUND_HEIGHT;
        }
        if z <= self.z_start && z >= self.z_end {
            let p = (self.z_start - z) / (self.z_start - self.z_end);
            return GROUND_HEIGHT + self.angle.sin() * p * 2.0;
        }
        let run_off_end = self.z_end - self.run_off;
        if self.run_off > 0.0 && z < self.z_end && z >= run_off_end {
            let t = (self.z_end - z) / self.run_off;
            return lerp(self.peak_height(), GROUND_HEIGHT, t);
        }
        GROUND_HEIGHT
    }

    /// Zone in which hill-start grading runs: the ramp plus 2 m either end
    pub fn zone(&self) -> Aabb {
        Aabb::new(
            Vec3::new(self.x_min, 0.0, self.z_end - 2.0),
            Vec3::new(self.x_max, 2.0, self.z_start + 2.0),
        )
    }
}

/// Named trigger volumes used for grading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    HillStopLine,
    HillZone,
    AccelStart,
    AccelEnd,
    EmergencyZone,
    JunctionEntry,
    JunctionExit,
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 7] = [
        TriggerKind::HillStopLine,
        TriggerKind::HillZone,
        TriggerKind::AccelStart,
        TriggerKind::AccelEnd,
        TriggerKind::EmergencyZone,
        TriggerKind::JunctionEntry,
        TriggerKind::JunctionExit,
    ];

    /// Whether the volume is painted on the road rather than an invisible
    /// grading region
    pub fn is_marking(&self) -> bool {
        !matches!(self, TriggerKind::HillZone | TriggerKind::JunctionEntry)
    }
}

/// All trigger volumes, one field per kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triggers {
    pub hill_stop_line: Aabb,
    pub hill_zone: Aabb,
    pub accel_start: Aabb,
    pub accel_end: Aabb,
    pub emergency_zone: Aabb,
    pub junction_entry: Aabb,
    pub junction_exit: Aabb,
}

/// Immutable course layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Walls in definition order (collision reports the first hit)
    pub walls: Vec<WallBox>,
    pub hill: HillSpec,
    pub triggers: Triggers,
}

/// Inner half-width of the main corridor
pub const CORRIDOR_HALF_WIDTH: f32 = 4.5;
/// Z where the corridor opens into the junction crossbar
pub const JUNCTION_NEAR_Z: f32 = -80.0;
/// Z of the crossbar's far kerb
pub const JUNCTION_FAR_Z: f32 = -92.0;
/// Half-length of the crossbar along X
pub const JUNCTION_HALF_LENGTH: f32 = 31.0;

impl Default for Course {
    fn default() -> Self {
        Self::standard()
    }
}

impl Course {
    /// The standard test ground
    pub fn standard() -> Self {
        let hill = HillSpec::default();
        let wall_h = 1.0;
        let wall_y = 0.5;
        let corridor_len = 5.0 - JUNCTION_NEAR_Z;
        let corridor_mid = (5.0 + JUNCTION_NEAR_Z) * 0.5;
        let crossbar_depth = JUNCTION_NEAR_Z - JUNCTION_FAR_Z;
        let crossbar_mid = (JUNCTION_NEAR_Z + JUNCTION_FAR_Z) * 0.5;
        let arm_len = JUNCTION_HALF_LENGTH - (CORRIDOR_HALF_WIDTH + 1.0);
        let arm_mid = (JUNCTION_HALF_LENGTH + CORRIDOR_HALF_WIDTH + 1.0) * 0.5;

        let walls = vec![
            // Corridor sides
            WallBox::new(
                Vec3::new(-(CORRIDOR_HALF_WIDTH + 0.5), wall_y, corridor_mid),
                Vec3::new(1.0, wall_h, corridor_len),
            ),
            WallBox::new(
                Vec3::new(CORRIDOR_HALF_WIDTH + 0.5, wall_y, corridor_mid),
                Vec3::new(1.0, wall_h, corridor_len),
            ),
            // Behind the start box
            WallBox::new(
                Vec3::new(0.0, wall_y, 5.5),
                Vec3::new(2.0 * CORRIDOR_HALF_WIDTH + 2.0, wall_h, 1.0),
            ),
            // Crossbar far kerb
            WallBox::new(
                Vec3::new(0.0, wall_y, JUNCTION_FAR_Z - 0.5),
                Vec3::new(2.0 * JUNCTION_HALF_LENGTH, wall_h, 1.0),
            ),
            // Crossbar near kerbs either side of the corridor mouth
            WallBox::new(
                Vec3::new(-arm_mid, wall_y, JUNCTION_NEAR_Z + 0.5),
                Vec3::new(arm_len, wall_h, 1.0),
            ),
            WallBox::new(
                Vec3::new(arm_mid, wall_y, JUNCTION_NEAR_Z + 0.5),
                Vec3::new(arm_len, wall_h, 1.0),
            ),
            // Crossbar end caps
            WallBox::new(
                Vec3::new(-(JUNCTION_HALF_LENGTH + 0.5), wall_y, crossbar_mid),
                Vec3::new(1.0, wall_h, crossbar_depth + 2.0),
            ),
            WallBox::new(
                Vec3::new(JUNCTION_HALF_LENGTH + 0.5, wall_y, crossbar_mid),
                Vec3::new(1.0, wall_h, crossbar_depth + 2.0),
            ),
        ];

        // Markings stop short of the kerbs
        let lane_width = 2.0 * CORRIDOR_HALF_WIDTH - 0.5;
        let triggers = Triggers {
            hill_stop_line: Aabb::from_center_size(
                Vec3::new(0.0, 0.8, -66.0),
                Vec3::new(6.0, 0.1, 0.3),
            ),
            hill_zone: hill.zone(),
            accel_start: Aabb::from_center_size(
                Vec3::new(0.0, 0.5, -6.0),
                Vec3::new(lane_width, 1.0, 0.3),
            ),
            accel_end: Aabb::from_center_size(
                Vec3::new(0.0, 0.5, -24.0),
                Vec3::new(lane_width, 1.0, 0.3),
            ),
            emergency_zone: Aabb::from_center_size(
                Vec3::new(0.0, 0.5, -31.0),
                Vec3::new(lane_width, 1.0, 8.0),
            ),
            junction_entry: Aabb::from_center_size(
                Vec3::new(0.0, 0.5, JUNCTION_NEAR_Z + 1.0),
                Vec3::new(lane_width, 1.0, 2.0),
            ),
            junction_exit: Aabb::from_center_size(
                Vec3::new(-(JUNCTION_HALF_LENGTH - 5.0), 0.5, crossbar_mid),
                Vec3::new(4.0, 1.0, crossbar_depth - 0.2),
            ),
        };

        log::debug!(
            "Course built: {} walls, hill z {}..{}",
            walls.len(),
            hill.z_start,
            hill.z_end
        );

        Self {
            walls,
            hill,
            triggers,
        }
    }

    /// Ground height at (x, z)
    #[inline]
    pub fn ground_height(&self, x: f32, z: f32) -> f32 {
        self.hill.height_at(x, z)
    }

    pub fn trigger(&self, kind: TriggerKind) -> &Aabb {
        match kind {
            TriggerKind::HillStopLine => &self.triggers.hill_stop_line,
            TriggerKind::HillZone => &self.triggers.hill_zone,
            TriggerKind::AccelStart => &self.triggers.accel_start,
            TriggerKind::AccelEnd => &self.triggers.accel_end,
            TriggerKind::EmergencyZone => &self.triggers.emergency_zone,
            TriggerKind::JunctionEntry => &self.triggers.junction_entry,
            TriggerKind::JunctionExit => &self.triggers.junction_exit,
        }
    }

    /// Box around every wall (used for camera far plane and ground sizing)
    pub fn extent(&self) -> Option<Aabb> {
        self.walls
            .iter()
            .map(WallBox::bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}
