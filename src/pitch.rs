//! Pitch coordinate conventions.
//!
//! Coordinates follow the 120x80-yard convention the demo data uses:
//! x runs 0 -> `length` toward the attacking goal, y runs 0 -> `width`
//! across the pitch, goal centre at (length, width / 2).

use serde::Serialize;

use crate::data::models::PitchZone;
use crate::model::ThreatGrid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pitch {
    /// Goal line to goal line, yards
    pub length: f64,
    /// Touchline to touchline, yards
    pub width: f64,
}

impl Default for Pitch {
    fn default() -> Self {
        Pitch {
            length: 120.0,
            width: 80.0,
        }
    }
}

impl Pitch {
    pub fn goal_centre(&self) -> (f64, f64) {
        (self.length, self.width / 2.0)
    }

    /// Derive (distance, angle) for a shot taken at (x, y).
    ///
    /// Distance is Euclidean to the goal centre. Angle is the signed
    /// angle off the goal-centre line in degrees: 0 straight on,
    /// ±90 level with the goal line, beyond ±90 behind it (where the
    /// estimator's angle modifier bottoms out at zero).
    pub fn shot_geometry(&self, x: f64, y: f64) -> (f64, f64) {
        let (gx, gy) = self.goal_centre();
        let dx = gx - x;
        let dy = y - gy;
        let distance = (dx * dx + dy * dy).sqrt();
        let angle = dy.atan2(dx).to_degrees();
        (distance, angle)
    }

    /// Map pitch coordinates to a threat-grid zone by scaled division,
    /// clamped into bounds. The grid errors on bad indices; this mapping
    /// is the caller-side clamp that keeps on-pitch (and slightly
    /// off-pitch) coordinates valid.
    pub fn zone_for(&self, grid: &ThreatGrid, x: f64, y: f64) -> PitchZone {
        let col = (x / self.length * grid.cols() as f64)
            .floor()
            .clamp(0.0, (grid.cols() - 1) as f64) as usize;
        let row = (y / self.width * grid.rows() as f64)
            .floor()
            .clamp(0.0, (grid.rows() - 1) as f64) as usize;
        PitchZone { row, col }
    }
}
