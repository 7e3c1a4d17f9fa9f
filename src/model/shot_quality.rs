//! Shot-quality (xG) heuristic.
//!
//! A deliberately simple, illustrative model: four multiplicative terms
//! with hand-picked constants, not a fitted statistical model. The point
//! is that the shape is right: chances decay with distance, tight angles
//! hurt, headers are harder than volleys, penalties are near-certain.
//!
//! The formula:
//!   1. `base = max(floor, intercept - distance / decay)`, linear decay
//!      with a floor, so even 40-yard efforts keep a residual chance
//!   2. `angle_mod = 1 - |angle| / 90`, linear falloff to zero at ±90°
//!   3. shot-type and assist-type multipliers from the lookup tables
//!   4. the product, capped
//!
//! All constants live in [`ShotModel`] so a differently-tuned variant is
//! configuration data, not a second copy of the formula. `Default` is the
//! reference tuning. Units are yards; the cap is 0.9.

use serde::{Deserialize, Serialize};

use crate::data::models::{AssistType, Shot, ShotType};

/// Multiplier per shot technique. Headers are hard, volleys are
/// high-value when they come off, penalties dwarf everything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotTypeTable {
    pub foot: f64,
    pub header: f64,
    pub volley: f64,
    pub penalty: f64,
}

impl Default for ShotTypeTable {
    fn default() -> Self {
        ShotTypeTable {
            foot: 1.0,
            header: 0.7,
            volley: 1.2,
            penalty: 3.0,
        }
    }
}

/// Multiplier per assist type. Through balls put the shooter in stride;
/// corners arrive in a crowd.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssistTypeTable {
    pub none: f64,
    pub cross: f64,
    pub through_ball: f64,
    pub corner: f64,
    pub free_kick: f64,
}

impl Default for AssistTypeTable {
    fn default() -> Self {
        AssistTypeTable {
            none: 1.0,
            cross: 0.8,
            through_ball: 1.3,
            corner: 0.6,
            free_kick: 1.1,
        }
    }
}

/// The tunable constants of the heuristic. Built once at startup and
/// held by reference wherever needed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotModel {
    /// Base probability at distance 0
    pub base_intercept: f64,
    /// Yards over which the base loses 1.0 of probability
    pub base_decay_yards: f64,
    /// Base probability never drops below this
    pub base_floor: f64,
    /// Angle (degrees) at which the angle modifier reaches zero
    pub angle_falloff_deg: f64,
    /// Hard cap on the final score
    pub cap: f64,
    pub shot_types: ShotTypeTable,
    pub assist_types: AssistTypeTable,
}

impl Default for ShotModel {
    fn default() -> Self {
        ShotModel {
            base_intercept: 0.8,
            base_decay_yards: 27.0,
            base_floor: 0.1,
            angle_falloff_deg: 90.0,
            cap: 0.9,
            shot_types: ShotTypeTable::default(),
            assist_types: AssistTypeTable::default(),
        }
    }
}

impl ShotModel {
    /// Estimate the scoring probability of a shot. Returns a value in
    /// [0, cap]. Pure and total: bad inputs saturate, they never error.
    /// Negative distance is treated as 0 and angles beyond the falloff
    /// range pin the angle modifier at 0.
    pub fn estimate(&self, shot: Shot) -> f64 {
        let base = self.base_probability(shot.distance);
        let angle_mod = self.angle_modifier(shot.angle);
        let raw = base
            * angle_mod
            * self.shot_type_multiplier(shot.shot_type)
            * self.assist_type_multiplier(shot.assist_type);
        raw.min(self.cap)
    }

    /// Linear distance decay with a floor.
    pub fn base_probability(&self, distance: f64) -> f64 {
        let distance = distance.max(0.0);
        (self.base_intercept - distance / self.base_decay_yards).max(self.base_floor)
    }

    /// Linear falloff to zero at `angle_falloff_deg`, clamped so that
    /// out-of-range angles contribute zero rather than going negative.
    pub fn angle_modifier(&self, angle: f64) -> f64 {
        (1.0 - angle.abs() / self.angle_falloff_deg).clamp(0.0, 1.0)
    }

    pub fn shot_type_multiplier(&self, shot_type: ShotType) -> f64 {
        match shot_type {
            ShotType::Foot => self.shot_types.foot,
            ShotType::Header => self.shot_types.header,
            ShotType::Volley => self.shot_types.volley,
            ShotType::Penalty => self.shot_types.penalty,
        }
    }

    pub fn assist_type_multiplier(&self, assist_type: AssistType) -> f64 {
        match assist_type {
            AssistType::None => self.assist_types.none,
            AssistType::Cross => self.assist_types.cross,
            AssistType::ThroughBall => self.assist_types.through_ball,
            AssistType::Corner => self.assist_types.corner,
            AssistType::FreeKick => self.assist_types.free_kick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn shot(distance: f64, angle: f64, shot_type: ShotType, assist_type: AssistType) -> Shot {
        Shot {
            distance,
            angle,
            shot_type,
            assist_type,
        }
    }

    #[test]
    fn central_close_range_foot_shot() {
        let m = ShotModel::default();
        // 10 yards out, straight on: base = 0.8 - 10/27 ≈ 0.4296
        let p = m.estimate(shot(10.0, 0.0, ShotType::Foot, AssistType::None));
        assert_relative_eq!(p, 0.8 - 10.0 / 27.0, epsilon = 1e-9);
    }

    #[test]
    fn penalty_clamps_at_cap() {
        let m = ShotModel::default();
        let foot = m.estimate(shot(10.0, 0.0, ShotType::Foot, AssistType::None));
        let pen = m.estimate(shot(10.0, 0.0, ShotType::Penalty, AssistType::None));
        // foot ≈ 0.430; penalty = min(0.430 * 3.0, 0.9) = 0.9
        assert!(pen > foot);
        assert_relative_eq!(pen, 0.9, epsilon = 1e-9);
    }

    #[test]
    fn monotone_non_increasing_in_distance() {
        let m = ShotModel::default();
        let mut prev = f64::INFINITY;
        for step in 0..200 {
            let d = step as f64 * 0.25;
            let p = m.estimate(shot(d, 20.0, ShotType::Volley, AssistType::ThroughBall));
            assert!(
                p <= prev + 1e-12,
                "score increased with distance at {}yd: {} -> {}",
                d,
                prev,
                p
            );
            prev = p;
        }
    }

    #[test]
    fn distance_floor_pins_long_range_scores() {
        let m = ShotModel::default();
        // Beyond 18.9yd the base is pinned at 0.1, so the score stops moving
        let p1 = m.estimate(shot(19.0, 30.0, ShotType::Header, AssistType::Cross));
        let p2 = m.estimate(shot(45.0, 30.0, ShotType::Header, AssistType::Cross));
        assert_relative_eq!(p1, p2, epsilon = 1e-9);
        let angle_mod = 1.0 - 30.0 / 90.0;
        assert_relative_eq!(p1, 0.1 * angle_mod * 0.7 * 0.8, epsilon = 1e-9);
    }

    #[test]
    fn angle_symmetry() {
        let m = ShotModel::default();
        for a in [5.0, 17.5, 45.0, 60.0, 89.9] {
            let left = m.estimate(shot(12.0, -a, ShotType::Foot, AssistType::Cross));
            let right = m.estimate(shot(12.0, a, ShotType::Foot, AssistType::Cross));
            assert_relative_eq!(left, right, epsilon = 1e-12);
        }
    }

    #[test]
    fn angle_ninety_kills_the_shot() {
        let m = ShotModel::default();
        let p = m.estimate(shot(6.0, 90.0, ShotType::Volley, AssistType::ThroughBall));
        assert_relative_eq!(p, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn angle_beyond_range_clamps_to_zero() {
        let m = ShotModel::default();
        // Behind the goal line the geometry produces |angle| > 90; the
        // modifier must clamp rather than go negative
        let p = m.estimate(shot(6.0, 135.0, ShotType::Foot, AssistType::None));
        assert_relative_eq!(p, 0.0, epsilon = 1e-12);
        assert_relative_eq!(m.angle_modifier(-170.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn negative_distance_saturates() {
        let m = ShotModel::default();
        let at_zero = m.estimate(shot(0.0, 0.0, ShotType::Foot, AssistType::None));
        let negative = m.estimate(shot(-3.0, 0.0, ShotType::Foot, AssistType::None));
        assert_relative_eq!(at_zero, negative, epsilon = 1e-12);
    }

    #[test]
    fn assist_ordering() {
        let m = ShotModel::default();
        let base = shot(14.0, 10.0, ShotType::Foot, AssistType::None);
        let through = m.estimate(Shot {
            assist_type: AssistType::ThroughBall,
            ..base
        });
        let corner = m.estimate(Shot {
            assist_type: AssistType::Corner,
            ..base
        });
        let none = m.estimate(base);
        assert!(through > none, "through ball should raise the score");
        assert!(corner < none, "corner should lower the score");
    }

    #[test]
    fn full_range_sweep_stays_in_bounds() {
        let m = ShotModel::default();
        for shot_type in [
            ShotType::Foot,
            ShotType::Header,
            ShotType::Volley,
            ShotType::Penalty,
        ] {
            for assist_type in [
                AssistType::None,
                AssistType::Cross,
                AssistType::ThroughBall,
                AssistType::Corner,
                AssistType::FreeKick,
            ] {
                for d in 0..50 {
                    for a in -9..=9 {
                        let p = m.estimate(shot(
                            d as f64,
                            a as f64 * 10.0,
                            shot_type,
                            assist_type,
                        ));
                        assert!(
                            (0.0..=0.9).contains(&p),
                            "out of range for d={} a={} {:?}/{:?}: {:.4}",
                            d,
                            a * 10,
                            shot_type,
                            assist_type,
                            p
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn custom_cap_is_respected() {
        let m = ShotModel {
            cap: 1.0,
            ..ShotModel::default()
        };
        let pen = m.estimate(shot(2.0, 0.0, ShotType::Penalty, AssistType::None));
        // base at 2yd ≈ 0.726; * 3.0 = 2.18, capped at the configured 1.0
        assert_relative_eq!(pen, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn determinism() {
        let m = ShotModel::default();
        let s = shot(23.0, -41.0, ShotType::Header, AssistType::FreeKick);
        assert_relative_eq!(m.estimate(s), m.estimate(s), epsilon = 0.0);
    }
}
