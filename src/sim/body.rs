//! Kinematic body shared by ships, shots and pickups, plus steering helpers

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use super::obb::OrientedBox;
use crate::{heading, wrap_angle};

/// Position, heading and footprint of anything that moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    /// Per-axis distance covered per tick along the heading
    pub speed: Vec2,
    /// Heading in radians, wrapped to (-π, π]
    pub angle: f32,
    /// Maximum heading change per tick
    pub turn_speed: f32,
    pub size: Vec2,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            speed: Vec2::ZERO,
            angle: 0.0,
            turn_speed: 0.0,
            size,
        }
    }

    /// Collision box at the current position and heading
    pub fn bounding_box(&self) -> OrientedBox {
        OrientedBox::new(self.position, self.size, self.angle)
    }

    /// Unit vector along the current heading
    #[inline]
    pub fn heading(&self) -> Vec2 {
        heading(self.angle)
    }

    /// Step one tick along the heading
    pub fn advance(&mut self) {
        self.position += self.heading() * self.speed;
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = wrap_angle(angle);
    }

    pub fn turn_toward(&mut self, target: Vec2) {
        self.angle = turn_to_face(self.position, target, self.angle, self.turn_speed);
    }

    pub fn turn_broadside(&mut self, target: Vec2) {
        self.angle = turn_to_fire(self.position, target, self.angle, self.turn_speed);
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.position.distance(point)
    }

    /// Keep the whole unrotated footprint inside `[min, max]`
    pub fn clamp_to(&mut self, min: Vec2, max: Vec2) {
        let half = self.size / 2.0;
        let lo = min + half;
        let hi = (max - half).max(lo);
        self.position = self.position.clamp(lo, hi);
    }
}

/// Rotate `current` toward the bearing from `position` to `target`,
/// by no more than `turn_speed`.
pub fn turn_to_face(position: Vec2, target: Vec2, current: f32, turn_speed: f32) -> f32 {
    steer(position, target, current, turn_speed, 0.0)
}

/// Like [`turn_to_face`] but aims the beam at the target, presenting a broadside
pub fn turn_to_fire(position: Vec2, target: Vec2, current: f32, turn_speed: f32) -> f32 {
    steer(position, target, current, turn_speed, FRAC_PI_2)
}

fn steer(position: Vec2, target: Vec2, current: f32, turn_speed: f32, offset: f32) -> f32 {
    let to_target = target - position;
    let desired = to_target.y.atan2(to_target.x) + offset;
    let limit = turn_speed.abs();
    let delta = wrap_angle(desired - current).clamp(-limit, limit);
    wrap_angle(current + delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_turn_to_face_full_turn_converges() {
        let angle = turn_to_face(Vec2::ZERO, Vec2::new(0.0, 10.0), -2.5, TAU);
        assert!((angle - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_turn_to_face_takes_short_way() {
        // Facing just below +π, target just above -π: the short turn crosses the seam.
        let current = PI - 0.1;
        let target = Vec2::new((-PI + 0.1).cos(), (-PI + 0.1).sin());
        let angle = turn_to_face(Vec2::ZERO, target, current, 0.05);
        assert!((angle - (PI - 0.05)).abs() < 1e-5);
    }

    #[test]
    fn test_turn_to_fire_presents_broadside() {
        let angle = turn_to_fire(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.0, TAU);
        assert!((angle - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_advance_uses_per_axis_speed() {
        let mut body = Body::new(Vec2::ZERO, Vec2::splat(10.0));
        body.speed = Vec2::new(2.0, 3.0);
        body.set_angle(PI / 4.0);
        body.advance();
        let h = heading(PI / 4.0);
        assert!((body.position - Vec2::new(h.x * 2.0, h.y * 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_clamp_keeps_footprint_inside() {
        let mut body = Body::new(Vec2::new(-20.0, 500.0), Vec2::new(40.0, 20.0));
        body.clamp_to(Vec2::ZERO, Vec2::new(400.0, 300.0));
        assert_eq!(body.position, Vec2::new(20.0, 290.0));
    }

    proptest! {
        #[test]
        fn zero_turn_speed_holds_heading(
            current in -PI..PI,
            tx in -500.0f32..500.0,
            ty in -500.0f32..500.0,
        ) {
            let current = wrap_angle(current);
            let angle = turn_to_face(Vec2::ZERO, Vec2::new(tx, ty), current, 0.0);
            prop_assert_eq!(angle, current);
        }

        #[test]
        fn turn_never_exceeds_limit(
            current in -PI..PI,
            tx in -500.0f32..500.0,
            ty in -500.0f32..500.0,
            speed in 0.0f32..1.0,
        ) {
            let angle = turn_to_face(Vec2::ZERO, Vec2::new(tx, ty), current, speed);
            prop_assert!(wrap_angle(angle - current).abs() <= speed + 1e-5);
        }

        #[test]
        fn full_turn_points_at_target(
            current in -PI..PI,
            tx in 1.0f32..500.0,
            ty in -500.0f32..500.0,
        ) {
            let angle = turn_to_face(Vec2::ZERO, Vec2::new(tx, ty), current, TAU);
            prop_assert!(wrap_angle(angle - ty.atan2(tx)).abs() < 1e-4);
        }
    }
}
