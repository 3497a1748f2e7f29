//! Cannon balls

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::obb::OrientedBox;

/// How a projectile travels each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Straight line along `direction`
    Linear,
    /// Straight line plus a vertical sine wobble driven by the session clock
    Sinusoidal {
        amplitude: f32,
        angular_frequency: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    /// Unit travel direction, fixed at spawn
    pub direction: Vec2,
    pub damage: f32,
    pub motion: Motion,
    /// Ships a piercing shot has already damaged
    #[serde(default)]
    pub struck: Vec<u32>,
}

impl Projectile {
    pub fn new(position: Vec2, direction: Vec2, angle: f32, speed: Vec2, size: Vec2, damage: f32) -> Self {
        let mut body = Body::new(position, size);
        body.speed = speed;
        body.set_angle(angle);
        Self {
            body,
            direction,
            damage,
            motion: Motion::Linear,
            struck: Vec::new(),
        }
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    /// Move one tick. `session_secs` drives the sinusoidal wobble.
    pub fn advance(&mut self, session_secs: f64) {
        self.body.position += self.direction * self.body.speed;
        if let Motion::Sinusoidal {
            amplitude,
            angular_frequency,
        } = self.motion
        {
            let phase = (angular_frequency as f64 * session_secs) as f32;
            self.body.position.y += amplitude * phase.sin();
            self.body.set_angle(phase.sin());
        }
    }

    pub fn bounding_box(&self) -> OrientedBox {
        self.body.bounding_box()
    }

    #[inline]
    pub fn has_struck(&self, ship_id: u32) -> bool {
        self.struck.contains(&ship_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_advance() {
        let mut p = Projectile::new(Vec2::ZERO, Vec2::Y, 0.0, Vec2::splat(4.0), Vec2::splat(10.0), 5.0);
        p.advance(0.0);
        p.advance(0.0);
        assert_eq!(p.body.position, Vec2::new(0.0, 8.0));
    }

    #[test]
    fn test_sinusoidal_adds_wobble() {
        let mut p = Projectile::new(Vec2::ZERO, Vec2::X, 0.0, Vec2::splat(4.0), Vec2::splat(10.0), 5.0)
            .with_motion(Motion::Sinusoidal {
                amplitude: 2.5,
                angular_frequency: std::f32::consts::PI,
            });
        // Quarter period: sin(π · 0.5) = 1
        p.advance(0.5);
        assert!((p.body.position.x - 4.0).abs() < 1e-5);
        assert!((p.body.position.y - 2.5).abs() < 1e-5);
        assert!((p.body.angle - 1.0).abs() < 1e-5);
    }
}
