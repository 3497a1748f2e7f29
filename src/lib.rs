//! Broadside - combat simulation core for a top-down arcade ship-combat game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision, ships, AI, spawning, game state)
//! - `config`: Data-driven ship roster and tunables

pub mod config;
pub mod sim;

pub use config::{ConfigError, PlayerClass, Roster};

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Game configuration constants
pub mod consts {
    /// Nominal frame length in milliseconds (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;
    /// Rows lost at the bottom of the arena while a boss is on the field
    pub const BOSS_ARENA_FLOOR_MARGIN: f32 = 50.0;

    /// Boss switches to firing within this distance of its staging point
    pub const BOSS_STAGING_TOLERANCE: f32 = 50.0;
    /// Salvos per burst (the burst ends on the salvo after this count)
    pub const BOSS_BURST_TOTAL: u32 = 10;
    /// Minimum spacing between salvos inside a burst
    pub const BOSS_BURST_PERIOD_MS: f64 = 200.0;
    /// Vertical wobble of boss salvo spawn points
    pub const BOSS_SALVO_WOBBLE: f32 = 5.0;
    /// Vertical wobble applied to boss shots each tick
    pub const BOSS_SHOT_AMPLITUDE: f32 = 2.5;
    /// Angular frequency of boss shot wobble (rad/s)
    pub const BOSS_SHOT_FREQUENCY: f32 = std::f32::consts::PI;
    /// Where the boss enters the arena
    pub const BOSS_ENTRY_X: f32 = 30.0;
    pub const BOSS_ENTRY_Y: f32 = 30.0;

    /// Pickup attraction reach beyond the two half-widths
    pub const PICKUP_ATTRACT_MARGIN: f32 = 15.0;
    /// Pickup turn rate while attracted (radians per tick)
    pub const PICKUP_ATTRACT_TURN: f32 = 10.0;
    /// Pickups start blinking at this fraction of their lifetime
    pub const PICKUP_BLINK_FRACTION: f64 = 0.55;
    /// Blink toggle period
    pub const PICKUP_BLINK_PERIOD_MS: f64 = 100.0;
    /// Health pickups restore this fraction of max health
    pub const HEALTH_PICKUP_FRACTION: f32 = 0.1;
    /// A kill drops one multiplier per this many points of score value
    pub const MULTIPLIER_DROP_DIVISOR: u32 = 5;

    /// Gap between the player and summoned escorts
    pub const ESCORT_BUFFER: f32 = 25.0;
}

/// Wrap an angle into (-π, π].
///
/// Angles already in range are returned untouched, so wrapping is exactly
/// idempotent. Non-finite input collapses to 0.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = PI - (PI - angle).rem_euclid(TAU);
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Unit vector pointing along `angle`
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Rotate `v` counter-clockwise by `angle` radians
#[inline]
pub fn rotate_vector(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_angle_boundaries() {
        assert_eq!(wrap_angle(PI), PI);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert_eq!(wrap_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_rotate_vector_quarter_turn() {
        let v = rotate_vector(Vec2::X, PI / 2.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn wrap_angle_stays_in_range(a in -1000.0f32..1000.0) {
            let w = wrap_angle(a);
            prop_assert!(w > -PI && w <= PI);
        }

        #[test]
        fn wrap_angle_is_idempotent(a in -1000.0f32..1000.0) {
            let w = wrap_angle(a);
            prop_assert_eq!(wrap_angle(w), w);
        }
    }
}
