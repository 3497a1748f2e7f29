//! Floating pickups dropped by sunk ships

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, turn_to_face};
use super::obb::OrientedBox;
use super::ship::Ship;
use crate::config::PickupConfig;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Adds one to the score multiplier
    Multiplier,
    /// Restores a tenth of max health
    Health,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub body: Body,
    pub spawned_at_ms: f64,
    pub lifetime_ms: f64,
    /// Blinking starts this long after spawn
    pub blink_at_ms: f64,
    pub last_blink_ms: f64,
    /// Currently drawn faded (blink phase)
    pub faded: bool,
    /// Caught by the player's pull; speed has been doubled
    pub attracted: bool,
    pub timed_out: bool,
}

impl Pickup {
    pub fn new(
        id: u32,
        kind: PickupKind,
        config: &PickupConfig,
        position: Vec2,
        angle: f32,
        now_ms: f64,
    ) -> Self {
        let mut body = Body::new(position, config.size);
        body.speed = Vec2::splat(config.speed);
        body.turn_speed = PICKUP_ATTRACT_TURN;
        body.set_angle(angle);
        let lifetime_ms = config.lifetime_ms as f64;
        Self {
            id,
            kind,
            body,
            spawned_at_ms: now_ms,
            lifetime_ms,
            blink_at_ms: lifetime_ms * PICKUP_BLINK_FRACTION,
            last_blink_ms: now_ms,
            faded: false,
            attracted: false,
            timed_out: false,
        }
    }

    pub fn bounding_box(&self) -> OrientedBox {
        self.body.bounding_box()
    }

    /// Drift, home in on a nearby player, blink and expire
    pub fn update(&mut self, player: &Ship, now_ms: f64) {
        let reach = player.body.size.x / 2.0 + self.body.size.x / 2.0 + PICKUP_ATTRACT_MARGIN;
        if self.body.distance_to(player.position()) <= reach {
            self.body.angle = turn_to_face(
                self.body.position,
                player.position(),
                self.body.angle,
                self.body.turn_speed,
            );
            if !self.attracted {
                self.attracted = true;
                self.body.speed *= 2.0;
            }
        }
        self.body.advance();

        let age = now_ms - self.spawned_at_ms;
        if age >= self.blink_at_ms && now_ms - self.last_blink_ms >= PICKUP_BLINK_PERIOD_MS {
            self.faded = !self.faded;
            self.last_blink_ms = now_ms;
        }
        if age >= self.lifetime_ms {
            self.timed_out = true;
        }
    }

    /// Apply a non-multiplier effect to the collector
    pub fn apply(&self, player: &mut Ship) {
        match self.kind {
            PickupKind::Health => player.give_health(player.max_health * HEALTH_PICKUP_FRACTION),
            PickupKind::Multiplier => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShipConfig;
    use crate::sim::Role;

    fn player_at(position: Vec2) -> Ship {
        Ship::new(1, Role::PlayerBrig, &ShipConfig::for_role(Role::PlayerBrig), position)
    }

    #[test]
    fn test_pickup_drifts_and_times_out() {
        let config = PickupConfig::default();
        let mut pickup = Pickup::new(9, PickupKind::Multiplier, &config, Vec2::ZERO, 0.0, 0.0);
        let player = player_at(Vec2::new(1000.0, 1000.0));

        pickup.update(&player, 16.0);
        assert!((pickup.body.position.x - 0.25).abs() < 1e-6);
        assert!(!pickup.faded);

        pickup.update(&player, 2750.0);
        assert!(pickup.faded);
        pickup.update(&player, 2800.0);
        assert!(pickup.faded, "blink toggles at most every 100 ms");
        pickup.update(&player, 2850.0);
        assert!(!pickup.faded);

        assert!(!pickup.timed_out);
        pickup.update(&player, 5000.0);
        assert!(pickup.timed_out);
    }

    #[test]
    fn test_attraction_doubles_speed_once() {
        let config = PickupConfig::default();
        let mut pickup = Pickup::new(9, PickupKind::Multiplier, &config, Vec2::new(50.0, 0.0), 0.0, 0.0);
        let player = player_at(Vec2::ZERO);

        pickup.update(&player, 16.0);
        assert!(pickup.attracted);
        assert_eq!(pickup.body.speed, Vec2::splat(0.5));
        // Now heading back toward the player
        assert!(pickup.body.position.x < 50.0);

        pickup.update(&player, 32.0);
        assert_eq!(pickup.body.speed, Vec2::splat(0.5));
    }

    #[test]
    fn test_health_pickup_restores_tenth() {
        let mut player = player_at(Vec2::ZERO);
        player.health = 50.0;
        let pickup = Pickup::new(3, PickupKind::Health, &PickupConfig::health(), Vec2::ZERO, 0.0, 0.0);
        pickup.apply(&mut player);
        assert_eq!(player.health, 60.0);
    }
}
