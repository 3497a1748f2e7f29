//! Player special ability
//!
//! Cycle: Recharging -> Charged -> Activated -> Recharging. Activation
//! snapshots the stats it changes and deactivation puts them back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ship::{Brain, Ship};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityState {
    Recharging,
    Charged,
    Activated,
}

/// Modifier set applied while the ability runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Brig: invulnerable ramming run, guns stowed
    Ram,
    /// Frigate: slower, harder-hitting, piercing fire on all four sides
    Barrage,
    /// Man-of-war: drops anchor and calls in escorts
    Anchor,
}

/// Stats overwritten by activation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub speed: Vec2,
    pub damage: f32,
    pub rate_of_fire_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub kind: AbilityKind,
    pub state: AbilityState,
    pub activated_at_ms: f64,
    pub recharge_started_at_ms: f64,
    pub duration_ms: f64,
    pub recharge_ms: f64,
    /// Present only while activated
    pub snapshot: Option<StatSnapshot>,
}

impl Ability {
    pub fn new(kind: AbilityKind, duration_ms: f64, recharge_ms: f64) -> Self {
        Self {
            kind,
            state: AbilityState::Recharging,
            activated_at_ms: 0.0,
            recharge_started_at_ms: 0.0,
            duration_ms,
            recharge_ms,
            snapshot: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == AbilityState::Activated
    }
}

/// Speed of the brig during a ramming run
const RAM_SPEED: f32 = 6.5;
const RAM_DAMAGE_FACTOR: f32 = 5.0;
const BARRAGE_DAMAGE_BONUS: f32 = 5.0;
const BARRAGE_RELOAD_BONUS_MS: f64 = 100.0;

impl Ship {
    pub fn ability_state(&self) -> Option<AbilityState> {
        self.ability().map(|a| a.state)
    }

    pub fn ability_active(&self) -> bool {
        self.ability().is_some_and(Ability::is_active)
    }

    /// Start the ability. Only succeeds from `Charged`.
    pub fn activate_ability(&mut self, now_ms: f64) -> bool {
        let Brain::Player(ability) = &mut self.brain else {
            return false;
        };
        if ability.state != AbilityState::Charged {
            return false;
        }

        ability.snapshot = Some(StatSnapshot {
            speed: self.body.speed,
            damage: self.damage,
            rate_of_fire_ms: self.rate_of_fire_ms,
        });
        ability.state = AbilityState::Activated;
        ability.activated_at_ms = now_ms;
        self.damage_resistance = 1.0;

        match ability.kind {
            AbilityKind::Ram => {
                self.damage *= RAM_DAMAGE_FACTOR;
                self.body.speed = Vec2::splat(RAM_SPEED);
                self.rams_on_contact = true;
                self.holds_fire = true;
            }
            AbilityKind::Barrage => {
                self.damage += BARRAGE_DAMAGE_BONUS;
                self.body.speed /= 2.0;
                self.rate_of_fire_ms = (self.rate_of_fire_ms - BARRAGE_RELOAD_BONUS_MS).max(0.0);
                self.projectiles_piercing = true;
                self.fires_fore_and_aft = true;
            }
            AbilityKind::Anchor => {
                self.body.speed = Vec2::ZERO;
            }
        }
        log::info!("{} ability {:?} activated", self.role.as_str(), ability.kind);
        true
    }

    /// End the ability early or on timeout. Only succeeds from `Activated`.
    pub fn deactivate_ability(&mut self, now_ms: f64) -> bool {
        let Brain::Player(ability) = &mut self.brain else {
            return false;
        };
        if ability.state != AbilityState::Activated {
            return false;
        }

        if let Some(snapshot) = ability.snapshot.take() {
            self.body.speed = snapshot.speed;
            self.damage = snapshot.damage;
            self.rate_of_fire_ms = snapshot.rate_of_fire_ms;
        }
        self.damage_resistance = 0.0;
        self.rams_on_contact = false;
        self.holds_fire = false;
        self.projectiles_piercing = false;
        self.fires_fore_and_aft = false;

        ability.state = AbilityState::Recharging;
        ability.recharge_started_at_ms = now_ms;
        log::info!("{} ability {:?} deactivated", self.role.as_str(), ability.kind);
        true
    }

    /// Advance ability timers. Returns the new state if it changed.
    pub fn update_ability(&mut self, now_ms: f64) -> Option<AbilityState> {
        let (expired, recharged) = match &self.brain {
            Brain::Player(a) => (
                a.state == AbilityState::Activated && now_ms - a.activated_at_ms >= a.duration_ms,
                a.state == AbilityState::Recharging
                    && now_ms - a.recharge_started_at_ms >= a.recharge_ms,
            ),
            _ => return None,
        };

        if expired {
            self.deactivate_ability(now_ms);
            return Some(AbilityState::Recharging);
        }
        if recharged {
            if let Brain::Player(ability) = &mut self.brain {
                ability.state = AbilityState::Charged;
            }
            log::debug!("{} ability charged", self.role.as_str());
            return Some(AbilityState::Charged);
        }
        None
    }

    /// Back to a fresh hull: ability recharging from zero, full health
    pub fn reset_player(&mut self) {
        self.deactivate_ability(0.0);
        if let Brain::Player(ability) = &mut self.brain {
            ability.state = AbilityState::Recharging;
            ability.activated_at_ms = 0.0;
            ability.recharge_started_at_ms = 0.0;
            ability.snapshot = None;
        }
        self.health = self.max_health;
        self.last_fire_ms = 0.0;
        self.projectiles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShipConfig;
    use crate::sim::Role;

    fn player(role: Role) -> Ship {
        Ship::new(1, role, &ShipConfig::for_role(role), Vec2::new(200.0, 200.0))
    }

    #[test]
    fn test_activation_requires_charge() {
        let mut ship = player(Role::PlayerBrig);
        assert_eq!(ship.ability_state(), Some(AbilityState::Recharging));
        assert!(!ship.activate_ability(0.0));
        assert!(!ship.deactivate_ability(0.0));
        assert_eq!(ship.damage_resistance, 0.0);

        assert_eq!(ship.update_ability(20_000.0), Some(AbilityState::Charged));
        assert!(ship.activate_ability(20_000.0));
        assert_eq!(ship.ability_state(), Some(AbilityState::Activated));
        assert_eq!(ship.damage_resistance, 1.0);

        // Second activation is a no-op
        let before = ship.clone();
        assert!(!ship.activate_ability(20_010.0));
        assert_eq!(ship, before);
        assert_eq!(ship.ability().map(|a| a.activated_at_ms), Some(20_000.0));
        assert_eq!(ship.damage, 25.0);
    }

    #[test]
    fn test_misuse_leaves_state_untouched() {
        let mut ship = player(Role::PlayerFrigate);
        let fresh = ship.clone();
        assert!(!ship.activate_ability(5_000.0));
        assert!(!ship.deactivate_ability(5_000.0));
        assert_eq!(ship, fresh);
    }

    #[test]
    fn test_recharge_waits_full_period() {
        let mut ship = player(Role::PlayerFrigate);
        assert_eq!(ship.update_ability(19_999.0), None);
        assert_eq!(ship.ability_state(), Some(AbilityState::Recharging));
    }

    #[test]
    fn test_ram_modifiers_round_trip() {
        let mut ship = player(Role::PlayerBrig);
        let base_damage = ship.damage;
        let base_speed = ship.body.speed;
        ship.update_ability(20_000.0);
        ship.activate_ability(20_000.0);

        assert_eq!(ship.damage, base_damage * 5.0);
        assert_eq!(ship.body.speed, Vec2::splat(6.5));
        assert!(ship.rams_on_contact);
        assert!(!ship.can_fire(1_000_000.0));

        assert!(ship.deactivate_ability(21_000.0));
        assert_eq!(ship.damage, base_damage);
        assert_eq!(ship.body.speed, base_speed);
        assert!(!ship.rams_on_contact);
        assert_eq!(ship.damage_resistance, 0.0);
    }

    #[test]
    fn test_barrage_modifiers() {
        let mut ship = player(Role::PlayerFrigate);
        ship.update_ability(20_000.0);
        ship.activate_ability(20_000.0);
        assert_eq!(ship.damage, 20.0);
        assert_eq!(ship.body.speed, Vec2::splat(2.0));
        assert_eq!(ship.rate_of_fire_ms, 350.0);
        assert!(ship.projectiles_piercing);
        assert_eq!(ship.fire(), 16);
    }

    #[test]
    fn test_auto_deactivate_then_recharge() {
        let mut ship = player(Role::PlayerManOfWar);
        ship.update_ability(20_000.0);
        ship.activate_ability(20_000.0);
        assert_eq!(ship.body.speed, Vec2::ZERO);

        assert_eq!(ship.update_ability(29_999.0), None);
        assert_eq!(ship.update_ability(30_000.0), Some(AbilityState::Recharging));
        assert_eq!(ship.body.speed, Vec2::splat(3.0));

        assert_eq!(ship.update_ability(49_999.0), None);
        assert_eq!(ship.update_ability(50_000.0), Some(AbilityState::Charged));
    }

    #[test]
    fn test_reset_restores_hull() {
        let mut ship = player(Role::PlayerBrig);
        ship.update_ability(20_000.0);
        ship.activate_ability(20_000.0);
        ship.health = 10.0;
        ship.reset_player();

        assert_eq!(ship.ability_state(), Some(AbilityState::Recharging));
        assert_eq!(ship.health, ship.max_health);
        assert_eq!(ship.damage, 5.0);
        assert!(!ship.holds_fire);
    }

    #[test]
    fn test_enemy_has_no_ability() {
        let mut ship = player(Role::EnemyBrig);
        assert!(!ship.activate_ability(0.0));
        assert_eq!(ship.update_ability(100_000.0), None);
    }
}
