//! Ships: one record for every hull, specialised by role
//!
//! Role-specific behaviour is selected through [`Role::behavior`] and the
//! [`Brain`] parameters rather than through separate ship types.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use super::ability::{Ability, AbilityKind};
use super::behavior::{BossBrain, EnemyBrain};
use super::body::Body;
use super::obb::OrientedBox;
use super::projectile::{Motion, Projectile};
use crate::config::ShipConfig;
use crate::consts::*;
use crate::{heading, rotate_vector, wrap_angle};

/// Every kind of ship on the water
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    PlayerBrig,
    PlayerFrigate,
    PlayerManOfWar,
    EnemyBrig,
    EnemyFrigate,
    EnemyManOfWar,
    FireBoat,
    Boss,
    /// Escort summoned by the man-of-war's ability
    Friendly,
}

/// Per-tick driving strategy for a role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Steered by player intents
    Helm,
    /// Close to range, then hold position and fire broadsides
    Broadside,
    /// Chase forever and explode on contact
    Kamikaze,
    /// Sail to the staging point, then fire bursts
    Boss,
    /// Stationary, broadside the assigned target
    Escort,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::PlayerBrig,
        Role::PlayerFrigate,
        Role::PlayerManOfWar,
        Role::EnemyBrig,
        Role::EnemyFrigate,
        Role::EnemyManOfWar,
        Role::FireBoat,
        Role::Boss,
        Role::Friendly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::PlayerBrig => "player_brig",
            Role::PlayerFrigate => "player_frigate",
            Role::PlayerManOfWar => "player_man_of_war",
            Role::EnemyBrig => "enemy_brig",
            Role::EnemyFrigate => "enemy_frigate",
            Role::EnemyManOfWar => "enemy_man_of_war",
            Role::FireBoat => "fire_boat",
            Role::Boss => "boss",
            Role::Friendly => "friendly",
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(
            self,
            Role::PlayerBrig | Role::PlayerFrigate | Role::PlayerManOfWar
        )
    }

    /// Strategy table
    pub fn behavior(&self) -> Behavior {
        match self {
            Role::PlayerBrig | Role::PlayerFrigate | Role::PlayerManOfWar => Behavior::Helm,
            Role::EnemyBrig | Role::EnemyFrigate | Role::EnemyManOfWar => Behavior::Broadside,
            Role::FireBoat => Behavior::Kamikaze,
            Role::Boss => Behavior::Boss,
            Role::Friendly => Behavior::Escort,
        }
    }

    pub fn ability_kind(&self) -> Option<AbilityKind> {
        match self {
            Role::PlayerBrig => Some(AbilityKind::Ram),
            Role::PlayerFrigate => Some(AbilityKind::Barrage),
            Role::PlayerManOfWar => Some(AbilityKind::Anchor),
            _ => None,
        }
    }
}

/// Role-specific state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Brain {
    Player(Ability),
    Enemy(EnemyBrain),
    Boss(BossBrain),
    Escort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub id: u32,
    pub role: Role,
    pub body: Body,
    /// Cannons per side
    pub cannons: u32,
    pub rate_of_fire_ms: f64,
    /// Session time of the last completed volley
    pub last_fire_ms: f64,
    pub projectile_speed: Vec2,
    pub projectile_size: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
    /// Fraction of incoming damage ignored (0..=1)
    pub damage_resistance: f32,
    /// Shots fired and still in flight
    pub projectiles: Vec<Projectile>,
    /// Shots pass through ships, damaging each at most once
    pub projectiles_piercing: bool,
    /// Overlapping enemies take `damage` every tick
    pub rams_on_contact: bool,
    /// Guns are stowed
    pub holds_fire: bool,
    /// Volleys also go off the bow and stern
    pub fires_fore_and_aft: bool,
    pub brain: Brain,
}

impl Ship {
    /// Build a ship of `role` at `position` from its stats record
    pub fn new(id: u32, role: Role, config: &ShipConfig, position: Vec2) -> Self {
        let brain = match role.behavior() {
            Behavior::Helm => Brain::Player(Ability::new(
                role.ability_kind().unwrap_or(AbilityKind::Ram),
                config.ability_duration_ms as f64,
                config.ability_recharge_ms as f64,
            )),
            Behavior::Broadside | Behavior::Kamikaze => {
                Brain::Enemy(EnemyBrain::new(config.range, config.score_value))
            }
            Behavior::Boss => Brain::Boss(BossBrain::new(config.range, config.score_value, position)),
            Behavior::Escort => Brain::Escort,
        };

        let mut body = Body::new(position, config.size);
        body.speed = config.speed;
        body.turn_speed = config.turn_speed_degrees.to_radians();
        body.set_angle(config.angle_degrees.to_radians());

        Self {
            id,
            role,
            body,
            cannons: config.cannons,
            rate_of_fire_ms: config.rate_of_fire_ms as f64,
            last_fire_ms: 0.0,
            projectile_speed: config.projectile_speed,
            projectile_size: config.projectile_size,
            health: config.health,
            max_health: config.health,
            damage: config.damage,
            damage_resistance: config.damage_resistance.clamp(0.0, 1.0),
            projectiles: Vec::new(),
            projectiles_piercing: false,
            rams_on_contact: false,
            holds_fire: false,
            fires_fore_and_aft: false,
            brain,
        }
    }

    /// Build the boss at its entry point, bound for `staging`
    pub fn new_boss(id: u32, config: &ShipConfig, entry: Vec2, staging: Vec2) -> Self {
        let mut ship = Self::new(id, Role::Boss, config, entry);
        if let Brain::Boss(brain) = &mut ship.brain {
            brain.staging = staging;
        }
        ship
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    #[inline]
    pub fn bounding_box(&self) -> OrientedBox {
        self.body.bounding_box()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Points awarded for sinking this ship
    pub fn score_value(&self) -> u32 {
        match &self.brain {
            Brain::Enemy(brain) => brain.score_value,
            Brain::Boss(brain) => brain.score_value,
            Brain::Player(_) | Brain::Escort => 0,
        }
    }

    pub fn ability(&self) -> Option<&Ability> {
        match &self.brain {
            Brain::Player(ability) => Some(ability),
            _ => None,
        }
    }

    /// Apply damage after resistance. Health never drops below zero.
    pub fn take_damage(&mut self, damage: f32) {
        let taken = damage - damage * self.damage_resistance;
        self.health = (self.health - taken).max(0.0);
    }

    pub fn give_health(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, self.max_health);
    }

    /// True once `rate_of_fire_ms` has passed since the last volley
    pub fn can_fire(&self, now_ms: f64) -> bool {
        !self.holds_fire && now_ms - self.last_fire_ms >= self.rate_of_fire_ms
    }

    /// Fire if the gun gate is open. Returns true if a volley went out.
    pub fn try_fire(&mut self, now_ms: f64) -> bool {
        if !self.can_fire(now_ms) {
            return false;
        }
        self.fire();
        self.last_fire_ms = now_ms;
        true
    }

    /// Ungated volley: `cannons` shots off each beam, plus bow and stern
    /// shots when `fires_fore_and_aft` is set. Returns the number of shots.
    pub fn fire(&mut self) -> usize {
        if self.cannons == 0 {
            return 0;
        }
        let before = self.projectiles.len();
        let cannons = self.cannons as i32;
        let angle = self.body.angle;
        let forward = self.body.heading();
        let port = heading(angle - FRAC_PI_2);
        let spacing = forward * (self.body.size.x / self.cannons as f32);

        for i in 1..=cannons {
            let base = self.body.position + cannon_offset(cannons, i) * spacing;
            self.spawn_shot(base + port * self.projectile_speed, port, angle - FRAC_PI_2, Motion::Linear);
            self.spawn_shot(base - port * self.projectile_speed, -port, angle + FRAC_PI_2, Motion::Linear);
        }

        if self.fires_fore_and_aft {
            let spacing = rotate_vector(forward, std::f32::consts::PI) * (self.body.size.y / self.cannons as f32);
            for i in 0..cannons {
                let base = self.body.position + cannon_offset(cannons, i) * spacing;
                self.spawn_shot(base + forward * self.projectile_speed, forward, angle, Motion::Linear);
                self.spawn_shot(base - forward * self.projectile_speed, -forward, angle, Motion::Linear);
            }
        }

        self.projectiles.len() - before
    }

    /// Port-side salvo with a vertical wobble, used by the boss
    pub fn fire_wave_salvo(&mut self, session_secs: f64) -> usize {
        if self.cannons == 0 {
            return 0;
        }
        let cannons = self.cannons as i32;
        let port = heading(self.body.angle - FRAC_PI_2);
        let spacing = self.body.heading() * (self.body.size.x / self.cannons as f32);
        let phase = (BOSS_SHOT_FREQUENCY as f64 * session_secs) as f32;
        let origin = self.body.position + Vec2::new(0.0, BOSS_SALVO_WOBBLE * phase.sin());
        let motion = Motion::Sinusoidal {
            amplitude: BOSS_SHOT_AMPLITUDE,
            angular_frequency: BOSS_SHOT_FREQUENCY,
        };

        for i in 1..=cannons {
            let base = origin + cannon_offset(cannons, i) * spacing;
            self.spawn_shot(base + port * self.projectile_speed, port, port.y.atan2(port.x), motion);
        }
        self.cannons as usize
    }

    fn spawn_shot(&mut self, position: Vec2, direction: Vec2, angle: f32, motion: Motion) {
        let shot = Projectile::new(
            position,
            direction,
            wrap_angle(angle),
            self.projectile_speed,
            self.projectile_size,
            self.damage,
        )
        .with_motion(motion);
        self.projectiles.push(shot);
    }

    /// Move every shot in flight one tick
    pub fn advance_projectiles(&mut self, session_secs: f64) {
        for shot in &mut self.projectiles {
            shot.advance(session_secs);
        }
    }
}

/// Distance of cannon `i` from the hull center, in cannon spacings
#[inline]
fn cannon_offset(cannons: i32, i: i32) -> f32 {
    ((cannons - i) - cannons / 2) as f32
}
