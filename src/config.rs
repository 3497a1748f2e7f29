//! Ship roster and simulation tunables
//!
//! Every record deserializes with per-field defaults, so a roster file only
//! needs to name the values it changes. Bad numbers are sanitized, never fatal.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::sim::Role;

/// Which hull the player sails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlayerClass {
    #[default]
    Brig,
    Frigate,
    ManOfWar,
}

impl PlayerClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerClass::Brig => "Brig",
            PlayerClass::Frigate => "Frigate",
            PlayerClass::ManOfWar => "Man-of-War",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "brig" => Some(PlayerClass::Brig),
            "frigate" => Some(PlayerClass::Frigate),
            "man-of-war" | "manofwar" | "mow" => Some(PlayerClass::ManOfWar),
            _ => None,
        }
    }

    /// Ship role played by this class
    pub fn role(&self) -> Role {
        match self {
            PlayerClass::Brig => Role::PlayerBrig,
            PlayerClass::Frigate => Role::PlayerFrigate,
            PlayerClass::ManOfWar => Role::PlayerManOfWar,
        }
    }
}

/// Stats for one ship role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// Per-axis distance covered per tick along the heading
    pub speed: Vec2,
    /// Spawn heading in degrees
    pub angle_degrees: f32,
    /// Maximum heading change per tick in degrees
    pub turn_speed_degrees: f32,
    /// Cannons per side
    pub cannons: u32,
    pub rate_of_fire_ms: f32,
    pub health: f32,
    /// Damage carried by each projectile
    pub damage: f32,
    /// Fraction of incoming damage ignored (0..=1)
    pub damage_resistance: f32,
    pub projectile_speed: Vec2,
    pub projectile_size: Vec2,
    /// Hull dimensions; x runs along the keel
    pub size: Vec2,
    /// Distance at which an AI ship stops chasing and opens fire
    pub range: f32,
    pub score_value: u32,
    pub ability_duration_ms: f32,
    pub ability_recharge_ms: f32,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            speed: Vec2::splat(2.5),
            angle_degrees: 0.0,
            turn_speed_degrees: 2.0,
            cannons: 2,
            rate_of_fire_ms: 2000.0,
            health: 25.0,
            damage: 5.0,
            damage_resistance: 0.0,
            projectile_speed: Vec2::splat(4.0),
            projectile_size: Vec2::splat(10.0),
            size: Vec2::new(64.0, 28.0),
            range: 250.0,
            score_value: 10,
            ability_duration_ms: 10_000.0,
            ability_recharge_ms: 20_000.0,
        }
    }
}

impl ShipConfig {
    /// Built-in stats for a role
    pub fn for_role(role: Role) -> Self {
        let base = Self::default();
        match role {
            Role::PlayerBrig => Self {
                speed: Vec2::splat(5.0),
                turn_speed_degrees: 4.0,
                cannons: 3,
                rate_of_fire_ms: 300.0,
                health: 100.0,
                projectile_speed: Vec2::splat(7.0),
                range: 0.0,
                score_value: 0,
                ..base
            },
            Role::PlayerFrigate => Self {
                speed: Vec2::splat(4.0),
                cannons: 4,
                rate_of_fire_ms: 450.0,
                health: 125.0,
                damage: 15.0,
                projectile_speed: Vec2::splat(7.0),
                size: Vec2::new(80.0, 32.0),
                range: 0.0,
                score_value: 0,
                ..base
            },
            Role::PlayerManOfWar => Self {
                speed: Vec2::splat(3.0),
                turn_speed_degrees: 1.0,
                cannons: 6,
                rate_of_fire_ms: 550.0,
                health: 150.0,
                damage: 15.0,
                projectile_speed: Vec2::splat(7.0),
                size: Vec2::new(96.0, 40.0),
                range: 0.0,
                score_value: 0,
                ..base
            },
            Role::EnemyBrig => base,
            Role::EnemyFrigate => Self {
                turn_speed_degrees: 0.5,
                cannons: 3,
                rate_of_fire_ms: 2500.0,
                health: 35.0,
                size: Vec2::new(80.0, 32.0),
                range: 300.0,
                score_value: 15,
                ..base
            },
            Role::EnemyManOfWar => Self {
                speed: Vec2::splat(5.0 / 3.0),
                turn_speed_degrees: 0.2,
                cannons: 4,
                health: 40.0,
                size: Vec2::new(96.0, 40.0),
                range: 350.0,
                score_value: 25,
                ..base
            },
            Role::FireBoat => Self {
                speed: Vec2::splat(4.0),
                cannons: 0,
                health: 10.0,
                size: Vec2::new(36.0, 18.0),
                range: 0.0,
                score_value: 5,
                ..base
            },
            Role::Boss => Self {
                speed: Vec2::splat(1.5),
                turn_speed_degrees: 1.0,
                cannons: 5,
                health: 400.0,
                damage: 10.0,
                size: Vec2::new(180.0, 70.0),
                range: 400.0,
                score_value: 100,
                ..base
            },
            Role::Friendly => Self {
                speed: Vec2::ZERO,
                cannons: 4,
                rate_of_fire_ms: 450.0,
                health: 125.0,
                damage: 15.0,
                projectile_speed: Vec2::splat(7.0),
                size: Vec2::new(80.0, 32.0),
                range: 0.0,
                score_value: 0,
                ..base
            },
        }
    }

    /// Replace non-finite or negative values with the role defaults
    fn sanitize(&mut self, defaults: &ShipConfig, label: &str) {
        fix_vec(&mut self.speed, defaults.speed, label, "speed");
        fix_scalar(&mut self.angle_degrees, defaults.angle_degrees, label, "angle_degrees", true);
        fix_scalar(&mut self.turn_speed_degrees, defaults.turn_speed_degrees, label, "turn_speed_degrees", false);
        fix_scalar(&mut self.rate_of_fire_ms, defaults.rate_of_fire_ms, label, "rate_of_fire_ms", false);
        fix_scalar(&mut self.health, defaults.health, label, "health", false);
        fix_scalar(&mut self.damage, defaults.damage, label, "damage", false);
        fix_scalar(&mut self.damage_resistance, defaults.damage_resistance, label, "damage_resistance", false);
        if self.damage_resistance > 1.0 {
            log::warn!("{label}.damage_resistance {} clamped to 1", self.damage_resistance);
            self.damage_resistance = 1.0;
        }
        fix_vec(&mut self.projectile_speed, defaults.projectile_speed, label, "projectile_speed");
        fix_vec(&mut self.projectile_size, defaults.projectile_size, label, "projectile_size");
        fix_vec(&mut self.size, defaults.size, label, "size");
        fix_scalar(&mut self.range, defaults.range, label, "range", false);
        fix_scalar(&mut self.ability_duration_ms, defaults.ability_duration_ms, label, "ability_duration_ms", false);
        fix_scalar(&mut self.ability_recharge_ms, defaults.ability_recharge_ms, label, "ability_recharge_ms", false);
    }
}

fn fix_scalar(value: &mut f32, fallback: f32, label: &str, field: &str, allow_negative: bool) {
    if !value.is_finite() || (!allow_negative && *value < 0.0) {
        log::warn!("{label}.{field} {value} is invalid, using {fallback}");
        *value = fallback;
    }
}

fn fix_vec(value: &mut Vec2, fallback: Vec2, label: &str, field: &str) {
    if !value.is_finite() || value.min_element() < 0.0 {
        log::warn!("{label}.{field} {value} is invalid, using {fallback}");
        *value = fallback;
    }
}

/// Tunables for a droppable pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    /// Distance drifted per tick
    pub speed: f32,
    pub lifetime_ms: f32,
    pub size: Vec2,
    /// Probability of dropping on a kill (ignored for multipliers)
    pub drop_chance: f32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            speed: 0.25,
            lifetime_ms: 5000.0,
            size: Vec2::splat(16.0),
            drop_chance: 1.0,
        }
    }
}

impl PickupConfig {
    pub fn health() -> Self {
        Self {
            speed: 0.3,
            lifetime_ms: 7000.0,
            size: Vec2::splat(20.0),
            drop_chance: 0.1,
        }
    }

    fn sanitize(&mut self, defaults: &PickupConfig, label: &str) {
        fix_scalar(&mut self.speed, defaults.speed, label, "speed", false);
        fix_scalar(&mut self.lifetime_ms, defaults.lifetime_ms, label, "lifetime_ms", false);
        fix_vec(&mut self.size, defaults.size, label, "size");
        fix_scalar(&mut self.drop_chance, defaults.drop_chance, label, "drop_chance", false);
        self.drop_chance = self.drop_chance.min(1.0);
    }
}

/// Playfield bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl ArenaConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() / 2.0
    }

    /// True if `p` lies inside the arena rectangle
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }
}

/// Spawn director tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    pub min_cooldown_ms: f64,
    pub max_cooldown_ms: f64,
    /// Spawn number at which the boss is summoned
    pub boss_threshold: u32,
    /// Added to the boss threshold after each boss falls
    pub threshold_step: u32,
    pub population_cap: usize,
    pub max_batch: u32,
    /// Cooldown is pinned to the maximum during this opening window
    pub warmup_ms: f64,
    /// Depth of each spawn band measured from the arena edge
    pub edge_band: f32,
    /// Closest a spawn may sit to the top and left walls
    pub edge_inset: f32,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            min_cooldown_ms: 1500.0,
            max_cooldown_ms: 4000.0,
            boss_threshold: 9,
            threshold_step: 2,
            population_cap: 20,
            max_batch: 8,
            warmup_ms: 10_000.0,
            edge_band: 50.0,
            edge_inset: 30.0,
        }
    }
}

/// Full set of tunables handed to a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    pub player_brig: ShipConfig,
    pub player_frigate: ShipConfig,
    pub player_man_of_war: ShipConfig,
    pub enemy_brig: ShipConfig,
    pub enemy_frigate: ShipConfig,
    pub enemy_man_of_war: ShipConfig,
    pub fire_boat: ShipConfig,
    pub boss: ShipConfig,
    pub friendly: ShipConfig,
    pub multiplier_pickup: PickupConfig,
    pub health_pickup: PickupConfig,
    pub arena: ArenaConfig,
    pub director: DirectorConfig,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            player_brig: ShipConfig::for_role(Role::PlayerBrig),
            player_frigate: ShipConfig::for_role(Role::PlayerFrigate),
            player_man_of_war: ShipConfig::for_role(Role::PlayerManOfWar),
            enemy_brig: ShipConfig::for_role(Role::EnemyBrig),
            enemy_frigate: ShipConfig::for_role(Role::EnemyFrigate),
            enemy_man_of_war: ShipConfig::for_role(Role::EnemyManOfWar),
            fire_boat: ShipConfig::for_role(Role::FireBoat),
            boss: ShipConfig::for_role(Role::Boss),
            friendly: ShipConfig::for_role(Role::Friendly),
            multiplier_pickup: PickupConfig::default(),
            health_pickup: PickupConfig::health(),
            arena: ArenaConfig::default(),
            director: DirectorConfig::default(),
        }
    }
}

impl Roster {
    /// Stats record for a role
    pub fn ship(&self, role: Role) -> &ShipConfig {
        match role {
            Role::PlayerBrig => &self.player_brig,
            Role::PlayerFrigate => &self.player_frigate,
            Role::PlayerManOfWar => &self.player_man_of_war,
            Role::EnemyBrig => &self.enemy_brig,
            Role::EnemyFrigate => &self.enemy_frigate,
            Role::EnemyManOfWar => &self.enemy_man_of_war,
            Role::FireBoat => &self.fire_boat,
            Role::Boss => &self.boss,
            Role::Friendly => &self.friendly,
        }
    }

    fn ship_mut(&mut self, role: Role) -> &mut ShipConfig {
        match role {
            Role::PlayerBrig => &mut self.player_brig,
            Role::PlayerFrigate => &mut self.player_frigate,
            Role::PlayerManOfWar => &mut self.player_man_of_war,
            Role::EnemyBrig => &mut self.enemy_brig,
            Role::EnemyFrigate => &mut self.enemy_frigate,
            Role::EnemyManOfWar => &mut self.enemy_man_of_war,
            Role::FireBoat => &mut self.fire_boat,
            Role::Boss => &mut self.boss,
            Role::Friendly => &mut self.friendly,
        }
    }

    /// Parse a roster from JSON, filling every missing field from the
    /// built-in role defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let overlay: Value = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        if !overlay.is_object() {
            return Err(ConfigError::NotAnObject);
        }
        let mut merged = serde_json::to_value(Roster::default()).map_err(ConfigError::Parse)?;
        merge_json(&mut merged, overlay);
        let mut roster: Roster = serde_json::from_value(merged).map_err(ConfigError::Parse)?;
        roster.sanitize();
        Ok(roster)
    }

    /// Replace invalid values with defaults, logging each replacement
    pub fn sanitize(&mut self) {
        for role in Role::ALL {
            let defaults = ShipConfig::for_role(role);
            self.ship_mut(role).sanitize(&defaults, role.as_str());
        }
        self.multiplier_pickup
            .sanitize(&PickupConfig::default(), "multiplier_pickup");
        self.health_pickup
            .sanitize(&PickupConfig::health(), "health_pickup");

        let arena = ArenaConfig::default();
        fix_scalar(&mut self.arena.width, arena.width, "arena", "width", false);
        fix_scalar(&mut self.arena.height, arena.height, "arena", "height", false);

        let director = DirectorConfig::default();
        let d = &mut self.director;
        if !d.min_cooldown_ms.is_finite() || d.min_cooldown_ms < 0.0 {
            log::warn!("director.min_cooldown_ms {} is invalid", d.min_cooldown_ms);
            d.min_cooldown_ms = director.min_cooldown_ms;
        }
        if !d.max_cooldown_ms.is_finite() || d.max_cooldown_ms < d.min_cooldown_ms {
            log::warn!("director.max_cooldown_ms {} is invalid", d.max_cooldown_ms);
            d.max_cooldown_ms = d.min_cooldown_ms.max(director.max_cooldown_ms);
        }
        if !d.warmup_ms.is_finite() || d.warmup_ms < 0.0 {
            log::warn!("director.warmup_ms {} is invalid", d.warmup_ms);
            d.warmup_ms = director.warmup_ms;
        }
        fix_scalar(&mut d.edge_band, director.edge_band, "director", "edge_band", false);
        fix_scalar(&mut d.edge_inset, director.edge_inset, "director", "edge_inset", false);
    }
}

/// Recursively overlay `patch` onto `base`; objects merge, everything else replaces
fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Roster loading failure
#[derive(Debug)]
pub enum ConfigError {
    /// Input was not valid JSON or had the wrong shape for a field
    Parse(serde_json::Error),
    /// Top-level JSON value was not an object
    NotAnObject,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "roster parse error: {e}"),
            ConfigError::NotAnObject => write!(f, "roster must be a JSON object"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::NotAnObject => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_yields_defaults() {
        let roster = Roster::from_json_str("{}").unwrap();
        assert_eq!(roster, Roster::default());
    }

    #[test]
    fn test_partial_record_keeps_role_defaults() {
        let roster = Roster::from_json_str(r#"{ "enemy_frigate": { "health": 50.0 } }"#).unwrap();
        assert_eq!(roster.enemy_frigate.health, 50.0);
        assert_eq!(roster.enemy_frigate.cannons, 3);
        assert_eq!(roster.enemy_frigate.range, 300.0);
    }

    #[test]
    fn test_negative_values_are_sanitized() {
        let roster = Roster::from_json_str(
            r#"{ "player_brig": { "health": -5.0, "damage_resistance": 3.0, "speed": [-1.0, 2.0] } }"#,
        )
        .unwrap();
        assert_eq!(roster.player_brig.health, 100.0);
        assert_eq!(roster.player_brig.damage_resistance, 1.0);
        assert_eq!(roster.player_brig.speed, Vec2::splat(5.0));
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Roster::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Roster::from_json_str("[1, 2]"),
            Err(ConfigError::NotAnObject)
        ));
    }

    #[test]
    fn test_player_class_round_trip_names() {
        assert_eq!(PlayerClass::from_str("frigate"), Some(PlayerClass::Frigate));
        assert_eq!(PlayerClass::from_str("MOW"), Some(PlayerClass::ManOfWar));
        assert_eq!(PlayerClass::from_str("sloop"), None);
        assert_eq!(PlayerClass::ManOfWar.role(), Role::PlayerManOfWar);
    }
}
