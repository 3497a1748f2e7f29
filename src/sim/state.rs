//! Game state and session bookkeeping
//!
//! Everything a session needs lives here, including the RNG, so a state can
//! be cloned or serialized and replayed deterministically.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ability::AbilityKind;
use super::pickup::{Pickup, PickupKind};
use super::ship::{Role, Ship};
use super::spawn::SpawnDirector;
use crate::config::{PlayerClass, Roster};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Player sunk
    GameOver,
}

/// Things that happened during the last tick, for HUD and audio layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyKilled { id: u32, role: Role, points: u64 },
    /// A fire boat blew itself up against a ship
    EnemyRammed { id: u32, victim: u32 },
    BossSpawned { id: u32 },
    BossDefeated,
    PickupDropped { id: u32, kind: PickupKind },
    PickupCollected { id: u32, kind: PickupKind },
    AbilityActivated { kind: AbilityKind },
    AbilityDeactivated { kind: AbilityKind },
    AbilityCharged,
    EscortsSummoned { count: usize },
    GameOver { score: u64 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub roster: Roster,
    pub player_class: PlayerClass,
    pub phase: GamePhase,
    /// Session clock
    pub time_ms: f64,
    pub score: u64,
    pub score_multiplier: u64,
    /// Best score seen this process; survives `reset`
    pub best_score: u64,
    pub player: Ship,
    /// Hostile ships, boss included
    pub enemies: Vec<Ship>,
    /// Ships summoned by the man-of-war's ability
    pub escorts: Vec<Ship>,
    pub pickups: Vec<Pickup>,
    pub director: SpawnDirector,
    /// Events raised during the most recent tick
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64, mut roster: Roster, player_class: PlayerClass) -> Self {
        roster.sanitize();
        let role = player_class.role();
        let player = Ship::new(1, role, roster.ship(role), roster.arena.center());
        let director = SpawnDirector::new(&roster.director);
        log::info!("new {} session, seed {seed}", player_class.as_str());

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            roster,
            player_class,
            phase: GamePhase::Playing,
            time_ms: 0.0,
            score: 0,
            score_multiplier: 1,
            best_score: 0,
            player,
            enemies: Vec::new(),
            escorts: Vec::new(),
            pickups: Vec::new(),
            director,
            events: Vec::new(),
            next_id: 2,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Start over: fresh hull, empty sea, clock at zero. Keeps the roster,
    /// player class and best score.
    pub fn reset(&mut self) {
        self.best_score = self.best_score.max(self.score);
        self.phase = GamePhase::Playing;
        self.time_ms = 0.0;
        self.score = 0;
        self.score_multiplier = 1;
        self.enemies.clear();
        self.escorts.clear();
        self.pickups.clear();
        self.events.clear();
        self.director = SpawnDirector::new(&self.roster.director);

        let config = self.roster.ship(self.player.role);
        self.player.body.position = self.roster.arena.center();
        self.player.body.set_angle(config.angle_degrees.to_radians());
        self.player.reset_player();
        log::info!("session reset (best score {})", self.best_score);
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// True while the boss holds the field
    pub fn boss_active(&self) -> bool {
        self.director.boss_spawned
    }

    /// Bounds the player's hull must stay inside
    pub fn player_bounds(&self) -> (Vec2, Vec2) {
        let arena = self.roster.arena;
        if self.boss_active() {
            let staging = super::spawn::boss_staging(self);
            (
                Vec2::new(staging.x, 0.0),
                Vec2::new(
                    arena.width,
                    arena.height - crate::consts::BOSS_ARENA_FLOOR_MARGIN,
                ),
            )
        } else {
            (Vec2::ZERO, arena.size())
        }
    }

    /// Total shots in flight across every ship
    pub fn projectile_count(&self) -> usize {
        self.player.projectiles.len()
            + self.enemies.iter().map(|e| e.projectiles.len()).sum::<usize>()
            + self.escorts.iter().map(|e| e.projectiles.len()).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::AbilityState;

    #[test]
    fn test_new_session() {
        let state = GameState::new(7, Roster::default(), PlayerClass::Frigate);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.role, Role::PlayerFrigate);
        assert_eq!(state.player.position(), Vec2::new(640.0, 360.0));
        assert_eq!(state.score_multiplier, 1);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut state = GameState::new(7, Roster::default(), PlayerClass::Brig);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
        assert_ne!(a, state.player.id);
    }

    #[test]
    fn test_reset_keeps_best_score() {
        let mut state = GameState::new(7, Roster::default(), PlayerClass::Brig);
        state.score = 250;
        state.phase = GamePhase::GameOver;
        state.player.health = 0.0;
        state.player.body.position = Vec2::new(10.0, 10.0);
        state.director.spawn_number_threshold = 13;

        state.reset();
        assert_eq!(state.best_score, 250);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.health, state.player.max_health);
        assert_eq!(state.player.position(), Vec2::new(640.0, 360.0));
        assert_eq!(state.player.ability_state(), Some(AbilityState::Recharging));
        assert_eq!(state.director.spawn_number_threshold, 9);
    }

    #[test]
    fn test_state_serializes() {
        let state = GameState::new(7, Roster::default(), PlayerClass::ManOfWar);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.player, state.player);
        assert_eq!(back.seed, 7);
    }
}
