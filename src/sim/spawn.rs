//! Spawn director
//!
//! Difficulty grows with the log of session time plus the log (base 5) of the
//! scoring rate. Once the spawn number reaches the boss threshold, ordinary
//! spawning stops until the arena is clear and the boss has been sunk.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::body::turn_to_face;
use super::ship::{Role, Ship};
use super::state::{GameEvent, GameState};
use crate::config::DirectorConfig;
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnDirector {
    /// Countdown to the next ordinary batch
    pub next_spawn_ms: f64,
    /// The boss is on the field
    pub boss_spawned: bool,
    /// Boss threshold reached; ordinary spawning is suspended
    pub boss_ready: bool,
    pub spawn_number_threshold: u32,
    pub bosses_defeated: u32,
}

impl SpawnDirector {
    pub fn new(config: &DirectorConfig) -> Self {
        Self {
            next_spawn_ms: 0.0,
            boss_spawned: false,
            boss_ready: false,
            spawn_number_threshold: config.boss_threshold,
            bosses_defeated: 0,
        }
    }

    /// Difficulty level for a session `elapsed_ms` long with `score` points
    pub fn number_to_spawn(elapsed_ms: f64, score: u64) -> u32 {
        if !(elapsed_ms > 0.0) {
            return 0;
        }
        let score_rate = (score as f64 * 1000.0 / elapsed_ms).floor();
        let secs = elapsed_ms / 1000.0;
        let level = (1.0 + secs).ln() + (1.0 + score_rate).ln() / 5f64.ln();
        level.floor().max(0.0) as u32
    }
}

/// Enemy type for a roll in `0..100`
pub fn enemy_role_for_roll(roll: u32) -> Role {
    match roll {
        0..50 => Role::FireBoat,
        50..75 => Role::EnemyBrig,
        75..90 => Role::EnemyFrigate,
        _ => Role::EnemyManOfWar,
    }
}

/// Staging point the boss sails to before it opens fire
pub fn boss_staging(state: &GameState) -> Vec2 {
    let size = state.roster.boss.size;
    Vec2::new(size.x / 2.0, state.roster.arena.height / 2.0 - size.y / 2.0)
}

/// Run the director for one tick
pub fn direct_spawns(state: &mut GameState, dt_ms: f64) {
    let config = state.roster.director.clone();
    let level = SpawnDirector::number_to_spawn(state.time_ms, state.score);
    state.director.next_spawn_ms -= dt_ms;

    if level >= state.director.spawn_number_threshold && !state.director.boss_spawned {
        state.director.boss_spawned = try_spawn_boss(state);
        state.director.boss_ready = true;
    }

    if state.director.boss_spawned {
        if state.enemies.is_empty() {
            let director = &mut state.director;
            director.boss_spawned = false;
            director.boss_ready = false;
            director.spawn_number_threshold += config.threshold_step;
            director.bosses_defeated += 1;
            log::info!(
                "boss defeated, next boss at spawn level {}",
                director.spawn_number_threshold
            );
            reset_cooldown(state, &config);
            state.events.push(GameEvent::BossDefeated);
        }
    } else if state.director.next_spawn_ms <= 0.0 && !state.director.boss_ready {
        let room = config.population_cap.saturating_sub(state.enemies.len());
        let batch = (level.min(config.max_batch) as usize).min(room);
        for _ in 0..batch {
            spawn_enemy(state, &config);
        }
        if batch > 0 {
            log::debug!("spawned {batch} enemies at level {level}");
            reset_cooldown(state, &config);
        }
    }
}

/// The boss only enters an empty arena
fn try_spawn_boss(state: &mut GameState) -> bool {
    if !state.enemies.is_empty() {
        return false;
    }
    let id = state.next_entity_id();
    let staging = boss_staging(state);
    let boss = Ship::new_boss(id, &state.roster.boss, Vec2::new(BOSS_ENTRY_X, BOSS_ENTRY_Y), staging);
    log::info!("boss {id} spawned, staging at {staging}");
    state.enemies.push(boss);
    state.events.push(GameEvent::BossSpawned { id });
    true
}

fn spawn_enemy(state: &mut GameState, config: &DirectorConfig) {
    let role = enemy_role_for_roll(state.rng.random_range(0..100));
    let position = edge_spawn_point(state, config);
    let id = state.next_entity_id();
    let mut ship = Ship::new(id, role, state.roster.ship(role), position);
    ship.body.angle = turn_to_face(position, state.player.position(), ship.body.angle, TAU);
    state.enemies.push(ship);
}

/// Random point in one of the four edge bands
fn edge_spawn_point(state: &mut GameState, config: &DirectorConfig) -> Vec2 {
    let w = state.roster.arena.width;
    let h = state.roster.arena.height;
    let inset = config.edge_inset;
    let band = config.edge_band;
    let rng = &mut state.rng;
    let (x, y) = match rng.random_range(0..4) {
        0 => (uniform(rng, inset, band), uniform(rng, inset, h)),
        1 => (uniform(rng, inset, w), uniform(rng, inset, band)),
        2 => (uniform(rng, w - band, w), uniform(rng, inset, h)),
        _ => (uniform(rng, inset, w), uniform(rng, h - band, h)),
    };
    Vec2::new(x, y)
}

fn uniform(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

fn reset_cooldown(state: &mut GameState, config: &DirectorConfig) {
    state.director.next_spawn_ms = if state.time_ms <= config.warmup_ms
        || config.max_cooldown_ms <= config.min_cooldown_ms
    {
        config.max_cooldown_ms
    } else {
        state
            .rng
            .random_range(config.min_cooldown_ms..config.max_cooldown_ms)
    };
}
