//! AI state machines for enemies, the boss and escorts
//!
//! Ships never hold a reference to their target. Each tick they are handed a
//! [`Target`] snapshot taken before anything moves.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ship::{Behavior, Brain, Role, Ship};
use crate::config::ShipConfig;
use crate::consts::*;

/// Read-only view of the ship being hunted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: u32,
    pub position: Vec2,
}

impl Target {
    pub fn of(ship: &Ship) -> Self {
        Self {
            id: ship.id,
            position: ship.position(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Chasing,
    Firing,
}

/// State for enemies that hunt the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyBrain {
    /// Firing range; once inside it the ship stops for good
    pub range: f32,
    pub score_value: u32,
    pub state: EnemyState,
}

impl EnemyBrain {
    pub fn new(range: f32, score_value: u32) -> Self {
        Self {
            range,
            score_value,
            state: EnemyState::Chasing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossState {
    MovingToPosition,
    Firing,
    /// Never entered
    Fleeing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossBrain {
    pub range: f32,
    pub score_value: u32,
    pub state: BossState,
    /// Where the boss parks before opening fire
    pub staging: Vec2,
    /// Salvos fired in the current burst
    pub burst_count: u32,
    /// The burst ends on the salvo after this many
    pub burst_total: u32,
    pub burst_period_ms: f64,
    pub last_burst_ms: f64,
}

impl BossBrain {
    pub fn new(range: f32, score_value: u32, staging: Vec2) -> Self {
        Self {
            range,
            score_value,
            state: BossState::MovingToPosition,
            staging,
            burst_count: 0,
            burst_total: BOSS_BURST_TOTAL,
            burst_period_ms: BOSS_BURST_PERIOD_MS,
            last_burst_ms: 0.0,
        }
    }
}

/// Run one tick of an AI ship's strategy, then move its shots.
///
/// `target` is `None` only for escorts with nothing to shoot at.
pub fn update_ai(ship: &mut Ship, target: Option<Target>, now_ms: f64) {
    let session_secs = now_ms / 1000.0;
    if let Some(target) = target {
        match ship.role.behavior() {
            Behavior::Broadside => broadside(ship, target, now_ms),
            Behavior::Kamikaze => kamikaze(ship, target),
            Behavior::Boss => boss(ship, target, now_ms, session_secs),
            Behavior::Escort => escort(ship, target, now_ms),
            Behavior::Helm => {}
        }
    }
    ship.advance_projectiles(session_secs);
}

/// Chase until within range, then hold and fire broadsides
fn broadside(ship: &mut Ship, target: Target, now_ms: f64) {
    let distance = ship.body.distance_to(target.position);
    let Brain::Enemy(brain) = &mut ship.brain else {
        return;
    };
    if distance <= brain.range {
        brain.state = EnemyState::Firing;
    }
    let state = brain.state;
    match state {
        EnemyState::Chasing => {
            ship.body.turn_toward(target.position);
            ship.body.advance();
        }
        EnemyState::Firing => {
            ship.body.turn_broadside(target.position);
            ship.try_fire(now_ms);
        }
    }
}

fn kamikaze(ship: &mut Ship, target: Target) {
    ship.body.turn_toward(target.position);
    ship.body.advance();
}

fn boss(ship: &mut Ship, target: Target, now_ms: f64, session_secs: f64) {
    let Brain::Boss(brain) = &mut ship.brain else {
        return;
    };
    let staging = brain.staging;
    if brain.state == BossState::MovingToPosition
        && ship.body.distance_to(staging) <= BOSS_STAGING_TOLERANCE
    {
        log::debug!("boss {} reached staging point", ship.id);
        brain.state = BossState::Firing;
    }
    let state = brain.state;
    match state {
        BossState::MovingToPosition => {
            ship.body.turn_toward(staging);
            ship.body.advance();
        }
        BossState::Firing => {
            ship.body.turn_broadside(target.position);
            boss_salvo(ship, now_ms, session_secs);
        }
        BossState::Fleeing => {}
    }
}

/// Fire one burst salvo if both the reload and burst gates are open.
///
/// The count is checked after incrementing, so a burst runs one salvo past
/// `burst_total` before the reload gate closes again.
pub fn boss_salvo(ship: &mut Ship, now_ms: f64, session_secs: f64) -> bool {
    let reloaded = now_ms - ship.last_fire_ms >= ship.rate_of_fire_ms;
    let Brain::Boss(brain) = &mut ship.brain else {
        return false;
    };
    if !reloaded || now_ms - brain.last_burst_ms < brain.burst_period_ms {
        return false;
    }
    brain.last_burst_ms = now_ms;
    brain.burst_count += 1;
    let burst_done = brain.burst_count > brain.burst_total;
    if burst_done {
        brain.burst_count = 0;
    }
    ship.fire_wave_salvo(session_secs);
    if burst_done {
        ship.last_fire_ms = now_ms;
    }
    true
}

fn escort(ship: &mut Ship, target: Target, now_ms: f64) {
    ship.body.turn_broadside(target.position);
    ship.try_fire(now_ms);
}

/// Place four escorts at twelve, nine, six and three o'clock around `flagship`
pub fn escort_formation(flagship: &Ship, config: &ShipConfig, first_id: u32) -> Vec<Ship> {
    let p = flagship.position();
    let half = flagship.body.size / 2.0;
    let escort_half = config.size / 2.0;
    let slots = [
        Vec2::new(p.x, p.y - 2.0 * half.y - 2.0 * escort_half.y - ESCORT_BUFFER),
        Vec2::new(p.x - half.x - escort_half.x - ESCORT_BUFFER, p.y - half.y),
        Vec2::new(p.x, p.y + 2.0 * half.y + 2.0 * escort_half.y + ESCORT_BUFFER),
        Vec2::new(p.x + half.x + escort_half.x + ESCORT_BUFFER, p.y - half.y),
    ];
    slots
        .iter()
        .enumerate()
        .map(|(i, &slot)| Ship::new(first_id + i as u32, Role::Friendly, config, slot))
        .collect()
}
