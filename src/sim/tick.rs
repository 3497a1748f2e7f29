//! Per-tick simulation driver
//!
//! Movement is per tick; `dt_ms` only advances the clock and the spawn
//! countdown.

use super::ability::{AbilityKind, AbilityState};
use super::behavior::{Target, escort_formation, update_ai};
use super::collision::resolve_collisions;
use super::spawn::direct_spawns;
use super::state::{GameEvent, GamePhase, GameState};

/// Intents for a single tick, already debounced by the input layer
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Sail forward along the heading
    pub thrust: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub fire: bool,
    pub activate_ability: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one tick of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if matches!(state.phase, GamePhase::Paused | GamePhase::GameOver) {
        return;
    }

    state.time_ms += dt_ms.max(0.0);

    direct_spawns(state, dt_ms.max(0.0));
    update_player(state, input);
    update_enemies(state);
    update_escorts(state);
    update_pickups(state);
    cull_out_of_bounds(state);
    resolve_collisions(state);
}

fn update_player(state: &mut GameState, input: &TickInput) {
    let now = state.time_ms;

    if input.activate_ability && state.player.activate_ability(now) {
        if let Some(ability) = state.player.ability() {
            let kind = ability.kind;
            state.events.push(GameEvent::AbilityActivated { kind });
            if kind == AbilityKind::Anchor {
                summon_escorts(state);
            }
        }
    }

    // Turning takes effect after this tick's thrust
    let body = &mut state.player.body;
    let mut angle = body.angle;
    if input.turn_left {
        angle = body.angle - body.turn_speed;
    }
    if input.turn_right {
        angle = body.angle + body.turn_speed;
    }
    if input.thrust {
        body.advance();
    }
    let (min, max) = state.player_bounds();
    let body = &mut state.player.body;
    body.clamp_to(min, max);
    body.set_angle(angle);

    match state.player.update_ability(now) {
        Some(AbilityState::Recharging) => {
            if let Some(ability) = state.player.ability() {
                state
                    .events
                    .push(GameEvent::AbilityDeactivated { kind: ability.kind });
            }
        }
        Some(AbilityState::Charged) => state.events.push(GameEvent::AbilityCharged),
        _ => {}
    }

    if input.fire {
        state.player.try_fire(now);
    }
    state.player.advance_projectiles(now / 1000.0);
}

fn summon_escorts(state: &mut GameState) {
    let first_id = state.next_entity_id();
    // Reserve the rest of the formation's ids
    for _ in 1..4 {
        state.next_entity_id();
    }
    state.escorts = escort_formation(&state.player, &state.roster.friendly, first_id);
    log::info!("{} escorts summoned", state.escorts.len());
    state.events.push(GameEvent::EscortsSummoned {
        count: state.escorts.len(),
    });
}

fn update_enemies(state: &mut GameState) {
    let now = state.time_ms;
    let target = Target::of(&state.player);
    for enemy in &mut state.enemies {
        update_ai(enemy, Some(target), now);
    }
}

/// Escort `i` engages enemy `i`, doubling up on the last enemy when short
fn update_escorts(state: &mut GameState) {
    if !state.player.ability_active() {
        state.escorts.clear();
        return;
    }
    let now = state.time_ms;
    let enemies = &state.enemies;
    for (i, escort) in state.escorts.iter_mut().enumerate() {
        let target = enemies
            .get(i.min(enemies.len().saturating_sub(1)))
            .map(Target::of);
        update_ai(escort, target, now);
    }
}

fn update_pickups(state: &mut GameState) {
    let now = state.time_ms;
    for i in (0..state.pickups.len()).rev() {
        state.pickups[i].update(&state.player, now);
        if state.pickups[i].timed_out {
            state.pickups.remove(i);
        }
    }
}

/// Drop shots and pickups that have left the arena
fn cull_out_of_bounds(state: &mut GameState) {
    let arena = state.roster.arena;
    let ships = std::iter::once(&mut state.player)
        .chain(state.enemies.iter_mut())
        .chain(state.escorts.iter_mut());
    for ship in ships {
        ship.projectiles
            .retain(|shot| arena.contains(shot.body.position));
    }
    state.pickups.retain(|p| arena.contains(p.body.position));
}
