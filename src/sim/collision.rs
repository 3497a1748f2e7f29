//! Collision and damage resolution
//!
//! Runs once per tick after everything has moved: shots against hulls,
//! hull contact, pickups, and finally the death sweep that awards score
//! and drops loot.

use rand::Rng;

use super::pickup::{Pickup, PickupKind};
use super::projectile::Projectile;
use super::ship::{Role, Ship};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::MULTIPLIER_DROP_DIVISOR;

/// Apply every shot in `shots` that overlaps `target`.
///
/// Ordinary shots are consumed on impact. Piercing shots carry on and
/// remember the hull so they damage it only once. Returns the number of hits.
pub fn projectile_hits(shots: &mut Vec<Projectile>, piercing: bool, target: &mut Ship) -> usize {
    if !target.is_alive() {
        return 0;
    }
    let hull = target.bounding_box();
    let mut hits = 0;
    shots.retain_mut(|shot| {
        if piercing && shot.has_struck(target.id) {
            return true;
        }
        if !shot.bounding_box().intersects(&hull) {
            return true;
        }
        target.take_damage(shot.damage);
        hits += 1;
        if piercing {
            shot.struck.push(target.id);
            true
        } else {
            false
        }
    });
    hits
}

/// True if the two hulls overlap
#[inline]
pub fn hulls_touch(a: &Ship, b: &Ship) -> bool {
    a.bounding_box().intersects(&b.bounding_box())
}

/// Resolve all collisions for this tick
pub fn resolve_collisions(state: &mut GameState) {
    shots_against_hulls(state);
    ramming(state);
    fire_boat_contact(state);
    collect_pickups(state);
    sink_enemies(state);
    state.escorts.retain(Ship::is_alive);

    if !state.player.is_alive() && state.phase != GamePhase::GameOver {
        state.phase = GamePhase::GameOver;
        state.best_score = state.best_score.max(state.score);
        log::info!("game over, score {} (best {})", state.score, state.best_score);
        state.events.push(GameEvent::GameOver { score: state.score });
    }
}

fn shots_against_hulls(state: &mut GameState) {
    let player = &mut state.player;
    for enemy in &mut state.enemies {
        projectile_hits(&mut player.projectiles, player.projectiles_piercing, enemy);
    }
    for enemy in &mut state.enemies {
        projectile_hits(&mut enemy.projectiles, enemy.projectiles_piercing, player);
    }
    for escort in &mut state.escorts {
        for enemy in &mut state.enemies {
            projectile_hits(&mut escort.projectiles, escort.projectiles_piercing, enemy);
        }
    }
}

/// A ramming player damages every enemy it touches, every tick
fn ramming(state: &mut GameState) {
    if !state.player.rams_on_contact {
        return;
    }
    let player = &state.player;
    for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
        if hulls_touch(player, enemy) {
            enemy.take_damage(player.damage);
        }
    }
}

/// Fire boats explode against the player or an escort, dealing their damage
/// and scoring nothing
fn fire_boat_contact(state: &mut GameState) {
    for i in (0..state.enemies.len()).rev() {
        let boat = &state.enemies[i];
        if boat.role != Role::FireBoat || !boat.is_alive() {
            continue;
        }
        let damage = boat.damage;
        let victim = if hulls_touch(boat, &state.player) {
            state.player.take_damage(damage);
            Some(state.player.id)
        } else if let Some(escort) = state.escorts.iter_mut().find(|e| hulls_touch(boat, e)) {
            escort.take_damage(damage);
            Some(escort.id)
        } else {
            None
        };
        if let Some(victim) = victim {
            let boat = state.enemies.remove(i);
            log::debug!("fire boat {} rammed {victim}", boat.id);
            state.events.push(GameEvent::EnemyRammed { id: boat.id, victim });
        }
    }
}

fn collect_pickups(state: &mut GameState) {
    let hull = state.player.bounding_box();
    for i in (0..state.pickups.len()).rev() {
        if !state.pickups[i].bounding_box().intersects(&hull) {
            continue;
        }
        let pickup = state.pickups.remove(i);
        match pickup.kind {
            PickupKind::Multiplier => state.score_multiplier += 1,
            PickupKind::Health => pickup.apply(&mut state.player),
        }
        state.events.push(GameEvent::PickupCollected {
            id: pickup.id,
            kind: pickup.kind,
        });
    }
}

/// Remove sunk enemies, award score and scatter loot
fn sink_enemies(state: &mut GameState) {
    for i in (0..state.enemies.len()).rev() {
        if state.enemies[i].is_alive() {
            continue;
        }
        let enemy = state.enemies.remove(i);
        let points = enemy.score_value() as u64 * state.score_multiplier;
        state.score += points;
        log::debug!("{} {} sunk for {points}", enemy.role.as_str(), enemy.id);
        state.events.push(GameEvent::EnemyKilled {
            id: enemy.id,
            role: enemy.role,
            points,
        });
        drop_loot(state, &enemy);
    }
}

fn drop_loot(state: &mut GameState, enemy: &Ship) {
    let now = state.time_ms;
    let position = enemy.position();

    for _ in 0..enemy.score_value() / MULTIPLIER_DROP_DIVISOR {
        let angle = (state.rng.random_range(0..360) as f32).to_radians();
        let id = state.next_entity_id();
        let pickup = Pickup::new(
            id,
            PickupKind::Multiplier,
            &state.roster.multiplier_pickup,
            position,
            angle,
            now,
        );
        state.pickups.push(pickup);
        state.events.push(GameEvent::PickupDropped {
            id,
            kind: PickupKind::Multiplier,
        });
    }

    if state.rng.random::<f32>() < state.roster.health_pickup.drop_chance {
        let id = state.next_entity_id();
        let pickup = Pickup::new(
            id,
            PickupKind::Health,
            &state.roster.health_pickup,
            position,
            -std::f32::consts::FRAC_PI_2,
            now,
        );
        state.pickups.push(pickup);
        state.events.push(GameEvent::PickupDropped {
            id,
            kind: PickupKind::Health,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlayerClass, Roster};
    use glam::Vec2;

    fn fresh() -> GameState {
        GameState::new(5, Roster::default(), PlayerClass::Brig)
    }

    fn add_enemy(state: &mut GameState, role: Role, position: Vec2) -> usize {
        let id = state.next_entity_id();
        let ship = Ship::new(id, role, state.roster.ship(role), position);
        state.enemies.push(ship);
        state.enemies.len() - 1
    }

    fn shot_at(position: Vec2, damage: f32) -> Projectile {
        Projectile::new(position, Vec2::X, 0.0, Vec2::splat(7.0), Vec2::splat(10.0), damage)
    }

    #[test]
    fn test_shot_consumed_on_hit() {
        let mut state = fresh();
        let i = add_enemy(&mut state, Role::EnemyBrig, Vec2::new(300.0, 300.0));
        state.player.projectiles.push(shot_at(Vec2::new(300.0, 300.0), 5.0));
        state.player.projectiles.push(shot_at(Vec2::new(900.0, 300.0), 5.0));

        resolve_collisions(&mut state);
        assert_eq!(state.enemies[i].health, 20.0);
        assert_eq!(state.player.projectiles.len(), 1);
    }

    #[test]
    fn test_piercing_hits_each_hull_once() {
        let mut target = Ship::new(9, Role::EnemyBrig, &Roster::default().enemy_brig, Vec2::ZERO);
        let mut shots = vec![shot_at(Vec2::ZERO, 5.0)];
        assert_eq!(projectile_hits(&mut shots, true, &mut target), 1);
        assert_eq!(projectile_hits(&mut shots, true, &mut target), 0);
        assert_eq!(shots.len(), 1);
        assert_eq!(target.health, 20.0);
    }

    #[test]
    fn test_kill_awards_score_and_drops() {
        let mut state = fresh();
        state.score_multiplier = 3;
        let i = add_enemy(&mut state, Role::EnemyFrigate, Vec2::new(300.0, 300.0));
        state.enemies[i].health = 1.0;
        state.player.projectiles.push(shot_at(Vec2::new(300.0, 300.0), 5.0));

        resolve_collisions(&mut state);
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 45);
        let multipliers = state
            .pickups
            .iter()
            .filter(|p| p.kind == PickupKind::Multiplier)
            .count();
        assert_eq!(multipliers, 3);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::EnemyKilled { points: 45, .. })));
    }

    #[test]
    fn test_fire_boat_explodes_on_contact() {
        let mut state = fresh();
        let at = state.player.position();
        add_enemy(&mut state, Role::FireBoat, at);

        resolve_collisions(&mut state);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.health, 95.0);
        assert_eq!(state.score, 0);
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_ram_damages_touching_enemies() {
        let mut state = fresh();
        state.player.rams_on_contact = true;
        state.player.damage = 25.0;
        let at = state.player.position() + Vec2::new(20.0, 0.0);
        add_enemy(&mut state, Role::EnemyBrig, at);
        add_enemy(&mut state, Role::EnemyBrig, Vec2::new(50.0, 50.0));

        resolve_collisions(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_pickups_collected() {
        let mut state = fresh();
        state.player.health = 50.0;
        let at = state.player.position();
        let config = state.roster.multiplier_pickup.clone();
        state.pickups.push(Pickup::new(90, PickupKind::Multiplier, &config, at, 0.0, 0.0));
        let config = state.roster.health_pickup.clone();
        state.pickups.push(Pickup::new(91, PickupKind::Health, &config, at, 0.0, 0.0));

        resolve_collisions(&mut state);
        assert!(state.pickups.is_empty());
        assert_eq!(state.score_multiplier, 2);
        assert_eq!(state.player.health, 60.0);
    }

    #[test]
    fn test_mixed_removals_in_one_pass() {
        let mut state = fresh();
        let at = state.player.position();
        let wreck = Vec2::new(200.0, 150.0);
        add_enemy(&mut state, Role::FireBoat, at);
        let a = add_enemy(&mut state, Role::EnemyBrig, wreck);
        add_enemy(&mut state, Role::FireBoat, at);
        let b = add_enemy(&mut state, Role::EnemyBrig, wreck);
        add_enemy(&mut state, Role::FireBoat, at);
        state.enemies[a].health = 0.0;
        state.enemies[b].health = 0.0;

        resolve_collisions(&mut state);
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 20);
        assert_eq!(state.player.health, 85.0);

        let rammed = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyRammed { .. }))
            .count();
        let killed = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { points: 10, .. }))
            .count();
        assert_eq!(rammed, 3);
        assert_eq!(killed, 2);
        // Two multipliers per brig
        let multipliers = state
            .pickups
            .iter()
            .filter(|p| p.kind == PickupKind::Multiplier)
            .count();
        assert_eq!(multipliers, 4);
    }

    #[test]
    fn test_player_death_ends_game() {
        let mut state = fresh();
        state.score = 120;
        let i = add_enemy(&mut state, Role::EnemyBrig, Vec2::new(100.0, 100.0));
        let at = state.player.position();
        state.enemies[i].projectiles.push(shot_at(at, 500.0));

        resolve_collisions(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.best_score, 120);
        assert!(state.events.contains(&GameEvent::GameOver { score: 120 }));
    }
}
