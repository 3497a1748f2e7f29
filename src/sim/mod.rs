//! Deterministic simulation module
//!
//! All combat logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, stored in the game state
//! - Stable iteration order (spawn order)
//! - No rendering, audio or filesystem dependencies

pub mod ability;
pub mod behavior;
pub mod body;
pub mod collision;
pub mod obb;
pub mod pickup;
pub mod projectile;
pub mod ship;
pub mod spawn;
pub mod state;
pub mod tick;

pub use ability::{Ability, AbilityKind, AbilityState};
pub use behavior::{BossBrain, BossState, EnemyBrain, EnemyState, Target};
pub use body::{Body, turn_to_face, turn_to_fire};
pub use collision::resolve_collisions;
pub use obb::OrientedBox;
pub use pickup::{Pickup, PickupKind};
pub use projectile::{Motion, Projectile};
pub use ship::{Behavior, Brain, Role, Ship};
pub use spawn::SpawnDirector;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
