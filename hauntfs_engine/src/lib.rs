#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const HAUNTFS_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod combat;
pub mod effect;
pub mod enemy;
pub mod error;
pub mod item;
pub mod loader;
pub mod npc;
pub mod player;
pub mod registry;
pub mod room;
pub mod spawn;
pub mod world;

// Re-exports for convenience
pub use combat::{CombatAction, CombatSession, CombatState, TurnOutcome};
pub use effect::{EffectOp, EffectOutcome, apply_effect, compile_effect};
pub use enemy::{EnemyInstance, examine_enemy};
pub use error::GameError;
pub use item::{ItemHolder, ItemInstance, drop_item, examine_item, read_item, take_item, use_item};
pub use loader::load_world;
pub use npc::{NpcInstance, examine_npc, talk_to};
pub use player::{Player, PlayerClass};
pub use registry::Registry;
pub use room::{Room, describe_room};
pub use world::{InstanceId, Location, World};
