//! Shared data model for the HauntFS adventure engine.
//!
//! This crate defines the serialized world-definition records ([`WorldDef`]
//! and the per-entity `*Def` types) consumed by `hauntfs_engine`, plus the
//! load-time validation pass that flags duplicate ids and dangling
//! references before play begins.

mod defs;
mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_world};
