//! World definition loading.
//!
//! World content is authored in RON. Loading is a three-step pipeline:
//! parse the file, compile it into a validated [`Registry`], then build
//! the live [`World`] for the chosen class and seed.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hauntfs_data::WorldDef;
use log::info;

use crate::player::PlayerClass;
use crate::registry::Registry;
use crate::world::World;

/// Reads and parses a RON world definition file.
pub fn load_world_def(path: &Path) -> Result<WorldDef> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading world definition from {}", path.display()))?;
    let def: WorldDef = ron::from_str(&text)
        .with_context(|| format!("parsing world definition {}", path.display()))?;
    info!(
        "parsed world definition '{}' from {}",
        def.game.title,
        path.display()
    );
    Ok(def)
}

/// Loads, validates, and instantiates a world ready for play.
pub fn load_world(path: &Path, class: PlayerClass, seed: u64) -> Result<World> {
    let def = load_world_def(path)?;
    let registry = Registry::load(def)?;
    World::build(registry, class, seed)
}
