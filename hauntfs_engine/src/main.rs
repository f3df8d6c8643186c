#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** HauntFS **
//! Haunted-filesystem adventure engine demo loader.

use std::path::Path;

use anyhow::{Context, Result};
use hauntfs_engine::{CombatSession, CombatState, HAUNTFS_VERSION, PlayerClass, load_world};
use log::info;

fn main() -> Result<()> {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .context("usage: hauntfs_engine <world.ron> [class] [seed]")?;
    let class = match args.next() {
        Some(raw) => raw.parse::<PlayerClass>().map_err(anyhow::Error::msg)?,
        None => PlayerClass::Fighter,
    };
    let seed = match args.next() {
        Some(raw) => raw.parse::<u64>().context("seed must be an unsigned integer")?,
        None => 0,
    };

    info!("Start: loading HauntFS world from {path} (v{HAUNTFS_VERSION})...");
    let mut world =
        load_world(Path::new(&path), class, seed).context("while loading the world")?;
    info!("world loaded successfully");

    println!("=== {} ===", world.registry.game.title);
    println!("\n{}\n", world.registry.game.intro);
    println!("{}", world.describe_current_room(false)?);

    if let Some((session, messages)) = CombatSession::engage_on_entry(&mut world)? {
        for line in &messages {
            println!("{line}");
        }
        if session.state == CombatState::Defeat {
            println!("Game over before it began. Pick a friendlier start room.");
        }
    }
    Ok(())
}
