//! NPC instances and the `talk` and `examine` verbs.

use hauntfs_data::{Id, NpcDef};
use log::info;

use crate::GameError;
use crate::effect::apply_effect;
use crate::world::{InstanceId, Location, World};

#[derive(Debug)]
pub struct NpcInstance {
    pub id: InstanceId,
    pub def_id: Id,
    pub location: Location,
    /// Index of the next dialogue line; sticks on the final line.
    pub next_line: usize,
    pub talked: bool,
}

impl NpcInstance {
    pub fn from_def(id: InstanceId, def: &NpcDef, location: Location) -> Self {
        NpcInstance {
            id,
            def_id: def.id.clone(),
            location,
            next_line: 0,
            talked: false,
        }
    }
}

/// Examines an NPC in the player's current room.
pub fn examine_npc(world: &World, npc_id: &str) -> Result<String, GameError> {
    let def = world.registry.npc(npc_id)?;
    if world
        .find_npc_in_room(&world.player.current_room, npc_id)
        .is_none()
    {
        return Err(GameError::NotPresent(npc_id.to_string()));
    }
    let mut lines = vec![format!("=== {} ===", def.name)];
    if !def.description.is_empty() {
        lines.push(def.description.clone());
    }
    Ok(lines.join("\n"))
}

/// Talks to an NPC in the player's current room. Dialogue lines advance
/// one per conversation and repeat the last line once exhausted. The NPC's
/// `on_talk` effect fires only on the first conversation.
pub fn talk_to(world: &mut World, npc_id: &str) -> Result<Vec<String>, GameError> {
    let def = world.registry.npc(npc_id)?.clone();
    let current_room = world.player.current_room.clone();
    let instance_id = world
        .find_npc_in_room(&current_room, npc_id)
        .ok_or_else(|| GameError::NotPresent(npc_id.to_string()))?;

    let (first_talk, line) = {
        let npc = world.npcs.get_mut(&instance_id).ok_or_else(|| GameError::UnknownId {
            kind: "npc instance",
            id: npc_id.to_string(),
        })?;
        let first_talk = !npc.talked;
        npc.talked = true;
        let line = def.dialogues.get(npc.next_line).cloned();
        if npc.next_line + 1 < def.dialogues.len() {
            npc.next_line += 1;
        }
        (first_talk, line)
    };
    info!("└─ talk: npc '{npc_id}' (first: {first_talk})");

    let mut messages = vec![match line {
        Some(text) => format!("{}: \"{text}\"", def.name),
        None => format!("{} has nothing to say.", def.name),
    }];
    if first_talk {
        if let Some(effect) = &def.on_talk {
            messages.extend(apply_effect(world, effect)?.messages);
        }
    }
    Ok(messages)
}
