//! Room instances and room description rendering.
//!
//! A [`Room`] holds the mutable per-room state (lock status, visitation,
//! and the instances currently inside); the static text and exit topology
//! stay in the registry's `RoomDef`.

use hauntfs_data::{Id, RoomDef};

use crate::GameError;
use crate::item::ItemHolder;
use crate::world::{InstanceId, World};

#[derive(Debug)]
pub struct Room {
    pub id: Id,
    pub visited: bool,
    pub locked: bool,
    pub hidden: bool,
    pub key_required: Option<Id>,
    /// Item instances lying in this room, in placement order.
    pub contents: Vec<InstanceId>,
    pub npcs: Vec<InstanceId>,
    pub enemies: Vec<InstanceId>,
}

impl Room {
    pub fn from_def(def: &RoomDef) -> Self {
        Room {
            id: def.id.clone(),
            visited: false,
            locked: def.locked,
            hidden: def.hidden,
            key_required: def.key_required.clone(),
            contents: Vec::new(),
            npcs: Vec::new(),
            enemies: Vec::new(),
        }
    }

    /// Unlocks the room and reveals it if it was hidden.
    pub fn unlock(&mut self) {
        self.locked = false;
        self.hidden = false;
    }
}

impl ItemHolder for Room {
    fn add_item(&mut self, instance_id: InstanceId) {
        if !self.contents.contains(&instance_id) {
            self.contents.push(instance_id);
        }
    }
    fn remove_item(&mut self, instance_id: InstanceId) {
        self.contents.retain(|i| *i != instance_id);
    }
    fn contains_item(&self, instance_id: InstanceId) -> bool {
        self.contents.contains(&instance_id)
    }
}

/// Renders the player-facing description of a room: header, body text,
/// visible occupants, and non-hidden exits. With `detailed` set, the
/// room's `detailed_description` replaces the short body when present.
pub fn describe_room(world: &World, room_id: &str, detailed: bool) -> Result<String, GameError> {
    let def = world.registry.room(room_id)?;
    let room = world.room_state(room_id)?;

    let mut lines = vec![format!("=== {} ===", def.name)];
    let body = match (&def.detailed_description, detailed) {
        (Some(detail), true) => detail,
        _ => &def.description,
    };
    lines.push(body.clone());

    let mut item_names = Vec::new();
    for instance in &room.contents {
        if let Some(item) = world.items.get(instance) {
            let item_def = world.registry.item(&item.def_id)?;
            item_names.push(if item_def.short_description.is_empty() {
                item_def.name.clone()
            } else {
                format!("{} ({})", item_def.name, item_def.short_description)
            });
        }
    }
    item_names.sort_unstable();
    if !item_names.is_empty() {
        lines.push(format!("You see: {}.", item_names.join(", ")));
    }

    let mut npc_names = Vec::new();
    for instance in &room.npcs {
        if let Some(npc) = world.npcs.get(instance) {
            npc_names.push(world.registry.npc(&npc.def_id)?.name.clone());
        }
    }
    npc_names.sort_unstable();
    if !npc_names.is_empty() {
        lines.push(format!("Also here: {}.", npc_names.join(", ")));
    }

    let mut enemy_names = Vec::new();
    for instance in &room.enemies {
        if let Some(enemy) = world.enemies.get(instance) {
            let enemy_def = world.registry.enemy(&enemy.def_id)?;
            enemy_names.push(if enemy_def.short_description.is_empty() {
                enemy_def.name.clone()
            } else {
                format!("{} ({})", enemy_def.name, enemy_def.short_description)
            });
        }
    }
    enemy_names.sort_unstable();
    if !enemy_names.is_empty() {
        lines.push(format!("Lurking here: {}!", enemy_names.join(", ")));
    }

    let mut exits = Vec::new();
    for exit_id in &def.exits {
        let exit_def = world.registry.room(exit_id)?;
        let exit_state = world.room_state(exit_id)?;
        if exit_state.hidden {
            continue;
        }
        if exit_state.locked {
            exits.push(format!("{} [locked]", exit_def.name));
        } else {
            exits.push(exit_def.name.clone());
        }
    }
    if !exits.is_empty() {
        lines.push(format!("Exits: {}.", exits.join(", ")));
    }

    Ok(lines.join("\n"))
}
