//! Mutable world state: live instances, rooms, the player, and the RNG.
//!
//! `World` owns every live instance, keyed by a generated [`InstanceId`].
//! Definitions stay in the immutable [`Registry`]; an instance carries only
//! its `def_id` and mutable fields. All instance creation funnels through
//! the `spawn_*` methods here, which is what keeps `max_spawn` caps
//! impossible to exceed from any code path.

use std::collections::HashMap;

use anyhow::{Context, Result};
use hauntfs_data::{AttackKind, Id, ItemType};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;
use variantly::Variantly;

use crate::GameError;
use crate::enemy::EnemyInstance;
use crate::item::{ItemHolder, ItemInstance};
use crate::npc::NpcInstance;
use crate::player::{Player, PlayerClass};
use crate::registry::Registry;
use crate::room::{Room, describe_room};
use crate::spawn;

/// Generated identity of a live instance, distinct from definition ids.
pub type InstanceId = Uuid;

/// Where an instance currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Variantly)]
pub enum Location {
    Room(Id),
    Inventory,
    #[default]
    Nowhere,
}

#[derive(Debug)]
pub struct World {
    pub registry: Registry,
    pub rooms: HashMap<Id, Room>,
    pub items: HashMap<InstanceId, ItemInstance>,
    pub enemies: HashMap<InstanceId, EnemyInstance>,
    pub npcs: HashMap<InstanceId, NpcInstance>,
    pub player: Player,
    pub rng: StdRng,
}

impl World {
    /// Builds the initial world from a registry: instantiates every declared
    /// room placement, equips the player's class starter kit, then runs the
    /// random item allocator. The same `seed` always produces the same world.
    pub fn build(registry: Registry, class: PlayerClass, seed: u64) -> Result<World> {
        let class_def = registry
            .class(class.as_id())
            .with_context(|| format!("class '{class}' is not defined in this world"))?
            .clone();
        let start_room = registry.game.start_room.clone();

        let rooms: HashMap<Id, Room> = registry
            .rooms
            .values()
            .map(|def| (def.id.clone(), Room::from_def(def)))
            .collect();

        // Placement plans are collected up front; registry catalogs are
        // BTreeMaps, so the order (and therefore RNG consumption) is stable.
        let mut item_placements = Vec::new();
        let mut npc_placements = Vec::new();
        let mut enemy_placements = Vec::new();
        for room_def in registry.rooms.values() {
            for item in &room_def.items {
                item_placements.push((item.clone(), room_def.id.clone()));
            }
            for npc in &room_def.npcs {
                npc_placements.push((npc.clone(), room_def.id.clone()));
            }
            for enemy in &room_def.enemies {
                enemy_placements.push((enemy.clone(), room_def.id.clone()));
            }
        }

        let mut world = World {
            player: Player::new(class, &class_def, start_room.clone()),
            registry,
            rooms,
            items: HashMap::new(),
            enemies: HashMap::new(),
            npcs: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        };

        for (item, room) in item_placements {
            world.spawn_item_instance(&item, Location::Room(room))?;
        }
        for (npc, room) in npc_placements {
            world.spawn_npc_instance(&npc, &room)?;
        }
        for (enemy, room) in enemy_placements {
            world.spawn_enemy_instance(&enemy, &room)?;
        }

        for item in &class_def.starter_items {
            let Some(instance) = world.spawn_item_instance(item, Location::Inventory)? else {
                continue;
            };
            let is_weapon = world.registry.item(item)?.item_type == ItemType::Weapon;
            if is_weapon && world.player.wielded.is_none() {
                world.wield_weapon(instance)?;
            }
        }

        // spell-kind class attacks start out already learned
        for attack in &class_def.attacks {
            if world.registry.attack(attack)?.kind == AttackKind::Spell {
                world.player.learn_spell(attack);
            }
        }

        world.room_state_mut(&start_room)?.visited = true;
        let placed = spawn::allocate_random_items(&mut world)?;
        info!(
            "world built: start room '{start_room}', class '{class}', {placed} randomly placed item(s)"
        );
        Ok(world)
    }

    pub fn room_state(&self, room_id: &str) -> Result<&Room, GameError> {
        self.rooms.get(room_id).ok_or_else(|| GameError::UnknownId {
            kind: "room",
            id: room_id.to_string(),
        })
    }

    pub fn room_state_mut(&mut self, room_id: &str) -> Result<&mut Room, GameError> {
        self.rooms.get_mut(room_id).ok_or_else(|| GameError::UnknownId {
            kind: "room",
            id: room_id.to_string(),
        })
    }

    pub fn current_room(&self) -> Result<&Room, GameError> {
        self.room_state(&self.player.current_room)
    }

    /// Number of live instances of an item definition, wherever they are.
    pub fn live_count(&self, def_id: &str) -> usize {
        self.items.values().filter(|i| i.def_id == def_id).count()
    }

    /// Creates an item instance, or returns `Ok(None)` without creating one
    /// if the definition's `max_spawn` cap is already reached. This is the
    /// only place item instances come into existence.
    pub fn spawn_item_instance(
        &mut self,
        def_id: &str,
        location: Location,
    ) -> Result<Option<InstanceId>, GameError> {
        let cap = self.registry.item(def_id)?.max_spawn as usize;
        if self.live_count(def_id) >= cap {
            warn!("spawn of '{def_id}' skipped: already at max_spawn ({cap})");
            return Ok(None);
        }
        let id = Uuid::new_v4();
        match &location {
            Location::Room(room_id) => self.room_state_mut(room_id)?.add_item(id),
            Location::Inventory => self.player.add_item(id),
            Location::Nowhere => {}
        }
        info!("└─ spawned item '{def_id}' ({id}) at {location:?}");
        self.items.insert(
            id,
            ItemInstance {
                id,
                def_id: def_id.to_string(),
                location,
            },
        );
        Ok(Some(id))
    }

    pub fn spawn_enemy_instance(
        &mut self,
        def_id: &str,
        room_id: &str,
    ) -> Result<InstanceId, GameError> {
        let def = self.registry.enemy(def_id)?.clone();
        let id = Uuid::new_v4();
        self.room_state_mut(room_id)?.enemies.push(id);
        self.enemies.insert(
            id,
            EnemyInstance::from_def(id, &def, Location::Room(room_id.to_string())),
        );
        info!("└─ spawned enemy '{def_id}' ({id}) in '{room_id}'");
        Ok(id)
    }

    pub fn spawn_npc_instance(
        &mut self,
        def_id: &str,
        room_id: &str,
    ) -> Result<InstanceId, GameError> {
        let def = self.registry.npc(def_id)?.clone();
        let id = Uuid::new_v4();
        self.room_state_mut(room_id)?.npcs.push(id);
        self.npcs.insert(
            id,
            NpcInstance::from_def(id, &def, Location::Room(room_id.to_string())),
        );
        info!("└─ spawned npc '{def_id}' ({id}) in '{room_id}'");
        Ok(id)
    }

    /// Moves an item instance between holders, keeping both sides consistent.
    pub fn place_instance(
        &mut self,
        instance: InstanceId,
        location: Location,
    ) -> Result<(), GameError> {
        let old = self
            .items
            .get(&instance)
            .ok_or_else(|| GameError::UnknownId {
                kind: "item instance",
                id: instance.to_string(),
            })?
            .location
            .clone();
        match old {
            Location::Room(room_id) => {
                if let Some(room) = self.rooms.get_mut(&room_id) {
                    room.remove_item(instance);
                }
            }
            Location::Inventory => self.player.remove_item(instance),
            Location::Nowhere => {}
        }
        match &location {
            Location::Room(room_id) => self.room_state_mut(room_id)?.add_item(instance),
            Location::Inventory => self.player.add_item(instance),
            Location::Nowhere => {}
        }
        if let Some(item) = self.items.get_mut(&instance) {
            item.location = location;
        }
        Ok(())
    }

    /// Destroys an item instance, detaching it from its holder. Unwields
    /// it first if it was the wielded weapon.
    pub fn remove_item_instance(&mut self, instance: InstanceId) {
        let Some(item) = self.items.remove(&instance) else {
            return;
        };
        match &item.location {
            Location::Room(room_id) => {
                if let Some(room) = self.rooms.get_mut(room_id) {
                    room.remove_item(instance);
                }
            }
            Location::Inventory => self.player.remove_item(instance),
            Location::Nowhere => {}
        }
        if self.player.wielded == Some(instance) {
            self.player.wielded = None;
            if let Some(def) = self.registry.items.get(&item.def_id) {
                self.player.total_damage = self.player.total_damage.saturating_sub(def.boost_amount);
            }
        }
        info!("└─ despawned item '{}' ({instance})", item.def_id);
    }

    pub fn remove_enemy_instance(&mut self, instance: InstanceId) {
        let Some(enemy) = self.enemies.remove(&instance) else {
            return;
        };
        if let Location::Room(room_id) = &enemy.location {
            if let Some(room) = self.rooms.get_mut(room_id) {
                room.enemies.retain(|e| *e != instance);
            }
        }
        info!("└─ despawned enemy '{}' ({instance})", enemy.def_id);
    }

    /// Makes `instance` the wielded weapon, swapping out any previous one.
    /// Weapon boosts are folded into `total_damage` while wielded.
    pub fn wield_weapon(&mut self, instance: InstanceId) -> Result<String, GameError> {
        let def_id = self
            .items
            .get(&instance)
            .ok_or_else(|| GameError::UnknownId {
                kind: "item instance",
                id: instance.to_string(),
            })?
            .def_id
            .clone();
        let boost = self.registry.item(&def_id)?.boost_amount;
        let name = self.registry.item(&def_id)?.name.clone();

        if let Some(previous) = self.player.wielded.take() {
            if let Some(prev_item) = self.items.get(&previous) {
                if let Some(prev_def) = self.registry.items.get(&prev_item.def_id) {
                    self.player.total_damage =
                        self.player.total_damage.saturating_sub(prev_def.boost_amount);
                }
            }
        }
        self.player.total_damage += boost;
        self.player.wielded = Some(instance);
        info!("└─ wielded '{def_id}' (+{boost} damage)");
        Ok(format!("You wield the {name}."))
    }

    /// Every live instance id in a room: items, then NPCs, then enemies,
    /// each in placement order.
    pub fn instances_in(&self, room_id: &str) -> Result<Vec<InstanceId>, GameError> {
        let room = self.room_state(room_id)?;
        let mut ids = room.contents.clone();
        ids.extend(room.npcs.iter().copied());
        ids.extend(room.enemies.iter().copied());
        Ok(ids)
    }

    pub fn find_item_in_room(&self, room_id: &str, def_id: &str) -> Option<InstanceId> {
        let room = self.rooms.get(room_id)?;
        room.contents
            .iter()
            .copied()
            .find(|i| self.items.get(i).is_some_and(|inst| inst.def_id == def_id))
    }

    pub fn find_in_inventory(&self, def_id: &str) -> Option<InstanceId> {
        self.player
            .inventory
            .iter()
            .copied()
            .find(|i| self.items.get(i).is_some_and(|inst| inst.def_id == def_id))
    }

    pub fn find_npc_in_room(&self, room_id: &str, def_id: &str) -> Option<InstanceId> {
        let room = self.rooms.get(room_id)?;
        room.npcs
            .iter()
            .copied()
            .find(|n| self.npcs.get(n).is_some_and(|inst| inst.def_id == def_id))
    }

    pub fn find_enemy_in_room(&self, room_id: &str, def_id: &str) -> Option<InstanceId> {
        let room = self.rooms.get(room_id)?;
        room.enemies
            .iter()
            .copied()
            .find(|e| self.enemies.get(e).is_some_and(|inst| inst.def_id == def_id))
    }

    /// First enemy in the player's current room whose definition has
    /// `auto_attack`, in placement order.
    pub fn first_auto_attacker(&self) -> Option<InstanceId> {
        let room = self.rooms.get(&self.player.current_room)?;
        room.enemies.iter().copied().find(|e| {
            self.enemies
                .get(e)
                .and_then(|inst| self.registry.enemies.get(&inst.def_id))
                .is_some_and(|def| def.auto_attack)
        })
    }

    /// Moves the player through a declared exit. Hidden destinations are
    /// reported as if the exit did not exist; locked ones name the block.
    pub fn move_player(&mut self, room_id: &str) -> Result<Vec<String>, GameError> {
        let here = self.registry.room(&self.player.current_room)?;
        if !here.exits.iter().any(|e| e == room_id) {
            return Err(GameError::NoSuchExit(room_id.to_string()));
        }
        let dest = self.room_state(room_id)?;
        if dest.hidden {
            return Err(GameError::NoSuchExit(room_id.to_string()));
        }
        if dest.locked {
            return Err(GameError::RoomLocked {
                room: room_id.to_string(),
                key: dest.key_required.clone(),
            });
        }
        self.player.current_room = room_id.to_string();
        self.room_state_mut(room_id)?.visited = true;
        info!("└─ player moved to '{room_id}'");
        Ok(vec![describe_room(self, room_id, false)?])
    }

    pub fn describe_current_room(&self, detailed: bool) -> Result<String, GameError> {
        describe_room(self, &self.player.current_room, detailed)
    }
}
