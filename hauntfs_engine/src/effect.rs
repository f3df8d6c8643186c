//! Effect descriptor interpretation.
//!
//! An [`EffectDef`] is a declarative bundle of optional operations. The
//! interpreter first checks every id the descriptor references against the
//! registry, then applies the operations in a fixed order. A bad reference
//! aborts the whole descriptor before anything is applied, so effects are
//! all-or-nothing with respect to content errors.
//!
//! Application order: heal, damage, add item, remove item, unlock room,
//! spawn item, spawn enemy, status effect, message.

use hauntfs_data::{EffectDef, Id, StatusEffectDef};
use log::{info, warn};

use crate::GameError;
use crate::world::{Location, World};

/// A single compiled effect operation.
#[derive(Debug, Clone)]
pub enum EffectOp {
    Heal(u32),
    Damage(u32),
    AddItem(Id),
    RemoveItem(Id),
    UnlockRoom(Id),
    SpawnItem { item: Id, room: Option<Id> },
    SpawnEnemy { enemy: Id, room: Option<Id> },
    ApplyStatus(StatusEffectDef),
    Message(String),
}

/// What an applied descriptor produced: narration lines for the player,
/// and whether the descriptor contained any operation at all.
#[derive(Debug)]
pub struct EffectOutcome {
    pub messages: Vec<String>,
    pub applied: bool,
}

/// Lowers a descriptor into its operations, in application order.
pub fn compile_effect(def: &EffectDef) -> Vec<EffectOp> {
    let mut ops = Vec::new();
    if let Some(amount) = def.heal {
        ops.push(EffectOp::Heal(amount));
    }
    if let Some(amount) = def.damage {
        ops.push(EffectOp::Damage(amount));
    }
    if let Some(item) = &def.add_item {
        ops.push(EffectOp::AddItem(item.clone()));
    }
    if let Some(item) = &def.remove_item {
        ops.push(EffectOp::RemoveItem(item.clone()));
    }
    if let Some(room) = &def.unlock_room {
        ops.push(EffectOp::UnlockRoom(room.clone()));
    }
    if let Some(item) = &def.spawn_item {
        ops.push(EffectOp::SpawnItem {
            item: item.clone(),
            room: def.in_room.clone(),
        });
    }
    if let Some(enemy) = &def.spawn_enemy {
        ops.push(EffectOp::SpawnEnemy {
            enemy: enemy.clone(),
            room: def.in_room.clone(),
        });
    }
    if let Some(status) = &def.status_effect {
        ops.push(EffectOp::ApplyStatus(status.clone()));
    }
    if let Some(text) = &def.message {
        ops.push(EffectOp::Message(text.clone()));
    }
    ops
}

/// Checks every id the descriptor references before anything mutates.
fn validate_refs(world: &World, def: &EffectDef) -> Result<(), GameError> {
    if let Some(item) = &def.add_item {
        world.registry.item(item)?;
    }
    if let Some(item) = &def.remove_item {
        world.registry.item(item)?;
    }
    if let Some(item) = &def.spawn_item {
        world.registry.item(item)?;
    }
    if let Some(enemy) = &def.spawn_enemy {
        world.registry.enemy(enemy)?;
    }
    if let Some(room) = &def.unlock_room {
        world.registry.room(room)?;
    }
    if let Some(room) = &def.in_room {
        world.registry.room(room)?;
    }
    Ok(())
}

/// Applies a descriptor to the world and returns the narration it produced.
///
/// Spawn operations that would exceed an item's `max_spawn` cap are
/// skipped with a warning rather than failing the descriptor; a missing
/// `remove_item` target likewise only warns.
pub fn apply_effect(world: &mut World, def: &EffectDef) -> Result<EffectOutcome, GameError> {
    validate_refs(world, def)?;
    let applied = !def.is_empty();
    let ops = compile_effect(def);
    let mut messages = Vec::new();

    for op in ops {
        match op {
            EffectOp::Heal(amount) => {
                info!("└─ action: heal {amount}");
                let healed = world.player.heal(amount);
                if healed > 0 {
                    messages.push(format!("You recover {healed} health."));
                }
            }
            EffectOp::Damage(amount) => {
                info!("└─ action: damage {amount}");
                world.player.take_damage(amount);
                messages.push(format!("You take {amount} damage!"));
            }
            EffectOp::AddItem(item) => {
                info!("└─ action: add item '{item}' to inventory");
                if world
                    .spawn_item_instance(&item, Location::Inventory)?
                    .is_some()
                {
                    let name = world.registry.item(&item)?.name.clone();
                    messages.push(format!("You obtain the {name}!"));
                }
            }
            EffectOp::RemoveItem(item) => {
                info!("└─ action: remove item '{item}' from inventory");
                if let Some(instance) = world.find_in_inventory(&item) {
                    world.remove_item_instance(instance);
                    let name = world.registry.item(&item)?.name.clone();
                    messages.push(format!("The {name} is gone."));
                } else {
                    warn!("remove_item '{item}': not in inventory, skipped");
                }
            }
            EffectOp::UnlockRoom(room) => {
                info!("└─ action: unlock room '{room}'");
                world.room_state_mut(&room)?.unlock();
                let name = world.registry.room(&room)?.name.clone();
                messages.push(format!("Something unlocks: {name}."));
            }
            EffectOp::SpawnItem { item, room } => {
                let target = room.unwrap_or_else(|| world.player.current_room.clone());
                info!("└─ action: spawn item '{item}' in '{target}'");
                let spawned = world
                    .spawn_item_instance(&item, Location::Room(target.clone()))?
                    .is_some();
                if spawned && target == world.player.current_room {
                    let name = world.registry.item(&item)?.name.clone();
                    messages.push(format!("A {name} materializes here."));
                }
            }
            EffectOp::SpawnEnemy { enemy, room } => {
                let target = room.unwrap_or_else(|| world.player.current_room.clone());
                info!("└─ action: spawn enemy '{enemy}' in '{target}'");
                world.spawn_enemy_instance(&enemy, &target)?;
                if target == world.player.current_room {
                    let name = world.registry.enemy(&enemy)?.name.clone();
                    messages.push(format!("{name} manifests!"));
                }
            }
            EffectOp::ApplyStatus(status) => {
                info!("└─ action: status effect '{}'", status.id);
                world.player.add_status(&status);
                messages.push(format!(
                    "You gain {} for {} round(s)!",
                    status.name, status.duration
                ));
            }
            EffectOp::Message(text) => messages.push(text),
        }
    }
    Ok(EffectOutcome { messages, applied })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerClass;
    use crate::registry::Registry;
    use hauntfs_data::{ClassDef, EnemyDef, GameDef, ItemDef, ItemType, RoomDef, WorldDef};

    fn room(id: &str) -> RoomDef {
        RoomDef {
            id: id.into(),
            name: id.to_uppercase(),
            description: format!("The {id} directory."),
            detailed_description: None,
            exits: vec![],
            items: vec![],
            npcs: vec![],
            enemies: vec![],
            locked: false,
            key_required: None,
            hidden: false,
        }
    }

    fn item(id: &str) -> ItemDef {
        ItemDef {
            id: id.into(),
            name: id.replace('_', " "),
            short_description: String::new(),
            description: String::new(),
            content: None,
            takeable: true,
            usable: false,
            usable_in_combat: false,
            consumed_on_use: false,
            item_type: ItemType::Misc,
            boost_amount: 0,
            damage_boost: None,
            max_health_boost: None,
            class_restriction: vec![],
            spell_name: None,
            spell_damage: None,
            spell_heal: None,
            allowed_rooms: vec![],
            max_spawn: 1,
            rarity: 1,
            only_in_unlocked: true,
            on_take: None,
            on_use: None,
            on_drop: None,
            on_read: None,
        }
    }

    fn enemy(id: &str) -> EnemyDef {
        EnemyDef {
            id: id.into(),
            name: id.replace('_', " "),
            short_description: String::new(),
            description: String::new(),
            health: 20,
            damage: 5,
            is_boss: false,
            auto_attack: false,
            dialogue: None,
            drops: vec![],
            on_defeat: None,
        }
    }

    fn test_world() -> World {
        let mut vault = room("vault");
        vault.locked = true;
        let def = WorldDef {
            game: GameDef {
                title: "Test".into(),
                intro: String::new(),
                start_room: "root".into(),
            },
            classes: vec![ClassDef {
                id: "fighter".into(),
                name: "Fighter".into(),
                description: String::new(),
                base_health: 100,
                base_damage: 5,
                attacks: vec![],
                starter_items: vec![],
            }],
            rooms: vec![room("root"), room("bin"), vault],
            items: vec![item("health_potion"), item("root_key")],
            enemies: vec![enemy("daemon")],
            npcs: vec![],
            attacks: vec![],
        };
        World::build(Registry::load(def).unwrap(), PlayerClass::Fighter, 11).unwrap()
    }

    #[test]
    fn bad_reference_aborts_without_applying_anything() {
        let mut world = test_world();
        world.player.health = 60;
        let effect = EffectDef {
            heal: Some(20),
            add_item: Some("phantom_item".into()),
            ..EffectDef::default()
        };
        let err = apply_effect(&mut world, &effect).unwrap_err();
        assert!(err.is_content_error());
        assert_eq!(world.player.health, 60);
    }

    #[test]
    fn message_comes_after_mechanical_operations() {
        let mut world = test_world();
        world.player.health = 50;
        let effect = EffectDef {
            message: Some("The drive hums approvingly.".into()),
            heal: Some(10),
            add_item: Some("root_key".into()),
            ..EffectDef::default()
        };
        let outcome = apply_effect(&mut world, &effect).unwrap();
        assert!(outcome.applied);
        assert_eq!(outcome.messages.last().unwrap(), "The drive hums approvingly.");
        assert_eq!(world.player.health, 60);
        assert!(world.find_in_inventory("root_key").is_some());
    }

    #[test]
    fn unlock_room_clears_the_lock() {
        let mut world = test_world();
        let effect = EffectDef {
            unlock_room: Some("vault".into()),
            ..EffectDef::default()
        };
        apply_effect(&mut world, &effect).unwrap();
        assert!(!world.room_state("vault").unwrap().locked);
    }

    #[test]
    fn spawn_targets_in_room_and_respects_caps() {
        let mut world = test_world();
        let effect = EffectDef {
            spawn_item: Some("health_potion".into()),
            spawn_enemy: Some("daemon".into()),
            in_room: Some("bin".into()),
            ..EffectDef::default()
        };
        apply_effect(&mut world, &effect).unwrap();
        assert!(world.find_item_in_room("bin", "health_potion").is_some());
        assert!(world.find_enemy_in_room("bin", "daemon").is_some());

        // second spawn exceeds max_spawn: skipped, not an error
        apply_effect(&mut world, &effect).unwrap();
        assert_eq!(world.live_count("health_potion"), 1);
    }

    #[test]
    fn empty_descriptor_applies_nothing() {
        let mut world = test_world();
        let outcome = apply_effect(&mut world, &EffectDef::default()).unwrap();
        assert!(!outcome.applied);
        assert!(outcome.messages.is_empty());
    }

    #[test]
    fn missing_remove_target_is_skipped_quietly() {
        let mut world = test_world();
        let effect = EffectDef {
            remove_item: Some("root_key".into()),
            message: Some("Nothing happens.".into()),
            ..EffectDef::default()
        };
        let outcome = apply_effect(&mut world, &effect).unwrap();
        assert_eq!(outcome.messages, vec!["Nothing happens.".to_string()]);
    }
}
