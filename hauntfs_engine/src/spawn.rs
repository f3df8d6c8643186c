//! Random item allocation at world build time.
//!
//! Items that declare `allowed_rooms` are scattered across those rooms by
//! the seeded world RNG. The number of copies placed is
//! `min(rarity, max_spawn)` less any instances that already exist from
//! fixed placements, so allocation can never push an item past its cap.

use hauntfs_data::Id;
use log::{debug, info};
use rand::Rng;

use crate::GameError;
use crate::world::{Location, World};

/// Places randomly allocated items into their eligible rooms and returns
/// how many instances were created.
///
/// Rooms are drawn uniformly from the item's `allowed_rooms`, excluding
/// locked rooms unless the item clears `only_in_unlocked`. Items
/// restricted to a class the player is not are skipped entirely. Catalog
/// iteration is ordered, so the same seed yields the same placements.
pub fn allocate_random_items(world: &mut World) -> Result<u32, GameError> {
    let mut plan: Vec<(Id, Id)> = Vec::new();
    let class_id = world.player.class.as_id();

    let registry = &world.registry;
    let rooms = &world.rooms;
    let items = &world.items;
    let rng = &mut world.rng;
    for def in registry.items.values() {
        if def.allowed_rooms.is_empty() {
            continue;
        }
        if !def.class_restriction.is_empty()
            && !def.class_restriction.iter().any(|c| c == class_id)
        {
            debug!("allocator: '{}' restricted away from class '{class_id}'", def.id);
            continue;
        }
        let eligible: Vec<&Id> = def
            .allowed_rooms
            .iter()
            .filter(|room| {
                rooms
                    .get(*room)
                    .is_some_and(|r| !(def.only_in_unlocked && r.locked))
            })
            .collect();
        if eligible.is_empty() {
            debug!("allocator: no eligible room for '{}'", def.id);
            continue;
        }

        let live = items.values().filter(|i| i.def_id == def.id).count();
        let copies = (def.rarity.min(def.max_spawn) as usize).saturating_sub(live);
        for _ in 0..copies {
            let chosen = eligible[rng.random_range(0..eligible.len())];
            plan.push((def.id.clone(), chosen.clone()));
        }
    }

    let mut placed = 0u32;
    for (item, room) in plan {
        if world
            .spawn_item_instance(&item, Location::Room(room.clone()))?
            .is_some()
        {
            info!("└─ allocator placed '{item}' in '{room}'");
            placed += 1;
        }
    }
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerClass;
    use crate::registry::Registry;
    use hauntfs_data::{ClassDef, GameDef, ItemDef, ItemType, RoomDef, WorldDef};

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

    fn scattered_item(id: &str, rarity: u32, max_spawn: u32) -> ItemDef {
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
            allowed_rooms: vec!["root".into(), "bin".into(), "tmp".into()],
            max_spawn,
            rarity,
            only_in_unlocked: true,
            on_take: None,
            on_use: None,
            on_drop: None,
            on_read: None,
        }
    }

    fn world_def(items: Vec<ItemDef>) -> WorldDef {
        WorldDef {
            game: GameDef {
                title: "Test".into(),
                intro: String::new(),
                start_room: "root".into(),
            },
            classes: vec![
                ClassDef {
                    id: "fighter".into(),
                    name: "Fighter".into(),
                    description: String::new(),
                    base_health: 100,
                    base_damage: 5,
                    attacks: vec![],
                    starter_items: vec![],
                },
                ClassDef {
                    id: "mage".into(),
                    name: "Mage".into(),
                    description: String::new(),
                    base_health: 80,
                    base_damage: 8,
                    attacks: vec![],
                    starter_items: vec![],
                },
            ],
            rooms: vec![room("root"), room("bin"), room("tmp")],
            items,
            enemies: vec![],
            npcs: vec![],
            attacks: vec![],
        }
    }

    fn build(def: WorldDef, class: PlayerClass, seed: u64) -> World {
        World::build(Registry::load(def).unwrap(), class, seed).unwrap()
    }

    #[test]
    fn copies_are_capped_by_max_spawn() {
        let world = build(
            world_def(vec![scattered_item("coin", 3, 2)]),
            PlayerClass::Fighter,
            42,
        );
        assert_eq!(world.live_count("coin"), 2);
    }

    #[test]
    fn rarity_below_cap_limits_copies() {
        let world = build(
            world_def(vec![scattered_item("gem", 1, 5)]),
            PlayerClass::Fighter,
            42,
        );
        assert_eq!(world.live_count("gem"), 1);
    }

    #[test]
    fn same_seed_same_placement() {
        let def = world_def(vec![scattered_item("coin", 2, 2), scattered_item("gem", 1, 1)]);
        let a = build(def.clone(), PlayerClass::Fighter, 99);
        let b = build(def, PlayerClass::Fighter, 99);
        for room in ["root", "bin", "tmp"] {
            let count_a = |w: &World, d: &str| {
                w.room_state(room)
                    .unwrap()
                    .contents
                    .iter()
                    .filter(|i| w.items.get(*i).is_some_and(|inst| inst.def_id == d))
                    .count()
            };
            assert_eq!(count_a(&a, "coin"), count_a(&b, "coin"), "coin in {room}");
            assert_eq!(count_a(&a, "gem"), count_a(&b, "gem"), "gem in {room}");
        }
    }

    #[test]
    fn locked_rooms_are_skipped_unless_allowed() {
        let mut free = scattered_item("coin", 3, 3);
        free.allowed_rooms = vec!["tmp".into()];
        free.only_in_unlocked = false;
        let mut strict = scattered_item("gem", 3, 3);
        strict.allowed_rooms = vec!["tmp".into()];

        let mut def = world_def(vec![free, strict]);
        def.rooms[2].locked = true;
        let world = build(def, PlayerClass::Fighter, 1);
        assert_eq!(world.live_count("coin"), 3);
        assert_eq!(world.live_count("gem"), 0);
    }

    #[test]
    fn class_restricted_items_skip_other_classes() {
        let mut tome = scattered_item("tome", 1, 1);
        tome.class_restriction = vec!["mage".into()];

        let fighter_world = build(world_def(vec![tome.clone()]), PlayerClass::Fighter, 5);
        assert_eq!(fighter_world.live_count("tome"), 0);

        let mage_world = build(world_def(vec![tome]), PlayerClass::Mage, 5);
        assert_eq!(mage_world.live_count("tome"), 1);
    }
}
