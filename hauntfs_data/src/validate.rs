use std::collections::HashSet;
use std::fmt;

use crate::*;

/// Validation error for malformed or missing references in a WorldDef.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    MissingReference { kind: &'static str, id: String, context: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate cross-references and basic invariants in a WorldDef.
///
/// Two passes: the first collects every declared id per kind and flags
/// collisions; the second resolves every reference (exits, keys, placements,
/// effect targets, drop tables, class lists) against those sets so a dangling
/// id fails at load time rather than mid-play.
///
/// ```
/// use hauntfs_data::{GameDef, RoomDef, WorldDef, validate_world};
///
/// let world = WorldDef {
///     game: GameDef {
///         title: "Demo".into(),
///         intro: "Intro".into(),
///         start_room: "closet".into(),
///     },
///     rooms: vec![RoomDef {
///         id: "closet".into(),
///         name: "Closet".into(),
///         description: "A dark and cramped closet.".into(),
///         detailed_description: None,
///         exits: Vec::new(),
///         items: Vec::new(),
///         npcs: Vec::new(),
///         enemies: Vec::new(),
///         locked: false,
///         key_required: None,
///         hidden: false,
///     }],
///     ..WorldDef::default()
/// };
/// assert!(validate_world(&world).is_empty());
/// ```
pub fn validate_world(world: &WorldDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut rooms = HashSet::new();
    let mut items = HashSet::new();
    let mut enemies = HashSet::new();
    let mut npcs = HashSet::new();
    let mut attacks = HashSet::new();
    let mut classes = HashSet::new();

    track_ids(
        "room",
        world.rooms.iter().map(|r| r.id.as_str()),
        &mut rooms,
        &mut errors,
    );
    track_ids(
        "item",
        world.items.iter().map(|i| i.id.as_str()),
        &mut items,
        &mut errors,
    );
    track_ids(
        "enemy",
        world.enemies.iter().map(|e| e.id.as_str()),
        &mut enemies,
        &mut errors,
    );
    track_ids("npc", world.npcs.iter().map(|n| n.id.as_str()), &mut npcs, &mut errors);
    track_ids(
        "attack",
        world.attacks.iter().map(|a| a.id.as_str()),
        &mut attacks,
        &mut errors,
    );
    track_ids(
        "class",
        world.classes.iter().map(|c| c.id.as_str()),
        &mut classes,
        &mut errors,
    );

    // Store ID sets once so we can check cross-references cheaply.
    let ids = IdSets {
        rooms: &rooms,
        items: &items,
        enemies: &enemies,
        npcs: &npcs,
        attacks: &attacks,
        classes: &classes,
    };

    if world.game.start_room.trim().is_empty() {
        errors.push(ValidationError::InvalidValue {
            context: "game start room missing".to_string(),
        });
    } else {
        check_ref(
            "room",
            &world.game.start_room,
            ids.rooms,
            "game start room".to_string(),
            &mut errors,
        );
    }

    for room in &world.rooms {
        for exit in &room.exits {
            check_ref(
                "room",
                exit,
                ids.rooms,
                format!("room '{}' exit", room.id),
                &mut errors,
            );
        }
        if let Some(key) = &room.key_required {
            check_ref("item", key, ids.items, format!("room '{}' key", room.id), &mut errors);
        }
        for item in &room.items {
            check_ref(
                "item",
                item,
                ids.items,
                format!("room '{}' placement", room.id),
                &mut errors,
            );
        }
        for npc in &room.npcs {
            check_ref(
                "npc",
                npc,
                ids.npcs,
                format!("room '{}' placement", room.id),
                &mut errors,
            );
        }
        for enemy in &room.enemies {
            check_ref(
                "enemy",
                enemy,
                ids.enemies,
                format!("room '{}' placement", room.id),
                &mut errors,
            );
        }
    }

    for item in &world.items {
        let context = format!("item '{}'", item.id);
        for room in &item.allowed_rooms {
            check_ref("room", room, ids.rooms, context.clone(), &mut errors);
        }
        for class in &item.class_restriction {
            check_ref("class", class, ids.classes, context.clone(), &mut errors);
        }
        if let Some(spell) = &item.spell_name {
            // A spell item either references a declared attack or carries
            // enough data (spell_damage / spell_heal) to synthesize one.
            if !ids.attacks.contains(spell) && item.spell_damage.is_none() && item.spell_heal.is_none() {
                errors.push(ValidationError::MissingReference {
                    kind: "attack",
                    id: spell.clone(),
                    context: format!("{context} spell_name"),
                });
            }
        }
        if item.max_spawn == 0 {
            errors.push(ValidationError::InvalidValue {
                context: format!("{context} max_spawn must be at least 1"),
            });
        }
        validate_effect(item.on_take.as_ref(), &ids, &mut errors, &format!("{context} on_take"));
        validate_effect(item.on_use.as_ref(), &ids, &mut errors, &format!("{context} on_use"));
        validate_effect(item.on_drop.as_ref(), &ids, &mut errors, &format!("{context} on_drop"));
        validate_effect(item.on_read.as_ref(), &ids, &mut errors, &format!("{context} on_read"));
    }

    for enemy in &world.enemies {
        let context = format!("enemy '{}'", enemy.id);
        for drop in &enemy.drops {
            check_ref("item", &drop.item, ids.items, format!("{context} drop"), &mut errors);
            if drop.chance > 100 {
                errors.push(ValidationError::InvalidValue {
                    context: format!("{context} drop chance out of range ({})", drop.chance),
                });
            }
        }
        validate_effect(
            enemy.on_defeat.as_ref(),
            &ids,
            &mut errors,
            &format!("{context} on_defeat"),
        );
    }

    for npc in &world.npcs {
        validate_effect(
            npc.on_talk.as_ref(),
            &ids,
            &mut errors,
            &format!("npc '{}' on_talk", npc.id),
        );
    }

    for attack in &world.attacks {
        if !(0.0..=1.0).contains(&attack.accuracy) {
            errors.push(ValidationError::InvalidValue {
                context: format!("attack '{}' accuracy out of range ({})", attack.id, attack.accuracy),
            });
        }
        if !(0.0..=1.0).contains(&attack.enemy_damage_reduction) {
            errors.push(ValidationError::InvalidValue {
                context: format!(
                    "attack '{}' enemy_damage_reduction out of range ({})",
                    attack.id, attack.enemy_damage_reduction
                ),
            });
        }
    }

    for class in &world.classes {
        let context = format!("class '{}'", class.id);
        for attack in &class.attacks {
            check_ref("attack", attack, ids.attacks, context.clone(), &mut errors);
        }
        for item in &class.starter_items {
            check_ref("item", item, ids.items, context.clone(), &mut errors);
        }
        if class.base_health == 0 {
            errors.push(ValidationError::InvalidValue {
                context: format!("{context} base_health must be at least 1"),
            });
        }
    }

    errors
}

struct IdSets<'a> {
    rooms: &'a HashSet<String>,
    items: &'a HashSet<String>,
    enemies: &'a HashSet<String>,
    npcs: &'a HashSet<String>,
    attacks: &'a HashSet<String>,
    classes: &'a HashSet<String>,
}

fn track_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
    set: &mut HashSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    for id in ids {
        if !set.insert(id.to_string()) {
            errors.push(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
}

fn check_ref(kind: &'static str, id: &str, set: &HashSet<String>, context: String, errors: &mut Vec<ValidationError>) {
    if !set.contains(id) {
        errors.push(ValidationError::MissingReference {
            kind,
            id: id.to_string(),
            context,
        });
    }
}

fn validate_effect(effect: Option<&EffectDef>, ids: &IdSets<'_>, errors: &mut Vec<ValidationError>, context: &str) {
    let Some(effect) = effect else { return };
    if let Some(item) = &effect.add_item {
        check_ref("item", item, ids.items, format!("{context} add_item"), errors);
    }
    if let Some(item) = &effect.remove_item {
        check_ref("item", item, ids.items, format!("{context} remove_item"), errors);
    }
    if let Some(room) = &effect.unlock_room {
        check_ref("room", room, ids.rooms, format!("{context} unlock_room"), errors);
    }
    if let Some(item) = &effect.spawn_item {
        check_ref("item", item, ids.items, format!("{context} spawn_item"), errors);
    }
    if let Some(enemy) = &effect.spawn_enemy {
        check_ref("enemy", enemy, ids.enemies, format!("{context} spawn_enemy"), errors);
    }
    if let Some(room) = &effect.in_room {
        check_ref("room", room, ids.rooms, format!("{context} in_room"), errors);
    }
    if let Some(status) = &effect.status_effect {
        if status.duration == 0 {
            errors.push(ValidationError::InvalidValue {
                context: format!("{context} status_effect '{}' duration must be at least 1", status.id),
            });
        }
    }
}
