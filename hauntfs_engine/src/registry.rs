//! Immutable content registry built from a validated [`WorldDef`].
//!
//! The registry is the engine's read-only catalog of definitions. Every
//! lookup goes through the typed getters here, which return a
//! [`GameError::UnknownId`] content error instead of panicking, so a bad
//! reference surfaces as a diagnostic rather than an abort.
//!
//! Catalogs are `BTreeMap`s keyed by definition id: iteration order is
//! stable, which keeps seeded random placement reproducible.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use hauntfs_data::{
    AttackDef, AttackKind, ClassDef, EnemyDef, GameDef, Id, ItemDef, NpcDef, RoomDef, WorldDef,
    validate_world,
};
use log::info;

use crate::GameError;
use crate::player::PlayerClass;

#[derive(Debug)]
pub struct Registry {
    pub game: GameDef,
    pub classes: BTreeMap<Id, ClassDef>,
    pub rooms: BTreeMap<Id, RoomDef>,
    pub items: BTreeMap<Id, ItemDef>,
    pub enemies: BTreeMap<Id, EnemyDef>,
    pub npcs: BTreeMap<Id, NpcDef>,
    pub attacks: BTreeMap<Id, AttackDef>,
}

impl Registry {
    /// Validates a raw [`WorldDef`] and compiles it into lookup catalogs.
    ///
    /// Fails with the full list of validation findings if the definition
    /// has duplicate ids, dangling references, or out-of-range values.
    /// Spell-teaching items whose `spell_name` has no declared attack get
    /// one synthesized here from their `spell_damage` / `spell_heal`.
    pub fn load(def: WorldDef) -> Result<Self> {
        let errors = validate_world(&def);
        if !errors.is_empty() {
            let report = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n  - ");
            bail!(
                "world definition failed validation with {} error(s):\n  - {report}",
                errors.len()
            );
        }

        for class in &def.classes {
            if PlayerClass::from_id(&class.id).is_none() {
                bail!("class id '{}' is not a recognized player class", class.id);
            }
        }

        let mut registry = Registry {
            game: def.game,
            classes: def.classes.into_iter().map(|c| (c.id.clone(), c)).collect(),
            rooms: def.rooms.into_iter().map(|r| (r.id.clone(), r)).collect(),
            items: def.items.into_iter().map(|i| (i.id.clone(), i)).collect(),
            enemies: def.enemies.into_iter().map(|e| (e.id.clone(), e)).collect(),
            npcs: def.npcs.into_iter().map(|n| (n.id.clone(), n)).collect(),
            attacks: def.attacks.into_iter().map(|a| (a.id.clone(), a)).collect(),
        };
        registry.synthesize_spell_attacks();

        info!(
            "registry loaded: {} rooms, {} items, {} enemies, {} npcs, {} attacks, {} classes",
            registry.rooms.len(),
            registry.items.len(),
            registry.enemies.len(),
            registry.npcs.len(),
            registry.attacks.len(),
            registry.classes.len()
        );
        Ok(registry)
    }

    /// Adds an attack entry for each spell-teaching item whose `spell_name`
    /// is not already a declared attack. Validation guarantees such items
    /// carry `spell_damage` and/or `spell_heal` to build one from.
    fn synthesize_spell_attacks(&mut self) {
        let mut synthesized: Vec<AttackDef> = Vec::new();
        for item in self.items.values() {
            let Some(spell) = &item.spell_name else {
                continue;
            };
            if self.attacks.contains_key(spell) {
                continue;
            }
            info!("└─ synthesizing spell attack '{spell}' from item '{}'", item.id);
            synthesized.push(AttackDef {
                id: spell.clone(),
                name: spell.replace('_', " "),
                description: format!("A spell learned from the {}.", item.name),
                bonus_damage: item.spell_damage.unwrap_or(0),
                cooldown: 0,
                accuracy: 1.0,
                kind: AttackKind::Spell,
                enemy_damage_reduction: 0.0,
                healing: item.spell_heal.unwrap_or(0),
            });
        }
        for attack in synthesized {
            self.attacks.insert(attack.id.clone(), attack);
        }
    }

    pub fn class(&self, id: &str) -> Result<&ClassDef, GameError> {
        self.classes.get(id).ok_or_else(|| GameError::UnknownId {
            kind: "class",
            id: id.to_string(),
        })
    }

    pub fn room(&self, id: &str) -> Result<&RoomDef, GameError> {
        self.rooms.get(id).ok_or_else(|| GameError::UnknownId {
            kind: "room",
            id: id.to_string(),
        })
    }

    pub fn item(&self, id: &str) -> Result<&ItemDef, GameError> {
        self.items.get(id).ok_or_else(|| GameError::UnknownId {
            kind: "item",
            id: id.to_string(),
        })
    }

    pub fn enemy(&self, id: &str) -> Result<&EnemyDef, GameError> {
        self.enemies.get(id).ok_or_else(|| GameError::UnknownId {
            kind: "enemy",
            id: id.to_string(),
        })
    }

    pub fn npc(&self, id: &str) -> Result<&NpcDef, GameError> {
        self.npcs.get(id).ok_or_else(|| GameError::UnknownId {
            kind: "npc",
            id: id.to_string(),
        })
    }

    pub fn attack(&self, id: &str) -> Result<&AttackDef, GameError> {
        self.attacks.get(id).ok_or_else(|| GameError::UnknownId {
            kind: "attack",
            id: id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hauntfs_data::{ItemDef, RoomDef};

    fn minimal_world() -> WorldDef {
        WorldDef {
            game: GameDef {
                title: "Test".into(),
                intro: String::new(),
                start_room: "root".into(),
            },
            rooms: vec![RoomDef {
                id: "root".into(),
                name: "Root".into(),
                description: "The root directory.".into(),
                detailed_description: None,
                exits: vec![],
                items: vec![],
                npcs: vec![],
                enemies: vec![],
                locked: false,
                key_required: None,
                hidden: false,
            }],
            ..WorldDef::default()
        }
    }

    fn spell_scroll(id: &str, spell: &str) -> ItemDef {
        ItemDef {
            id: id.into(),
            name: "Ancient Scroll".into(),
            short_description: String::new(),
            description: String::new(),
            content: None,
            takeable: true,
            usable: true,
            usable_in_combat: false,
            consumed_on_use: true,
            item_type: hauntfs_data::ItemType::Consumable,
            boost_amount: 0,
            damage_boost: None,
            max_health_boost: None,
            class_restriction: vec![],
            spell_name: Some(spell.into()),
            spell_damage: Some(12),
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

    #[test]
    fn load_rejects_invalid_world() {
        let mut world = minimal_world();
        world.game.start_room = "nowhere".into();
        let err = Registry::load(world).unwrap_err();
        assert!(err.to_string().contains("failed validation"));
    }

    #[test]
    fn lookup_misses_are_content_errors() {
        let registry = Registry::load(minimal_world()).unwrap();
        assert!(registry.room("root").is_ok());
        let err = registry.item("phantom").unwrap_err();
        assert!(err.is_content_error());
    }

    #[test]
    fn spell_attacks_are_synthesized_from_items() {
        let mut world = minimal_world();
        world.items.push(spell_scroll("scroll", "spectral_bolt"));
        let registry = Registry::load(world).unwrap();
        let attack = registry.attack("spectral_bolt").unwrap();
        assert_eq!(attack.kind, AttackKind::Spell);
        assert_eq!(attack.bonus_damage, 12);
        assert_eq!(attack.healing, 0);
    }

    #[test]
    fn declared_attacks_are_not_overwritten() {
        let mut world = minimal_world();
        world.items.push(spell_scroll("scroll", "spectral_bolt"));
        world.attacks.push(AttackDef {
            id: "spectral_bolt".into(),
            name: "Spectral Bolt".into(),
            description: String::new(),
            bonus_damage: 30,
            cooldown: 2,
            accuracy: 0.9,
            kind: AttackKind::Spell,
            enemy_damage_reduction: 0.0,
            healing: 0,
        });
        let registry = Registry::load(world).unwrap();
        assert_eq!(registry.attack("spectral_bolt").unwrap().bonus_damage, 30);
    }
}
