use serde::{Deserialize, Serialize};

/// Stable identifier used across WorldDef references.
pub type Id = String;

/// Top-level compiled world data loaded by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldDef {
    pub game: GameDef,
    #[serde(default)]
    pub classes: Vec<ClassDef>,
    #[serde(default)]
    pub rooms: Vec<RoomDef>,
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub enemies: Vec<EnemyDef>,
    #[serde(default)]
    pub npcs: Vec<NpcDef>,
    #[serde(default)]
    pub attacks: Vec<AttackDef>,
}

/// Game-level metadata and startup configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameDef {
    pub title: String,
    #[serde(default)]
    pub intro: String,
    pub start_room: Id,
}

/// A playable character class: base stats plus starter gear and attacks.
///
/// The `id` must name one of the closed class set (`fighter`, `mage`,
/// `celtic`); the engine parses it into a class tag at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDef {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_base_health")]
    pub base_health: u32,
    #[serde(default = "default_base_damage")]
    pub base_damage: u32,
    #[serde(default)]
    pub attacks: Vec<Id>,
    #[serde(default)]
    pub starter_items: Vec<Id>,
}

/// Room definition used by the engine at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDef {
    pub id: Id,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub detailed_description: Option<String>,
    #[serde(default)]
    pub exits: Vec<Id>,
    #[serde(default)]
    pub items: Vec<Id>,
    #[serde(default)]
    pub npcs: Vec<Id>,
    #[serde(default)]
    pub enemies: Vec<Id>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub key_required: Option<Id>,
    #[serde(default)]
    pub hidden: bool,
}

/// Item definition: descriptive text, interaction flags, spawn rules, and
/// the effect descriptors fired by each interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    /// Legible text revealed by the `read` verb.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default = "default_true")]
    pub takeable: bool,
    #[serde(default)]
    pub usable: bool,
    #[serde(default)]
    pub usable_in_combat: bool,
    #[serde(default)]
    pub consumed_on_use: bool,
    #[serde(default)]
    pub item_type: ItemType,
    #[serde(default)]
    pub boost_amount: u32,
    /// Extra permanent damage added on use, independent of `item_type`.
    /// May appear together with `max_health_boost`; both apply.
    #[serde(default)]
    pub damage_boost: Option<u32>,
    #[serde(default)]
    pub max_health_boost: Option<u32>,
    /// Class ids allowed to use (and be allocated) this item; empty = all.
    #[serde(default)]
    pub class_restriction: Vec<Id>,
    /// Attack id taught when this item is used, for spell-teaching items.
    #[serde(default)]
    pub spell_name: Option<Id>,
    #[serde(default)]
    pub spell_damage: Option<u32>,
    #[serde(default)]
    pub spell_heal: Option<u32>,
    /// Rooms eligible for random allocation; empty = fixed placements only.
    #[serde(default)]
    pub allowed_rooms: Vec<Id>,
    #[serde(default = "default_max_spawn")]
    pub max_spawn: u32,
    #[serde(default = "default_rarity")]
    pub rarity: u32,
    #[serde(default = "default_true")]
    pub only_in_unlocked: bool,
    #[serde(default)]
    pub on_take: Option<EffectDef>,
    #[serde(default)]
    pub on_use: Option<EffectDef>,
    #[serde(default)]
    pub on_drop: Option<EffectDef>,
    #[serde(default)]
    pub on_read: Option<EffectDef>,
}

/// Closed set of item behavior categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    #[default]
    Misc,
    /// Wielding adds `boost_amount` to total damage (single wield slot).
    Weapon,
    Consumable,
    Key,
    /// Using permanently adds `boost_amount` to total damage.
    DamageBoost,
    /// Using permanently adds `boost_amount` to max health.
    HealthBoost,
}

/// Enemy definition: combat stats, drop table, and defeat effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyDef {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_enemy_health")]
    pub health: u32,
    #[serde(default = "default_enemy_damage")]
    pub damage: u32,
    #[serde(default)]
    pub is_boss: bool,
    #[serde(default = "default_true")]
    pub auto_attack: bool,
    #[serde(default)]
    pub dialogue: Option<String>,
    #[serde(default)]
    pub drops: Vec<DropDef>,
    #[serde(default)]
    pub on_defeat: Option<EffectDef>,
}

/// A single entry in an enemy drop table; `chance` is a percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropDef {
    pub item: Id,
    #[serde(default = "default_drop_chance")]
    pub chance: u32,
}

/// NPC definition: cycled dialogue lines and an optional conversation effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcDef {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dialogues: Vec<String>,
    #[serde(default)]
    pub on_talk: Option<EffectDef>,
}

/// Attack definition used by the combat resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackDef {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bonus_damage: u32,
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default = "default_accuracy")]
    pub accuracy: f64,
    #[serde(default, rename = "type")]
    pub kind: AttackKind,
    /// Fraction (0..=1) by which the next enemy strike is weakened.
    #[serde(default)]
    pub enemy_damage_reduction: f64,
    #[serde(default)]
    pub healing: u32,
}

/// Closed set of attack categories. Spell attacks must be learned before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    #[default]
    Physical,
    Spell,
}

/// Declarative effect descriptor: a tagged set of optional operations.
///
/// Absence of a key means no-op for that operation, not zero. Every id
/// referenced here is checked by [`validate_world`](crate::validate_world)
/// before play begins.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EffectDef {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub heal: Option<u32>,
    #[serde(default)]
    pub damage: Option<u32>,
    #[serde(default)]
    pub add_item: Option<Id>,
    #[serde(default)]
    pub remove_item: Option<Id>,
    #[serde(default)]
    pub unlock_room: Option<Id>,
    #[serde(default)]
    pub spawn_item: Option<Id>,
    #[serde(default)]
    pub spawn_enemy: Option<Id>,
    /// Target room for spawn operations; defaults to the current room.
    #[serde(default)]
    pub in_room: Option<Id>,
    #[serde(default)]
    pub status_effect: Option<StatusEffectDef>,
}

impl EffectDef {
    /// True if no operation key is present at all.
    pub fn is_empty(&self) -> bool {
        self.message.is_none()
            && self.heal.is_none()
            && self.damage.is_none()
            && self.add_item.is_none()
            && self.remove_item.is_none()
            && self.unlock_room.is_none()
            && self.spawn_item.is_none()
            && self.spawn_enemy.is_none()
            && self.status_effect.is_none()
    }
}

/// A timed status effect granted by an effect descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEffectDef {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub damage_bonus: u32,
    #[serde(default = "default_status_duration")]
    pub duration: u32,
}

fn default_true() -> bool {
    true
}

fn default_max_spawn() -> u32 {
    1
}

fn default_rarity() -> u32 {
    1
}

fn default_base_health() -> u32 {
    100
}

fn default_base_damage() -> u32 {
    5
}

fn default_enemy_health() -> u32 {
    50
}

fn default_enemy_damage() -> u32 {
    10
}

fn default_drop_chance() -> u32 {
    100
}

fn default_accuracy() -> f64 {
    1.0
}

fn default_status_duration() -> u32 {
    3
}
