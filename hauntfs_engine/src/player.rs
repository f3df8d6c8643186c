//! Player state: class, vitals, inventory, and learned attacks.

use std::collections::{BTreeMap, HashSet};
use std::fmt::{self, Display};
use std::str::FromStr;

use hauntfs_data::{ClassDef, Id, StatusEffectDef};
use log::info;

use crate::item::ItemHolder;
use crate::world::InstanceId;

/// Closed set of playable classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerClass {
    Fighter,
    Mage,
    Celtic,
}

impl PlayerClass {
    /// Parses a class definition id. Ids are lowercase in world data.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "fighter" => Some(PlayerClass::Fighter),
            "mage" => Some(PlayerClass::Mage),
            "celtic" => Some(PlayerClass::Celtic),
            _ => None,
        }
    }

    pub fn as_id(self) -> &'static str {
        match self {
            PlayerClass::Fighter => "fighter",
            PlayerClass::Mage => "mage",
            PlayerClass::Celtic => "celtic",
        }
    }

    /// Only casters can learn spells from scrolls and tomes.
    pub fn can_cast(self) -> bool {
        matches!(self, PlayerClass::Mage | PlayerClass::Celtic)
    }
}

impl FromStr for PlayerClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerClass::from_id(&s.to_lowercase()).ok_or_else(|| format!("unknown class '{s}'"))
    }
}

impl Display for PlayerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_id())
    }
}

/// A live timed modifier on the player. Duration is counted in combat
/// rounds and decremented after each full round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEffect {
    pub name: String,
    pub damage_bonus: u32,
    pub remaining: u32,
}

#[derive(Debug)]
pub struct Player {
    pub class: PlayerClass,
    pub current_room: Id,
    pub health: u32,
    pub max_health: u32,
    /// Base class damage plus permanent boosts and the wielded weapon bonus.
    pub total_damage: u32,
    pub inventory: HashSet<InstanceId>,
    /// Currently wielded weapon instance; its boost is part of `total_damage`.
    pub wielded: Option<InstanceId>,
    /// Attack ids granted by the class at creation.
    pub known_attacks: Vec<Id>,
    /// Spell attack ids learned during play.
    pub known_spells: HashSet<Id>,
    /// Keyed by status effect id so re-application refreshes in place.
    pub status_effects: BTreeMap<Id, StatusEffect>,
    /// Attack id to rounds left before it can be used again.
    pub cooldowns: BTreeMap<Id, u32>,
}

impl Player {
    pub fn new(class: PlayerClass, def: &ClassDef, start_room: Id) -> Self {
        Player {
            class,
            current_room: start_room,
            health: def.base_health,
            max_health: def.base_health,
            total_damage: def.base_damage,
            inventory: HashSet::new(),
            wielded: None,
            known_attacks: def.attacks.clone(),
            known_spells: HashSet::new(),
            status_effects: BTreeMap::new(),
            cooldowns: BTreeMap::new(),
        }
    }

    /// Restores up to `amount` health, clamped at `max_health`.
    /// Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.max_health - self.health);
        self.health += healed;
        info!("└─ player healed {healed} -> {}/{}", self.health, self.max_health);
        healed
    }

    /// Applies damage, saturating at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
        info!("└─ player took {amount} damage -> {}/{}", self.health, self.max_health);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Damage dealt per landed attack before the attack's own bonus:
    /// permanent total plus any active status bonuses.
    pub fn attack_damage(&self) -> u32 {
        let status_bonus: u32 = self.status_effects.values().map(|s| s.damage_bonus).sum();
        self.total_damage + status_bonus
    }

    /// Applies or refreshes a timed status effect.
    pub fn add_status(&mut self, def: &StatusEffectDef) {
        info!(
            "└─ status '{}' applied: +{} damage for {} round(s)",
            def.id, def.damage_bonus, def.duration
        );
        self.status_effects.insert(
            def.id.clone(),
            StatusEffect {
                name: def.name.clone(),
                damage_bonus: def.damage_bonus,
                remaining: def.duration,
            },
        );
    }

    /// Decrements all status durations and drops the expired ones.
    /// Returns one expiry line per effect that wore off.
    pub fn tick_status_effects(&mut self) -> Vec<String> {
        let mut expired = Vec::new();
        for effect in self.status_effects.values_mut() {
            effect.remaining = effect.remaining.saturating_sub(1);
        }
        self.status_effects.retain(|_, effect| {
            if effect.remaining == 0 {
                expired.push(format!("The {} effect wears off.", effect.name));
                false
            } else {
                true
            }
        });
        expired
    }

    /// Decrements every active cooldown, re-enabling attacks that reach zero.
    pub fn tick_cooldowns(&mut self) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0);
    }

    pub fn set_cooldown(&mut self, attack_id: &str, rounds: u32) {
        if rounds > 0 {
            self.cooldowns.insert(attack_id.to_string(), rounds);
        }
    }

    pub fn cooldown_remaining(&self, attack_id: &str) -> u32 {
        self.cooldowns.get(attack_id).copied().unwrap_or(0)
    }

    /// Records a learned spell. Returns false if it was already known.
    pub fn learn_spell(&mut self, spell: &str) -> bool {
        let newly = self.known_spells.insert(spell.to_string());
        if newly {
            info!("└─ player learned spell '{spell}'");
        }
        newly
    }

    /// True if this attack id is available to the player, either as a class
    /// attack or as a learned spell.
    pub fn has_attack(&self, attack_id: &str) -> bool {
        self.known_attacks.iter().any(|a| a == attack_id) || self.known_spells.contains(attack_id)
    }
}

impl ItemHolder for Player {
    fn add_item(&mut self, instance_id: InstanceId) {
        self.inventory.insert(instance_id);
    }
    fn remove_item(&mut self, instance_id: InstanceId) {
        self.inventory.remove(&instance_id);
    }
    fn contains_item(&self, instance_id: InstanceId) -> bool {
        self.inventory.contains(&instance_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_class() -> ClassDef {
        ClassDef {
            id: "fighter".into(),
            name: "Fighter".into(),
            description: String::new(),
            base_health: 100,
            base_damage: 5,
            attacks: vec!["slash".into()],
            starter_items: vec![],
        }
    }

    fn test_player() -> Player {
        Player::new(PlayerClass::Fighter, &test_class(), "root".into())
    }

    #[test]
    fn heal_clamps_at_max_health() {
        let mut player = test_player();
        player.health = 90;
        assert_eq!(player.heal(25), 10);
        assert_eq!(player.health, 100);
        assert_eq!(player.heal(5), 0);
    }

    #[test]
    fn damage_saturates_at_zero() {
        let mut player = test_player();
        player.take_damage(250);
        assert_eq!(player.health, 0);
        assert!(!player.is_alive());
    }

    #[test]
    fn status_effects_raise_damage_then_expire() {
        let mut player = test_player();
        let boost = StatusEffectDef {
            id: "strength".into(),
            name: "Strength".into(),
            damage_bonus: 5,
            duration: 2,
        };
        player.add_status(&boost);
        assert_eq!(player.attack_damage(), 10);

        assert!(player.tick_status_effects().is_empty());
        assert_eq!(player.attack_damage(), 10);

        let expired = player.tick_status_effects();
        assert_eq!(expired.len(), 1);
        assert_eq!(player.attack_damage(), 5);
    }

    #[test]
    fn reapplying_a_status_refreshes_duration() {
        let mut player = test_player();
        let boost = StatusEffectDef {
            id: "strength".into(),
            name: "Strength".into(),
            damage_bonus: 5,
            duration: 3,
        };
        player.add_status(&boost);
        player.tick_status_effects();
        player.add_status(&boost);
        assert_eq!(player.status_effects["strength"].remaining, 3);
        assert_eq!(player.attack_damage(), 10);
    }

    #[test]
    fn cooldowns_tick_down_and_clear() {
        let mut player = test_player();
        player.set_cooldown("slash", 2);
        assert_eq!(player.cooldown_remaining("slash"), 2);
        player.tick_cooldowns();
        assert_eq!(player.cooldown_remaining("slash"), 1);
        player.tick_cooldowns();
        assert_eq!(player.cooldown_remaining("slash"), 0);
        assert!(player.cooldowns.is_empty());
    }

    #[test]
    fn class_attacks_and_learned_spells_are_available() {
        let mut player = test_player();
        assert!(player.has_attack("slash"));
        assert!(!player.has_attack("fireball"));
        assert!(player.learn_spell("fireball"));
        assert!(!player.learn_spell("fireball"));
        assert!(player.has_attack("fireball"));
    }
}
