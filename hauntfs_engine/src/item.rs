//! Item instances and the item verbs: take, drop, read, use, examine.
//!
//! Verbs address items by definition id; the engine resolves which live
//! instance the player means (current room for `take`, inventory for
//! `use`/`drop`, either for `read`). Each verb applies its mechanical
//! consequence first, then fires the matching `on_*` effect descriptor.

use hauntfs_data::{Id, ItemDef, ItemType};
use log::info;

use crate::GameError;
use crate::effect::apply_effect;
use crate::player::PlayerClass;
use crate::world::{InstanceId, Location, World};

/// A live copy of an item definition.
#[derive(Debug)]
pub struct ItemInstance {
    pub id: InstanceId,
    pub def_id: Id,
    pub location: Location,
}

/// Anything that can hold item instances: rooms and the player.
pub trait ItemHolder {
    fn add_item(&mut self, instance_id: InstanceId);
    fn remove_item(&mut self, instance_id: InstanceId);
    fn contains_item(&self, instance_id: InstanceId) -> bool;
}

fn class_allowed(def: &ItemDef, class: PlayerClass) -> bool {
    def.class_restriction.is_empty() || def.class_restriction.iter().any(|c| c == class.as_id())
}

/// Picks up an item from the player's current room.
pub fn take_item(world: &mut World, item_id: &str) -> Result<Vec<String>, GameError> {
    let def = world.registry.item(item_id)?.clone();
    let room_id = world.player.current_room.clone();
    let instance = world
        .find_item_in_room(&room_id, item_id)
        .ok_or_else(|| GameError::NotPresent(item_id.to_string()))?;
    if !def.takeable {
        return Err(GameError::NotTakeable(item_id.to_string()));
    }
    world.place_instance(instance, Location::Inventory)?;
    info!("└─ take: '{item_id}' from '{room_id}'");

    let mut messages = vec![format!("You take the {}.", def.name)];
    if let Some(effect) = &def.on_take {
        messages.extend(apply_effect(world, effect)?.messages);
    }
    Ok(messages)
}

/// Drops an inventory item into the current room, unwielding it first if
/// it was the wielded weapon.
pub fn drop_item(world: &mut World, item_id: &str) -> Result<Vec<String>, GameError> {
    let def = world.registry.item(item_id)?.clone();
    let instance = world
        .find_in_inventory(item_id)
        .ok_or_else(|| GameError::NotInInventory(item_id.to_string()))?;

    let mut messages = Vec::new();
    if world.player.wielded == Some(instance) {
        world.player.wielded = None;
        world.player.total_damage = world.player.total_damage.saturating_sub(def.boost_amount);
        messages.push(format!("You stop wielding the {}.", def.name));
    }
    let room_id = world.player.current_room.clone();
    world.place_instance(instance, Location::Room(room_id.clone()))?;
    info!("└─ drop: '{item_id}' into '{room_id}'");

    messages.push(format!("You drop the {}.", def.name));
    if let Some(effect) = &def.on_drop {
        messages.extend(apply_effect(world, effect)?.messages);
    }
    Ok(messages)
}

/// Reads an item held or present in the current room.
pub fn read_item(world: &mut World, item_id: &str) -> Result<Vec<String>, GameError> {
    let def = world.registry.item(item_id)?.clone();
    let room_id = world.player.current_room.clone();
    if world.find_in_inventory(item_id).is_none()
        && world.find_item_in_room(&room_id, item_id).is_none()
    {
        return Err(GameError::NotPresent(item_id.to_string()));
    }
    if def.content.is_none() && def.on_read.is_none() {
        return Err(GameError::NotReadable(item_id.to_string()));
    }
    info!("└─ read: '{item_id}'");

    let mut messages = Vec::new();
    if let Some(text) = &def.content {
        messages.push(format!("The {} reads: {text}", def.name));
    }
    if let Some(effect) = &def.on_read {
        messages.extend(apply_effect(world, effect)?.messages);
    }
    Ok(messages)
}

/// Examines an item held or present in the current room: its full
/// description plus handling notes. Fires nothing.
pub fn examine_item(world: &World, item_id: &str) -> Result<String, GameError> {
    let def = world.registry.item(item_id)?;
    let room_id = &world.player.current_room;
    if world.find_in_inventory(item_id).is_none()
        && world.find_item_in_room(room_id, item_id).is_none()
    {
        return Err(GameError::NotPresent(item_id.to_string()));
    }

    let mut lines = vec![format!("=== {} ===", def.name)];
    let body = if def.description.is_empty() {
        &def.short_description
    } else {
        &def.description
    };
    if !body.is_empty() {
        lines.push(body.clone());
    }
    if def.usable {
        lines.push("It looks usable.".to_string());
    }
    if def.consumed_on_use {
        lines.push("It will be spent when used.".to_string());
    }
    if !def.takeable {
        lines.push("It cannot be taken.".to_string());
    }
    Ok(lines.join("\n"))
}

/// Uses an inventory item: fires its `on_use` effect, then its intrinsic
/// behavior (wield, permanent boost, spell teaching), then consumes it if
/// `consumed_on_use`. The `on_use` descriptor runs first so a content
/// error aborts the whole use with nothing applied.
pub fn use_item(world: &mut World, item_id: &str) -> Result<Vec<String>, GameError> {
    let def = world.registry.item(item_id)?.clone();
    let instance = world
        .find_in_inventory(item_id)
        .ok_or_else(|| GameError::NotInInventory(item_id.to_string()))?;
    if !class_allowed(&def, world.player.class) {
        return Err(GameError::ClassRestricted(item_id.to_string()));
    }
    let intrinsically_usable = def.usable
        || def.on_use.is_some()
        || def.spell_name.is_some()
        || def.damage_boost.is_some()
        || def.max_health_boost.is_some()
        || matches!(
            def.item_type,
            ItemType::Weapon | ItemType::DamageBoost | ItemType::HealthBoost
        );
    if !intrinsically_usable {
        return Err(GameError::NotUsable(item_id.to_string()));
    }
    info!("└─ use: '{item_id}'");

    let mut messages = Vec::new();
    if let Some(effect) = &def.on_use {
        messages.extend(apply_effect(world, effect)?.messages);
    }

    match def.item_type {
        ItemType::Weapon => messages.push(world.wield_weapon(instance)?),
        ItemType::DamageBoost => {
            world.player.total_damage += def.boost_amount;
            messages.push(format!(
                "Your strikes permanently hit {} harder.",
                def.boost_amount
            ));
        }
        ItemType::HealthBoost => {
            world.player.max_health += def.boost_amount;
            world.player.health += def.boost_amount;
            messages.push(format!(
                "Your maximum health permanently rises by {}.",
                def.boost_amount
            ));
        }
        ItemType::Misc | ItemType::Consumable | ItemType::Key => {}
    }

    // explicit boost fields may both appear on one item; both apply
    if let Some(amount) = def.damage_boost {
        world.player.total_damage += amount;
        messages.push(format!("Your strikes permanently hit {amount} harder."));
    }
    if let Some(amount) = def.max_health_boost {
        world.player.max_health += amount;
        world.player.health += amount;
        messages.push(format!("Your maximum health permanently rises by {amount}."));
    }

    if let Some(spell) = &def.spell_name {
        if world.player.class.can_cast() {
            let spell_name = world.registry.attack(spell)?.name.clone();
            if world.player.learn_spell(spell) {
                messages.push(format!("You learn {spell_name}!"));
            } else {
                messages.push(format!("You already know {spell_name}."));
            }
        } else {
            messages.push("The glyphs refuse to resolve for you.".to_string());
        }
    }

    if def.consumed_on_use {
        world.remove_item_instance(instance);
        messages.push(format!("The {} is used up.", def.name));
    }
    Ok(messages)
}
