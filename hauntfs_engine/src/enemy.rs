//! Live enemy instances and the enemy `examine` verb.

use hauntfs_data::{EnemyDef, Id};
use log::info;

use crate::GameError;
use crate::world::{InstanceId, Location, World};

#[derive(Debug)]
pub struct EnemyInstance {
    pub id: InstanceId,
    pub def_id: Id,
    pub location: Location,
    pub health: u32,
}

impl EnemyInstance {
    pub fn from_def(id: InstanceId, def: &EnemyDef, location: Location) -> Self {
        EnemyInstance {
            id,
            def_id: def.id.clone(),
            location,
            health: def.health,
        }
    }

    /// Applies damage, saturating at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
        info!("└─ enemy '{}' took {amount} damage -> {} hp", self.def_id, self.health);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Examines an enemy in the player's current room: description and a
/// sizing line with its current health and strike damage.
pub fn examine_enemy(world: &World, enemy_id: &str) -> Result<String, GameError> {
    let def = world.registry.enemy(enemy_id)?;
    let instance = world
        .find_enemy_in_room(&world.player.current_room, enemy_id)
        .ok_or_else(|| GameError::NotPresent(enemy_id.to_string()))?;
    let health = world.enemies.get(&instance).map_or(0, |e| e.health);

    let mut lines = vec![format!("=== {} ===", def.name)];
    if !def.description.is_empty() {
        lines.push(def.description.clone());
    }
    lines.push(format!("HP: {health}, DMG: {}", def.damage));
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn damage_saturates_and_kills() {
        let def = EnemyDef {
            id: "wraith".into(),
            name: "Wraith Process".into(),
            short_description: String::new(),
            description: String::new(),
            health: 30,
            damage: 10,
            is_boss: false,
            auto_attack: true,
            dialogue: None,
            drops: vec![],
            on_defeat: None,
        };
        let mut enemy = EnemyInstance::from_def(Uuid::new_v4(), &def, Location::Room("bin".into()));
        enemy.take_damage(12);
        assert_eq!(enemy.health, 18);
        assert!(enemy.is_alive());
        enemy.take_damage(100);
        assert_eq!(enemy.health, 0);
        assert!(!enemy.is_alive());
    }
}
