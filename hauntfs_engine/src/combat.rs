//! Turn-based combat resolution.
//!
//! A [`CombatSession`] binds the player to one enemy instance. Each call
//! to [`CombatSession::resolve_turn`] runs a full round: the player's
//! action, a victory check, the enemy's counterattack, then end-of-round
//! bookkeeping (cooldowns and status durations). Invalid selections
//! (unknown attack, cooldown, spell not learned) fail before any state
//! changes, so the round is not consumed.

use hauntfs_data::{AttackKind, Id};
use log::{error, info};
use rand::Rng;

use crate::GameError;
use crate::effect::apply_effect;
use crate::item::use_item;
use crate::world::{InstanceId, Location, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatState {
    Engaged,
    Victory,
    Defeat,
}

/// What the player does with their side of a round.
#[derive(Debug, Clone)]
pub enum CombatAction {
    /// Perform an attack by id.
    Attack(Id),
    /// Use an inventory item by definition id; it must be combat-usable.
    UseItem(Id),
}

#[derive(Debug)]
pub struct TurnOutcome {
    pub messages: Vec<String>,
    pub state: CombatState,
}

pub struct CombatSession {
    pub enemy: InstanceId,
    pub state: CombatState,
    pub round: u32,
    /// Reduction fraction armed by the player's last landed attack,
    /// consumed by the next enemy strike.
    pending_reduction: f64,
}

impl CombatSession {
    /// Starts combat against a named enemy in the player's current room.
    pub fn engage(world: &mut World, enemy_id: &str) -> Result<(Self, Vec<String>), GameError> {
        let def = world.registry.enemy(enemy_id)?.clone();
        let current_room = world.player.current_room.clone();
        let instance = world
            .find_enemy_in_room(&current_room, enemy_id)
            .ok_or_else(|| GameError::NotPresent(enemy_id.to_string()))?;

        world.player.cooldowns.clear();
        let mut messages = vec![format!("You engage the {}!", def.name)];
        if let Some(line) = &def.dialogue {
            messages.push(format!("{}: \"{line}\"", def.name));
        }
        info!("└─ combat: engaged '{enemy_id}' ({instance})");
        Ok((
            CombatSession {
                enemy: instance,
                state: CombatState::Engaged,
                round: 1,
                pending_reduction: 0.0,
            },
            messages,
        ))
    }

    /// Checks the player's current room for an enemy that attacks on
    /// sight. If one is there, combat starts and the enemy gets a free
    /// opening strike before the player's first turn.
    pub fn engage_on_entry(world: &mut World) -> Result<Option<(Self, Vec<String>)>, GameError> {
        let Some(instance) = world.first_auto_attacker() else {
            return Ok(None);
        };
        let def_id = world
            .enemies
            .get(&instance)
            .ok_or_else(|| GameError::UnknownId {
                kind: "enemy instance",
                id: instance.to_string(),
            })?
            .def_id
            .clone();
        let def = world.registry.enemy(&def_id)?.clone();

        world.player.cooldowns.clear();
        let mut messages = vec![format!("The {} lunges at you!", def.name)];
        if let Some(line) = &def.dialogue {
            messages.push(format!("{}: \"{line}\"", def.name));
        }
        info!("└─ combat: auto-engaged '{def_id}' ({instance})");

        let mut session = CombatSession {
            enemy: instance,
            state: CombatState::Engaged,
            round: 1,
            pending_reduction: 0.0,
        };
        session.enemy_strike(world, &mut messages)?;
        Ok(Some((session, messages)))
    }

    /// Resolves one full combat round around the given player action.
    pub fn resolve_turn(
        &mut self,
        world: &mut World,
        action: &CombatAction,
    ) -> Result<TurnOutcome, GameError> {
        if self.state != CombatState::Engaged {
            return Err(GameError::CombatOver);
        }
        let mut messages = Vec::new();
        match action {
            CombatAction::Attack(attack_id) => {
                self.player_attack(world, attack_id, &mut messages)?;
            }
            CombatAction::UseItem(item_id) => {
                let combat_usable = world.registry.item(item_id)?.usable_in_combat;
                if !combat_usable {
                    return Err(GameError::NotCombatUsable(item_id.clone()));
                }
                messages.extend(use_item(world, item_id)?);
            }
        }

        let enemy_down = world
            .enemies
            .get(&self.enemy)
            .is_none_or(|enemy| !enemy.is_alive());
        if enemy_down {
            self.state = CombatState::Victory;
            self.finish_victory(world, &mut messages)?;
            return Ok(TurnOutcome {
                messages,
                state: self.state,
            });
        }

        self.enemy_strike(world, &mut messages)?;
        if self.state == CombatState::Engaged {
            world.player.tick_cooldowns();
            messages.extend(world.player.tick_status_effects());
            self.round += 1;
        }
        Ok(TurnOutcome {
            messages,
            state: self.state,
        })
    }

    /// Validates and executes the player's attack. All rejections happen
    /// before any mutation so a bad selection does not consume the round.
    fn player_attack(
        &mut self,
        world: &mut World,
        attack_id: &str,
        messages: &mut Vec<String>,
    ) -> Result<(), GameError> {
        let Some(attack) = world.registry.attacks.get(attack_id).cloned() else {
            return Err(GameError::UnknownAttack(attack_id.to_string()));
        };
        if !world.player.has_attack(attack_id) {
            return Err(if attack.kind == AttackKind::Spell {
                GameError::SpellNotLearned(attack_id.to_string())
            } else {
                GameError::UnknownAttack(attack_id.to_string())
            });
        }
        let remaining = world.player.cooldown_remaining(attack_id);
        if remaining > 0 {
            return Err(GameError::OnCooldown(attack_id.to_string(), remaining));
        }

        if attack.healing > 0 {
            let healed = world.player.heal(attack.healing);
            messages.push(format!("{} restores {healed} health.", attack.name));
        }

        let hit = attack.accuracy >= 1.0 || world.rng.random_bool(attack.accuracy);
        let enemy_name = {
            let enemy = world
                .enemies
                .get_mut(&self.enemy)
                .ok_or_else(|| GameError::UnknownId {
                    kind: "enemy instance",
                    id: self.enemy.to_string(),
                })?;
            let name = world
                .registry
                .enemies
                .get(&enemy.def_id)
                .map_or_else(|| enemy.def_id.clone(), |d| d.name.clone());
            if hit {
                let damage = world.player.attack_damage() + attack.bonus_damage;
                enemy.take_damage(damage);
                messages.push(format!("You hit the {name} with {} for {damage} damage!", attack.name));
            } else {
                messages.push(format!("Your {} misses the {name}!", attack.name));
            }
            name
        };
        if hit && attack.enemy_damage_reduction > 0.0 {
            self.pending_reduction = attack.enemy_damage_reduction;
            messages.push(format!("The {enemy_name} reels; its next strike is weakened."));
        }
        world.player.set_cooldown(attack_id, attack.cooldown);
        info!("└─ combat: '{attack_id}' hit={hit} round={}", self.round);
        Ok(())
    }

    /// The enemy's counterattack. Consumes any pending damage reduction.
    fn enemy_strike(&mut self, world: &mut World, messages: &mut Vec<String>) -> Result<(), GameError> {
        let def_id = world
            .enemies
            .get(&self.enemy)
            .ok_or_else(|| GameError::UnknownId {
                kind: "enemy instance",
                id: self.enemy.to_string(),
            })?
            .def_id
            .clone();
        let def = world.registry.enemy(&def_id)?.clone();

        let mut damage = def.damage;
        if self.pending_reduction > 0.0 {
            damage = (f64::from(damage) * (1.0 - self.pending_reduction)) as u32;
            self.pending_reduction = 0.0;
            messages.push(format!("The {}'s strike is blunted!", def.name));
        }
        world.player.take_damage(damage);
        messages.push(format!("The {} hits you for {damage} damage!", def.name));

        if !world.player.is_alive() {
            self.state = CombatState::Defeat;
            messages.push("You collapse. The filesystem claims you.".to_string());
            info!("└─ combat: player defeated by '{def_id}'");
        }
        Ok(())
    }

    /// Settles a won fight: defeat effect, drop rolls, cleanup.
    fn finish_victory(&self, world: &mut World, messages: &mut Vec<String>) -> Result<(), GameError> {
        let Some(enemy) = world.enemies.get(&self.enemy) else {
            return Ok(());
        };
        let def = world.registry.enemy(&enemy.def_id)?.clone();
        let room_id = enemy
            .location
            .room_ref()
            .cloned()
            .unwrap_or_else(|| world.player.current_room.clone());
        messages.push(format!("You defeated the {}!", def.name));
        info!("└─ combat: '{}' defeated in round {}", def.id, self.round);
        world.remove_enemy_instance(self.enemy);

        if let Some(effect) = &def.on_defeat {
            match apply_effect(world, effect) {
                Ok(outcome) => messages.extend(outcome.messages),
                Err(err) if err.is_content_error() => {
                    error!("on_defeat effect for '{}' is broken: {err}", def.id);
                    messages.push(format!("[content error: {err}]"));
                }
                Err(err) => return Err(err),
            }
        }

        for drop in &def.drops {
            let roll = world.rng.random_range(0..100u32);
            if roll >= drop.chance {
                info!("└─ drop '{}' missed (rolled {roll} vs {})", drop.item, drop.chance);
                continue;
            }
            if world
                .spawn_item_instance(&drop.item, Location::Room(room_id.clone()))?
                .is_some()
            {
                let name = world.registry.item(&drop.item)?.name.clone();
                messages.push(format!("The {} dropped: {name}!", def.name));
            }
        }
        world.player.cooldowns.clear();
        Ok(())
    }
}
