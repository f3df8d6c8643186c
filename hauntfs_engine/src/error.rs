//! Engine error taxonomy.
//!
//! Errors fall in two families: *content* errors mean the world definition
//! (or a dynamically built effect descriptor) references something that
//! does not exist and authoring needs fixing; *state* errors mean a command
//! was valid in form but not in the current game state, and the player is
//! simply re-prompted. [`GameError::is_content_error`] distinguishes them.

use hauntfs_data::Id;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A reference to a definition id that is not in the registry.
    #[error("unknown {kind} id '{id}'")]
    UnknownId { kind: &'static str, id: Id },

    #[error("no exit leads to '{0}' from here")]
    NoSuchExit(Id),
    #[error("'{room}' is locked{}", .key.as_ref().map(|k| format!("; you need the {k} to enter")).unwrap_or_default())]
    RoomLocked { room: Id, key: Option<Id> },
    #[error("'{0}' is not here")]
    NotPresent(Id),
    #[error("you aren't carrying '{0}'")]
    NotInInventory(Id),
    #[error("'{0}' cannot be taken")]
    NotTakeable(Id),
    #[error("'{0}' has no obvious use")]
    NotUsable(Id),
    #[error("'{0}' cannot be used in combat")]
    NotCombatUsable(Id),
    #[error("your class cannot use '{0}'")]
    ClassRestricted(Id),
    #[error("there is nothing legible about '{0}'")]
    NotReadable(Id),
    #[error("this combat has already concluded")]
    CombatOver,
    #[error("'{0}' is not an attack you can perform")]
    UnknownAttack(Id),
    #[error("you have not learned the spell '{0}'")]
    SpellNotLearned(Id),
    #[error("'{0}' needs {1} more round(s) to recharge")]
    OnCooldown(Id, u32),
}

impl GameError {
    /// True for errors that indicate broken world content rather than a
    /// command that merely doesn't apply right now.
    pub fn is_content_error(&self) -> bool {
        matches!(self, GameError::UnknownId { .. })
    }

    /// True for errors the game loop answers with a re-prompt.
    pub fn is_state_error(&self) -> bool {
        !self.is_content_error()
    }
}
