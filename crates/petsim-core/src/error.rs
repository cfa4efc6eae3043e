//! Errors returned by engine operations.
//!
//! Every fallible command returns `Result<_, GameError>`. The error's
//! `Display` output is the message a host shows to the player; no variant
//! leaves the session in a partially mutated state.

use thiserror::Error;

/// Failure of a game command
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    // Validation
    #[error("unsupported species: {0}")]
    UnknownSpecies(String),

    #[error("{pet} isn't interested in {food}...")]
    UnknownFood { pet: String, food: String },

    #[error("there is no game called {0}...")]
    UnknownGame(String),

    #[error("the shop doesn't sell {0}...")]
    UnknownItem(String),

    #[error("unknown skill: {0}")]
    UnknownSkill(String),

    #[error("unknown activity: {0}")]
    UnknownActivity(String),

    #[error("unknown daily task: {0}")]
    UnknownTask(String),

    #[error("the name {0} is already taken!")]
    DuplicateName(String),

    #[error("invalid contest slot {0}")]
    InvalidContestSlot(usize),

    #[error("discount for {name} must be between 0 and 1, got {fraction}")]
    InvalidDiscount { name: String, fraction: f64 },

    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("{0} can't interact with itself")]
    SelfInteraction(String),

    // Preconditions
    #[error("can't find a pet named {0}...")]
    PetNotFound(String),

    #[error("no sold pet named {0}...")]
    SoldPetNotFound(String),

    #[error("{0} is too tired and needs a rest")]
    TooTired(String),

    #[error("{0} is asleep")]
    Asleep(String),

    #[error("{0} is already asleep")]
    AlreadyAsleep(String),

    #[error("{0} is already awake")]
    AlreadyAwake(String),

    #[error("{pet} hasn't learned {skill} yet")]
    SkillNotLearned { pet: String, skill: String },

    #[error("pet level too low, level {required} required")]
    LevelTooLow { required: u32 },

    #[error("not enough coins: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("out of {0}, buy more first")]
    OutOfStock(String),

    #[error("{0} has already reached the maximum level!")]
    MaxLevel(String),
}

impl GameError {
    /// True for failures caused by the pet's or session's current state
    /// rather than by a bad identifier. Contest entry fees are refunded on
    /// these.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            GameError::PetNotFound(_)
                | GameError::SoldPetNotFound(_)
                | GameError::TooTired(_)
                | GameError::Asleep(_)
                | GameError::AlreadyAsleep(_)
                | GameError::AlreadyAwake(_)
                | GameError::SkillNotLearned { .. }
                | GameError::LevelTooLow { .. }
                | GameError::InsufficientFunds { .. }
                | GameError::OutOfStock(_)
                | GameError::MaxLevel(_)
        )
    }
}
