//! Error types for the rules core

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MtgError {
    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("Action rejected: {0}")]
    ActionRejected(RejectReason),

    #[error("Unknown ability key: {0}")]
    UnknownAbility(String),

    #[error("Invalid parameters for ability '{key}': {message}")]
    InvalidAbilityParams { key: String, message: String },

    #[error("Card definition not found: {0}")]
    MissingCardDefinition(String),

    #[error("State-based actions did not reach a fixpoint after {iterations} iterations")]
    StateBasedActionsDiverged { iterations: u32 },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MtgError>;

/// Why an action was refused
///
/// Rejections never mutate the game; the reason is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    UnknownPlayer,
    PlayerHasLost,
    NotPriorityHolder,
    NotActivePlayer,
    NotMainPhase,
    StackNotEmpty,
    CardNotFound,
    CardNotInHand,
    NotALand,
    LandLimitReached,
    CardNotOnBattlefield,
    NotController,
    AbilityNotFound,
    NotActivatedAbility,
    AbilityCannotActivate,
    CostUnpayable,
    GameOver,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::UnknownPlayer => "player is not part of this game",
            RejectReason::PlayerHasLost => "player has already lost the game",
            RejectReason::NotPriorityHolder => "player does not hold priority",
            RejectReason::NotActivePlayer => "player is not the active player",
            RejectReason::NotMainPhase => "lands can only be played in a main phase",
            RejectReason::StackNotEmpty => "the stack is not empty",
            RejectReason::CardNotFound => "card does not exist",
            RejectReason::CardNotInHand => "card is not in the player's hand",
            RejectReason::NotALand => "card is not a land",
            RejectReason::LandLimitReached => "no land plays remaining this turn",
            RejectReason::CardNotOnBattlefield => "card is not on the battlefield",
            RejectReason::NotController => "player does not control the card",
            RejectReason::AbilityNotFound => "card has no such ability",
            RejectReason::NotActivatedAbility => "ability is not an activated ability",
            RejectReason::AbilityCannotActivate => "ability cannot be activated now",
            RejectReason::CostUnpayable => "cost cannot be paid",
            RejectReason::GameOver => "the game is over",
        };
        f.write_str(text)
    }
}
