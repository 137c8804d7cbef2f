//! Randomized stat-modifier cards.
//!
//! A [`CardPool`] is the fixed catalog. Each turn both sides draw a fresh
//! [`CardHand`] from the full pool; at most one card per hand may be used.

mod effect;
mod hand;
mod pool;

pub use effect::CardEffect;
pub use hand::CardHand;
pub use pool::{CardPool, draw_cards};

use crate::error::{ErrorSeverity, GameError};

/// A named effect bundle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub name: String,
    pub description: String,
    pub effect: CardEffect,
}

impl Card {
    pub fn new(name: impl Into<String>, description: impl Into<String>, effect: CardEffect) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            effect,
        }
    }

    /// Flavor text followed by the rendered modifier lines.
    pub fn full_description(&self) -> String {
        let modifiers = self.effect.describe();
        match (self.description.is_empty(), modifiers.is_empty()) {
            (true, _) => modifiers,
            (false, true) => self.description.clone(),
            (false, false) => format!("{}\n{}", self.description, modifiers),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardError {
    #[error("cards were already used this turn")]
    AlreadyUsed,

    #[error("no cards available")]
    NoCards,

    #[error("card index {index} out of range (hand holds {len})")]
    InvalidIndex { index: usize, len: usize },

    #[error("card '{name}' has no effect")]
    NoEffect { name: String },
}

impl GameError for CardError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyUsed | Self::NoCards => ErrorSeverity::Recoverable,
            Self::InvalidIndex { .. } | Self::NoEffect { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyUsed => "CARD_ALREADY_USED",
            Self::NoCards => "CARD_NONE_AVAILABLE",
            Self::InvalidIndex { .. } => "CARD_INVALID_INDEX",
            Self::NoEffect { .. } => "CARD_NO_EFFECT",
        }
    }
}
