//! Outbound notifications for the presentation layer.
//!
//! The engine appends to a FIFO queue as it resolves each step; callers drain
//! it with [`crate::BattleEngine::drain_notifications`]. Characters keep their
//! own outbox of [`CharacterEvent`]s, which the engine forwards in order.

use crate::character::AttackType;
use crate::engine::BattleSummary;
use crate::grid::HighlightMode;
use crate::types::{CharacterId, Position, Team, Tick};

/// Stat change raised by a single character.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharacterEvent {
    HealthChanged { current: u32, max: u32 },
    ArmorChanged { current: i32, max: i32 },
    EnergyChanged { current: f32, max: f32 },
    AttackChanged { attack_type: AttackType, power: i32, range: u32 },
    /// Health actually removed, after armor and capped at what was left.
    DamageTaken { amount: u32 },
    Died,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification {
    Character {
        id: CharacterId,
        event: CharacterEvent,
    },
    TurnChanged {
        turn: u32,
        team: Team,
    },
    ActionsRemaining {
        remaining: u32,
    },
    ActionButtons {
        visible: bool,
    },
    Message {
        text: String,
        duration: Tick,
    },
    Highlight {
        cells: Vec<Position>,
        kind: HighlightMode,
    },
    ClearHighlights,
    WeaponSelectionRequested,
    CardsOffered {
        team: Team,
        cards: Vec<String>,
    },
    CardUsed {
        team: Team,
        character: CharacterId,
        card: String,
    },
    CardsDiscarded {
        team: Team,
    },
    MovementStarted {
        id: CharacterId,
        path: Vec<Position>,
    },
    CharacterMoved {
        id: CharacterId,
        from: Option<Position>,
        to: Position,
    },
    ActiveCharacterChanged {
        team: Team,
        id: CharacterId,
    },
    BattleEnded(BattleSummary),
}

impl Notification {
    pub fn message(text: impl Into<String>, duration: Tick) -> Self {
        Notification::Message {
            text: text.into(),
            duration,
        }
    }

    /// Short tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::Character { .. } => "character",
            Notification::TurnChanged { .. } => "turn_changed",
            Notification::ActionsRemaining { .. } => "actions_remaining",
            Notification::ActionButtons { .. } => "action_buttons",
            Notification::Message { .. } => "message",
            Notification::Highlight { .. } => "highlight",
            Notification::ClearHighlights => "clear_highlights",
            Notification::WeaponSelectionRequested => "weapon_selection",
            Notification::CardsOffered { .. } => "cards_offered",
            Notification::CardUsed { .. } => "card_used",
            Notification::CardsDiscarded { .. } => "cards_discarded",
            Notification::MovementStarted { .. } => "movement_started",
            Notification::CharacterMoved { .. } => "character_moved",
            Notification::ActiveCharacterChanged { .. } => "active_changed",
            Notification::BattleEnded(_) => "battle_ended",
        }
    }
}
