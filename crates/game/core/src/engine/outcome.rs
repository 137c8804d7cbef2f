//! Battle result determination and final statistics.

use tracing::info;

use crate::event::Notification;

use super::{BattleEngine, BattlePhase};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    PlayerWin,
    EnemyWin,
    Draw,
}

impl BattleOutcome {
    /// Short banner shown when the battle ends.
    pub fn headline(self) -> &'static str {
        match self {
            Self::PlayerWin => "Victory! The enemy is defeated!",
            Self::EnemyWin => "Defeat! Your hero has fallen!",
            Self::Draw => "Draw!",
        }
    }
}

/// Maps squad defeat flags to a result. `None` while both sides stand.
pub fn determine_battle_result(
    player_defeated: bool,
    enemy_defeated: bool,
) -> Option<BattleOutcome> {
    match (player_defeated, enemy_defeated) {
        (true, true) => Some(BattleOutcome::Draw),
        (false, true) => Some(BattleOutcome::PlayerWin),
        (true, false) => Some(BattleOutcome::EnemyWin),
        (false, false) => None,
    }
}

/// Player-side totals. Damage is counted after armor mitigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleStatistics {
    pub turns: u32,
    pub damage_dealt: u32,
    pub damage_received: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSummary {
    pub outcome: BattleOutcome,
    pub message: String,
    pub statistics: BattleStatistics,
}

impl BattleEngine {
    /// Concludes the battle if either squad is out of fighters.
    ///
    /// Returns true when the battle is over, whether it ended now or earlier.
    pub(super) fn check_battle_end(&mut self) -> bool {
        if self.is_battle_over() {
            return true;
        }
        match determine_battle_result(
            self.player.is_squad_defeated(),
            self.enemy.is_squad_defeated(),
        ) {
            Some(outcome) => {
                self.conclude(outcome);
                true
            }
            None => false,
        }
    }

    pub(super) fn conclude(&mut self, outcome: BattleOutcome) {
        self.turn.phase = BattlePhase::BattleOver(outcome);
        self.suspension = None;
        self.clear_pending();
        self.player_hand.close();
        self.enemy_hand.close();
        self.notify(Notification::ActionButtons { visible: false });

        self.statistics.turns = match self.config.max_turns {
            0 => self.turn.turn,
            cap => self.turn.turn.min(cap),
        };
        let message = match outcome {
            BattleOutcome::Draw
                if self.player.is_squad_defeated() && self.enemy.is_squad_defeated() =>
            {
                "Draw! Every hero has fallen!".to_owned()
            }
            BattleOutcome::Draw => "Draw! The turn limit was reached.".to_owned(),
            other => other.headline().to_owned(),
        };
        let summary = BattleSummary {
            outcome,
            message,
            statistics: self.statistics,
        };

        info!(
            target: "tactics_core::engine",
            %outcome,
            turns = summary.statistics.turns,
            damage_dealt = summary.statistics.damage_dealt,
            damage_received = summary.statistics.damage_received,
            "battle over"
        );
        self.notify(Notification::BattleEnded(summary.clone()));
        self.summary = Some(summary);
    }
}
