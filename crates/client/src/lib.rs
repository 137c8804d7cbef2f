//! Headless tactics client.
//!
//! Composition root that loads content, builds the runtime and lets the
//! automatic player fight one battle.

pub mod config;

pub use config::ClientConfig;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use tactics_core::{BattleSummary, Notification};
use tactics_runtime::{AutoPlayer, Event, Runtime, Topic, build_engine};

/// Plays one battle to the end and returns its summary.
pub async fn play(config: &ClientConfig) -> Result<BattleSummary> {
    let content = config.content();
    info!(data_dir = %content.data_dir().display(), "loading content");

    let mut settings = content.load_settings_or_default()?;
    config.apply(&mut settings);
    let pool = content.load_cards_or_default()?;
    let roster = content.load_roster_or_default()?;

    let engine = build_engine(&settings, pool, &roster).context("failed to build the battle")?;
    let mut runtime = Runtime::builder()
        .engine(engine)
        .clock(config.clock())
        .player_provider(AutoPlayer::new())
        .build()
        .await?;

    let mut battle_events = runtime.handle().subscribe(Topic::Battle);
    let narrator = tokio::spawn(async move {
        loop {
            match battle_events.recv().await {
                Ok(Event::Notification(Notification::Message { text, .. })) => info!("{text}"),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "narrator fell behind"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let summary = runtime.run().await?;
    runtime.shutdown().await?;
    narrator.await.context("narrator task failed")?;

    Ok(summary)
}

/// Plain-text rendering of the final result.
pub fn render_summary(summary: &BattleSummary) -> String {
    let stats = &summary.statistics;
    format!(
        "{}\nTurns: {}\nDamage dealt: {}\nDamage received: {}",
        summary.message, stats.turns, stats.damage_dealt, stats.damage_received
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{BattleOutcome, BattleStatistics};

    #[test]
    fn summary_lists_every_statistic() {
        let summary = BattleSummary {
            outcome: BattleOutcome::PlayerWin,
            message: BattleOutcome::PlayerWin.headline().to_owned(),
            statistics: BattleStatistics {
                turns: 4,
                damage_dealt: 130,
                damage_received: 45,
            },
        };
        assert_eq!(
            render_summary(&summary),
            "Victory! The enemy is defeated!\nTurns: 4\nDamage dealt: 130\nDamage received: 45"
        );
    }

    #[tokio::test]
    async fn bundled_content_plays_to_the_end() {
        let config = ClientConfig {
            seed: Some(5),
            ..ClientConfig::default()
        };
        let summary = play(&config).await.unwrap();
        assert!(summary.statistics.turns <= 10);
    }
}
