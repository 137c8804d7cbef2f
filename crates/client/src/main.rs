//! Tactics client binary.
//!
//! Loads `.env`, sets up logging, then auto-plays one battle and prints the
//! summary to stdout.
//!
//! ```bash
//! TACTICS_SEED=7 TACTICS_SUMMARY_JSON=1 cargo run -p tactics-client
//! ```

use anyhow::Result;
use tactics_client::{ClientConfig, play, render_summary};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(?config, "starting tactics client");

    let summary = play(&config).await?;
    if config.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", render_summary(&summary));
    }

    Ok(())
}
