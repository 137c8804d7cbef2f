//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to play a battle.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use tactics_core::{BattleEngine, BattlePhase, BattleSummary, Tick};

use crate::api::{ActionProvider, PlayerIntent, Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::workers::{Command, SimulationWorker};

/// How engine time moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockMode {
    /// Time only moves when the caller advances it; [`Runtime::step`] jumps
    /// straight to the next wake-up.
    #[default]
    Manual,
    /// The worker advances the engine by `tick_ms` every `tick_ms` of wall time.
    Realtime { tick_ms: u64 },
}

impl ClockMode {
    fn tick_period(self) -> Option<Duration> {
        match self {
            Self::Manual => None,
            Self::Realtime { tick_ms } => Some(Duration::from_millis(tick_ms.max(1))),
        }
    }
}

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub clock: ClockMode,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            clock: ClockMode::Manual,
            event_buffer_size: 256,
            command_buffer_size: 32,
        }
    }
}

/// What a single [`Runtime::step`] achieved.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Progress,
    Finished(BattleSummary),
}

/// Main runtime that plays one battle
///
/// Runtime owns the worker and asks the player provider for intents.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    clock: ClockMode,
    player_provider: Option<Box<dyn ActionProvider>>,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Moves the battle forward by one decision or one wake-up.
    ///
    /// Starts the battle if needed, lets pending suspensions elapse, and on
    /// the player's turn applies one intent from the provider. A rejected
    /// intent ends the turn instead.
    pub async fn step(&mut self) -> Result<StepOutcome> {
        let battle = self.handle.snapshot().await?;
        if let Some(summary) = battle.summary() {
            return Ok(StepOutcome::Finished(summary.clone()));
        }

        if battle.phase() == BattlePhase::NotStarted {
            self.handle.start().await?;
        } else if battle.is_busy() || battle.phase() == BattlePhase::EnemyTurn {
            self.let_time_pass(&battle).await?;
        } else {
            self.play_player_turn(&battle).await?;
        }
        Ok(StepOutcome::Progress)
    }

    async fn let_time_pass(&self, battle: &BattleEngine) -> Result<()> {
        match self.clock {
            ClockMode::Manual => {
                let dt = battle.time_to_next_wake().unwrap_or(Tick(1)).max(Tick(1));
                self.handle.advance(dt).await?;
            }
            ClockMode::Realtime { tick_ms } => {
                tokio::time::sleep(Duration::from_millis(tick_ms.max(1))).await;
            }
        }
        Ok(())
    }

    async fn play_player_turn(&self, battle: &BattleEngine) -> Result<()> {
        let provider = self
            .player_provider
            .as_ref()
            .ok_or(RuntimeError::ProviderNotSet)?;
        let intent = provider.provide_intent(battle).await?;

        match self.handle.act(intent).await {
            Err(RuntimeError::Rejected(error)) => {
                debug!(target: "tactics_runtime::runtime", %intent, %error, "falling back to end turn");
                self.handle.act(PlayerIntent::EndTurn).await
            }
            other => other,
        }
    }

    /// Steps until the battle ends.
    pub async fn run(&mut self) -> Result<BattleSummary> {
        loop {
            if let StepOutcome::Finished(summary) = self.step().await? {
                return Ok(summary);
            }
        }
    }

    /// Like [`Runtime::run`], but gives up after `max_steps` steps.
    pub async fn run_to_completion(&mut self, max_steps: usize) -> Result<BattleSummary> {
        for _ in 0..max_steps {
            if let StepOutcome::Finished(summary) = self.step().await? {
                return Ok(summary);
            }
        }
        Err(RuntimeError::StepLimit { steps: max_steps })
    }

    /// Reset the battle and start it again.
    pub async fn restart(&self, seed: Option<u64>) -> Result<()> {
        self.handle.restart(seed).await
    }

    /// Set the player action provider
    pub fn set_player_provider(&mut self, provider: impl ActionProvider + 'static) {
        self.player_provider = Some(Box::new(provider));
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every outstanding [`RuntimeHandle`] clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    engine: Option<BattleEngine>,
    player_provider: Option<Box<dyn ActionProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            engine: None,
            player_provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: ClockMode) -> Self {
        self.config.clock = clock;
        self
    }

    /// Set the battle to run (required)
    pub fn engine(mut self, engine: BattleEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Set player action provider (optional)
    pub fn player_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.player_provider = Some(Box::new(provider));
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let engine = self.engine.ok_or(RuntimeError::MissingEngine)?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let worker = SimulationWorker::new(
            engine,
            command_rx,
            event_bus,
            self.config.clock.tick_period(),
        );
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            clock: self.config.clock,
            player_provider: self.player_provider,
            worker_handle,
        })
    }
}
