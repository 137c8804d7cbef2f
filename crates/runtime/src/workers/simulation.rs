//! Simulation worker that owns the authoritative [`BattleEngine`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), applies them
//! to the engine, and publishes every resulting notification to the EventBus.
//! The worker is also the outer game loop: it closes the battle once the turn
//! counter passes `max_turns`.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, trace};

use tactics_core::{BattleEngine, Notification, Tick};

use crate::api::{PlayerIntent, Result, RuntimeError};
use crate::events::{Event, EventBus, RuntimeEvent, TurnEvent};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Bootstrap the battle (place characters, open turn 1).
    Start { reply: oneshot::Sender<Result<()>> },
    /// Apply one player intent.
    Act {
        intent: PlayerIntent,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Advance engine time by `dt`.
    Advance {
        dt: Tick,
        reply: oneshot::Sender<Tick>,
    },
    /// Advance until the engine is idle or `limit` ticks pass. Replies with
    /// the ticks consumed.
    RunUntilIdle {
        limit: Tick,
        reply: oneshot::Sender<Tick>,
    },
    /// Clone of the current engine (read-only snapshot).
    Snapshot { reply: oneshot::Sender<BattleEngine> },
    /// Reset every entity and start over, optionally under a new seed.
    Restart {
        seed: Option<u64>,
        reply: oneshot::Sender<Result<()>>,
    },
}

/// Background task that processes battle commands.
///
/// In realtime mode the worker also advances the engine on its own whenever a
/// suspension is pending, one tick period at a time.
pub struct SimulationWorker {
    engine: BattleEngine,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    tick_period: Option<Duration>,
    finish_announced: bool,
}

impl SimulationWorker {
    pub fn new(
        engine: BattleEngine,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        tick_period: Option<Duration>,
    ) -> Self {
        info!(
            target: "tactics_runtime::worker",
            seed = engine.seed(),
            players = engine.player_squad().member_count(),
            enemies = engine.enemy_squad().member_count(),
            max_turns = engine.config().max_turns,
            realtime = tick_period.is_some(),
            "simulation worker initialized"
        );

        Self {
            engine,
            command_rx,
            event_bus,
            tick_period,
            finish_announced: false,
        }
    }

    /// Main worker loop. Ends once every command sender is dropped.
    pub async fn run(mut self) {
        let mut ticker = self.tick_period.map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = next_tick(&mut ticker) => self.on_tick(),
            }
        }

        debug!(target: "tactics_runtime::worker", "command channel closed, worker stopping");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Start { reply } => {
                let result = self.engine.start_battle().map_err(RuntimeError::from);
                self.flush();
                if reply.send(result).is_err() {
                    debug!(target: "tactics_runtime::worker", "Start reply channel closed (caller dropped)");
                }
            }
            Command::Act { intent, reply } => {
                let result = self.apply_intent(intent);
                if reply.send(result).is_err() {
                    debug!(target: "tactics_runtime::worker", "Act reply channel closed (caller dropped)");
                }
            }
            Command::Advance { dt, reply } => {
                self.engine.advance(dt);
                self.flush();
                if reply.send(self.engine.clock()).is_err() {
                    debug!(target: "tactics_runtime::worker", "Advance reply channel closed (caller dropped)");
                }
            }
            Command::RunUntilIdle { limit, reply } => {
                let consumed = self.engine.run_until_idle(limit);
                self.flush();
                if reply.send(consumed).is_err() {
                    debug!(target: "tactics_runtime::worker", "RunUntilIdle reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.engine.clone()).is_err() {
                    debug!(target: "tactics_runtime::worker", "Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::Restart { seed, reply } => {
                let result = self.restart(seed);
                if reply.send(result).is_err() {
                    debug!(target: "tactics_runtime::worker", "Restart reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn apply_intent(&mut self, intent: PlayerIntent) -> Result<()> {
        let result = intent.apply(&mut self.engine);
        if let Err(error) = &result {
            debug!(target: "tactics_runtime::worker", %intent, %error, "intent rejected");
            self.event_bus
                .publish(Event::Runtime(RuntimeEvent::IntentRejected {
                    intent,
                    error: error.to_string(),
                }));
        } else {
            trace!(target: "tactics_runtime::worker", %intent, clock = %self.engine.clock(), "intent applied");
        }
        self.flush();
        result.map_err(RuntimeError::from)
    }

    fn restart(&mut self, seed: Option<u64>) -> Result<()> {
        if let Some(seed) = seed {
            self.engine.reseed(seed);
        }
        self.engine.reset_state();
        self.finish_announced = false;
        info!(target: "tactics_runtime::worker", seed = self.engine.seed(), "battle restarted");
        self.event_bus.publish(Event::Runtime(RuntimeEvent::Restarted {
            seed: self.engine.seed(),
        }));

        let result = self.engine.start_battle().map_err(RuntimeError::from);
        self.flush();
        result
    }

    fn on_tick(&mut self) {
        let Some(period) = self.tick_period else {
            return;
        };
        if !self.engine.is_busy() {
            return;
        }
        let dt = Tick(u64::try_from(period.as_millis()).unwrap_or(u64::MAX).max(1));
        self.engine.advance(dt);
        self.flush();
    }

    /// Publishes pending notifications and enforces the turn cap.
    fn flush(&mut self) {
        self.publish_notifications();

        let max_turns = self.engine.config().max_turns;
        if max_turns > 0
            && !self.engine.is_battle_over()
            && self.engine.current_turn() > max_turns
            && self.engine.end_battle_at_turn_limit().is_ok()
        {
            self.event_bus
                .publish(Event::Runtime(RuntimeEvent::TurnLimitReached { max_turns }));
            self.publish_notifications();
        }

        if !self.finish_announced
            && let Some(summary) = self.engine.summary()
        {
            self.finish_announced = true;
            self.event_bus
                .publish(Event::Runtime(RuntimeEvent::Finished(summary.clone())));
        }
    }

    fn publish_notifications(&mut self) {
        let clock = self.engine.clock();
        for notification in self.engine.drain_notifications() {
            if let Notification::TurnChanged { turn, team } = notification {
                self.event_bus
                    .publish(Event::Turn(TurnEvent { turn, team, clock }));
            }
            self.event_bus.publish(Event::Notification(notification));
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
