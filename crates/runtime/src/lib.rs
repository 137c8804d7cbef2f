//! Async orchestration around the deterministic battle engine.
//!
//! This crate runs a [`tactics_core::BattleEngine`] inside a background
//! worker and exposes it through a cloneable [`RuntimeHandle`]. Consumers embed
//! [`Runtime`] to play a battle with a pluggable [`ActionProvider`], subscribe
//! to events, and drive time either from the wall clock or by hand.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`providers`] ships stock player policies
//! - [`setup`] assembles an engine from loaded content
//! - `workers` keeps the simulation task internal to the crate
pub mod api;
pub mod events;
pub mod providers;
pub mod runtime;
pub mod setup;

mod workers;

pub use api::{ActionProvider, PlayerIntent, Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, RuntimeEvent, Topic, TurnEvent};
pub use providers::{AutoPlayer, PassTurnProvider};
pub use runtime::{ClockMode, Runtime, RuntimeBuilder, RuntimeConfig, StepOutcome};
pub use setup::{build_engine, build_engine_from_dir};
