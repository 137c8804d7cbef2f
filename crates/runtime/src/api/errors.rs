//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, battle setup, and rejected player
//! intents so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use tactics_core::{ActionError, GameError, SetupError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("player action provider not set")]
    ProviderNotSet,

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a battle engine before building")]
    MissingEngine,

    #[error("battle setup failed")]
    Setup(#[from] SetupError),

    #[error("failed to load battle content")]
    Content(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("intent rejected: {0}")]
    Rejected(#[from] ActionError),

    #[error("battle did not finish within {steps} steps")]
    StepLimit { steps: usize },
}

impl RuntimeError {
    /// True when the worker is gone and the runtime cannot continue.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Rejected(error) => error.severity().is_fatal(),
            Self::Setup(_) => true,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => true,
            _ => false,
        }
    }
}
