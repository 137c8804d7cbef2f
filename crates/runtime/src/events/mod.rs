//! Event bus and event types for the runtime.
//!
//! Engine notifications, turn hand-offs and runtime lifecycle changes are
//! routed to separate topics so subscribers only see what they care about.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{RuntimeEvent, TurnEvent};
