//! Durak rules: dealing, move validation, round resolution, win detection.
//!
//! `Engine` is the entry point. The other modules hold the individual
//! pieces of the rule set and work on candidate `GameState` values; they
//! never see the committed state directly.

mod attack;
pub mod deal;
mod defend;
pub mod engine;
pub mod error;
pub mod phase;
mod round;
mod win;

pub use deal::deal;
pub use engine::Engine;
pub use error::{ConfigError, ContractViolation, RejectionReason, SubmitError};
pub use phase::{GameResult, Phase};
