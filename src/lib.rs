//! # durak-engine
//!
//! Rule engine for two-player Podkidnoy Durak with redirects (Perevodnoy)
//! on a 32-card deck.
//!
//! ## Design Principles
//!
//! 1. **Sets, not grids**: every card location is a 32-bit `CardSet`, so
//!    conservation and containment checks are plain set algebra.
//!
//! 2. **Validate, then commit**: a move is applied to a candidate copy of
//!    the state. The committed state only changes when every check passes.
//!
//! 3. **Two error tiers**: moves touching state the player does not control
//!    are caller bugs (`ContractViolation`); legal-looking moves that break
//!    a rule are rejected with a `RejectionReason` and can be retried.
//!
//! ## Modules
//!
//! - `cards`: cards, ranks, suits, card sets
//! - `core`: players, game state, moves, RNG, configuration
//! - `rules`: the engine, dealing, validation, round resolution, win detection
//! - `record`: packed wire record of a state
//!
//! ## Quick start
//!
//! ```
//! use durak_engine::{Engine, GameConfig, Phase};
//!
//! let mut engine = Engine::new(GameConfig::new().with_seed(7)).unwrap();
//! while !engine.state().is_over() {
//!     let mv = engine.legal_moves().into_iter().next().unwrap();
//!     engine.submit(mv).unwrap();
//! }
//! assert!(matches!(engine.phase(), Phase::GameOver(_)));
//! ```

pub mod cards;
pub mod core;
pub mod record;
pub mod rules;

pub use crate::cards::{Card, CardParseError, CardSet, Rank, RankSet, Suit};

pub use crate::core::{
    Beat, CardDelta, GameConfig, GameRng, GameState, InvariantViolation, Move, MoveDelta,
    MoveKind, PlayerId, PlayerMap, StateBuilder, HAND_SIZE, PLAYER_COUNT,
};

pub use crate::rules::{
    ConfigError, ContractViolation, Engine, GameResult, Phase, RejectionReason, SubmitError,
};

pub use crate::record::{RecordError, StateRecord};
