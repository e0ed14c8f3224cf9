//! Core engine types: players, state, moves, RNG, configuration.

pub mod player;
pub mod rng;
pub mod config;
pub mod moves;
pub mod state;

pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::GameRng;
pub use config::GameConfig;
pub use moves::{Beat, CardDelta, Move, MoveDelta, MoveKind};
pub use state::{GameState, InvariantViolation, StateBuilder, HAND_SIZE};
