//! Phases of the round state machine.
//!
//! ```text
//! AwaitingAttack(a) --attack--> AwaitingDefend(d)
//! AwaitingDefend(d) --partial defend--> AwaitingThrowIn --throw-in/pass--> AwaitingDefend(d)
//! AwaitingDefend(d) --redirect--> AwaitingDefend(a)        (roles swap)
//! AwaitingDefend(d) --full defend | pickup--> RoundResolving --> AwaitingAttack(..) | GameOver
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::moves::MoveKind;
use crate::core::player::PlayerId;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Both hands emptied on the same replenishment.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }

    /// The winner, if any.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            GameResult::Winner(p) => Some(*p),
            GameResult::Draw => None,
        }
    }
}

/// Where the game is in the round cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The attacker must open a round.
    AwaitingAttack(PlayerId),
    /// The defender must defend, redirect, or pick up.
    AwaitingDefend(PlayerId),
    /// The attacker may throw in more cards or pass.
    AwaitingThrowIn,
    /// Board clearing, replenishment and win detection are running.
    RoundResolving,
    /// Terminal.
    GameOver(GameResult),
}

impl Phase {
    /// Move kinds accepted in this phase.
    #[must_use]
    pub fn accepts(self, kind: MoveKind) -> bool {
        match self {
            Phase::AwaitingAttack(_) => kind == MoveKind::Attack,
            Phase::AwaitingDefend(_) => matches!(
                kind,
                MoveKind::Defend | MoveKind::Redirect | MoveKind::Pickup
            ),
            Phase::AwaitingThrowIn => matches!(kind, MoveKind::ThrowIn | MoveKind::Attack),
            Phase::RoundResolving | Phase::GameOver(_) => false,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::GameOver(_))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::AwaitingAttack(p) => write!(f, "awaiting attack by {p}"),
            Phase::AwaitingDefend(p) => write!(f, "awaiting defence by {p}"),
            Phase::AwaitingThrowIn => f.write_str("awaiting throw-in"),
            Phase::RoundResolving => f.write_str("resolving the round"),
            Phase::GameOver(GameResult::Winner(p)) => write!(f, "game over, {p} won"),
            Phase::GameOver(GameResult::Draw) => f.write_str("game over, draw"),
        }
    }
}
