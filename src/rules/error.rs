//! Error tiers of the rule engine.
//!
//! - `ContractViolation`: the move touches state it has no authority over.
//!   These are caller bugs; `Engine::submit` refuses to evaluate and panics.
//! - `RejectionReason`: a well-formed move that is not a legal play right
//!   now. The state stays unchanged and the same player may try again.

use thiserror::Error;

use crate::cards::{Card, CardSet};
use crate::core::moves::MoveKind;
use crate::core::player::PlayerId;

use super::phase::Phase;

/// A move reaching outside the acting player's authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("{player} is not a seat at this table")]
    UnknownPlayer { player: PlayerId },

    #[error("move changes the opponent's hand ({cards})")]
    OpponentHandTouched { cards: CardSet },

    #[error("move moves cards in or out of the unplayed set directly ({cards})")]
    UnplayedTouched { cards: CardSet },

    #[error("move adds cards to a hand directly ({cards})")]
    HandGrowth { cards: CardSet },

    #[error("move takes cards off the board ({cards})")]
    BoardRemoval { cards: CardSet },

    #[error("move adds and removes the same card in one location")]
    ConflictingDelta,

    #[error("pickup must not carry a card delta")]
    PickupWithCards,

    #[error("{kind} move carries defend pairings")]
    PairsOnNonDefend { kind: MoveKind },

    #[error("cannot combine a {left} move with a {right} move")]
    CombineMismatch { left: MoveKind, right: MoveKind },
}

/// Why a well-formed move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("the game is over")]
    GameOver,

    #[error("it is {expected}'s turn, not {actual}'s")]
    OutOfTurn { expected: PlayerId, actual: PlayerId },

    #[error("a {kind} move is not allowed while {phase}")]
    WrongPhase { kind: MoveKind, phase: Phase },

    #[error("a {kind} move needs at least one card")]
    EmptyMove { kind: MoveKind },

    #[error("the hand, board and pending changes of the move do not match")]
    UnbalancedDelta,

    #[error("{card} is used twice in one move")]
    DuplicateCard { card: Card },

    #[error("{cards} not in the player's hand")]
    NotInHand { cards: CardSet },

    #[error("an opening attack must use a single denomination ({cards})")]
    MixedDenominations { cards: CardSet },

    #[error("{cards} do not match any denomination on the board")]
    DenominationNotOnBoard { cards: CardSet },

    #[error("{pending} undefended cards exceed the defender's {capacity} cards")]
    ExceedsDefenderCapacity { pending: usize, capacity: usize },

    #[error("{card} is not waiting to be beaten")]
    NotPending { card: Card },

    #[error("{card} does not beat {target}")]
    DoesNotBeat { card: Card, target: Card },

    #[error("cannot redirect after a card has been beaten this round")]
    RedirectAfterBeat,

    #[error("this round has already been redirected")]
    RedirectAlreadyUsed,

    #[error("cannot redirect while the board holds more than one denomination")]
    RedirectMixedBoard,

    #[error("redirect cards {cards} do not match the attacking denomination")]
    RedirectDenominationMismatch { cards: CardSet },
}

/// Either tier, as returned by `Engine::try_submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("contract violation: {0}")]
    Contract(#[from] ContractViolation),

    #[error("move rejected: {0}")]
    Rejected(#[from] RejectionReason),
}

impl SubmitError {
    /// The rejection reason, if this is a recoverable rejection.
    #[must_use]
    pub fn rejection(self) -> Option<RejectionReason> {
        match self {
            SubmitError::Rejected(reason) => Some(reason),
            SubmitError::Contract(_) => None,
        }
    }
}

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("first attacker must be seat 0 or 1, got {0}")]
    InvalidFirstAttacker(u8),
}
