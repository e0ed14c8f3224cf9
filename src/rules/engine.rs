//! The rule engine: owns the committed game state and arbitrates moves.
//!
//! Every submission is evaluated in two passes against the committed state:
//!
//! 1. **Contract**: does the move only touch what the acting player may
//!    touch? A failure here is a caller bug.
//! 2. **Rules**: is it this player's turn, does the phase accept the move,
//!    and is the play itself legal?
//!
//! The move is applied to a clone of the state, and the clone replaces the
//! committed state only when both passes succeed. A rejected move leaves
//! nothing behind.
//!
//! ## Example
//!
//! ```
//! use durak_engine::core::{GameConfig, Move};
//! use durak_engine::rules::{Engine, Phase};
//!
//! let mut engine = Engine::new(GameConfig::new().with_seed(42)).unwrap();
//! let attacker = engine.state().attacker();
//!
//! let opening = engine.legal_moves().into_iter().next().unwrap();
//! let phase = engine.submit(opening).unwrap();
//! assert_eq!(phase, Phase::AwaitingDefend(attacker.opponent()));
//!
//! // The defender can always give up and take the board.
//! let defender = engine.state().turn_owner();
//! engine.submit(Move::pickup(defender)).unwrap();
//! assert_eq!(engine.state().attacker(), attacker);
//! ```

use tracing::{debug, error};

use crate::cards::CardSet;
use crate::core::config::GameConfig;
use crate::core::moves::{Beat, Move, MoveKind};
use crate::core::rng::GameRng;
use crate::core::state::GameState;

use super::attack;
use super::deal::deal;
use super::defend;
use super::error::{ConfigError, ContractViolation, RejectionReason, SubmitError};
use super::phase::Phase;

/// A running two-player game.
#[derive(Clone, Debug)]
pub struct Engine {
    config: GameConfig,
    state: GameState,
}

impl Engine {
    /// Deal a new game.
    ///
    /// Uses the configured seed, or a fresh one from the OS.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        let state = deal(&mut rng, config.first_attacker);
        Ok(Self { config, state })
    }

    /// Resume from an existing state (a decoded record, a test position).
    #[must_use]
    pub fn from_state(config: GameConfig, state: GameState) -> Self {
        Self { config, state }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The committed state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Compute the state a move would lead to, without committing it.
    pub fn evaluate(&self, mv: &Move) -> Result<GameState, SubmitError> {
        check_contract(mv)?;
        Ok(self.check_rules(mv)?)
    }

    /// Submit a move, reporting both contract violations and rejections.
    ///
    /// On success the candidate state is committed and the new phase
    /// returned. On any error the committed state is untouched.
    pub fn try_submit(&mut self, mv: &Move) -> Result<Phase, SubmitError> {
        let next = match self.evaluate(mv) {
            Ok(next) => next,
            Err(err) => {
                if let SubmitError::Rejected(reason) = err {
                    debug!(player = %mv.player, kind = %mv.kind, %reason, "move rejected");
                }
                return Err(err);
            }
        };

        debug_assert_eq!(next.check_invariants(), Ok(()), "{} produced a broken state", mv.kind);

        debug!(
            player = %mv.player,
            kind = %mv.kind,
            cards = %mv.played(),
            phase = %next.phase(),
            "move committed"
        );
        self.state = next;
        Ok(self.state.phase())
    }

    /// Submit a move.
    ///
    /// A rejected move returns the reason and the same player may try
    /// again.
    ///
    /// # Panics
    ///
    /// Panics if the move breaks the move contract: touching the opponent's
    /// hand, pulling cards out of `unplayed`, and so on. Such a move is a
    /// bug in the caller and is never evaluated.
    pub fn submit(&mut self, mv: Move) -> Result<Phase, RejectionReason> {
        match self.try_submit(&mv) {
            Ok(phase) => Ok(phase),
            Err(SubmitError::Rejected(reason)) => Err(reason),
            Err(SubmitError::Contract(violation)) => {
                error!(player = %mv.player, kind = %mv.kind, %violation, "move contract violated");
                panic!("contract violation by {}: {violation}", mv.player);
            }
        }
    }

    /// Every move the turn owner could submit right now.
    ///
    /// Defends are listed one pair at a time; multi-pair defends are legal
    /// too but add nothing a sequence of single pairs cannot reach.
    /// Attacks, throw-ins and redirects are listed as every subset of the
    /// eligible cards within the defender's capacity.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        let state = &self.state;
        let player = state.turn_owner();
        let hand = state.hand(player);
        let mut candidates = Vec::new();

        match state.phase() {
            Phase::AwaitingAttack(_) => {
                for rank in hand.ranks().iter() {
                    let same_rank = hand & CardSet::of_rank(rank);
                    candidates.extend(same_rank.subsets().map(|cards| Move::attack(player, cards)));
                }
            }
            Phase::AwaitingThrowIn => {
                candidates.push(Move::pass(player));
                let eligible = hand & CardSet::of_ranks(state.on_board().ranks());
                let room = state
                    .hand_size(state.defender())
                    .saturating_sub(state.pending_defend().len());
                candidates.extend(
                    eligible
                        .subsets()
                        .filter(|cards| cards.len() <= room)
                        .map(|cards| Move::throw_in(player, cards)),
                );
            }
            Phase::AwaitingDefend(_) => {
                candidates.push(Move::pickup(player));
                for target in state.pending_defend() {
                    for card in hand {
                        if card.beats(target, state.trump_suit()) {
                            candidates.push(Move::defend(player, [Beat::new(card, target)]));
                        }
                    }
                }
                if let Some(rank) = state.on_board().single_rank() {
                    let same_rank = hand & CardSet::of_rank(rank);
                    candidates.extend(same_rank.subsets().map(|cards| Move::redirect(player, cards)));
                }
            }
            Phase::RoundResolving | Phase::GameOver(_) => {}
        }

        candidates.retain(|mv| self.evaluate(mv).is_ok());
        candidates
    }

    fn check_rules(&self, mv: &Move) -> Result<GameState, RejectionReason> {
        let state = &self.state;
        if state.is_over() {
            return Err(RejectionReason::GameOver);
        }
        if mv.player != state.turn_owner() {
            return Err(RejectionReason::OutOfTurn {
                expected: state.turn_owner(),
                actual: mv.player,
            });
        }
        if !state.phase().accepts(mv.kind) {
            return Err(RejectionReason::WrongPhase {
                kind: mv.kind,
                phase: state.phase(),
            });
        }

        match mv.kind {
            MoveKind::Attack | MoveKind::ThrowIn => attack::play(state, mv),
            MoveKind::Defend => defend::defend(state, mv),
            MoveKind::Redirect => defend::redirect(state, mv),
            MoveKind::Pickup => Ok(defend::pickup(state)),
        }
    }
}

/// Check that a move only touches locations its player controls.
fn check_contract(mv: &Move) -> Result<(), ContractViolation> {
    let player = mv.player;
    if !player.is_valid() {
        return Err(ContractViolation::UnknownPlayer { player });
    }

    let delta = &mv.delta;
    let opponent = delta.hands[player.opponent()];
    if !opponent.is_empty() {
        return Err(ContractViolation::OpponentHandTouched {
            cards: opponent.added | opponent.removed,
        });
    }
    if !delta.unplayed.is_empty() {
        return Err(ContractViolation::UnplayedTouched {
            cards: delta.unplayed.added | delta.unplayed.removed,
        });
    }
    if !delta.hands[player].added.is_empty() {
        return Err(ContractViolation::HandGrowth {
            cards: delta.hands[player].added,
        });
    }
    if !delta.on_board.removed.is_empty() {
        return Err(ContractViolation::BoardRemoval {
            cards: delta.on_board.removed,
        });
    }
    if delta.has_conflict() {
        return Err(ContractViolation::ConflictingDelta);
    }
    if mv.kind == MoveKind::Pickup && !delta.is_empty() {
        return Err(ContractViolation::PickupWithCards);
    }
    if mv.kind != MoveKind::Defend && !mv.beats.is_empty() {
        return Err(ContractViolation::PairsOnNonDefend { kind: mv.kind });
    }
    Ok(())
}
