//! Defender moves: beat pending cards, redirect the attack, or pick up.

use crate::cards::CardSet;
use crate::core::moves::Move;
use crate::core::state::GameState;

use super::attack::{check_capacity, played_from_hand};
use super::error::RejectionReason;
use super::phase::Phase;
use super::round::{self, Outcome};

/// Validate a defend and return the candidate state.
///
/// Beating the last pending card resolves the round. Otherwise the attacker
/// gets the turn to throw in or pass.
pub(crate) fn defend(state: &GameState, mv: &Move) -> Result<GameState, RejectionReason> {
    if mv.beats.is_empty() {
        return Err(RejectionReason::EmptyMove { kind: mv.kind });
    }

    let mut played = CardSet::EMPTY;
    let mut beaten = CardSet::EMPTY;
    for beat in &mv.beats {
        if !played.insert(beat.card) {
            return Err(RejectionReason::DuplicateCard { card: beat.card });
        }
        if !beaten.insert(beat.target) {
            return Err(RejectionReason::DuplicateCard { card: beat.target });
        }
    }

    let delta = &mv.delta;
    if delta.hands[mv.player].removed != played
        || delta.on_board.added != played
        || delta.pending_defend.removed != beaten
        || !delta.pending_defend.added.is_empty()
    {
        return Err(RejectionReason::UnbalancedDelta);
    }

    let missing = played - state.hand(mv.player);
    if !missing.is_empty() {
        return Err(RejectionReason::NotInHand { cards: missing });
    }

    for beat in &mv.beats {
        if !state.pending_defend().contains(beat.target) {
            return Err(RejectionReason::NotPending { card: beat.target });
        }
        if !beat.card.beats(beat.target, state.trump_suit()) {
            return Err(RejectionReason::DoesNotBeat {
                card: beat.card,
                target: beat.target,
            });
        }
    }

    let mut next = state.clone();
    next.apply_delta(delta);
    if next.pending_defend.is_empty() {
        round::resolve(&mut next, Outcome::Beaten);
    } else {
        next.turn_owner = next.attacker;
        next.phase = Phase::AwaitingThrowIn;
    }
    Ok(next)
}

/// Validate a redirect and return the candidate state.
///
/// The defender adds cards of the attacking denomination and the roles
/// swap: the old attacker must now defend the whole pending set.
pub(crate) fn redirect(state: &GameState, mv: &Move) -> Result<GameState, RejectionReason> {
    if state.redirected() {
        return Err(RejectionReason::RedirectAlreadyUsed);
    }
    if !state.defended().is_empty() {
        return Err(RejectionReason::RedirectAfterBeat);
    }
    let Some(rank) = state.on_board().single_rank() else {
        return Err(RejectionReason::RedirectMixedBoard);
    };

    let cards = played_from_hand(state, mv)?;
    if cards.is_empty() {
        return Err(RejectionReason::EmptyMove { kind: mv.kind });
    }
    let off_rank = cards - CardSet::of_rank(rank);
    if !off_rank.is_empty() {
        return Err(RejectionReason::RedirectDenominationMismatch { cards: off_rank });
    }

    let new_attacker = mv.player;
    let new_defender = state.attacker();
    check_capacity(state.pending_defend() | cards, state.hand(new_defender))?;

    let mut next = state.clone();
    next.apply_delta(&mv.delta);
    next.attacker = new_attacker;
    next.turn_owner = new_defender;
    next.phase = Phase::AwaitingDefend(new_defender);
    next.redirected = true;
    Ok(next)
}

/// Take the whole board into the defender's hand and resolve the round.
pub(crate) fn pickup(state: &GameState) -> GameState {
    let mut next = state.clone();
    round::resolve(&mut next, Outcome::PickedUp);
    next
}
