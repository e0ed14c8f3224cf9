//! Round resolution: clear the board, replenish, reassign roles, check for
//! the end of the game.

use tracing::{debug, info};

use crate::cards::CardSet;
use crate::core::state::GameState;

use super::deal::replenish;
use super::phase::Phase;
use super::win;

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Every attacking card was beaten.
    Beaten,
    /// The defender took the board.
    PickedUp,
}

/// Resolve the round on a candidate state.
///
/// Leaves the state in `AwaitingAttack` for the next round's attacker, or
/// in `GameOver`. `RoundResolving` is only ever seen in between.
pub(crate) fn resolve(state: &mut GameState, outcome: Outcome) {
    let attacker = state.attacker;
    let defender = state.defender();
    let board = state.on_board;
    state.phase = Phase::RoundResolving;

    match outcome {
        Outcome::Beaten => {
            state.unplayed |= board;
            state.discard |= board;
            state.is_pickup = false;
        }
        Outcome::PickedUp => {
            state.hands[defender] |= board;
            state.is_pickup = true;
        }
    }
    state.on_board = CardSet::EMPTY;
    state.pending_defend = CardSet::EMPTY;
    state.redirected = false;

    replenish(state, attacker);

    if outcome == Outcome::Beaten {
        state.attacker = defender;
    }
    state.turn_owner = state.attacker;

    debug!(
        ?outcome,
        cards = board.len(),
        next_attacker = %state.attacker,
        "round resolved"
    );

    match win::detect(state, attacker) {
        Some(result) => {
            state.finish(result);
            info!(?result, "game over");
        }
        None => state.phase = Phase::AwaitingAttack(state.attacker),
    }
}
