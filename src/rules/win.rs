//! End-of-game detection, run after every replenishment.
//!
//! Nothing can end while the deck still has cards. Once it is empty:
//! - both hands empty: draw
//! - either hand empty: the round's defender wins
//!
//! Roles are those of the round just resolved, the same ones replenishment
//! drew for, not the roles assigned for the next round.

use crate::core::player::PlayerId;
use crate::core::state::GameState;

use super::phase::GameResult;

/// The game result, if the position is terminal. `attacker` is the
/// attacker of the round that was just resolved.
#[must_use]
pub(crate) fn detect(state: &GameState, attacker: PlayerId) -> Option<GameResult> {
    if !state.deck().is_empty() {
        return None;
    }

    let defender = attacker.opponent();
    let attacker_empty = state.hand(attacker).is_empty();
    let defender_empty = state.hand(defender).is_empty();

    match (attacker_empty, defender_empty) {
        (true, true) => Some(GameResult::Draw),
        (true, false) | (false, true) => Some(GameResult::Winner(defender)),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardSet};
    use crate::core::player::PlayerId;
    use crate::core::state::StateBuilder;

    fn c(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn set(list: &str) -> CardSet {
        list.split_whitespace().map(c).collect()
    }

    fn position(p0: &str, p1: &str, deck: Vec<Card>) -> GameState {
        StateBuilder::new(c("7H"))
            .hand(PlayerId::ZERO, set(p0))
            .hand(PlayerId::ONE, set(p1))
            .deck(deck)
            .build()
            .unwrap()
    }

    #[test]
    fn test_deck_left_means_no_result() {
        let state = position("", "AS", vec![c("KS")]);
        assert_eq!(detect(&state, PlayerId::ZERO), None);
    }

    #[test]
    fn test_empty_attacker_hand() {
        let state = position("", "AS KS", vec![]);
        assert_eq!(detect(&state, PlayerId::ZERO), Some(GameResult::Winner(PlayerId::ONE)));
    }

    #[test]
    fn test_empty_defender_hand() {
        let state = position("AS", "", vec![]);
        assert_eq!(detect(&state, PlayerId::ZERO), Some(GameResult::Winner(PlayerId::ONE)));
    }

    #[test]
    fn test_roles_come_from_the_argument() {
        // Player 1 holds cards; only the round attacker decides who wins.
        let state = position("", "AS", vec![]);
        assert_eq!(detect(&state, PlayerId::ONE), Some(GameResult::Winner(PlayerId::ZERO)));
    }

    #[test]
    fn test_both_empty_is_draw() {
        let state = position("", "", vec![]);
        assert_eq!(detect(&state, PlayerId::ONE), Some(GameResult::Draw));
    }

    #[test]
    fn test_both_holding_cards() {
        let state = position("AS", "KS", vec![]);
        assert_eq!(detect(&state, PlayerId::ONE), None);
    }
}
