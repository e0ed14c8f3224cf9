//! Attack and throw-in validation.
//!
//! Both kinds move cards from the attacker's hand onto the board as
//! pending. An opening attack leads a single denomination; anything played
//! into a running round must match a denomination already on the board.

use crate::cards::CardSet;
use crate::core::moves::{Move, MoveKind};
use crate::core::state::GameState;

use super::error::RejectionReason;
use super::phase::Phase;

/// Validate an attack or throw-in and return the candidate state.
///
/// An empty throw-in is a pass: the turn goes back to the defender with the
/// board untouched.
pub(crate) fn play(state: &GameState, mv: &Move) -> Result<GameState, RejectionReason> {
    let cards = played_from_hand(state, mv)?;
    let opening = state.on_board().is_empty();

    if cards.is_empty() && (opening || mv.kind == MoveKind::Attack) {
        return Err(RejectionReason::EmptyMove { kind: mv.kind });
    }

    if opening {
        if cards.single_rank().is_none() {
            return Err(RejectionReason::MixedDenominations { cards });
        }
    } else {
        let stray = cards - CardSet::of_ranks(state.on_board().ranks());
        if !stray.is_empty() {
            return Err(RejectionReason::DenominationNotOnBoard { cards: stray });
        }
    }

    let defender = state.defender();
    check_capacity(state.pending_defend() | cards, state.hand(defender))?;

    let mut next = state.clone();
    next.apply_delta(&mv.delta);
    if opening {
        next.is_pickup = false;
    }
    next.turn_owner = defender;
    next.phase = Phase::AwaitingDefend(defender);
    Ok(next)
}

/// Check that a card-playing move is internally consistent and drawn from
/// the actor's hand; returns the cards it plays.
///
/// The actor's hand must lose exactly the cards that join the board, and
/// the same cards must become pending.
pub(super) fn played_from_hand(state: &GameState, mv: &Move) -> Result<CardSet, RejectionReason> {
    let cards = mv.played();
    let delta = &mv.delta;

    if delta.hands[mv.player].removed != cards
        || delta.pending_defend.added != cards
        || !delta.pending_defend.removed.is_empty()
    {
        return Err(RejectionReason::UnbalancedDelta);
    }

    let missing = cards - state.hand(mv.player);
    if !missing.is_empty() {
        return Err(RejectionReason::NotInHand { cards: missing });
    }
    Ok(cards)
}

/// Undefended cards may never outnumber the defender's hand.
pub(super) fn check_capacity(pending: CardSet, defender_hand: CardSet) -> Result<(), RejectionReason> {
    if pending.len() > defender_hand.len() {
        return Err(RejectionReason::ExceedsDefenderCapacity {
            pending: pending.len(),
            capacity: defender_hand.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::core::player::PlayerId;
    use crate::core::state::StateBuilder;

    fn c(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn set(list: &str) -> CardSet {
        list.split_whitespace().map(c).collect()
    }

    fn cards(list: &str) -> Vec<Card> {
        list.split_whitespace().map(c).collect()
    }

    fn opening(p0: &str, p1: &str) -> GameState {
        StateBuilder::new(c("7H"))
            .hand(PlayerId::ZERO, set(p0))
            .hand(PlayerId::ONE, set(p1))
            .build()
            .unwrap()
    }

    #[test]
    fn test_opening_attack() {
        let state = opening("9S 9D KH", "AS AC AD");
        let next = play(&state, &Move::attack(PlayerId::ZERO, cards("9S 9D"))).unwrap();

        assert_eq!(next.on_board(), set("9S 9D"));
        assert_eq!(next.pending_defend(), set("9S 9D"));
        assert_eq!(next.hand(PlayerId::ZERO), set("KH"));
        assert_eq!(next.phase(), Phase::AwaitingDefend(PlayerId::ONE));
        assert_eq!(next.turn_owner(), PlayerId::ONE);
        assert!(next.check_invariants().is_ok());
    }

    #[test]
    fn test_opening_mixed_denominations() {
        let state = opening("9S KH", "AS AC AD");
        let result = play(&state, &Move::attack(PlayerId::ZERO, cards("9S KH")));
        assert_eq!(result, Err(RejectionReason::MixedDenominations { cards: set("9S KH") }));
    }

    #[test]
    fn test_empty_attack() {
        let state = opening("9S", "AS");
        let result = play(&state, &Move::attack(PlayerId::ZERO, Vec::<Card>::new()));
        assert_eq!(result, Err(RejectionReason::EmptyMove { kind: MoveKind::Attack }));
    }

    #[test]
    fn test_card_not_in_hand() {
        let state = opening("9S", "AS");
        let result = play(&state, &Move::attack(PlayerId::ZERO, cards("9D")));
        assert_eq!(result, Err(RejectionReason::NotInHand { cards: set("9D") }));
    }

    #[test]
    fn test_capacity_counts_defender_hand() {
        let state = opening("9S 9D 9C", "AS AC");
        let result = play(&state, &Move::attack(PlayerId::ZERO, cards("9S 9D 9C")));
        assert_eq!(
            result,
            Err(RejectionReason::ExceedsDefenderCapacity { pending: 3, capacity: 2 })
        );
    }

    #[test]
    fn test_opening_clears_pickup_flag() {
        let state = StateBuilder::new(c("7H"))
            .hand(PlayerId::ZERO, set("9S"))
            .hand(PlayerId::ONE, set("AS"))
            .pickup(true)
            .build()
            .unwrap();

        let next = play(&state, &Move::attack(PlayerId::ZERO, cards("9S"))).unwrap();
        assert!(!next.is_pickup());
    }

    fn throw_in_position() -> GameState {
        // 9S beaten by KS, 9D still pending; attacker to throw in.
        StateBuilder::new(c("7H"))
            .hand(PlayerId::ZERO, set("9C KD 8S"))
            .hand(PlayerId::ONE, set("AC AD AH"))
            .board(set("9S KS 9D"), set("9D"))
            .turn_owner(PlayerId::ZERO)
            .build()
            .unwrap()
    }

    #[test]
    fn test_throw_in_matching_denominations() {
        let state = throw_in_position();
        assert_eq!(state.phase(), Phase::AwaitingThrowIn);

        let next = play(&state, &Move::throw_in(PlayerId::ZERO, cards("9C KD"))).unwrap();
        assert_eq!(next.pending_defend(), set("9D 9C KD"));
        assert_eq!(next.phase(), Phase::AwaitingDefend(PlayerId::ONE));
    }

    #[test]
    fn test_throw_in_foreign_denomination() {
        let state = throw_in_position();
        let result = play(&state, &Move::throw_in(PlayerId::ZERO, cards("9C 8S")));
        assert_eq!(result, Err(RejectionReason::DenominationNotOnBoard { cards: set("8S") }));
    }

    #[test]
    fn test_pass_returns_turn() {
        let state = throw_in_position();
        let next = play(&state, &Move::pass(PlayerId::ZERO)).unwrap();

        assert_eq!(next.on_board(), state.on_board());
        assert_eq!(next.turn_owner(), PlayerId::ONE);
        assert_eq!(next.phase(), Phase::AwaitingDefend(PlayerId::ONE));
    }

    #[test]
    fn test_unbalanced_delta() {
        let state = opening("9S 9D", "AS AC");
        let mut mv = Move::attack(PlayerId::ZERO, cards("9S"));
        mv.delta.pending_defend.added = set("9S 9D");

        assert_eq!(play(&state, &mv), Err(RejectionReason::UnbalancedDelta));
    }
}
