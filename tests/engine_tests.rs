//! Engine integration tests.
//!
//! These drive complete rounds through `Engine::submit` and check the
//! committed state after each step.

mod common;

use common::{card, cards, init, position, set};
use durak_engine::{
    Beat, CardSet, ContractViolation, Engine, GameConfig, GameResult, Move, MoveKind, Phase,
    PlayerId, RejectionReason, StateBuilder, SubmitError, HAND_SIZE,
};

const P0: PlayerId = PlayerId::ZERO;
const P1: PlayerId = PlayerId::ONE;

fn beat(card_text: &str, target: &str) -> Beat {
    Beat::new(card(card_text), card(target))
}

// =============================================================================
// Atomicity
// =============================================================================

/// Rejected moves leave the committed state byte-for-byte unchanged.
#[test]
fn test_rejected_move_is_atomic() {
    init();
    let mut engine = Engine::new(GameConfig::new().with_seed(99)).unwrap();
    let before = engine.state().clone();
    let hand = engine.state().hand(P0);

    // Six cards always span at least two denominations.
    let ranks: Vec<_> = hand.ranks().iter().collect();
    let a = hand.iter().find(|c| c.rank() == ranks[0]).unwrap();
    let b = hand.iter().find(|c| c.rank() == ranks[1]).unwrap();
    let mixed = Move::attack(P0, [a, b]);

    assert!(engine.submit(mixed).is_err());
    assert_eq!(engine.state(), &before);

    assert!(engine.submit(Move::pickup(P0)).is_err());
    assert_eq!(engine.state(), &before);
}

/// A rejected move can be followed by a legal one from the same player.
#[test]
fn test_player_may_retry_after_rejection() {
    init();
    let mut engine = position("9S KH", "AS AC AD", "8S 8C", P0);

    let result = engine.submit(Move::attack(P0, cards("9S KH")));
    assert_eq!(result, Err(RejectionReason::MixedDenominations { cards: set("9S KH") }));

    assert_eq!(engine.submit(Move::attack(P0, cards("9S"))), Ok(Phase::AwaitingDefend(P1)));
}

// =============================================================================
// Attack
// =============================================================================

/// Opening with two denominations is rejected with the same-denomination reason.
#[test]
fn test_opening_attack_single_denomination() {
    init();
    let mut engine = position("9S 9D QC", "AS AC AD", "", P0);

    let result = engine.submit(Move::attack(P0, cards("9S QC")));
    assert!(matches!(result, Err(RejectionReason::MixedDenominations { .. })));

    assert!(engine.submit(Move::attack(P0, cards("9S 9D"))).is_ok());
    assert_eq!(engine.state().on_board(), set("9S 9D"));
}

/// Pending cards may not outnumber the defender's hand.
#[test]
fn test_defender_capacity() {
    init();
    let mut engine = position("9S 9D 9C", "AS AC", "", P0);

    let result = engine.submit(Move::attack(P0, cards("9S 9D 9C")));
    assert_eq!(
        result,
        Err(RejectionReason::ExceedsDefenderCapacity { pending: 3, capacity: 2 })
    );
    assert!(engine.state().on_board().is_empty());
}

// =============================================================================
// Defend
// =============================================================================

/// Beating the only pending card clears the board and refills both hands.
#[test]
fn test_full_defend_clears_board() {
    init();
    let mut engine = position(
        "9S 8D 8C KC KD QD",
        "KS AC AD QH JH TH",
        "7S 7C 7D 8S 8H AH QS",
        P0,
    );

    engine.submit(Move::attack(P0, cards("9S"))).unwrap();
    let phase = engine.submit(Move::defend(P1, [beat("KS", "9S")])).unwrap();

    let state = engine.state();
    assert!(state.on_board().is_empty());
    assert!(state.pending_defend().is_empty());
    assert!(set("9S KS").is_subset(state.discard()));
    assert_eq!(state.hand_size(P0), HAND_SIZE);
    assert_eq!(state.hand_size(P1), HAND_SIZE);
    assert_eq!(state.deck().len(), 5);
    assert_eq!(phase, Phase::AwaitingAttack(P1));
}

/// A trump beats any plain card, whatever the rank.
#[test]
fn test_trump_beats_plain_card() {
    init();
    let mut engine = position("AS 8D", "8H KC", "", P0);

    engine.submit(Move::attack(P0, cards("AS"))).unwrap();
    assert!(engine.submit(Move::defend(P1, [beat("8H", "AS")])).is_ok());
}

/// A lower card of the same suit is refused.
#[test]
fn test_lower_card_does_not_beat() {
    init();
    let mut engine = position("KS 8D", "9S KC", "", P0);

    engine.submit(Move::attack(P0, cards("KS"))).unwrap();
    let result = engine.submit(Move::defend(P1, [beat("9S", "KS")]));
    assert_eq!(
        result,
        Err(RejectionReason::DoesNotBeat {
            card: card("9S"),
            target: card("KS")
        })
    );
}

/// Partial defence gives the attacker a chance to throw in.
#[test]
fn test_throw_in_after_partial_defend() {
    init();
    let mut engine = position("9S 9D KD 8C", "QS AD TC JC", "", P0);

    engine.submit(Move::attack(P0, cards("9S 9D"))).unwrap();
    let phase = engine.submit(Move::defend(P1, [beat("QS", "9S")])).unwrap();
    assert_eq!(phase, Phase::AwaitingThrowIn);
    assert_eq!(engine.state().turn_owner(), P0);

    // 8C matches nothing on the board.
    let result = engine.submit(Move::throw_in(P0, cards("8C")));
    assert_eq!(result, Err(RejectionReason::DenominationNotOnBoard { cards: set("8C") }));

    // Only nines and queens are on the board.
    let result = engine.submit(Move::throw_in(P0, cards("KD")));
    assert!(matches!(result, Err(RejectionReason::DenominationNotOnBoard { .. })));

    let phase = engine.submit(Move::pass(P0)).unwrap();
    assert_eq!(phase, Phase::AwaitingDefend(P1));

    let phase = engine.submit(Move::defend(P1, [beat("AD", "9D")])).unwrap();
    assert_eq!(phase, Phase::AwaitingAttack(P1));
}

/// Throw-ins add to pending and go back to the defender.
#[test]
fn test_throw_in_matching_cards() {
    init();
    let mut engine = position("9S 9D 9C KC", "KS AD TC JC", "", P0);

    engine.submit(Move::attack(P0, cards("9S 9D"))).unwrap();
    engine.submit(Move::defend(P1, [beat("KS", "9S")])).unwrap();

    let phase = engine.submit(Move::throw_in(P0, cards("9C KC"))).unwrap();
    assert_eq!(phase, Phase::AwaitingDefend(P1));
    assert_eq!(engine.state().pending_defend(), set("9D 9C KC"));
    assert_eq!(engine.state().on_board(), set("9S KS 9D 9C KC"));
}

// =============================================================================
// Redirect
// =============================================================================

/// Redirect swaps roles and the old attacker must defend everything.
#[test]
fn test_redirect_rotates_roles() {
    init();
    let mut engine = position("9S KD QD", "9D AC JC", "", P0);

    engine.submit(Move::attack(P0, cards("9S"))).unwrap();
    let phase = engine.submit(Move::redirect(P1, cards("9D"))).unwrap();

    let state = engine.state();
    assert_eq!(phase, Phase::AwaitingDefend(P0));
    assert_eq!(state.attacker(), P1);
    assert_eq!(state.pending_defend(), set("9S 9D"));
    assert!(state.redirected());

    // The new defender cannot redirect back.
    let result = engine.submit(Move::redirect(P0, cards("QD")));
    assert_eq!(result, Err(RejectionReason::RedirectAlreadyUsed));
}

/// Once a card has been beaten the round can no longer be redirected.
#[test]
fn test_no_redirect_after_beat() {
    init();
    let mut engine = position("9S 9C KD", "9D AS QC", "", P0);

    engine.submit(Move::attack(P0, cards("9S 9C"))).unwrap();
    engine.submit(Move::defend(P1, [beat("AS", "9S")])).unwrap();
    engine.submit(Move::pass(P0)).unwrap();

    let result = engine.submit(Move::redirect(P1, cards("9D")));
    assert_eq!(result, Err(RejectionReason::RedirectAfterBeat));
}

/// Redirect fails when the old attacker could not cover the enlarged board.
#[test]
fn test_redirect_capacity_against_new_defender() {
    init();
    let mut engine = position("9S", "9D 9C AC", "", P0);

    engine.submit(Move::attack(P0, cards("9S"))).unwrap();
    let result = engine.submit(Move::redirect(P1, cards("9D")));
    assert_eq!(
        result,
        Err(RejectionReason::ExceedsDefenderCapacity { pending: 2, capacity: 0 })
    );
}

// =============================================================================
// Pickup and round resolution
// =============================================================================

/// Pickup moves every board card into the defender's hand.
#[test]
fn test_pickup_transfers_board() {
    init();
    let mut engine = position("9S 9D 8C", "QS AD TC JC", "7S 7C", P0);

    engine.submit(Move::attack(P0, cards("9S 9D"))).unwrap();
    engine.submit(Move::defend(P1, [beat("QS", "9S")])).unwrap();
    engine.submit(Move::pass(P0)).unwrap();
    let phase = engine.submit(Move::pickup(P1)).unwrap();

    let state = engine.state();
    assert!(state.on_board().is_empty());
    assert!(state.pending_defend().is_empty());
    assert_eq!(state.hand(P1), set("9S 9D QS AD TC JC"));
    assert!(state.is_pickup());
    assert_eq!(state.attacker(), P0);
    assert_eq!(phase, Phase::AwaitingAttack(P0));
    // The attacker drew both remaining cards.
    assert_eq!(state.hand(P0), set("8C 7S 7C"));
}

/// With an empty deck, an attacker out of cards ends the game.
#[test]
fn test_win_on_empty_deck_and_attacker_hand() {
    init();
    let mut engine = position("9S", "KS AC", "", P0);

    engine.submit(Move::attack(P0, cards("9S"))).unwrap();
    let phase = engine.submit(Move::pickup(P1)).unwrap();

    assert_eq!(phase, Phase::GameOver(GameResult::Winner(P1)));
    let state = engine.state();
    assert!(state.is_over());
    assert_eq!(state.winner(), Some(P1));

    assert_eq!(engine.submit(Move::attack(P0, Vec::new())), Err(RejectionReason::GameOver));
}

/// Both hands emptied together is a draw.
#[test]
fn test_both_hands_empty_is_draw() {
    init();
    let mut engine = position("9S", "KS", "", P0);

    engine.submit(Move::attack(P0, cards("9S"))).unwrap();
    let phase = engine.submit(Move::defend(P1, [beat("KS", "9S")])).unwrap();

    assert_eq!(phase, Phase::GameOver(GameResult::Draw));
    assert!(engine.state().is_over());
    assert_eq!(engine.state().winner(), None);
}

/// A defender who beats the last attack with their last card wins; the
/// attacker is left holding cards with nothing to draw.
#[test]
fn test_defender_wins_by_shedding_last_card() {
    init();
    let mut engine = position("9S AS", "KS", "", P0);

    engine.submit(Move::attack(P0, cards("9S"))).unwrap();
    let phase = engine.submit(Move::defend(P1, [beat("KS", "9S")])).unwrap();

    assert_eq!(phase, Phase::GameOver(GameResult::Winner(P1)));
    assert_eq!(engine.state().winner(), Some(P1));
    assert_eq!(engine.state().hand(P0), set("AS"));
    assert!(engine.state().hand(P1).is_empty());
}

// =============================================================================
// Turn order and contract
// =============================================================================

/// Only the turn owner may act.
#[test]
fn test_out_of_turn_rejected() {
    init();
    let mut engine = position("9S", "KS", "", P0);
    engine.submit(Move::attack(P0, cards("9S"))).unwrap();

    let result = engine.submit(Move::attack(P0, cards("9S")));
    assert_eq!(result, Err(RejectionReason::OutOfTurn { expected: P1, actual: P0 }));
}

/// A throw-in while awaiting the opening attack is the wrong phase.
#[test]
fn test_wrong_phase_rejected() {
    init();
    let mut engine = position("9S", "KS", "", P0);

    let result = engine.submit(Move::throw_in(P0, cards("9S")));
    assert_eq!(
        result,
        Err(RejectionReason::WrongPhase {
            kind: MoveKind::ThrowIn,
            phase: Phase::AwaitingAttack(P0)
        })
    );
}

/// `try_submit` reports contract violations as values.
#[test]
fn test_try_submit_reports_contract_violation() {
    init();
    let mut engine = position("9S", "KS", "", P0);
    let before = engine.state().clone();

    let mut mv = Move::attack(P0, cards("9S"));
    mv.delta.hands[P1].removed = set("KS");

    assert_eq!(
        engine.try_submit(&mv),
        Err(SubmitError::Contract(ContractViolation::OpponentHandTouched { cards: set("KS") }))
    );
    assert_eq!(engine.state(), &before);
}

/// `submit` panics on a contract violation.
#[test]
#[should_panic(expected = "contract violation")]
fn test_submit_panics_on_unplayed_touch() {
    init();
    let mut engine = position("9S", "KS", "AC", P0);

    let mut mv = Move::attack(P0, cards("9S"));
    mv.delta.unplayed.removed = set("AC");
    let _ = engine.submit(mv);
}

/// Combined single-card selections behave like one multi-card attack.
#[test]
fn test_combined_moves() {
    init();
    let mut engine = position("9S 9D", "AS AC AD", "", P0);

    let mv = Move::attack(P0, cards("9S"))
        .combine(Move::attack(P0, cards("9D")))
        .unwrap();
    engine.submit(mv).unwrap();
    assert_eq!(engine.state().pending_defend(), set("9S 9D"));

    let err = Move::attack(P0, cards("9S")).combine(Move::pickup(P0)).unwrap_err();
    assert_eq!(
        err,
        ContractViolation::CombineMismatch {
            left: MoveKind::Attack,
            right: MoveKind::Pickup
        }
    );
}

// =============================================================================
// Snapshots
// =============================================================================

/// States export to JSON for inspection.
#[test]
fn test_state_serializes_to_json() {
    init();
    let state = StateBuilder::new(card("7H"))
        .hand(P0, set("9S"))
        .hand(P1, CardSet::EMPTY)
        .build()
        .unwrap();

    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["trump_card"], serde_json::json!(card("7H").id()));
    assert_eq!(json["is_over"], serde_json::json!(false));
}
