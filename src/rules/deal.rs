//! Dealing and post-round replenishment.

use tracing::{debug, info};

use crate::cards::{Card, CardSet};
use crate::core::player::{PlayerId, PlayerMap};
use crate::core::rng::GameRng;
use crate::core::state::{GameState, HAND_SIZE};

use super::phase::Phase;

/// Shuffle the full deck and deal a fresh game.
///
/// One card at a random position of the shuffled deck is set aside face up
/// as the trump indicator and never drawn. Each player then receives
/// `HAND_SIZE` cards from the top, player 0 first; the rest is the deck.
pub fn deal(rng: &mut GameRng, first_attacker: PlayerId) -> GameState {
    let mut cards: Vec<Card> = Card::all().collect();
    rng.shuffle(&mut cards);
    let trump_card = cards.remove(rng.gen_index(cards.len()));
    let state = deal_from(cards, trump_card, first_attacker);

    info!(
        seed = rng.seed(),
        trump = %trump_card,
        first_attacker = %first_attacker,
        "dealt new game"
    );
    state
}

/// Deal hands off the top of an already shuffled `cards` pile.
fn deal_from(mut cards: Vec<Card>, trump_card: Card, first_attacker: PlayerId) -> GameState {
    assert!(
        cards.len() >= 2 * HAND_SIZE,
        "deck of {} cards is too small to deal two hands",
        cards.len() + 1
    );

    let mut hands: PlayerMap<CardSet> = PlayerMap::default();
    for player in PlayerId::all() {
        let top = cards.len() - HAND_SIZE;
        hands[player] = cards.drain(top..).collect();
    }

    let placed = hands[PlayerId::ZERO] | hands[PlayerId::ONE];
    let unplayed = CardSet::FULL - placed;
    let deck_set: CardSet = cards.iter().collect();

    GameState {
        hands,
        unplayed,
        pending_defend: CardSet::EMPTY,
        on_board: CardSet::EMPTY,
        discard: unplayed - deck_set - CardSet::single(trump_card),
        deck: cards,
        trump_card,
        trump_suit: trump_card.suit(),
        turn_owner: first_attacker,
        attacker: first_attacker,
        is_pickup: false,
        is_over: false,
        winner: None,
        phase: Phase::AwaitingAttack(first_attacker),
        redirected: false,
    }
}

/// Draw both hands back up to `HAND_SIZE`, `first` before its opponent.
///
/// Stops quietly when the deck runs out. Returns how many cards each
/// player drew.
pub(crate) fn replenish(state: &mut GameState, first: PlayerId) -> PlayerMap<usize> {
    let mut drawn = PlayerMap::with_value(0);

    for player in [first, first.opponent()] {
        while state.hand_size(player) < HAND_SIZE {
            let Some(_) = state.draw(player) else {
                break;
            };
            drawn[player] += 1;
        }
    }

    debug!(
        first = %first,
        drawn_first = drawn[first],
        drawn_second = drawn[first.opponent()],
        deck_left = state.deck().len(),
        "replenished hands"
    );
    drawn
}
