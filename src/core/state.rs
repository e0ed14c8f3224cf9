//! Game state: where every card is, plus turn metadata.
//!
//! ## Card locations
//!
//! The four sets `hand[0]`, `hand[1]`, `unplayed` and `on_board` partition
//! the 32-card universe. Finer views live inside them:
//! - `pending_defend ⊆ on_board`: attacking cards not yet beaten
//! - `deck`, the face-up `trump_card` and `discard` split `unplayed`
//!
//! ## Mutation
//!
//! Fields are crate-private. Outside the rules module a `GameState` is a
//! read-only snapshot; the engine replaces it wholesale on every legal move.
//! Arbitrary positions for tests and wire decoding go through
//! `StateBuilder`, which validates before handing out a state.

use serde::Serialize;
use thiserror::Error;

use super::moves::MoveDelta;
use super::player::{PlayerId, PlayerMap};
use crate::cards::{Card, CardSet, Suit};
use crate::rules::phase::{GameResult, Phase};

/// Hand size restored by replenishment.
pub const HAND_SIZE: usize = 6;

/// The single source of truth for a game in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub(crate) hands: PlayerMap<CardSet>,
    pub(crate) unplayed: CardSet,
    pub(crate) pending_defend: CardSet,
    pub(crate) on_board: CardSet,
    pub(crate) discard: CardSet,

    /// Draw pile, bottom first: the top card is the last element.
    pub(crate) deck: Vec<Card>,

    pub(crate) trump_card: Card,
    pub(crate) trump_suit: Suit,

    pub(crate) turn_owner: PlayerId,
    pub(crate) attacker: PlayerId,
    pub(crate) is_pickup: bool,
    pub(crate) is_over: bool,
    pub(crate) winner: Option<PlayerId>,

    pub(crate) phase: Phase,
    pub(crate) redirected: bool,
}

impl GameState {
    // === Snapshot reads ===

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> CardSet {
        self.hands[player]
    }

    #[must_use]
    pub fn hand_size(&self, player: PlayerId) -> usize {
        self.hands[player].len()
    }

    /// Cards in no hand and not on the board: deck, trump indicator, discard.
    #[must_use]
    pub fn unplayed(&self) -> CardSet {
        self.unplayed
    }

    #[must_use]
    pub fn pending_defend(&self) -> CardSet {
        self.pending_defend
    }

    #[must_use]
    pub fn on_board(&self) -> CardSet {
        self.on_board
    }

    /// Board cards already beaten, plus the cards that beat them.
    #[must_use]
    pub fn defended(&self) -> CardSet {
        self.on_board - self.pending_defend
    }

    /// Cards cleared from the board after successful defences.
    #[must_use]
    pub fn discard(&self) -> CardSet {
        self.discard
    }

    /// Remaining draw pile, bottom first.
    #[must_use]
    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    #[must_use]
    pub fn trump_card(&self) -> Card {
        self.trump_card
    }

    #[must_use]
    pub fn trump_suit(&self) -> Suit {
        self.trump_suit
    }

    #[must_use]
    pub fn turn_owner(&self) -> PlayerId {
        self.turn_owner
    }

    #[must_use]
    pub fn attacker(&self) -> PlayerId {
        self.attacker
    }

    #[must_use]
    pub fn defender(&self) -> PlayerId {
        self.attacker.opponent()
    }

    /// Whether the last resolved round ended with the defender picking up.
    /// Cleared by the next opening attack.
    #[must_use]
    pub fn is_pickup(&self) -> bool {
        self.is_pickup
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// The winner; `None` while playing or after a draw.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameResult> {
        match self.phase {
            Phase::GameOver(result) => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the current round has been redirected.
    #[must_use]
    pub fn redirected(&self) -> bool {
        self.redirected
    }

    // === Transitions used by the rules ===

    /// Apply a move's location deltas.
    pub(crate) fn apply_delta(&mut self, delta: &MoveDelta) {
        for player in PlayerId::all() {
            self.hands[player] = delta.hands[player].apply(self.hands[player]);
        }
        self.unplayed = delta.unplayed.apply(self.unplayed);
        self.pending_defend = delta.pending_defend.apply(self.pending_defend);
        self.on_board = delta.on_board.apply(self.on_board);
    }

    /// Draw the top deck card into `player`'s hand.
    pub(crate) fn draw(&mut self, player: PlayerId) -> Option<Card> {
        let card = self.deck.pop()?;
        self.unplayed.remove(card);
        self.hands[player].insert(card);
        Some(card)
    }

    pub(crate) fn finish(&mut self, result: GameResult) {
        self.is_over = true;
        self.winner = result.winner();
        self.phase = Phase::GameOver(result);
    }

    // === Invariants ===

    /// Verify the card partition and metadata consistency.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let h0 = self.hands[PlayerId::ZERO];
        let h1 = self.hands[PlayerId::ONE];
        let locations = [h0, h1, self.unplayed, self.on_board];

        let mut seen = CardSet::EMPTY;
        for set in locations {
            let overlap = seen & set;
            if !overlap.is_empty() {
                return Err(InvariantViolation::Overlap { cards: overlap });
            }
            seen |= set;
        }
        if seen != CardSet::FULL {
            return Err(InvariantViolation::Missing {
                cards: CardSet::FULL - seen,
            });
        }

        if !self.pending_defend.is_subset(self.on_board) {
            return Err(InvariantViolation::PendingOffBoard {
                cards: self.pending_defend - self.on_board,
            });
        }

        let deck: CardSet = self.deck.iter().collect();
        if deck.len() != self.deck.len() {
            return Err(InvariantViolation::DuplicateInDeck);
        }
        let trump = CardSet::single(self.trump_card);
        let parts = [deck, trump, self.discard];
        let mut unplayed_parts = CardSet::EMPTY;
        for part in parts {
            if !unplayed_parts.is_disjoint(part) {
                return Err(InvariantViolation::UnplayedSplit);
            }
            unplayed_parts |= part;
        }
        if unplayed_parts != self.unplayed {
            return Err(InvariantViolation::UnplayedSplit);
        }

        if self.trump_suit != self.trump_card.suit() {
            return Err(InvariantViolation::TrumpMismatch);
        }

        let phase_ok = match self.phase {
            Phase::AwaitingAttack(p) => {
                p == self.attacker && self.turn_owner == p && self.on_board.is_empty()
            }
            Phase::AwaitingDefend(p) => {
                p == self.defender() && self.turn_owner == p && !self.pending_defend.is_empty()
            }
            Phase::AwaitingThrowIn => {
                self.turn_owner == self.attacker && !self.pending_defend.is_empty()
            }
            Phase::RoundResolving => false,
            Phase::GameOver(result) => self.is_over && self.winner == result.winner(),
        };
        let over_ok = self.is_over == self.phase.is_terminal();
        if !phase_ok || !over_ok {
            return Err(InvariantViolation::PhaseMismatch { phase: self.phase });
        }

        Ok(())
    }
}

/// A broken state invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("cards in two locations at once: {cards}")]
    Overlap { cards: CardSet },

    #[error("cards in no location: {cards}")]
    Missing { cards: CardSet },

    #[error("pending cards not on the board: {cards}")]
    PendingOffBoard { cards: CardSet },

    #[error("the deck lists a card twice")]
    DuplicateInDeck,

    #[error("unplayed is not exactly deck, trump indicator and discard")]
    UnplayedSplit,

    #[error("trump suit does not match the trump indicator")]
    TrumpMismatch,

    #[error("turn metadata does not fit phase '{phase}'")]
    PhaseMismatch { phase: Phase },

    #[error("{player} is not a seat in a two-player game")]
    UnknownPlayer { player: PlayerId },
}

/// Assembles a validated `GameState` for an arbitrary position.
///
/// Unplayed is everything outside hands and board; discard is whatever of
/// unplayed is neither in the deck nor the trump indicator. The phase is
/// derived from the board and turn owner.
///
/// ## Example
///
/// ```
/// use durak_engine::core::{PlayerId, StateBuilder};
/// use durak_engine::cards::{Card, CardSet};
/// use durak_engine::rules::Phase;
///
/// let c = |s: &str| s.parse::<Card>().unwrap();
/// let state = StateBuilder::new(c("7H"))
///     .hand(PlayerId::ZERO, [c("9S")].into_iter().collect())
///     .hand(PlayerId::ONE, [c("KS")].into_iter().collect())
///     .build()
///     .unwrap();
///
/// assert_eq!(state.phase(), Phase::AwaitingAttack(PlayerId::ZERO));
/// assert_eq!(state.unplayed().len(), 30);
/// ```
#[derive(Clone, Debug)]
pub struct StateBuilder {
    hands: PlayerMap<CardSet>,
    on_board: CardSet,
    pending_defend: CardSet,
    deck: Vec<Card>,
    trump_card: Card,
    attacker: PlayerId,
    turn_owner: Option<PlayerId>,
    is_pickup: bool,
    redirected: bool,
    result: Option<GameResult>,
    unknown_seat: Option<PlayerId>,
}

impl StateBuilder {
    #[must_use]
    pub fn new(trump_card: Card) -> Self {
        Self {
            hands: PlayerMap::default(),
            on_board: CardSet::EMPTY,
            pending_defend: CardSet::EMPTY,
            deck: Vec::new(),
            trump_card,
            attacker: PlayerId::ZERO,
            turn_owner: None,
            is_pickup: false,
            redirected: false,
            result: None,
            unknown_seat: None,
        }
    }

    /// An out-of-range seat is reported by `build`.
    #[must_use]
    pub fn hand(mut self, player: PlayerId, cards: CardSet) -> Self {
        if player.is_valid() {
            self.hands[player] = cards;
        } else {
            self.unknown_seat.get_or_insert(player);
        }
        self
    }

    /// Board contents; `pending` must be a subset of `on_board`.
    #[must_use]
    pub fn board(mut self, on_board: CardSet, pending: CardSet) -> Self {
        self.on_board = on_board;
        self.pending_defend = pending;
        self
    }

    /// Draw pile, bottom first.
    #[must_use]
    pub fn deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = deck;
        self
    }

    #[must_use]
    pub fn attacker(mut self, player: PlayerId) -> Self {
        self.attacker = player;
        self
    }

    /// Defaults to the attacker on an empty board, the defender otherwise.
    #[must_use]
    pub fn turn_owner(mut self, player: PlayerId) -> Self {
        self.turn_owner = Some(player);
        self
    }

    #[must_use]
    pub fn pickup(mut self, is_pickup: bool) -> Self {
        self.is_pickup = is_pickup;
        self
    }

    #[must_use]
    pub fn redirected(mut self, redirected: bool) -> Self {
        self.redirected = redirected;
        self
    }

    #[must_use]
    pub fn result(mut self, result: Option<GameResult>) -> Self {
        self.result = result;
        self
    }

    pub fn build(self) -> Result<GameState, InvariantViolation> {
        let seats = [
            self.unknown_seat,
            Some(self.attacker),
            self.turn_owner,
            self.result.and_then(|r| r.winner()),
        ];
        if let Some(player) = seats.into_iter().flatten().find(|p| !p.is_valid()) {
            return Err(InvariantViolation::UnknownPlayer { player });
        }

        let placed = self.hands[PlayerId::ZERO] | self.hands[PlayerId::ONE] | self.on_board;
        let unplayed = CardSet::FULL - placed;
        let deck: CardSet = self.deck.iter().collect();
        let discard = unplayed - deck - CardSet::single(self.trump_card);

        let turn_owner = self.turn_owner.unwrap_or(if self.on_board.is_empty() {
            self.attacker
        } else {
            self.attacker.opponent()
        });

        let phase = match self.result {
            Some(result) => Phase::GameOver(result),
            None if self.on_board.is_empty() => Phase::AwaitingAttack(self.attacker),
            None if turn_owner == self.attacker => Phase::AwaitingThrowIn,
            None => Phase::AwaitingDefend(turn_owner),
        };

        let state = GameState {
            hands: self.hands,
            unplayed,
            pending_defend: self.pending_defend,
            on_board: self.on_board,
            discard,
            deck: self.deck,
            trump_card: self.trump_card,
            trump_suit: self.trump_card.suit(),
            turn_owner,
            attacker: self.attacker,
            is_pickup: self.is_pickup,
            is_over: self.result.is_some(),
            winner: self.result.and_then(|r| r.winner()),
            phase,
            redirected: self.redirected,
        };

        // Sets overlapping each other would be silently absorbed above.
        let h0 = state.hands[PlayerId::ZERO];
        let h1 = state.hands[PlayerId::ONE];
        let overlap = (h0 & h1) | (h0 & state.on_board) | (h1 & state.on_board);
        if !overlap.is_empty() {
            return Err(InvariantViolation::Overlap { cards: overlap });
        }

        state.check_invariants()?;
        Ok(state)
    }
}
