//! Packed wire record of a game state.
//!
//! Every card location is a 32-bit mask and the turn metadata fits in one
//! `u16`:
//!
//! | bits | field |
//! |------|-------|
//! | 0-1  | trump suit |
//! | 2    | turn owner |
//! | 3    | attacker |
//! | 4    | is_pickup |
//! | 5    | is_over |
//! | 6-7  | result: 0 none, 1 player 0 won, 2 player 1 won, 3 draw |
//! | 8    | redirected |
//!
//! The deck travels as card ids, bottom first. The trump indicator has its
//! own `trump_card` field and is never part of the deck list. Bytes are
//! produced with `bincode`.
//!
//! Decoding trusts nothing: the partition, the unplayed split, the trump
//! suit and the result bits are all checked, and the phase is rebuilt from
//! the board and turn owner.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{Card, CardSet, Suit};
use crate::core::player::{PlayerId, PlayerMap};
use crate::core::state::{GameState, InvariantViolation, StateBuilder};
use crate::rules::phase::GameResult;

const TRUMP_MASK: u16 = 0b11;
const TURN_OWNER_BIT: u16 = 1 << 2;
const ATTACKER_BIT: u16 = 1 << 3;
const PICKUP_BIT: u16 = 1 << 4;
const OVER_BIT: u16 = 1 << 5;
const RESULT_SHIFT: u16 = 6;
const RESULT_MASK: u16 = 0b11 << RESULT_SHIFT;
const REDIRECTED_BIT: u16 = 1 << 8;
const KNOWN_BITS: u16 =
    TRUMP_MASK | TURN_OWNER_BIT | ATTACKER_BIT | PICKUP_BIT | OVER_BIT | RESULT_MASK | REDIRECTED_BIT;

/// Errors decoding a record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("card id {0} is out of range")]
    BadCard(u8),

    #[error("unknown meta bits set: {0:#06x}")]
    UnknownMetaBits(u16),

    #[error("result bits do not agree with the game-over flag")]
    InconsistentResult,

    #[error("trump suit {suit} does not match the trump indicator {card}")]
    TrumpMismatch { suit: Suit, card: Card },

    #[error("invalid state: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Fixed-layout snapshot of a `GameState`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    pub hands: [u32; 2],
    pub unplayed: u32,
    pub on_board: u32,
    pub pending_defend: u32,
    pub meta: u16,
    pub trump_card: u8,
    /// Card ids, bottom first.
    pub deck: Vec<u8>,
}

impl StateRecord {
    /// Pack a state.
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let mut meta = state.trump_suit().index() as u16;
        if state.turn_owner() == PlayerId::ONE {
            meta |= TURN_OWNER_BIT;
        }
        if state.attacker() == PlayerId::ONE {
            meta |= ATTACKER_BIT;
        }
        if state.is_pickup() {
            meta |= PICKUP_BIT;
        }
        if state.is_over() {
            meta |= OVER_BIT;
        }
        let result = match state.outcome() {
            None => 0,
            Some(GameResult::Winner(p)) => p.0 as u16 + 1,
            Some(GameResult::Draw) => 3,
        };
        meta |= result << RESULT_SHIFT;
        if state.redirected() {
            meta |= REDIRECTED_BIT;
        }

        Self {
            hands: [
                state.hand(PlayerId::ZERO).bits(),
                state.hand(PlayerId::ONE).bits(),
            ],
            unplayed: state.unplayed().bits(),
            on_board: state.on_board().bits(),
            pending_defend: state.pending_defend().bits(),
            meta,
            trump_card: state.trump_card().id(),
            deck: state.deck().iter().map(|c| c.id()).collect(),
        }
    }

    /// Unpack and validate.
    pub fn to_state(&self) -> Result<GameState, RecordError> {
        if self.meta & !KNOWN_BITS != 0 {
            return Err(RecordError::UnknownMetaBits(self.meta & !KNOWN_BITS));
        }

        let trump_card = card(self.trump_card)?;
        let deck = self.deck.iter().map(|&id| card(id)).collect::<Result<Vec<_>, _>>()?;

        let suit = Suit::from_index((self.meta & TRUMP_MASK) as u8)
            .ok_or(RecordError::UnknownMetaBits(self.meta & TRUMP_MASK))?;
        if suit != trump_card.suit() {
            return Err(RecordError::TrumpMismatch { suit, card: trump_card });
        }

        let is_over = self.meta & OVER_BIT != 0;
        let result = match (self.meta & RESULT_MASK) >> RESULT_SHIFT {
            0 => None,
            1 => Some(GameResult::Winner(PlayerId::ZERO)),
            2 => Some(GameResult::Winner(PlayerId::ONE)),
            _ => Some(GameResult::Draw),
        };
        if is_over != result.is_some() {
            return Err(RecordError::InconsistentResult);
        }

        let hands = PlayerMap::from_array(self.hands.map(CardSet::from_bits));
        let on_board = CardSet::from_bits(self.on_board);
        let unplayed = CardSet::from_bits(self.unplayed);
        let placed = hands[PlayerId::ZERO] | hands[PlayerId::ONE] | on_board;
        let overlap = (placed & unplayed)
            | (hands[PlayerId::ZERO] & hands[PlayerId::ONE])
            | (hands[PlayerId::ZERO] & on_board)
            | (hands[PlayerId::ONE] & on_board);
        if !overlap.is_empty() {
            return Err(InvariantViolation::Overlap { cards: overlap }.into());
        }
        let missing = CardSet::FULL - (placed | unplayed);
        if !missing.is_empty() {
            return Err(InvariantViolation::Missing { cards: missing }.into());
        }

        let seat = |bit: u16| if self.meta & bit != 0 { PlayerId::ONE } else { PlayerId::ZERO };

        let state = StateBuilder::new(trump_card)
            .hand(PlayerId::ZERO, hands[PlayerId::ZERO])
            .hand(PlayerId::ONE, hands[PlayerId::ONE])
            .board(on_board, CardSet::from_bits(self.pending_defend))
            .deck(deck)
            .attacker(seat(ATTACKER_BIT))
            .turn_owner(seat(TURN_OWNER_BIT))
            .pickup(self.meta & PICKUP_BIT != 0)
            .redirected(self.meta & REDIRECTED_BIT != 0)
            .result(result)
            .build()?;
        Ok(state)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Encode a state to record bytes.
pub fn encode(state: &GameState) -> Result<Vec<u8>, RecordError> {
    StateRecord::from_state(state).to_bytes()
}

/// Decode and validate record bytes.
pub fn decode(bytes: &[u8]) -> Result<GameState, RecordError> {
    StateRecord::from_bytes(bytes)?.to_state()
}

fn card(id: u8) -> Result<Card, RecordError> {
    Card::from_id(id).ok_or(RecordError::BadCard(id))
}
