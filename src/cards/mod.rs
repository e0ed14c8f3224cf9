//! Card space: the fixed 32-card universe and sets over it.
//!
//! ## Key Types
//!
//! - `Card`: canonical id `suit * 8 + rank_index`
//! - `Rank`, `Suit`: the two halves of a card's identity
//! - `CardSet`: 32-bit set used for every card location
//! - `RankSet`: denominations present in a set of cards

pub mod card;
pub mod set;

pub use card::{Card, CardParseError, Rank, Suit, DECK_SIZE, RANK_COUNT, SUIT_COUNT};
pub use set::{CardSet, CardSetIter, RankSet};
