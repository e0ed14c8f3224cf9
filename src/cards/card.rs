//! The 32-card piquet deck: ranks, suits, and the card identity scheme.
//!
//! A card's canonical id is `suit * 8 + rank_index` with rank index 0 for the
//! Ace. Cards sharing a rank index across suits form one *denomination*.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of cards in the deck.
pub const DECK_SIZE: usize = 32;

/// Ranks per suit.
pub const RANK_COUNT: usize = 8;

/// Suits in the deck.
pub const SUIT_COUNT: usize = 4;

const RANK_GLYPHS: [char; RANK_COUNT] = ['A', 'K', 'Q', 'J', 'T', '9', '8', '7'];
const SUIT_GLYPHS: [char; SUIT_COUNT] = ['♠', '♣', '♦', '♥'];
const SUIT_LETTERS: [char; SUIT_COUNT] = ['S', 'C', 'D', 'H'];

/// Card rank, declared in index order (Ace = 0).
///
/// Ordering follows strength: `Rank::Ace > Rank::Seven`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    King,
    Queen,
    Jack,
    Ten,
    Nine,
    Eight,
    Seven,
}

impl Rank {
    pub const ALL: [Rank; RANK_COUNT] = [
        Rank::Ace,
        Rank::King,
        Rank::Queen,
        Rank::Jack,
        Rank::Ten,
        Rank::Nine,
        Rank::Eight,
        Rank::Seven,
    ];

    /// Position in the id scheme (Ace = 0, Seven = 7).
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Rank for an index, if in range.
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Strength used for beating: Seven = 0 up to Ace = 7.
    #[must_use]
    pub const fn strength(self) -> u8 {
        (RANK_COUNT as u8 - 1) - self.index()
    }

    #[must_use]
    pub const fn glyph(self) -> char {
        RANK_GLYPHS[self as usize]
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.strength().cmp(&other.strength())
    }
}

/// Card suit, `0..4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Clubs,
    Diamonds,
    Hearts,
}

impl Suit {
    pub const ALL: [Suit; SUIT_COUNT] = [Suit::Spades, Suit::Clubs, Suit::Diamonds, Suit::Hearts];

    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    #[must_use]
    pub const fn glyph(self) -> char {
        SUIT_GLYPHS[self as usize]
    }
}

/// A single card, stored as its canonical id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Card(u8);

impl Card {
    /// Build a card from rank and suit.
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self(suit.index() * RANK_COUNT as u8 + rank.index())
    }

    /// Card for a canonical id, if `id < 32`.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        if (id as usize) < DECK_SIZE {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Canonical id `0..32`.
    #[must_use]
    pub const fn id(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn rank(self) -> Rank {
        Rank::ALL[(self.0 as usize) % RANK_COUNT]
    }

    #[must_use]
    pub fn suit(self) -> Suit {
        Suit::ALL[(self.0 as usize) / RANK_COUNT]
    }

    #[must_use]
    pub fn is_trump(self, trump: Suit) -> bool {
        self.suit() == trump
    }

    /// Same denomination: equal rank, any suit.
    #[must_use]
    pub fn same_denomination(self, other: Card) -> bool {
        self.rank() == other.rank()
    }

    /// Whether `self`, played by the defender, beats `target`.
    ///
    /// Same suit and strictly stronger rank, or trump over a non-trump.
    #[must_use]
    pub fn beats(self, target: Card, trump: Suit) -> bool {
        if self.suit() == target.suit() {
            self.rank() > target.rank()
        } else {
            self.is_trump(trump)
        }
    }

    /// All 32 cards in id order.
    pub fn all() -> impl Iterator<Item = Card> {
        (0..DECK_SIZE as u8).map(Card)
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> Self {
        card.0
    }
}

impl TryFrom<u8> for Card {
    type Error = CardParseError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Card::from_id(id).ok_or(CardParseError::IdOutOfRange(id))
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank().glyph(), self.suit().glyph())
    }
}

/// Failure to read a card from text or a raw id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("card text must be a rank followed by a suit, got {0:?}")]
    Malformed(String),
    #[error("unknown rank {0:?}")]
    UnknownRank(char),
    #[error("unknown suit {0:?}")]
    UnknownSuit(char),
    #[error("card id {0} is outside 0..32")]
    IdOutOfRange(u8),
}

impl FromStr for Card {
    type Err = CardParseError;

    /// Parses `"A♠"`, `"QH"`, `"7d"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(r), Some(u), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(CardParseError::Malformed(s.to_string()));
        };

        let r = r.to_ascii_uppercase();
        let rank = RANK_GLYPHS
            .iter()
            .position(|&g| g == r)
            .and_then(|i| Rank::from_index(i as u8))
            .ok_or(CardParseError::UnknownRank(r))?;

        let u_upper = u.to_ascii_uppercase();
        let suit = SUIT_GLYPHS
            .iter()
            .position(|&g| g == u)
            .or_else(|| SUIT_LETTERS.iter().position(|&g| g == u_upper))
            .and_then(|i| Suit::from_index(i as u8))
            .ok_or(CardParseError::UnknownSuit(u))?;

        Ok(Card::new(rank, suit))
    }
}
