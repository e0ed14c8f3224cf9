//! Card sets over the 32-card universe.
//!
//! `CardSet` is a 32-bit mask (bit `i` = card id `i`). Every location in the
//! game state is one of these, so conservation checks are plain set algebra.
//!
//! `RankSet` is an 8-bit mask of denominations, built by grouping cards by
//! `Card::rank()` rather than by bit strides in the id layout.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use super::card::{Card, Rank, Suit, DECK_SIZE};

/// A set of cards.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardSet(u32);

impl CardSet {
    pub const EMPTY: CardSet = CardSet(0);
    pub const FULL: CardSet = CardSet(u32::MAX);

    /// Set from a raw mask. All 32 bits are meaningful.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Single-card set.
    #[must_use]
    pub const fn single(card: Card) -> Self {
        Self(1 << card.id())
    }

    /// All four suits of `rank`.
    #[must_use]
    pub fn of_rank(rank: Rank) -> Self {
        Suit::ALL.iter().map(|&s| Card::new(rank, s)).collect()
    }

    /// All cards of the ranks in `ranks`.
    #[must_use]
    pub fn of_ranks(ranks: RankSet) -> Self {
        ranks.iter().fold(Self::EMPTY, |acc, r| acc | Self::of_rank(r))
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, card: Card) -> bool {
        self.0 & (1 << card.id()) != 0
    }

    /// Insert a card. Returns true if it was not already present.
    pub fn insert(&mut self, card: Card) -> bool {
        let had = self.contains(card);
        self.0 |= 1 << card.id();
        !had
    }

    /// Remove a card. Returns true if it was present.
    pub fn remove(&mut self, card: Card) -> bool {
        let had = self.contains(card);
        self.0 &= !(1 << card.id());
        had
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    #[must_use]
    pub const fn is_disjoint(self, other: Self) -> bool {
        self.0 & other.0 == 0
    }

    /// Cards in id order.
    pub fn iter(self) -> CardSetIter {
        CardSetIter(self.0)
    }

    /// Denominations present.
    #[must_use]
    pub fn ranks(self) -> RankSet {
        self.iter().map(Card::rank).collect()
    }

    /// The single denomination shared by every card, if there is exactly one.
    #[must_use]
    pub fn single_rank(self) -> Option<Rank> {
        let ranks = self.ranks();
        if ranks.len() == 1 {
            ranks.iter().next()
        } else {
            None
        }
    }

    /// Every non-empty subset, by submask enumeration.
    pub fn subsets(self) -> impl Iterator<Item = CardSet> {
        let mask = self.0;
        let mut next = Some(mask).filter(|&m| m != 0);
        std::iter::from_fn(move || {
            let current = next?;
            let following = current.wrapping_sub(1) & mask;
            next = Some(following).filter(|&m| m != 0);
            Some(CardSet(current))
        })
    }
}

impl BitOr for CardSet {
    type Output = CardSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOrAssign for CardSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CardSet {
    type Output = CardSet;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs)
    }
}

impl Sub for CardSet {
    type Output = CardSet;

    fn sub(self, rhs: Self) -> Self::Output {
        self.difference(rhs)
    }
}

impl SubAssign for CardSet {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 &= !rhs.0;
    }
}

impl Not for CardSet {
    type Output = CardSet;

    fn not(self) -> Self::Output {
        CardSet(!self.0)
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut set = CardSet::EMPTY;
        for card in iter {
            set.insert(card);
        }
        set
    }
}

impl<'a> FromIterator<&'a Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = &'a Card>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

impl IntoIterator for CardSet {
    type Item = Card;
    type IntoIter = CardSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|c| c.to_string())).finish()
    }
}

impl fmt::Display for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for card in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
            first = false;
        }
        Ok(())
    }
}

/// Iterator over a `CardSet`, lowest id first.
#[derive(Clone, Debug)]
pub struct CardSetIter(u32);

impl Iterator for CardSetIter {
    type Item = Card;

    fn next(&mut self) -> Option<Card> {
        if self.0 == 0 {
            return None;
        }
        let id = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Card::from_id(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for CardSetIter {}

/// A set of denominations (bit `i` = rank index `i`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RankSet(u8);

impl RankSet {
    pub const EMPTY: RankSet = RankSet(0);

    #[must_use]
    pub const fn contains(self, rank: Rank) -> bool {
        self.0 & (1 << rank.index()) != 0
    }

    pub fn insert(&mut self, rank: Rank) {
        self.0 |= 1 << rank.index();
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Ranks in index order (Ace first).
    pub fn iter(self) -> impl Iterator<Item = Rank> {
        Rank::ALL.into_iter().filter(move |&r| self.contains(r))
    }
}

impl FromIterator<Rank> for RankSet {
    fn from_iter<I: IntoIterator<Item = Rank>>(iter: I) -> Self {
        let mut set = RankSet::EMPTY;
        for rank in iter {
            set.insert(rank);
        }
        set
    }
}

const _: () = assert!(DECK_SIZE == u32::BITS as usize);
