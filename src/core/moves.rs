//! Move representation: a kind tag plus per-location card deltas.
//!
//! A move says which cards leave and join each location of the game state
//! (`hand[0]`, `hand[1]`, `unplayed`, `pending_defend`, `on_board`). The
//! engine never trusts the delta blindly: it first checks that the delta
//! only touches locations the acting player has authority over, then checks
//! the rules, and only then applies it.
//!
//! Input adapters normally use the constructors (`Move::attack`,
//! `Move::defend`, ...), which produce well-formed deltas. `Move::from_delta`
//! accepts a hand-built delta.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::{PlayerId, PlayerMap};
use crate::cards::{Card, CardSet};
use crate::rules::error::ContractViolation;

/// The kind of play a move represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Lead or extend a round with cards from the attacker's hand.
    Attack,
    /// Beat pending cards.
    Defend,
    /// Add cards of denominations already on the board (Nachwurf).
    ThrowIn,
    /// Pass the attack on with a same-denomination card.
    Redirect,
    /// Concede the round and take the board.
    Pickup,
}

impl std::fmt::Display for MoveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MoveKind::Attack => "attack",
            MoveKind::Defend => "defend",
            MoveKind::ThrowIn => "throw-in",
            MoveKind::Redirect => "redirect",
            MoveKind::Pickup => "pickup",
        };
        f.write_str(name)
    }
}

/// Cards joining and leaving one location.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardDelta {
    pub added: CardSet,
    pub removed: CardSet,
}

impl CardDelta {
    #[must_use]
    pub const fn new(added: CardSet, removed: CardSet) -> Self {
        Self { added, removed }
    }

    #[must_use]
    pub const fn adding(cards: CardSet) -> Self {
        Self::new(cards, CardSet::EMPTY)
    }

    #[must_use]
    pub const fn removing(cards: CardSet) -> Self {
        Self::new(CardSet::EMPTY, cards)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// A card both added and removed makes the delta meaningless.
    #[must_use]
    pub const fn is_conflicting(&self) -> bool {
        !self.added.is_disjoint(self.removed)
    }

    /// Apply to a location: `(set - removed) | added`.
    #[must_use]
    pub const fn apply(&self, set: CardSet) -> CardSet {
        set.difference(self.removed).union(self.added)
    }

    fn merge(self, other: CardDelta) -> CardDelta {
        CardDelta::new(self.added | other.added, self.removed | other.removed)
    }
}

/// Per-location deltas of a move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveDelta {
    pub hands: PlayerMap<CardDelta>,
    pub unplayed: CardDelta,
    pub pending_defend: CardDelta,
    pub on_board: CardDelta,
}

impl MoveDelta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hands.iter().all(|(_, d)| d.is_empty())
            && self.unplayed.is_empty()
            && self.pending_defend.is_empty()
            && self.on_board.is_empty()
    }

    /// Locations whose delta adds and removes the same card.
    #[must_use]
    pub fn has_conflict(&self) -> bool {
        self.hands.iter().any(|(_, d)| d.is_conflicting())
            || self.unplayed.is_conflicting()
            || self.pending_defend.is_conflicting()
            || self.on_board.is_conflicting()
    }

    fn merge(self, other: MoveDelta) -> MoveDelta {
        MoveDelta {
            hands: PlayerMap::new(|p| self.hands[p].merge(other.hands[p])),
            unplayed: self.unplayed.merge(other.unplayed),
            pending_defend: self.pending_defend.merge(other.pending_defend),
            on_board: self.on_board.merge(other.on_board),
        }
    }
}

/// One defending card paired with the pending card it beats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Beat {
    /// Card from the defender's hand.
    pub card: Card,
    /// Pending card being beaten.
    pub target: Card,
}

impl Beat {
    #[must_use]
    pub const fn new(card: Card, target: Card) -> Self {
        Self { card, target }
    }
}

/// A proposed move.
///
/// ## Example
///
/// ```
/// use durak_engine::core::{Move, MoveKind, PlayerId};
/// use durak_engine::cards::{Card, CardSet};
///
/// let nine: Card = "9S".parse().unwrap();
/// let mv = Move::attack(PlayerId::ZERO, [nine]);
///
/// assert_eq!(mv.kind, MoveKind::Attack);
/// assert_eq!(mv.delta.on_board.added, CardSet::single(nine));
/// assert_eq!(mv.delta.hands[PlayerId::ZERO].removed, CardSet::single(nine));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub kind: MoveKind,

    /// Acting player.
    pub player: PlayerId,

    pub delta: MoveDelta,

    /// Defend pairing. Empty for every other kind.
    /// Six inline slots cover a full round without heap allocation.
    pub beats: SmallVec<[Beat; 6]>,
}

impl Move {
    /// A move from a raw delta.
    #[must_use]
    pub fn from_delta(kind: MoveKind, player: PlayerId, delta: MoveDelta) -> Self {
        Self {
            kind,
            player,
            delta,
            beats: SmallVec::new(),
        }
    }

    /// Cards go from `player`'s hand onto the board as pending.
    fn playing(kind: MoveKind, player: PlayerId, cards: CardSet) -> Self {
        let mut delta = MoveDelta::default();
        delta.hands[player] = CardDelta::removing(cards);
        delta.on_board = CardDelta::adding(cards);
        delta.pending_defend = CardDelta::adding(cards);
        Self::from_delta(kind, player, delta)
    }

    /// Attack with `cards`.
    #[must_use]
    pub fn attack(player: PlayerId, cards: impl IntoIterator<Item = Card>) -> Self {
        Self::playing(MoveKind::Attack, player, cards.into_iter().collect())
    }

    /// Throw `cards` into a running round.
    #[must_use]
    pub fn throw_in(player: PlayerId, cards: impl IntoIterator<Item = Card>) -> Self {
        Self::playing(MoveKind::ThrowIn, player, cards.into_iter().collect())
    }

    /// Decline to throw in: an empty throw-in.
    #[must_use]
    pub fn pass(player: PlayerId) -> Self {
        Self::from_delta(MoveKind::ThrowIn, player, MoveDelta::default())
    }

    /// Redirect the attack with same-denomination `cards`.
    #[must_use]
    pub fn redirect(player: PlayerId, cards: impl IntoIterator<Item = Card>) -> Self {
        Self::playing(MoveKind::Redirect, player, cards.into_iter().collect())
    }

    /// Beat pending cards, one `Beat` per pair.
    #[must_use]
    pub fn defend(player: PlayerId, beats: impl IntoIterator<Item = Beat>) -> Self {
        let beats: SmallVec<[Beat; 6]> = beats.into_iter().collect();
        let played: CardSet = beats.iter().map(|b| b.card).collect();
        let beaten: CardSet = beats.iter().map(|b| b.target).collect();

        let mut delta = MoveDelta::default();
        delta.hands[player] = CardDelta::removing(played);
        delta.on_board = CardDelta::adding(played);
        delta.pending_defend = CardDelta::removing(beaten);

        Self {
            kind: MoveKind::Defend,
            player,
            delta,
            beats,
        }
    }

    /// Concede and take the board. Carries no delta; the engine computes it.
    #[must_use]
    pub fn pickup(player: PlayerId) -> Self {
        Self::from_delta(MoveKind::Pickup, player, MoveDelta::default())
    }

    /// Cards this move puts on the board.
    #[must_use]
    pub fn played(&self) -> CardSet {
        self.delta.on_board.added
    }

    /// Merge two moves of the same kind and player.
    ///
    /// Lets an input layer build a multi-card play one selection at a time.
    pub fn combine(mut self, other: Move) -> Result<Move, ContractViolation> {
        if self.kind != other.kind || self.player != other.player {
            return Err(ContractViolation::CombineMismatch {
                left: self.kind,
                right: other.kind,
            });
        }
        self.delta = self.delta.merge(other.delta);
        self.beats.extend(other.beats);
        Ok(self)
    }
}
