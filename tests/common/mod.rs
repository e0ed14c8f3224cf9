//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Once;

use durak_engine::{Card, CardSet, Engine, GameConfig, PlayerId, StateBuilder};
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Install a test log subscriber once per test binary.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, defaulting to `warn`.
pub fn init() {
    INIT.call_once(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub fn card(s: &str) -> Card {
    s.parse().unwrap()
}

pub fn cards(list: &str) -> Vec<Card> {
    list.split_whitespace().map(card).collect()
}

pub fn set(list: &str) -> CardSet {
    list.split_whitespace().map(card).collect()
}

/// Engine at the start of a round, trump hearts, `attacker` to lead.
pub fn position(p0: &str, p1: &str, deck: &str, attacker: PlayerId) -> Engine {
    let state = StateBuilder::new(card("7H"))
        .hand(PlayerId::ZERO, set(p0))
        .hand(PlayerId::ONE, set(p1))
        .deck(cards(deck))
        .attacker(attacker)
        .build()
        .unwrap();
    Engine::from_state(GameConfig::new(), state)
}
