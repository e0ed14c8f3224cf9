//! Engine configuration.
//!
//! The rule set itself is fixed; configuration only covers how a table is
//! set up: the dealing seed and who opens the first round.
//!
//! ```
//! use durak_engine::core::{GameConfig, PlayerId};
//!
//! let config = GameConfig::new()
//!     .with_seed(42)
//!     .with_first_attacker(PlayerId::ONE);
//!
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::rules::error::ConfigError;

/// Table setup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Dealing seed. `None` draws one from the operating system.
    pub seed: Option<u64>,

    /// Player opening the first round.
    pub first_attacker: PlayerId,
}

impl GameConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deal deterministically from `seed`.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_first_attacker(mut self, player: PlayerId) -> Self {
        self.first_attacker = player;
        self
    }

    /// Check values that deserialization alone cannot rule out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.first_attacker.is_valid() {
            return Err(ConfigError::InvalidFirstAttacker(self.first_attacker.0));
        }
        Ok(())
    }
}
