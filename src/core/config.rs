//! Match configuration.
//!
//! Everything tunable about a match lives in `MatchConfig`: the host seed,
//! deck and zone sizes used at match start, and the presentation pacing
//! delays. Rules constants that are not tunable (the memory bound) are
//! plain constants.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Memory gauge bound. The gauge always stays in `-MEMORY_LIMIT..=MEMORY_LIMIT`.
pub const MEMORY_LIMIT: i32 = 10;

/// Configuration for one match.
///
/// ## Example
///
/// ```
/// use digi_tcg::core::MatchConfig;
///
/// let config = MatchConfig::new()
///     .with_seed(7)
///     .with_opening_hand_size(4);
///
/// assert_eq!(config.seed, 7);
/// assert_eq!(config.opening_hand_size, 4);
/// assert_eq!(config.security_size, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seed for the host RNG (shuffles and random targets).
    pub seed: u64,

    /// Cards dealt to each player before the first turn.
    pub opening_hand_size: usize,

    /// Cards moved from the deck into each security stack at match start.
    pub security_size: usize,

    /// Main deck size used by `DeckList::random`.
    pub main_deck_size: usize,

    /// Egg deck size used by `DeckList::random`.
    pub egg_deck_size: usize,

    /// Delay between an end-of-turn request and the seat flip.
    pub transition_delay_ms: u64,

    /// Presentation pause a replica holds each attack step on screen.
    pub reveal_pause_ms: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            opening_hand_size: 5,
            security_size: 5,
            main_deck_size: 45,
            egg_deck_size: 5,
            transition_delay_ms: 2_700,
            reveal_pause_ms: 2_000,
        }
    }
}

impl MatchConfig {
    /// Create a configuration with the standard values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Set the host seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the opening hand size.
    #[must_use]
    pub fn with_opening_hand_size(mut self, size: usize) -> Self {
        self.opening_hand_size = size;
        self
    }

    /// Set the security stack size.
    #[must_use]
    pub fn with_security_size(mut self, size: usize) -> Self {
        self.security_size = size;
        self
    }

    /// Set the turn transition delay.
    #[must_use]
    pub fn with_transition_delay(mut self, delay: Duration) -> Self {
        self.transition_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Turn transition delay as a `Duration`.
    #[must_use]
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    /// Attack-step reveal pause as a `Duration`.
    #[must_use]
    pub fn reveal_pause(&self) -> Duration {
        Duration::from_millis(self.reveal_pause_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.opening_hand_size, 5);
        assert_eq!(config.security_size, 5);
        assert_eq!(config.main_deck_size, 45);
        assert_eq!(config.egg_deck_size, 5);
        assert_eq!(config.transition_delay(), Duration::from_millis(2_700));
        assert_eq!(config.reveal_pause(), Duration::from_secs(2));
    }

    #[test]
    fn test_from_json_partial() {
        let config = MatchConfig::from_json(r#"{ "seed": 99, "security_size": 3 }"#).unwrap();

        assert_eq!(config.seed, 99);
        assert_eq!(config.security_size, 3);
        assert_eq!(config.opening_hand_size, 5);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(MatchConfig::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_transition_delay_builder() {
        let config = MatchConfig::new().with_transition_delay(Duration::from_millis(500));
        assert_eq!(config.transition_delay_ms, 500);
    }
}
