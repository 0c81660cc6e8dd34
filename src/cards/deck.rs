//! Deck lists.
//!
//! A `DeckList` is the pre-match content of one player's main deck and egg
//! deck, as template ids. The match engine shuffles the main deck and deals
//! from it at start.

use serde::{Deserialize, Serialize};

use super::definition::CardId;
use super::registry::CardCatalog;
use crate::core::rng::GameRng;

/// One player's decks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckList {
    /// Main deck, top first.
    pub main: Vec<CardId>,
    /// Egg deck, top first.
    pub eggs: Vec<CardId>,
}

impl DeckList {
    /// Create a deck list.
    #[must_use]
    pub fn new(main: Vec<CardId>, eggs: Vec<CardId>) -> Self {
        Self { main, eggs }
    }

    /// Build a deck by drawing with repetition from the catalog.
    ///
    /// Each pass over the pool is a fresh shuffle, so every template appears
    /// once before any appears twice. An empty pool yields an empty deck.
    ///
    /// ```
    /// use digi_tcg::cards::{CardCatalog, CardId, CardTemplate, DeckList};
    /// use digi_tcg::core::GameRng;
    ///
    /// let catalog = CardCatalog::from_templates([
    ///     CardTemplate::egg(CardId::new(1), "Koromon", 2, "Red"),
    ///     CardTemplate::digimon(CardId::new(2), "Agumon", 3, "Red", 2000),
    ///     CardTemplate::digimon(CardId::new(3), "Greymon", 4, "Red", 4000),
    /// ]).unwrap();
    ///
    /// let deck = DeckList::random(&catalog, &mut GameRng::new(1), 45, 5);
    /// assert_eq!(deck.main.len(), 45);
    /// assert_eq!(deck.eggs, vec![CardId::new(1); 5]);
    /// ```
    #[must_use]
    pub fn random(catalog: &CardCatalog, rng: &mut GameRng, main: usize, eggs: usize) -> Self {
        Self {
            main: draw_with_repeat(&catalog.main_deck_ids(), main, rng),
            eggs: draw_with_repeat(&catalog.egg_ids(), eggs, rng),
        }
    }
}

fn draw_with_repeat(pool: &[CardId], count: usize, rng: &mut GameRng) -> Vec<CardId> {
    if pool.is_empty() {
        tracing::warn!(count, "deck pool is empty, dealing no cards");
        return Vec::new();
    }

    let mut result = Vec::with_capacity(count);
    while result.len() < count {
        let mut pass = pool.to_vec();
        rng.shuffle(&mut pass);
        let take = (count - result.len()).min(pass.len());
        result.extend_from_slice(&pass[..take]);
    }
    result
}
