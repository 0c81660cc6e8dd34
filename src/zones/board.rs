//! The board: every live top-of-stack card instance.
//!
//! The `Board` tracks card instances in hands, the breeding slot, the
//! battle area, the tamer area, and transient resolution zones. It is an
//! `im::OrdMap` keyed by `EntityId`, which gives two properties the rules
//! rely on:
//! - Iteration is in entity order, so "first found" and "encounter order"
//!   are deterministic and equal on every run with the same seed.
//! - Cloning is O(1), so snapshotting the board for a replica view is cheap.

use im::OrdMap;

use crate::cards::CardInstance;
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;

use super::Zone;

/// Card instances by entity id.
///
/// ## Usage
///
/// ```
/// use digi_tcg::cards::{CardId, CardInstance, CardTemplate};
/// use digi_tcg::core::{EntityId, PlayerId};
/// use digi_tcg::zones::{Board, Zone};
///
/// let agumon = CardTemplate::digimon(CardId::new(1), "Agumon", 3, "Red", 2000);
/// let mut board = Board::new();
/// board.insert(CardInstance::from_template(EntityId(1), &agumon, PlayerId::ZERO, Zone::BattleArea));
///
/// assert_eq!(board.ids_in(Zone::BattleArea, PlayerId::ZERO), vec![EntityId(1)]);
/// assert!(board.ids_in(Zone::BattleArea, PlayerId::ONE).is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Board {
    cards: OrdMap<EntityId, CardInstance>,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card, replacing any card with the same id.
    pub fn insert(&mut self, card: CardInstance) {
        self.cards.insert(card.entity_id, card);
    }

    /// Remove a card, returning it.
    pub fn remove(&mut self, entity: EntityId) -> Option<CardInstance> {
        self.cards.remove(&entity)
    }

    /// Get a card.
    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<&CardInstance> {
        self.cards.get(&entity)
    }

    /// Get a mutable card.
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut CardInstance> {
        self.cards.get_mut(&entity)
    }

    /// Is this card on the board?
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.cards.contains_key(&entity)
    }

    /// Zone of a card, if on the board.
    #[must_use]
    pub fn zone_of(&self, entity: EntityId) -> Option<Zone> {
        self.get(entity).map(|c| c.zone)
    }

    /// All cards in entity order.
    pub fn iter(&self) -> impl Iterator<Item = &CardInstance> {
        self.cards.values()
    }

    /// Cards a seat owns in a zone, in entity order.
    pub fn in_zone(&self, zone: Zone, owner: PlayerId) -> impl Iterator<Item = &CardInstance> {
        self.cards
            .values()
            .filter(move |c| c.zone == zone && c.owner == owner)
    }

    /// Ids of the cards a seat owns in a zone, in entity order.
    #[must_use]
    pub fn ids_in(&self, zone: Zone, owner: PlayerId) -> Vec<EntityId> {
        self.in_zone(zone, owner).map(|c| c.entity_id).collect()
    }

    /// Number of cards a seat owns in a zone.
    #[must_use]
    pub fn count_in(&self, zone: Zone, owner: PlayerId) -> usize {
        self.in_zone(zone, owner).count()
    }

    /// Total number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Is the board empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
