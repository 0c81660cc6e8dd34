//! Entity identification for card instances.
//!
//! Every physical card that exists as an instance (in a hand, on the board,
//! buried in a digivolution stack, or revealed from security) has a unique
//! `EntityId`. Cards that only exist as template ids in a sequence (deck,
//! egg deck, security stack, trash) do not have one.
//!
//! IDs are allocated by the host in increasing order, so comparing two ids
//! tells which card entered play first. Board queries that speak of
//! "encounter order" iterate in this order.
//!
//! ```
//! use digi_tcg::core::EntityId;
//!
//! let mut alloc = EntityId::FIRST;
//! let a = alloc.take_next();
//! let b = alloc.take_next();
//!
//! assert!(a < b);
//! assert_eq!(format!("{}", a), "Entity(1)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// First id handed out by a fresh match. Zero is never allocated.
    pub const FIRST: EntityId = EntityId(1);

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Return this id and advance the allocator to the next one.
    pub fn take_next(&mut self) -> EntityId {
        let id = *self;
        self.0 += 1;
        id
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
