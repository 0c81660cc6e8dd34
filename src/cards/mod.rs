//! Card system: templates, instances, catalog, and deck lists.
//!
//! ## Key Types
//!
//! - `CardId`: Catalog id of a template
//! - `CardTemplate`: Static printed card data
//! - `CardInstance`: Runtime card state (zone, owner, buffs, flags, owned stack)
//! - `CardCatalog`: Template lookup, loadable from the master-deck JSON
//! - `DeckList`: Pre-match main and egg decks

pub mod deck;
pub mod definition;
pub mod instance;
pub mod registry;

pub use deck::DeckList;
pub use definition::{CardId, CardTemplate, CardType};
pub use instance::{CardFlags, CardInstance, CardStats, DEFAULT_SECURITY_ATTACK_COUNT};
pub use registry::CardCatalog;
