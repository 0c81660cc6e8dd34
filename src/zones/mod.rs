//! Zones and the board of live card instances.
//!
//! ## Key Types
//!
//! - `Zone`: Named card location
//! - `Board`: Every live top-of-stack instance, keyed by `EntityId`
//!
//! Cards buried under a digivolution are not on the board: they are owned
//! by the top card's `owned_stack`.

pub mod board;
pub mod zone;

pub use board::Board;
pub use zone::Zone;
