//! Core match types: entities, seats, RNG, configuration, intents, state, errors.
//!
//! Everything here is plain data. The rules that mutate it live in `rules`.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Intent, IntentEnvelope};
pub use config::{MatchConfig, MEMORY_LIMIT};
pub use entity::EntityId;
pub use error::{CatalogError, InvalidSeat, ReplicationError, RequestError};
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::{GameRng, GameRngState};
pub use state::{
    CardView, GameEndReason, GameResult, MatchState, MatchView, PlayerState, PlayerView, TurnPhase,
};
