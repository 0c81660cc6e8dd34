//! Error types.
//!
//! Only the request layer, the catalog loader and the replication codec
//! return errors. Resolvers are total: running out of security or deck is
//! a defined match outcome recorded in `MatchState`, not an error.

use crate::cards::{CardId, CardType};
use crate::zones::Zone;

use super::entity::EntityId;
use super::player::PlayerId;

/// Why the host rejected an intent. A rejected intent never mutates state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("the match is over")]
    GameOver,

    #[error("a turn transition is in progress")]
    TransitionInProgress,

    #[error("{sender} is not the active player")]
    NotActivePlayer { sender: PlayerId },

    #[error("{entity} is not a card in play")]
    UnknownCard { entity: EntityId },

    #[error("{entity} is not owned by {sender}")]
    NotOwner { entity: EntityId, sender: PlayerId },

    #[error("{entity} is in {actual:?}, expected {expected:?}")]
    WrongZone {
        entity: EntityId,
        expected: Zone,
        actual: Zone,
    },

    #[error("card template {0} not found in catalog")]
    TemplateNotFound(CardId),

    #[error("{card_type:?} cards cannot be played from hand")]
    Unplayable { card_type: CardType },

    #[error("{candidate} cannot digivolve onto {base}")]
    DigivolveRejected { base: EntityId, candidate: EntityId },

    #[error("{0} cannot attack")]
    CannotAttack(EntityId),

    #[error("{0} already used its main effect this turn")]
    MainEffectUsed(EntityId),

    #[error("{0} is not a blocker")]
    NotABlocker(EntityId),

    #[error("breeding slot of {0} is occupied")]
    HatchingSlotOccupied(PlayerId),

    #[error("egg deck of {0} is empty")]
    EggDeckEmpty(PlayerId),
}

/// A seat index outside `0..PLAYER_COUNT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("seat {0} does not exist")]
pub struct InvalidSeat(pub u8);

/// Failure to build a card catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("card id {0} defined more than once")]
    DuplicateId(CardId),

    #[error("card {id} has unknown card type {card_type:?}")]
    UnknownCardType { id: CardId, card_type: String },
}

/// Failure on the replication boundary.
#[derive(Debug, thiserror::Error)]
pub enum ReplicationError {
    #[error("delta codec failure: {0}")]
    Codec(#[from] bincode::Error),

    #[error("delta out of order: expected seq {expected}, got {got}")]
    OutOfOrder { expected: u64, got: u64 },

    #[error("delta references unknown {0}")]
    UnknownEntity(EntityId),
}
