//! # digi-tcg
//!
//! Authoritative rules core for a two-player Digimon-style trading card game.
//!
//! ## Design Principles
//!
//! 1. **Single Writer**: One host (`MatchEngine`) owns the match. Players
//!    submit intents; the host validates them and runs the resolvers.
//!
//! 2. **Outcomes, Not Inputs**: Every mutation is appended to a delta log.
//!    Participants fold the log into a read-only view and never re-run a
//!    resolver or a random pick.
//!
//! 3. **Seeded Randomness**: Shuffles and random targets come from one
//!    seedable host RNG, so a match replays exactly from its seed.
//!
//! ## Architecture
//!
//! - **Shared Memory Gauge**: A single signed counter decides whose turn it
//!   is. Paying past zero hands the turn to the opponent.
//!
//! - **Owned Stacks**: Digivolving buries the base card inside the new top
//!   card's `owned_stack`; the board only holds top cards.
//!
//! - **Scheduled Pacing**: Turn transitions and presentation pauses are
//!   continuations on a timeline the caller advances. Nothing sleeps.
//!
//! ## Modules
//!
//! - `core`: Entity ids, seats, RNG, configuration, intents, state, errors
//! - `cards`: Templates, instances, catalog loading, deck lists
//! - `zones`: Zones and the board
//! - `effects`: Effect definitions, targeting, the effect engine
//! - `rules`: The host engine: digivolution, combat, turns, card play
//! - `schedule`: Timeline of delayed continuations
//! - `announce`: Battle-log announcements
//! - `replication`: Delta stream, codec, transport, host session, replica

pub mod announce;
pub mod cards;
pub mod core;
pub mod effects;
pub mod replication;
pub mod rules;
pub mod schedule;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    EntityId, PlayerId, PlayerMap,
    GameRng, GameRngState,
    MatchConfig, MEMORY_LIMIT,
    Intent, IntentEnvelope,
    MatchState, MatchView, PlayerState, GameEndReason, TurnPhase,
    CatalogError, ReplicationError, RequestError,
};

pub use crate::zones::{Board, Zone};

pub use crate::cards::{
    CardId, CardType, CardTemplate, CardInstance, CardFlags, CardStats,
    CardCatalog, DeckList,
};

pub use crate::rules::{RulesEngine, GameResult, MatchEngine, AttackStepResult, ScriptedPlayer};

pub use crate::effects::{EffectDef, EffectKind, Trigger, TargetSpec, TargetSelector};

pub use crate::announce::{Announcer, BattleLog, LogCategory, TracingAnnouncer};

pub use crate::schedule::Scheduler;

pub use crate::replication::{
    DeltaLog, SequencedDelta, StateDelta,
    Transport, LocalTransport, HostSession, ReplicaView,
};
