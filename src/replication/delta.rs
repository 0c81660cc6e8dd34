//! State deltas and the host's append-only delta log.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardStats};
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::core::state::{CardView, GameResult};
use crate::rules::AttackStepResult;
use crate::zones::Zone;

/// One authoritative mutation, as seen by participants.
///
/// Deltas carry outcomes, never inputs: a replica folding them never needs
/// the catalog, the RNG, or a resolver to reach the host's view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateDelta {
    /// A card instance entered play (drawn, hatched, revealed).
    CardSpawned(CardView),

    /// A card instance moved zones.
    ZoneChanged { entity: EntityId, zone: Zone },

    /// A card's turn-scoped stats changed.
    StatsChanged { entity: EntityId, stats: CardStats },

    /// `base` (and its stack) is now buried under `top`.
    Digivolved { base: EntityId, top: EntityId },

    /// A card instance (and its stack) left play.
    CardRemoved { entity: EntityId },

    /// A template landed in a player's trash.
    TrashAdded { player: PlayerId, card: CardId },

    DeckCount { player: PlayerId, count: usize },

    EggCount { player: PlayerId, count: usize },

    SecurityCount { player: PlayerId, count: usize },

    /// The top security card of `player` was flipped face up.
    SecurityRevealed { player: PlayerId, card: CardId },

    SecurityBuff { player: PlayerId, value: i32 },

    HatchingSlot { player: PlayerId, occupied: bool },

    MemoryChanged { memory: i32 },

    /// The end-of-turn gate opened or closed.
    TurnTransition { in_progress: bool },

    ActivePlayerChanged { player: PlayerId, turn_number: u32 },

    /// One resolved security-attack step, for presentation.
    AttackStep(AttackStepResult),

    GameOver(GameResult),
}

/// A delta with its position in the host's stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencedDelta {
    pub seq: u64,
    pub delta: StateDelta,
}

/// The host's append-only delta stream.
///
/// ```
/// use digi_tcg::replication::{DeltaLog, StateDelta};
///
/// let mut log = DeltaLog::new();
/// log.push(StateDelta::MemoryChanged { memory: -2 });
/// log.push(StateDelta::TurnTransition { in_progress: true });
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.since(1)[0].seq, 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DeltaLog {
    entries: Vec<SequencedDelta>,
}

impl DeltaLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a delta, returning its sequence number.
    pub fn push(&mut self, delta: StateDelta) -> u64 {
        let seq = self.entries.len() as u64;
        self.entries.push(SequencedDelta { seq, delta });
        seq
    }

    /// Sequence number the next delta will get.
    #[must_use]
    pub fn next_seq(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Deltas with `seq >= from`.
    #[must_use]
    pub fn since(&self, from: u64) -> &[SequencedDelta] {
        let start = usize::try_from(from).unwrap_or(usize::MAX).min(self.entries.len());
        &self.entries[start..]
    }

    /// Every delta so far.
    #[must_use]
    pub fn entries(&self) -> &[SequencedDelta] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
