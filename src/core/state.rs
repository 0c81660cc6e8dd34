//! Match state: the authoritative record and its public projection.
//!
//! ## MatchState
//!
//! Everything the host owns:
//! - Memory gauge, active seat, transition gate, outcome
//! - Per-player decks, security, trash and turn-scoped counters
//! - The board of live card instances
//!
//! ## MatchView
//!
//! The projection both sides can agree on. The host derives it from
//! `MatchState`; a replica builds it by folding deltas. The two must be
//! equal after the replica has applied every delta the host emitted.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::config::MEMORY_LIMIT;
use super::entity::EntityId;
use super::player::{PlayerId, PlayerMap};
use crate::cards::{CardId, CardInstance, CardStats};
use crate::zones::{Board, Zone};

/// Why a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEndReason {
    /// An attack found the defender's security stack empty.
    SecurityBreached,
    /// The loser had to draw from an empty deck.
    DeckOut,
}

/// Result of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: PlayerId,
    pub reason: GameEndReason,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner == player
    }

    /// The losing seat.
    #[must_use]
    pub fn loser(&self) -> PlayerId {
        self.winner.opponent()
    }
}

/// Turn state machine position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    Player0Turn,
    Player1Turn,
    /// End-of-turn processing. No player actions are accepted.
    TransitionInProgress,
}

/// Per-player zones kept as template-id sequences.
///
/// Sequences use `im::Vector` so cloning a state for a view is cheap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Main deck, top = front.
    pub deck: Vector<CardId>,

    /// Egg deck, top = front.
    pub egg_deck: Vector<CardId>,

    /// Face-down security stack, top = front.
    pub security: Vector<CardId>,

    /// Trashed templates in the order they arrived.
    pub trash: Vector<CardId>,

    /// Is the breeding slot holding a hatched card?
    pub hatching_slot_occupied: bool,

    /// DP added to this player's revealed security cards this turn.
    pub security_buff: i32,

    /// Security attacks granted to this player's party at their next turn start.
    pub pending_party_security_attack: i32,
}

/// The authoritative match record.
#[derive(Clone, Debug)]
pub struct MatchState {
    /// Shared gauge in `-MEMORY_LIMIT..=MEMORY_LIMIT`. Positive favors seat 0.
    pub memory: i32,

    /// Seat whose turn it is.
    pub active_player: PlayerId,

    /// End-of-turn processing is pending.
    pub transition_in_progress: bool,

    /// Set once, when the match ends.
    pub outcome: Option<GameResult>,

    /// Turn counter (starts at 1).
    pub turn_number: u32,

    /// Per-player sequences and counters.
    pub players: PlayerMap<PlayerState>,

    /// Live top-of-stack card instances.
    pub board: Board,

    next_entity: EntityId,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    /// Create the initial state: seat 0 active, memory 0, empty zones.
    #[must_use]
    pub fn new() -> Self {
        Self {
            memory: 0,
            active_player: PlayerId::ZERO,
            transition_in_progress: false,
            outcome: None,
            turn_number: 1,
            players: PlayerMap::with_default(),
            board: Board::new(),
            next_entity: EntityId::FIRST,
        }
    }

    /// Allocate a fresh entity id.
    pub fn allocate_entity(&mut self) -> EntityId {
        self.next_entity.take_next()
    }

    /// Has the match ended?
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Current turn state machine position.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        if self.transition_in_progress {
            TurnPhase::TransitionInProgress
        } else if self.active_player == PlayerId::ZERO {
            TurnPhase::Player0Turn
        } else {
            TurnPhase::Player1Turn
        }
    }

    /// Does the gauge favor the seat that is not active?
    #[must_use]
    pub fn memory_favors_opponent(&self) -> bool {
        self.memory * self.active_player.memory_sign() < 0
    }

    /// Get a player's state.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    /// Get a mutable player state.
    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    /// Project the public view.
    #[must_use]
    pub fn view(&self) -> MatchView {
        MatchView {
            memory: self.memory,
            active_player: self.active_player,
            transition_in_progress: self.transition_in_progress,
            outcome: self.outcome,
            turn_number: self.turn_number,
            players: PlayerMap::new(|p| PlayerView::from_state(&self.players[p])),
            cards: self
                .board
                .iter()
                .map(|card| (card.entity_id, CardView::from_instance(card)))
                .collect(),
        }
    }

    /// Check structural invariants. Used by tests and debug assertions.
    ///
    /// - memory is within bounds
    /// - every board card is a top card (not digivolved)
    /// - no entity id appears twice across the board and all stacks
    #[must_use]
    pub fn check_invariants(&self) -> bool {
        if self.memory.abs() > MEMORY_LIMIT {
            return false;
        }

        let mut seen = im::OrdSet::new();
        for card in self.board.iter() {
            if card.flags.is_digivolved {
                return false;
            }
            for entity in std::iter::once(card.entity_id).chain(card.owned_stack.iter().map(|c| c.entity_id)) {
                if seen.insert(entity).is_some() {
                    return false;
                }
            }
        }
        true
    }
}

/// Public per-player projection. Hidden sequences become counts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub deck_count: usize,
    pub egg_count: usize,
    pub security_count: usize,
    pub trash: Vector<CardId>,
    pub hatching_slot_occupied: bool,
    pub security_buff: i32,
}

impl PlayerView {
    fn from_state(state: &PlayerState) -> Self {
        Self {
            deck_count: state.deck.len(),
            egg_count: state.egg_deck.len(),
            security_count: state.security.len(),
            trash: state.trash.clone(),
            hatching_slot_occupied: state.hatching_slot_occupied,
            security_buff: state.security_buff,
        }
    }
}

/// Public projection of one top-of-stack card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub entity_id: EntityId,
    pub card_id: CardId,
    pub owner: PlayerId,
    pub zone: Zone,
    pub dp: Option<i32>,
    pub stats: CardStats,
    /// Buried templates, bottom to top.
    pub stack: Vec<CardId>,
}

impl CardView {
    /// Project an instance.
    #[must_use]
    pub fn from_instance(card: &CardInstance) -> Self {
        Self {
            entity_id: card.entity_id,
            card_id: card.card_id,
            owner: card.owner,
            zone: card.zone,
            dp: card.dp,
            stats: card.stats(),
            stack: card.stack_card_ids(),
        }
    }
}

/// The public match projection shared by host and replicas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub memory: i32,
    pub active_player: PlayerId,
    pub transition_in_progress: bool,
    pub outcome: Option<GameResult>,
    pub turn_number: u32,
    pub players: PlayerMap<PlayerView>,
    pub cards: OrdMap<EntityId, CardView>,
}

impl MatchView {
    /// The view of a state nothing has happened to yet.
    #[must_use]
    pub fn initial() -> Self {
        MatchState::new().view()
    }
}
