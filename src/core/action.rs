//! Player intents: requests routed from a participant to the host.
//!
//! An intent is never applied directly. The host validates it against the
//! authoritative state (active seat, ownership, zone, transition gate) and
//! either runs the matching resolver or rejects it with no state change.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::player::PlayerId;

/// A request to change authoritative state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Play a card from hand to its zone (Digimon, Tamer) or resolve it (Option).
    PlayCard { card: EntityId },

    /// Hatch the top card of the egg deck into the breeding slot.
    HatchEgg,

    /// Digivolve a hand card onto a battle-area or breeding-slot card.
    Digivolve { base: EntityId, candidate: EntityId },

    /// Attack the opponent's security with a battle-area card.
    DeclareAttack { attacker: EntityId },

    /// Use a tamer's main effect once this turn.
    ActivateMainEffect { card: EntityId },

    /// Ready a blocker for the opponent's next turn.
    DeclareBlocker { card: EntityId },

    /// End the turn: memory resets to 0 and the seat flips.
    EndTurn,
}

impl Intent {
    /// Card ids referenced by this intent, for ownership validation.
    #[must_use]
    pub fn referenced_cards(&self) -> Vec<EntityId> {
        match *self {
            Intent::PlayCard { card }
            | Intent::ActivateMainEffect { card }
            | Intent::DeclareBlocker { card } => vec![card],
            Intent::Digivolve { base, candidate } => vec![base, candidate],
            Intent::DeclareAttack { attacker } => vec![attacker],
            Intent::HatchEgg | Intent::EndTurn => Vec::new(),
        }
    }
}

/// An intent tagged with the seat that sent it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentEnvelope {
    /// Seat that sent the request.
    pub sender: PlayerId,
    /// The request.
    pub intent: Intent,
}

impl IntentEnvelope {
    /// Tag an intent with its sender.
    #[must_use]
    pub const fn new(sender: PlayerId, intent: Intent) -> Self {
        Self { sender, intent }
    }
}
