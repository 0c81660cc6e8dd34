//! Named card locations.

use serde::{Deserialize, Serialize};

/// Where a card currently is.
///
/// Only `Hand`, `BreedingActiveSlot`, `BattleArea`, `TamerArea`, and the
/// transient `Option`/`None` zones hold card instances. `Deck`,
/// `BreedingEggSlot`, `Security` and `Trash` are sequences of template ids
/// kept in `PlayerState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    /// The face-down egg deck.
    BreedingEggSlot,
    /// The single hatched card being raised.
    BreedingActiveSlot,
    BattleArea,
    TamerArea,
    Trash,
    Security,
    /// An Option card mid-resolution. It is trashed once its effect resolves.
    Option,
    /// A revealed security card that has not been placed anywhere.
    None,
}

impl Zone {
    /// Zones a card can be digivolved from.
    #[must_use]
    pub const fn accepts_digivolution(self) -> bool {
        matches!(self, Zone::BreedingActiveSlot | Zone::BattleArea)
    }

    /// Zones whose top cards fire `YourTurn` at the start of the owner's turn.
    #[must_use]
    pub const fn fires_turn_start(self) -> bool {
        matches!(self, Zone::BattleArea | Zone::TamerArea)
    }
}
