//! Effect targeting.
//!
//! - `TargetSpec`: which board cards an effect may touch
//! - `TargetSelector`: how one target is chosen from the candidates
//!
//! Candidates are always listed in entity order so a seeded host picks the
//! same target on every run. Random picks only ever happen on the host; the
//! outcome is shipped to replicas as deltas.

use serde::{Deserialize, Serialize};

use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;
use crate::zones::{Board, Zone};

/// Whose cards an effect looks at, relative to the source's owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Ally,
    Opponent,
}

/// Specification for effect targeting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Whose cards.
    pub side: Side,
    /// Which zone.
    pub zone: Zone,
    /// May the source itself be a candidate?
    pub include_source: bool,
    /// Only cards whose printed DP is at most this. Cards without DP never match.
    pub max_dp: Option<i32>,
}

impl TargetSpec {
    /// Other battle-area cards of the source's owner.
    #[must_use]
    pub const fn allies() -> Self {
        Self {
            side: Side::Ally,
            zone: Zone::BattleArea,
            include_source: false,
            max_dp: None,
        }
    }

    /// Opposing battle-area cards.
    #[must_use]
    pub const fn opponents() -> Self {
        Self {
            side: Side::Opponent,
            zone: Zone::BattleArea,
            include_source: false,
            max_dp: None,
        }
    }

    /// Restrict to printed DP at most `threshold` (builder pattern).
    #[must_use]
    pub const fn with_max_dp(mut self, threshold: i32) -> Self {
        self.max_dp = Some(threshold);
        self
    }

    /// Candidates on `board`, in entity order.
    ///
    /// The board only holds top-of-stack cards, so buried cards are never
    /// candidates.
    #[must_use]
    pub fn candidates(&self, board: &Board, source: EntityId, source_owner: PlayerId) -> Vec<EntityId> {
        let owner = match self.side {
            Side::Ally => source_owner,
            Side::Opponent => source_owner.opponent(),
        };

        board
            .in_zone(self.zone, owner)
            .filter(|card| self.include_source || card.entity_id != source)
            .filter(|card| match self.max_dp {
                Some(threshold) => card.dp.is_some_and(|dp| dp <= threshold),
                None => true,
            })
            .map(|card| card.entity_id)
            .collect()
    }
}

/// Algorithms for choosing among candidates.
pub struct TargetSelector;

impl TargetSelector {
    /// One uniformly random candidate.
    pub fn pick_random(rng: &mut GameRng, candidates: &[EntityId]) -> Option<EntityId> {
        rng.choose(candidates).copied()
    }

    /// The first `limit` candidates in encounter order.
    #[must_use]
    pub fn first_n(candidates: &[EntityId], limit: usize) -> Vec<EntityId> {
        candidates.iter().take(limit).copied().collect()
    }
}
