//! Security attacks.
//!
//! An attack checks up to `attack_count` security cards, one at a time:
//!
//! 1. A removed attacker ends the sequence.
//! 2. A readied opposing blocker intercepts instead. The lower DP side is
//!    destroyed (both on a tie), the blocker is rested, and the sequence
//!    ends whatever the result.
//! 3. Otherwise the top security card is revealed. An empty stack means
//!    the attacker's owner wins.
//! 4. A revealed Option or Tamer resolves its `Security` effects and is
//!    trashed unless an effect placed it. The sequence continues.
//! 5. A revealed Digimon battles. The defender wins ties. A destroyed
//!    attacker ends the sequence; a beaten security card is trashed.

use serde::{Deserialize, Serialize};

use crate::announce::{Announcer, LogCategory};
use crate::cards::CardId;
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::core::state::GameEndReason;
use crate::effects::Trigger;
use crate::replication::StateDelta;
use crate::zones::Zone;

use super::MatchEngine;

/// The outcome of one security check, as shipped to participants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackStepResult {
    pub attacker: EntityId,
    /// The intercepting blocker, if any.
    pub blocker: Option<EntityId>,
    pub attacker_dp: i32,
    /// Blocker or revealed security DP.
    pub defender_dp: i32,
    /// Template flipped from security, if any.
    pub revealed: Option<CardId>,
    pub attacker_destroyed: bool,
    /// The blocker or the revealed security card was destroyed.
    pub defender_destroyed: bool,
    pub was_blocked: bool,
    /// The defender had no security left.
    pub security_exhausted: bool,
    /// The revealed card resolved effects instead of battling.
    pub option_or_tamer: bool,
}

impl AttackStepResult {
    fn new(attacker: EntityId) -> Self {
        Self {
            attacker,
            blocker: None,
            attacker_dp: 0,
            defender_dp: 0,
            revealed: None,
            attacker_destroyed: false,
            defender_destroyed: false,
            was_blocked: false,
            security_exhausted: false,
            option_or_tamer: false,
        }
    }

    /// Does the attack sequence stop after this step?
    #[must_use]
    pub fn ends_sequence(&self) -> bool {
        self.was_blocked || self.attacker_destroyed || self.security_exhausted
    }
}

impl<A: Announcer> MatchEngine<A> {
    /// Resolve an attack on the opponent's security.
    ///
    /// `attack_count` and `dp_buff` are the values captured when the attack
    /// was declared. Every step is recorded in the delta log as it resolves.
    pub fn resolve_security_attack(&mut self, attacker: EntityId, attack_count: i32, dp_buff: i32) -> Vec<AttackStepResult> {
        let mut results = Vec::new();
        let Some(owner) = self.state.board.get(attacker).map(|c| c.owner) else {
            return results;
        };
        let defender = owner.opponent();

        for _ in 0..attack_count.max(0) {
            if self.state.is_game_over() || !self.state.board.contains(attacker) {
                break;
            }

            let step = match self.readied_blocker(defender) {
                Some(blocker) => self.resolve_block(attacker, blocker, dp_buff),
                None => self.resolve_security_check(attacker, owner, defender, dp_buff),
            };

            self.emit(StateDelta::AttackStep(step.clone()));
            let stop = step.ends_sequence();
            results.push(step);
            if stop {
                break;
            }
        }

        results
    }

    /// First blocking card in the defender's battle area.
    fn readied_blocker(&self, defender: PlayerId) -> Option<EntityId> {
        self.state
            .board
            .in_zone(Zone::BattleArea, defender)
            .find(|card| card.flags.is_blocking)
            .map(|card| card.entity_id)
    }

    fn resolve_block(&mut self, attacker: EntityId, blocker: EntityId, dp_buff: i32) -> AttackStepResult {
        let mut step = AttackStepResult::new(attacker);
        step.was_blocked = true;
        step.blocker = Some(blocker);

        self.update_card(blocker, |card| card.flags.is_blocking = false);
        self.trigger_effects(Trigger::WhenBlocked, attacker);

        let (Some(attacking), Some(blocking)) = (self.state.board.get(attacker), self.state.board.get(blocker)) else {
            step.attacker_destroyed = !self.state.board.contains(attacker);
            step.defender_destroyed = !self.state.board.contains(blocker);
            return step;
        };

        step.attacker_dp = attacking.dp.unwrap_or(0).saturating_add(dp_buff).saturating_add(attacking.dp_buff);
        step.defender_dp = blocking.dp.unwrap_or(0);
        let message = format!(
            "{}'s attack [{} DP] is blocked by {} [{} DP]",
            attacking.name, step.attacker_dp, blocking.name, step.defender_dp
        );
        let owner = attacking.owner;

        self.update_card(blocker, |card| {
            card.flags.is_suspended = true;
            card.flags.can_attack = false;
        });
        self.announce(&message, LogCategory::Attack, owner);

        step.attacker_destroyed = step.attacker_dp <= step.defender_dp;
        step.defender_destroyed = step.defender_dp <= step.attacker_dp;
        if step.defender_destroyed {
            self.destroy_stack(blocker);
        }
        if step.attacker_destroyed {
            self.destroy_stack(attacker);
        }
        step
    }

    fn resolve_security_check(&mut self, attacker: EntityId, owner: PlayerId, defender: PlayerId, dp_buff: i32) -> AttackStepResult {
        let mut step = AttackStepResult::new(attacker);

        let Some(revealed) = self.reveal_security(defender) else {
            step.security_exhausted = true;
            self.announce("Security is empty", LogCategory::Attack, owner);
            self.declare_winner(owner, GameEndReason::SecurityBreached);
            return step;
        };
        step.revealed = Some(revealed);

        let Some(template) = self.catalog.get(revealed) else {
            tracing::warn!(card = %revealed, "revealed security card has no template, trashing it");
            self.add_to_trash(defender, revealed);
            step.defender_destroyed = true;
            return step;
        };

        if template.card_type.resolves_on_reveal() {
            step.option_or_tamer = true;
            self.resolve_revealed_effect(revealed, defender);
            return step;
        }

        let security_dp = template.dp.unwrap_or(0);
        let security_name = template.name.clone();
        let Some(attacking) = self.state.board.get(attacker) else {
            return step;
        };
        step.attacker_dp = attacking.dp.unwrap_or(0).saturating_add(dp_buff);
        step.defender_dp = security_dp.saturating_add(self.state.players[defender].security_buff);
        let message = format!(
            "{} [{} DP] attacks security {} [{} DP]",
            attacking.name, step.attacker_dp, security_name, step.defender_dp
        );
        self.announce(&message, LogCategory::Attack, owner);

        if step.defender_dp >= step.attacker_dp {
            step.attacker_destroyed = true;
            self.destroy_stack(attacker);
        } else {
            step.defender_destroyed = true;
            self.add_to_trash(defender, revealed);
            self.announce(&format!("{} is deleted", security_name), LogCategory::Destroy, defender);
        }
        step
    }

    /// Spawn a revealed Option or Tamer, resolve it, and trash it unless it was placed.
    fn resolve_revealed_effect(&mut self, revealed: CardId, defender: PlayerId) {
        let entity = match self.spawn_card(revealed, defender, Zone::None) {
            Ok(entity) => entity,
            Err(err) => {
                tracing::warn!(%err, "could not spawn revealed security card");
                self.add_to_trash(defender, revealed);
                return;
            }
        };

        let name = self.card(entity).map(|c| c.name.clone()).unwrap_or_default();
        self.announce(&format!("Security effect: {}", name), LogCategory::Effect, defender);
        self.trigger_effects(Trigger::Security, entity);

        if self.state.board.zone_of(entity) == Some(Zone::None) {
            self.destroy_stack(entity);
        }
    }
}
