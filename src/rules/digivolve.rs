//! Digivolution: putting a higher-level card on top of an existing one.
//!
//! The new top card takes exclusive ownership of the base card and of
//! everything the base already held. The base is buried, never destroyed,
//! and its inherited effects start applying to the new top.

use crate::announce::{Announcer, LogCategory};
use crate::cards::{CardInstance, CardType};
use crate::core::entity::EntityId;
use crate::effects::Trigger;
use crate::replication::StateDelta;
use crate::zones::Zone;

use super::MatchEngine;

/// Cost to put `candidate` on `base`, or `None` if the rules forbid it.
///
/// - both cards have a level, and the candidate is exactly one level higher
/// - the candidate is a Digimon and the base is not a Tamer or Option
/// - the candidate's cost table has an entry for the base's color
#[must_use]
pub fn digivolve_cost(base: &CardInstance, candidate: &CardInstance) -> Option<i32> {
    let base_level = base.level?;
    let candidate_level = candidate.level?;

    if candidate.card_type != CardType::Digimon {
        return None;
    }
    if matches!(base.card_type, CardType::Tamer | CardType::Option) {
        return None;
    }
    if u16::from(candidate_level) != u16::from(base_level) + 1 {
        return None;
    }

    candidate.digivolve_cost_from(&base.color)
}

impl<A: Announcer> MatchEngine<A> {
    /// Cost of digivolving `candidate` onto `base` if both are in play and allowed.
    #[must_use]
    pub fn can_digivolve(&self, base: EntityId, candidate: EntityId) -> Option<i32> {
        if base == candidate {
            return None;
        }
        let base = self.state.board.get(base)?;
        let candidate = self.state.board.get(candidate)?;
        digivolve_cost(base, candidate)
    }

    /// Digivolve `candidate` onto `base`.
    ///
    /// Returns false, changing nothing, when the rules forbid it. On success
    /// the cost is paid by the base card's owner, `candidate` becomes the
    /// top of the stack in the battle area, and its `WhenDigivolving`
    /// effects fire.
    pub fn try_digivolve(&mut self, base: EntityId, candidate: EntityId) -> bool {
        let Some(cost) = self.can_digivolve(base, candidate) else {
            tracing::debug!(%base, %candidate, "digivolution rejected");
            return false;
        };
        let Some(mut base_card) = self.state.board.remove(base) else {
            return false;
        };

        let payer = base_card.owner;
        let from_breeding = base_card.zone == Zone::BreedingActiveSlot;
        self.pay_memory(payer, cost);

        let mut stack = std::mem::take(&mut base_card.owned_stack);
        base_card.flags.is_digivolved = true;
        base_card.flags.is_blocking = false;
        base_card.reset_attack_counters();
        let base_flags = base_card.flags;
        let base_name = base_card.name.clone();
        stack.push(base_card);
        for buried in &mut stack {
            buried.zone = Zone::BattleArea;
        }

        let mut candidate_name = String::new();
        if let Some(top) = self.state.board.get_mut(candidate) {
            top.owned_stack = stack;
            candidate_name = top.name.clone();
        }
        self.emit(StateDelta::Digivolved { base, top: candidate });
        self.move_card(candidate, Zone::BattleArea);
        self.update_card(candidate, |top| {
            if from_breeding {
                top.flags.can_attack = false;
                top.flags.is_suspended = false;
            } else {
                top.flags.can_attack = base_flags.can_attack;
                top.flags.is_suspended = base_flags.is_suspended;
            }
        });
        if from_breeding {
            self.set_hatching_slot(payer, false);
        }

        let message = format!("{} digivolved {} into {}", payer, base_name, candidate_name);
        self.announce(&message, LogCategory::System, payer);

        self.trigger_effects(Trigger::WhenDigivolving, candidate);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, CardTemplate};
    use crate::core::player::PlayerId;

    fn instance(template: &CardTemplate) -> CardInstance {
        CardInstance::from_template(EntityId(1), template, PlayerId::ZERO, Zone::BattleArea)
    }

    #[test]
    fn test_cost_from_base_color() {
        let base = CardTemplate::digimon(CardId::new(1), "Gabumon", 3, "Blue", 3000);
        let candidate = CardTemplate::digimon(CardId::new(2), "Garurumon", 4, "Blue", 5000)
            .with_digivolve_cost("Blue", 2);

        assert_eq!(digivolve_cost(&instance(&base), &instance(&candidate)), Some(2));
    }

    #[test]
    fn test_same_level_rejected() {
        let base = CardTemplate::digimon(CardId::new(1), "Agumon", 3, "Red", 2000);
        let candidate = CardTemplate::digimon(CardId::new(2), "Gabumon", 3, "Red", 3000)
            .with_digivolve_cost("Red", 0);

        assert_eq!(digivolve_cost(&instance(&base), &instance(&candidate)), None);
    }

    #[test]
    fn test_missing_cost_entry_rejected() {
        let base = CardTemplate::digimon(CardId::new(1), "Agumon", 3, "Red", 2000);
        let candidate = CardTemplate::digimon(CardId::new(2), "Garurumon", 4, "Blue", 5000)
            .with_digivolve_cost("Blue", 2);

        assert_eq!(digivolve_cost(&instance(&base), &instance(&candidate)), None);
    }

    #[test]
    fn test_type_rules() {
        let tamer = CardTemplate::new(CardId::new(1), "Tai", CardType::Tamer).with_level(3).with_color("Red");
        let egg = CardTemplate::egg(CardId::new(2), "Koromon", 2, "Red");
        let digimon = CardTemplate::digimon(CardId::new(3), "Agumon", 3, "Red", 2000)
            .with_digivolve_cost("Red", 0);
        let egg_candidate = CardTemplate::egg(CardId::new(4), "Egg", 3, "Red").with_digivolve_cost("Red", 0);

        assert_eq!(digivolve_cost(&instance(&egg), &instance(&digimon)), Some(0));
        assert_eq!(digivolve_cost(&instance(&egg), &instance(&egg_candidate)), None);

        let champion = CardTemplate::digimon(CardId::new(5), "Greymon", 4, "Red", 4000)
            .with_digivolve_cost("Red", 1);
        assert_eq!(digivolve_cost(&instance(&tamer), &instance(&champion)), None);
    }

    #[test]
    fn test_levelless_rejected() {
        let base = CardTemplate::new(CardId::new(1), "Hammer", CardType::Option).with_color("Red");
        let candidate = CardTemplate::digimon(CardId::new(2), "Agumon", 3, "Red", 2000)
            .with_digivolve_cost("Red", 0);

        assert_eq!(digivolve_cost(&instance(&base), &instance(&candidate)), None);
    }
}
