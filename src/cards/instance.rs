//! Card instances - runtime card state.
//!
//! A `CardInstance` is one physical card: a snapshot of its template stats,
//! its zone and owner, the turn-scoped counters effects modify, and the
//! stack of cards it has digivolved from.
//!
//! ## Stacks
//!
//! `owned_stack` is the bottom-to-top history of evolutions beneath this
//! card. Members are exclusively owned: a buried card lives in exactly one
//! `owned_stack` and nowhere else, so it can never be targeted by a board
//! query. The card holding the stack is the top.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{CardId, CardTemplate, CardType};
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::effects::EffectDef;
use crate::zones::Zone;

/// Security attacks a card makes per attack declaration without buffs.
pub const DEFAULT_SECURITY_ATTACK_COUNT: i32 = 1;

/// Boolean card state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardFlags {
    /// May declare an attack this turn.
    pub can_attack: bool,
    /// Carries the Blocker keyword.
    pub is_blocker: bool,
    /// Readied to intercept the next incoming security attack.
    pub is_blocking: bool,
    /// Rested after attacking or blocking.
    pub is_suspended: bool,
    /// Buried under another card.
    pub is_digivolved: bool,
    /// Tamer main effect already used this turn.
    pub main_effect_used: bool,
}

/// The mutable, turn-scoped part of a card that effects and combat touch.
///
/// Shipped as a unit in stat deltas so a replica can overwrite its copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardStats {
    pub dp_buff: i32,
    pub security_attack_count: i32,
    pub flags: CardFlags,
}

/// A card instance in a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique entity ID for this instance.
    pub entity_id: EntityId,

    /// Template this card was created from.
    pub card_id: CardId,

    /// Owning seat.
    pub owner: PlayerId,

    /// Current zone.
    pub zone: Zone,

    // === Template snapshot ===
    pub name: String,
    pub card_type: CardType,
    pub level: Option<u8>,
    pub color: String,
    pub dp: Option<i32>,
    pub play_cost: i32,
    pub digivolve_cost: FxHashMap<String, i32>,
    pub effects: Vec<EffectDef>,
    pub inherited_effects: Vec<EffectDef>,

    // === Turn-scoped state ===
    /// DP added by effects this turn.
    pub dp_buff: i32,

    /// Security cards checked per attack declaration.
    pub security_attack_count: i32,

    /// Boolean state.
    pub flags: CardFlags,

    /// Cards beneath this one, bottom to top.
    pub owned_stack: Vec<CardInstance>,
}

impl CardInstance {
    /// Create an instance from its template.
    ///
    /// The Blocker keyword is read once here; it never fires through
    /// trigger dispatch.
    #[must_use]
    pub fn from_template(entity_id: EntityId, template: &CardTemplate, owner: PlayerId, zone: Zone) -> Self {
        Self {
            entity_id,
            card_id: template.id,
            owner,
            zone,
            name: template.name.clone(),
            card_type: template.card_type,
            level: template.level,
            color: template.color.clone(),
            dp: template.dp,
            play_cost: template.play_cost,
            digivolve_cost: template.digivolve_cost.clone(),
            effects: template.effects.clone(),
            inherited_effects: template.inherited_effects.clone(),
            dp_buff: 0,
            security_attack_count: DEFAULT_SECURITY_ATTACK_COUNT,
            flags: CardFlags {
                is_blocker: template.has_blocker(),
                ..CardFlags::default()
            },
            owned_stack: Vec::new(),
        }
    }

    /// Printed DP plus this turn's buff. Cards without DP count as 0.
    #[must_use]
    pub fn effective_dp(&self) -> i32 {
        self.dp.unwrap_or(0).saturating_add(self.dp_buff)
    }

    /// Number of cards beneath this one.
    #[must_use]
    pub fn stack_len(&self) -> usize {
        self.owned_stack.len()
    }

    /// Template ids beneath this card, bottom to top.
    #[must_use]
    pub fn stack_card_ids(&self) -> Vec<CardId> {
        self.owned_stack.iter().map(|c| c.card_id).collect()
    }

    /// Cost to digivolve this card onto a card of `color`, if allowed.
    #[must_use]
    pub fn digivolve_cost_from(&self, color: &str) -> Option<i32> {
        self.digivolve_cost.get(color).copied()
    }

    /// Snapshot of the turn-scoped state.
    #[must_use]
    pub fn stats(&self) -> CardStats {
        CardStats {
            dp_buff: self.dp_buff,
            security_attack_count: self.security_attack_count,
            flags: self.flags,
        }
    }

    /// Reset the per-attack counters to their defaults.
    pub fn reset_attack_counters(&mut self) {
        self.dp_buff = 0;
        self.security_attack_count = DEFAULT_SECURITY_ATTACK_COUNT;
    }

    /// Every template id this stack sends to the trash, buried cards first.
    #[must_use]
    pub fn trash_order(&self) -> Vec<(PlayerId, CardId)> {
        self.owned_stack
            .iter()
            .map(|c| (c.owner, c.card_id))
            .chain(std::iter::once((self.owner, self.card_id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectKind, Trigger};

    fn agumon() -> CardTemplate {
        CardTemplate::digimon(CardId::new(1), "Agumon", 3, "Red", 2000).with_play_cost(3)
    }

    #[test]
    fn test_from_template() {
        let card = CardInstance::from_template(EntityId(10), &agumon(), PlayerId::ZERO, Zone::Hand);

        assert_eq!(card.entity_id, EntityId(10));
        assert_eq!(card.card_id, CardId::new(1));
        assert_eq!(card.zone, Zone::Hand);
        assert_eq!(card.security_attack_count, DEFAULT_SECURITY_ATTACK_COUNT);
        assert!(!card.flags.is_blocker);
        assert!(!card.flags.can_attack);
    }

    #[test]
    fn test_blocker_flag_set_at_setup() {
        let template = agumon().with_effect(EffectDef::blocker());
        let card = CardInstance::from_template(EntityId(1), &template, PlayerId::ONE, Zone::BattleArea);

        assert!(card.flags.is_blocker);
        assert!(!card.flags.is_blocking);
    }

    #[test]
    fn test_effective_dp() {
        let mut card = CardInstance::from_template(EntityId(1), &agumon(), PlayerId::ZERO, Zone::BattleArea);
        card.dp_buff = 1000;
        assert_eq!(card.effective_dp(), 3000);

        let tamer = CardTemplate::new(CardId::new(2), "Tai", CardType::Tamer);
        let tamer = CardInstance::from_template(EntityId(2), &tamer, PlayerId::ZERO, Zone::TamerArea);
        assert_eq!(tamer.effective_dp(), 0);
    }

    #[test]
    fn test_reset_attack_counters() {
        let mut card = CardInstance::from_template(EntityId(1), &agumon(), PlayerId::ZERO, Zone::BattleArea);
        card.dp_buff = 2000;
        card.security_attack_count = 3;

        card.reset_attack_counters();
        assert_eq!(card.dp_buff, 0);
        assert_eq!(card.security_attack_count, 1);
    }

    #[test]
    fn test_trash_order_buried_first() {
        let egg = CardTemplate::egg(CardId::new(7), "Koromon", 2, "Red");
        let mut top = CardInstance::from_template(EntityId(2), &agumon(), PlayerId::ZERO, Zone::BattleArea);
        let mut buried = CardInstance::from_template(EntityId(1), &egg, PlayerId::ZERO, Zone::BattleArea);
        buried.flags.is_digivolved = true;
        top.owned_stack.push(buried);

        assert_eq!(top.stack_len(), 1);
        assert_eq!(top.stack_card_ids(), vec![CardId::new(7)]);
        assert_eq!(
            top.trash_order(),
            vec![(PlayerId::ZERO, CardId::new(7)), (PlayerId::ZERO, CardId::new(1))]
        );
    }

    #[test]
    fn test_stats_snapshot() {
        let template = agumon().with_effect(EffectDef::new(Trigger::OnPlay, EffectKind::ModifyDp, 1));
        let mut card = CardInstance::from_template(EntityId(1), &template, PlayerId::ZERO, Zone::BattleArea);
        card.flags.is_suspended = true;

        let stats = card.stats();
        assert!(stats.flags.is_suspended);
        assert_eq!(stats.security_attack_count, 1);
    }
}
