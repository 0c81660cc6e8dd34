//! The effect engine: trigger dispatch and effect application.
//!
//! `trigger_effects(trigger, source)` collects every matching effect of the
//! source's own list, then every matching inherited effect of the cards
//! buried under it (bottom to top), and applies them in that order. The
//! queue is built up front but each effect reads the state as it is when it
//! applies, so a DP buff applied first is visible to a later check.

use smallvec::SmallVec;

use super::effect::{EffectDef, EffectKind, Trigger};
use super::targeting::{TargetSelector, TargetSpec};
use crate::announce::{Announcer, LogCategory};
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::rules::MatchEngine;
use crate::zones::Zone;

/// Effects queued for one dispatch. Cards rarely carry more than a few.
type EffectQueue = SmallVec<[EffectDef; 4]>;

impl<A: Announcer> MatchEngine<A> {
    /// Apply every effect on `source` (and its buried stack) that fires on `trigger`.
    ///
    /// A source that is not in play has no effects to fire.
    pub fn trigger_effects(&mut self, trigger: Trigger, source: EntityId) {
        if trigger == Trigger::None {
            return;
        }
        let Some(card) = self.state.board.get(source) else {
            return;
        };

        let owner = card.owner;
        let queue: EffectQueue = card
            .effects
            .iter()
            .chain(card.owned_stack.iter().flat_map(|buried| buried.inherited_effects.iter()))
            .filter(|effect| effect.fires_on(trigger))
            .cloned()
            .collect();

        if !queue.is_empty() {
            tracing::debug!(?trigger, %source, effects = queue.len(), "dispatching effects");
        }

        for effect in &queue {
            if self.state.is_game_over() {
                break;
            }
            self.apply_effect(trigger, effect, source, owner);
        }
    }

    fn apply_effect(&mut self, trigger: Trigger, effect: &EffectDef, source: EntityId, owner: PlayerId) {
        let v = effect.value;
        let c = effect.condition;

        if effect.kind.is_security_only() && trigger != Trigger::Security {
            tracing::warn!(kind = ?effect.kind, ?trigger, "security-only effect outside a security check, ignored");
            return;
        }

        match &effect.kind {
            EffectKind::ModifyDp => self.buff_dp(source, v, owner),

            EffectKind::ModifyAllyDp => {
                let allies = TargetSpec::allies().candidates(&self.state.board, source, owner);
                let target = TargetSelector::pick_random(&mut self.rng, &allies).unwrap_or(source);
                self.buff_dp(target, v, owner);
            }

            EffectKind::ModifyPartyDp => {
                let mut party = TargetSpec::allies().candidates(&self.state.board, source, owner);
                party.push(source);
                for target in party {
                    self.buff_dp(target, v, owner);
                }
            }

            EffectKind::ModifyDpChildCount => {
                let children = self.state.board.get(source).map_or(0, |card| card.stack_len());
                if children as i64 > i64::from(c) {
                    self.buff_dp(source, v, owner);
                }
            }

            EffectKind::GainMemory => {
                self.gain_memory(owner, v);
                self.announce(&format!("{} gains {} memory", owner, v), LogCategory::Effect, owner);
            }

            EffectKind::LoseMemory => {
                self.pay_memory(owner, v);
                self.announce(&format!("{} loses {} memory", owner, v), LogCategory::Effect, owner);
            }

            EffectKind::ExtraSecurityAttack => self.add_security_attacks(source, v, owner),

            EffectKind::IncrementSecurityBasedOnChildren => {
                if c <= 0 {
                    tracing::warn!(%source, condition = c, "child-count divisor must be positive, ignored");
                    return;
                }
                let children = self.state.board.get(source).map_or(0, |card| card.stack_len());
                let bonus = (i32::try_from(children).unwrap_or(i32::MAX) / c).saturating_mul(v);
                self.add_security_attacks(source, bonus, owner);
            }

            EffectKind::DeleteTargetOpponent => {
                let targets = TargetSpec::opponents().candidates(&self.state.board, source, owner);
                if let Some(target) = TargetSelector::pick_random(&mut self.rng, &targets) {
                    self.destroy_stack(target);
                } else {
                    tracing::debug!(%source, "no opposing target to delete");
                }
            }

            EffectKind::DeleteOpponentDpBelowThreshold => {
                let candidates = TargetSpec::opponents()
                    .with_max_dp(v)
                    .candidates(&self.state.board, source, owner);
                let limit = usize::try_from(c).unwrap_or(0);
                for target in TargetSelector::first_n(&candidates, limit) {
                    self.destroy_stack(target);
                }
            }

            EffectKind::BuffSecurityDp | EffectKind::BuffSecurityNextTurn => {
                let value = self.state.players[owner].security_buff.saturating_add(v);
                self.set_security_buff(owner, value);
                self.announce(
                    &format!("{}'s security gains {} DP", owner, v),
                    LogCategory::Buff,
                    owner,
                );
            }

            EffectKind::Blocker => {}

            EffectKind::PlayCardWithoutMemory => {
                self.move_card(source, Zone::TamerArea);
                self.announce("Security card played without memory", LogCategory::Effect, owner);
            }

            EffectKind::ExtraSecurityAttackPartyNextTurn => {
                let pending = &mut self.state.players[owner].pending_party_security_attack;
                *pending = pending.saturating_add(v);
                self.announce(
                    &format!("{}'s party gains Security Attack +{} next turn", owner, v),
                    LogCategory::Effect,
                    owner,
                );
            }

            EffectKind::ActivateMainEffect => self.trigger_effects(Trigger::MainPhase, source),

            EffectKind::Unknown(name) => {
                tracing::warn!(kind = %name, %source, "unknown effect kind, ignored");
            }
        }
    }

    fn buff_dp(&mut self, target: EntityId, amount: i32, owner: PlayerId) {
        let mut name = String::new();
        let found = self.update_card(target, |card| {
            card.dp_buff = card.dp_buff.saturating_add(amount);
            name = card.name.clone();
        });
        if found {
            self.announce(&format!("{} gains {} DP", name, amount), LogCategory::Buff, owner);
        }
    }

    fn add_security_attacks(&mut self, target: EntityId, amount: i32, owner: PlayerId) {
        let mut name = String::new();
        let found = self.update_card(target, |card| {
            card.security_attack_count = card.security_attack_count.saturating_add(amount);
            name = card.name.clone();
        });
        if found && amount != 0 {
            self.announce(
                &format!("{} gains Security Attack +{}", name, amount),
                LogCategory::Buff,
                owner,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announce::BattleLog;
    use crate::cards::{CardCatalog, CardId, CardTemplate, CardType};
    use crate::core::config::MatchConfig;

    const AGUMON: CardId = CardId::new(1);
    const GREYMON: CardId = CardId::new(2);
    const OPTION: CardId = CardId::new(3);

    fn engine_with(source: CardTemplate) -> (MatchEngine<BattleLog>, EntityId) {
        let catalog = CardCatalog::from_templates([
            CardTemplate::digimon(AGUMON, "Agumon", 3, "Red", 2000),
            CardTemplate::digimon(GREYMON, "Greymon", 4, "Red", 4000),
            CardTemplate::new(OPTION, "Shield", CardType::Option),
            source,
        ])
        .unwrap();
        let mut engine = MatchEngine::with_announcer(catalog, MatchConfig::new(), BattleLog::new());
        let entity = engine.spawn_card(CardId::new(100), PlayerId::ZERO, Zone::BattleArea).unwrap();
        (engine, entity)
    }

    fn source(effect: EffectDef) -> CardTemplate {
        CardTemplate::digimon(CardId::new(100), "Source", 3, "Red", 3000).with_effect(effect)
    }

    fn bury(engine: &mut MatchEngine<BattleLog>, top: EntityId, card_id: CardId) {
        let buried = engine.spawn_card(card_id, PlayerId::ZERO, Zone::BattleArea).unwrap();
        let mut card = engine.state.board.remove(buried).unwrap();
        card.flags.is_digivolved = true;
        engine.state.board.get_mut(top).unwrap().owned_stack.push(card);
    }

    #[test]
    fn test_modify_dp_only_on_matching_trigger() {
        let (mut engine, src) = engine_with(source(EffectDef::new(Trigger::OnPlay, EffectKind::ModifyDp, 1000)));

        engine.trigger_effects(Trigger::WhenAttacking, src);
        assert_eq!(engine.card(src).unwrap().dp_buff, 0);

        engine.trigger_effects(Trigger::OnPlay, src);
        assert_eq!(engine.card(src).unwrap().dp_buff, 1000);
    }

    #[test]
    fn test_huge_values_saturate() {
        let (mut engine, src) = engine_with(
            source(EffectDef::new(Trigger::OnPlay, EffectKind::ModifyDp, i32::MAX))
                .with_effect(EffectDef::new(Trigger::OnPlay, EffectKind::ExtraSecurityAttack, i32::MAX)),
        );

        engine.trigger_effects(Trigger::OnPlay, src);
        engine.trigger_effects(Trigger::OnPlay, src);

        let card = engine.card(src).unwrap();
        assert_eq!(card.dp_buff, i32::MAX);
        assert_eq!(card.effective_dp(), i32::MAX);
        assert_eq!(card.security_attack_count, i32::MAX);
    }

    #[test]
    fn test_inherited_effects_fire_after_main() {
        let inherited = CardTemplate::digimon(CardId::new(7), "Koromon", 2, "Red", 0)
            .with_inherited(EffectDef::new(Trigger::YourTurn, EffectKind::ModifyDp, 500));
        let src_template = source(EffectDef::new(Trigger::YourTurn, EffectKind::ModifyDp, 1000));
        let catalog = CardCatalog::from_templates([inherited, src_template]).unwrap();
        let mut engine = MatchEngine::with_announcer(catalog, MatchConfig::new(), BattleLog::new());
        let src = engine.spawn_card(CardId::new(100), PlayerId::ZERO, Zone::BattleArea).unwrap();
        bury(&mut engine, src, CardId::new(7));

        engine.trigger_effects(Trigger::YourTurn, src);

        assert_eq!(engine.card(src).unwrap().dp_buff, 1500);
        let buffs: Vec<_> = engine
            .announcer()
            .entries()
            .iter()
            .filter(|e| e.category == LogCategory::Buff)
            .map(|e| e.message.clone())
            .collect();
        assert_eq!(buffs, vec!["Source gains 1000 DP", "Source gains 500 DP"]);
    }

    #[test]
    fn test_ally_dp_falls_back_to_self() {
        let (mut engine, src) = engine_with(source(EffectDef::new(Trigger::OnPlay, EffectKind::ModifyAllyDp, 2000)));
        engine.spawn_card(AGUMON, PlayerId::ONE, Zone::BattleArea).unwrap();

        engine.trigger_effects(Trigger::OnPlay, src);
        assert_eq!(engine.card(src).unwrap().dp_buff, 2000);
    }

    #[test]
    fn test_ally_dp_picks_another_ally() {
        let (mut engine, src) = engine_with(source(EffectDef::new(Trigger::OnPlay, EffectKind::ModifyAllyDp, 2000)));
        let ally = engine.spawn_card(AGUMON, PlayerId::ZERO, Zone::BattleArea).unwrap();

        engine.trigger_effects(Trigger::OnPlay, src);
        assert_eq!(engine.card(src).unwrap().dp_buff, 0);
        assert_eq!(engine.card(ally).unwrap().dp_buff, 2000);
    }

    #[test]
    fn test_party_dp_includes_self() {
        let (mut engine, src) = engine_with(source(EffectDef::new(Trigger::OnPlay, EffectKind::ModifyPartyDp, 1000)));
        let ally = engine.spawn_card(AGUMON, PlayerId::ZERO, Zone::BattleArea).unwrap();
        let in_hand = engine.spawn_card(AGUMON, PlayerId::ZERO, Zone::Hand).unwrap();

        engine.trigger_effects(Trigger::OnPlay, src);
        assert_eq!(engine.card(src).unwrap().dp_buff, 1000);
        assert_eq!(engine.card(ally).unwrap().dp_buff, 1000);
        assert_eq!(engine.card(in_hand).unwrap().dp_buff, 0);
    }

    #[test]
    fn test_child_count_is_strictly_greater() {
        let effect = EffectDef::new(Trigger::YourTurn, EffectKind::ModifyDpChildCount, 1000).with_condition(1);
        let (mut engine, src) = engine_with(source(effect));
        bury(&mut engine, src, AGUMON);

        engine.trigger_effects(Trigger::YourTurn, src);
        assert_eq!(engine.card(src).unwrap().dp_buff, 0);

        bury(&mut engine, src, AGUMON);
        engine.trigger_effects(Trigger::YourTurn, src);
        assert_eq!(engine.card(src).unwrap().dp_buff, 1000);
    }

    #[test]
    fn test_memory_effects_move_toward_owner() {
        let (mut engine, src) = engine_with(source(EffectDef::new(Trigger::OnPlay, EffectKind::GainMemory, 2)));
        engine.trigger_effects(Trigger::OnPlay, src);
        assert_eq!(engine.state().memory, 2);

        let lose = EffectDef::new(Trigger::WhenAttacking, EffectKind::LoseMemory, 1);
        let (mut engine, src) = engine_with(source(lose));
        engine.trigger_effects(Trigger::WhenAttacking, src);
        assert_eq!(engine.state().memory, -1);
        assert!(engine.state().transition_in_progress);
    }

    #[test]
    fn test_increment_security_based_on_children() {
        let effect = EffectDef::new(Trigger::WhenAttacking, EffectKind::IncrementSecurityBasedOnChildren, 1)
            .with_condition(2);
        let (mut engine, src) = engine_with(source(effect));
        for _ in 0..5 {
            bury(&mut engine, src, AGUMON);
        }

        engine.trigger_effects(Trigger::WhenAttacking, src);
        assert_eq!(engine.card(src).unwrap().security_attack_count, 3);
    }

    #[test]
    fn test_zero_divisor_is_ignored() {
        let effect = EffectDef::new(Trigger::WhenAttacking, EffectKind::IncrementSecurityBasedOnChildren, 1);
        let (mut engine, src) = engine_with(source(effect));
        bury(&mut engine, src, AGUMON);

        engine.trigger_effects(Trigger::WhenAttacking, src);
        assert_eq!(engine.card(src).unwrap().security_attack_count, 1);
    }

    #[test]
    fn test_delete_below_threshold_in_encounter_order() {
        let effect = EffectDef::new(Trigger::OnPlay, EffectKind::DeleteOpponentDpBelowThreshold, 3000)
            .with_condition(1);
        let (mut engine, src) = engine_with(source(effect));
        let first = engine.spawn_card(AGUMON, PlayerId::ONE, Zone::BattleArea).unwrap();
        let second = engine.spawn_card(AGUMON, PlayerId::ONE, Zone::BattleArea).unwrap();
        let strong = engine.spawn_card(GREYMON, PlayerId::ONE, Zone::BattleArea).unwrap();

        engine.trigger_effects(Trigger::OnPlay, src);
        assert!(engine.card(first).is_none());
        assert!(engine.card(second).is_some());
        assert!(engine.card(strong).is_some());
        assert_eq!(engine.state().player(PlayerId::ONE).trash.len(), 1);
    }

    #[test]
    fn test_delete_target_opponent() {
        let (mut engine, src) = engine_with(source(EffectDef::new(Trigger::OnPlay, EffectKind::DeleteTargetOpponent, 0)));
        engine.trigger_effects(Trigger::OnPlay, src);
        assert!(engine.card(src).is_some());

        let target = engine.spawn_card(GREYMON, PlayerId::ONE, Zone::BattleArea).unwrap();
        engine.trigger_effects(Trigger::OnPlay, src);
        assert!(engine.card(target).is_none());
    }

    #[test]
    fn test_security_only_kinds_ignored_elsewhere() {
        let (mut engine, src) = engine_with(source(EffectDef::new(Trigger::OnPlay, EffectKind::PlayCardWithoutMemory, 0)));
        engine.trigger_effects(Trigger::OnPlay, src);
        assert_eq!(engine.card(src).unwrap().zone, Zone::BattleArea);
    }

    #[test]
    fn test_security_buffs() {
        let template = CardTemplate::new(CardId::new(100), "Barrier", CardType::Option)
            .with_effect(EffectDef::new(Trigger::Security, EffectKind::BuffSecurityNextTurn, 2000))
            .with_effect(EffectDef::new(Trigger::Security, EffectKind::ExtraSecurityAttackPartyNextTurn, 1));
        let (mut engine, src) = engine_with(template);

        engine.trigger_effects(Trigger::Security, src);
        assert_eq!(engine.state().player(PlayerId::ZERO).security_buff, 2000);
        assert_eq!(engine.state().player(PlayerId::ZERO).pending_party_security_attack, 1);
    }

    #[test]
    fn test_activate_main_effect_runs_main_list() {
        let template = CardTemplate::new(CardId::new(100), "Tai", CardType::Tamer)
            .with_effect(EffectDef::new(Trigger::Security, EffectKind::ActivateMainEffect, 0))
            .with_effect(EffectDef::new(Trigger::MainPhase, EffectKind::GainMemory, 1))
            .with_effect(EffectDef::new(Trigger::MainPhase, EffectKind::ActivateMainEffect, 0));
        let (mut engine, src) = engine_with(template);

        engine.trigger_effects(Trigger::Security, src);
        assert_eq!(engine.state().memory, 1);
    }

    #[test]
    fn test_unknown_kind_is_not_fatal() {
        let (mut engine, src) = engine_with(source(EffectDef::new(
            Trigger::OnPlay,
            EffectKind::Unknown("jamming".into()),
            1,
        )));
        engine.trigger_effects(Trigger::OnPlay, src);
        assert!(engine.card(src).is_some());
    }
}
