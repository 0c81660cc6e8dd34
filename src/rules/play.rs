//! Intent validation and execution.
//!
//! `validate` is pure: it reads the authoritative state and either accepts
//! the intent or names the first precondition it breaks. Only accepted
//! intents reach `execute`, so a rejection never leaves a partial change
//! behind.

use crate::announce::{Announcer, LogCategory};
use crate::cards::CardType;
use crate::core::action::{Intent, IntentEnvelope};
use crate::core::entity::EntityId;
use crate::core::error::RequestError;
use crate::core::player::PlayerId;
use crate::effects::Trigger;
use crate::replication::StateDelta;
use crate::zones::Zone;

use super::MatchEngine;

impl<A: Announcer> MatchEngine<A> {
    /// Check an intent against the current state without changing it.
    pub fn validate(&self, envelope: IntentEnvelope) -> Result<(), RequestError> {
        let sender = envelope.sender;

        if self.state.is_game_over() {
            return Err(RequestError::GameOver);
        }
        if self.state.transition_in_progress {
            return Err(RequestError::TransitionInProgress);
        }
        if sender != self.state.active_player {
            return Err(RequestError::NotActivePlayer { sender });
        }
        for entity in envelope.intent.referenced_cards() {
            let card = self.state.board.get(entity).ok_or(RequestError::UnknownCard { entity })?;
            if card.owner != sender {
                return Err(RequestError::NotOwner { entity, sender });
            }
        }

        match envelope.intent {
            Intent::PlayCard { card } => {
                self.expect_zone(card, Zone::Hand)?;
                let card_type = self.card_type(card);
                if card_type == Some(CardType::DigiEgg) {
                    return Err(RequestError::Unplayable { card_type: CardType::DigiEgg });
                }
            }
            Intent::HatchEgg => {
                let player = &self.state.players[sender];
                if player.hatching_slot_occupied {
                    return Err(RequestError::HatchingSlotOccupied(sender));
                }
                if player.egg_deck.is_empty() {
                    return Err(RequestError::EggDeckEmpty(sender));
                }
            }
            Intent::Digivolve { base, candidate } => {
                self.expect_zone(candidate, Zone::Hand)?;
                let zone = self.state.board.zone_of(base).ok_or(RequestError::UnknownCard { entity: base })?;
                if !zone.accepts_digivolution() {
                    return Err(RequestError::WrongZone { entity: base, expected: Zone::BattleArea, actual: zone });
                }
                if self.can_digivolve(base, candidate).is_none() {
                    return Err(RequestError::DigivolveRejected { base, candidate });
                }
            }
            Intent::DeclareAttack { attacker } => {
                self.expect_zone(attacker, Zone::BattleArea)?;
                let ready = self
                    .state
                    .board
                    .get(attacker)
                    .is_some_and(|card| card.flags.can_attack && !card.flags.is_suspended);
                if !ready {
                    return Err(RequestError::CannotAttack(attacker));
                }
            }
            Intent::ActivateMainEffect { card } => {
                self.expect_zone(card, Zone::TamerArea)?;
                let Some(tamer) = self.state.board.get(card) else {
                    return Err(RequestError::UnknownCard { entity: card });
                };
                if tamer.card_type != CardType::Tamer {
                    return Err(RequestError::Unplayable { card_type: tamer.card_type });
                }
                if tamer.flags.main_effect_used {
                    return Err(RequestError::MainEffectUsed(card));
                }
            }
            Intent::DeclareBlocker { card } => {
                self.expect_zone(card, Zone::BattleArea)?;
                let eligible = self.state.board.get(card).is_some_and(|c| {
                    c.flags.is_blocker && !c.flags.is_suspended && !c.flags.is_blocking
                });
                if !eligible {
                    return Err(RequestError::NotABlocker(card));
                }
            }
            Intent::EndTurn => {}
        }

        Ok(())
    }

    /// Validate an intent and, if accepted, execute it.
    pub fn handle_intent(&mut self, envelope: IntentEnvelope) -> Result<(), RequestError> {
        if let Err(err) = self.validate(envelope) {
            tracing::debug!(sender = %envelope.sender, intent = ?envelope.intent, %err, "intent rejected");
            return Err(err);
        }
        tracing::trace!(sender = %envelope.sender, intent = ?envelope.intent, "intent accepted");
        self.execute(envelope.sender, envelope.intent)
    }

    /// Every intent `player` might submit, before validation.
    #[must_use]
    pub fn enumerate_intents(&self, player: PlayerId) -> Vec<Intent> {
        let board = &self.state.board;
        let hand = board.ids_in(Zone::Hand, player);
        let battle = board.ids_in(Zone::BattleArea, player);
        let mut bases = board.ids_in(Zone::BreedingActiveSlot, player);
        bases.extend(battle.iter().copied());

        let mut intents = Vec::new();
        intents.extend(battle.iter().map(|&attacker| Intent::DeclareAttack { attacker }));
        for &candidate in &hand {
            intents.extend(bases.iter().map(|&base| Intent::Digivolve { base, candidate }));
        }
        intents.push(Intent::HatchEgg);
        intents.extend(hand.iter().map(|&card| Intent::PlayCard { card }));
        intents.extend(
            board
                .ids_in(Zone::TamerArea, player)
                .into_iter()
                .map(|card| Intent::ActivateMainEffect { card }),
        );
        intents.extend(battle.iter().map(|&card| Intent::DeclareBlocker { card }));
        intents.push(Intent::EndTurn);
        intents
    }

    fn execute(&mut self, sender: PlayerId, intent: Intent) -> Result<(), RequestError> {
        match intent {
            Intent::PlayCard { card } => self.play_card(card),
            Intent::HatchEgg => {
                self.hatch_egg(sender);
                Ok(())
            }
            Intent::Digivolve { base, candidate } => {
                if self.try_digivolve(base, candidate) {
                    Ok(())
                } else {
                    Err(RequestError::DigivolveRejected { base, candidate })
                }
            }
            Intent::DeclareAttack { attacker } => {
                self.declare_attack(attacker);
                Ok(())
            }
            Intent::ActivateMainEffect { card } => {
                self.trigger_effects(Trigger::MainPhase, card);
                self.update_card(card, |tamer| tamer.flags.main_effect_used = true);
                Ok(())
            }
            Intent::DeclareBlocker { card } => {
                for other in self.state.board.ids_in(Zone::BattleArea, sender) {
                    self.update_card(other, |c| c.flags.is_blocking = other == card);
                }
                Ok(())
            }
            Intent::EndTurn => {
                self.announce("Turn ended", LogCategory::System, sender);
                self.set_memory(0);
                self.request_end_turn();
                Ok(())
            }
        }
    }

    fn play_card(&mut self, card: EntityId) -> Result<(), RequestError> {
        let Some(played) = self.state.board.get(card) else {
            return Err(RequestError::UnknownCard { entity: card });
        };
        let owner = played.owner;
        let cost = played.play_cost;
        let card_type = played.card_type;
        let message = format!("{} played {}", owner, played.name);

        match card_type {
            CardType::Digimon => {
                self.move_card(card, Zone::BattleArea);
                self.update_card(card, |digimon| {
                    digimon.flags.can_attack = false;
                    digimon.flags.is_suspended = false;
                });
                self.announce(&message, LogCategory::System, owner);
                self.pay_memory(owner, cost);
                self.trigger_effects(Trigger::OnPlay, card);
            }
            CardType::Tamer => {
                self.move_card(card, Zone::TamerArea);
                self.announce(&message, LogCategory::System, owner);
                self.pay_memory(owner, cost);
                self.trigger_effects(Trigger::OnPlay, card);
            }
            CardType::Option => {
                self.move_card(card, Zone::Option);
                self.announce(&message, LogCategory::Effect, owner);
                self.pay_memory(owner, cost);
                self.trigger_effects(Trigger::MainPhase, card);
                if self.state.board.zone_of(card) == Some(Zone::Option) {
                    self.destroy_stack(card);
                }
            }
            CardType::DigiEgg => return Err(RequestError::Unplayable { card_type }),
        }
        Ok(())
    }

    fn hatch_egg(&mut self, player: PlayerId) {
        let Some(egg) = self.state.players[player].egg_deck.pop_front() else {
            return;
        };
        let count = self.state.players[player].egg_deck.len();
        self.emit(StateDelta::EggCount { player, count });

        match self.spawn_card(egg, player, Zone::BreedingActiveSlot) {
            Ok(_) => {
                self.set_hatching_slot(player, true);
                self.announce("Hatched a Digi-Egg", LogCategory::System, player);
            }
            Err(err) => {
                tracing::warn!(%player, %egg, %err, "hatched egg has no template, trashing it");
                self.add_to_trash(player, egg);
            }
        }
    }

    /// Fire `WhenAttacking`, capture the attack counters, rest the attacker
    /// and resolve the attack.
    fn declare_attack(&mut self, attacker: EntityId) {
        self.trigger_effects(Trigger::WhenAttacking, attacker);

        let Some(card) = self.state.board.get(attacker) else {
            return;
        };
        let attack_count = card.security_attack_count;
        let dp_buff = card.dp_buff;
        let owner = card.owner;
        let message = format!("{} attacks x{}", card.name, attack_count);

        self.update_card(attacker, |card| {
            card.reset_attack_counters();
            card.flags.is_suspended = true;
            card.flags.can_attack = false;
        });
        self.announce(&message, LogCategory::Attack, owner);

        let steps = self.resolve_security_attack(attacker, attack_count, dp_buff);
        tracing::debug!(%attacker, steps = steps.len(), "attack resolved");
    }

    fn expect_zone(&self, entity: EntityId, expected: Zone) -> Result<(), RequestError> {
        let actual = self.state.board.zone_of(entity).ok_or(RequestError::UnknownCard { entity })?;
        if actual == expected {
            Ok(())
        } else {
            Err(RequestError::WrongZone { entity, expected, actual })
        }
    }

    fn card_type(&self, entity: EntityId) -> Option<CardType> {
        self.state.board.get(entity).map(|card| card.card_type)
    }
}
