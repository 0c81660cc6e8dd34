//! Turn and memory state machine.
//!
//! ```text
//! Player0Turn ──(memory < 0 or EndTurn)──► TransitionInProgress ──► Player1Turn
//! Player1Turn ──(memory > 0 or EndTurn)──► TransitionInProgress ──► Player0Turn
//! ```
//!
//! The transition is a scheduled continuation: requesting it only closes
//! the gate. Housekeeping, the seat flip and the next turn's start run when
//! the host timeline reaches `transition_delay`.

use crate::announce::{Announcer, LogCategory};
use crate::core::player::PlayerId;
use crate::core::state::GameEndReason;
use crate::effects::Trigger;
use crate::replication::StateDelta;
use crate::zones::Zone;

use super::{Continuation, MatchEngine};

impl<A: Announcer> MatchEngine<A> {
    /// Request end of turn if the gauge now favors the waiting player.
    pub(crate) fn check_turn_switch(&mut self) {
        if self.state.memory_favors_opponent() && !self.state.is_game_over() {
            tracing::debug!(memory = self.state.memory, active = %self.state.active_player, "memory crossed over");
            self.request_end_turn();
        }
    }

    /// Close the action gate and schedule the seat flip.
    ///
    /// Does nothing if a transition is already pending or the match is over.
    pub fn request_end_turn(&mut self) {
        if self.state.transition_in_progress || self.state.is_game_over() {
            return;
        }
        self.state.transition_in_progress = true;
        self.emit(StateDelta::TurnTransition { in_progress: true });

        let delay = self.config.transition_delay();
        let ready_at = self.timeline.schedule(delay, Continuation::CompleteTurnTransition);
        tracing::debug!(?ready_at, "turn transition scheduled");
    }

    /// Finish a pending transition: housekeeping, seat flip, start of turn.
    pub(crate) fn complete_turn_transition(&mut self) {
        if !self.state.transition_in_progress || self.state.is_game_over() {
            return;
        }

        let leaving = self.state.active_player;
        self.end_of_turn_housekeeping(leaving);

        let entering = leaving.opponent();
        self.state.active_player = entering;
        self.state.turn_number += 1;
        self.emit(StateDelta::ActivePlayerChanged {
            player: entering,
            turn_number: self.state.turn_number,
        });

        self.state.transition_in_progress = false;
        self.emit(StateDelta::TurnTransition { in_progress: false });

        self.start_turn(entering);
        // Effects resolved after the request may have moved the gauge back.
        self.check_turn_switch();
    }

    fn end_of_turn_housekeeping(&mut self, leaving: PlayerId) {
        for entity in self.state.board.ids_in(Zone::BattleArea, leaving) {
            self.update_card(entity, |card| {
                card.flags.can_attack = true;
                card.flags.is_suspended = false;
                card.reset_attack_counters();
            });
        }
        // Buffs the waiting player picked up during this turn expire with it.
        for entity in self.state.board.ids_in(Zone::BattleArea, leaving.opponent()) {
            self.update_card(entity, |card| {
                card.flags.is_blocking = false;
                card.dp_buff = 0;
            });
        }
        for entity in self.state.board.ids_in(Zone::TamerArea, leaving) {
            self.update_card(entity, |card| card.flags.main_effect_used = false);
        }
    }

    /// Begin `player`'s turn: draw, reset the security buff, apply pending
    /// party attacks, then fire turn triggers.
    ///
    /// Drawing from an empty deck loses the match.
    pub(crate) fn start_turn(&mut self, player: PlayerId) {
        let message = format!("Turn {}: {}", self.state.turn_number, player);
        self.announce(&message, LogCategory::System, player);

        if self.state.players[player].deck.is_empty() {
            self.announce("Deck is empty", LogCategory::System, player);
            self.declare_winner(player.opponent(), GameEndReason::DeckOut);
            return;
        }
        self.draw_card(player);
        self.set_security_buff(player, 0);

        let bonus = std::mem::take(&mut self.state.players[player].pending_party_security_attack);
        if bonus != 0 {
            for entity in self.state.board.ids_in(Zone::BattleArea, player) {
                self.update_card(entity, |card| {
                    card.security_attack_count = card.security_attack_count.saturating_add(bonus);
                });
            }
        }

        self.fire_turn_trigger(Trigger::YourTurn, player);
        self.fire_turn_trigger(Trigger::OpponentTurn, player.opponent());
    }

    fn fire_turn_trigger(&mut self, trigger: Trigger, owner: PlayerId) {
        let sources: Vec<_> = self
            .state
            .board
            .iter()
            .filter(|card| card.owner == owner && card.zone.fires_turn_start())
            .map(|card| card.entity_id)
            .collect();
        for source in sources {
            if self.state.is_game_over() {
                return;
            }
            self.trigger_effects(trigger, source);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::announce::BattleLog;
    use crate::cards::{CardCatalog, CardId, CardTemplate};
    use crate::core::config::MatchConfig;
    use crate::core::state::TurnPhase;
    use crate::effects::{EffectDef, EffectKind};

    fn engine() -> MatchEngine<BattleLog> {
        let catalog =
            CardCatalog::from_templates([CardTemplate::digimon(CardId::new(1), "Agumon", 3, "Red", 2000)]).unwrap();
        let config = MatchConfig::new().with_transition_delay(Duration::from_millis(500));
        let mut engine = MatchEngine::with_announcer(catalog, config, BattleLog::new());
        for player in PlayerId::all() {
            engine.load_deck(player, vec![CardId::new(1); 5], Vec::new());
        }
        engine
    }

    #[test]
    fn test_request_is_idempotent() {
        let mut engine = engine();
        engine.request_end_turn();
        engine.request_end_turn();

        assert_eq!(engine.state().phase(), TurnPhase::TransitionInProgress);
        assert_eq!(engine.timeline().pending().count(), 1);
    }

    #[test]
    fn test_transition_waits_for_delay() {
        let mut engine = engine();
        engine.request_end_turn();

        engine.advance(Duration::from_millis(499));
        assert_eq!(engine.state().active_player, PlayerId::ZERO);

        engine.advance(Duration::from_millis(1));
        assert_eq!(engine.state().phase(), TurnPhase::Player1Turn);
        assert_eq!(engine.state().turn_number, 2);
        assert_eq!(engine.cards_in(Zone::Hand, PlayerId::ONE).len(), 1);
    }

    #[test]
    fn test_opponent_memory_requests_switch() {
        let mut engine = engine();
        engine.pay_memory(PlayerId::ZERO, 1);
        assert_eq!(engine.state().phase(), TurnPhase::TransitionInProgress);
    }

    #[test]
    fn test_opponent_turn_buff_expires_with_that_turn() {
        let catalog = CardCatalog::from_templates([
            CardTemplate::digimon(CardId::new(1), "Agumon", 3, "Red", 2000),
            CardTemplate::digimon(CardId::new(2), "Gabumon", 3, "Blue", 3000)
                .with_effect(EffectDef::new(Trigger::OpponentTurn, EffectKind::ModifyDp, 1000)),
        ])
        .unwrap();
        let mut engine = MatchEngine::with_announcer(catalog, MatchConfig::new(), BattleLog::new());
        for player in PlayerId::all() {
            engine.load_deck(player, vec![CardId::new(1); 5], Vec::new());
        }
        let guard = engine.spawn_card(CardId::new(2), PlayerId::ZERO, Zone::BattleArea).unwrap();

        engine.request_end_turn();
        engine.advance_to_next();
        assert_eq!(engine.state().active_player, PlayerId::ONE);
        assert_eq!(engine.card(guard).unwrap().dp_buff, 1000);

        engine.request_end_turn();
        engine.advance_to_next();
        assert_eq!(engine.state().active_player, PlayerId::ZERO);
        assert_eq!(engine.card(guard).unwrap().dp_buff, 0);
        assert_eq!(engine.card(guard).unwrap().effective_dp(), 3000);
    }

    #[test]
    fn test_empty_deck_loses() {
        let mut engine = engine();
        engine.load_deck(PlayerId::ONE, Vec::new(), Vec::new());
        engine.request_end_turn();
        engine.advance_to_next();

        let result = engine.state().outcome.unwrap();
        assert_eq!(result.winner, PlayerId::ZERO);
        assert_eq!(result.reason, GameEndReason::DeckOut);
    }
}
