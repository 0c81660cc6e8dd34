//! A fixed-priority player for simulations.
//!
//! Prefers attacking, then digivolving, hatching, playing, tamer effects
//! and blockers, and ends the turn when nothing else is legal.

use crate::announce::Announcer;
use crate::core::action::{Intent, IntentEnvelope};
use crate::core::player::PlayerId;
use crate::core::state::GameResult;
use crate::zones::Zone;

use super::{MatchEngine, RulesEngine};

/// Picks the first legal intent in priority order.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScriptedPlayer;

impl ScriptedPlayer {
    fn priority(intent: &Intent) -> u8 {
        match intent {
            Intent::DeclareAttack { .. } => 0,
            Intent::Digivolve { .. } => 1,
            Intent::HatchEgg => 2,
            Intent::PlayCard { .. } => 3,
            Intent::ActivateMainEffect { .. } => 4,
            Intent::DeclareBlocker { .. } => 5,
            Intent::EndTurn => 6,
        }
    }

    /// The intent this player would submit, if any is legal.
    ///
    /// Once a blocker is readied it is kept; swapping blockers back and
    /// forth would never end the turn.
    #[must_use]
    pub fn choose<A: Announcer>(&self, engine: &MatchEngine<A>, player: PlayerId) -> Option<Intent> {
        let has_blocker = engine
            .state()
            .board
            .in_zone(Zone::BattleArea, player)
            .any(|card| card.flags.is_blocking);

        engine
            .legal_intents(player)
            .into_iter()
            .filter(|intent| !(has_blocker && matches!(intent, Intent::DeclareBlocker { .. })))
            .min_by_key(Self::priority)
    }
}

/// Drive a started match with scripted players on both seats.
///
/// Pending transitions are run immediately. Stops after `max_actions`
/// submissions, or earlier if the match ends.
pub fn play_out<A: Announcer>(engine: &mut MatchEngine<A>, max_actions: usize) -> Option<GameResult> {
    let player = ScriptedPlayer;
    let mut actions = 0;

    while engine.is_terminal().is_none() && actions < max_actions {
        let seat = engine.state().active_player;
        match player.choose(engine, seat) {
            Some(intent) => {
                if let Err(err) = engine.submit(IntentEnvelope::new(seat, intent)) {
                    tracing::warn!(%seat, ?intent, %err, "scripted intent rejected");
                    break;
                }
                actions += 1;
            }
            None => {
                if !engine.advance_to_next() {
                    break;
                }
            }
        }
    }

    tracing::debug!(actions, "scripted match stopped");
    engine.is_terminal()
}
