//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use digi_tcg::announce::BattleLog;
use digi_tcg::cards::{CardCatalog, CardId, CardTemplate, CardType};
use digi_tcg::core::{Intent, IntentEnvelope, MatchConfig, PlayerId, RequestError};
use digi_tcg::effects::{EffectDef, EffectKind, Trigger};
use digi_tcg::rules::{MatchEngine, RulesEngine};
use digi_tcg::zones::Zone;
use digi_tcg::EntityId;

pub const KOROMON: CardId = CardId::new(1);
pub const AGUMON: CardId = CardId::new(2);
pub const GABUMON: CardId = CardId::new(3);
pub const GREYMON: CardId = CardId::new(4);
pub const GARURUMON: CardId = CardId::new(5);
pub const METALGREYMON: CardId = CardId::new(6);
pub const TAI: CardId = CardId::new(7);
pub const HAMMER_SPARK: CardId = CardId::new(8);
pub const GOMAMON: CardId = CardId::new(9);
pub const SORA: CardId = CardId::new(10);
pub const SHIELD: CardId = CardId::new(11);
pub const TENTOMON: CardId = CardId::new(12);

/// A small catalog covering every card type and the common effect kinds.
pub fn catalog() -> CardCatalog {
    CardCatalog::from_templates([
        CardTemplate::egg(KOROMON, "Koromon", 2, "Red")
            .with_inherited(EffectDef::new(Trigger::YourTurn, EffectKind::ModifyDp, 1000)),
        CardTemplate::digimon(AGUMON, "Agumon", 3, "Red", 2000)
            .with_play_cost(3)
            .with_digivolve_cost("Red", 0)
            .with_inherited(EffectDef::new(Trigger::WhenAttacking, EffectKind::ModifyDp, 1000)),
        CardTemplate::digimon(GABUMON, "Gabumon", 3, "Blue", 3000)
            .with_play_cost(3)
            .with_digivolve_cost("Red", 0),
        CardTemplate::digimon(GREYMON, "Greymon", 4, "Red", 4000)
            .with_play_cost(5)
            .with_digivolve_cost("Red", 2),
        CardTemplate::digimon(GARURUMON, "Garurumon", 4, "Blue", 5000)
            .with_play_cost(5)
            .with_digivolve_cost("Blue", 2)
            .with_effect(EffectDef::blocker()),
        CardTemplate::digimon(METALGREYMON, "MetalGreymon", 5, "Red", 7000)
            .with_play_cost(7)
            .with_digivolve_cost("Red", 3)
            .with_effect(EffectDef::new(Trigger::WhenDigivolving, EffectKind::GainMemory, 2)),
        CardTemplate::new(TAI, "Tai", CardType::Tamer)
            .with_play_cost(2)
            .with_effect(EffectDef::new(Trigger::MainPhase, EffectKind::GainMemory, 1))
            .with_effect(EffectDef::new(Trigger::Security, EffectKind::PlayCardWithoutMemory, 0)),
        CardTemplate::new(HAMMER_SPARK, "Hammer Spark", CardType::Option)
            .with_play_cost(0)
            .with_effect(EffectDef::new(Trigger::MainPhase, EffectKind::GainMemory, 2))
            .with_effect(EffectDef::new(Trigger::Security, EffectKind::ActivateMainEffect, 0)),
        CardTemplate::digimon(GOMAMON, "Gomamon", 3, "Blue", 3000).with_play_cost(3),
        CardTemplate::new(SORA, "Sora", CardType::Tamer)
            .with_play_cost(2)
            .with_effect(EffectDef::new(
                Trigger::Security,
                EffectKind::ExtraSecurityAttackPartyNextTurn,
                1,
            )),
        CardTemplate::new(SHIELD, "Shield", CardType::Option)
            .with_play_cost(1)
            .with_effect(EffectDef::new(Trigger::Security, EffectKind::BuffSecurityNextTurn, 2000)),
        CardTemplate::digimon(TENTOMON, "Tentomon", 3, "Green", 2000)
            .with_play_cost(2)
            .with_effect(EffectDef::new(Trigger::OnPlay, EffectKind::DeleteTargetOpponent, 0)),
    ])
    .expect("fixture catalog has unique ids")
}

pub fn config() -> MatchConfig {
    MatchConfig::new()
        .with_seed(42)
        .with_transition_delay(Duration::from_millis(300))
}

/// An engine with both decks loaded (top first) but no match started.
///
/// Seat 0 is active on turn 1 with memory 0.
pub fn engine() -> MatchEngine<BattleLog> {
    let mut engine = MatchEngine::with_announcer(catalog(), config(), BattleLog::new());
    for player in PlayerId::all() {
        engine.load_deck(player, vec![GOMAMON; 10], vec![KOROMON; 2]);
    }
    engine
}

pub fn spawn(engine: &mut MatchEngine<BattleLog>, card: CardId, owner: PlayerId, zone: Zone) -> EntityId {
    engine.spawn_card(card, owner, zone).expect("fixture template exists")
}

pub fn submit(engine: &mut MatchEngine<BattleLog>, player: PlayerId, intent: Intent) -> Result<(), RequestError> {
    engine.submit(IntentEnvelope::new(player, intent))
}

/// End the active player's turn and run the transition.
pub fn pass_turn(engine: &mut MatchEngine<BattleLog>) {
    let active = engine.state().active_player;
    submit(engine, active, Intent::EndTurn).expect("end turn accepted");
    assert!(engine.advance_to_next());
}

/// Put a card in the battle area and pass a full round so it may attack.
pub fn seasoned(engine: &mut MatchEngine<BattleLog>, card: CardId, owner: PlayerId) -> EntityId {
    let entity = spawn(engine, card, owner, Zone::BattleArea);
    pass_turn(engine);
    pass_turn(engine);
    entity
}
