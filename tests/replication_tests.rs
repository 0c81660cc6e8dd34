//! Replicas folding the host's delta stream.

mod common;

use std::time::Duration;

use common::*;
use digi_tcg::core::{GameRng, Intent, IntentEnvelope, PlayerId, ReplicationError};
use digi_tcg::replication::{codec, HostSession, LocalTransport, ReplicaView, SequencedDelta, StateDelta};
use digi_tcg::rules::{MatchEngine, ScriptedPlayer};
use digi_tcg::zones::Zone;
use digi_tcg::{BattleLog, DeckList};

fn decks(seed: u64) -> [DeckList; 2] {
    let catalog = catalog();
    let mut rng = GameRng::new(seed);
    [
        DeckList::random(&catalog, &mut rng, 30, 4),
        DeckList::random(&catalog, &mut rng, 30, 4),
    ]
}

fn session() -> HostSession<BattleLog, LocalTransport> {
    let engine = MatchEngine::with_announcer(catalog(), config(), BattleLog::new());
    HostSession::new(engine, LocalTransport::new())
}

fn sync(session: &mut HostSession<BattleLog, LocalTransport>, replica: &mut ReplicaView) {
    for frame in session.transport_mut().drain_frames() {
        replica.apply_frame(&frame).unwrap();
    }
}

#[test]
fn test_replica_matches_host_after_start() {
    let mut session = session();
    let mut replica = ReplicaView::new(&config());

    session.start(decks(3)).unwrap();
    sync(&mut session, &mut replica);

    assert_eq!(replica.view(), &session.engine().view());
    assert_eq!(replica.view().players[PlayerId::ZERO].security_count, 5);
    assert_eq!(replica.next_seq(), session.engine().deltas().next_seq());
}

#[test]
fn test_replica_tracks_scripted_match() {
    let mut session = session();
    let mut replica = ReplicaView::new(&config());
    session.start(decks(11)).unwrap();
    sync(&mut session, &mut replica);

    let player = ScriptedPlayer;
    for _ in 0..400 {
        if session.engine().state().is_game_over() {
            break;
        }
        let active = session.engine().state().active_player;
        match player.choose(session.engine(), active) {
            Some(intent) => {
                session.transport_mut().send_intent(IntentEnvelope::new(active, intent));
                assert_eq!(session.process_intents().unwrap(), 1);
            }
            None => {
                session.tick(Duration::from_millis(300)).unwrap();
            }
        }
        sync(&mut session, &mut replica);
        assert_eq!(replica.view(), &session.engine().view());
    }
}

#[test]
fn test_rejected_intent_broadcasts_nothing() {
    let mut session = session();
    session.start(decks(5)).unwrap();
    session.transport_mut().drain_frames();

    session
        .transport_mut()
        .send_intent(IntentEnvelope::new(PlayerId::ONE, Intent::EndTurn));

    assert_eq!(session.process_intents().unwrap(), 0);
    assert_eq!(session.transport().pending_frames(), 0);
}

#[test]
fn test_digivolution_stack_replicates() {
    let mut engine = engine();
    let mut replica = ReplicaView::new(&config());
    let base = spawn(&mut engine, AGUMON, PlayerId::ZERO, Zone::BattleArea);
    let top = spawn(&mut engine, GREYMON, PlayerId::ZERO, Zone::Hand);
    engine.set_memory(2);
    engine.try_digivolve(base, top);

    for delta in engine.deltas().entries() {
        replica.apply(delta).unwrap();
    }

    let card = &replica.view().cards[&top];
    assert_eq!(card.stack, vec![AGUMON]);
    assert!(!replica.view().cards.contains_key(&base));
    assert_eq!(replica.view(), &engine.view());
}

#[test]
fn test_attack_preview_is_presentation_only() {
    let mut engine = engine();
    let mut replica = ReplicaView::new(&config());
    let attacker = spawn(&mut engine, GREYMON, PlayerId::ZERO, Zone::BattleArea);
    engine.load_security(PlayerId::ONE, vec![GOMAMON]);
    engine.resolve_security_attack(attacker, 1, 0);

    for delta in engine.deltas().entries() {
        replica.apply(delta).unwrap();
    }
    let view = replica.view().clone();
    assert_eq!(replica.attack_preview().map(|s| s.revealed), Some(Some(GOMAMON)));

    replica.advance(config().reveal_pause());
    assert!(replica.attack_preview().is_none());
    assert_eq!(replica.view(), &view);
}

#[test]
fn test_duplicate_frame_rejected() {
    let mut engine = MatchEngine::with_announcer(catalog(), config(), BattleLog::new());
    let mut replica = ReplicaView::new(&config());
    engine.set_memory(4);

    let frame = codec::encode(&engine.deltas().entries()[0]).unwrap();
    replica.apply_frame(&frame).unwrap();
    let err = replica.apply_frame(&frame).unwrap_err();

    assert!(matches!(err, ReplicationError::OutOfOrder { expected: 1, got: 0 }));
    assert_eq!(replica.view().memory, 4);
}

#[test]
fn test_frame_with_unknown_seat_rejected() {
    let frame_for = |player| {
        codec::encode(&SequencedDelta {
            seq: 0,
            delta: StateDelta::SecurityBuff { player, value: 1000 },
        })
        .unwrap()
    };
    let mut frame = frame_for(PlayerId::ONE);
    let seat = frame_for(PlayerId::ZERO)
        .iter()
        .zip(&frame)
        .position(|(a, b)| a != b)
        .unwrap();
    frame[seat] = 2;

    let mut replica = ReplicaView::new(&config());
    let err = replica.apply_frame(&frame).unwrap_err();

    assert!(matches!(err, ReplicationError::Codec(_)));
    assert_eq!(replica.next_seq(), 0);
}
