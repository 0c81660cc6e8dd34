//! Read-only participant mirror.
//!
//! A replica never runs a resolver. It folds the host's delta stream, in
//! order, into a `MatchView`; random choices and combat outcomes arrive
//! already decided. Presentation timing (how long an attack step stays on
//! screen, when the turn banner goes away) runs on the replica's own
//! timeline and never feeds back into the view.

use std::time::Duration;

use crate::core::config::MatchConfig;
use crate::core::error::ReplicationError;
use crate::core::state::MatchView;
use crate::rules::AttackStepResult;
use crate::schedule::Scheduler;

use super::codec;
use super::delta::{SequencedDelta, StateDelta};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cue {
    HideAttackPreview { seq: u64 },
    HideTurnBanner,
}

/// A participant's mirror of the match.
#[derive(Clone, Debug)]
pub struct ReplicaView {
    view: MatchView,
    next_seq: u64,
    attack_preview: Option<(u64, AttackStepResult)>,
    banner_visible: bool,
    presentation: Scheduler<Cue>,
    reveal_pause: Duration,
    transition_delay: Duration,
}

impl ReplicaView {
    #[must_use]
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            view: MatchView::initial(),
            next_seq: 0,
            attack_preview: None,
            banner_visible: false,
            presentation: Scheduler::new(),
            reveal_pause: config.reveal_pause(),
            transition_delay: config.transition_delay(),
        }
    }

    /// The mirrored match.
    #[must_use]
    pub fn view(&self) -> &MatchView {
        &self.view
    }

    /// Sequence number of the next delta this replica expects.
    #[must_use]
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// The attack step currently on screen.
    #[must_use]
    pub fn attack_preview(&self) -> Option<&AttackStepResult> {
        self.attack_preview.as_ref().map(|(_, step)| step)
    }

    #[must_use]
    pub fn banner_visible(&self) -> bool {
        self.banner_visible
    }

    /// Decode and apply one frame.
    pub fn apply_frame(&mut self, frame: &[u8]) -> Result<(), ReplicationError> {
        let delta = codec::decode(frame)?;
        self.apply(&delta)
    }

    /// Apply one delta. A delta that fails to apply leaves the view unchanged.
    pub fn apply(&mut self, sequenced: &SequencedDelta) -> Result<(), ReplicationError> {
        if sequenced.seq != self.next_seq {
            return Err(ReplicationError::OutOfOrder {
                expected: self.next_seq,
                got: sequenced.seq,
            });
        }
        self.fold(sequenced.seq, &sequenced.delta)?;
        self.next_seq += 1;
        Ok(())
    }

    /// Advance the presentation clock.
    pub fn advance(&mut self, elapsed: Duration) {
        for cue in self.presentation.advance(elapsed) {
            match cue {
                Cue::HideAttackPreview { seq } => {
                    if self.attack_preview.as_ref().is_some_and(|(shown, _)| *shown == seq) {
                        self.attack_preview = None;
                    }
                }
                Cue::HideTurnBanner => self.banner_visible = false,
            }
        }
    }

    fn fold(&mut self, seq: u64, delta: &StateDelta) -> Result<(), ReplicationError> {
        let view = &mut self.view;
        match delta {
            StateDelta::CardSpawned(card) => {
                view.cards.insert(card.entity_id, card.clone());
            }
            StateDelta::ZoneChanged { entity, zone } => {
                let card = view.cards.get_mut(entity).ok_or(ReplicationError::UnknownEntity(*entity))?;
                card.zone = *zone;
            }
            StateDelta::StatsChanged { entity, stats } => {
                let card = view.cards.get_mut(entity).ok_or(ReplicationError::UnknownEntity(*entity))?;
                card.stats = *stats;
            }
            StateDelta::Digivolved { base, top } => {
                if !view.cards.contains_key(top) {
                    return Err(ReplicationError::UnknownEntity(*top));
                }
                let buried = view.cards.remove(base).ok_or(ReplicationError::UnknownEntity(*base))?;
                if let Some(card) = view.cards.get_mut(top) {
                    card.stack = buried.stack;
                    card.stack.push(buried.card_id);
                }
            }
            StateDelta::CardRemoved { entity } => {
                view.cards.remove(entity).ok_or(ReplicationError::UnknownEntity(*entity))?;
            }
            StateDelta::TrashAdded { player, card } => view.players[*player].trash.push_back(*card),
            StateDelta::DeckCount { player, count } => view.players[*player].deck_count = *count,
            StateDelta::EggCount { player, count } => view.players[*player].egg_count = *count,
            StateDelta::SecurityCount { player, count } => view.players[*player].security_count = *count,
            StateDelta::SecurityRevealed { player, card } => {
                tracing::trace!(%player, %card, "security revealed");
            }
            StateDelta::SecurityBuff { player, value } => view.players[*player].security_buff = *value,
            StateDelta::HatchingSlot { player, occupied } => {
                view.players[*player].hatching_slot_occupied = *occupied;
            }
            StateDelta::MemoryChanged { memory } => view.memory = *memory,
            StateDelta::TurnTransition { in_progress } => {
                view.transition_in_progress = *in_progress;
                if *in_progress {
                    self.banner_visible = true;
                    self.presentation.schedule(self.transition_delay, Cue::HideTurnBanner);
                }
            }
            StateDelta::ActivePlayerChanged { player, turn_number } => {
                view.active_player = *player;
                view.turn_number = *turn_number;
            }
            StateDelta::AttackStep(step) => {
                self.attack_preview = Some((seq, step.clone()));
                self.presentation.schedule(self.reveal_pause, Cue::HideAttackPreview { seq });
            }
            StateDelta::GameOver(result) => view.outcome = Some(*result),
        }
        Ok(())
    }
}
