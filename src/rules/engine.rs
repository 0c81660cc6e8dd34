//! The authoritative match host.
//!
//! `MatchEngine` is the single writer of a match. It owns the state, the
//! catalog, the host RNG and the pacing timeline, and every mutation goes
//! through one of the helpers below so that it is recorded in the delta log
//! in the order it happened.
//!
//! The resolvers are split by concern and implemented as further
//! `impl MatchEngine` blocks:
//! - `effects::resolver`: trigger dispatch and effect application
//! - `rules::digivolve`: stack-consuming evolution
//! - `rules::combat`: security attacks
//! - `rules::turn`: memory gauge, end of turn, start of turn
//! - `rules::play`: intent validation and execution

use std::time::Duration;

use crate::announce::{Announcer, LogCategory, TracingAnnouncer};
use crate::cards::{CardCatalog, CardId, CardInstance, DeckList};
use crate::core::action::{Intent, IntentEnvelope};
use crate::core::config::{MatchConfig, MEMORY_LIMIT};
use crate::core::entity::EntityId;
use crate::core::error::RequestError;
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;
use crate::core::state::{CardView, GameEndReason, GameResult, MatchState, MatchView};
use crate::replication::{DeltaLog, StateDelta};
use crate::schedule::Scheduler;
use crate::zones::Zone;

/// Work the host resumes after a pacing delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Continuation {
    /// Run end-of-turn housekeeping, flip the seat and start the next turn.
    CompleteTurnTransition,
}

/// Rules engine trait.
///
/// The surface a driver (network session, scripted player, test) uses to
/// play a match without knowing how the rules are implemented.
pub trait RulesEngine {
    /// Every intent `player` could submit right now without being rejected.
    ///
    /// Empty if the player can't act.
    fn legal_intents(&self, player: PlayerId) -> Vec<Intent>;

    /// Validate and execute an intent. A rejected intent changes nothing.
    fn submit(&mut self, envelope: IntentEnvelope) -> Result<(), RequestError>;

    /// Returns `Some(result)` if the match has ended, `None` if it continues.
    fn is_terminal(&self) -> Option<GameResult>;
}

/// Authoritative match host.
pub struct MatchEngine<A: Announcer = TracingAnnouncer> {
    pub(crate) catalog: CardCatalog,
    pub(crate) config: MatchConfig,
    pub(crate) state: MatchState,
    pub(crate) rng: GameRng,
    pub(crate) announcer: A,
    pub(crate) timeline: Scheduler<Continuation>,
    pub(crate) deltas: DeltaLog,
}

impl MatchEngine<TracingAnnouncer> {
    /// Create a host that announces through `tracing`.
    #[must_use]
    pub fn new(catalog: CardCatalog, config: MatchConfig) -> Self {
        Self::with_announcer(catalog, config, TracingAnnouncer)
    }
}

impl<A: Announcer> MatchEngine<A> {
    /// Create a host with an explicit announcement sink.
    #[must_use]
    pub fn with_announcer(catalog: CardCatalog, config: MatchConfig, announcer: A) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            catalog,
            config,
            state: MatchState::new(),
            rng,
            announcer,
            timeline: Scheduler::new(),
            deltas: DeltaLog::new(),
        }
    }

    // === Accessors ===

    /// Authoritative state (read-only).
    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// The public projection of the current state.
    #[must_use]
    pub fn view(&self) -> MatchView {
        self.state.view()
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn announcer(&self) -> &A {
        &self.announcer
    }

    /// Every delta emitted so far.
    #[must_use]
    pub fn deltas(&self) -> &DeltaLog {
        &self.deltas
    }

    /// A card on the board.
    #[must_use]
    pub fn card(&self, entity: EntityId) -> Option<&CardInstance> {
        self.state.board.get(entity)
    }

    /// Ids of the cards `owner` has in `zone`, in entity order.
    #[must_use]
    pub fn cards_in(&self, zone: Zone, owner: PlayerId) -> Vec<EntityId> {
        self.state.board.ids_in(zone, owner)
    }

    /// Pending pacing continuations.
    #[must_use]
    pub fn timeline(&self) -> &Scheduler<Continuation> {
        &self.timeline
    }

    // === Setup ===

    /// Start a match: shuffle, deal hands, lay out security, start seat 0's turn.
    pub fn start(&mut self, decks: [DeckList; 2]) {
        let mut shuffle_rng = self.rng.for_context("deck-shuffle");
        for (player, deck) in PlayerId::all().zip(decks) {
            let mut main = deck.main;
            shuffle_rng.shuffle(&mut main);
            self.load_deck(player, main, deck.eggs);
        }

        for _ in 0..self.config.opening_hand_size {
            for player in PlayerId::all() {
                self.draw_card(player);
            }
        }

        for player in PlayerId::all() {
            for _ in 0..self.config.security_size {
                let Some(card) = self.state.players[player].deck.pop_front() else {
                    break;
                };
                self.state.players[player].security.push_back(card);
            }
            self.emit_deck_count(player);
            self.emit_security_count(player);
        }

        self.announce("Match started", LogCategory::System, PlayerId::ZERO);
        self.start_turn(PlayerId::ZERO);
    }

    /// Replace a player's decks, top first. No shuffle.
    pub fn load_deck(&mut self, player: PlayerId, main: Vec<CardId>, eggs: Vec<CardId>) {
        let state = &mut self.state.players[player];
        state.deck = main.into_iter().collect();
        state.egg_deck = eggs.into_iter().collect();
        self.emit_deck_count(player);
        let count = self.state.players[player].egg_deck.len();
        self.emit(StateDelta::EggCount { player, count });
    }

    /// Replace a player's security stack, top first.
    pub fn load_security(&mut self, player: PlayerId, cards: Vec<CardId>) {
        self.state.players[player].security = cards.into_iter().collect();
        self.emit_security_count(player);
    }

    /// Put a new instance of a template into play.
    pub fn spawn_card(&mut self, card_id: CardId, owner: PlayerId, zone: Zone) -> Result<EntityId, RequestError> {
        let template = self
            .catalog
            .get(card_id)
            .ok_or(RequestError::TemplateNotFound(card_id))?;
        let entity = self.state.allocate_entity();
        let card = CardInstance::from_template(entity, template, owner, zone);
        self.emit(StateDelta::CardSpawned(CardView::from_instance(&card)));
        self.state.board.insert(card);
        Ok(entity)
    }

    // === Time ===

    /// Advance the host timeline, running every continuation that becomes due.
    pub fn advance(&mut self, elapsed: Duration) {
        for continuation in self.timeline.advance(elapsed) {
            self.run_continuation(continuation);
        }
    }

    /// Jump straight to the next pending continuation and run it.
    pub fn advance_to_next(&mut self) -> bool {
        let due = self.timeline.advance_to_next();
        let ran = !due.is_empty();
        for continuation in due {
            self.run_continuation(continuation);
        }
        ran
    }

    fn run_continuation(&mut self, continuation: Continuation) {
        match continuation {
            Continuation::CompleteTurnTransition => self.complete_turn_transition(),
        }
    }

    // === Mutation helpers ===
    //
    // Every authoritative write goes through these so it is logged.

    pub(crate) fn emit(&mut self, delta: StateDelta) {
        self.deltas.push(delta);
    }

    pub(crate) fn announce(&mut self, message: &str, category: LogCategory, player: PlayerId) {
        self.announcer.log(message, category, player);
    }

    pub(crate) fn emit_deck_count(&mut self, player: PlayerId) {
        let count = self.state.players[player].deck.len();
        self.emit(StateDelta::DeckCount { player, count });
    }

    pub(crate) fn emit_security_count(&mut self, player: PlayerId) {
        let count = self.state.players[player].security.len();
        self.emit(StateDelta::SecurityCount { player, count });
    }

    /// Move a board card to another zone.
    pub(crate) fn move_card(&mut self, entity: EntityId, zone: Zone) {
        if let Some(card) = self.state.board.get_mut(entity) {
            if card.zone != zone {
                card.zone = zone;
                self.emit(StateDelta::ZoneChanged { entity, zone });
            }
        }
    }

    /// Mutate a board card's turn-scoped stats. Returns false if the card is gone.
    pub(crate) fn update_card(&mut self, entity: EntityId, f: impl FnOnce(&mut CardInstance)) -> bool {
        let Some(card) = self.state.board.get_mut(entity) else {
            return false;
        };
        let before = card.stats();
        f(card);
        let stats = card.stats();
        if stats != before {
            self.emit(StateDelta::StatsChanged { entity, stats });
        }
        true
    }

    /// Add a template to a player's trash.
    pub(crate) fn add_to_trash(&mut self, player: PlayerId, card: CardId) {
        self.state.players[player].trash.push_back(card);
        self.emit(StateDelta::TrashAdded { player, card });
    }

    /// Remove a card and everything under it from play, trashing each member.
    ///
    /// Buried cards are trashed first, bottom to top, then the top card.
    pub(crate) fn destroy_stack(&mut self, entity: EntityId) -> bool {
        let Some(card) = self.state.board.remove(entity) else {
            return false;
        };
        self.emit(StateDelta::CardRemoved { entity });
        for (owner, card_id) in card.trash_order() {
            self.add_to_trash(owner, card_id);
        }
        let message = format!("{} is deleted", card.name);
        self.announce(&message, LogCategory::Destroy, card.owner);
        tracing::debug!(%entity, buried = card.stack_len(), "stack destroyed");
        true
    }

    /// Draw the top card of a deck into hand.
    pub(crate) fn draw_card(&mut self, player: PlayerId) -> Option<EntityId> {
        let card_id = self.state.players[player].deck.pop_front()?;
        self.emit_deck_count(player);
        match self.spawn_card(card_id, player, Zone::Hand) {
            Ok(entity) => Some(entity),
            Err(err) => {
                tracing::warn!(%player, %card_id, %err, "drawn card has no template, trashing it");
                self.add_to_trash(player, card_id);
                None
            }
        }
    }

    /// Flip the top security card of `player`.
    pub(crate) fn reveal_security(&mut self, player: PlayerId) -> Option<CardId> {
        let card = self.state.players[player].security.pop_front()?;
        self.emit_security_count(player);
        self.emit(StateDelta::SecurityRevealed { player, card });
        Some(card)
    }

    pub(crate) fn set_security_buff(&mut self, player: PlayerId, value: i32) {
        if self.state.players[player].security_buff != value {
            self.state.players[player].security_buff = value;
            self.emit(StateDelta::SecurityBuff { player, value });
        }
    }

    pub(crate) fn set_hatching_slot(&mut self, player: PlayerId, occupied: bool) {
        if self.state.players[player].hatching_slot_occupied != occupied {
            self.state.players[player].hatching_slot_occupied = occupied;
            self.emit(StateDelta::HatchingSlot { player, occupied });
        }
    }

    // === Memory gauge ===

    /// Set the gauge, clamped, then re-check the turn-switch condition.
    pub fn set_memory(&mut self, value: i32) {
        let memory = value.clamp(-MEMORY_LIMIT, MEMORY_LIMIT);
        if memory != self.state.memory {
            self.state.memory = memory;
            self.emit(StateDelta::MemoryChanged { memory });
        }
        self.check_turn_switch();
    }

    /// Shift the gauge by a signed amount (positive favors seat 0).
    pub fn shift_memory(&mut self, delta: i32) {
        self.set_memory(self.state.memory.saturating_add(delta));
    }

    /// `payer` spends `cost` memory: the gauge moves away from them.
    pub fn pay_memory(&mut self, payer: PlayerId, cost: i32) {
        self.shift_memory(-cost.saturating_mul(payer.memory_sign()));
    }

    /// `owner` gains `amount` memory: the gauge moves toward them.
    pub fn gain_memory(&mut self, owner: PlayerId, amount: i32) {
        self.shift_memory(amount.saturating_mul(owner.memory_sign()));
    }

    // === Outcome ===

    /// End the match. Later calls are ignored.
    pub(crate) fn declare_winner(&mut self, winner: PlayerId, reason: GameEndReason) {
        if self.state.outcome.is_some() {
            return;
        }
        let result = GameResult { winner, reason };
        self.state.outcome = Some(result);
        self.timeline.cancel(|_| true);
        self.emit(StateDelta::GameOver(result));
        let message = format!("{} wins ({:?})", winner, reason);
        self.announce(&message, LogCategory::System, winner);
        tracing::info!(%winner, ?reason, "match over");
    }
}

impl<A: Announcer> RulesEngine for MatchEngine<A> {
    fn legal_intents(&self, player: PlayerId) -> Vec<Intent> {
        self.enumerate_intents(player)
            .into_iter()
            .filter(|&intent| self.validate(IntentEnvelope::new(player, intent)).is_ok())
            .collect()
    }

    fn submit(&mut self, envelope: IntentEnvelope) -> Result<(), RequestError> {
        self.handle_intent(envelope)
    }

    fn is_terminal(&self) -> Option<GameResult> {
        self.state.outcome
    }
}
