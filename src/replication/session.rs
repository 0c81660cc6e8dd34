//! Host-side session: the engine plus the transport it answers on.

use std::time::Duration;

use crate::announce::Announcer;
use crate::cards::DeckList;
use crate::core::error::ReplicationError;
use crate::rules::{MatchEngine, RulesEngine};

use super::codec;
use super::transport::Transport;

/// Runs a match for remote participants.
///
/// Intents are drained from the transport and resolved one at a time.
/// After each one, every delta it produced is encoded and broadcast
/// before the next intent is looked at.
pub struct HostSession<A: Announcer, T: Transport> {
    engine: MatchEngine<A>,
    transport: T,
    cursor: u64,
}

impl<A: Announcer, T: Transport> HostSession<A, T> {
    pub fn new(engine: MatchEngine<A>, transport: T) -> Self {
        Self {
            engine,
            transport,
            cursor: 0,
        }
    }

    /// Start the match and broadcast the opening deltas.
    pub fn start(&mut self, decks: [DeckList; 2]) -> Result<usize, ReplicationError> {
        self.engine.start(decks);
        self.flush()
    }

    /// Resolve every queued intent. Returns how many were accepted.
    ///
    /// Rejected intents are dropped; they change nothing and broadcast
    /// nothing.
    pub fn process_intents(&mut self) -> Result<usize, ReplicationError> {
        let mut accepted = 0;
        while let Some(envelope) = self.transport.next_intent() {
            match self.engine.submit(envelope) {
                Ok(()) => accepted += 1,
                Err(err) => tracing::debug!(sender = %envelope.sender, %err, "dropped intent"),
            }
            self.flush()?;
        }
        Ok(accepted)
    }

    /// Advance the host timeline and broadcast whatever it produced.
    pub fn tick(&mut self, elapsed: Duration) -> Result<usize, ReplicationError> {
        self.engine.advance(elapsed);
        self.flush()
    }

    /// Broadcast deltas not yet sent. Returns how many frames went out.
    pub fn flush(&mut self) -> Result<usize, ReplicationError> {
        let pending = self.engine.deltas().since(self.cursor);
        let mut frames = Vec::with_capacity(pending.len());
        for delta in pending {
            frames.push(codec::encode(delta)?);
        }

        let sent = frames.len();
        for frame in frames {
            self.transport.broadcast(frame);
        }
        self.cursor += sent as u64;
        Ok(sent)
    }

    pub fn engine(&self) -> &MatchEngine<A> {
        &self.engine
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
