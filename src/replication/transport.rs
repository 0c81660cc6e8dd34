//! Transport seam between the host and its participants.

use std::collections::VecDeque;

use crate::core::action::IntentEnvelope;

/// Carries delta frames out and intents in.
///
/// Implementations own delivery. The host only needs frames to arrive in
/// the order they were broadcast.
pub trait Transport {
    /// Send an encoded delta frame to every participant.
    fn broadcast(&mut self, frame: Vec<u8>);

    /// Next intent received from a participant, if any.
    fn next_intent(&mut self) -> Option<IntentEnvelope>;
}

/// In-process transport backed by two queues.
#[derive(Debug, Default)]
pub struct LocalTransport {
    frames: VecDeque<Vec<u8>>,
    intents: VecDeque<IntentEnvelope>,
}

impl LocalTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an intent as if a participant had sent it.
    pub fn send_intent(&mut self, envelope: IntentEnvelope) {
        self.intents.push_back(envelope);
    }

    /// Take every frame broadcast so far.
    pub fn drain_frames(&mut self) -> Vec<Vec<u8>> {
        self.frames.drain(..).collect()
    }

    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }
}

impl Transport for LocalTransport {
    fn broadcast(&mut self, frame: Vec<u8>) {
        self.frames.push_back(frame);
    }

    fn next_intent(&mut self) -> Option<IntentEnvelope> {
        self.intents.pop_front()
    }
}
