//! Wire encoding for sequenced deltas.

use crate::core::error::ReplicationError;

use super::delta::SequencedDelta;

/// Encode one delta frame.
pub fn encode(delta: &SequencedDelta) -> Result<Vec<u8>, ReplicationError> {
    Ok(bincode::serialize(delta)?)
}

/// Decode one delta frame.
pub fn decode(frame: &[u8]) -> Result<SequencedDelta, ReplicationError> {
    Ok(bincode::deserialize(frame)?)
}
