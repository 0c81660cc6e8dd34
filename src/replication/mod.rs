//! Host to participant replication.
//!
//! ## Key Types
//!
//! - `StateDelta` / `DeltaLog`: the host's ordered record of every mutation
//! - `codec`: bincode framing for sequenced deltas
//! - `Transport` / `LocalTransport`: where frames go and intents come from
//! - `HostSession`: drains intents, runs the engine, broadcasts deltas
//! - `ReplicaView`: a participant's read-only fold of the stream

pub mod codec;
pub mod delta;
pub mod replica;
pub mod session;
pub mod transport;

pub use delta::{DeltaLog, SequencedDelta, StateDelta};
pub use replica::ReplicaView;
pub use session::HostSession;
pub use transport::{LocalTransport, Transport};
