//! The authoritative rules host.
//!
//! `MatchEngine` owns the match state and runs every resolver:
//! - Digivolution (`digivolve`)
//! - Security attacks (`combat`)
//! - Memory gauge and turn transitions (`turn`)
//! - Intent validation and card play (`play`)
//!
//! Drivers talk to it through the `RulesEngine` trait and never touch
//! state directly.

pub mod combat;
pub mod digivolve;
pub mod engine;
pub mod play;
pub mod scripted;
pub mod turn;

pub use crate::core::state::GameResult;
pub use combat::AttackStepResult;
pub use digivolve::digivolve_cost;
pub use engine::{Continuation, MatchEngine, RulesEngine};
pub use scripted::{play_out, ScriptedPlayer};
