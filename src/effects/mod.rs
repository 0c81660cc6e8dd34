//! Card effects: definitions, targeting, and the effect engine.
//!
//! - `EffectDef`: a `(trigger, kind, value, condition)` record on a card
//! - `Trigger`: the game event an effect fires on
//! - `EffectKind`: what the effect does
//! - `TargetSpec` / `TargetSelector`: which cards an effect can touch
//!
//! Resolution itself (`MatchEngine::trigger_effects`) lives in `resolver`
//! and runs only on the host.

mod effect;
mod resolver;
mod targeting;

pub use effect::{EffectDef, EffectKind, Trigger};
pub use targeting::{Side, TargetSelector, TargetSpec};
