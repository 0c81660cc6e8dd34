//! Battle announcements.
//!
//! Resolvers report what happened through an injected `Announcer`. It is a
//! fire-and-forget sink: it returns nothing and must not fail, so the rules
//! never depend on how (or whether) announcements are shown.

use serde::{Deserialize, Serialize};

use crate::core::player::PlayerId;

/// What an announcement is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogCategory {
    Buff,
    Attack,
    Destroy,
    Effect,
    System,
}

impl LogCategory {
    /// Lowercase name, used as a structured log field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LogCategory::Buff => "buff",
            LogCategory::Attack => "attack",
            LogCategory::Destroy => "destroy",
            LogCategory::Effect => "effect",
            LogCategory::System => "system",
        }
    }
}

/// Sink for battle announcements.
pub trait Announcer {
    /// Record one announcement attributed to `player`.
    fn log(&mut self, message: &str, category: LogCategory, player: PlayerId);
}

/// Forwards announcements to `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAnnouncer;

impl Announcer for TracingAnnouncer {
    fn log(&mut self, message: &str, category: LogCategory, player: PlayerId) {
        tracing::info!(category = category.as_str(), player = player.0, "{}", message);
    }
}

/// One recorded announcement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub category: LogCategory,
    pub player: PlayerId,
}

/// In-memory announcement history.
///
/// ```
/// use digi_tcg::announce::{Announcer, BattleLog, LogCategory};
/// use digi_tcg::core::PlayerId;
///
/// let mut log = BattleLog::new();
/// log.log("Agumon attacks", LogCategory::Attack, PlayerId::ZERO);
///
/// assert_eq!(log.entries().len(), 1);
/// assert_eq!(log.count(LogCategory::Attack), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BattleLog {
    entries: Vec<LogEntry>,
}

impl BattleLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every announcement so far, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of announcements in a category.
    #[must_use]
    pub fn count(&self, category: LogCategory) -> usize {
        self.entries.iter().filter(|e| e.category == category).count()
    }

    /// Does any announcement contain `text`?
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(text))
    }

    /// Forget the history.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Announcer for BattleLog {
    fn log(&mut self, message: &str, category: LogCategory, player: PlayerId) {
        self.entries.push(LogEntry {
            message: message.to_string(),
            category,
            player,
        });
    }
}
