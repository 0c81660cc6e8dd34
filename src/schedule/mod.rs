//! Cooperative "resume after duration" continuations.
//!
//! Pacing delays (the end-of-turn banner, reveal pauses on a replica) are
//! modeled as items scheduled on a timeline and released when the owner
//! advances its clock. Nothing here sleeps; the caller decides how time
//! passes, so tests can step through a whole match instantly.

use std::time::Duration;

/// An item scheduled on the timeline along with its ready time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheduled<T> {
    pub item: T,
    pub ready_at: Duration,
    order: u64,
}

/// A timeline of pending continuations.
///
/// Items become due once the clock reaches their ready time. Items due at
/// the same time are released in the order they were scheduled.
///
/// ```
/// use std::time::Duration;
/// use digi_tcg::schedule::Scheduler;
///
/// let mut timeline = Scheduler::new();
/// timeline.schedule(Duration::from_millis(500), "banner");
/// timeline.schedule(Duration::from_millis(100), "flash");
///
/// assert_eq!(timeline.advance(Duration::from_millis(200)), vec!["flash"]);
/// assert_eq!(timeline.advance(Duration::from_millis(300)), vec!["banner"]);
/// assert!(timeline.is_idle());
/// ```
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    clock: Duration,
    pending: Vec<Scheduled<T>>,
    next_order: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            clock: Duration::ZERO,
            pending: Vec::new(),
            next_order: 0,
        }
    }
}

impl<T> Scheduler<T> {
    /// Create an empty timeline at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current timeline clock.
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Schedule `item` to become due `after` from now.
    pub fn schedule(&mut self, after: Duration, item: T) -> Duration {
        let ready_at = self.clock + after;
        self.pending.push(Scheduled {
            item,
            ready_at,
            order: self.next_order,
        });
        self.next_order += 1;
        ready_at
    }

    /// Advance the clock and release every item that became due.
    pub fn advance(&mut self, by: Duration) -> Vec<T> {
        self.clock += by;
        self.take_due()
    }

    /// Jump to the earliest pending ready time and release what is due there.
    pub fn advance_to_next(&mut self) -> Vec<T> {
        match self.next_ready_at() {
            Some(ready_at) => {
                self.clock = self.clock.max(ready_at);
                self.take_due()
            }
            None => Vec::new(),
        }
    }

    /// Earliest pending ready time.
    #[must_use]
    pub fn next_ready_at(&self) -> Option<Duration> {
        self.pending.iter().map(|s| s.ready_at).min()
    }

    /// Drop every pending item matching `predicate`. Returns how many were dropped.
    pub fn cancel(&mut self, predicate: impl Fn(&T) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|s| !predicate(&s.item));
        before - self.pending.len()
    }

    /// Is anything scheduled?
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending items in release order.
    pub fn pending(&self) -> impl Iterator<Item = &Scheduled<T>> {
        let mut sorted: Vec<&Scheduled<T>> = self.pending.iter().collect();
        sorted.sort_by_key(|s| (s.ready_at, s.order));
        sorted.into_iter()
    }

    fn take_due(&mut self) -> Vec<T> {
        let clock = self.clock;
        let (mut due, rest): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|s| s.ready_at <= clock);
        self.pending = rest;
        due.sort_by_key(|s| (s.ready_at, s.order));
        due.into_iter().map(|s| s.item).collect()
    }
}
