//! Seats and per-seat data storage.
//!
//! ## PlayerId
//!
//! The game is strictly two-player: seats 0 and 1. Seat 0 is the
//! "zero-origin" owner of the memory gauge, so memory flowing toward seat 0
//! is positive and toward seat 1 is negative.
//!
//! ## PlayerMap
//!
//! Fixed two-slot storage indexed by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::error::InvalidSeat;

/// Number of seats in a match.
pub const PLAYER_COUNT: usize = 2;

/// Seat identifier (0 or 1).
///
/// Deserializing checks the range, so a seat read off the wire can always
/// index a `PlayerMap`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8")]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// The seat that moves first and owns the positive side of the gauge.
    pub const ZERO: PlayerId = PlayerId(0);
    /// The second seat.
    pub const ONE: PlayerId = PlayerId(1);

    /// Create a new player ID.
    ///
    /// Panics if `id` is not a valid seat.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!((id as usize) < PLAYER_COUNT, "Seat index out of range");
        Self(id)
    }

    /// Get the raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other seat.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Direction of memory flowing toward this seat: +1 for seat 0, -1 for seat 1.
    #[must_use]
    pub const fn memory_sign(self) -> i32 {
        if self.0 == 0 {
            1
        } else {
            -1
        }
    }

    /// Both seats in order.
    ///
    /// ```
    /// use digi_tcg::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all().collect();
    /// assert_eq!(seats, vec![PlayerId::ZERO, PlayerId::ONE]);
    /// ```
    pub fn all() -> impl Iterator<Item = PlayerId> {
        [PlayerId::ZERO, PlayerId::ONE].into_iter()
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = InvalidSeat;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        if (id as usize) < PLAYER_COUNT {
            Ok(Self(id))
        } else {
            Err(InvalidSeat(id))
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ```
/// use digi_tcg::core::{PlayerId, PlayerMap};
///
/// let mut trash: PlayerMap<Vec<u32>> = PlayerMap::with_default();
/// trash[PlayerId::ONE].push(7);
///
/// assert!(trash[PlayerId::ZERO].is_empty());
/// assert_eq!(trash[PlayerId::ONE], vec![7]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; PLAYER_COUNT],
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::ZERO), factory(PlayerId::ONE)],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a map with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::all().zip(self.data.iter())
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        PlayerId::all().zip(self.data.iter_mut())
    }
}

impl<T: Default> Default for PlayerMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
