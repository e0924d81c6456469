use core::fmt;
use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Index of a card in the board's fixed sequence.
pub type CardPos = usize;

/// Point on the session clock, measured from an epoch chosen by the caller.
pub type Timestamp = Duration;

/// Points awarded for every confirmed pair.
pub const MATCH_AWARD: u32 = 10;

/// How long a revealed pair stays visible before it is resolved.
pub const DEFAULT_FLIP_DELAY: Duration = Duration::from_secs(1);

/// Largest number of distinct faces a deck can hold.
pub const MAX_PAIRS: usize = u16::MAX as usize + 1;

/// Identifier shared by the two cards of a pair.
///
/// This is the index of the face label in the deck it came from, it carries no
/// meaning outside of that deck.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey(u16);

impl PairKey {
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Key for the face at `index`, `None` when it does not fit the key range.
    pub fn from_index(index: usize) -> Option<Self> {
        u16::try_from(index).ok().map(Self)
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
