#![no_std]

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::ops::Index;
use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use card::*;
pub use controller::*;
pub use error::*;
pub use generator::*;
pub use snapshot::*;
pub use types::*;

mod board;
mod card;
mod controller;
mod error;
mod generator;
mod snapshot;
mod types;

const DEFAULT_FACES: [&str; 6] = ["Sun", "Moon", "Star", "Leaf", "Wave", "Bell"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Distinct face labels, each one becomes a pair of cards.
    pub faces: Vec<String>,
    pub flip_delay_ms: u64,
}

impl GameConfig {
    pub fn new<I, S>(faces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            faces: faces.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_flip_delay(mut self, delay: Duration) -> Self {
        self.flip_delay_ms = delay.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn flip_delay(&self) -> Duration {
        Duration::from_millis(self.flip_delay_ms)
    }

    pub fn pair_count(&self) -> usize {
        self.faces.len()
    }

    pub fn validate(&self) -> Result<()> {
        validate_faces(&self.faces)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            faces: DEFAULT_FACES.iter().map(ToString::to_string).collect(),
            flip_delay_ms: DEFAULT_FLIP_DELAY.as_millis() as u64,
        }
    }
}

/// Checks that `faces` is non-empty, free of duplicates and fits the pair key range.
pub fn validate_faces<S: AsRef<str>>(faces: &[S]) -> Result<()> {
    if faces.is_empty() {
        return Err(GameError::NoFaces);
    }
    if faces.len() > MAX_PAIRS {
        return Err(GameError::TooManyFaces { max: MAX_PAIRS });
    }

    let mut seen = hashbrown::HashSet::with_capacity(faces.len());
    for (index, face) in faces.iter().enumerate() {
        if !seen.insert(face.as_ref()) {
            return Err(GameError::DuplicateFace(index));
        }
    }

    Ok(())
}

/// Hidden truth of a board: the face labels and which pair key sits at every position.
///
/// Deserializing goes through the same checks as [`Deck::from_arrangement`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDeck")]
pub struct Deck {
    faces: Vec<String>,
    arrangement: Vec<PairKey>,
}

impl Deck {
    /// Deck without cards, a board built from it is already complete.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Both cards of every face side by side, in face order.
    pub fn paired<S: AsRef<str>>(faces: &[S]) -> Result<Self> {
        validate_faces(faces)?;

        let arrangement = (0..faces.len())
            .filter_map(PairKey::from_index)
            .flat_map(|key| [key, key])
            .collect();

        Ok(Self {
            faces: faces.iter().map(|face| face.as_ref().to_string()).collect(),
            arrangement,
        })
    }

    /// Deck with an explicit card order, every key must appear exactly twice.
    pub fn from_arrangement<S: AsRef<str>>(faces: &[S], arrangement: &[PairKey]) -> Result<Self> {
        validate_faces(faces)?;

        let expected = faces.len() * 2;
        if arrangement.len() != expected {
            return Err(GameError::InvalidArrangementLength {
                expected,
                actual: arrangement.len(),
            });
        }

        let mut counts = alloc::vec![0usize; faces.len()];
        for &key in arrangement {
            let count = counts
                .get_mut(key.index())
                .ok_or(GameError::UnknownPairKey(key))?;
            *count += 1;
        }
        if let Some((index, &count)) = counts.iter().enumerate().find(|&(_, &count)| count != 2) {
            let key = PairKey::from_index(index).ok_or(GameError::TooManyFaces { max: MAX_PAIRS })?;
            return Err(GameError::UnbalancedPair { key, count });
        }

        Ok(Self {
            faces: faces.iter().map(|face| face.as_ref().to_string()).collect(),
            arrangement: arrangement.to_vec(),
        })
    }

    pub fn faces(&self) -> &[String] {
        &self.faces
    }

    pub fn arrangement(&self) -> &[PairKey] {
        &self.arrangement
    }

    pub fn face_label(&self, key: PairKey) -> Option<&str> {
        self.faces.get(key.index()).map(String::as_str)
    }

    pub fn pair_count(&self) -> usize {
        self.faces.len()
    }

    pub fn len(&self) -> usize {
        self.arrangement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrangement.is_empty()
    }

    pub(crate) fn arrangement_mut(&mut self) -> &mut [PairKey] {
        &mut self.arrangement
    }
}

#[derive(Deserialize)]
struct RawDeck {
    faces: Vec<String>,
    arrangement: Vec<PairKey>,
}

impl TryFrom<RawDeck> for Deck {
    type Error = GameError;

    fn try_from(raw: RawDeck) -> Result<Self> {
        if raw.faces.is_empty() && raw.arrangement.is_empty() {
            return Ok(Self::empty());
        }
        Self::from_arrangement(&raw.faces, &raw.arrangement)
    }
}

impl Index<CardPos> for Deck {
    type Output = PairKey;

    fn index(&self, pos: CardPos) -> &Self::Output {
        &self.arrangement[pos]
    }
}

/// Outcome of selecting a card
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The card could not be flipped, nothing changed.
    Ignored,
    /// First card of the turn is now face up.
    Revealed,
    /// Second card is face up, the pair waits for its resolution deadline.
    PairPending,
}

impl SelectOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::Ignored => false,
            Self::Revealed => true,
            Self::PairPending => true,
        }
    }
}

/// Outcome of advancing the clock
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    NoChange,
    Matched,
    Mismatched,
    /// The last pair was matched and the game is over.
    Won,
}

impl TickOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use TickOutcome::*;
        match self {
            NoChange => false,
            Matched => true,
            Mismatched => true,
            Won => true,
        }
    }

    pub const fn is_match(self) -> bool {
        matches!(self, Self::Matched | Self::Won)
    }
}
