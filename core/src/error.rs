use thiserror::Error;

use crate::PairKey;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("No faces given")]
    NoFaces,
    #[error("Face at index {0} is a duplicate")]
    DuplicateFace(usize),
    #[error("Too many faces, at most {max} pairs fit on a board")]
    TooManyFaces { max: usize },
    #[error("Arrangement holds {actual} cards but the faces make {expected}")]
    InvalidArrangementLength { expected: usize, actual: usize },
    #[error("Pair key {0} has no face")]
    UnknownPairKey(PairKey),
    #[error("Pair key {key} is held by {count} cards instead of two")]
    UnbalancedPair { key: PairKey, count: usize },
}

pub type Result<T> = core::result::Result<T, GameError>;
