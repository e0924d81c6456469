use crate::*;
pub use random::*;

mod random;

/// Strategy deciding the order in which paired faces are dealt onto the board.
pub trait DeckGenerator {
    fn generate<S: AsRef<str>>(self, faces: &[S]) -> Result<Deck>;
}
