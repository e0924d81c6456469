use serde::Serialize;

use crate::{CardPos, PairKey};

/// One card of the board, its pair key and position never change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Card {
    pair_key: PairKey,
    position: CardPos,
    revealed: bool,
    matched: bool,
}

impl Card {
    pub(crate) const fn new(pair_key: PairKey, position: CardPos) -> Self {
        Self {
            pair_key,
            position,
            revealed: false,
            matched: false,
        }
    }

    pub const fn pair_key(&self) -> PairKey {
        self.pair_key
    }

    pub const fn position(&self) -> CardPos {
        self.position
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_matched(&self) -> bool {
        self.matched
    }

    /// Whether the player may flip this card.
    pub const fn is_selectable(&self) -> bool {
        !self.revealed && !self.matched
    }

    /// Whether the front face should be drawn.
    pub const fn face_shown(&self) -> bool {
        self.revealed || self.matched
    }

    pub(crate) fn reveal(&mut self) {
        self.revealed = true;
    }

    pub(crate) fn hide(&mut self) {
        self.revealed = false;
    }

    // matched cards stay face up for good
    pub(crate) fn mark_matched(&mut self) {
        self.revealed = true;
        self.matched = true;
    }
}
