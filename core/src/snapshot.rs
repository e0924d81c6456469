use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a front end needs to draw a single card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub face_shown: bool,
    /// Found cards, front ends may hide or disable them instead of drawing the face.
    pub matched: bool,
    /// Only present while the face is shown.
    pub pair_key: Option<PairKey>,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        let face_shown = card.face_shown();
        Self {
            face_shown,
            matched: card.is_matched(),
            pair_key: face_shown.then(|| card.pair_key()),
        }
    }
}

/// Read-only projection of a session, the only state a front end should draw from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cards: Vec<CardView>,
    pub score: u32,
    pub game_over: bool,
    pub pairs_found: usize,
    pub total_pairs: usize,
}

impl Snapshot {
    pub fn from_controller(controller: &MatchController) -> Self {
        Self::from_board(controller.board(), controller.score(), controller.is_finished())
    }

    pub fn from_board(board: &Board, score: u32, game_over: bool) -> Self {
        Self {
            cards: board.cards().iter().map(CardView::from).collect(),
            score,
            game_over,
            pairs_found: board.matched_pairs(),
            total_pairs: board.total_pairs(),
        }
    }

    pub fn face_shown(&self, pos: CardPos) -> bool {
        self.cards.get(pos).is_some_and(|card| card.face_shown)
    }
}
