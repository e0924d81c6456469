use alloc::vec::Vec;
use serde::Serialize;

use crate::{Card, CardPos, Deck, DeckGenerator, PairKey};

/// Cards of a session with their revealed and matched flags.
///
/// The board enforces the card rules but never decides when they apply, the
/// match controller is its only writer. Violating a mutation precondition is a
/// bug in the caller and panics.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board {
    deck: Deck,
    cards: Vec<Card>,
    matched_count: usize,
}

impl Board {
    pub fn new(deck: Deck) -> Self {
        let cards = deck
            .arrangement()
            .iter()
            .enumerate()
            .map(|(pos, &key)| Card::new(key, pos))
            .collect();
        Self {
            deck,
            cards,
            matched_count: 0,
        }
    }

    /// Pairs up `faces` and lets `generator` pick the card order.
    ///
    /// Empty or malformed face lists produce an empty board, which counts as
    /// already complete.
    pub fn build<S, G>(faces: &[S], generator: G) -> Self
    where
        S: AsRef<str>,
        G: DeckGenerator,
    {
        match generator.generate(faces) {
            Ok(deck) => Self::new(deck),
            Err(err) => {
                log::warn!("Cannot deal faces ({}), using an empty board", err);
                Self::new(Deck::empty())
            }
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn total_pairs(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_count / 2
    }

    pub fn card_at(&self, pos: CardPos) -> Option<&Card> {
        self.cards.get(pos)
    }

    pub fn pair_key_at(&self, pos: CardPos) -> Option<PairKey> {
        self.card_at(pos).map(Card::pair_key)
    }

    pub fn face_label(&self, key: PairKey) -> Option<&str> {
        self.deck.face_label(key)
    }

    /// Positions of both cards carrying `key`.
    pub fn positions_of(&self, key: PairKey) -> impl Iterator<Item = CardPos> + '_ {
        self.cards
            .iter()
            .filter(move |card| card.pair_key() == key)
            .map(Card::position)
    }

    pub fn is_selectable(&self, pos: CardPos) -> bool {
        self.card_at(pos).is_some_and(Card::is_selectable)
    }

    pub fn reveal(&mut self, pos: CardPos) {
        assert!(self.is_selectable(pos), "card {} cannot be revealed", pos);
        self.cards[pos].reveal();
    }

    pub fn confirm_match(&mut self, a: CardPos, b: CardPos) {
        assert_ne!(a, b, "a card cannot match itself");
        let (key_a, key_b) = (self.card(a).pair_key(), self.card(b).pair_key());
        assert_eq!(key_a, key_b, "cards {} and {} are not a pair", a, b);
        assert!(
            !self.cards[a].is_matched() && !self.cards[b].is_matched(),
            "pair {} is already matched",
            key_a
        );

        self.cards[a].mark_matched();
        self.cards[b].mark_matched();
        self.matched_count += 2;
    }

    pub fn reset_pair(&mut self, a: CardPos, b: CardPos) {
        assert!(
            !self.card(a).is_matched() && !self.card(b).is_matched(),
            "matched cards {} and {} cannot be hidden again",
            a,
            b
        );

        self.cards[a].hide();
        self.cards[b].hide();
    }

    /// Whether every card is matched, vacuously true for an empty board.
    pub fn all_matched(&self) -> bool {
        self.matched_count == self.cards.len()
    }

    fn card(&self, pos: CardPos) -> &Card {
        match self.cards.get(pos) {
            Some(card) => card,
            None => panic!("position {} is outside a board of {} cards", pos, self.cards.len()),
        }
    }
}
