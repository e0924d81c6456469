use super::*;

/// Uniformly random deal, reproducible from its seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomDeckGenerator {
    seed: u64,
}

impl RandomDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl DeckGenerator for RandomDeckGenerator {
    fn generate<S: AsRef<str>>(self, faces: &[S]) -> Result<Deck> {
        use rand::prelude::*;

        let mut deck = Deck::paired(faces)?;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        deck.arrangement_mut().shuffle(&mut rng);

        log::debug!(
            "Dealt {} cards for {} faces with seed {}",
            deck.len(),
            deck.pair_count(),
            self.seed
        );
        Ok(deck)
    }
}
