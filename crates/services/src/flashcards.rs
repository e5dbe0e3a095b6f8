use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;

use study_core::model::Flashcard;

/// Flip-and-advance review over a material's flashcards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    order: Vec<usize>,
    position: usize,
    flipped: bool,
}

impl FlashcardDeck {
    #[must_use]
    pub fn new(cards: Vec<Flashcard>) -> Self {
        let order = (0..cards.len()).collect();
        Self {
            cards,
            order,
            position: 0,
            flipped: false,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn current(&self) -> Option<&Flashcard> {
        self.order
            .get(self.position)
            .and_then(|&index| self.cards.get(index))
    }

    /// 1-based position for "3 / 10" labels.
    #[must_use]
    pub fn position(&self) -> usize {
        if self.is_empty() { 0 } else { self.position + 1 }
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Move forward, wrapping to the first card.
    pub fn next(&mut self) {
        if !self.is_empty() {
            self.position = (self.position + 1) % self.order.len();
            self.flipped = false;
        }
    }

    /// Move back, wrapping to the last card.
    pub fn previous(&mut self) {
        if !self.is_empty() {
            self.position = self
                .position
                .checked_sub(1)
                .unwrap_or(self.order.len() - 1);
            self.flipped = false;
        }
    }

    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rng());
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order.shuffle(rng);
        self.position = 0;
        self.flipped = false;
    }
}
