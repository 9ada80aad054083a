use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// The 52-card set in canonical order (hearts, diamonds, clubs, spades; 2 through A).
pub fn create_deck() -> Vec<Card> {
    full_deck()
}

/// Returns a uniformly shuffled copy of `deck`. The input is left untouched.
pub fn shuffle_deck<R: Rng + ?Sized>(deck: &[Card], rng: &mut R) -> Vec<Card> {
    let mut shuffled = deck.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Splits off the first `count` cards, returning `(dealt, remaining)`.
///
/// # Errors
///
/// [`GameError::DeckExhausted`] when `count` exceeds the cards left; the deck is never
/// silently short-dealt.
pub fn deal_cards(deck: &[Card], count: usize) -> Result<(Vec<Card>, Vec<Card>), GameError> {
    if count > deck.len() {
        return Err(GameError::DeckExhausted {
            requested: count,
            remaining: deck.len(),
        });
    }
    let (dealt, rest) = deck.split_at(count);
    Ok((dealt.to_vec(), rest.to_vec()))
}

/// Seeded deck for reproducible dealing outside of a table (CLI tools, tests).
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    rng: ChaCha20Rng,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        // Keep initial order until shuffle is called explicitly
        Self {
            cards: full_deck(),
            rng,
        }
    }

    pub fn shuffle(&mut self) {
        self.cards = shuffle_deck(&full_deck(), &mut self.rng);
    }

    pub fn deal(&mut self, count: usize) -> Result<Vec<Card>, GameError> {
        let (dealt, rest) = deal_cards(&self.cards, count)?;
        self.cards = rest;
        Ok(dealt)
    }

    pub fn reset(&mut self) {
        self.cards = full_deck();
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
