use rand::{seq::SliceRandom, thread_rng};

use crate::error::domain_error::DomainError;
use crate::error::Error;

/// The working, shuffled sequence of items the player guesses against during
/// a round. When a full pass through the source list is exhausted the deck
/// refills itself with a fresh shuffle, so a round can outlast the list.
#[derive(Clone, Debug)]
pub struct Deck {
    source: Vec<String>,
    working: Vec<String>,
}

impl Deck {
    pub fn new(source: Vec<String>) -> Result<Self, Error> {
        if source.is_empty() {
            return Err(Error::Domain(DomainError::EmptyWordList));
        }

        let mut deck = Deck {
            source,
            working: Vec::default(),
        };
        deck.reset();
        Ok(deck)
    }

    /// Replaces the working deck with a new random permutation of the source list.
    pub fn reset(&mut self) {
        self.working = self.source.clone();
        let mut rng = thread_rng();
        self.working.shuffle(&mut rng);
    }

    /// Removes and returns the item at the front of the deck, reshuffling a
    /// full pass back in first if the deck is exhausted.
    pub fn draw(&mut self) -> String {
        if self.working.is_empty() {
            log::info!(
                "Deck exhausted after a full pass, reshuffling. Words: '{}'.",
                self.source.len()
            );
            self.reset();
        }
        // The front of the deck is the tail of the working vector.
        self.working
            .pop()
            .expect("Missing word, the source list is never empty.")
    }

    pub fn remaining(&self) -> usize {
        self.working.len()
    }

    pub fn source_len(&self) -> usize {
        self.source.len()
    }
}
