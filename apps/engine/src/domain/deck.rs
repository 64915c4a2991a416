//! Deck construction, uniform shuffling and dealing.
//!
//! All randomness is drawn from an injected generator so the same seed plus
//! the same action sequence reproduces a game bit-exactly.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::cards::{Card, RANKS, SUITS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Full 52-card deck in stable order (suits H, D, C, S; ranks 2..A).
    pub fn ordered() -> Deck {
        let mut cards = Vec::with_capacity(52);
        for suit in SUITS {
            for rank in RANKS {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards }
    }

    /// Fresh 52-card deck shuffled with Fisher-Yates under the caller's RNG.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Deck {
        let mut deck = Deck::ordered();
        deck.cards.shuffle(rng);
        deck
    }

    pub fn from_cards(cards: Vec<Card>) -> Deck {
        Deck { cards }
    }

    /// Split off the first `n` cards (fewer if the deck runs short),
    /// returning the taken cards and the remaining deck.
    pub fn deal_batch(&self, n: usize) -> (Vec<Card>, Deck) {
        let take = n.min(self.cards.len());
        let taken = self.cards[..take].to_vec();
        let rest = Deck {
            cards: self.cards[take..].to_vec(),
        };
        (taken, rest)
    }

    /// Alias of [`Deck::deal_batch`] for call sites that read as draws.
    pub fn draw(&self, n: usize) -> (Vec<Card>, Deck) {
        self.deal_batch(n)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}
