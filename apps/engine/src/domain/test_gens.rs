//! Proptest generators shared by the property suites.

use proptest::prelude::*;

use crate::domain::cards::{Card, Suit, RANKS, SUITS};
use crate::domain::state::{Position, POSITIONS};

pub fn suit() -> impl Strategy<Value = Suit> {
    prop::sample::select(SUITS.to_vec())
}

fn full_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(52);
    for s in SUITS {
        for r in RANKS {
            cards.push(Card::new(r, s));
        }
    }
    cards
}

/// A trick with four distinct cards played clockwise from a random leader.
pub fn complete_trick() -> impl Strategy<Value = (Position, Vec<(Position, Card)>)> {
    (
        prop::sample::subsequence(full_deck(), 4).prop_shuffle(),
        0..POSITIONS.len(),
    )
        .prop_map(|(cards, leader_idx)| {
            let leader = POSITIONS[leader_idx];
            let mut seat = leader;
            let mut plays = Vec::with_capacity(4);
            for card in cards {
                plays.push((seat, card));
                seat = seat.next();
            }
            (leader, plays)
        })
}
