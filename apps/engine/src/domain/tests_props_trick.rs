#![cfg(test)]
//! Property-based tests for trick resolution, cross-checked against an
//! independent oracle.

use proptest::prelude::*;

use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::state::Position;
use crate::domain::test_gens;
use crate::domain::trick::Trick;

/// Independent winner oracle: rank every play, trumps above everything by
/// strength, non-trumps all equal; first maximum in play order wins.
fn oracle_winner(plays: &[(Position, Card)], trump: Suit) -> Position {
    let mut best = plays[0];
    let mut best_key = key(best.1, trump);
    for play in &plays[1..] {
        let k = key(play.1, trump);
        if k > best_key {
            best = *play;
            best_key = k;
        }
    }
    best.0
}

fn key(card: Card, trump: Suit) -> i32 {
    match card.trump_strength(trump) {
        Some(strength) => 100 + i32::from(strength),
        None => -1,
    }
}

fn build_trick(leader: Position, plays: &[(Position, Card)]) -> Trick {
    let mut trick = Trick::new(1, leader);
    for (seat, card) in plays {
        trick = trick.add_play(*seat, *card);
    }
    trick
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The domain winner must match the oracle for every complete trick.
    #[test]
    fn prop_winner_matches_oracle(
        (leader, plays) in test_gens::complete_trick(),
        trump in test_gens::suit(),
    ) {
        let trick = build_trick(leader, &plays);
        let winner = trick.resolve_winner(trump);
        prop_assert_eq!(winner, Ok(oracle_winner(&plays, trump)),
            "trump {:?}, plays {:?}", trump, &plays);
    }

    /// With no trump in the trick the lead stands; otherwise the winner's
    /// card must be a trump at least as strong as every trump played.
    #[test]
    fn prop_winner_is_strongest_trump_or_lead(
        (leader, plays) in test_gens::complete_trick(),
        trump in test_gens::suit(),
    ) {
        let trick = build_trick(leader, &plays);
        let winner = trick.resolve_winner(trump).unwrap();
        let winner_card = plays.iter().find(|(s, _)| *s == winner).unwrap().1;

        let trumps: Vec<Card> = plays
            .iter()
            .map(|(_, c)| *c)
            .filter(|c| c.is_trump(trump))
            .collect();
        if trumps.is_empty() {
            prop_assert_eq!(winner, plays[0].0, "lead must stand in a trumpless trick");
        } else {
            prop_assert!(winner_card.is_trump(trump));
            for c in &trumps {
                prop_assert!(winner_card.trump_strength(trump) >= c.trump_strength(trump));
            }
        }
    }

    /// The winner's share plus the withheld deuce point always equals the
    /// raw card points in the trick.
    #[test]
    fn prop_points_conserve_the_raw_sum(
        (leader, plays) in test_gens::complete_trick(),
        trump in test_gens::suit(),
    ) {
        let trick = build_trick(leader, &plays);
        let raw: u8 = plays.iter().map(|(_, c)| c.point_value(trump)).sum();
        prop_assert_eq!(trick.raw_points(trump), raw);

        let withheld = u8::from(plays
            .iter()
            .any(|(_, c)| c.rank == Rank::Two && c.suit == trump));
        prop_assert_eq!(trick.points(trump) + withheld, raw);
    }
}
