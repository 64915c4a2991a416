#![cfg(test)]
//! Property suites over random self-play: the universal invariants hold
//! after every action, games terminate, and fingerprints respect logical
//! equality.

use proptest::prelude::*;
use rand::seq::SliceRandom;

use crate::domain::state::{BidValue, GameConfig, Phase, POSITIONS};
use crate::domain::test_support::{drive_random_game_with, rng};
use crate::services::fingerprint::{fingerprint, fingerprint_for};

fn short_config() -> GameConfig {
    GameConfig {
        winning_score: 20,
        ..GameConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// Every state reached by legal play passes the structural audit, bids
    /// rise strictly, trump presence tracks the phase, and cold seats stay
    /// out of the game.
    #[test]
    fn prop_random_games_preserve_invariants(seed in any::<u64>()) {
        let (steps, final_state) = drive_random_game_with(seed, short_config(), 5000);

        for step in &steps {
            let state = &step.before;
            prop_assert!(state.check_invariants().is_ok(),
                "invariants broken in phase {:?}: {:?}",
                state.phase, state.check_invariants());

            // Numeric bids within the hand rise strictly.
            let amounts: Vec<u8> = state.bids.iter().filter_map(|b| match b.value {
                BidValue::Amount(a) => Some(a),
                BidValue::Pass => None,
            }).collect();
            prop_assert!(amounts.windows(2).all(|w| w[0] < w[1]),
                "bids not strictly increasing: {amounts:?}");

            // Trump is set exactly from discarding through scoring.
            let trump_expected = matches!(state.phase,
                Phase::Discarding | Phase::SecondDeal | Phase::Playing | Phase::Scoring);
            if state.phase != Phase::Complete {
                prop_assert_eq!(state.trump.is_some(), trump_expected);
            }

            // Cold seats hold no trumps and their reveals are non-trumps.
            if let Some(trump) = state.trump {
                for position in POSITIONS {
                    let player = state.player(position);
                    if player.eliminated {
                        prop_assert!(!player.has_trump(trump));
                        prop_assert!(player.revealed.iter().all(|c| !c.is_trump(trump)));
                    }
                }
            }
        }

        prop_assert_eq!(final_state.phase, Phase::Complete);
        prop_assert!(final_state.winner.is_some());
        let champion = final_state.winner.unwrap();
        prop_assert!(final_state.scores.get(champion) >= final_state.config.winning_score);
    }

    /// Eliminated seats never act again within the hand.
    #[test]
    fn prop_cold_seats_never_play(seed in any::<u64>()) {
        let (steps, _) = drive_random_game_with(seed, short_config(), 5000);
        for step in &steps {
            prop_assert!(!step.before.player(step.seat).eliminated,
                "{:?} acted while eliminated", step.seat);
        }
    }

    /// Shuffling any hand (a logically unordered set) leaves both
    /// fingerprints unchanged; flipping the turn changes the seat key.
    #[test]
    fn prop_fingerprints_ignore_hand_order(seed in any::<u64>()) {
        let (steps, _) = drive_random_game_with(seed, short_config(), 5000);
        let mut shuffle_rng = rng(seed ^ 0xABCD);
        for step in steps.iter().step_by(11) {
            let state = &step.before;
            let mut permuted = state.clone();
            for position in POSITIONS {
                permuted.player_mut(position).hand.shuffle(&mut shuffle_rng);
            }
            permuted.deck.shuffle(&mut shuffle_rng);
            prop_assert_eq!(fingerprint(state), fingerprint(&permuted));
            for position in POSITIONS {
                prop_assert_eq!(
                    fingerprint_for(state, position),
                    fingerprint_for(&permuted, position)
                );
            }
        }
    }
}
