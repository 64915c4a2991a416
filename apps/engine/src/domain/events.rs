//! Event records and the replay fold.
//!
//! Every mutation of a game is expressed as an event; `apply_event` is the
//! only code that rewrites state. The rules engine validates and decides,
//! then folds the events it emits through here, so replaying a session's log
//! over `GameState::new_game()` reproduces the session state exactly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, Suit};
use crate::domain::deck::Deck;
use crate::domain::state::{
    BidRecord, BidValue, GameState, HighBid, Phase, Position, Team, TeamScores, RedealRecord,
};
use crate::domain::trick::Trick;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    DealerSelected {
        position: Position,
        cut_card: Card,
    },
    CardsDealt {
        hands: BTreeMap<Position, Vec<Card>>,
    },
    BidMade {
        position: Position,
        amount: u8,
    },
    PlayerPassed {
        position: Position,
    },
    BiddingComplete {
        position: Position,
        amount: u8,
    },
    TrumpDeclared {
        suit: Suit,
    },
    CardsDiscarded {
        position: Position,
        cards: Vec<Card>,
    },
    SecondDealComplete {
        hands: BTreeMap<Position, Vec<Card>>,
    },
    DealerRobbedPack {
        position: Position,
        received: Vec<Card>,
        kept: Vec<Card>,
    },
    CardPlayed {
        position: Position,
        card: Card,
    },
    TrickWon {
        position: Position,
        points: u8,
    },
    PlayerWentCold {
        position: Position,
        revealed: Vec<Card>,
    },
    HandScored {
        team: Team,
        points: i16,
    },
    GameWon {
        team: Team,
        final_score: i16,
    },
}

/// Pure, total fold step: returns the state after `event`, with the event
/// appended to the log. Unknown or inapplicable data is ignored rather than
/// panicking; emitting well-formed events is the rules engine's job.
pub fn apply_event(state: &GameState, event: &GameEvent) -> GameState {
    let mut next = state.clone();
    apply(&mut next, event);
    next.events.push(event.clone());
    next
}

/// Left-fold of `events` over `initial`.
pub fn replay(initial: &GameState, events: &[GameEvent]) -> GameState {
    events
        .iter()
        .fold(initial.clone(), |state, event| apply_event(&state, event))
}

fn apply(state: &mut GameState, event: &GameEvent) {
    match event {
        GameEvent::DealerSelected { position, .. } => {
            state.dealer = Some(*position);
            state.phase = Phase::Dealing;
        }

        GameEvent::CardsDealt { hands } => {
            if state.phase == Phase::Scoring {
                reset_for_next_hand(state);
            }
            let mut dealt: Vec<Card> = Vec::with_capacity(36);
            for (position, cards) in hands {
                let player = state.player_mut(*position);
                player.hand = cards.clone();
                player.hand.sort();
                dealt.extend_from_slice(cards);
            }
            // The stock is a set once dealt; keep it in canonical order so
            // replayed states are field-identical.
            let mut stock: Vec<Card> = Deck::ordered()
                .into_cards()
                .into_iter()
                .filter(|c| !dealt.contains(c))
                .collect();
            stock.sort();
            state.deck = stock;
            state.phase = Phase::Bidding;
            state.turn = state.dealer.map(|d| d.next());
            state.trick_no = 0;
        }

        GameEvent::BidMade { position, amount } => {
            state.bids.push(BidRecord {
                position: *position,
                value: BidValue::Amount(*amount),
                tick: state.events.len() as u32,
            });
            state.highest_bid = Some(HighBid {
                position: *position,
                amount: *amount,
            });
            state.turn = state.turn.map(|t| t.next());
        }

        GameEvent::PlayerPassed { position } => {
            state.bids.push(BidRecord {
                position: *position,
                value: BidValue::Pass,
                tick: state.events.len() as u32,
            });
            state.turn = state.turn.map(|t| t.next());
        }

        GameEvent::BiddingComplete { position, amount } => {
            state.highest_bid = Some(HighBid {
                position: *position,
                amount: *amount,
            });
            state.bidding_team = Some(position.team());
            state.turn = Some(*position);
            state.phase = Phase::Declaring;
        }

        GameEvent::TrumpDeclared { suit } => {
            state.trump = Some(*suit);
            state.phase = Phase::Discarding;
        }

        GameEvent::CardsDiscarded { position, cards } => {
            let player = state.player_mut(*position);
            player.hand.retain(|c| !cards.contains(c));
            if !cards.is_empty() {
                let pile = state.killed_cards.entry(*position).or_default();
                pile.extend_from_slice(cards);
                pile.sort();
            }
        }

        GameEvent::SecondDealComplete { hands } => {
            let mut received = BTreeMap::new();
            for (position, cards) in hands {
                state.deck.retain(|c| !cards.contains(c));
                let player = state.player_mut(*position);
                player.hand.extend_from_slice(cards);
                player.hand.sort();
                received.insert(*position, cards.len() as u8);
            }
            let pool_size = match state.dealer {
                Some(dealer) => state.player(dealer).hand.len() + state.deck.len(),
                None => state.deck.len(),
            };
            state.redeal = Some(RedealRecord {
                received,
                pool_size: pool_size as u8,
            });
            state.phase = Phase::SecondDeal;
            state.turn = state.dealer;
        }

        GameEvent::DealerRobbedPack { position, kept, .. } => {
            let mut pool = state.player(*position).hand.clone();
            pool.extend_from_slice(&state.deck);
            state.deck.clear();
            let mut hand = kept.clone();
            hand.sort();
            state.player_mut(*position).hand = hand;
            let mut buried: Vec<Card> = pool.into_iter().filter(|c| !kept.contains(c)).collect();
            buried.sort();
            state.discarded.extend(buried);

            let leader = state
                .highest_bid
                .map(|h| h.position)
                .unwrap_or(*position);
            state.trick_no = 1;
            state.turn = Some(leader);
            state.current_trick = Some(Trick::new(1, leader));
            state.phase = Phase::Playing;
        }

        GameEvent::CardPlayed { position, card } => {
            let player = state.player_mut(*position);
            if let Some(idx) = player.hand.iter().position(|c| c == card) {
                player.hand.remove(idx);
            }
            if let Some(trick) = state.current_trick.as_mut() {
                trick.plays.push((*position, *card));
            }
            state.turn = state.next_active(*position);
        }

        GameEvent::PlayerWentCold { position, revealed } => {
            let player = state.player_mut(*position);
            player.eliminated = true;
            player.hand.retain(|c| !revealed.contains(c));
            let mut shown = revealed.clone();
            shown.sort();
            player.revealed = shown;

            if state.turn == Some(*position) {
                state.turn = state.next_active(*position);
            }
            if let Some(trick) = state.current_trick.as_mut() {
                if trick.leader == *position && trick.plays.is_empty() {
                    if let Some(next) = state.turn {
                        trick.leader = next;
                    }
                }
            }
        }

        GameEvent::TrickWon { position, points } => {
            if let Some(mut trick) = state.current_trick.take() {
                trick.winner = Some(*position);
                trick.points = *points;
                if let Some(trump) = state.trump {
                    if let Some(holder) = trick.two_of_trump_player(trump) {
                        // The 2 of trump is kept by its player regardless of
                        // who takes the trick.
                        *state.hand_points.get_mut(holder.team()) += 1;
                    }
                }
                *state.hand_points.get_mut(position.team()) += i16::from(*points);
                state.player_mut(*position).tricks_won += 1;
                state.tricks.push(trick);
            }
            state.trick_no = state.trick_no.saturating_add(1);

            if state.any_active_trumps() {
                let leader = if !state.player(*position).eliminated {
                    *position
                } else {
                    state.next_active(*position).unwrap_or(*position)
                };
                state.turn = Some(leader);
                state.current_trick = Some(Trick::new(state.trick_no, leader));
            } else {
                state.turn = None;
                state.current_trick = None;
                state.phase = Phase::Scoring;
            }
        }

        GameEvent::HandScored { team, points } => {
            let slot = state.scores.get_mut(*team);
            *slot += *points;
            if !state.config.allow_negative_scores && *slot < 0 {
                *slot = 0;
            }
            state.phase = Phase::Scoring;
            state.turn = None;
            state.current_trick = None;
        }

        GameEvent::GameWon { team, .. } => {
            state.winner = Some(*team);
            state.phase = Phase::Complete;
            state.turn = None;
        }
    }
}

/// Clear per-hand fields, bump the hand counter and rotate the dealer; the
/// caller (a `CardsDealt` fold from `Scoring`) then installs the new hands.
fn reset_for_next_hand(state: &mut GameState) {
    state.hand_no = state.hand_no.saturating_add(1);
    state.dealer = state.dealer.map(|d| d.next());
    state.deck.clear();
    state.bids.clear();
    state.highest_bid = None;
    state.bidding_team = None;
    state.trump = None;
    state.tricks.clear();
    state.current_trick = None;
    state.trick_no = 0;
    state.hand_points = TeamScores::default();
    state.killed_cards.clear();
    state.discarded.clear();
    state.redeal = None;
    for player in &mut state.players {
        player.hand.clear();
        player.revealed.clear();
        player.eliminated = false;
        player.tricks_won = 0;
    }
}
