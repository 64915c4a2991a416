//! Stable content hashes over phase-relevant state.
//!
//! Fingerprints are xxh3 digests of a canonical byte string. Logically
//! unordered collections (hands, the stock, killed piles) are sorted before
//! hashing so permutations of them collide on purpose; ordered data (current
//! trick plays) is hashed verbatim. Hashes are stable within a process run
//! and are never persisted.

use xxhash_rust::xxh3::xxh3_64;

use crate::codec::binary::encode_card;
use crate::domain::cards::Card;
use crate::domain::state::{GameState, Position, POSITIONS};

fn push_sorted_cards(buf: &mut Vec<u8>, cards: &[Card]) {
    let mut bytes: Vec<u8> = cards.iter().map(|c| encode_card(*c)).collect();
    bytes.sort_unstable();
    buf.push(bytes.len() as u8);
    buf.extend_from_slice(&bytes);
}

fn push_position(buf: &mut Vec<u8>, position: Option<Position>) {
    buf.push(position.map_or(0, |p| p.index() as u8 + 1));
}

/// Full-state fingerprint over the canonical tuple: phase, hand number,
/// dealer, turn, trump, highest bid, per-seat sorted hand and eliminated
/// flag, sorted stock, cumulative scores, second-deal counts, dealer pool
/// size, and sorted killed piles.
pub fn fingerprint(state: &GameState) -> u64 {
    let mut buf: Vec<u8> = Vec::with_capacity(128);
    buf.push(state.phase.to_u8());
    buf.push(state.hand_no);
    push_position(&mut buf, state.dealer);
    push_position(&mut buf, state.turn);
    buf.push(state.trump.map_or(0, |s| s.index() as u8 + 1));
    match state.highest_bid {
        Some(high) => {
            buf.push(1);
            push_position(&mut buf, Some(high.position));
            buf.push(high.amount);
        }
        None => buf.push(0),
    }
    for position in POSITIONS {
        let player = state.player(position);
        buf.push(u8::from(player.eliminated));
        push_sorted_cards(&mut buf, &player.hand);
    }
    push_sorted_cards(&mut buf, &state.deck);
    buf.extend_from_slice(&state.scores.ns.to_be_bytes());
    buf.extend_from_slice(&state.scores.ew.to_be_bytes());
    match &state.redeal {
        Some(redeal) => {
            buf.push(1);
            buf.push(redeal.received.len() as u8);
            for (position, count) in &redeal.received {
                push_position(&mut buf, Some(*position));
                buf.push(*count);
            }
            buf.push(redeal.pool_size);
        }
        None => buf.push(0),
    }
    for position in POSITIONS {
        match state.killed_cards.get(&position) {
            Some(cards) => push_sorted_cards(&mut buf, cards),
            None => buf.push(0),
        }
    }
    xxh3_64(&buf)
}

/// Per-seat fingerprint keying the legal-action cache: the seat itself and
/// whether it is acting, the phase and trump, the seat's sorted hand and
/// killed pile, and the current-trick plays in order.
pub fn fingerprint_for(state: &GameState, seat: Position) -> u64 {
    let mut buf: Vec<u8> = Vec::with_capacity(64);
    buf.push(seat.index() as u8);
    buf.push(u8::from(state.turn == Some(seat)));
    buf.push(state.phase.to_u8());
    buf.push(state.trump.map_or(0, |s| s.index() as u8 + 1));
    push_sorted_cards(&mut buf, &state.player(seat).hand);
    match &state.current_trick {
        Some(trick) => {
            buf.push(1);
            buf.push(trick.plays.len() as u8);
            for (position, card) in &trick.plays {
                push_position(&mut buf, Some(*position));
                buf.push(encode_card(*card));
            }
        }
        None => buf.push(0),
    }
    match state.killed_cards.get(&seat) {
        Some(cards) => push_sorted_cards(&mut buf, cards),
        None => buf.push(0),
    }
    xxh3_64(&buf)
}
