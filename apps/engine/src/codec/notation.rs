//! Short text notation for visible game state:
//! `phase/dealer/turn/trump/bid/scores/hand/tricks/redeal`.
//!
//! Example: `pl/N/E/h/N:10/NS:15:EW:8/h2/t3/-`. The decoder accepts both the
//! 8-field (pre-redeal) and 9-field forms. Hidden information (hands, stock,
//! buried discards) is never part of the notation; decoded snapshots carry
//! defaults for everything the string does not cover.

use std::collections::BTreeMap;

use crate::codec::CodecError;
use crate::domain::cards::{Card, Suit};
use crate::domain::state::{
    BidRecord, BidValue, GameState, HighBid, Phase, Position, RedealRecord,
};

fn position_field(position: Option<Position>) -> String {
    position.map_or_else(|| "-".to_string(), |p| p.to_char().to_string())
}

fn cards_field(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn notation_encode(state: &GameState) -> String {
    let trump = state
        .trump
        .map_or_else(|| "-".to_string(), |s| s.to_char().to_string());
    let bid = state.highest_bid.map_or_else(
        || "-".to_string(),
        |high| format!("{}:{}", high.position.to_char(), high.amount),
    );

    let mut segments: Vec<String> = Vec::new();
    if let Some(redeal) = &state.redeal {
        if !redeal.received.is_empty() {
            let parts: Vec<String> = redeal
                .received
                .iter()
                .map(|(p, count)| format!("{}:{}", p.to_char(), count))
                .collect();
            segments.push(format!("cr:{}", parts.join(",")));
        }
        segments.push(format!("dp:{}", redeal.pool_size));
    }
    if !state.killed_cards.is_empty() {
        let parts: Vec<String> = state
            .killed_cards
            .iter()
            .map(|(p, cards)| format!("{}:{}", p.to_char(), cards_field(cards)))
            .collect();
        segments.push(format!("kc:{}", parts.join("|")));
    }
    let redeal = if segments.is_empty() {
        "-".to_string()
    } else {
        segments.join(";")
    };

    format!(
        "{}/{}/{}/{}/{}/NS:{}:EW:{}/h{}/t{}/{}",
        state.phase.code(),
        position_field(state.dealer),
        position_field(state.turn),
        trump,
        bid,
        state.scores.ns,
        state.scores.ew,
        state.hand_no,
        state.trick_no,
        redeal,
    )
}

fn parse_position_field(field: &str, name: &str) -> Result<Option<Position>, CodecError> {
    if field == "-" {
        return Ok(None);
    }
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Position::from_char(ch)
            .map(Some)
            .ok_or_else(|| CodecError::notation(format!("bad {name} field: {field}"))),
        _ => Err(CodecError::notation(format!("bad {name} field: {field}"))),
    }
}

fn parse_seat_prefixed<'a>(part: &'a str, name: &str) -> Result<(Position, &'a str), CodecError> {
    let (seat, rest) = part
        .split_once(':')
        .ok_or_else(|| CodecError::notation(format!("bad {name} entry: {part}")))?;
    let mut chars = seat.chars();
    let position = match (chars.next(), chars.next()) {
        (Some(ch), None) => Position::from_char(ch),
        _ => None,
    }
    .ok_or_else(|| CodecError::notation(format!("bad seat in {name} entry: {part}")))?;
    Ok((position, rest))
}

fn parse_counted<T: std::str::FromStr>(text: &str, name: &str) -> Result<T, CodecError> {
    text.parse::<T>()
        .map_err(|_| CodecError::notation(format!("bad number in {name}: {text}")))
}

pub fn notation_decode(input: &str) -> Result<GameState, CodecError> {
    let fields: Vec<&str> = input.split('/').collect();
    if fields.len() != 8 && fields.len() != 9 {
        return Err(CodecError::notation(format!(
            "expected 8 or 9 fields, got {}",
            fields.len()
        )));
    }

    let mut state = GameState::new_game();

    state.phase = Phase::from_code(fields[0])
        .ok_or_else(|| CodecError::notation(format!("bad phase field: {}", fields[0])))?;
    state.dealer = parse_position_field(fields[1], "dealer")?;
    state.turn = parse_position_field(fields[2], "turn")?;

    state.trump = match fields[3] {
        "-" => None,
        field => {
            let mut chars = field.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Some(
                    Suit::from_char(ch)
                        .ok_or_else(|| CodecError::notation(format!("bad trump field: {field}")))?,
                ),
                _ => return Err(CodecError::notation(format!("bad trump field: {field}"))),
            }
        }
    };

    if fields[4] != "-" {
        let (position, amount) = parse_seat_prefixed(fields[4], "bid")?;
        let amount: u8 = parse_counted(amount, "bid")?;
        state.highest_bid = Some(HighBid { position, amount });
        state.bids.push(BidRecord {
            position,
            value: BidValue::Amount(amount),
            tick: 0,
        });
        if state.phase.to_u8() >= Phase::Declaring.to_u8() {
            state.bidding_team = Some(position.team());
        }
    }

    let score_parts: Vec<&str> = fields[5].split(':').collect();
    match score_parts.as_slice() {
        ["NS", ns, "EW", ew] => {
            state.scores.ns = parse_counted(ns, "scores")?;
            state.scores.ew = parse_counted(ew, "scores")?;
        }
        _ => {
            return Err(CodecError::notation(format!(
                "bad scores field: {}",
                fields[5]
            )))
        }
    }

    state.hand_no = match fields[6].strip_prefix('h') {
        Some(rest) => parse_counted(rest, "hand")?,
        None => return Err(CodecError::notation(format!("bad hand field: {}", fields[6]))),
    };
    state.trick_no = match fields[7].strip_prefix('t') {
        Some(rest) => parse_counted(rest, "tricks")?,
        None => {
            return Err(CodecError::notation(format!(
                "bad tricks field: {}",
                fields[7]
            )))
        }
    };

    if let Some(redeal_field) = fields.get(8) {
        if *redeal_field != "-" {
            let mut received: BTreeMap<Position, u8> = BTreeMap::new();
            let mut pool_size: Option<u8> = None;
            for segment in redeal_field.split(';') {
                let (prefix, rest) = segment
                    .split_once(':')
                    .ok_or_else(|| CodecError::notation(format!("bad redeal segment: {segment}")))?;
                match prefix {
                    "cr" => {
                        for part in rest.split(',') {
                            let (position, count) = parse_seat_prefixed(part, "cr")?;
                            received.insert(position, parse_counted(count, "cr")?);
                        }
                    }
                    "dp" => pool_size = Some(parse_counted(rest, "dp")?),
                    "kc" => {
                        for part in rest.split('|') {
                            let (position, card_list) = parse_seat_prefixed(part, "kc")?;
                            let mut cards = Vec::new();
                            for token in card_list.split(',') {
                                cards.push(token.parse::<Card>().map_err(|_| {
                                    CodecError::notation(format!("bad card in kc: {token}"))
                                })?);
                            }
                            state.killed_cards.insert(position, cards);
                        }
                    }
                    _ => {
                        return Err(CodecError::notation(format!(
                            "unknown redeal segment: {prefix}"
                        )))
                    }
                }
            }
            if !received.is_empty() || pool_size.is_some() {
                state.redeal = Some(RedealRecord {
                    received,
                    pool_size: pool_size.unwrap_or(0),
                });
            }
        }
    }

    Ok(state)
}
