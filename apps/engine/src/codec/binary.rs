//! Bit-exact binary codec for the canonical parts of a game state.
//!
//! Layout (MSB-first within each field, fields packed back to back):
//! phase:4, hand:8, dealer:3, turn:3, trump:3, has-bid:1 [pos:3 amount:4],
//! then per seat N,E,S,W: eliminated:1 + hand(count:8, cards 6 bits each),
//! then the stock as a hand encoding, then two signed 16-bit cumulative
//! scores (NS, EW). A card is (rank−2):4 then suit:2 with H=0 D=1 C=2 S=3.
//!
//! Fields outside the layout (event log, tricks, config, caches) decode to
//! their defaults; the codec round-trips losslessly over what it covers.

use crate::codec::CodecError;
use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::state::{
    BidRecord, BidValue, GameState, HighBid, Phase, Position, POSITIONS,
};

struct BitWriter {
    buf: Vec<u8>,
    used: usize,
}

impl BitWriter {
    fn new() -> BitWriter {
        BitWriter {
            buf: Vec::new(),
            used: 0,
        }
    }

    fn push(&mut self, value: u32, bits: usize) {
        for i in (0..bits).rev() {
            let bit = (value >> i) & 1;
            let byte_idx = self.used / 8;
            if byte_idx == self.buf.len() {
                self.buf.push(0);
            }
            if bit == 1 {
                self.buf[byte_idx] |= 1 << (7 - (self.used % 8));
            }
            self.used += 1;
        }
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

struct BitReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(buf: &'a [u8]) -> BitReader<'a> {
        BitReader { buf, pos: 0 }
    }

    fn take(&mut self, bits: usize, field: &'static str) -> Result<u32, CodecError> {
        let mut value = 0u32;
        for _ in 0..bits {
            let byte_idx = self.pos / 8;
            let byte = *self
                .buf
                .get(byte_idx)
                .ok_or(CodecError::InvalidBinary {
                    field,
                    offset: self.pos,
                })?;
            let bit = (byte >> (7 - (self.pos % 8))) & 1;
            value = (value << 1) | u32::from(bit);
            self.pos += 1;
        }
        Ok(value)
    }
}

fn position_code(position: Option<Position>) -> u32 {
    position.map_or(0, |p| p.index() as u32 + 1)
}

fn position_from_code(code: u32, field: &'static str, offset: usize) -> Result<Option<Position>, CodecError> {
    match code {
        0 => Ok(None),
        1..=4 => Ok(Position::from_index(code as usize - 1)),
        _ => Err(CodecError::InvalidBinary { field, offset }),
    }
}

fn suit_code(suit: Option<Suit>) -> u32 {
    suit.map_or(0, |s| s.index() as u32 + 1)
}

/// Pack a card into its 6-bit form.
pub fn encode_card(card: Card) -> u8 {
    (((card.rank.value() - 2) << 2) | card.suit.index() as u8) & 0x3F
}

/// Unpack a 6-bit card; rank values above 12 are invalid.
pub fn decode_card(bits: u8) -> Option<Card> {
    let rank = Rank::from_value((bits >> 2) + 2)?;
    let suit = Suit::from_index((bits & 0x03) as usize)?;
    Some(Card::new(rank, suit))
}

fn write_hand(writer: &mut BitWriter, cards: &[Card]) {
    writer.push(cards.len() as u32, 8);
    for card in cards {
        writer.push(u32::from(encode_card(*card)), 6);
    }
}

fn read_hand(reader: &mut BitReader<'_>, field: &'static str) -> Result<Vec<Card>, CodecError> {
    let count = reader.take(8, field)?;
    let mut cards = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let offset = reader.pos;
        let raw = reader.take(6, field)?;
        let card = decode_card(raw as u8).ok_or(CodecError::InvalidBinary { field, offset })?;
        cards.push(card);
    }
    Ok(cards)
}

pub fn encode_state(state: &GameState) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.push(u32::from(state.phase.to_u8()), 4);
    w.push(u32::from(state.hand_no), 8);
    w.push(position_code(state.dealer), 3);
    w.push(position_code(state.turn), 3);
    w.push(suit_code(state.trump), 3);
    match state.highest_bid {
        Some(high) => {
            w.push(1, 1);
            w.push(position_code(Some(high.position)), 3);
            w.push(u32::from(high.amount), 4);
        }
        None => w.push(0, 1),
    }
    for position in POSITIONS {
        let player = state.player(position);
        w.push(u32::from(player.eliminated), 1);
        write_hand(&mut w, &player.hand);
    }
    write_hand(&mut w, &state.deck);
    w.push(state.scores.ns as u16 as u32, 16);
    w.push(state.scores.ew as u16 as u32, 16);
    w.finish()
}

pub fn decode_state(bytes: &[u8]) -> Result<GameState, CodecError> {
    let mut r = BitReader::new(bytes);
    let mut state = GameState::new_game();

    let offset = r.pos;
    let phase = r.take(4, "phase")?;
    state.phase = Phase::from_u8(phase as u8).ok_or(CodecError::InvalidBinary {
        field: "phase",
        offset,
    })?;

    state.hand_no = r.take(8, "hand")? as u8;

    let offset = r.pos;
    state.dealer = position_from_code(r.take(3, "dealer")?, "dealer", offset)?;
    let offset = r.pos;
    state.turn = position_from_code(r.take(3, "turn")?, "turn", offset)?;

    let offset = r.pos;
    state.trump = match r.take(3, "trump")? {
        0 => None,
        code @ 1..=4 => Suit::from_index(code as usize - 1),
        _ => {
            return Err(CodecError::InvalidBinary {
                field: "trump",
                offset,
            })
        }
    };

    if r.take(1, "highest_bid")? == 1 {
        let offset = r.pos;
        let position = position_from_code(r.take(3, "highest_bid")?, "highest_bid", offset)?
            .ok_or(CodecError::InvalidBinary {
                field: "highest_bid",
                offset,
            })?;
        let offset = r.pos;
        let amount = r.take(4, "highest_bid")? as u8;
        if !(state.config.min_bid..=state.config.max_bid).contains(&amount) {
            return Err(CodecError::InvalidBinary {
                field: "highest_bid",
                offset,
            });
        }
        state.highest_bid = Some(HighBid { position, amount });
        // Keep the bid list consistent with the recorded high bid.
        state.bids.push(BidRecord {
            position,
            value: BidValue::Amount(amount),
            tick: 0,
        });
        if state.phase.to_u8() >= Phase::Declaring.to_u8() {
            state.bidding_team = Some(position.team());
        }
    }

    for position in POSITIONS {
        let eliminated = r.take(1, "eliminated")? == 1;
        let hand = read_hand(&mut r, "hand_cards")?;
        let player = state.player_mut(position);
        player.eliminated = eliminated;
        player.hand = hand;
    }

    state.deck = read_hand(&mut r, "deck")?;
    state.scores.ns = r.take(16, "scores_ns")? as u16 as i16;
    state.scores.ew = r.take(16, "scores_ew")? as u16 as i16;

    Ok(state)
}
