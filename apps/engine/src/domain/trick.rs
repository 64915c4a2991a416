//! A single trick: ordered plays, winner resolution, point accounting.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{self, Card, Rank, Suit};
use crate::domain::errors::RuleError;
use crate::domain::state::Position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    pub number: u8,
    pub leader: Position,
    pub plays: Vec<(Position, Card)>,
    pub winner: Option<Position>,
    /// Points the winner received (after the 2-of-trump deduction).
    pub points: u8,
}

impl Trick {
    pub fn new(number: u8, leader: Position) -> Trick {
        Trick {
            number,
            leader,
            plays: Vec::with_capacity(4),
            winner: None,
            points: 0,
        }
    }

    /// Append a play. Legality is the rules engine's concern, not the trick's.
    pub fn add_play(&self, position: Position, card: Card) -> Trick {
        let mut next = self.clone();
        next.plays.push((position, card));
        next
    }

    pub fn has_play(&self, position: Position) -> bool {
        self.plays.iter().any(|(p, _)| *p == position)
    }

    /// Four plays; tricks with eliminated seats resolve earlier and are
    /// completed by the rules engine, not by this predicate.
    pub fn is_complete(&self) -> bool {
        self.plays.len() == 4
    }

    /// Seat that played the highest card under the trump ranking. If no play
    /// is a trump, the first play wins (the lead stands among equals).
    pub fn resolve_winner(&self, trump: Suit) -> Result<Position, RuleError> {
        let first = self.plays.first().ok_or(RuleError::IncompleteTrick)?;
        if !self.plays.iter().any(|(_, c)| c.is_trump(trump)) {
            return Ok(first.0);
        }
        let mut best = *first;
        for play in &self.plays[1..] {
            if cards::compare(play.1, best.1, trump) == std::cmp::Ordering::Greater {
                best = *play;
            }
        }
        Ok(best.0)
    }

    /// Sum of point values played into this trick, before any deduction.
    pub fn raw_points(&self, trump: Suit) -> u8 {
        self.plays.iter().map(|(_, c)| c.point_value(trump)).sum()
    }

    /// Points the trick winner receives: the raw sum, minus one if the 2 of
    /// trump was played (its holder keeps that point; the rules engine
    /// credits it to the holder's team at resolution).
    pub fn points(&self, trump: Suit) -> u8 {
        let raw = self.raw_points(trump);
        if self.two_of_trump_player(trump).is_some() {
            raw.saturating_sub(1)
        } else {
            raw
        }
    }

    /// Seat that played the 2 of the trump suit into this trick, if any.
    pub fn two_of_trump_player(&self, trump: Suit) -> Option<Position> {
        self.plays
            .iter()
            .find(|(_, c)| c.rank == Rank::Two && c.suit == trump)
            .map(|(p, _)| *p)
    }
}
