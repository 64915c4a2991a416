//! Card primitives: suits, ranks, trump classification and ranking.
//!
//! The trump suit owns fourteen cards: its own thirteen plus the five of the
//! same-color suit (the "wrong 5"), which slots between the right 5 and the 4.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::errors::RuleError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

pub const SUITS: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

impl Suit {
    /// The suit sharing this suit's color: H↔D, C↔S.
    pub fn same_color(self) -> Suit {
        match self {
            Suit::Hearts => Suit::Diamonds,
            Suit::Diamonds => Suit::Hearts,
            Suit::Clubs => Suit::Spades,
            Suit::Spades => Suit::Clubs,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Suit::Hearts => 0,
            Suit::Diamonds => 1,
            Suit::Clubs => 2,
            Suit::Spades => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<Suit> {
        SUITS.get(idx).copied()
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
            Suit::Spades => 's',
        }
    }

    pub fn from_char(ch: char) -> Option<Suit> {
        match ch.to_ascii_lowercase() {
            'h' => Some(Suit::Hearts),
            'd' => Some(Suit::Diamonds),
            'c' => Some(Suit::Clubs),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }
}

impl Serialize for Suit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_char().to_string())
    }
}

impl<'de> Deserialize<'de> for Suit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Suit::from_char(ch)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid suit token: {s}"))),
            _ => Err(serde::de::Error::custom(format!("invalid suit token: {s}"))),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

pub const RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

impl Rank {
    /// Numeric value 2..=14 (J=11, Q=12, K=13, A=14).
    pub fn value(self) -> u8 {
        self as u8 + 2
    }

    pub fn from_value(value: u8) -> Option<Rank> {
        if (2..=14).contains(&value) {
            RANKS.get((value - 2) as usize).copied()
        } else {
            None
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn from_char(ch: char) -> Option<Rank> {
        match ch.to_ascii_uppercase() {
            '2' => Some(Rank::Two),
            '3' => Some(Rank::Three),
            '4' => Some(Rank::Four),
            '5' => Some(Rank::Five),
            '6' => Some(Rank::Six),
            '7' => Some(Rank::Seven),
            '8' => Some(Rank::Eight),
            '9' => Some(Rank::Nine),
            'T' => Some(Rank::Ten),
            'J' => Some(Rank::Jack),
            'Q' => Some(Rank::Queen),
            'K' => Some(Rank::King),
            'A' => Some(Rank::Ace),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

// Note: Ord/Eq on Card is only for stable sorting: suit order H<D<C<S then rank order.
// Do not use for trick resolution or comparisons involving trump.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.suit.cmp(&other.suit) {
            std::cmp::Ordering::Equal => self.rank.cmp(&other.rank),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    /// Fallible constructor from a raw rank value.
    pub fn from_parts(rank_value: u8, suit: Suit) -> Result<Card, RuleError> {
        let rank = Rank::from_value(rank_value)
            .ok_or_else(|| RuleError::invalid_card(format!("rank {rank_value} out of 2..=14")))?;
        Ok(Card { rank, suit })
    }

    /// True iff the card belongs to the trump suit, including the wrong 5
    /// (the 5 of the same-color suit).
    pub fn is_trump(self, trump: Suit) -> bool {
        self.suit == trump || (self.rank == Rank::Five && self.suit == trump.same_color())
    }

    /// Strength of a trump card, 0 (two) to 13 (ace). `None` for non-trumps.
    ///
    /// The wrong 5 sits between the right 5 and the 4:
    /// A K Q J T 9 8 7 6 right-5 wrong-5 4 3 2.
    pub fn trump_strength(self, trump: Suit) -> Option<u8> {
        if !self.is_trump(trump) {
            return None;
        }
        Some(match (self.rank, self.suit == trump) {
            (Rank::Two, _) => 0,
            (Rank::Three, _) => 1,
            (Rank::Four, _) => 2,
            (Rank::Five, false) => 3, // wrong 5
            (Rank::Five, true) => 4,  // right 5
            (Rank::Six, _) => 5,
            (Rank::Seven, _) => 6,
            (Rank::Eight, _) => 7,
            (Rank::Nine, _) => 8,
            (Rank::Ten, _) => 9,
            (Rank::Jack, _) => 10,
            (Rank::Queen, _) => 11,
            (Rank::King, _) => 12,
            (Rank::Ace, _) => 13,
        })
    }

    /// Point value under the declared trump: A/J/T/2 of trump are worth 1,
    /// both fives are worth 5, everything else 0. 14 points per hand total.
    pub fn point_value(self, trump: Suit) -> u8 {
        if !self.is_trump(trump) {
            return 0;
        }
        match self.rank {
            Rank::Five => 5,
            Rank::Ace | Rank::Jack | Rank::Ten | Rank::Two => 1,
            _ => 0,
        }
    }
}

/// Total order over cards under a declared trump. Any trump outranks any
/// non-trump; trumps compare by strength; non-trumps fall back to the stable
/// card order so the result is still total and self-consistent.
pub fn compare(a: Card, b: Card, trump: Suit) -> std::cmp::Ordering {
    match (a.trump_strength(trump), b.trump_strength(trump)) {
        (Some(sa), Some(sb)) => sa.cmp(&sb),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => a.cmp(&b),
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

impl FromStr for Card {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(su), None) => {
                let rank = Rank::from_char(r)
                    .ok_or_else(|| RuleError::invalid_card(format!("bad rank in token: {s}")))?;
                let suit = Suit::from_char(su)
                    .ok_or_else(|| RuleError::invalid_card(format!("bad suit in token: {s}")))?;
                Ok(Card { rank, suit })
            }
            _ => Err(RuleError::invalid_card(format!("bad card token: {s}"))),
        }
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Card>()
            .map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

#[cfg(test)]
pub fn parse_cards(tokens: &[&str]) -> Vec<Card> {
    tokens
        .iter()
        .map(|s| s.parse::<Card>().expect("valid card token"))
        .collect()
}
