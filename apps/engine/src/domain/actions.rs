//! The action vocabulary players submit to the rules engine.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, Suit};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SelectDealer,
    Bid { amount: u8 },
    Pass,
    DeclareTrump { suit: Suit },
    /// Accepted vocabulary but never legal: discarding is auto-advanced.
    Discard { cards: Vec<Card> },
    /// The dealer's rob: keep exactly six cards from hand plus stock.
    SelectHand { cards: Vec<Card> },
    PlayCard { card: Card },
    Resign,
    /// Conservatively rejected until a concrete claim rule exists.
    ClaimRemaining,
}
