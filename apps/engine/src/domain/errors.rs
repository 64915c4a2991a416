//! Domain-level error types for rule enforcement and invariant auditing.
//!
//! `RuleError` is returned by the rules engine for every rejected action; it
//! never implies partial mutation. `InvariantViolation` signals a corrupted
//! state and is fatal for the owning session.

use thiserror::Error;

use crate::domain::state::{Phase, Position};

/// Rejection reasons for submitted actions. Each carries enough structure to
/// render a machine-readable code plus a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("not your turn (expected {expected:?}, got {got:?})")]
    NotYourTurn {
        expected: Option<Position>,
        got: Position,
    },
    #[error("action is not legal in the current state")]
    IllegalAction,
    #[error("invalid card: {detail}")]
    InvalidCard { detail: String },
    #[error("invalid bid {amount}: {detail}")]
    InvalidBid { amount: u8, detail: String },
    #[error("action not valid in phase {phase:?}")]
    WrongPhase { phase: Phase },
    #[error("only the highest bidder may declare trump")]
    BidderRequired,
    #[error("hand size violation: expected {expected} cards, got {got}")]
    HandSizeViolation { expected: usize, got: usize },
    #[error("trick has no plays")]
    IncompleteTrick,
    #[error("game is not over")]
    GameNotOver,
}

impl RuleError {
    pub fn invalid_card(detail: impl Into<String>) -> Self {
        Self::InvalidCard {
            detail: detail.into(),
        }
    }

    pub fn invalid_bid(amount: u8, detail: impl Into<String>) -> Self {
        Self::InvalidBid {
            amount,
            detail: detail.into(),
        }
    }

    /// Stable machine-readable code for transports and logs.
    pub fn code(&self) -> &'static str {
        match self {
            RuleError::NotYourTurn { .. } => "NOT_YOUR_TURN",
            RuleError::IllegalAction => "ILLEGAL_ACTION",
            RuleError::InvalidCard { .. } => "INVALID_CARD",
            RuleError::InvalidBid { .. } => "INVALID_BID",
            RuleError::WrongPhase { .. } => "WRONG_PHASE",
            RuleError::BidderRequired => "BIDDER_REQUIRED",
            RuleError::HandSizeViolation { .. } => "HAND_SIZE_VIOLATION",
            RuleError::IncompleteTrick => "INCOMPLETE_TRICK",
            RuleError::GameNotOver => "GAME_NOT_OVER",
        }
    }
}

/// A structural invariant of the game state failed. Treated as fatal by the
/// session runtime: the in-flight action is abandoned and the session shuts
/// down rather than continuing from a corrupted state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invariant violated: {detail}")]
pub struct InvariantViolation {
    pub detail: String,
}

impl InvariantViolation {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
