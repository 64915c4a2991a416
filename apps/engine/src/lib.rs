#![cfg_attr(not(test), deny(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::todo, clippy::unimplemented))]

//! Deterministic engine for four-player partnership Pidro: rules, event log,
//! codecs, per-seat views, and a per-game session runtime.

pub mod codec;
pub mod domain;
pub mod services;
pub mod session;

// Re-exports for public API
pub use codec::{decode_state, encode_state, notation_decode, notation_encode, CodecError};
pub use domain::{
    apply_action, apply_event, game_over, legal_actions, replay, winner, Action, Card, GameConfig,
    GameEvent, GameState, InvariantViolation, Phase, Position, Rank, RuleError, Suit, Team,
};
pub use services::{fingerprint, fingerprint_for, CacheStats, LegalActionCache};
pub use session::{
    AppliedAction, SessionError, SessionHandle, SessionOptions, SessionRegistry, SessionSignal,
};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    engine_test_support::logging::init();
}
