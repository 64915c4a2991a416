//! Domain layer: pure game rules, state, and event-sourced mutation.

pub mod actions;
pub mod bidding;
pub mod cards;
pub mod dealing;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod events;
pub mod player_view;
pub mod playing;
pub mod scoring;
pub mod state;
pub mod trick;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_events;
#[cfg(test)]
mod tests_props_flow;
#[cfg(test)]
mod tests_props_trick;
#[cfg(test)]
mod tests_replay;

// Re-exports for ergonomics
pub use actions::Action;
pub use cards::{compare, Card, Rank, Suit, RANKS, SUITS};
pub use deck::Deck;
pub use engine::{apply_action, game_over, legal_actions, suggested_keep, winner};
pub use errors::{InvariantViolation, RuleError};
pub use events::{apply_event, replay, GameEvent};
pub use player_view::{view_for, view_for_spectator, view_full, GameView, SeatView};
pub use state::{
    BidRecord, BidValue, GameConfig, GameState, HighBid, Phase, Player, Position, RedealRecord,
    Team, TeamScores, PHASES, POSITIONS,
};
pub use trick::Trick;
