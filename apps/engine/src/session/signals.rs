//! Lifecycle and telemetry signals a session broadcasts to subscribers.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::state::{Phase, Position, Team};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionSignal {
    /// An action was applied; carries the coarse facts subscribers key on.
    StateUpdated {
        game_id: Uuid,
        seat: Position,
        phase: Phase,
        hand_no: u8,
        turn: Option<Position>,
    },
    GameOver {
        game_id: Uuid,
        winner: Team,
    },
    // Telemetry signals, gated by `SessionOptions::telemetry`.
    SecondDealComplete {
        game_id: Uuid,
    },
    DealerPoolEstablished {
        game_id: Uuid,
        pool_size: u8,
    },
    PlayerWentCold {
        game_id: Uuid,
        position: Position,
    },
}
