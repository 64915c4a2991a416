//! Per-game session runtime: a single serializer task owns the state and
//! services requests in arrival order.
//!
//! Callers hold a cloneable [`SessionHandle`] and speak request/response over
//! an mpsc inbox with oneshot replies. The task never suspends between
//! receiving a request and committing its result, so `apply_action` is atomic
//! from the callers' perspective, auto-advances included. Replies carry
//! snapshots; the state itself never leaves the task.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::domain::actions::Action;
use crate::domain::engine;
use crate::domain::errors::{InvariantViolation, RuleError};
use crate::domain::events::GameEvent;
use crate::domain::state::{GameState, Position, Team};
use crate::services::fingerprint::fingerprint_for;
use crate::services::legal_cache::{CacheStats, LegalActionCache};
use crate::session::signals::SessionSignal;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error("no session for game {game_id}")]
    NotFound { game_id: Uuid },
    #[error("a session already exists for game {game_id}")]
    DuplicateGame { game_id: Uuid },
    #[error("session for game {game_id} has terminated")]
    Terminated { game_id: Uuid },
    #[error("request to game {game_id} timed out")]
    Timeout { game_id: Uuid },
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub game_id: Option<Uuid>,
    /// Seed for the session RNG; the same seed and action sequence reproduce
    /// the game bit-exactly.
    pub seed: Option<u64>,
    pub initial_state: Option<GameState>,
    /// Emit telemetry signals alongside lifecycle ones.
    pub telemetry: bool,
    /// Upper bound a caller waits for any reply; the session still finishes
    /// the in-flight request when the caller gives up.
    pub request_timeout: Duration,
    pub signal_capacity: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            game_id: None,
            seed: None,
            initial_state: None,
            telemetry: true,
            request_timeout: Duration::from_secs(5),
            signal_capacity: 64,
        }
    }
}

/// Successful `apply_action` reply: the committed state snapshot plus the
/// events this action emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedAction {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

enum Request {
    Apply {
        seat: Position,
        action: Action,
        reply: oneshot::Sender<Result<AppliedAction, SessionError>>,
    },
    State {
        reply: oneshot::Sender<GameState>,
    },
    Legal {
        seat: Position,
        reply: oneshot::Sender<Vec<Action>>,
    },
    Over {
        reply: oneshot::Sender<bool>,
    },
    Winner {
        reply: oneshot::Sender<Result<Team, SessionError>>,
    },
    History {
        reply: oneshot::Sender<Vec<GameEvent>>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    CacheStats {
        reply: oneshot::Sender<CacheStats>,
    },
    Shutdown,
}

#[derive(Clone, Debug)]
pub struct SessionHandle {
    game_id: Uuid,
    tx: mpsc::Sender<Request>,
    signals: broadcast::Sender<SessionSignal>,
    request_timeout: Duration,
}

impl SessionHandle {
    /// Spawn the session task and return its handle.
    pub fn start(opts: SessionOptions) -> SessionHandle {
        let game_id = opts.game_id.unwrap_or_else(Uuid::new_v4);
        let seed = opts.seed.unwrap_or_else(rand::random);
        let state = opts.initial_state.unwrap_or_else(GameState::new_game);
        let (tx, rx) = mpsc::channel(64);
        let (signals, _) = broadcast::channel(opts.signal_capacity.max(1));

        let worker = SessionWorker {
            game_id,
            state,
            rng: ChaCha20Rng::seed_from_u64(seed),
            cache: LegalActionCache::new(),
            signals: signals.clone(),
            telemetry: opts.telemetry,
            rx,
        };
        tokio::spawn(worker.run());
        info!(%game_id, seed, "session started");

        SessionHandle {
            game_id,
            tx,
            signals,
            request_timeout: opts.request_timeout,
        }
    }

    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    /// True once the serializer task has stopped accepting requests.
    pub fn is_terminated(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionSignal> {
        self.signals.subscribe()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Request,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| SessionError::Terminated {
                game_id: self.game_id,
            })?;
        match tokio::time::timeout(self.request_timeout, reply_rx).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(SessionError::Terminated {
                game_id: self.game_id,
            }),
            Err(_) => Err(SessionError::Timeout {
                game_id: self.game_id,
            }),
        }
    }

    pub async fn apply_action(
        &self,
        seat: Position,
        action: Action,
    ) -> Result<AppliedAction, SessionError> {
        self.request(|reply| Request::Apply {
            seat,
            action,
            reply,
        })
        .await?
    }

    pub async fn state(&self) -> Result<GameState, SessionError> {
        self.request(|reply| Request::State { reply }).await
    }

    pub async fn legal_actions(&self, seat: Position) -> Result<Vec<Action>, SessionError> {
        self.request(|reply| Request::Legal { seat, reply }).await
    }

    pub async fn game_over(&self) -> Result<bool, SessionError> {
        self.request(|reply| Request::Over { reply }).await
    }

    pub async fn winner(&self) -> Result<Team, SessionError> {
        self.request(|reply| Request::Winner { reply }).await?
    }

    pub async fn history(&self) -> Result<Vec<GameEvent>, SessionError> {
        self.request(|reply| Request::History { reply }).await
    }

    /// Replace the state with a fresh `new_game()`.
    pub async fn reset(&self) -> Result<(), SessionError> {
        self.request(|reply| Request::Reset { reply }).await
    }

    pub async fn cache_stats(&self) -> Result<CacheStats, SessionError> {
        self.request(|reply| Request::CacheStats { reply }).await
    }

    /// Ask the serializer task to stop after the requests already queued.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(Request::Shutdown).await;
    }
}

struct SessionWorker {
    game_id: Uuid,
    state: GameState,
    rng: ChaCha20Rng,
    cache: LegalActionCache,
    signals: broadcast::Sender<SessionSignal>,
    telemetry: bool,
    rx: mpsc::Receiver<Request>,
}

impl SessionWorker {
    async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            match request {
                Request::Apply {
                    seat,
                    action,
                    reply,
                } => {
                    if self.handle_apply(seat, action, reply) {
                        break;
                    }
                }
                Request::State { reply } => {
                    let _ = reply.send(self.state.clone());
                }
                Request::Legal { seat, reply } => {
                    let key = fingerprint_for(&self.state, seat);
                    let actions = match self.cache.lookup(key) {
                        Some(actions) => actions,
                        None => {
                            let computed = engine::legal_actions(&self.state, seat);
                            self.cache.insert(key, computed.clone());
                            computed
                        }
                    };
                    let _ = reply.send(actions);
                }
                Request::Over { reply } => {
                    let _ = reply.send(engine::game_over(&self.state));
                }
                Request::Winner { reply } => {
                    let _ = reply.send(engine::winner(&self.state).map_err(SessionError::from));
                }
                Request::History { reply } => {
                    let _ = reply.send(self.state.events.clone());
                }
                Request::Reset { reply } => {
                    self.state = GameState::new_game();
                    self.cache.invalidate();
                    let _ = reply.send(());
                }
                Request::CacheStats { reply } => {
                    let _ = reply.send(self.cache.stats());
                }
                Request::Shutdown => break,
            }
        }
        info!(game_id = %self.game_id, "session terminated");
    }

    /// Returns true when the session must terminate (invariant violation).
    fn handle_apply(
        &mut self,
        seat: Position,
        action: Action,
        reply: oneshot::Sender<Result<AppliedAction, SessionError>>,
    ) -> bool {
        match engine::apply_action(&self.state, seat, action.clone(), &mut self.rng) {
            Ok((state, events)) => {
                if cfg!(debug_assertions) {
                    if let Err(violation) = state.check_invariants() {
                        error!(
                            game_id = %self.game_id,
                            ?seat,
                            ?action,
                            error = %violation,
                            "invariant violation, terminating session"
                        );
                        let _ = reply.send(Err(SessionError::Invariant(violation)));
                        return true;
                    }
                }
                self.state = state;
                self.cache.invalidate();
                debug!(
                    game_id = %self.game_id,
                    ?seat,
                    phase = ?self.state.phase,
                    events = events.len(),
                    "action applied"
                );
                self.announce(seat, &events);
                let _ = reply.send(Ok(AppliedAction {
                    state: self.state.clone(),
                    events,
                }));
                false
            }
            Err(rule) => {
                debug!(
                    game_id = %self.game_id,
                    ?seat,
                    ?action,
                    code = rule.code(),
                    "action rejected"
                );
                let _ = reply.send(Err(SessionError::Rule(rule)));
                false
            }
        }
    }

    fn announce(&self, seat: Position, events: &[GameEvent]) {
        let _ = self.signals.send(SessionSignal::StateUpdated {
            game_id: self.game_id,
            seat,
            phase: self.state.phase,
            hand_no: self.state.hand_no,
            turn: self.state.turn,
        });

        for event in events {
            match event {
                GameEvent::GameWon { team, .. } => {
                    let _ = self.signals.send(SessionSignal::GameOver {
                        game_id: self.game_id,
                        winner: *team,
                    });
                }
                GameEvent::SecondDealComplete { .. } if self.telemetry => {
                    let _ = self.signals.send(SessionSignal::SecondDealComplete {
                        game_id: self.game_id,
                    });
                    if let Some(redeal) = &self.state.redeal {
                        let _ = self.signals.send(SessionSignal::DealerPoolEstablished {
                            game_id: self.game_id,
                            pool_size: redeal.pool_size,
                        });
                    }
                }
                GameEvent::PlayerWentCold { position, .. } if self.telemetry => {
                    let _ = self.signals.send(SessionSignal::PlayerWentCold {
                        game_id: self.game_id,
                        position: *position,
                    });
                }
                _ => {}
            }
        }
    }
}
