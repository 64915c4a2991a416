//! Process-wide session directory: spawn, lookup, enumerate and terminate
//! sessions keyed by game id. Terminated sessions are pruned on access so
//! enumerators never hand out stale handles.

use dashmap::DashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::session::runtime::{SessionError, SessionHandle, SessionOptions};

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<Uuid, SessionHandle>,
}

impl SessionRegistry {
    pub fn new() -> SessionRegistry {
        SessionRegistry::default()
    }

    /// Spawn a session and register it under its game id. Spawning a second
    /// live session for the same id is a conflict.
    pub fn spawn_session(&self, opts: SessionOptions) -> Result<SessionHandle, SessionError> {
        let game_id = opts.game_id.unwrap_or_else(Uuid::new_v4);
        if let Some(existing) = self.sessions.get(&game_id) {
            if existing.is_terminated() {
                drop(existing);
                self.sessions.remove(&game_id);
            } else {
                warn!(%game_id, "duplicate session spawn rejected");
                return Err(SessionError::DuplicateGame { game_id });
            }
        }

        let handle = SessionHandle::start(SessionOptions {
            game_id: Some(game_id),
            ..opts
        });
        self.sessions.insert(game_id, handle.clone());
        info!(%game_id, sessions = self.sessions.len(), "session registered");
        Ok(handle)
    }

    /// Stop a session and drop it from the directory. Sessions are not
    /// restarted; a new spawn under the same id is a fresh game.
    pub async fn terminate_session(&self, game_id: Uuid) -> Result<(), SessionError> {
        match self.sessions.remove(&game_id) {
            Some((_, handle)) => {
                handle.shutdown().await;
                info!(%game_id, sessions = self.sessions.len(), "session deregistered");
                Ok(())
            }
            None => Err(SessionError::NotFound { game_id }),
        }
    }

    pub fn lookup(&self, game_id: Uuid) -> Result<SessionHandle, SessionError> {
        match self.sessions.get(&game_id) {
            Some(handle) if !handle.is_terminated() => Ok(handle.clone()),
            Some(handle) => {
                drop(handle);
                self.sessions.remove(&game_id);
                Err(SessionError::NotFound { game_id })
            }
            None => Err(SessionError::NotFound { game_id }),
        }
    }

    /// Snapshot of live sessions; dead entries are pruned on the way.
    pub fn list(&self) -> Vec<(Uuid, SessionHandle)> {
        self.sessions
            .retain(|_, handle| !handle.is_terminated());
        self.sessions
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sessions.retain(|_, handle| !handle.is_terminated());
        self.sessions.len()
    }
}
