//! Game session management for the HTTP server.
//!
//! Each session owns its [`GameSession`] and a [`GameController`] with its own
//! random source. Every entry has its own lock: requests against one session
//! are serialized, so a move is fully applied (computer replies included)
//! before the next is accepted, while other sessions stay available.

use derive_more::{Display, Error};
use megatoe_engine::{
    AiConfig, AiPlayer, Difficulty, GameController, GameMode, GameSession, MoveError, Variant,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// A session plus the controller that drives it.
#[derive(Debug)]
pub struct GameEntry {
    /// The game state.
    pub session: GameSession,
    /// Turn sequencing and AI.
    pub controller: GameController<StdRng>,
}

/// Errors from the session store.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// No session with this id.
    #[display("Session {} not found", id)]
    NotFound {
        /// The requested id.
        id: SessionId,
    },

    /// A session with this id already exists.
    #[display("Session {} already exists", id)]
    AlreadyExists {
        /// The requested id.
        id: SessionId,
    },

    /// A previous request panicked while holding a lock.
    #[display("Session store is unavailable")]
    LockPoisoned,

    /// The game rejected a move.
    #[display("{}", _0)]
    Move(MoveError),
}

impl From<MoveError> for SessionError {
    fn from(e: MoveError) -> Self {
        SessionError::Move(e)
    }
}

type SharedEntry = Arc<Mutex<GameEntry>>;

/// Manages all game sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, SharedEntry>>>,
    next_id: Arc<AtomicU64>,
    created: Arc<AtomicU64>,
    ai_config: AiConfig,
    seed: Option<u64>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(AiConfig::default())
    }
}

impl SessionManager {
    /// Creates an empty store whose AIs draw randomness from the OS.
    #[instrument]
    pub fn new(ai_config: AiConfig) -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            created: Arc::new(AtomicU64::new(1)),
            ai_config,
            seed: None,
        }
    }

    /// Seeds every session's AI from `seed` plus the creation count.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SharedEntry>>, SessionError> {
        self.sessions.lock().map_err(|_| {
            error!("Session store lock poisoned");
            SessionError::LockPoisoned
        })
    }

    fn controller(&self) -> GameController<StdRng> {
        let number = self.created.fetch_add(1, Ordering::Relaxed);
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(number)),
            None => StdRng::from_entropy(),
        };
        GameController::new(AiPlayer::with_config(self.ai_config, rng))
    }

    fn ensure_free(sessions: &HashMap<SessionId, SharedEntry>, id: &str) -> Result<(), SessionError> {
        if sessions.contains_key(id) {
            warn!(session_id = %id, "Session already exists");
            return Err(SessionError::AlreadyExists { id: id.to_string() });
        }
        Ok(())
    }

    /// Creates a session and plays any opening computer moves.
    ///
    /// Without an explicit id, ids are `game-1`, `game-2`, ..., skipping any
    /// a client already claimed. Opening moves are played before the store is
    /// locked.
    #[instrument(skip(self))]
    pub fn create(
        &self,
        id: Option<SessionId>,
        variant: Variant,
        mode: GameMode,
        difficulty: Difficulty,
    ) -> Result<SessionId, SessionError> {
        if let Some(id) = &id {
            Self::ensure_free(&*self.lock()?, id)?;
        }

        let mut entry = GameEntry {
            session: GameSession::new(variant, mode, difficulty),
            controller: self.controller(),
        };
        entry.controller.start(&mut entry.session)?;

        let mut sessions = self.lock()?;
        let id = match id {
            Some(id) => {
                Self::ensure_free(&sessions, &id)?;
                id
            }
            None => loop {
                let number = self.next_id.fetch_add(1, Ordering::Relaxed);
                let candidate = format!("game-{}", number);
                if !sessions.contains_key(&candidate) {
                    break candidate;
                }
                debug!(session_id = %candidate, "Generated id taken, skipping");
            },
        };

        info!(session_id = %id, %variant, %mode, %difficulty, "Session created");
        sessions.insert(id.clone(), Arc::new(Mutex::new(entry)));
        Ok(id)
    }

    /// Runs `f` against one session while holding only that session's lock.
    #[instrument(skip(self, f))]
    pub fn with_entry<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GameEntry) -> Result<T, MoveError>,
    ) -> Result<T, SessionError> {
        let shared = self
            .lock()?
            .get(id)
            .cloned()
            .ok_or_else(|| {
                warn!(session_id = id, "Session not found");
                SessionError::NotFound { id: id.to_string() }
            })?;

        let mut entry = shared.lock().map_err(|_| {
            error!(session_id = id, "Session lock poisoned");
            SessionError::LockPoisoned
        })?;
        let result = f(&mut *entry)?;
        debug!(session_id = id, status = %entry.session.status(), "Session updated");
        Ok(result)
    }

    /// Removes a session. A request already holding it finishes normally.
    #[instrument(skip(self))]
    pub fn remove(&self, id: &str) -> Result<(), SessionError> {
        let mut sessions = self.lock()?;
        match sessions.remove(id) {
            Some(_) => {
                info!(session_id = id, "Session removed");
                Ok(())
            }
            None => Err(SessionError::NotFound { id: id.to_string() }),
        }
    }

    /// Ids of all sessions, sorted.
    pub fn list(&self) -> Result<Vec<SessionId>, SessionError> {
        let sessions = self.lock()?;
        let mut ids: Vec<SessionId> = sessions.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
