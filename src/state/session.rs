//! Setup session state and the operations that mutate it.
//!
//! `Session` is the pure state-transition core: no locks, no I/O, fully
//! synchronous. The `impl AppState` block below wraps it with locking,
//! catalog/hand-off access, and client broadcasts.

use super::AppState;
use crate::catalog::Catalog;
use crate::handoff::HANDOFF_KEY;
use crate::types::{Mode, SessionSnapshot, SessionView};
use rand::Rng;

/// A round needs at least this many players.
pub const MIN_PLAYERS: usize = 3;

/// User-correctable failures. Reported to the client, state unchanged.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionError {
    #[error("need at least {MIN_PLAYERS} players to start (have {0})")]
    NotEnoughPlayers(usize),

    #[error("no words in category \"{0}\"")]
    EmptyCategory(String),

    #[error("player index {index} is out of range (have {len} players)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown category \"{0}\"")]
    UnknownCategory(String),
}

impl SessionError {
    /// Stable error code for the wire protocol.
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::NotEnoughPlayers(_) => "NOT_ENOUGH_PLAYERS",
            SessionError::EmptyCategory(_) => "EMPTY_CATEGORY",
            SessionError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            SessionError::UnknownCategory(_) => "UNKNOWN_CATEGORY",
        }
    }
}

/// Mutable state for one setup session.
///
/// Invariant: `1 <= imposters < max(1, player_count)` whenever players exist,
/// re-established by `validate_imposter_limit` after every player-list change.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub version: u64,
    pub player_names: Vec<String>,
    pub imposters: u32,
    pub mode: Mode,
    pub category: String,
    pub chosen_word: Option<String>,
}

impl Session {
    pub fn new(default_category: String) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            version: 1,
            player_names: Vec::new(),
            imposters: 1,
            mode: Mode::default(),
            category: default_category,
            chosen_word: None,
        }
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    /// Append a player name. Empty and whitespace-only names are ignored.
    /// Returns whether anything changed.
    pub fn add_player(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.player_names.push(name.to_string());
        self.validate_imposter_limit();
        self.bump();
        true
    }

    /// Remove the player at `index`. Out-of-range is an explicit error, not
    /// a silent no-op.
    pub fn remove_player(&mut self, index: usize) -> Result<String, SessionError> {
        if index >= self.player_names.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.player_names.len(),
            });
        }
        let removed = self.player_names.remove(index);
        self.validate_imposter_limit();
        self.bump();
        Ok(removed)
    }

    /// Propose `imposters + delta` and clamp it into the valid range:
    /// at least 1, strictly below the player count (1 when fewer than
    /// 2 players). Deterministic; a zero delta never changes anything.
    pub fn adjust_imposters(&mut self, delta: i64) {
        let players = self.player_names.len() as i64;
        let mut proposal = (i64::from(self.imposters) + delta).max(1);
        if proposal >= players {
            proposal = (players - 1).max(1);
        }
        if proposal != i64::from(self.imposters) {
            self.imposters = proposal as u32;
            self.bump();
        }
    }

    /// Draw a uniformly random imposter count from `[1, player_count - 1]`
    /// inclusive. No-op with fewer than 2 players.
    pub fn randomize_imposters(&mut self) {
        let players = self.player_names.len() as u32;
        if players < 2 {
            return;
        }
        self.imposters = rand::rng().random_range(1..=players - 1);
        self.bump();
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.bump();
    }

    pub fn set_category(&mut self, category: String) {
        self.category = category;
        self.bump();
    }

    /// Clamp-and-repair: keep the imposter count strictly below the player
    /// count whenever players exist.
    pub fn validate_imposter_limit(&mut self) {
        let players = self.player_names.len() as u32;
        if players > 0 && self.imposters >= players {
            self.imposters = (players - 1).max(1);
        }
    }

    /// Finalize the session: draw a random word from the active category and
    /// return the immutable snapshot for hand-off. Fails without touching
    /// state when there are too few players or the category has no words.
    pub fn start(&mut self, catalog: &Catalog) -> Result<SessionSnapshot, SessionError> {
        if self.player_names.len() < MIN_PLAYERS {
            return Err(SessionError::NotEnoughPlayers(self.player_names.len()));
        }

        let words = catalog
            .words_for(&self.category)
            .map_err(|_| SessionError::EmptyCategory(self.category.clone()))?;
        if words.is_empty() {
            return Err(SessionError::EmptyCategory(self.category.clone()));
        }

        let word = words[rand::rng().random_range(0..words.len())].clone();
        self.chosen_word = Some(word.clone());
        self.bump();

        Ok(SessionSnapshot {
            player_names: self.player_names.clone(),
            imposters: self.imposters,
            mode: self.mode,
            category: self.category.clone(),
            chosen_word: word,
        })
    }

    pub fn started(&self) -> bool {
        self.chosen_word.is_some()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id.clone(),
            version: self.version,
            player_names: self.player_names.clone(),
            imposters: self.imposters,
            mode: self.mode,
            category: self.category.clone(),
            started: self.started(),
        }
    }
}

impl AppState {
    /// Add a player. Returns the fresh view, or `None` when the name was
    /// rejected (empty/whitespace) and nothing changed.
    pub async fn add_player(&self, name: &str) -> Option<SessionView> {
        let view = {
            let mut session = self.session.write().await;
            if !session.add_player(name) {
                return None;
            }
            session.view()
        };
        self.broadcast_session(&view);
        Some(view)
    }

    pub async fn remove_player(&self, index: usize) -> Result<SessionView, SessionError> {
        let view = {
            let mut session = self.session.write().await;
            let removed = session.remove_player(index)?;
            tracing::debug!("removed player \"{}\" at index {}", removed, index);
            session.view()
        };
        self.broadcast_session(&view);
        Ok(view)
    }

    pub async fn adjust_imposters(&self, delta: i64) -> SessionView {
        let view = {
            let mut session = self.session.write().await;
            session.adjust_imposters(delta);
            session.view()
        };
        self.broadcast_session(&view);
        view
    }

    pub async fn randomize_imposters(&self) -> SessionView {
        let view = {
            let mut session = self.session.write().await;
            session.randomize_imposters();
            session.view()
        };
        self.broadcast_session(&view);
        view
    }

    pub async fn set_mode(&self, mode: Mode) -> SessionView {
        let view = {
            let mut session = self.session.write().await;
            session.set_mode(mode);
            session.view()
        };
        self.broadcast_session(&view);
        view
    }

    /// Set the active category. The key must exist in the catalog.
    pub async fn set_category(&self, category: String) -> Result<SessionView, SessionError> {
        if self.catalog.words_for(&category).is_err() {
            return Err(SessionError::UnknownCategory(category));
        }
        let view = {
            let mut session = self.session.write().await;
            session.set_category(category);
            session.view()
        };
        self.broadcast_session(&view);
        Ok(view)
    }

    /// Finalize the session and persist the snapshot to the hand-off store.
    pub async fn start_game(&self) -> Result<SessionSnapshot, SessionError> {
        let (snapshot, view) = {
            let mut session = self.session.write().await;
            let snapshot = session.start(&self.catalog)?;
            (snapshot, session.view())
        };

        if let Err(e) = self.handoff.put(HANDOFF_KEY, &snapshot).await {
            // The in-memory session is still finalized; the reveal screen
            // just cannot read the slot until the next successful start.
            tracing::error!("failed to persist hand-off snapshot: {}", e);
        }

        tracing::info!(
            players = snapshot.player_names.len(),
            imposters = snapshot.imposters,
            category = %snapshot.category,
            "session finalized"
        );
        self.broadcast_session(&view);
        Ok(snapshot)
    }

    /// Replace the current session with a fresh one.
    pub async fn reset_session(&self) -> SessionView {
        let view = {
            let mut session = self.session.write().await;
            let category = self
                .catalog
                .default_category()
                .unwrap_or(&session.category)
                .to_string();
            *session = Session::new(category);
            session.view()
        };
        tracing::info!(session_id = %view.id, "session reset");
        self.broadcast_session(&view);
        view
    }

    pub async fn session_view(&self) -> SessionView {
        self.session.read().await.view()
    }
}
