use crate::types::{Mode, SessionSnapshot, SessionView};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Append a player name to the list. Blank names are ignored.
    AddPlayer {
        name: String,
    },
    /// Remove the player at `index`. Out-of-range indices are rejected.
    RemovePlayer {
        index: usize,
    },
    /// Nudge the imposter count up or down; the result is clamped into
    /// the valid range for the current player count.
    AdjustImposters {
        delta: i64,
    },
    /// Draw a random imposter count.
    RandomizeImposters,
    SetMode {
        mode: Mode,
    },
    SetCategory {
        category: String,
    },
    /// Finalize the session: draws the secret word and writes the
    /// hand-off snapshot.
    StartGame,
    /// Throw the current session away and begin a fresh one.
    ResetSession,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First message after connecting.
    Welcome {
        protocol: String,
        session: SessionView,
        /// Selectable categories in discovery order.
        categories: Vec<String>,
    },
    /// Broadcast after every session mutation.
    Session {
        session: SessionView,
        server_now: String,
    },
    /// Sent to the client that finalized the session. The reveal screen
    /// reads the same snapshot from the hand-off store.
    GameStarted {
        snapshot: SessionSnapshot,
    },
    Error {
        code: String,
        msg: String,
    },
}
