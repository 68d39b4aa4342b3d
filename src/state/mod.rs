mod session;

pub use session::{Session, SessionError, MIN_PLAYERS};

use crate::catalog::Catalog;
use crate::handoff::HandoffStore;
use crate::protocol::ServerMessage;
use crate::types::SessionView;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    /// Immutable for the process lifetime; built before the server binds.
    pub catalog: Arc<Catalog>,
    pub handoff: Arc<HandoffStore>,
    /// Broadcast channel pushing fresh session views to every connected client
    pub session_broadcast: broadcast::Sender<ServerMessage>,
}

impl AppState {
    pub fn new(catalog: Catalog, handoff: HandoffStore) -> Self {
        let default_category = catalog.default_category().unwrap_or("").to_string();
        let (tx, _rx) = broadcast::channel(100);
        Self {
            session: Arc::new(RwLock::new(Session::new(default_category))),
            catalog: Arc::new(catalog),
            handoff: Arc::new(handoff),
            session_broadcast: tx,
        }
    }

    /// Push the given view to all connected clients. Send errors mean no
    /// receivers are connected, which is fine.
    pub fn broadcast_session(&self, view: &SessionView) {
        let _ = self.session_broadcast.send(ServerMessage::Session {
            session: view.clone(),
            server_now: chrono::Utc::now().to_rfc3339(),
        });
    }
}
