use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::{AppState, SessionError};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut broadcast_rx = state.session_broadcast.subscribe();

    tracing::info!("WebSocket client connected");

    let welcome = ServerMessage::Welcome {
        protocol: "1.0".to_string(),
        session: state.session_view().await,
        categories: state.catalog.categories().map(String::from).collect(),
    };

    if let Ok(msg) = serde_json::to_string(&welcome) {
        if sender.send(Message::Text(msg.into())).await.is_err() {
            tracing::error!("Failed to send welcome message");
            return;
        }
    }

    loop {
        tokio::select! {
            // Session updates from any client, pushed to this one
            broadcast = broadcast_rx.recv() => {
                match broadcast {
                    Ok(server_msg) => {
                        if let Ok(text) = serde_json::to_string(&server_msg) {
                            if sender.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("client lagged {} broadcasts behind, resyncing", n);
                        let resync = ServerMessage::Session {
                            session: state.session_view().await,
                            server_now: chrono::Utc::now().to_rfc3339(),
                        };
                        if let Ok(text) = serde_json::to_string(&resync) {
                            if sender.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }

            // Messages from this client
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received message: {}", text);
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                if let Some(response) = handle_message(client_msg, &state).await {
                                    if let Ok(json) = serde_json::to_string(&response) {
                                        if sender.send(Message::Text(json.into())).await.is_err() {
                                            break;
                                        }
                                    }
                                }
                            }
                            Err(e) => {
                                tracing::warn!("Failed to parse client message: {}", e);
                                let error = ServerMessage::Error {
                                    code: "INVALID_MESSAGE".to_string(),
                                    msg: format!("Failed to parse message: {}", e),
                                };
                                if let Ok(json) = serde_json::to_string(&error) {
                                    let _ = sender.send(Message::Text(json.into())).await;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // ignore pings/pongs/binary
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    tracing::info!("WebSocket client disconnected");
}

fn validation_error(err: SessionError) -> ServerMessage {
    ServerMessage::Error {
        code: err.code().to_string(),
        msg: err.to_string(),
    }
}

fn session_response(view: crate::types::SessionView) -> ServerMessage {
    ServerMessage::Session {
        session: view,
        server_now: chrono::Utc::now().to_rfc3339(),
    }
}

/// Handle a client message and return the direct response for the sender.
/// Successful mutations are additionally broadcast to all clients.
pub async fn handle_message(msg: ClientMessage, state: &Arc<AppState>) -> Option<ServerMessage> {
    match msg {
        ClientMessage::AddPlayer { name } => {
            // Blank names are a deliberate no-op, not an error
            match state.add_player(&name).await {
                Some(view) => Some(session_response(view)),
                None => Some(session_response(state.session_view().await)),
            }
        }

        ClientMessage::RemovePlayer { index } => match state.remove_player(index).await {
            Ok(view) => Some(session_response(view)),
            Err(e) => Some(validation_error(e)),
        },

        ClientMessage::AdjustImposters { delta } => {
            Some(session_response(state.adjust_imposters(delta).await))
        }

        ClientMessage::RandomizeImposters => {
            Some(session_response(state.randomize_imposters().await))
        }

        ClientMessage::SetMode { mode } => Some(session_response(state.set_mode(mode).await)),

        ClientMessage::SetCategory { category } => match state.set_category(category).await {
            Ok(view) => Some(session_response(view)),
            Err(e) => Some(validation_error(e)),
        },

        ClientMessage::StartGame => match state.start_game().await {
            Ok(snapshot) => Some(ServerMessage::GameStarted { snapshot }),
            Err(e) => Some(validation_error(e)),
        },

        ClientMessage::ResetSession => Some(session_response(state.reset_session().await)),
    }
}
