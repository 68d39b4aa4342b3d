use imposter::catalog::Catalog;
use imposter::handoff::{HandoffStore, HANDOFF_KEY};
use imposter::protocol::{ClientMessage, ServerMessage};
use imposter::state::AppState;
use imposter::types::Mode;
use imposter::ws::handle_message;
use std::sync::Arc;

fn new_state(dir: &tempfile::TempDir) -> Arc<AppState> {
    let handoff = HandoffStore::new(dir.path().join("handoff.json"));
    Arc::new(AppState::new(Catalog::fallback(), handoff))
}

/// End-to-end test for a complete setup flow
#[tokio::test]
async fn test_full_setup_flow() {
    let dir = tempfile::tempdir().unwrap();
    let state = new_state(&dir);

    // 1. Add players
    for name in ["Ana", "Bo", "Cy", "Dee"] {
        let result = handle_message(
            ClientMessage::AddPlayer {
                name: name.to_string(),
            },
            &state,
        )
        .await;
        assert!(matches!(result, Some(ServerMessage::Session { .. })));
    }

    let view = state.session_view().await;
    assert_eq!(view.player_names, vec!["Ana", "Bo", "Cy", "Dee"]);

    // 2. Bump imposters to 2, switch to question mode, pick a category
    let result = handle_message(ClientMessage::AdjustImposters { delta: 1 }, &state).await;
    match result {
        Some(ServerMessage::Session { session, .. }) => assert_eq!(session.imposters, 2),
        other => panic!("Expected Session message, got {:?}", other),
    }

    let result = handle_message(
        ClientMessage::SetMode {
            mode: Mode::Question,
        },
        &state,
    )
    .await;
    match result {
        Some(ServerMessage::Session { session, .. }) => assert_eq!(session.mode, Mode::Question),
        other => panic!("Expected Session message, got {:?}", other),
    }

    let result = handle_message(
        ClientMessage::SetCategory {
            category: "Food".to_string(),
        },
        &state,
    )
    .await;
    match result {
        Some(ServerMessage::Session { session, .. }) => assert_eq!(session.category, "Food"),
        other => panic!("Expected Session message, got {:?}", other),
    }

    // 3. Start the game
    let result = handle_message(ClientMessage::StartGame, &state).await;
    let snapshot = match result {
        Some(ServerMessage::GameStarted { snapshot }) => snapshot,
        other => panic!("Expected GameStarted message, got {:?}", other),
    };

    assert_eq!(snapshot.player_names.len(), 4);
    assert_eq!(snapshot.imposters, 2);
    assert_eq!(snapshot.mode, Mode::Question);
    assert_eq!(snapshot.category, "Food");
    assert!(["Pizza", "Burger", "Sushi", "Pasta"].contains(&snapshot.chosen_word.as_str()));

    // 4. The hand-off slot holds the exact snapshot shape
    let stored = state.handoff.get(HANDOFF_KEY).await.expect("slot written");
    assert_eq!(stored["playerNames"][3], "Dee");
    assert_eq!(stored["imposters"], 2);
    assert_eq!(stored["mode"], "question");
    assert_eq!(stored["category"], "Food");
    assert_eq!(stored["chosenWord"], snapshot.chosen_word);
}

#[tokio::test]
async fn test_start_with_too_few_players_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = new_state(&dir);

    for name in ["Ana", "Bo"] {
        handle_message(
            ClientMessage::AddPlayer {
                name: name.to_string(),
            },
            &state,
        )
        .await;
    }

    let result = handle_message(ClientMessage::StartGame, &state).await;
    match result {
        Some(ServerMessage::Error { code, msg }) => {
            assert_eq!(code, "NOT_ENOUGH_PLAYERS");
            assert!(msg.contains("at least 3 players"));
        }
        other => panic!("Expected Error message, got {:?}", other),
    }

    // Nothing was finalized or persisted
    assert!(!state.session_view().await.started);
    assert!(state.handoff.get(HANDOFF_KEY).await.is_none());
}

#[tokio::test]
async fn test_remove_player_out_of_range_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = new_state(&dir);

    handle_message(
        ClientMessage::AddPlayer {
            name: "Ana".to_string(),
        },
        &state,
    )
    .await;

    let result = handle_message(ClientMessage::RemovePlayer { index: 5 }, &state).await;
    match result {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "INDEX_OUT_OF_RANGE"),
        other => panic!("Expected Error message, got {:?}", other),
    }
    assert_eq!(state.session_view().await.player_names, vec!["Ana"]);
}

#[tokio::test]
async fn test_blank_player_name_returns_unchanged_session() {
    let dir = tempfile::tempdir().unwrap();
    let state = new_state(&dir);

    let result = handle_message(
        ClientMessage::AddPlayer {
            name: "   ".to_string(),
        },
        &state,
    )
    .await;

    match result {
        Some(ServerMessage::Session { session, .. }) => {
            assert!(session.player_names.is_empty());
            assert_eq!(session.version, 1);
        }
        other => panic!("Expected Session message, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_category_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = new_state(&dir);

    let result = handle_message(
        ClientMessage::SetCategory {
            category: "Ghosts".to_string(),
        },
        &state,
    )
    .await;

    match result {
        Some(ServerMessage::Error { code, msg }) => {
            assert_eq!(code, "UNKNOWN_CATEGORY");
            assert!(msg.contains("Ghosts"));
        }
        other => panic!("Expected Error message, got {:?}", other),
    }
}

#[tokio::test]
async fn test_randomize_imposters_respects_player_count() {
    let dir = tempfile::tempdir().unwrap();
    let state = new_state(&dir);

    for name in ["Ana", "Bo", "Cy"] {
        handle_message(
            ClientMessage::AddPlayer {
                name: name.to_string(),
            },
            &state,
        )
        .await;
    }

    for _ in 0..25 {
        let result = handle_message(ClientMessage::RandomizeImposters, &state).await;
        match result {
            Some(ServerMessage::Session { session, .. }) => {
                assert!((1..=2).contains(&session.imposters));
            }
            other => panic!("Expected Session message, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_reset_begins_a_fresh_session() {
    let dir = tempfile::tempdir().unwrap();
    let state = new_state(&dir);

    for name in ["Ana", "Bo", "Cy"] {
        handle_message(
            ClientMessage::AddPlayer {
                name: name.to_string(),
            },
            &state,
        )
        .await;
    }
    handle_message(ClientMessage::StartGame, &state).await;
    let old_id = state.session_view().await.id;

    let result = handle_message(ClientMessage::ResetSession, &state).await;
    match result {
        Some(ServerMessage::Session { session, .. }) => {
            assert_ne!(session.id, old_id);
            assert!(session.player_names.is_empty());
            assert!(!session.started);
            assert_eq!(session.imposters, 1);
        }
        other => panic!("Expected Session message, got {:?}", other),
    }

    // The previous hand-off snapshot survives until the next start
    assert!(state.handoff.get(HANDOFF_KEY).await.is_some());
}

#[tokio::test]
async fn test_mutations_reach_broadcast_subscribers() {
    let dir = tempfile::tempdir().unwrap();
    let state = new_state(&dir);
    let mut rx = state.session_broadcast.subscribe();

    handle_message(
        ClientMessage::AddPlayer {
            name: "Ana".to_string(),
        },
        &state,
    )
    .await;

    match rx.recv().await.unwrap() {
        ServerMessage::Session { session, .. } => {
            assert_eq!(session.player_names, vec!["Ana"]);
        }
        other => panic!("Expected Session broadcast, got {:?}", other),
    }
}
