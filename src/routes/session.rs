use std::sync::Arc;

use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;

use crate::player::actor::PlayerActor;
use crate::session::actor::SessionActor;
use crate::startup::AppState;
use crate::websocket::{close, send_error};

/// Every websocket gets its own quiz session, which lives as long as the connection.
pub async fn connect_player_to_websocket(
    State(state): State<Arc<AppState>>,
    websocket_upgrade: WebSocketUpgrade,
) -> Response {
    websocket_upgrade.on_upgrade(move |mut websocket| async move {
        match SessionActor::spawn(
            Arc::clone(&state.catalog),
            state.config.quiz.clone(),
            state.config.speech.clone(),
        ) {
            Ok(session) => {
                PlayerActor::create(
                    session,
                    websocket,
                    state.config.quiz.client_inactivity_timeout(),
                )
                .await
            }
            Err(error) => {
                send_error(&mut websocket, &error).await;
                close(websocket).await;
            }
        }
    })
}
