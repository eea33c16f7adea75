use axum::extract::ws::{Message, WebSocket};
use std::time::Duration;
use tokio::select;
use tokio::time::error::Elapsed;
use tokio::time::timeout;

use crate::error::Error;
use crate::metrics::CONNECTED_PLAYERS;
use crate::session::actor::SessionEvent;
use crate::session::actor_client::{SessionClient, SessionEventReceiver};
use crate::websocket::message::{WsMessageIn, WsMessageOut};
use crate::websocket::{close, parse_message, send_error, send_message, send_message_string};

/// Bridges one browser websocket with its quiz session.
pub struct PlayerActor {
    session: SessionClient,
    session_event_receiver: SessionEventReceiver,
    websocket: WebSocket,
    inactivity_timeout: Duration,
}

impl PlayerActor {
    pub async fn create(session: SessionClient, mut websocket: WebSocket, inactivity_timeout: Duration) {
        match session.connect().await {
            Ok(session_event_receiver) => {
                PlayerActor {
                    session,
                    session_event_receiver,
                    websocket,
                    inactivity_timeout,
                }
                .start()
                .await
            }
            Err(error) => {
                send_error(&mut websocket, &error).await;
                close(websocket).await;
            }
        }
    }

    async fn start(mut self) {
        CONNECTED_PLAYERS.inc();

        loop {
            select! {
                session_event = self.session_event_receiver.next() => {
                    if let Err(error) = self.receive_session_event(session_event).await {
                        send_error(&mut self.websocket, &error).await;
                        if PlayerActor::should_close_websocket(&error) {
                            break;
                        }
                    }
                },
                websocket_message = timeout(self.inactivity_timeout, self.websocket.recv()) => {
                    if let Err(error) = self.receive_websocket_message(websocket_message).await {
                        send_error(&mut self.websocket, &error).await;
                        if PlayerActor::should_close_websocket(&error) {
                            break;
                        }
                    }
                },
            }
        }

        // Dropping the last SessionClient stops the session actor.
        close(self.websocket).await;
        CONNECTED_PLAYERS.dec();
    }

    fn should_close_websocket(error: &Error) -> bool {
        match error {
            Error::Internal(_) => true,
            Error::WebsocketClosed(_) => true,
            Error::Domain(_) => false,
            Error::UnprocessableMessage(_, _) => false,
            Error::SpeechUnavailable(_) => false,
            Error::InvalidCatalogLine { .. } => true,
            Error::UnreadableCatalog(_, _) => true,
        }
    }

    async fn receive_session_event(
        &mut self,
        session_event: Result<SessionEvent, Error>,
    ) -> Result<(), Error> {
        match session_event? {
            SessionEvent::State { state } => {
                send_message(&mut self.websocket, &WsMessageOut::from(state)).await
            }
            SessionEvent::Speak(utterance) => {
                send_message(&mut self.websocket, &WsMessageOut::from(utterance)).await
            }
        }
    }

    async fn receive_websocket_message(
        &mut self,
        websocket_message: Result<Option<Result<Message, axum::Error>>, Elapsed>,
    ) -> Result<(), Error> {
        match websocket_message {
            Ok(Some(Ok(Message::Text(txt)))) => match txt.as_str() {
                "ping" => send_message_string(&mut self.websocket, "pong").await,
                message => match parse_message(message)? {
                    WsMessageIn::StartSession => self.session.start_session().await,
                    WsMessageIn::SubmitAnswer { word_id } => {
                        self.session.submit_answer(word_id).await
                    }
                    WsMessageIn::ReplayAudio => self.session.replay_audio().await,
                    WsMessageIn::RestartSession => self.session.restart_session().await,
                },
            },
            // browser said "close"
            Ok(Some(Ok(Message::Close(_)))) => {
                self.log_connection_lost_with_player("browser sent 'Close' websocket frame");
                Err(Error::WebsocketClosed(
                    "browser sent 'Close' websocket frame".to_string(),
                ))
            }
            // websocket was closed
            Ok(None) => {
                self.log_connection_lost_with_player("other end of websocket was closed abruptly");
                Err(Error::WebsocketClosed(
                    "other end of websocket was closed abruptly".to_string(),
                ))
            }
            // timeout without receiving anything from player
            Err(_) => {
                self.log_connection_lost_with_player(
                    "connection timed out; missing 'ping' messages",
                );
                Err(Error::WebsocketClosed(
                    "connection timed out; missing 'ping' messages".to_string(),
                ))
            }
            Ok(Some(Err(error))) => Err(Error::UnprocessableMessage(
                "Message cannot be loaded".to_string(),
                error.to_string(),
            )),
            // axum answers 'Ping' frames on its own
            Ok(Some(Ok(Message::Ping(_)))) | Ok(Some(Ok(Message::Pong(_)))) => Ok(()),
            Ok(Some(Ok(_))) => Err(Error::UnprocessableMessage(
                "Unsupported message type".to_string(),
                "Unsupported message type".to_string(),
            )),
        }
    }

    fn log_connection_lost_with_player(&self, reason: &str) {
        log::info!("Connection with player lost due to: {reason}. Stopping player actor.");
    }
}
