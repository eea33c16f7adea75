use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::{self, Receiver as OneshotReceiver, Sender as OneshotSender};

use crate::catalog::WordId;
use crate::error::Error;
use crate::session::actor::{SessionCommand, SessionEvent, SessionResponse};
use crate::session::SessionState;

#[derive(Clone, Debug)]
pub struct SessionClient {
    pub(super) session_tx: Sender<SessionCommand>,
}

impl SessionClient {
    /// Subscribes to the session events. The current state is the first event received.
    pub async fn connect(&self) -> Result<SessionEventReceiver, Error> {
        match self
            .request("Connect", |response_tx| SessionCommand::Connect { response_tx })
            .await?
        {
            SessionResponse::Connected { broadcast_rx } => Ok(SessionEventReceiver { broadcast_rx }),
            unexpected => Err(SessionClient::unexpected_response("Connect", unexpected)),
        }
    }

    pub async fn state(&self) -> Result<SessionState, Error> {
        match self
            .request("GetState", |response_tx| SessionCommand::GetState { response_tx })
            .await?
        {
            SessionResponse::State { state } => Ok(state),
            unexpected => Err(SessionClient::unexpected_response("GetState", unexpected)),
        }
    }

    pub async fn start_session(&self) -> Result<(), Error> {
        self.request_ok("StartSession", |response_tx| SessionCommand::StartSession {
            response_tx,
        })
        .await
    }

    pub async fn submit_answer(&self, choice: WordId) -> Result<(), Error> {
        self.request_ok("SubmitAnswer", |response_tx| SessionCommand::SubmitAnswer {
            choice,
            response_tx,
        })
        .await
    }

    pub async fn replay_audio(&self) -> Result<(), Error> {
        self.request_ok("ReplayAudio", |response_tx| SessionCommand::ReplayAudio {
            response_tx,
        })
        .await
    }

    pub async fn restart_session(&self) -> Result<(), Error> {
        self.request_ok("RestartSession", |response_tx| {
            SessionCommand::RestartSession { response_tx }
        })
        .await
    }

    async fn request_ok<F>(&self, name: &str, command: F) -> Result<(), Error>
    where
        F: FnOnce(OneshotSender<SessionResponse>) -> SessionCommand,
    {
        match self.request(name, command).await? {
            SessionResponse::Ok => Ok(()),
            unexpected => Err(SessionClient::unexpected_response(name, unexpected)),
        }
    }

    async fn request<F>(&self, name: &str, command: F) -> Result<SessionResponse, Error>
    where
        F: FnOnce(OneshotSender<SessionResponse>) -> SessionCommand,
    {
        let (tx, rx): (OneshotSender<SessionResponse>, OneshotReceiver<SessionResponse>) =
            oneshot::channel();

        self.session_tx.send(command(tx)).await.map_err(|error| {
            Error::log_and_create_internal(&format!(
                "Tried to send SessionCommand::{name} but SessionActor is not listening. Error: '{error}'."
            ))
        })?;

        match rx.await {
            Ok(SessionResponse::Error { error }) => Err(error),
            Ok(response) => Ok(response),
            Err(error) => Err(Error::log_and_create_internal(&format!(
                "Sent SessionCommand::{name} but the SessionActor dropped the response channel. Error: '{error}'."
            ))),
        }
    }

    fn unexpected_response(name: &str, response: SessionResponse) -> Error {
        Error::log_and_create_internal(&format!(
            "Received an unexpected response to SessionCommand::{name}. Response: '{response}'."
        ))
    }
}

pub struct SessionEventReceiver {
    broadcast_rx: broadcast::Receiver<SessionEvent>,
}

impl SessionEventReceiver {
    pub async fn next(&mut self) -> Result<SessionEvent, Error> {
        loop {
            match self.broadcast_rx.recv().await {
                Ok(event) => return Ok(event),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("The session event receiver lagged behind. SkippedEvents: '{skipped}'.");
                }
                Err(error) => {
                    return Err(Error::log_and_create_internal(&format!(
                        "The broadcast channel with the Session has been closed. Error: '{error}'."
                    )))
                }
            }
        }
    }
}
