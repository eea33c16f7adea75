pub mod message;

use axum::extract::ws::{Message, WebSocket};
use serde::Serialize;

use crate::error::domain_error::DomainError;
use crate::error::Error;
use message::{WsMessageIn, WsMessageOut};

pub async fn send_error(websocket: &mut WebSocket, error: &Error) {
    if let Err(send_error) = send_message(websocket, &error_to_ws_error(error)).await {
        log::error!("Sent Error '{error}' to the browser but the WebSocket is closed. Error: '{send_error}'.")
    }
}

pub async fn close(websocket: WebSocket) {
    if let Err(error) = websocket.close().await {
        log::error!("Could not close WebSocket. Error: '{error}'.")
    }
}

pub fn parse_message(message: &str) -> Result<WsMessageIn, Error> {
    serde_json::from_str(message)
        .map_err(|error| Error::UnprocessableMessage(message.to_string(), error.to_string()))
}

pub async fn send_message<T>(websocket: &mut WebSocket, value: &T) -> Result<(), Error>
where
    T: ?Sized + Serialize,
{
    let message = serde_json::to_string(value).map_err(|error| {
        Error::log_and_create_internal(&format!(
            "Could not serialize the message. Error: '{error}'."
        ))
    })?;

    send_message_string(websocket, &message).await
}

pub async fn send_message_string(websocket: &mut WebSocket, message: &str) -> Result<(), Error> {
    websocket
        .send(Message::Text(message.to_string()))
        .await
        .map_err(|error| Error::WebsocketClosed(error.to_string()))
}

fn error_to_ws_error(error: &Error) -> WsMessageOut {
    let (code, title) = match error {
        Error::Domain(domain_error) => domain_error_to_code_and_title(domain_error),
        Error::Internal(_) => ("INTERNAL_SERVER", "Internal Server error"),
        Error::UnprocessableMessage(_, _) => (
            "UNPROCESSABLE_WEBSOCKET_MESSAGE",
            "The message could not be processed",
        ),
        Error::WebsocketClosed(_) => ("WEBSOCKET_CLOSED", "The player websocket is closed"),
        Error::SpeechUnavailable(_) => ("SPEECH_UNAVAILABLE", "Speech is not available"),
        Error::InvalidCatalogLine { .. } | Error::UnreadableCatalog(_, _) => {
            ("INVALID_CATALOG", "The word catalog is not valid")
        }
    };

    WsMessageOut::Error {
        code: code.to_string(),
        title: title.to_string(),
        detail: error.to_string(),
    }
}

fn domain_error_to_code_and_title(error: &DomainError) -> (&'static str, &'static str) {
    match error {
        DomainError::NotEnoughWords(_, _) => {
            ("NOT_ENOUGH_WORDS", "There are not enough words in the catalog")
        }
        DomainError::NotEnoughRounds(_, _) => {
            ("NOT_ENOUGH_ROUNDS", "A session needs at least one round")
        }
        DomainError::InvalidStateForAnswer(_, _) => (
            "INVALID_STATE_FOR_ANSWER",
            "Answers are only accepted while playing",
        ),
        DomainError::InvalidStateForReplay(_, _) => (
            "INVALID_STATE_FOR_REPLAY",
            "The audio can only be replayed while playing",
        ),
        DomainError::InvalidStateForAdvance(_, _) => (
            "INVALID_STATE_FOR_ADVANCE",
            "Rounds only advance while playing",
        ),
        DomainError::ChoiceNotInOptions(_) => (
            "CHOICE_NOT_IN_OPTIONS",
            "The chosen word is not one of the options",
        ),
    }
}
