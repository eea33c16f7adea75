use std::time::Duration;

use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{tungstenite::Message, MaybeTlsStream, WebSocketStream};

#[derive(Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum WsMessageOut {
    StartSession,
    #[serde(rename_all = "camelCase")]
    SubmitAnswer {
        word_id: usize,
    },
    ReplayAudio,
    RestartSession,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum WsMessageIn {
    Error {
        code: String,
        title: String,
        detail: String,
    },
    SessionState(SessionState),
    Speak(Speak),
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub phase: String,
    pub round: u8,
    pub total_rounds: u8,
    pub score: u8,
    pub options: Vec<QuizOption>,
    pub answered: bool,
    pub selected_option: Option<usize>,
    pub correct_option: Option<usize>,
    pub feedback: Option<String>,
    pub rating: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: usize,
    pub word: String,
    pub pronunciation: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Speak {
    pub id: u64,
    pub text: String,
    pub locale: String,
    pub rate: f32,
}

type WebSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestPlayer {
    pub tx: SplitSink<WebSocket, Message>,
    pub rx: SplitStream<WebSocket>,
}

impl TestPlayer {
    const RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(websocket: WebSocket) -> Self {
        let (tx, rx) = websocket.split();
        TestPlayer { tx, rx }
    }

    pub async fn receive_text(&mut self) -> String {
        match timeout(TestPlayer::RECEIVE_TIMEOUT, self.rx.next()).await {
            Ok(Some(Ok(message))) => message
                .to_text()
                .expect("Message was not a text")
                .to_string(),
            Ok(Some(Err(error))) => panic!("Websocket returned an error {error}"),
            Ok(None) => panic!("Websocket closed before expected."),
            Err(_) => panic!("No message received in time."),
        }
    }

    pub async fn receive_message(&mut self) -> WsMessageIn {
        let text = self.receive_text().await;
        serde_json::from_str(&text)
            .unwrap_or_else(|error| panic!("Could not parse the message '{text}'. Error: '{error}'."))
    }

    pub async fn receive_session_state(&mut self) -> SessionState {
        match self.receive_message().await {
            WsMessageIn::SessionState(state) => state,
            other => panic!("Expected a session state, received {other:?}"),
        }
    }

    pub async fn receive_speak(&mut self) -> Speak {
        match self.receive_message().await {
            WsMessageIn::Speak(speak) => speak,
            other => panic!("Expected a speak message, received {other:?}"),
        }
    }

    pub async fn receive_error(&mut self) -> String {
        match self.receive_message().await {
            WsMessageIn::Error {
                code,
                title,
                detail,
            } => {
                assert!(!title.is_empty());
                assert!(!detail.is_empty());
                code
            }
            other => panic!("Expected an error, received {other:?}"),
        }
    }

    /// Waits for the server to close the websocket.
    pub async fn receive_close(&mut self) {
        match timeout(TestPlayer::RECEIVE_TIMEOUT, self.rx.next()).await {
            Ok(Some(Ok(Message::Close(_)))) | Ok(None) => {}
            Ok(Some(Ok(message))) => panic!("Expected the websocket to close, received {message}"),
            Ok(Some(Err(error))) => panic!("Websocket returned an error {error}"),
            Err(_) => panic!("The websocket was not closed in time."),
        }
    }

    pub async fn send_message(&mut self, message: WsMessageOut) {
        let text = serde_json::to_string(&message).unwrap();
        self.send_text(&text).await;
    }

    pub async fn send_text(&mut self, text: &str) {
        self.tx
            .send(Message::Text(text.to_string()))
            .await
            .expect("Failed to send the websocket message.");
    }

    /// Starts the session and waits until the first target word is spoken.
    pub async fn start_session(&mut self) -> (SessionState, Speak) {
        self.send_message(WsMessageOut::StartSession).await;
        let state = self.receive_session_state().await;
        let speak = self.receive_speak().await;
        (state, speak)
    }
}
