use tokio::sync::broadcast;

use crate::config::SpeechSettings;
use crate::error::Error;
use crate::session::actor::SessionEvent;

/// A request to say `text` out loud. Higher ids supersede lower ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    pub id: u64,
    pub text: String,
    pub locale: String,
    pub rate: f32,
    pub pitch: Option<f32>,
}

/// Renders text as audio somewhere outside the session.
///
/// Calls are fire-and-forget: the session never waits for the audio to finish, and a new call
/// cancels whatever is still playing. Errors are only reported so they can be logged.
pub trait SpeechNotifier: Send {
    fn speak(&mut self, text: &str) -> Result<(), Error>;
}

/// Forwards utterances to the connected players, whose browser does the actual speech synthesis.
pub struct BroadcastSpeechNotifier {
    settings: SpeechSettings,
    next_id: u64,
    broadcast_tx: broadcast::Sender<SessionEvent>,
}

impl BroadcastSpeechNotifier {
    pub fn new(settings: SpeechSettings, broadcast_tx: broadcast::Sender<SessionEvent>) -> Self {
        BroadcastSpeechNotifier {
            settings,
            next_id: 0,
            broadcast_tx,
        }
    }

    fn utterance(&mut self, text: &str) -> Utterance {
        self.next_id += 1;
        Utterance {
            id: self.next_id,
            text: text.to_string(),
            locale: self.settings.locale.clone(),
            rate: self.settings.rate,
            pitch: self.settings.pitch,
        }
    }
}

impl SpeechNotifier for BroadcastSpeechNotifier {
    fn speak(&mut self, text: &str) -> Result<(), Error> {
        let utterance = self.utterance(text);
        self.broadcast_tx
            .send(SessionEvent::Speak(utterance))
            .map(|_| ())
            .map_err(|_| Error::SpeechUnavailable("No player is listening.".to_string()))
    }
}
