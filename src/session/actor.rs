use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use tokio::select;
use tokio::sync::oneshot::Sender as OneshotSender;
use tokio::sync::{
    broadcast, mpsc,
    mpsc::{Receiver, Sender},
};
use tokio::time::{self, Instant};

use crate::catalog::{Catalog, WordId};
use crate::config::{QuizSettings, SpeechSettings};
use crate::error::Error;
use crate::metrics::{ACTIVE_SESSIONS, ANSWERS};
use crate::session::actor_client::SessionClient;
use crate::session::quiz_fsm::QuizFsmState;
use crate::session::{Feedback, Session, SessionState};
use crate::speech::{BroadcastSpeechNotifier, SpeechNotifier, Utterance};

/// Deadlines of the two delayed transitions. `None` means nothing is pending.
#[derive(Default, Debug)]
struct Timers {
    speak_target: Option<Instant>,
    advance_round: Option<Instant>,
}

impl Timers {
    fn cancel_all(&mut self) {
        self.speak_target = None;
        self.advance_round = None;
    }
}

pub struct SessionActor {
    session: Session,
    session_rx: Receiver<SessionCommand>,
    broadcast_tx: broadcast::Sender<SessionEvent>,
    speech: Box<dyn SpeechNotifier>,
    timers: Timers,
    settle_delay: Duration,
    advance_delay: Duration,
}

impl SessionActor {
    /// Runs a Session Actor in background whose speech goes to the connected players.
    pub fn spawn(
        catalog: Arc<Catalog>,
        quiz_settings: QuizSettings,
        speech_settings: SpeechSettings,
    ) -> Result<SessionClient, Error> {
        let (broadcast_tx, _) = broadcast::channel(32);
        let speech = BroadcastSpeechNotifier::new(speech_settings, broadcast_tx.clone());
        SessionActor::spawn_with_speech(catalog, quiz_settings, broadcast_tx, Box::new(speech))
    }

    pub fn spawn_with_speech(
        catalog: Arc<Catalog>,
        quiz_settings: QuizSettings,
        broadcast_tx: broadcast::Sender<SessionEvent>,
        speech: Box<dyn SpeechNotifier>,
    ) -> Result<SessionClient, Error> {
        let session = Session::new(catalog, quiz_settings.total_rounds)?;
        let (session_tx, session_rx): (Sender<SessionCommand>, Receiver<SessionCommand>) =
            mpsc::channel(64);

        tokio::spawn(
            SessionActor {
                session,
                session_rx,
                broadcast_tx,
                speech,
                timers: Timers::default(),
                settle_delay: quiz_settings.settle_delay(),
                advance_delay: quiz_settings.advance_delay(),
            }
            .start(),
        );

        Ok(SessionClient { session_tx })
    }

    async fn start(mut self) {
        ACTIVE_SESSIONS.inc();

        loop {
            let speak_target = self.timers.speak_target;
            let advance_round = self.timers.advance_round;

            select! {
                command = self.session_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => {
                        log::info!("Session channel has been dropped. Stopping session actor.");
                        break;
                    }
                },
                _ = time::sleep_until(speak_target.unwrap_or_else(Instant::now)), if speak_target.is_some() => {
                    self.speak_target();
                },
                _ = time::sleep_until(advance_round.unwrap_or_else(Instant::now)), if advance_round.is_some() => {
                    self.advance_round();
                },
            }
        }

        ACTIVE_SESSIONS.dec();
    }

    fn handle_command(&mut self, command: SessionCommand) {
        let (result, response_tx) = match command {
            SessionCommand::Connect { response_tx } => {
                let broadcast_rx = self.broadcast_tx.subscribe();
                if response_tx
                    .send(SessionResponse::Connected { broadcast_rx })
                    .is_err()
                {
                    log::error!("Sent SessionResponse::Connected but the response channel is closed.");
                }
                self.send_session_state();
                return;
            }
            SessionCommand::GetState { response_tx } => (
                Ok(SessionResponse::State {
                    state: self.session.state(),
                }),
                response_tx,
            ),
            SessionCommand::StartSession { response_tx } => {
                (self.start_session().map(|_| SessionResponse::Ok), response_tx)
            }
            SessionCommand::RestartSession { response_tx } => {
                (self.restart_session().map(|_| SessionResponse::Ok), response_tx)
            }
            SessionCommand::SubmitAnswer {
                choice,
                response_tx,
            } => (
                self.submit_answer(choice).map(|_| SessionResponse::Ok),
                response_tx,
            ),
            SessionCommand::ReplayAudio { response_tx } => (
                self.replay_audio().map(|_| SessionResponse::Ok),
                response_tx,
            ),
        };

        let response = match result {
            Ok(response) => response,
            Err(error) => SessionResponse::Error { error },
        };
        if let Err(response) = response_tx.send(response) {
            log::error!("Sent {response} but the response channel is closed.");
        }
    }

    fn start_session(&mut self) -> Result<(), Error> {
        self.session.start_session()?;
        self.enter_first_round("started");
        Ok(())
    }

    fn restart_session(&mut self) -> Result<(), Error> {
        self.session.restart_session()?;
        self.enter_first_round("restarted");
        Ok(())
    }

    /// Nothing scheduled by a previous run may touch the new one.
    fn enter_first_round(&mut self, action: &str) {
        self.timers.cancel_all();
        self.timers.speak_target = Some(Instant::now() + self.settle_delay);
        log::info!(
            "Session {action}. TotalRounds: '{}'.",
            self.session.total_rounds()
        );
        self.send_session_state();
    }

    fn submit_answer(&mut self, choice: WordId) -> Result<(), Error> {
        let Some(feedback) = self.session.submit_answer(choice)? else {
            return Ok(());
        };

        ANSWERS
            .with_label_values(&[match feedback {
                Feedback::Correct => "correct",
                Feedback::Wrong => "wrong",
            }])
            .inc();

        // The target must not be spoken over the feedback.
        self.timers.speak_target = None;
        let text = self
            .session
            .target_word()
            .map(|target| feedback.utterance(self.session.catalog().get(choice), target));
        if let Some(text) = text {
            self.speak(&text);
        }
        self.timers.advance_round = Some(Instant::now() + self.advance_delay);
        self.send_session_state();
        Ok(())
    }

    fn replay_audio(&mut self) -> Result<(), Error> {
        let text = self.session.replay_current_audio()?.word.clone();
        self.speak(&text);
        Ok(())
    }

    fn speak_target(&mut self) {
        self.timers.speak_target = None;
        if self.session.phase() != &QuizFsmState::Playing {
            return;
        }
        if let Some(text) = self.session.target_word().map(|target| target.word.clone()) {
            self.speak(&text);
        }
    }

    fn advance_round(&mut self) {
        self.timers.advance_round = None;
        if let Err(error) = self.session.advance_round() {
            log::error!("Could not advance the round. Error: '{error}'.");
            return;
        }

        match self.session.phase() {
            QuizFsmState::Playing => {
                self.timers.speak_target = Some(Instant::now() + self.settle_delay);
            }
            QuizFsmState::Finished => {
                log::info!(
                    "Session finished. Score: '{}', TotalRounds: '{}'.",
                    self.session.score(),
                    self.session.total_rounds()
                );
            }
            QuizFsmState::Start => {}
        }
        self.send_session_state();
    }

    fn speak(&mut self, text: &str) {
        if let Err(error) = self.speech.speak(text) {
            log::warn!("Could not speak '{text}'. Error: '{error}'.");
        }
    }

    fn send_session_state(&self) {
        if self
            .broadcast_tx
            .send(SessionEvent::State {
                state: self.session.state(),
            })
            .is_err()
        {
            log::debug!("No player is listening to the session state.");
        }
    }
}

pub(crate) enum SessionCommand {
    Connect {
        response_tx: OneshotSender<SessionResponse>,
    },
    GetState {
        response_tx: OneshotSender<SessionResponse>,
    },
    StartSession {
        response_tx: OneshotSender<SessionResponse>,
    },
    SubmitAnswer {
        choice: WordId,
        response_tx: OneshotSender<SessionResponse>,
    },
    ReplayAudio {
        response_tx: OneshotSender<SessionResponse>,
    },
    RestartSession {
        response_tx: OneshotSender<SessionResponse>,
    },
}

#[derive(Debug)]
pub(crate) enum SessionResponse {
    Connected {
        broadcast_rx: broadcast::Receiver<SessionEvent>,
    },
    State {
        state: SessionState,
    },
    Ok,
    Error {
        error: Error,
    },
}

impl Display for SessionResponse {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionResponse::Connected { .. } => write!(formatter, "SessionResponse::Connected"),
            SessionResponse::State { .. } => write!(formatter, "SessionResponse::State"),
            SessionResponse::Ok => write!(formatter, "SessionResponse::Ok"),
            SessionResponse::Error { error } => write!(formatter, "Error '{error}'"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum SessionEvent {
    State { state: SessionState },
    Speak(Utterance),
}
