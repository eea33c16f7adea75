use serde::{Deserialize, Serialize};

use crate::catalog::WordId;
use crate::session::quiz_fsm::QuizFsmState;
use crate::session::{Feedback, QuizOption, Rating, SessionState};
use crate::speech::Utterance;

#[derive(Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum WsMessageIn {
    StartSession,
    #[serde(rename_all = "camelCase")]
    SubmitAnswer {
        word_id: WordId,
    },
    ReplayAudio,
    RestartSession,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum WsMessageOut {
    Error {
        code: String,
        title: String,
        detail: String,
    },
    #[serde(rename_all = "camelCase")]
    SessionState {
        phase: String,
        round: u8,
        total_rounds: u8,
        score: u8,
        options: Vec<OptionDto>,
        answered: bool,
        selected_option: Option<WordId>,
        correct_option: Option<WordId>,
        feedback: Option<String>,
        rating: Option<String>,
    },
    /// The client cancels any speech in progress before speaking this one.
    Speak {
        id: u64,
        text: String,
        locale: String,
        rate: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        pitch: Option<f32>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDto {
    id: WordId,
    word: String,
    pronunciation: String,
}

impl From<QuizOption> for OptionDto {
    fn from(option: QuizOption) -> Self {
        OptionDto {
            id: option.id,
            word: option.entry.word,
            pronunciation: option.entry.pronunciation,
        }
    }
}

impl From<SessionState> for WsMessageOut {
    fn from(state: SessionState) -> Self {
        WsMessageOut::SessionState {
            phase: phase_to_string(state.phase),
            round: state.round,
            total_rounds: state.total_rounds,
            score: state.score,
            options: state.options.into_iter().map(|option| option.into()).collect(),
            answered: state.answered,
            selected_option: state.selected_option,
            correct_option: state.correct_option,
            feedback: state.feedback.map(feedback_to_string),
            rating: state.rating.map(rating_to_string),
        }
    }
}

impl From<Utterance> for WsMessageOut {
    fn from(utterance: Utterance) -> Self {
        WsMessageOut::Speak {
            id: utterance.id,
            text: utterance.text,
            locale: utterance.locale,
            rate: utterance.rate,
            pitch: utterance.pitch,
        }
    }
}

pub fn phase_to_string(phase: QuizFsmState) -> String {
    match phase {
        QuizFsmState::Start => "start",
        QuizFsmState::Playing => "playing",
        QuizFsmState::Finished => "finished",
    }
    .to_string()
}

fn feedback_to_string(feedback: Feedback) -> String {
    match feedback {
        Feedback::Correct => "correct",
        Feedback::Wrong => "wrong",
    }
    .to_string()
}

fn rating_to_string(rating: Rating) -> String {
    match rating {
        Rating::Perfect => "perfect",
        Rating::Good => "good",
        Rating::KeepTrying => "keepTrying",
    }
    .to_string()
}
