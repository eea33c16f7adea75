pub mod actor;
pub mod actor_client;
pub mod question;
pub mod quiz_fsm;

use std::sync::Arc;

use rand::thread_rng;
use rust_fsm::StateMachine;

use crate::catalog::{Catalog, WordEntry, WordId};
use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::session::question::Question;
use crate::session::quiz_fsm::{QuizFsm, QuizFsmInput, QuizFsmState};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Feedback {
    Correct,
    Wrong,
}

impl Feedback {
    /// What is said back to the player after an answer.
    pub fn utterance(&self, chosen: &WordEntry, target: &WordEntry) -> String {
        match self {
            Feedback::Correct => format!("啱咗！{}", chosen.word),
            Feedback::Wrong => format!("錯咗喇，正確係 {}", target.word),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rating {
    Perfect,
    Good,
    KeepTrying,
}

impl Rating {
    pub fn from_score(score: u8, total_rounds: u8) -> Rating {
        if score >= total_rounds {
            Rating::Perfect
        } else if u16::from(score) * 2 >= u16::from(total_rounds) {
            Rating::Good
        } else {
            Rating::KeepTrying
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuizOption {
    pub id: WordId,
    pub entry: WordEntry,
}

/// Owned view of a session, handed to the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub phase: QuizFsmState,
    pub round: u8,
    pub total_rounds: u8,
    pub score: u8,
    pub options: Vec<QuizOption>,
    pub answered: bool,
    pub selected_option: Option<WordId>,
    /// Only revealed once the round has been answered.
    pub correct_option: Option<WordId>,
    pub feedback: Option<Feedback>,
    pub rating: Option<Rating>,
}

pub struct Session {
    catalog: Arc<Catalog>,
    fsm: StateMachine<QuizFsm>,
    total_rounds: u8,
    round: u8,
    score: u8,
    current_question: Option<Question>,
    selected_option: Option<WordId>,
    feedback: Option<Feedback>,
}

impl Session {
    const MINIMUM_ROUNDS: u8 = 1;

    pub fn new(catalog: Arc<Catalog>, total_rounds: u8) -> Result<Self, Error> {
        if total_rounds < Session::MINIMUM_ROUNDS {
            return Err(Error::Domain(DomainError::NotEnoughRounds(
                total_rounds,
                Session::MINIMUM_ROUNDS,
            )));
        }

        Ok(Self {
            catalog,
            fsm: StateMachine::default(),
            total_rounds,
            round: 1,
            score: 0,
            current_question: None,
            selected_option: None,
            feedback: None,
        })
    }

    pub fn phase(&self) -> &QuizFsmState {
        self.fsm.state()
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn total_rounds(&self) -> u8 {
        self.total_rounds
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    pub fn answered(&self) -> bool {
        self.selected_option.is_some()
    }

    pub fn selected_option(&self) -> Option<WordId> {
        self.selected_option
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The word whose audio is played in the current round.
    pub fn target_word(&self) -> Option<&WordEntry> {
        self.current_question
            .as_ref()
            .map(|question| self.catalog.get(question.target))
    }

    pub fn start_session(&mut self) -> Result<(), Error> {
        self.score = 0;
        self.round = 0;
        self.process_event(&QuizFsmInput::StartSession)
    }

    pub fn restart_session(&mut self) -> Result<(), Error> {
        self.start_session()
    }

    /// Scores `choice` against the current target.
    ///
    /// Returns `Ok(None)` when the round was already answered, so duplicated or late clicks are
    /// ignored.
    pub fn submit_answer(&mut self, choice: WordId) -> Result<Option<Feedback>, Error> {
        if self.answered() {
            return Ok(None);
        }
        if self.phase() != &QuizFsmState::Playing {
            return Err(Error::Domain(DomainError::InvalidStateForAnswer(
                *self.phase(),
                QuizFsmState::Playing,
            )));
        }

        let is_correct = match self.current_question.as_ref() {
            Some(question) if question.has_option(choice) => question.is_target(choice),
            Some(_) => return Err(Error::Domain(DomainError::ChoiceNotInOptions(choice))),
            None => {
                return Err(Error::log_and_create_internal(
                    "Missing question while playing, there is a bug in the code.",
                ))
            }
        };

        let feedback = if is_correct {
            self.score += 1;
            Feedback::Correct
        } else {
            Feedback::Wrong
        };
        self.selected_option = Some(choice);
        self.feedback = Some(feedback);

        Ok(Some(feedback))
    }

    /// Moves to the next round, or to `Finished` after the last one.
    pub fn advance_round(&mut self) -> Result<(), Error> {
        if self.phase() != &QuizFsmState::Playing {
            return Err(Error::Domain(DomainError::InvalidStateForAdvance(
                *self.phase(),
                QuizFsmState::Playing,
            )));
        }

        if self.round >= self.total_rounds {
            self.process_event(&QuizFsmInput::NoMoreRounds)
        } else {
            self.process_event(&QuizFsmInput::NextRound)
        }
    }

    pub fn replay_current_audio(&self) -> Result<&WordEntry, Error> {
        if self.phase() != &QuizFsmState::Playing {
            return Err(Error::Domain(DomainError::InvalidStateForReplay(
                *self.phase(),
                QuizFsmState::Playing,
            )));
        }

        self.target_word().ok_or_else(|| {
            Error::log_and_create_internal("Missing question while playing, there is a bug in the code.")
        })
    }

    pub fn state(&self) -> SessionState {
        let options = self
            .current_question
            .as_ref()
            .map(|question| {
                question
                    .options
                    .iter()
                    .map(|id| QuizOption {
                        id: *id,
                        entry: self.catalog.get(*id).clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        SessionState {
            phase: *self.phase(),
            round: self.round,
            total_rounds: self.total_rounds,
            score: self.score,
            options,
            answered: self.answered(),
            selected_option: self.selected_option,
            correct_option: self
                .current_question
                .as_ref()
                .filter(|_| self.answered())
                .map(|question| question.target),
            feedback: self.feedback,
            rating: match self.phase() {
                QuizFsmState::Finished => Some(Rating::from_score(self.score, self.total_rounds)),
                _ => None,
            },
        }
    }

    fn process_event(&mut self, event: &QuizFsmInput) -> Result<(), Error> {
        match self.fsm.consume(event) {
            Ok(_) => match self.fsm.state() {
                QuizFsmState::Playing => {
                    self.start_new_round();
                    Ok(())
                }
                QuizFsmState::Start => Ok(()),
                QuizFsmState::Finished => Ok(()),
            },
            Err(_) => Err(Error::log_and_create_internal(&format!(
                "The fsm in state {:?} can't transition with an event {:?}.",
                self.fsm.state(),
                event
            ))),
        }
    }

    fn start_new_round(&mut self) {
        self.round += 1;
        self.selected_option = None;
        self.feedback = None;
        self.current_question = Some(Question::generate(&self.catalog, &mut thread_rng()));
    }
}
