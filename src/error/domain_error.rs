use thiserror::Error;

use crate::catalog::WordId;
use crate::session::quiz_fsm::QuizFsmState;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("Not enough words in the catalog. ActualWords: '{0}', MinimumWords: '{1}'.")]
    NotEnoughWords(usize, usize),
    #[error("Not enough rounds to play a session. ActualRounds: '{0}', MinimumRounds: '{1}'.")]
    NotEnoughRounds(u8, u8),
    #[error("Invalid state for submitting an answer. ActualState: '{0}', ExpectedState: '{1}'.")]
    InvalidStateForAnswer(QuizFsmState, QuizFsmState),
    #[error("Invalid state for replaying the audio. ActualState: '{0}', ExpectedState: '{1}'.")]
    InvalidStateForReplay(QuizFsmState, QuizFsmState),
    #[error("Invalid state for advancing the round. ActualState: '{0}', ExpectedState: '{1}'.")]
    InvalidStateForAdvance(QuizFsmState, QuizFsmState),
    #[error("The chosen word is not one of the current options. WordId: '{0}'.")]
    ChoiceNotInOptions(WordId),
}
