use std::fmt;

use rust_fsm::state_machine;

/*
 * Start
 * Playing
 *    Question spoken, waiting for the answer
 *    Answer scored, waiting for the next round
 *    If last round go to finished, otherwise next question
 * Finished
 */
state_machine! {
    derive(Debug, Clone, Copy, PartialEq)
    pub QuizFsm(Start)

    Start => {
        StartSession => Playing
    },
    Playing => {
        StartSession => Playing,
        NextRound => Playing,
        NoMoreRounds => Finished,
    },
    Finished => {
        StartSession => Playing
    }
}

impl fmt::Display for QuizFsmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
