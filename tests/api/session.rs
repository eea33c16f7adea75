use std::time::Duration;

use tokio::time::sleep;

use crate::helpers::test_app::TestApp;
use crate::helpers::test_player::{SessionState, Speak, TestPlayer, WsMessageIn, WsMessageOut};

fn option_with_word(state: &SessionState, speak: &Speak) -> usize {
    state
        .options
        .iter()
        .find(|option| option.word == speak.text)
        .map(|option| option.id)
        .expect("The spoken word is not one of the options")
}

async fn started_player(app: &TestApp) -> (TestPlayer, SessionState, Speak) {
    let mut player = app.connect_player().await;
    let initial_state = player.receive_session_state().await;
    assert_eq!(initial_state.phase, "start");

    let (state, speak) = player.start_session().await;
    (player, state, speak)
}

#[tokio::test]
async fn new_connection_receives_the_start_state() {
    let app = TestApp::spawn_app().await;
    let mut player = app.connect_player().await;

    let state = player.receive_session_state().await;

    assert_eq!(state.phase, "start");
    assert_eq!(state.total_rounds, 10);
    assert_eq!(state.score, 0);
    assert!(state.options.is_empty());
}

#[tokio::test]
async fn start_session_shows_two_options_and_speaks_one_of_them() {
    let app = TestApp::spawn_app().await;

    let (_player, state, speak) = started_player(&app).await;

    assert_eq!(state.phase, "playing");
    assert_eq!(state.round, 1);
    assert_eq!(state.options.len(), 2);
    assert_ne!(state.options[0].id, state.options[1].id);
    assert!(!state.answered);
    assert_eq!(state.correct_option, None);
    assert_eq!(speak.locale, "zh-HK");
    assert!(state.options.iter().any(|option| option.word == speak.text));
}

#[tokio::test]
async fn answering_the_spoken_word_scores_and_moves_to_the_next_round() {
    let app = TestApp::spawn_app().await;
    let (mut player, state, speak) = started_player(&app).await;
    let target = option_with_word(&state, &speak);

    player
        .send_message(WsMessageOut::SubmitAnswer { word_id: target })
        .await;

    let feedback = player.receive_speak().await;
    assert!(feedback.text.starts_with("啱咗！"));
    assert!(feedback.id > speak.id);

    let answered = player.receive_session_state().await;
    assert!(answered.answered);
    assert_eq!(answered.score, 1);
    assert_eq!(answered.selected_option, Some(target));
    assert_eq!(answered.correct_option, Some(target));
    assert_eq!(answered.feedback.as_deref(), Some("correct"));

    let next_round = player.receive_session_state().await;
    assert_eq!(next_round.round, 2);
    assert_eq!(next_round.score, 1);
    assert!(!next_round.answered);
    assert_eq!(next_round.feedback, None);

    let next_target = player.receive_speak().await;
    assert!(next_round
        .options
        .iter()
        .any(|option| option.word == next_target.text));
}

#[tokio::test]
async fn a_second_answer_in_the_same_round_is_ignored() {
    let app = TestApp::spawn_app().await;
    let (mut player, state, speak) = started_player(&app).await;
    let target = option_with_word(&state, &speak);

    player
        .send_message(WsMessageOut::SubmitAnswer { word_id: target })
        .await;
    player
        .send_message(WsMessageOut::SubmitAnswer { word_id: target })
        .await;

    let _feedback = player.receive_speak().await;
    let answered = player.receive_session_state().await;
    assert_eq!(answered.score, 1);

    // the next message is the round advance, not a second feedback
    let next_round = player.receive_session_state().await;
    assert_eq!(next_round.round, 2);
    assert_eq!(next_round.score, 1);
}

#[tokio::test]
async fn answer_with_a_word_outside_the_options_is_rejected() {
    let app = TestApp::spawn_app().await;
    let (mut player, state, _speak) = started_player(&app).await;
    let outside = (0..)
        .find(|id| state.options.iter().all(|option| option.id != *id))
        .unwrap();

    player
        .send_message(WsMessageOut::SubmitAnswer { word_id: outside })
        .await;

    assert_eq!(player.receive_error().await, "CHOICE_NOT_IN_OPTIONS");
}

#[tokio::test]
async fn answer_before_start_is_rejected() {
    let app = TestApp::spawn_app().await;
    let mut player = app.connect_player().await;
    let _ = player.receive_session_state().await;

    player
        .send_message(WsMessageOut::SubmitAnswer { word_id: 0 })
        .await;

    assert_eq!(player.receive_error().await, "INVALID_STATE_FOR_ANSWER");
}

#[tokio::test]
async fn replay_before_start_is_rejected() {
    let app = TestApp::spawn_app().await;
    let mut player = app.connect_player().await;
    let _ = player.receive_session_state().await;

    player.send_message(WsMessageOut::ReplayAudio).await;

    assert_eq!(player.receive_error().await, "INVALID_STATE_FOR_REPLAY");
}

#[tokio::test]
async fn replay_speaks_the_target_again() {
    let app = TestApp::spawn_app().await;
    let (mut player, _state, speak) = started_player(&app).await;

    player.send_message(WsMessageOut::ReplayAudio).await;

    let replayed = player.receive_speak().await;
    assert_eq!(replayed.text, speak.text);
    assert!(replayed.id > speak.id);
}

#[tokio::test]
async fn restart_resets_round_and_score() {
    let app = TestApp::spawn_app().await;
    let (mut player, state, speak) = started_player(&app).await;
    let target = option_with_word(&state, &speak);
    player
        .send_message(WsMessageOut::SubmitAnswer { word_id: target })
        .await;
    let _feedback = player.receive_speak().await;
    let _answered = player.receive_session_state().await;

    player.send_message(WsMessageOut::RestartSession).await;

    // the advance to round 2 may still arrive before the restart is processed
    let restarted = loop {
        match player.receive_message().await {
            WsMessageIn::SessionState(state) if state.score == 0 => break state,
            WsMessageIn::SessionState(state) => assert_eq!(state.round, 2),
            WsMessageIn::Speak(_) => {}
            other => panic!("Unexpected message {other:?}"),
        }
    };
    assert_eq!(restarted.phase, "playing");
    assert_eq!(restarted.round, 1);
    assert!(!restarted.answered);
}

#[tokio::test]
async fn silent_connection_is_closed_after_the_inactivity_timeout() {
    let app = TestApp::spawn_app().await;
    let mut player = app.connect_player().await;
    let _ = player.receive_session_state().await;

    sleep(app.inactivity_timeout + Duration::from_millis(500)).await;

    assert_eq!(player.receive_error().await, "WEBSOCKET_CLOSED");
    player.receive_close().await;
}

#[tokio::test]
async fn ping_keeps_the_connection_open_past_the_inactivity_timeout() {
    let app = TestApp::spawn_app().await;
    let mut player = app.connect_player().await;
    let _ = player.receive_session_state().await;

    for _ in 0..3 {
        sleep(app.inactivity_timeout / 2).await;
        player.send_text("ping").await;
        assert_eq!(player.receive_text().await, "pong");
    }

    player.send_message(WsMessageOut::StartSession).await;
    assert_eq!(player.receive_session_state().await.phase, "playing");
}

#[tokio::test]
async fn invalid_message_keeps_the_connection_open() {
    let app = TestApp::spawn_app().await;
    let mut player = app.connect_player().await;
    let _ = player.receive_session_state().await;

    player.send_text("invalid").await;
    assert_eq!(
        player.receive_error().await,
        "UNPROCESSABLE_WEBSOCKET_MESSAGE"
    );

    player.send_message(WsMessageOut::StartSession).await;
    match player.receive_message().await {
        WsMessageIn::SessionState(state) => assert_eq!(state.phase, "playing"),
        other => panic!("Expected a session state, received {other:?}"),
    }
}

#[tokio::test]
async fn ping_is_answered_with_pong() {
    let app = TestApp::spawn_app().await;
    let mut player = app.connect_player().await;
    let _ = player.receive_session_state().await;

    player.send_text("ping").await;

    assert_eq!(player.receive_text().await, "pong");
}
