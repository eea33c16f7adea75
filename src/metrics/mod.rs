use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::{IntCounterVec, IntGauge, Opts, Registry};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref ACTIVE_SESSIONS: IntGauge =
        IntGauge::new("jyutquiz_active_sessions", "Active quiz sessions").expect("metric cannot be created");
    pub static ref CONNECTED_PLAYERS: IntGauge =
        IntGauge::new("jyutquiz_connected_players", "Amount of players connected")
            .expect("metric cannot be created");
    pub static ref ANSWERS: IntCounterVec = IntCounterVec::new(
        Opts::new("jyutquiz_answers_total", "Answers submitted, by result"),
        &["result"]
    )
    .expect("metric cannot be created");
}

static REGISTER: Once = Once::new();

/// Safe to call more than once, collectors are only registered the first time.
pub fn register_metrics() {
    REGISTER.call_once(register_collectors);
}

fn register_collectors() {
    REGISTRY
        .register(Box::new(ACTIVE_SESSIONS.clone()))
        .expect("collector cannot be registered");

    REGISTRY
        .register(Box::new(CONNECTED_PLAYERS.clone()))
        .expect("collector cannot be registered");

    REGISTRY
        .register(Box::new(ANSWERS.clone()))
        .expect("collector cannot be registered");
}
