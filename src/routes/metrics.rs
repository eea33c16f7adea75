use axum::response::{IntoResponse, Response};
use hyper::StatusCode;
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, TextEncoder};

use crate::metrics::REGISTRY;

pub async fn metrics_handler() -> Response {
    let mut response = encode("quiz", &REGISTRY.gather());
    response.push_str(&encode("process", &prometheus::gather()));

    (StatusCode::OK, response).into_response()
}

fn encode(name: &str, metric_families: &[MetricFamily]) -> String {
    let mut buffer = Vec::new();
    if let Err(error) = TextEncoder::new().encode(metric_families, &mut buffer) {
        log::error!("Could not encode {name} metrics. Error: '{error}'.");
    };
    String::from_utf8(buffer).unwrap_or_else(|error| {
        log::error!("The {name} metrics are not valid UTF-8. Error: '{error}'.");
        String::default()
    })
}
