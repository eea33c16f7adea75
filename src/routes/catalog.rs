use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::startup::AppState;

#[derive(Serialize)]
pub struct CatalogEntryResponse {
    id: usize,
    word: String,
    pronunciation: String,
}

pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<CatalogEntryResponse>> {
    Json(
        state
            .catalog
            .entries()
            .map(|(id, entry)| CatalogEntryResponse {
                id: id.index(),
                word: entry.word.clone(),
                pronunciation: entry.pronunciation.clone(),
            })
            .collect(),
    )
}
