use crate::error::ServerResult;
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KeywordsResponse {
    pub seo_keywords: Vec<String>,
}

/// Ranked keywords of a JSON `{ "text": ... }` body.
///
/// Malformed JSON is answered with `BAD_REQUEST`; a missing or empty `text`
/// with `VALIDATION_ERROR`.
pub async fn extract_seo_keywords(
    State(state): State<Arc<ServerState>>,
    body: Result<Bytes, BytesRejection>,
) -> ServerResult<Json<KeywordsResponse>> {
    let request: KeywordsRequest = serde_json::from_slice(&body?)?;
    let ranked = state.engine.extract_keywords(request.text.as_deref())?;

    tracing::info!(keywords = ranked.len(), "keywords extracted");

    Ok(Json(KeywordsResponse {
        seo_keywords: ranked.into_iter().map(|k| k.term).collect(),
    }))
}
