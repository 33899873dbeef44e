use crate::error::ServerResult;
use crate::routes::form::Form;
use crate::state::ServerState;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use simcheck::{collapse_whitespace, PlagiarismInput, PlagiarismReport};
use std::sync::Arc;
use tokio::time::Instant;

/// One plagiarised sentence and where it was found.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentenceMatch {
    pub sentence: String,
    pub url: String,
    pub similarity: f64,
}

/// Wire form of a [`PlagiarismReport`].
///
/// `results` lists matched sentences only and is left out whenever a
/// `message` explains why there is nothing to show.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlagiarismResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SentenceMatch>>,
    pub overall_similarity: f64,
    pub total_sentences: usize,
    pub matched_sentences: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<PlagiarismReport> for PlagiarismResponse {
    fn from(report: PlagiarismReport) -> Self {
        let results = report.message.is_none().then(|| {
            report
                .matches()
                .filter_map(|r| {
                    r.candidate.as_ref().map(|c| SentenceMatch {
                        sentence: collapse_whitespace(&r.sentence.text),
                        url: c.source.clone(),
                        similarity: r.similarity(),
                    })
                })
                .collect()
        });
        Self {
            results,
            overall_similarity: report.aggregate_similarity,
            total_sentences: report.total_sentences,
            matched_sentences: report.matched_sentences,
            message: report.message,
        }
    }
}

/// Sentence-level plagiarism check.
///
/// Multipart field `text` or `file`, not both. Retrieval gets the
/// configured request deadline; sentences it cannot finish count as
/// unmatched.
pub async fn check_plagiarism(
    State(state): State<Arc<ServerState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Json<PlagiarismResponse>> {
    let mut form = Form::read(multipart?).await?;
    let input = PlagiarismInput {
        text: form.texts.remove("text"),
        file: form.files.remove("file"),
    };

    let deadline = Instant::now() + state.config.request_deadline();
    let report = state.engine.detect_plagiarism(input, deadline).await?;

    tracing::info!(
        overall_similarity = report.aggregate_similarity,
        total_sentences = report.total_sentences,
        matched_sentences = report.matched_sentences,
        truncated = report.truncated,
        "plagiarism check completed"
    );

    Ok(Json(report.into()))
}
