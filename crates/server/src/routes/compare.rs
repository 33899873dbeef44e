use crate::error::{ServerError, ServerResult};
use crate::routes::form::Form;
use crate::state::ServerState;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use simcheck::{Comparison, EngineError};
use std::sync::Arc;

/// Similarity of two uploaded files.
///
/// Multipart fields `file1` and `file2`. Decoding and scoring run on the
/// blocking pool since PDF and DOCX extraction is CPU-bound.
///
/// ```json
/// { "similarity": 0.83, "file1_name": "a.txt", "file2_name": "b.pdf" }
/// ```
pub async fn compare_files(
    State(state): State<Arc<ServerState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Json<Comparison>> {
    let mut form = Form::read(multipart?).await?;
    let (Some(file1), Some(file2)) = (form.files.remove("file1"), form.files.remove("file2"))
    else {
        return Err(EngineError::Validation("Two files are required".into()).into());
    };

    let engine = state.engine.clone();
    let comparison = tokio::task::spawn_blocking(move || engine.compare(&file1, &file2))
        .await
        .map_err(ServerError::from)??;

    Ok(Json(comparison))
}
