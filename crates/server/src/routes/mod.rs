//! API route handlers
//!
//! - `health`: liveness
//! - `compare`: whole-document similarity of two uploads
//! - `plagiarism`: sentence-level check of pasted text or an upload
//! - `keywords`: keyword extraction

pub mod compare;
mod form;
pub mod health;
pub mod keywords;
pub mod plagiarism;

use crate::error::ServerError;

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
