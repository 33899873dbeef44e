//! simcheck server - HTTP API over the [`simcheck::Engine`].
//!
//! The crate only decodes requests and encodes responses; every decision
//! about text lives in the engine.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `POST /compare_files` - multipart `file1`, `file2`
//! - `POST /check_plagiarism` - multipart `text` or `file`
//! - `POST /extract_seo_keywords` - JSON `{ "text": ... }`
//! - `GET /health` - liveness probe
//!
//! Failures share one JSON envelope, `{ "error", "code", "details"? }`,
//! built by [`ServerError`].

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
