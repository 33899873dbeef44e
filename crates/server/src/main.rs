//! simcheck server - HTTP API for document comparison, plagiarism checks and
//! keyword extraction.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}
