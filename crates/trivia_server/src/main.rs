//! Trivia API server entry point.
//!
//! Configuration comes from `TRIVIA_*` environment variables; see
//! `trivia_server::config`.

use trivia_server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    trivia_server::serve(config).await
}
