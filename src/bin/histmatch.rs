//! histmatch server binary: near-duplicate image detection over HTTP.

use histmatch::server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    histmatch::server::start_server(config).await
}
