//! Entry point for the liquid-cli binary

use liquid_cli::run_cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run_cli().await
}
