use anyhow::Context;
use relay_cli::logging::setup_logging;
use relay_cli::process_command::process_cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging()?;
    process_cli().await.context("Can't process CLI command")?;
    Ok(())
}
