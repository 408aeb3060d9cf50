use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use relay_client::config_manager::ConfigLoader;
use relay_client::outcome::BatchRequest;
use relay_client::Forwarder;
use relay_common::constants::{SETTING_HOSTNAME, SETTING_TOKEN};

use crate::commands::{Cli, Commands, ForwardArgs};

pub async fn process_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Forward(args) => forward(args).await,
    }
}

async fn forward(args: ForwardArgs) -> Result<()> {
    let raw = read_input(&args.input)?;
    let mut request: BatchRequest =
        serde_json::from_str(&raw).context("failed to parse batch request")?;

    if let Some(hostname) = args.hostname {
        request.account.insert(SETTING_HOSTNAME, hostname);
    }
    if let Some(token) = args.token {
        request.account.insert(SETTING_TOKEN, token);
    }

    let config = ConfigLoader::load_default_config()?;
    let forwarder = Forwarder::new(config);

    let total = request.events.len();
    let response = forwarder
        .process_batch(request.events, &request.account)
        .await?;

    info!("delivered {} of {} events", response.delivered(), total);
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_fully_delivered() {
        bail!(
            "{} of {} events failed delivery",
            response.failed(),
            response.len()
        );
    }
    Ok(())
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read batch request from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read batch request from {path}"))
    }
}
