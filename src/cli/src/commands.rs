use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "relay",
    about = "Forward normalized analytics event batches to the vendor ingestion endpoint"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read a batch request (JSON) and deliver every event in it
    Forward(ForwardArgs),
}

#[derive(Args)]
pub struct ForwardArgs {
    /// Path to the batch request document; `-` reads stdin
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Override the destination hostname from the request
    #[arg(long)]
    pub hostname: Option<String>,

    /// Override the destination token from the request
    #[arg(long)]
    pub token: Option<String>,
}
