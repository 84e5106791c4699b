use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use dotenv::dotenv;
use stchatbot::run_with_config_path;

/// stchatbot - web chat front-end relaying messages to an OpenAI-compatible API
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a YAML config file (defaults to ./config.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides server.bind_addr
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from `.env` file into std::env (optional)
    dotenv().ok();

    let args = Args::parse();

    run_with_config_path(args.config.as_deref(), args.bind).await
}
