use std::net::IpAddr;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use growth_actions_api::config::AppConfig;
use growth_actions_api::AppState;

#[derive(Parser)]
#[command(name = "growth-actions-api")]
#[command(about = "Projects, KPI targets and experiments API for GPT actions")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Listen port (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Listen address (overrides HOST)")]
    host: Option<IpAddr>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env if present so local runs pick up SUPABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) if e.is_store_config() => {
            anyhow::bail!("Missing SUPABASE_URL or SUPABASE_SERVICE_KEY")
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }

    if config.auth.bearer_token.is_none() {
        warn!("ALLOWED_GPT_BEARER is not set; every /api request will be rejected");
    }

    let state = AppState::from_config(&config)?;
    info!("Using store at {}", config.store.url);

    growth_actions_api::serve(state, &config.server).await
}
