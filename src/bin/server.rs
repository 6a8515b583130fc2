use std::path::PathBuf;

use clap::Parser;

use kioku::service::StudyService;
use kioku::{server, Config};

#[derive(Parser)]
#[command(name = "kioku-server", about = "Kioku review API server", version)]
struct Args {
    /// Path to a config file (default: ~/.config/kioku/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the port to listen on
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let service = StudyService::new(config.data_dir.clone(), config.review.new_card_order)?;

    let mut handle = server::start_server(
        service,
        &config.server.bind_addr,
        config.server.port,
        config.review.batch_size,
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    log::info!("Press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;
    handle.stop();

    Ok(())
}
