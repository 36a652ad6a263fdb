//! `wipd`: the shop WIP tracker server.
//!
//! Usage:
//!   wipd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/wip/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use clap::Parser;
use tracing::info;
use wip::WipModule;
use wip_core::Module;

use config::ServerConfig;

/// WIP tracker server.
#[derive(Parser, Debug)]
#[command(name = "wipd", about = "Shop WIP tracker server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:3001")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    let core_config = server_config.service_config(&cli.listen);
    let svc = bootstrap::open_service(&core_config, &server_config.shift)?;

    // Sweep yesterday's notes if the server starts after the archive hour.
    bootstrap::startup_archive(&svc);

    let module = WipModule::new(svc);
    info!("{} module initialized", module.name());
    let app = routes::build_router(vec![(module.name(), module.routes())]);

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("wipd listening on {}", core_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
