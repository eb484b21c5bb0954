use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sleepos::cli::{AdminCommands, run_admin_init, run_set_password};
use sleepos::config::Config;
use sleepos::server::{AppState, create_router};

#[derive(Parser)]
#[command(name = "sleepos")]
#[command(about = "Back-office API for the SleepOS ROM website", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sleepos=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init {
                email,
                password,
                config,
                non_interactive,
            } => {
                run_admin_init(email, password, config.as_deref(), non_interactive).await?;
            }
            AdminCommands::SetPassword { password, config } => {
                run_set_password(password, config.as_deref()).await?;
            }
        },
        Commands::Serve { host, port, config } => {
            let mut config = Config::load(config.as_deref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let state = Arc::new(AppState::new(
                config.store.clone(),
                config.server.session_ttl(),
            ));

            // Connect eagerly so a misconfigured store is reported at startup.
            if state.gateway().is_none() {
                tracing::warn!("Store not configured. Set STORE_URL and STORE_KEY");
            }

            let app = create_router(state);
            let addr = config.server.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
