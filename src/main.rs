use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gold_ledger::cli::{self, Cli, Commands, RecordsCommands};
use gold_ledger::config::Config;
use gold_ledger::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Records(RecordsCommands::List { sort, desc }) => {
            cli::handle_records_list(&config, sort, desc).await
        }
        Commands::Records(RecordsCommands::Summary) => cli::handle_records_summary(&config).await,
        Commands::Records(RecordsCommands::Chart { out }) => {
            cli::handle_records_chart(&config, &out).await
        }
        Commands::Records(RecordsCommands::Clear { yes }) => {
            cli::handle_records_clear(&config, yes).await
        }
        Commands::Config => cli::handle_config_validate(&config),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let app_state = AppState::from_config(&config);
    tracing::info!(
        record_store = %config.record_store_path.display(),
        "Record store configured"
    );

    let app = create_app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
