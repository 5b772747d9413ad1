mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use questline_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "questline")]
#[command(about = "Backend server for the Questline TRPG platform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Listen port (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
        /// Listen host (overrides HOST)
        #[arg(short = 'H', long)]
        host: Option<String>,
        /// Keep all data in memory instead of MySQL
        #[arg(long)]
        memory: bool,
    },
    /// Create the MySQL tables if they do not exist
    InitDb,
    /// Print the resolved configuration with secrets hidden
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("warning: failed to load .env: {e}");
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command {
        Commands::Serve { port, host, memory } => {
            commands::serve::run(config, port, host, memory).await?;
        },
        Commands::InitDb => commands::init_db::run(&config).await?,
        Commands::CheckConfig => commands::check_config::run(&config),
    }

    Ok(())
}
