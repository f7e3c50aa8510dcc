//! PairHub Server: anonymous 1:1 text and video chat matchmaker
//!
//! Main entry point that wires all crates together and starts the server.

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use pairhub_auth::PasswordHasher;
use pairhub_core::config::AppConfig;
use pairhub_core::error::AppError;

/// PairHub matchmaking and signaling server
#[derive(Parser, Debug)]
#[command(name = "pairhub-server", version, about)]
struct Cli {
    /// Directory holding `default.toml` and per-environment overlays
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Environment overlay to load (falls back to `PAIRHUB_ENV`, then `development`)
    #[arg(long)]
    env: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP/WebSocket server (default)
    Serve,
    /// Print an Argon2 PHC hash for `admin.password_hash`
    HashPassword {
        /// Operator password to hash
        password: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::HashPassword { ref password }) => hash_password(password),
        Some(Command::Serve) | None => serve(&cli).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn hash_password(password: &str) -> Result<(), AppError> {
    let hash = PasswordHasher::new().hash_password(password)?;
    println!("{hash}");
    Ok(())
}

async fn serve(cli: &Cli) -> Result<(), AppError> {
    let env = cli
        .env
        .clone()
        .or_else(|| std::env::var("PAIRHUB_ENV").ok())
        .unwrap_or_else(|| "development".to_string());

    let config = AppConfig::load(&cli.config_dir, &env)?;

    init_logging(&config);
    tracing::info!(
        "Starting PairHub v{} (config: {}, env: {})",
        env!("CARGO_PKG_VERSION"),
        cli.config_dir,
        env
    );

    pairhub_api::run_server(config).await
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
