mod config;
mod logging;
mod server;
mod signals;

use std::path::PathBuf;

use anyhow::{Result, bail};
use calendar::api::rest::auth::JwtKeys;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::config::{AppConfig, CliOverrides};

/// Calendar Server - timezone-aware event storage over REST
#[derive(Parser)]
#[command(name = "calendar-server")]
#[command(about = "Calendar Server - timezone-aware event storage over REST")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep events in memory regardless of the configured backend
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
    /// Print effective configuration with secrets redacted
    PrintConfig,
    /// Sign an access token for a user
    IssueToken {
        /// User id placed in the token subject
        #[arg(long)]
        user: Uuid,
        /// Token lifetime, e.g. `12h` (defaults to calendar.auth.token_ttl)
        #[arg(long)]
        ttl: Option<humantime::Duration>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref().filter(|p| !p.is_file()) {
        bail!("config file does not exist: {}", path.display());
    }

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(CliOverrides {
        port: cli.port,
        verbose: cli.verbose,
        mock: cli.mock,
    })?;

    logging::init(&config.logging);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Calendar server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => server::run(&config).await,
        Commands::Check => check_config(&config),
        Commands::PrintConfig => {
            println!("{}", config.redacted().to_pretty_string()?);
            Ok(())
        }
        Commands::IssueToken { user, ttl } => issue_token(&config, user, ttl),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.validate()?;
    println!("Configuration is valid");
    println!("{}", config.redacted().to_pretty_string()?);
    Ok(())
}

fn issue_token(config: &AppConfig, user: Uuid, ttl: Option<humantime::Duration>) -> Result<()> {
    if !config.calendar.users.iter().any(|u| u.id == user) {
        tracing::warn!(user_id = %user, "User is not in calendar.users; the token is only accepted if the store knows it");
    }

    let ttl = ttl.map_or(config.calendar.auth.token_ttl, Into::into);
    let token = JwtKeys::from_secret(&config.calendar.auth.jwt_secret).issue(user, ttl)?;
    tracing::info!(user_id = %user, ttl = %humantime::format_duration(ttl), "Issued token");

    println!("{token}");
    Ok(())
}
