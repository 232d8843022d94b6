//! User service - CLI server
//!
//! ```sh
//! # Run with default config (~/.config/user-service/config.toml)
//! user-service
//!
//! # Custom config path and port
//! user-service --config /etc/user-service/config.toml --api-port 8080
//!
//! # Validate config without starting
//! user-service --check
//!
//! # Mint an admin token for local testing
//! user-service issue-token --subject 7f9c0e6e-0000-4000-8000-000000000001 --admin
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use user_service::auth::create_token;
use user_service::config::AppConfig;
use user_service::server::{init_tracing, ServerHandle, ServerOptions};

/// User management REST service.
#[derive(Parser, Debug)]
#[command(
    name = "user-service",
    version,
    about = "REST API for listing, fetching and deleting users",
    long_about = "User service - REST API with JWT-protected admin deletion.\n\n\
                  Default config: ~/.config/user-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "USER_SERVICE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a signed JWT for the given subject using the configured secret.
    IssueToken {
        /// Subject (user id) written into the `sub` claim.
        #[arg(long)]
        subject: String,

        /// Set the `is_admin` claim to true.
        #[arg(long)]
        admin: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(user_service::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            eprintln!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    if let Some(Command::IssueToken { subject, admin }) = cli.command {
        let token = create_token(&subject, admin, &config.jwt_config())?;
        println!("{}", token);
        return Ok(());
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file   : {}", config_path.display());
        println!("   API address   : {}", config.api_address());
        println!("   Database      : {}", config.database.connection_url());
        println!("   Status policy : {:?}", config.api.status_policy);
        println!("   Log level     : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    // ── Start server ───────────────────────────────────────────
    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start user service: {}", e);
            return Err(e);
        }
    };

    info!("Press Ctrl+C to shutdown gracefully.");
    handle.run_until_signal().await;

    Ok(())
}
