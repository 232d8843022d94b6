//! Reusable user service runtime.
//!
//! [`ServerHandle`] owns the server lifecycle: store selection, database
//! init and migrations, the REST API task and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};
use crate::interfaces::http::create_api_router;
use crate::shared::shutdown_signal;

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the user service.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running user service.
pub struct ServerHandle {
    /// Repository provider the handlers use.
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the REST API is bound to.
    pub local_addr: SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: Arc<Notify>,
    api_task: JoinHandle<()>,
}

impl ServerHandle {
    /// Start the user service with the given options.
    ///
    /// `database.url = "memory://"` selects the in-memory store; any other
    /// URL is opened through SeaORM and migrated unless `auto_migrate` is off.
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting user service...");

        // ── Store ──────────────────────────────────────────────
        let (repos, db): (Arc<dyn RepositoryProvider>, Option<DatabaseConnection>) =
            if app_cfg.database.is_memory() {
                warn!("Using in-memory user store; data is lost on shutdown");
                (Arc::new(InMemoryRepositoryProvider::new()), None)
            } else {
                let db_config = DatabaseConfig {
                    url: app_cfg.database.connection_url(),
                    pool: app_cfg.database.pool.clone(),
                };
                let db = init_database(&db_config).await?;

                if opts.auto_migrate {
                    info!("Running database migrations...");
                    Migrator::up(&db, None).await?;
                    info!("Migrations completed");
                }

                (Arc::new(SeaOrmRepositoryProvider::new(db.clone())), Some(db))
            };

        let jwt_config = app_cfg.jwt_config();
        info!(
            "JWT configured with {}h token expiration",
            jwt_config.expiration_hours
        );

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(
            Arc::clone(&repos),
            jwt_config,
            app_cfg.api.status_policy,
        );

        let api_addr = app_cfg.api_address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);
        info!(policy = ?app_cfg.api.status_policy, "Status policy");

        let shutdown = Arc::new(Notify::new());
        let api_shutdown = Arc::clone(&shutdown);
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.notified().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Check if the server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }

    /// Serve until SIGINT/SIGTERM (or the server stops on its own), then shut down.
    pub async fn run_until_signal(mut self) {
        tokio::select! {
            _ = shutdown_signal() => {}
            result = &mut self.api_task => {
                if let Err(e) = result {
                    error!("REST API server task panicked: {}", e);
                }
            }
        }
        self.shutdown().await;
    }

    /// Trigger shutdown and wait up to `server.shutdown_timeout` seconds for
    /// in-flight requests, then close the database pool.
    pub async fn shutdown(mut self) {
        info!("Shutting down user service...");
        self.trigger_shutdown();

        if !self.api_task.is_finished() {
            let timeout = Duration::from_secs(self.config.server.shutdown_timeout);
            match tokio::time::timeout(timeout, &mut self.api_task).await {
                Ok(Ok(())) => info!("REST API server stopped"),
                Ok(Err(e)) => error!("REST API server task panicked: {}", e),
                Err(_) => {
                    warn!("Requests still in flight after {:?}; aborting", timeout);
                    self.api_task.abort();
                }
            }
        }

        if let Some(db) = self.db.take() {
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("Database connection closed");
            }
        }

        info!("User service shutdown complete");
    }
}

/// Install the global tracing subscriber in the configured format.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
