//! Aurora Storefront Server
//!
//! REST backend of the Aurora jewelry store: catalog, accounts, hosted
//! checkout, orders and the admin dashboard.

mod api;
mod config;
mod server;
mod shutdown;
mod state;
#[cfg(test)]
mod test_support;

use aurora_core::entities::users::UpsertAdminUser;
use clap::Parser;
use config::{ConfigLoader, SecretOverrides, get_database_url};
use kanau::processor::Processor;
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Aurora - jewelry storefront backend
#[derive(Parser, Debug)]
#[command(name = "aurora-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./aurora-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:5000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,

    /// Emit logs as JSON lines
    #[arg(long, default_value = "false")]
    log_json: bool,

    /// Stripe secret key (overrides the config file)
    #[arg(long, env = "STRIPE_SECRET_KEY", hide_env_values = true)]
    stripe_secret_key: Option<String>,

    /// Session signing secret (overrides the config file)
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    session_secret: Option<String>,

    #[arg(long, env = "CLOUDINARY_CLOUD_NAME")]
    cloudinary_cloud_name: Option<String>,

    #[arg(long, env = "CLOUDINARY_API_KEY", hide_env_values = true)]
    cloudinary_api_key: Option<String>,

    #[arg(long, env = "CLOUDINARY_API_SECRET", hide_env_values = true)]
    cloudinary_api_secret: Option<String>,
}

impl Args {
    fn secrets(&self) -> SecretOverrides {
        SecretOverrides {
            stripe_secret_key: self.stripe_secret_key.clone(),
            session_secret: self.session_secret.clone(),
            cloudinary_cloud_name: self.cloudinary_cloud_name.clone(),
            cloudinary_api_key: self.cloudinary_api_key.clone(),
            cloudinary_api_secret: self.cloudinary_api_secret.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting aurora-server");

    let config_loader = Arc::new(ConfigLoader::new(
        &args.config,
        args.listen,
        args.secrets(),
    ));
    let loaded_config = config_loader.load().inspect_err(|e| {
        tracing::error!(error = %e, path = ?args.config, "Cannot load configuration");
    })?;
    let listen_addr = loaded_config.server.listen;
    let admin_account = loaded_config.admin.clone();

    let database_url = get_database_url().inspect_err(|_| {
        tracing::error!("DATABASE_URL is not set");
    })?;
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Cannot connect to the database"))?;
    tracing::info!("Database pool ready");

    if args.migrate {
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Migration failed"))?;
        tracing::info!("Database schema up to date");
    }

    let state = AppState::new(db_pool.clone(), loaded_config);

    // The configured admin always exists with the configured password
    if let Some(admin) = admin_account {
        let user = state
            .db
            .process(UpsertAdminUser {
                email: admin.email,
                password_hash: admin.password_hash,
            })
            .await?;
        tracing::info!(user_id = user.id, "Admin account ready");
    }

    let reload_stop = spawn_config_reload_handler(state.clone(), config_loader);
    let router = build_router(state).await;

    tracing::info!(%listen_addr, "Serving HTTP");
    let result = run_server(router, listen_addr).await;

    reload_stop.notify_one();
    db_pool.close().await;
    tracing::info!("Shutdown complete");

    result.map_err(Into::into)
}

/// Registry with an `EnvFilter` (default `info,sqlx=warn,tower_http=debug`)
/// and a text or JSON formatter.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
