use std::sync::Arc;

use axum::Router;
use clientele_core::config::{AppConfig, ConfigError, LoadOptions};
use clientele_core::CustomerService;
use clientele_db::{connect_with_settings, migrations, DbPool, SqlCustomerRepository};
use thiserror::Error;
use tracing::info;

use crate::{customers, health};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub customers: Arc<CustomerService<SqlCustomerRepository>>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Connects and migrates using an already loaded config, so logging can be set up first.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let customers = Arc::new(CustomerService::new(SqlCustomerRepository::new(db_pool.clone())));

    Ok(Application { config, db_pool, customers })
}

impl Application {
    pub fn router(&self) -> Router {
        customers::router(Arc::clone(&self.customers)).merge(health::router(self.db_pool.clone()))
    }
}
