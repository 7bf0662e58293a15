//! Application startup: metrics, database pool and migrations.

use crate::config::LedgerConfig;
use crate::services::database::Database;
use crate::services::importer::TransactionImporter;
use crate::services::metrics::init_metrics;
use ledger_core::error::AppError;
use tracing::info;

/// Built application: a migrated database and the configuration it was
/// built from.
pub struct Application {
    config: LedgerConfig,
    db: Database,
}

impl Application {
    pub async fn build(config: LedgerConfig) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;

        db.run_migrations().await?;

        info!(service = %config.service_name, "Application built");

        Ok(Self { config, db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Importer wired with this application's store and import policy.
    pub fn importer(&self) -> TransactionImporter {
        TransactionImporter::new(
            self.db.clone(),
            self.config.import.lookback_months,
            self.config.import.created_by.clone(),
        )
    }
}
