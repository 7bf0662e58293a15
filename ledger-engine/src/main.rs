use ledger_core::observability::init_tracing;
use ledger_engine::config::LedgerConfig;
use ledger_engine::services::ingest::read_transactions;
use ledger_engine::services::provisioner::AccountProvisioner;
use ledger_engine::startup::Application;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = LedgerConfig::load().expect("Failed to load configuration");

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    let app = Application::build(config.clone()).await?;
    let db = app.database().clone();

    let business = db.ensure_default_business("Demo Business").await?;
    info!(business_id = %business.business_id, "Default business ready");

    AccountProvisioner::new(db.clone())
        .ensure_default_accounts(business.business_id)
        .await?;

    if let Some(path) = &config.import.csv_path {
        let file = std::fs::File::open(path)?;
        let (batch, row_errors) = read_transactions(file);
        for err in &row_errors {
            warn!(line = err.line, reason = %err.reason, "Rejected CSV row");
        }

        let report = app
            .importer()
            .import(business.business_id, batch)
            .await?
            .with_row_errors(row_errors);
        info!(report = %serde_json::to_string(&report)?, "Import finished");

        let summary = db.financial_summary(business.business_id).await?;
        info!(
            revenue = %summary.revenue,
            expenses = %summary.expenses,
            profit = %summary.profit,
            receivables = %summary.receivables,
            "Financial summary"
        );
    } else {
        info!("No import.csv_path configured, nothing to do");
    }

    Ok(())
}
