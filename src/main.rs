//! Creator Analytics report runner
//!
//! Batch pass over stored program facts:
//! - Loads snapshots, ledger transactions and submissions concurrently
//! - Scopes them to the configured campaigns and boosts
//! - Builds the dashboard report for one timeframe and writes it as JSON,
//!   or only the creator ROI table as CSV

mod config;
mod export;
mod input;

use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info, warn};

use aggregation::{build_dashboard, DashboardInput, DashboardReport};
use analytics_core::{ContentItem, MetricSnapshot, Transaction};
use telemetry::{init_tracing_from_env, metrics, RunRecord};

use crate::config::{load_config, AppConfig, OutputFormat};
use crate::export::roi_csv;
use crate::input::load_optional;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting creator-analytics v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    config.check().context("Invalid configuration")?;
    info!(
        timeframe = config.timeframe.as_str(),
        campaigns = config.programs.campaign_ids.len(),
        boosts = config.programs.boost_ids.len(),
        rpm_rate = config.rpm_rate,
        "Loaded config"
    );

    let report = match run(&config).await {
        Ok(report) => report,
        Err(e) => {
            metrics().record_failure();
            error!("Report failed: {:#}", e);
            metrics().log_summary();
            return Err(e);
        }
    };

    write_report(&config, &report).await?;

    info!(
        total_views = report.stats.total_views,
        total_payouts = report.stats.total_payouts,
        creators = report.creators.len(),
        series_days = report.series.len(),
        "Report written"
    );
    metrics().log_summary();
    Ok(())
}

/// Loads every input and builds the report.
async fn run(config: &AppConfig) -> Result<DashboardReport> {
    let started = Instant::now();

    let (snapshots, transactions, content) = tokio::try_join!(
        load_optional::<MetricSnapshot>(config.inputs.snapshots.as_deref(), "snapshot"),
        load_optional::<Transaction>(config.inputs.transactions.as_deref(), "transaction"),
        load_optional::<ContentItem>(config.inputs.content.as_deref(), "content"),
    )
    .context("Failed to load inputs")?;

    let rejected = snapshots.rejected + transactions.rejected + content.rejected;
    if rejected > 0 {
        warn!(rejected, "Some input records were skipped");
    }
    info!(
        snapshots = snapshots.records.len(),
        transactions = transactions.records.len(),
        content = content.records.len(),
        "Inputs loaded"
    );

    let now = config.as_of.unwrap_or_else(Utc::now);
    let input = DashboardInput {
        programs: &config.programs,
        snapshots: &snapshots.records,
        transactions: &transactions.records,
        content: &content.records,
        rpm_rate: config.rpm_rate,
    };
    let report = build_dashboard(&input, config.timeframe, now).context("Failed to build dashboard")?;

    let diag = &report.diagnostics;
    let in_scope = diag.snapshots_received - diag.snapshots_out_of_scope;
    metrics().record_run(RunRecord {
        timeframe: config.timeframe.as_str().to_string(),
        snapshots_received: diag.snapshots_received as u64,
        snapshots_superseded: in_scope.saturating_sub(diag.snapshots_kept) as u64,
        snapshots_out_of_scope: diag.snapshots_out_of_scope as u64,
        transactions_matched: diag.transactions_matched as u64,
        transactions_skipped: diag.transactions_skipped as u64,
        records_rejected: rejected as u64,
        clamped_days: diag.clamped_days as u64,
        used_fallback: diag.used_fallback,
        elapsed_ms: started.elapsed().as_millis() as u64,
    });
    if diag.used_fallback {
        info!("No snapshot history, series built from current submission totals");
    }

    Ok(report)
}

/// Serializes the report in the configured format to the configured file,
/// or stdout.
async fn write_report(config: &AppConfig, report: &DashboardReport) -> Result<()> {
    let body = match config.format {
        OutputFormat::Json => {
            let mut body = if config.pretty {
                serde_json::to_vec_pretty(report)
            } else {
                serde_json::to_vec(report)
            }
            .context("Failed to serialize report")?;
            body.push(b'\n');
            body
        }
        OutputFormat::RoiCsv => roi_csv(&report.creators)?,
    };

    match &config.output {
        Some(path) => tokio::fs::write(path, &body)
            .await
            .with_context(|| format!("Failed to write report to {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&body).context("Failed to write report")?;
            stdout.flush().context("Failed to flush stdout")
        }
    }
}
