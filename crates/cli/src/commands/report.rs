//! Report commands.
//!
//! Runs the analytics reporter directly against the database and prints the
//! same JSON the HTTP endpoints return. There is no access guard here: the
//! operator already holds the database credentials.
//!
//! # Usage
//!
//! ```bash
//! tally report summary --range today
//! tally report chart --range all
//! tally report orders --range 7days --page 2 --limit 25 --status Delivered
//! ```

use std::sync::Arc;

use tally_admin::config::AdminConfig;
use tally_admin::db::{self, PgOrderStore};
use tally_admin::services::{AnalyticsParams, AnalyticsQuery, AnalyticsReporter};

use super::CliError;

/// Which report to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Summary,
    Chart,
    Orders,
}

/// Build the reporter and render one report as pretty JSON.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is unreachable,
/// or a report query fails.
pub async fn run(kind: ReportKind, query: AnalyticsQuery) -> Result<String, CliError> {
    let config = AdminConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    let reporter =
        AnalyticsReporter::new(Arc::new(PgOrderStore::new(pool)), config.reporting_offset);

    let params = AnalyticsParams::from(query);
    tracing::debug!(?kind, ?params, "running report");

    let json = match kind {
        ReportKind::Summary => {
            serde_json::to_string_pretty(&reporter.summary(params.date_range).await?)?
        }
        ReportKind::Chart => {
            serde_json::to_string_pretty(&reporter.orders_chart(params.date_range).await?)?
        }
        ReportKind::Orders => serde_json::to_string_pretty(&reporter.orders_list(&params).await?)?,
    };

    Ok(json)
}
