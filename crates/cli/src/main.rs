//! Tally CLI - Database migrations and report tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! tally migrate
//!
//! # Print a report as JSON
//! tally report summary --range today
//! tally report chart
//! tally report orders --page 2 --limit 25 --status Placed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `report` - Print the summary, chart or order listing

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};

use tally_admin::services::AnalyticsQuery;

mod commands;

use commands::report::ReportKind;

#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about = "Tally CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Print an analytics report as JSON
    Report {
        #[command(subcommand)]
        report: ReportCommand,
    },
}

#[derive(Subcommand)]
enum ReportCommand {
    /// Order totals and status breakdown
    Summary(RangeArgs),
    /// Per-day orders and revenue
    Chart(RangeArgs),
    /// Paginated order listing
    Orders(ListArgs),
}

#[derive(Args)]
struct RangeArgs {
    /// Date range: `today`, `7days`, anything else for all time
    #[arg(short, long, default_value = "7days")]
    range: String,
}

#[derive(Args)]
struct ListArgs {
    #[command(flatten)]
    range: RangeArgs,

    /// 1-based page number
    #[arg(short, long)]
    page: Option<String>,

    /// Page size
    #[arg(short, long)]
    limit: Option<String>,

    /// Exact status filter, or `all`
    #[arg(short, long)]
    status: Option<String>,
}

impl ReportCommand {
    fn into_parts(self) -> (ReportKind, AnalyticsQuery) {
        match self {
            Self::Summary(args) => (ReportKind::Summary, range_query(args)),
            Self::Chart(args) => (ReportKind::Chart, range_query(args)),
            Self::Orders(args) => (
                ReportKind::Orders,
                AnalyticsQuery {
                    date_range: Some(args.range.range),
                    status: args.status,
                    page: args.page,
                    limit: args.limit,
                },
            ),
        }
    }
}

fn range_query(args: RangeArgs) -> AnalyticsQuery {
    AnalyticsQuery {
        date_range: Some(args.range),
        ..AnalyticsQuery::default()
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so report JSON on stdout stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=info,tally_admin=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Report { report } => {
            let (kind, query) = report.into_parts();
            let json = commands::report::run(kind, query).await?;

            #[allow(clippy::print_stdout)]
            {
                println!("{json}");
            }
        }
    }
    Ok(())
}
