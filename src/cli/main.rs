use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use service_records::{
    analytics::AggregationEngine,
    config::Config,
    dates,
    downtime::DowntimeCalculator,
    filter::{FilterEngine, FilterPredicates},
    lifecycle::StatusLifecycle,
    models::{load_records, RecordKind, ServiceRecord, Status},
    session::Session,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "service-records")]
#[command(about = "Filter, summarise and transition service records", long_about = None)]
struct Cli {
    /// Configuration file (defaults to $SERVICE_RECORDS_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print statistics for the filtered records of one kind
    Summary {
        #[arg(short, long)]
        records: PathBuf,

        #[arg(short, long, default_value = "contract")]
        kind: RecordKind,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Print the records that pass the filters
    Filter {
        #[arg(short, long)]
        records: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Move one record to a new status
    Transition {
        #[arg(short, long)]
        records: PathBuf,

        #[arg(long)]
        id: String,

        #[arg(short, long)]
        status: Status,

        #[arg(short, long)]
        note: Option<String>,

        /// Transition instant; defaults to now
        #[arg(short, long)]
        date: Option<String>,

        /// Where to write the updated collection; defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the downtime between an opening and a resolution
    Downtime {
        #[arg(short, long)]
        date: String,

        #[arg(short, long, default_value = "")]
        time: String,

        #[arg(short, long)]
        resolved: Option<String>,
    },
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long, default_value = "all")]
    facility: String,

    #[arg(long, default_value = "all")]
    supplier: String,

    #[arg(long, default_value = "all")]
    category: String,

    #[arg(long, default_value = "all")]
    status: String,

    #[arg(long, default_value = "")]
    from: String,

    #[arg(long, default_value = "")]
    to: String,

    #[arg(long, default_value = "")]
    search: String,
}

impl FilterArgs {
    fn into_predicates(self, config: &Config) -> FilterPredicates {
        FilterPredicates::from_config(&config.filter)
            .with_facility(self.facility)
            .with_supplier(self.supplier)
            .with_category(self.category)
            .with_status(self.status)
            .with_date_range(self.from, self.to)
            .with_search(self.search)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Failed to load configuration: {}", e);
            eprintln!("Using default configuration");
            Config::default()
        }),
    };

    init_tracing(&config);

    let lifecycle = StatusLifecycle::from_config(&config.lifecycle)?;

    match cli.command {
        Commands::Summary {
            records,
            kind,
            filters,
        } => {
            let records = read_records(&records, &lifecycle)?;
            let session = Session::new(records).with_filters(filters.into_predicates(&config));
            let engine = AggregationEngine::with_config(kind, lifecycle.table(), config.analytics.clone());

            let summary = session.summary(&engine);
            tracing::info!(kind = %kind, records = summary.total_records, "Computed summary");
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Filter { records, filters } => {
            let records = read_records(&records, &lifecycle)?;
            let filtered = FilterEngine::filter(&records, &filters.into_predicates(&config));
            tracing::info!(total = records.len(), matched = filtered.len(), "Filtered records");
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }

        Commands::Transition {
            records,
            id,
            status,
            note,
            date,
            output,
        } => {
            let date = date
                .map(|raw| dates::parse_instant(&raw))
                .transpose()
                .context("invalid --date")?;

            let mut session = Session::new(read_records(&records, &lifecycle)?);
            let updated = session.transition(&lifecycle, &id, status, note, date)?;
            tracing::info!(record_id = %updated.id, status = %updated.status, "Transition applied");

            let body = serde_json::to_string_pretty(&session.records)?;
            match output {
                Some(path) => std::fs::write(&path, body)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{}", body),
            }
        }

        Commands::Downtime {
            date,
            time,
            resolved,
        } => {
            let downtime = DowntimeCalculator::new().downtime(&date, &time, resolved.as_deref());
            println!("{}", serde_json::to_string_pretty(&downtime)?);
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("service_records={}", config.observability.log_level).into());

    // Logs go to stderr so stdout stays valid JSON
    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_records(path: &PathBuf, lifecycle: &StatusLifecycle) -> anyhow::Result<Vec<ServiceRecord>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records = load_records(&json, lifecycle.table())?;
    tracing::info!(path = %path.display(), count = records.len(), "Loaded records");
    Ok(records)
}
