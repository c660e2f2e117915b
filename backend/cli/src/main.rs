mod analyze_cmd;
mod config;
mod config_cmd;
mod history_cmd;
mod scan_cmd;
mod terminal_output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use uuid::Uuid;

use mittiscan_advisor::Advisor;
use mittiscan_config::{config_file_path, ensure_valid, load_config, prepare};
use mittiscan_logging::{init_logger, AnalysisEvent, EventLogger};
use mittiscan_store::ScanStore;

use analyze_cmd::AnalyzeArgs;
use config::Config;
use config_cmd::ConfigCommands;

#[derive(Parser)]
#[command(name = "mittiscan")]
#[command(about = "MittiScan: Soil Health Card reader and fertilizer planner")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract nutrient values from a scanned soil card
    Scan {
        /// Card image (with recognized text beside it) or a text file
        path: PathBuf,
    },
    /// Interpret a soil reading and plan fertilizer for a crop
    Analyze(AnalyzeArgs),
    /// List analyzed cards
    History {
        /// Number of most recent scans to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
        /// Show every scan, oldest first
        #[arg(long)]
        trends: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show totals across all analyzed cards
    Metrics,
    /// Inspect, check or create the config file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = config_file_path(&mittiscan_config::config_dir());
    let file_config = prepare(load_config(&config_path).await?)?;
    let config = Config::resolve(&file_config);

    init_logger(&config.log_dir, &config.log_level);
    debug!(?config, "Resolved runtime settings");

    let request_id = Uuid::new_v4().to_string();
    let outcome = run(cli.command, config, file_config, &request_id).await;
    if let Err(e) = &outcome {
        EventLogger::log_event(
            &request_id,
            AnalysisEvent::Error {
                error_msg: format!("{e:#}"),
            },
        );
    }
    outcome
}

async fn run(
    command: Commands,
    config: Config,
    file_config: mittiscan_config::MittiConfig,
    request_id: &str,
) -> Result<()> {
    // config commands must work on a file that does not validate
    if !matches!(command, Commands::Config(_)) {
        ensure_valid(&file_config)?;
    }

    match command {
        Commands::Scan { path } => scan_cmd::run(&path, request_id).await,
        Commands::Analyze(args) => {
            let advisor = Advisor::new(Arc::new(file_config.reference));
            let store = if args.no_save {
                None
            } else {
                Some(ScanStore::open(&config.db_path)?)
            };
            info!(crop = %args.crop, save = store.is_some(), "Starting analysis");
            analyze_cmd::run(&args, &advisor, store.as_ref(), request_id).await
        }
        Commands::History {
            limit,
            trends,
            json,
        } => {
            let store = ScanStore::open(&config.db_path)?;
            history_cmd::history(&store, limit, trends, json)
        }
        Commands::Metrics => {
            let store = ScanStore::open(&config.db_path)?;
            history_cmd::metrics(&store)
        }
        Commands::Config(cmd) => config_cmd::run(cmd, &config, &file_config).await,
    }
}
