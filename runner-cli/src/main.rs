//! CLI entry point for running the Feefo data pipeline against a local
//! JSONL dataset directory.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;

use feefo_core::config::{
    DEFAULT_BASE_URL, DEFAULT_MAX_PAGES, DEFAULT_MERCHANT_ID, PipelineConfig, WriteMode,
};
use feefo_core::errors::ConfigError;
use feefo_core::pipeline::Pipeline;
use feefo_core::sink::JsonlSink;
use feefo_core::telemetry;

#[derive(Parser)]
#[command(name = "feefo-ingest", about = "Run the Feefo data pipeline", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the pipeline
    Run {
        /// Merchant identifier
        #[arg(long, default_value = DEFAULT_MERCHANT_ID)]
        merchant_id: String,

        /// Maximum number of pages to fetch
        #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: u64,

        /// Write mode: merge, replace or append
        #[arg(long, default_value = "merge", value_parser = parse_write_mode)]
        mode: WriteMode,

        /// Fetch product ratings for reviewed SKUs (default: enabled)
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "no_include_ratings")]
        include_ratings: bool,

        /// Skip fetching product ratings
        #[arg(long, action = ArgAction::SetTrue)]
        no_include_ratings: bool,

        /// Filter product ratings by period (e.g. 30 for the last 30 days,
        /// default: all time)
        #[arg(long)]
        period_days: Option<u32>,

        /// Start date filter, passed to the API verbatim
        #[arg(long)]
        since: Option<String>,

        /// End date filter, passed to the API verbatim
        #[arg(long)]
        until: Option<String>,

        /// Feefo API root
        #[arg(long, env = "FEEFO_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Directory the JSONL destination tables live in
        #[arg(long, default_value = "bronze")]
        dataset_dir: String,

        /// YAML config file; replaces the pipeline flags above when set
        #[arg(long, conflicts_with_all = ["merchant_id", "max_pages", "mode", "period_days", "since", "until", "base_url"])]
        config: Option<String>,
    },
}

fn parse_write_mode(s: &str) -> Result<WriteMode, ConfigError> {
    s.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            merchant_id,
            max_pages,
            mode,
            include_ratings: _,
            no_include_ratings,
            period_days,
            since,
            until,
            base_url,
            dataset_dir,
            config,
        } => {
            let mut config = match config {
                Some(path) => PipelineConfig::from_file(&path)?,
                None => PipelineConfig {
                    base_url,
                    merchant_id,
                    max_pages,
                    mode,
                    period_days,
                    since,
                    until,
                    ..Default::default()
                },
            };
            if no_include_ratings {
                config.include_ratings = false;
            }

            if config.include_ratings {
                info!("Loading Feefo reviews and product ratings...");
            } else {
                info!("Loading Feefo reviews (skipping product ratings)...");
            }

            let sink = JsonlSink::new(&dataset_dir);
            let summary = Pipeline::new(config, sink)?.run().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
