//! user-enum
//!
//! Walks profile UIDs on the judge site and saves `uid,username,nickname,email`.

use std::path::PathBuf;

use clap::Parser;
use gradelink::{
    error::{AppError, Result},
    models::Config,
    pipeline,
    utils::report,
};

/// Profile enumerator for the judge site
#[derive(Parser, Debug)]
#[command(name = "user-enum", version, about = "Enumerate user profiles and collect emails")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "gradelink.toml")]
    config: PathBuf,

    /// First UID to probe
    #[arg(long)]
    start: Option<u32>,

    /// Last UID to probe
    #[arg(long)]
    max: Option<u32>,

    /// Concurrent batches
    #[arg(short, long)]
    workers: Option<usize>,

    /// UIDs per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Profile URL prefix
    #[arg(long)]
    base_url: Option<String>,

    /// Output CSV path
    #[arg(short, long)]
    output: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Suppress banners and summaries
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    report::set_quiet(cli.quiet);

    let mut config = Config::load_or_default(&cli.config);
    let enumerator = &mut config.enumerator;
    if let Some(start) = cli.start {
        enumerator.start_uid = start;
    }
    if let Some(max) = cli.max {
        enumerator.max_uid = max;
    }
    if let Some(workers) = cli.workers {
        enumerator.workers = workers;
    }
    if let Some(batch_size) = cli.batch_size {
        enumerator.batch_size = batch_size;
    }
    if let Some(base_url) = cli.base_url {
        enumerator.base_url = base_url;
    }
    if let Some(output) = cli.output {
        enumerator.output = output;
    }

    config.validate().map_err(AppError::logged)?;

    pipeline::run_enumerator(&config.enumerator)
        .await
        .map_err(AppError::logged)?;
    Ok(())
}
