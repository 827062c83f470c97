//! grade-decode
//!
//! Recovers student IDs for a grade export keyed by `hash(student_id + uid)`.

use std::path::PathBuf;

use clap::Parser;
use gradelink::{
    error::{AppError, Result},
    models::Config,
    pipeline::{self, DecodeInputs},
    utils::report,
};

/// Hashed grade decoder
#[derive(Parser, Debug)]
#[command(name = "grade-decode", version, about = "Decode hashed grade IDs back to student IDs")]
struct Cli {
    /// Grade CSV whose first column is the hash
    grade_file: PathBuf,

    /// Where to write the decoded CSV
    output_file: PathBuf,

    /// Roster CSV with emails and student IDs
    number_email_file: PathBuf,

    /// UID-email CSV, e.g. the output of user-enum
    uid_email_file: PathBuf,

    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "gradelink.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Suppress banners and summaries
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    report::set_quiet(cli.quiet);

    let config = Config::load_or_default(&cli.config);
    config.validate().map_err(AppError::logged)?;

    let inputs = DecodeInputs {
        grades: &cli.grade_file,
        roster: &cli.number_email_file,
        uid_emails: &cli.uid_email_file,
    };
    pipeline::run_decoder(inputs, &cli.output_file, &config.decoder)
        .map_err(AppError::logged)?;
    Ok(())
}
