//! grade-match
//!
//! Attaches grades hashed by zero-padded student ID to a student roster.

use std::path::PathBuf;

use clap::Parser;
use gradelink::{
    error::{AppError, Result},
    models::Config,
    pipeline,
    utils::report,
};

/// Roster/grade matcher
#[derive(Parser, Debug)]
#[command(name = "grade-match", version, about = "Match a student roster against hashed grades")]
struct Cli {
    /// Student roster CSV (name, student ID, phone)
    student_file: Option<PathBuf>,

    /// Grades CSV with a hashed ID column
    grades_file: Option<PathBuf>,

    /// Output CSV path
    output_file: Option<PathBuf>,

    /// Student roster CSV, overrides the positional argument
    #[arg(short, long)]
    student: Option<PathBuf>,

    /// Grades CSV, overrides the positional argument
    #[arg(short, long)]
    grades: Option<PathBuf>,

    /// Output CSV, overrides the positional argument
    #[arg(short, long)]
    output: Option<PathBuf>,

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

    let student = cli.student.or(cli.student_file).ok_or_else(|| {
        AppError::validation("missing student file: pass it positionally or with -s/--student")
            .logged()
    })?;
    let grades = cli.grades.or(cli.grades_file).ok_or_else(|| {
        AppError::validation("missing grades file: pass it positionally or with -g/--grades")
            .logged()
    })?;
    let output = cli
        .output
        .or(cli.output_file)
        .unwrap_or_else(|| PathBuf::from(&config.matcher.output));

    pipeline::run_matcher(&student, &grades, &output, &config.matcher)
        .map_err(AppError::logged)?;
    Ok(())
}
