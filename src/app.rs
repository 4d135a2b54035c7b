//! Top-level application orchestration.
//!
//! `src/main.rs` only sets up logging; this module is the "real main" that:
//! - parses CLI arguments
//! - builds a session from defaults and an optional config
//! - prints summaries/roots or writes CSV and snapshot files

use crate::cli::{Cli, Command, ExportArgs, GenerateArgs, RootsArgs};
use crate::domain::Series;
use crate::error::AppError;

pub mod pipeline;
pub mod session;

pub use session::Session;

/// Dispatch an already parsed command line.
pub fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Generate(args) => handle_generate(args),
        Command::Roots(args) => handle_roots(args),
        Command::Export(args) => handle_export(args),
        Command::Series => {
            print!("{}", crate::report::format_series_list());
            Ok(())
        }
    }
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let mut session = pipeline::load_session(&args.state)?;

    if let Some(path) = &args.csv {
        let series = parse_series(&args.series)?;
        let dataset = session.dataset()?;
        return crate::io::write_dataset_csv_file(path, &dataset, &series);
    }

    let summary = pipeline::run_summary(&mut session)?;
    print!("{}", crate::report::format_run_summary(&summary));
    Ok(())
}

fn handle_roots(args: RootsArgs) -> Result<(), AppError> {
    let series = parse_one(&args.series)?;
    let mut session = pipeline::load_session(&args.state)?;
    let roots = session.roots(series)?;
    print!("{}", crate::report::format_roots(series, &roots));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let mut session = Session::new();
    if let Some(path) = &args.config {
        pipeline::import_file(&mut session, path)?;
    }
    crate::io::write_config_file(&args.out, &session.export())
}

fn parse_series(names: &[String]) -> Result<Vec<Series>, AppError> {
    names.iter().map(|n| parse_one(n)).collect()
}

fn parse_one(name: &str) -> Result<Series, AppError> {
    name.parse().map_err(|_| AppError::unknown_series(name))
}
