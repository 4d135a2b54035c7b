//! Command-line parsing for the payoff-curve calculator.
//!
//! Argument parsing stays separate from the curve math; `app` does dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{BiasMode, DEFAULT_GRID_POINTS};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pcurves", version, about = "Logarithmic payoff-curve calculator")]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate the dataset and print a per-series summary (or write CSV).
    Generate(GenerateArgs),
    /// Print the zero crossings of one series.
    Roots(RootsArgs),
    /// Normalize a config through the validator and write a snapshot.
    Export(ExportArgs),
    /// List series names and the toggles that control them.
    Series,
}

/// Options shared by commands that evaluate curves.
#[derive(Debug, Args, Clone)]
pub struct StateArgs {
    /// Config JSON to import on top of the defaults.
    #[arg(short, long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Number of grid points across the x range (2 to 10000).
    #[arg(long, default_value_t = DEFAULT_GRID_POINTS)]
    pub points: usize,

    /// Override the bias mode after import.
    #[arg(long, value_enum)]
    pub bias_mode: Option<BiasMode>,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub state: StateArgs,

    /// Write the dataset as CSV instead of printing the summary.
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Restrict CSV output to these series (repeatable; default: all).
    #[arg(long = "series", short = 's', value_name = "NAME")]
    pub series: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RootsArgs {
    #[command(flatten)]
    pub state: StateArgs,

    /// Series name (see `pcurves series`).
    #[arg(short, long, default_value = "net_delta1")]
    pub series: String,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Config JSON to normalize (defaults only when omitted).
    #[arg(short, long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Output path for the snapshot.
    #[arg(short, long, value_name = "JSON")]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_with_overrides() {
        let cli = Cli::parse_from([
            "pcurves",
            "generate",
            "--config",
            "cfg.json",
            "--points",
            "51",
            "--bias-mode",
            "add_option",
            "-s",
            "net_delta1",
            "-s",
            "net_delta2",
        ]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.state.points, 51);
        assert_eq!(args.state.bias_mode, Some(BiasMode::AddOption));
        assert_eq!(args.series, vec!["net_delta1", "net_delta2"]);
    }

    #[test]
    fn roots_defaults_to_net_delta1() {
        let cli = Cli::parse_from(["pcurves", "-v", "roots"]);
        assert!(cli.verbose);
        let Command::Roots(args) = cli.command else {
            panic!("expected roots");
        };
        assert_eq!(args.series, "net_delta1");
        assert_eq!(args.state.points, DEFAULT_GRID_POINTS);
    }
}
