//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tabula",
    version,
    about = "Product catalog ETL - extract, clean and load tabular product data",
    long_about = "Extract product rows from delimited text files, clean and validate them,\n\
                  and load them into a catalog store with job tracking.\n\n\
                  Category insights and trend snapshots are refreshed after every load."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row values (product names, reviews) in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Settings file (default: settings.toml in the platform config dir).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Catalog store file (overrides the settings file).
    #[arg(long = "store", value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract, transform and load a product file.
    Run(RunArgs),

    /// Extract a file and report column mapping and data quality.
    Inspect(InspectArgs),

    /// List recent load jobs.
    Jobs {
        /// Number of jobs to show.
        #[arg(long = "limit", default_value_t = 20)]
        limit: usize,
    },

    /// Show one load job.
    Job {
        #[arg(value_name = "JOB_ID")]
        id: String,
    },

    /// Check stored products for invariant violations.
    Integrity,

    /// Delete finished jobs and trend snapshots past the retention window.
    Cleanup {
        /// Retention window in days (default: from settings, else 30).
        #[arg(long = "days", value_name = "N")]
        days: Option<u32>,
    },

    /// Show per-category insights.
    Insights {
        /// Recompute insights from the stored products first.
        #[arg(long = "refresh")]
        refresh: bool,
    },
}

#[derive(Args)]
pub struct InspectArgs {
    /// Product file (CSV or other delimited text).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Field delimiter (probed from the file when omitted).
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InspectArgs,

    /// Records per load batch.
    #[arg(long = "batch-size", value_name = "N")]
    pub batch_size: Option<usize>,

    /// Insert instead of upsert; existing products are skipped.
    #[arg(long = "no-upsert")]
    pub no_upsert: bool,

    /// Skip category insight and trend regeneration.
    #[arg(long = "no-insights")]
    pub no_insights: bool,

    /// Keep statistical outliers.
    #[arg(long = "no-outliers")]
    pub no_outliers: bool,

    /// Reject rows with missing values instead of imputing them.
    #[arg(long = "no-fill")]
    pub no_fill: bool,

    /// Keep duplicate products.
    #[arg(long = "no-dedupe")]
    pub no_dedupe: bool,

    /// Transform and report without loading.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from([
            "tabula",
            "--store",
            "/tmp/c.tbl",
            "run",
            "products.csv",
            "--batch-size",
            "50",
            "--no-upsert",
            "--delimiter",
            ";",
        ])
        .unwrap();
        assert_eq!(cli.store.as_deref(), Some(std::path::Path::new("/tmp/c.tbl")));
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.batch_size, Some(50));
        assert!(args.no_upsert);
        assert_eq!(args.input.delimiter, Some(';'));
        assert!(!args.dry_run);
    }
}
