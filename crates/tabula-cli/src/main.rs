//! Tabula product catalog ETL CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tabula_cli::config::Settings;
use tabula_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_cleanup, run_etl, run_insights, run_inspect, run_integrity, run_job, run_jobs,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut settings = Settings::resolve(cli.config.as_deref())?;
    if let Some(store) = cli.store {
        settings.store.path = Some(store);
    }

    let code = match cli.command {
        Command::Run(args) => {
            let outcome = run_etl(&args, &settings)?;
            if outcome.load.is_none() {
                println!(
                    "Dry run: {} records ready, nothing loaded.",
                    outcome.output_records
                );
            }
            if outcome.succeeded() { 0 } else { 1 }
        }
        Command::Inspect(args) => {
            run_inspect(&args, &settings)?;
            0
        }
        Command::Jobs { limit } => {
            run_jobs(&settings, limit)?;
            0
        }
        Command::Job { id } => {
            run_job(&settings, &id)?;
            0
        }
        Command::Integrity => {
            let report = run_integrity(&settings)?;
            if report.is_valid { 0 } else { 1 }
        }
        Command::Cleanup { days } => {
            run_cleanup(&settings, days)?;
            0
        }
        Command::Insights { refresh } => {
            run_insights(&settings, refresh)?;
            0
        }
    };
    Ok(code)
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    }
    .with_format(format)
    .with_log_file(cli.log_file.clone())
    .with_log_data(cli.log_data);

    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
