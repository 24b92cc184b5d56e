mod cli_args;
mod output;

use anyhow::{Context, Result};
use byte_unit::Byte;
use clap::Parser;
use colored::*;
use log;
use std::process;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cli_args::Cli;
use repomerge_core::{AppError, MergeConfig, RepoSource};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;
    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let core_err = e.downcast_ref::<AppError>();
            let exit_code = match core_err {
                Some(AppError::Config(_)) => 1,
                Some(AppError::Pattern { .. }) => 1,
                Some(AppError::Walk { .. }) => 2,
                Some(AppError::Io(_)) => 2,
                Some(AppError::FileRead { .. }) => 2,
                Some(AppError::FileWrite { .. }) => 2,
                Some(AppError::Acquisition { .. }) => 3,
                Some(AppError::InvalidArgument(_)) => 5,
                Some(AppError::JsonSerialize(_)) => 6,
                Some(AppError::Interrupted) => 130,
                Some(_) => 1,
                None => 1,
            };

            // Interruption is user-initiated; no error banner for it.
            if exit_code == 130 {
                log::warn!("Run interrupted by user.");
            } else if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }

            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(args: Cli, quiet: bool) -> Result<()> {
    let max_size = parse_max_size(&args.max_size)?;
    let config = MergeConfig::new(max_size, &args.exclude)
        .context("Failed to build exclusion configuration")?;

    let source = RepoSource::detect(&args.repo);
    if let RepoSource::Remote(url) = &source {
        if !quiet {
            println!("{} Cloning repository: {}", "⏳".blue(), url.blue());
        }
    }

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || {
            cancel.store(true, Ordering::Relaxed);
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    let summary = repomerge_core::run(&source, &config, &args.output, Some(cancel.as_ref()))
        .context("Merge run failed")?;

    if args.json {
        output::print_summary_json(&summary)?;
    } else {
        output::print_summary(&summary, &args.output, quiet);
    }
    Ok(())
}

fn parse_max_size(size_str: &str) -> Result<u64> {
    let byte_value = Byte::from_str(size_str).map_err(|e| {
        AppError::InvalidArgument(format!(
            "Invalid max size format '{}': {}. Use KB, MB, etc.",
            size_str, e
        ))
    })?;
    let bytes: u128 = byte_value.into();
    let bytes = u64::try_from(bytes).map_err(|_| {
        AppError::InvalidArgument("Max size exceeds the supported range.".to_string())
    })?;
    if bytes == 0 {
        return Err(AppError::InvalidArgument(
            "Max size must be greater than 0 bytes".to_string(),
        )
        .into());
    }
    Ok(bytes)
}
