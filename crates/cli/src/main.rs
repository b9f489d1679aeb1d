// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! acm - inspect and migrate accumulating record files

mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::error::CliError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "acm",
    version,
    about = "Inspect accumulating record files or migrate them to a new column list",
    after_help = "Example to skip one column and insert another one:\n  acm old.acm new.acm 0-3,6,N,5"
)]
struct Cli {
    /// Record or table file to read
    source: PathBuf,

    /// File to create with the migrated layout (must not exist)
    #[arg(requires = "mapping")]
    target: Option<PathBuf>,

    /// Target columns: indexes, half-open ranges `start-end`, `N` for a new column
    #[arg(requires = "target")]
    mapping: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CliError>() {
                Some(cli_err) => eprint!("{cli_err}"),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match (cli.target, cli.mapping) {
        (Some(target), Some(mapping)) => {
            commands::migrate::migrate(&cli.source, &target, &mapping, cli.output)
        }
        _ => commands::info::info(&cli.source, cli.output),
    }
}

/// Logs go to stderr so stdout stays parseable; `ACM_LOG` sets the filter.
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("ACM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
