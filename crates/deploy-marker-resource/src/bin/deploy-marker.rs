// Copyright 2026 Oxide Computer Company

//! Entry point for the Concourse `check`, `in` and `out` scripts.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use deploy_marker_resource::{
    Git, OutError, Reporter, StepError, init_logging, read_put_config,
    run_check, run_in, run_out, write_json,
};
use std::{error::Error, io, process::ExitCode, time::Duration};

#[derive(Parser)]
#[command(name = "deploy-marker", version)]
#[command(about = "Concourse resource that records New Relic deployments")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report HEAD of a repository as a deployment (the put step)
    Out {
        /// The build directory Concourse runs the step in
        build_dir: Utf8PathBuf,

        /// Seconds to wait for the deployments API (0 waits forever)
        #[arg(long, env = "DEPLOY_MARKER_TIMEOUT_SECS", default_value_t = 60)]
        timeout_secs: u64,
    },

    /// Discover versions (always none)
    Check,

    /// Fetch a version (echoes it back)
    In {
        /// The directory to fetch into
        dest_dir: Utf8PathBuf,
    },
}

fn main() -> ExitCode {
    init_logging();
    // Any usage error is a failed step (exit 1), not clap's usual 2.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let result = match cli.command {
        Command::Out { build_dir, timeout_secs } => out(build_dir, timeout_secs),
        Command::Check => run_check(&mut io::stdin().lock())
            .and_then(|versions| {
                write_json(&mut io::stdout().lock(), &versions)
                    .map_err(StepError::WriteOutput)
            })
            .map_err(|err| unexpected(&err)),
        Command::In { dest_dir } => run_in(&dest_dir, &mut io::stdin().lock())
            .and_then(|output| {
                write_json(&mut io::stdout().lock(), &output)
                    .map_err(StepError::WriteOutput)
            })
            .map_err(|err| unexpected(&err)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn out(build_dir: Utf8PathBuf, timeout_secs: u64) -> Result<(), String> {
    let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

    run_out_step(&build_dir, timeout).map_err(|err| match err {
        // Validation failures are shown without the generic prefix.
        OutError::Validation(err) => err.to_string(),
        err => unexpected(&err),
    })
}

fn run_out_step(
    build_dir: &Utf8Path,
    timeout: Option<Duration>,
) -> Result<(), OutError> {
    let config = read_put_config(&mut io::stdin().lock())?;
    let git = Git::from_env()?;
    let reporter = Reporter::new(timeout)?;
    let output = run_out(build_dir, config, &git, &reporter, &mut io::stderr())?;
    write_json(&mut io::stdout().lock(), &output).map_err(OutError::WriteOutput)
}

/// Formats an error and its sources for the step's log.
fn unexpected(err: &dyn Error) -> String {
    let mut message = format!("unexpected error occurred, {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
