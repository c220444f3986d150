//! TallyBridge agent
//!
//! Polls the order-management backend for pending invoices and posts them to
//! the local Tally daemon.
//!
//! ```text
//! tallybridge-agent [run]   sync every interval until Ctrl-C
//! tallybridge-agent once    run one cycle and exit
//! tallybridge-agent help    show usage
//! ```

mod context;
mod logging;

use std::process::ExitCode;

use anyhow::{bail, Context};
use context::AgentContext;
use tallybridge_infra::CycleOutcome;
use tracing::{error, info};

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> anyhow::Result<ExitCode> {
    let command = std::env::args().nth(1).unwrap_or_else(|| "run".to_string());
    if matches!(command.as_str(), "help" | "-h" | "--help") {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }

    let guard = logging::init().context("failed to initialise logging")?;
    if let Some(path) = &guard.log_file {
        info!(path = %path.display(), "writing log file");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(async {
        match command.as_str() {
            "run" => run().await,
            "once" => once().await,
            other => bail!("unknown command: {other} (try `help`)"),
        }
    })
}

async fn run() -> anyhow::Result<ExitCode> {
    info!(version = env!("CARGO_PKG_VERSION"), "TallyBridge agent starting");

    let mut context = AgentContext::new();
    context.start().await.context("failed to start sync scheduler")?;

    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
    info!("Ctrl-C received, stopping");

    if let Err(err) = context.shutdown().await {
        error!(error = %err, "sync scheduler did not stop cleanly");
        return Ok(ExitCode::FAILURE);
    }

    info!("TallyBridge agent stopped");
    Ok(ExitCode::SUCCESS)
}

async fn once() -> anyhow::Result<ExitCode> {
    let context = AgentContext::new();

    match context.run_once().await {
        CycleOutcome::Completed(summary) => {
            info!(
                fetched = summary.fetched,
                succeeded = summary.succeeded,
                failed = summary.failed,
                reports_failed = summary.reports_failed,
                "single cycle finished"
            );
            Ok(ExitCode::SUCCESS)
        }
        CycleOutcome::Skipped => Ok(ExitCode::SUCCESS),
        CycleOutcome::Aborted(err) => {
            error!(error = %err, "single cycle aborted");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_help() {
    println!(
        "TallyBridge agent {}

USAGE:
    tallybridge-agent [COMMAND]

COMMANDS:
    run     Sync on an interval until Ctrl-C (default)
    once    Run a single sync cycle; exits non-zero if it aborted
    help    Show this message

ENVIRONMENT:
    SERVER_URL                 Backend base URL (required)
    API_KEY                    Backend credential (required)
    COMPANY_ID                 Company identifier (optional)
    TALLY_URL                  Daemon endpoint (default http://localhost:9000)
    TALLYBRIDGE_SYNC_INTERVAL  Seconds between cycles (default 60)
    TALLYBRIDGE_LOG_DIR        Also write logs to <dir>/tallybridge-agent.log
    RUST_LOG                   Log filter (default info)

When SERVER_URL or API_KEY is missing, tallybridge.toml or tallybridge.json is
read from the current directory or next to the executable.",
        env!("CARGO_PKG_VERSION")
    );
}
