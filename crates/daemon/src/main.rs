// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `patchboardd`: runs a single router project directory until told to quit
//! (a `quit` control message) or signaled (SIGINT/SIGTERM).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use patchboard_daemon::{Daemon, DaemonError, RouterConfig};
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "patchboardd", about = "Filesystem router daemon for Patchboard")]
struct Args {
    /// Project directory the router operates on.
    #[arg(long)]
    project: PathBuf,

    /// Optional TOML config file (`[router]` table). Defaults are used if omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(DaemonError::AlreadyRunning { path }) => {
            eprintln!("patchboardd: already running (lock held at {})", path.display());
            ExitCode::FAILURE
        }
        Err(source) => {
            error!(error = %source, "patchboardd exited with an error");
            eprintln!("patchboardd: {source}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), DaemonError> {
    let config = RouterConfig::load_or_default(args.config.as_deref())?;
    let daemon = Daemon::startup(args.project, config)?;
    daemon.run(shutdown_signal()).await
}

/// Resolves when either SIGINT or SIGTERM arrives, whichever comes first.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut signal) = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            signal.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
