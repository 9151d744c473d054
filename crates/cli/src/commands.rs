// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The six Router CLI subcommands (spec.md §6): `run`, `status`, `routes`,
//! `link`, `unlink`, `quit`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use patchboard_core::Message;
use patchboard_wire::{ControlSignal, LinkRequest, ProjectLayout, RoutesFile, StatusFile};

use crate::mailbox;

/// How long `link`/`unlink` wait for an `--ack` file before giving up.
const ACK_TIMEOUT: Duration = Duration::from_secs(5);
const ACK_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Start `patchboardd` against `project`, inheriting stdio, and wait for it
/// to exit. Returns the daemon's own exit code.
pub fn run(project: &Path, config: Option<&Path>) -> Result<i32> {
    let binary = find_patchboardd_binary();
    let mut command = std::process::Command::new(&binary);
    command.arg("--project").arg(project);
    if let Some(config) = config {
        command.arg("--config").arg(config);
    }

    let status = command
        .status()
        .with_context(|| format!("failed to launch {} (is patchboardd installed alongside patchboard?)", binary.display()))?;
    Ok(status.code().unwrap_or(1))
}

/// Print `status.json` as pretty JSON. Fails if the router hasn't published
/// one yet (it isn't running, or hasn't completed its first tick).
pub fn status(project: &Path) -> Result<()> {
    let layout = ProjectLayout::new(project);
    let raw = std::fs::read_to_string(layout.status_json())
        .with_context(|| format!("no status.json at {} — is the router running?", layout.status_json().display()))?;
    let status: StatusFile = serde_json::from_str(&raw).context("status.json is not valid")?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

/// Print `routes.json` as pretty JSON.
pub fn routes(project: &Path) -> Result<()> {
    let layout = ProjectLayout::new(project);
    let raw = std::fs::read_to_string(layout.routes_json())
        .with_context(|| format!("no routes.json at {} — is the router running?", layout.routes_json().display()))?;
    let routes: RoutesFile = serde_json::from_str(&raw).context("routes.json is not valid")?;
    println!("{}", serde_json::to_string_pretty(&routes)?);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn link(
    project: &Path,
    source_folder: String,
    source_channel: String,
    destination_folder: String,
    destination_channel: String,
    ack: Option<String>,
) -> Result<()> {
    submit_link_request(project, source_folder, source_channel, destination_folder, destination_channel, ack, true)
}

#[allow(clippy::too_many_arguments)]
pub fn unlink(
    project: &Path,
    source_folder: String,
    source_channel: String,
    destination_folder: String,
    destination_channel: String,
    ack: Option<String>,
) -> Result<()> {
    submit_link_request(project, source_folder, source_channel, destination_folder, destination_channel, ack, false)
}

#[allow(clippy::too_many_arguments)]
fn submit_link_request(
    project: &Path,
    source_folder: String,
    source_channel: String,
    destination_folder: String,
    destination_channel: String,
    ack: Option<String>,
    linking: bool,
) -> Result<()> {
    let layout = ProjectLayout::new(project);
    let request = LinkRequest { source_folder, source_channel, destination_channel, destination_folder, ack_path: ack.clone() };
    let signal = if linking { ControlSignal::Link(request) } else { ControlSignal::Unlink(request) };

    mailbox::submit(&layout.inbox(), &signal.into_message()).context("failed to submit request to router INBOX")?;

    if let Some(ack_path) = ack {
        match mailbox::await_ack(Path::new(&ack_path), ACK_TIMEOUT, ACK_POLL_INTERVAL) {
            Some(message) => println!("{}", serde_json::to_string_pretty(&message)?),
            None => bail!("timed out waiting for acknowledgement at {ack_path}"),
        }
    }
    Ok(())
}

/// Submit a `quit` control message.
pub fn quit(project: &Path) -> Result<()> {
    let layout = ProjectLayout::new(project);
    let message: Message = ControlSignal::Quit.into_message();
    mailbox::submit(&layout.inbox(), &message).context("failed to submit quit request to router INBOX")
}

/// Locate the `patchboardd` binary, preferring a sibling of the current
/// executable (the usual install layout), then a debug build sitting next to
/// this crate during development, falling back to a bare `PATH` lookup.
fn find_patchboardd_binary() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("patchboardd");
            if sibling.exists() {
                return sibling;
            }
        }
    }

    if let Some(manifest_dir) = option_env!("CARGO_MANIFEST_DIR") {
        let dev_path = PathBuf::from(manifest_dir).parent().and_then(|p| p.parent()).map(|p| p.join("target/debug/patchboardd"));
        if let Some(path) = dev_path {
            if path.exists() {
                return path;
            }
        }
    }

    PathBuf::from("patchboardd")
}
