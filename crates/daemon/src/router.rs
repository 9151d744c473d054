// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Daemon`: the router's full lifecycle (spec.md §4.6) — startup, main
//! loop, and draining shutdown — wired on top of the building blocks in
//! [`crate::control`], [`crate::delivery`], and [`crate::publish`].

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fs2::FileExt;
use patchboard_storage::{EventLog, FsRoutingTable, RouterEvent};
use patchboard_wire::{ProjectLayout, StatusFile};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::RouterConfig;
use crate::error::DaemonError;
use crate::{control, delivery, publish};

/// A running (or about to run) router, holding everything the lifecycle
/// steps in spec.md §4.6 need: the project layout, the durable event log,
/// the in-memory routing table replayed from it, the publishable status
/// snapshot, and the lock that keeps a second daemon off the same project.
pub struct Daemon {
    layout: ProjectLayout,
    log: EventLog,
    routes: FsRoutingTable,
    status: StatusFile,
    config: RouterConfig,
    _lock: File,
}

impl Daemon {
    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn routes(&self) -> &FsRoutingTable {
        &self.routes
    }

    pub fn status(&self) -> &StatusFile {
        &self.status
    }

    /// Lifecycle steps 1–4 of spec.md §4.6: create directories, replay
    /// `events.jsonl`, generate a router id and append `startup`, run an
    /// initial delivery pass, and publish the first `status.json`/
    /// `routes.json`.
    pub fn startup(project_dir: impl Into<PathBuf>, config: RouterConfig) -> Result<Self, DaemonError> {
        let layout = ProjectLayout::new(project_dir.into());

        std::fs::create_dir_all(layout.root())
            .map_err(|source| DaemonError::CreateDir { path: layout.root().to_path_buf(), source })?;
        for dir in layout.directories() {
            std::fs::create_dir_all(&dir).map_err(|source| DaemonError::CreateDir { path: dir, source })?;
        }

        let lock = acquire_lock(&layout.lock_file())?;

        let log = EventLog::open(layout.events_log())?;
        let routes = log.replay()?;

        let router_id = Uuid::new_v4().to_string();
        let started_at = publish::decimal_seconds_utc_now();

        let mut log = log;
        log.append(&RouterEvent::startup())?;
        publish::emit_lifecycle_message(
            &layout,
            "startup",
            json!({"router_id": router_id, "started_at_utc": started_at}),
        )?;
        info!(router_id = %router_id, delay_seconds = config.delay_seconds, "router starting up");

        let mut status = StatusFile::new(router_id, started_at, config.delay_seconds);

        let initial_stats = delivery::do_delivery_pass(
            &routes,
            &layout.outbox(),
            config.discard_unrouted,
            config.max_deliveries_per_tick,
            false,
        )?;
        status.stats += initial_stats;
        if !status.stats.is_zero() {
            status.last_change = publish::decimal_seconds_utc_now();
        }
        publish::publish_routes(&layout, &routes)?;
        publish::publish_status(&layout, &status)?;

        Ok(Self { layout, log, routes, status, config, _lock: lock })
    }

    /// One tick of the main loop (spec.md §4.6): delivery pass, control
    /// inputs, publish-if-dirty. Returns whether a `quit` was requested this
    /// tick.
    fn tick(&mut self) -> Result<bool, DaemonError> {
        let stats = delivery::do_delivery_pass(
            &self.routes,
            &self.layout.outbox(),
            self.config.discard_unrouted,
            self.config.max_deliveries_per_tick,
            false,
        )?;

        let outcome = control::process_control_inputs(&self.layout.inbox(), &mut self.routes, &mut self.log)?;

        publish::publish_state_if_dirty(&self.layout, &self.routes, &mut self.status, outcome.routes_changed, stats)?;

        Ok(outcome.quit_requested)
    }

    /// Run the main loop until a `quit` control message arrives or `shutdown`
    /// resolves (SIGINT/SIGTERM), then drain and publish final state.
    pub async fn run(mut self, shutdown: impl std::future::Future<Output = ()>) -> Result<(), DaemonError> {
        tokio::pin!(shutdown);
        let delay = Duration::from_secs_f64(self.config.delay_seconds.max(0.0));

        loop {
            let quit_requested = self.tick()?;
            if quit_requested {
                info!("quit requested via control inbox, entering drain sequence");
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = &mut shutdown => {
                    info!("shutdown signal received, entering drain sequence");
                    break;
                }
            }
        }

        self.drain()
    }

    /// Lifecycle step 6 of spec.md §4.6: freeze routing-table mutations,
    /// append `shutdown`, emit the `shutdown` lifecycle message, and repeat
    /// draining delivery passes (sourcing only from `OUTBOX`) until none of
    /// them finds a further deliverable message. Publishes final state.
    fn drain(mut self) -> Result<(), DaemonError> {
        self.log.append(&RouterEvent::shutdown())?;
        publish::emit_lifecycle_message(&self.layout, "shutdown", json!({}))?;

        loop {
            let stats = delivery::do_delivery_pass(
                &self.routes,
                &self.layout.outbox(),
                self.config.discard_unrouted,
                self.config.max_deliveries_per_tick,
                true,
            )?;
            self.status.stats += stats;
            if !delivery::outbox_has_deliverable_messages(&self.routes, &self.layout.outbox())? {
                break;
            }
        }

        self.status.tick += 1;
        publish::publish_routes(&self.layout, &self.routes)?;
        publish::publish_status(&self.layout, &self.status)?;
        info!("router drained and shut down");
        Ok(())
    }
}

/// Acquire an exclusive lock on `path`, creating it if missing. A lock held
/// by another process is reported as [`DaemonError::AlreadyRunning`] rather
/// than a raw I/O error, since it is the one startup failure an operator is
/// expected to hit routinely (two `patchboardd` pointed at the same
/// project).
fn acquire_lock(path: &Path) -> Result<File, DaemonError> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .open(path)
        .map_err(|source| DaemonError::Lock { path: path.to_path_buf(), source })?;

    match file.try_lock_exclusive() {
        Ok(()) => Ok(file),
        Err(source) if source.kind() == std::io::ErrorKind::WouldBlock => {
            warn!(path = %path.display(), "router lock already held");
            Err(DaemonError::AlreadyRunning { path: path.to_path_buf() })
        }
        Err(source) => Err(DaemonError::Lock { path: path.to_path_buf(), source }),
    }
}

#[cfg(test)]
mod tests {
    use patchboard_core::Message;
    use tempfile::tempdir;

    use super::*;
    use crate::mailbox;

    #[test]
    fn startup_creates_directories_and_publishes_initial_state() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("project");

        let daemon = Daemon::startup(project.clone(), RouterConfig::defaults()).unwrap();
        assert!(project.join("INBOX").is_dir());
        assert!(project.join("OUTBOX").is_dir());
        assert!(project.join("events.jsonl").exists());
        assert!(project.join("status.json").exists());
        assert!(project.join("routes.json").exists());

        let outbox_files = mailbox::list_message_files(&project.join("OUTBOX")).unwrap();
        assert_eq!(outbox_files.len(), 1);
        match mailbox::read_message(&outbox_files[0].path).unwrap() {
            mailbox::ReadOutcome::Parsed(msg) => assert_eq!(msg.channel, "startup"),
            _ => panic!("expected a parsed startup message"),
        }

        assert_eq!(daemon.status().tick, 0);
        assert_eq!(daemon.routes().len(), 0);
    }

    #[test]
    fn startup_twice_on_the_same_project_fails_with_already_running() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("project");

        let _first = Daemon::startup(project.clone(), RouterConfig::defaults()).unwrap();
        let second = Daemon::startup(project, RouterConfig::defaults());
        assert!(matches!(second, Err(DaemonError::AlreadyRunning { .. })));
    }

    #[test]
    fn startup_replays_events_from_a_prior_run() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("project");

        {
            let mut log = EventLog::open(project.join("events.jsonl")).unwrap();
            std::fs::create_dir_all(&project).unwrap();
            log.append(&RouterEvent::route_added("/src", "data", "received", "/dest")).unwrap();
        }

        let daemon = Daemon::startup(project, RouterConfig::defaults()).unwrap();
        assert_eq!(daemon.routes().len(), 1);
    }

    #[test]
    fn one_tick_delivers_a_message_and_quit_drains_the_outbox() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("project");
        let subscriber = dir.path().join("subscriber");
        std::fs::create_dir_all(&subscriber).unwrap();

        let mut daemon = Daemon::startup(project.clone(), RouterConfig::defaults()).unwrap();

        // Link the router's own shutdown lifecycle channel to a subscriber
        // directory, then ask it to quit — the drain sequence should
        // deliver the `shutdown` message before returning.
        let link = patchboard_wire::ControlSignal::Link(patchboard_wire::LinkRequest {
            source_folder: project.join("OUTBOX").to_string_lossy().into_owned(),
            source_channel: "shutdown".to_string(),
            destination_channel: "router-shutdown".to_string(),
            destination_folder: subscriber.to_string_lossy().into_owned(),
            ack_path: None,
        });
        mailbox::write_message(&project.join("INBOX"), &link.into_message()).unwrap();

        let quit = patchboard_wire::ControlSignal::Quit;
        mailbox::write_message(&project.join("INBOX"), &quit.into_message()).unwrap();

        assert!(daemon.tick().unwrap());
        daemon.drain().unwrap();

        let delivered = mailbox::list_message_files(&subscriber).unwrap();
        assert_eq!(delivered.len(), 1);
        match mailbox::read_message(&delivered[0].path).unwrap() {
            mailbox::ReadOutcome::Parsed(Message { channel, .. }) => assert_eq!(channel, "router-shutdown"),
            _ => panic!("expected a parsed message"),
        }
        assert!(mailbox::list_message_files(&project.join("OUTBOX")).unwrap().is_empty());
    }
}
