// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ProjectLayout`: the fixed set of paths under a router project directory.
//!
//! A project directory is the unit the router daemon operates on (spec.md
//! §4.6): it holds the router's own control mailboxes plus the published
//! snapshots the CLI reads back. Both the daemon and the CLI construct this
//! from the same project root so the two never drift on where, say,
//! `status.json` lives.

use std::path::{Path, PathBuf};

/// The fixed directory/file layout rooted at one router project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `INBOX/` — control messages for the router itself.
    pub fn inbox(&self) -> PathBuf {
        self.root.join("INBOX")
    }

    /// `OUTBOX/` — lifecycle messages emitted by the router.
    pub fn outbox(&self) -> PathBuf {
        self.root.join("OUTBOX")
    }

    /// `events.jsonl` — the authoritative append-only routing-table log.
    pub fn events_log(&self) -> PathBuf {
        self.root.join("events.jsonl")
    }

    /// `routes.json` — the published routing-table snapshot.
    pub fn routes_json(&self) -> PathBuf {
        self.root.join("routes.json")
    }

    /// `status.json` — the published daemon-status snapshot.
    pub fn status_json(&self) -> PathBuf {
        self.root.join("status.json")
    }

    /// `router.lock` — exclusive lock held by the running daemon process, so
    /// a second `patchboardd` pointed at the same project directory fails
    /// fast instead of racing the first one's delivery passes.
    pub fn lock_file(&self) -> PathBuf {
        self.root.join("router.lock")
    }

    /// The directories the router must create before it can run: `INBOX/`
    /// and `OUTBOX/`. `events.jsonl`/`routes.json`/`status.json` are files,
    /// created lazily by the storage/publish layers themselves.
    pub fn directories(&self) -> [PathBuf; 2] {
        [self.inbox(), self.outbox()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[yare::parameterized(
        inbox = { ProjectLayout::inbox as fn(&ProjectLayout) -> PathBuf, "INBOX" },
        outbox = { ProjectLayout::outbox as fn(&ProjectLayout) -> PathBuf, "OUTBOX" },
        events_log = { ProjectLayout::events_log as fn(&ProjectLayout) -> PathBuf, "events.jsonl" },
        routes_json = { ProjectLayout::routes_json as fn(&ProjectLayout) -> PathBuf, "routes.json" },
        status_json = { ProjectLayout::status_json as fn(&ProjectLayout) -> PathBuf, "status.json" },
        lock_file = { ProjectLayout::lock_file as fn(&ProjectLayout) -> PathBuf, "router.lock" },
    )]
    fn paths_are_rooted_under_the_project_directory(accessor: fn(&ProjectLayout) -> PathBuf, leaf: &str) {
        let layout = ProjectLayout::new("/srv/patchboard/demo");
        assert_eq!(accessor(&layout), PathBuf::from(format!("/srv/patchboard/demo/{leaf}")));
    }

    #[test]
    fn directories_lists_inbox_and_outbox_only() {
        let layout = ProjectLayout::new("/tmp/p");
        let dirs = layout.directories();
        assert_eq!(dirs, [PathBuf::from("/tmp/p/INBOX"), PathBuf::from("/tmp/p/OUTBOX")]);
    }
}
