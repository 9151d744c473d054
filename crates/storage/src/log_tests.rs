use std::io::Write;

use tempfile::tempdir;

use super::*;
use crate::event::RouterEvent;

fn route_event(n: u32) -> RouterEvent {
    RouterEvent::route_added(format!("/src{n}"), "out", "in", format!("/dst{n}"))
}

#[test]
fn open_creates_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    let log = EventLog::open(&path).unwrap();

    assert!(path.exists());
    assert_eq!(log.write_seq(), 0);
}

#[test]
fn append_assigns_increasing_sequence_numbers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let mut log = EventLog::open(&path).unwrap();

    let seq1 = log.append(&route_event(1)).unwrap();
    let seq2 = log.append(&route_event(2)).unwrap();

    assert_eq!(seq1, 1);
    assert_eq!(seq2, 2);

    let metadata = std::fs::metadata(&path).unwrap();
    assert!(metadata.len() > 0);
}

#[test]
fn entries_after_returns_everything_past_the_given_seq() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let mut log = EventLog::open(&path).unwrap();

    log.append(&route_event(1)).unwrap();
    log.append(&route_event(2)).unwrap();
    log.append(&route_event(3)).unwrap();

    let entries = log.entries_after(1).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq, 2);
    assert_eq!(entries[1].seq, 3);
}

#[test]
fn reopen_replays_every_entry_from_the_start() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    {
        let mut log = EventLog::open(&path).unwrap();
        log.append(&RouterEvent::startup()).unwrap();
        log.append(&route_event(1)).unwrap();
        log.append(&route_event(2)).unwrap();
    }

    let log = EventLog::open(&path).unwrap();
    assert_eq!(log.write_seq(), 3);

    let table = log.replay().unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn open_corrupt_log_creates_bak_and_preserves_valid_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    {
        let mut log = EventLog::open(&path).unwrap();
        log.append(&route_event(1)).unwrap();
        log.append(&route_event(2)).unwrap();
    }
    {
        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(b"not-valid-json\n").unwrap();
    }

    let log = EventLog::open(&path).unwrap();

    assert_eq!(log.write_seq(), 2);

    let bak = path.with_extension("bak");
    assert!(bak.exists());

    let entries = log.entries_after(0).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq, 1);
    assert_eq!(entries[1].seq, 2);
}

#[test]
fn open_corrupt_log_rotates_bak_files_keeping_at_most_three() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    for i in 1..=4u8 {
        {
            let mut f = std::fs::File::create(&path).unwrap();
            f.write_all(&[i; 8]).unwrap();
        }
        let log = EventLog::open(&path).unwrap();
        assert_eq!(log.write_seq(), 0);
    }

    let bak1 = path.with_extension("bak");
    assert!(bak1.exists());
    assert_eq!(std::fs::read(&bak1).unwrap(), vec![4u8; 8]);

    let bak2 = path.with_extension("bak.2");
    assert!(bak2.exists());
    assert_eq!(std::fs::read(&bak2).unwrap(), vec![3u8; 8]);

    let bak3 = path.with_extension("bak.3");
    assert!(bak3.exists());
    assert_eq!(std::fs::read(&bak3).unwrap(), vec![2u8; 8]);

    let bak4 = path.with_extension("bak.4");
    assert!(!bak4.exists());
}

#[test]
fn entries_after_stops_at_corruption_without_erroring() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    {
        let mut log = EventLog::open(&path).unwrap();
        log.append(&route_event(1)).unwrap();
        log.append(&route_event(2)).unwrap();
    }

    let log = EventLog::open(&path).unwrap();

    {
        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(b"post-open-corruption\n").unwrap();
    }

    let entries = log.entries_after(0).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq, 1);
    assert_eq!(entries[1].seq, 2);
}

#[test]
fn truncated_last_line_is_dropped_without_rotating_backups() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    {
        let mut log = EventLog::open(&path).unwrap();
        log.append(&route_event(1)).unwrap();
    }
    {
        // Simulate a crash mid-append: a partial line with no trailing newline.
        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(b"{\"event\":\"route_adde").unwrap();
    }

    let log = EventLog::open(&path).unwrap();

    assert_eq!(log.write_seq(), 1, "the truncated tail must be dropped, not counted");
    assert!(!path.with_extension("bak").exists(), "a truncated tail must not trigger backup rotation");
}

#[test]
fn open_with_binary_data_is_treated_as_fully_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    std::fs::write(&path, b"\x80\x81\x82\xff\xfe\n").unwrap();

    let log = EventLog::open(&path).unwrap();
    assert_eq!(log.write_seq(), 0);

    let bak = path.with_extension("bak");
    assert!(bak.exists());
}

#[test]
fn open_with_valid_entries_then_binary_preserves_the_valid_prefix() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    {
        let mut log = EventLog::open(&path).unwrap();
        log.append(&route_event(1)).unwrap();
        log.append(&route_event(2)).unwrap();
    }
    {
        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(b"\x80\x81\x82\xff\xfe\n").unwrap();
    }

    let log = EventLog::open(&path).unwrap();
    assert_eq!(log.write_seq(), 2);
    assert!(path.with_extension("bak").exists());

    let entries = log.entries_after(0).unwrap();
    assert_eq!(entries.len(), 2);
}

#[test]
fn unknown_event_type_line_is_treated_as_corrupt_and_skipped_on_replay() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    {
        let mut log = EventLog::open(&path).unwrap();
        log.append(&route_event(1)).unwrap();
    }
    {
        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(f, r#"{{"event":"future_feature","ts_utc":"1785110400.000000"}}"#).unwrap();
    }

    // An unrecognized tag fails to deserialize as `RouterEvent`, which this
    // log treats the same as any other unparseable line: preserved on disk,
    // excluded from the in-memory replay.
    let log = EventLog::open(&path).unwrap();
    assert_eq!(log.write_seq(), 1);
}
