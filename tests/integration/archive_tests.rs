//! Archive lifecycle tests: staging, listing, reimport.

#[path = "../common/mod.rs"]
mod common;

use common::stage_session;
use riglog::archive::{Archive, ArchiveError, LIST_HEADERS};
use riglog::compare::compare_combined;
use riglog::progress::NoProgress;
use riglog::session::ImportOptions;

#[test]
fn test_archive_full_lifecycle() {
    let root = tempfile::tempdir().unwrap();
    let data_dir = root.path().join("data");

    let mut archive = Archive::open(&data_dir, "general.log", ImportOptions::default()).unwrap();
    assert!(archive.sessions().is_empty());

    let staging = stage_session(root.path(), "staging", "2024-03-10 08:45:12");
    let id = archive.import_staged(&staging, &mut NoProgress).unwrap();
    assert_eq!(id, "2024-03-10 08;45;12");

    // The staged folder moved into the archive under the session id
    assert!(!staging.exists());
    assert!(data_dir.join("archive").join(&id).is_dir());

    // Listing carries the conventional columns
    let rows = archive.listing();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), LIST_HEADERS.len());
    assert_eq!(rows[0][0], id);
    assert_eq!(rows[0][2], "v1");

    // A second run sees the same session again
    drop(archive);
    let archive = Archive::open(&data_dir, "general.log", ImportOptions::default()).unwrap();
    assert_eq!(archive.sessions().len(), 1);
    assert!(archive.sessions()[0]
        .combined_stats("detection latency (ms)")
        .is_some());
}

#[test]
fn test_archive_rejects_duplicate_session() {
    let root = tempfile::tempdir().unwrap();
    let data_dir = root.path().join("data");
    let mut archive = Archive::open(&data_dir, "general.log", ImportOptions::default()).unwrap();

    let first = stage_session(root.path(), "in1", "2024-03-10 08:45:12");
    archive.import_staged(&first, &mut NoProgress).unwrap();

    let second = stage_session(root.path(), "in2", "2024-03-10 08:45:12");
    let err = archive.import_staged(&second, &mut NoProgress).unwrap_err();
    assert!(matches!(err, ArchiveError::AlreadyArchived(_)));
    assert_eq!(archive.sessions().len(), 1);
}

#[test]
fn test_archived_sessions_feed_comparison() {
    let root = tempfile::tempdir().unwrap();
    let data_dir = root.path().join("data");
    let mut archive = Archive::open(&data_dir, "general.log", ImportOptions::default()).unwrap();

    let a = stage_session(root.path(), "in1", "2024-03-10 08:45:12");
    let b = stage_session(root.path(), "in2", "2024-03-11 09:00:00");
    let id_a = archive.import_staged(&a, &mut NoProgress).unwrap();
    let id_b = archive.import_staged(&b, &mut NoProgress).unwrap();

    let sessions = archive.get(&[id_b, id_a]).unwrap();
    let result = compare_combined(&sessions, &["fps (Hz)".to_string()]);

    assert_eq!(result.labels.len(), 2);
    assert!(result.keys[0].slots.iter().all(|s| s.summary.is_some()));
}

#[test]
fn test_reimport_all_picks_up_manual_folders() {
    let root = tempfile::tempdir().unwrap();
    let data_dir = root.path().join("data");
    let mut archive = Archive::open(&data_dir, "general.log", ImportOptions::default()).unwrap();

    let staging = stage_session(root.path(), "in1", "2024-03-10 08:45:12");
    archive.import_staged(&staging, &mut NoProgress).unwrap();

    // A folder copied in by hand, unknown to the index
    stage_session(
        &data_dir.join("archive"),
        "2024-04-01 10;00;00",
        "2024-04-01 10:00:00",
    );

    let count = archive.reimport_all(&mut NoProgress).unwrap();
    assert_eq!(count, 2);

    // Reopening reflects the rebuilt index
    drop(archive);
    let archive = Archive::open(&data_dir, "general.log", ImportOptions::default()).unwrap();
    assert_eq!(archive.sessions().len(), 2);
}
