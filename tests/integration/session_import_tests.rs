//! Full session import cycles from raw files on disk.

#[path = "../common/mod.rs"]
mod common;

use common::{session_fixture, CAMERA_LOG, GENERAL_FULL};
use riglog::progress::{NoProgress, Progress};
use riglog::session::{import_session, ImportOptions, MetaValue};

#[test]
fn test_import_complete_session_cycle() {
    let dir = session_fixture(
        GENERAL_FULL,
        &[("cam0.log", CAMERA_LOG), ("cam1.log", CAMERA_LOG)],
    );

    let session = import_session(
        dir.path(),
        "general.log",
        ImportOptions::default(),
        &mut NoProgress,
    )
    .unwrap();

    // Metadata typing
    let meta = session.attributes();
    assert_eq!(meta.get("LIVE_FEED"), Some(&MetaValue::Bool(true)));
    assert_eq!(
        meta.get("COMMENT"),
        Some(&MetaValue::Text("calibration run".to_string()))
    );
    assert_eq!(session.folder_name(), "2024-03-10 08;45;12");
    assert!(session.identifier().contains("2024-03-10 08:45:12"));

    // Keys pooled across files, sorted, numeric only
    assert_eq!(
        session.keys(),
        &[
            "detection latency (ms)",
            "fps (Hz)",
            "frame_stats, jitter (ms)",
            "frame_stats, latency (ms)",
            "frames dropped",
        ]
    );

    // Combined stats pool both cameras (3 values each)
    let combined = session.combined_stats("detection latency (ms)").unwrap();
    assert_eq!(combined.summary.min, 11.9);
    assert_eq!(combined.summary.max, 14.1);

    // Per-file stats match a single file
    let per_file = session.file_stats("cam0.log", "fps (Hz)").unwrap();
    assert_eq!(per_file.summary.min, 29.0);
    assert_eq!(per_file.summary.max, 30.0);
}

#[test]
fn test_progress_reported_per_file() {
    struct Counter {
        total: usize,
        done: usize,
        finished: bool,
    }

    impl Progress for Counter {
        fn begin(&mut self, total: usize) {
            self.total = total;
        }
        fn file_done(&mut self, _name: &str) {
            self.done += 1;
        }
        fn finish(&mut self) {
            self.finished = true;
        }
    }

    let dir = session_fixture(
        GENERAL_FULL,
        &[("cam0.log", CAMERA_LOG), ("cam1.log", CAMERA_LOG)],
    );

    let mut counter = Counter {
        total: 0,
        done: 0,
        finished: false,
    };
    import_session(
        dir.path(),
        "general.log",
        ImportOptions::default(),
        &mut counter,
    )
    .unwrap();

    // general file plus two data files
    assert_eq!(counter.total, 3);
    assert_eq!(counter.done, 3);
    assert!(counter.finished);
}

#[test]
fn test_bad_data_file_does_not_corrupt_session() {
    let dir = session_fixture(
        GENERAL_FULL,
        &[
            ("cam0.log", "latency: 1.0 ms\n"),
            // Entirely free-form: classifies to nothing, yields no series
            ("notes.txt", "operator notes\nno structured data here\n"),
        ],
    );

    let session = import_session(
        dir.path(),
        "general.log",
        ImportOptions::default(),
        &mut NoProgress,
    )
    .unwrap();

    assert_eq!(session.keys(), &["latency (ms)"]);
    // The free-form file still imported, just with an empty series map
    assert!(session.file_series("notes.txt").unwrap().is_empty());
}
