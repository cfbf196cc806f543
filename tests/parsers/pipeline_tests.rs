//! End-to-end tests of the classify → normalize pipeline over realistic
//! rig log text.

#[path = "../common/mod.rs"]
mod common;

use common::CAMERA_LOG;
use riglog::parsers::{normalize_scan, scan_lines, SeriesValues};

// ============================================
// Classification Tests
// ============================================

#[test]
fn test_scan_groups_repeated_keys() {
    let scan = scan_lines(CAMERA_LOG);

    assert_eq!(
        scan.series.get("detection latency"),
        Some(
            &[
                "12.5 ms".to_string(),
                "14.1 ms".to_string(),
                "11.9 ms".to_string()
            ][..]
        )
    );
    assert_eq!(
        scan.series.get("fps"),
        Some(&["30 Hz".to_string(), "29 Hz".to_string()][..])
    );
}

#[test]
fn test_scan_dedups_banner_lines() {
    let scan = scan_lines(CAMERA_LOG);
    // "camera pipeline started" appears twice in the file, once in the bucket
    assert_eq!(scan.unclassified, vec!["camera pipeline started".to_string()]);
}

#[test]
fn test_scan_value_keeps_later_separators() {
    let scan = scan_lines("RECORDING_FOLDER: /data/rec:archive/run\n");
    assert_eq!(
        scan.series.get("RECORDING_FOLDER"),
        Some(&["/data/rec:archive/run".to_string()][..])
    );
}

// ============================================
// Normalization Tests
// ============================================

#[test]
fn test_normalize_full_camera_log() {
    let scan = scan_lines(CAMERA_LOG);
    let series = normalize_scan(&scan, false).unwrap();

    let keys: Vec<&str> = series.keys().collect();
    assert_eq!(
        keys,
        vec![
            "detection latency (ms)",
            "fps (Hz)",
            "frame_stats, jitter (ms)",
            "frame_stats, latency (ms)",
            "frames dropped",
            "status",
        ]
    );

    assert_eq!(
        series.get("detection latency (ms)").and_then(|v| v.numbers()),
        Some(&[12.5, 14.1, 11.9][..])
    );
    assert_eq!(
        series.get("fps (Hz)").and_then(|v| v.numbers()),
        Some(&[30.0, 29.0][..])
    );
    assert_eq!(
        series.get("frame_stats, latency (ms)").and_then(|v| v.numbers()),
        Some(&[12.5, 13.1][..])
    );
    assert_eq!(
        series.get("frame_stats, jitter (ms)").and_then(|v| v.numbers()),
        Some(&[0.3, 0.4][..])
    );
    assert_eq!(
        series.get("frames dropped").and_then(|v| v.numbers()),
        Some(&[0.0, 2.0][..])
    );
    assert_eq!(
        series.get("status"),
        Some(&SeriesValues::Text(vec!["ok".to_string()]))
    );
}

#[test]
fn test_normalize_drops_malformed_values_without_aborting() {
    let text = "latency: 10.0 ms\nlatency: corrupted line here\nlatency: 12.0 ms\n";
    let scan = scan_lines(text);
    let series = normalize_scan(&scan, false).unwrap();

    assert_eq!(
        series.get("latency (ms)").and_then(|v| v.numbers()),
        Some(&[10.0, 12.0][..])
    );
}

#[test]
fn test_normalize_excludes_unrecognized_shape() {
    let text = "note: several words of prose\nnote: more prose follows\nfps: 30 Hz\n";
    let scan = scan_lines(text);
    let series = normalize_scan(&scan, false).unwrap();

    assert!(series.get("note").is_none());
    assert!(series.get("fps (Hz)").is_some());
}

#[test]
fn test_normalize_strict_mode_aborts() {
    let text = "latency: 10.0 ms\nlatency: corrupted line here\n";
    let scan = scan_lines(text);
    assert!(normalize_scan(&scan, true).is_err());
}
