//! Aggregation convention tests over the documented box-plot semantics.

use riglog::analysis::{box_stats, percentile};

const EPS: f64 = 1e-9;

#[test]
fn test_reference_scenario_high_outlier() {
    // Documented scenario: Q1=3.25, median=5.5, Q3=7.75, IQR=4.5,
    // fences at -3.5 and 14.5, 100 is the single outlier
    let values: Vec<f64> = (1..=9).map(|v| v as f64).chain([100.0]).collect();
    let stats = box_stats(&values).unwrap();

    assert!((stats.summary.q1 - 3.25).abs() < EPS);
    assert!((stats.summary.median - 5.5).abs() < EPS);
    assert!((stats.summary.q3 - 7.75).abs() < EPS);
    assert_eq!(stats.outliers, vec![100.0]);

    // Whisker-clipping convention: the fence value itself is reported
    assert!((stats.summary.max - 14.5).abs() < EPS);
    assert_eq!(stats.summary.min, 1.0);
}

#[test]
fn test_summary_ordering_holds_after_clipping() {
    let cases: Vec<Vec<f64>> = vec![
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0],
        vec![-100.0, -1.0, 0.0, 1.0, 2.0, 3.0, 4.0, 200.0],
        vec![0.5; 20],
        vec![1.0, 1.0, 1.0, 50.0],
    ];

    for values in cases {
        let stats = box_stats(&values).unwrap();
        let s = stats.summary;
        assert!(s.min <= s.q1 && s.q1 <= s.median && s.median <= s.q3 && s.q3 <= s.max,
            "ordering violated for {:?}: {:?}", values, s);
    }
}

#[test]
fn test_outliers_strictly_outside_fences() {
    let values = vec![-100.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
    let stats = box_stats(&values).unwrap();

    let mut sorted = values.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let q1 = percentile(&sorted, 25.0);
    let q3 = percentile(&sorted, 75.0);
    let lower = q1 - 1.5 * (q3 - q1);
    let upper = q3 + 1.5 * (q3 - q1);

    assert!(!stats.outliers.is_empty());
    for outlier in &stats.outliers {
        assert!(
            *outlier < lower || *outlier > upper,
            "{} is within the fences [{}, {}]",
            outlier,
            lower,
            upper
        );
    }
    // Exactly the out-of-fence values, no more
    let expected: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v < lower || *v > upper)
        .collect();
    let mut reported = stats.outliers.clone();
    reported.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(reported, expected);
}

#[test]
fn test_aggregation_is_deterministic() {
    let values = vec![3.2, 1.1, 9.9, 4.4, 4.4, 100.0, -2.0];
    assert_eq!(box_stats(&values).unwrap(), box_stats(&values).unwrap());
}

#[test]
fn test_repeated_outlier_values_preserved() {
    let values = vec![1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 3.0, 100.0, 100.0];
    let stats = box_stats(&values).unwrap();
    assert_eq!(stats.outliers, vec![100.0, 100.0]);
}
