//! Integration tests for the statistical flagger and the comparison
//! report, run against real clustering output.

use anomaly::{compare_methods, StdDevFlagger};
use cluster_api::RunConfig;
use cluster_core::run;
use cluster_spi::FeatureTable;

/// A tight group of ordinary days plus two extreme days. The extreme
/// days are both statistical outliers and density noise, so the two
/// methods should agree on them.
fn table() -> FeatureTable {
    let mut points = vec![
        0.50, 0.52, 0.48, 0.51, 0.49, 0.50, 0.53, 0.47, 0.52, 0.49, 0.51, 0.50,
    ];
    points.push(5.0);
    points.push(-4.0);

    let entries = points
        .iter()
        .enumerate()
        .map(|(i, &x)| (format!("2024-{:03}", i), vec![x]))
        .collect();
    FeatureTable::new(vec!["return_spread".to_string()], entries).unwrap()
}

fn features() -> Vec<String> {
    vec!["return_spread".to_string()]
}

#[test]
fn methods_agree_on_extreme_days() {
    let table = table();

    let outcome = run(&table, &RunConfig::new(0.1, 3, features())).unwrap();
    assert_eq!(outcome.summary.cluster_count, 1);
    assert_eq!(outcome.summary.noise_count, 2);

    let flags = StdDevFlagger::new(2.5).flag(&table, &features()).unwrap();
    assert_eq!(flags.anomaly_count(), 2);

    let report = compare_methods(&table, &flags, &outcome.assignment).unwrap();
    assert_eq!(report.both, vec!["2024-012", "2024-013"]);
    assert!(report.statistical_only.is_empty());
    assert!(report.cluster_only.is_empty());
    assert_eq!(report.agreement_rate, 1.0);
}

#[test]
fn methods_can_disagree() {
    // Shrink the band until ordinary days get flagged too; the
    // clustering outcome is unchanged, so those extra flags land in
    // statistical_only.
    let table = table();

    let outcome = run(&table, &RunConfig::new(0.1, 3, features())).unwrap();
    let flags = StdDevFlagger::new(0.01).flag(&table, &features()).unwrap();
    let report = compare_methods(&table, &flags, &outcome.assignment).unwrap();

    assert_eq!(report.both.len(), 2);
    assert!(!report.statistical_only.is_empty());
    assert!(report.agreement_rate < 1.0);
    assert_eq!(
        report.statistical_count,
        report.both.len() + report.statistical_only.len()
    );
}
