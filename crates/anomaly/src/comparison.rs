//! Overlap between clustering noise and the statistical flagger.
//!
//! The two methods define "unusual day" differently; the report shows
//! where they agree and how much of the union that agreement covers.

use cluster_spi::{FeatureTable, Label, LabelAssignment};
use serde::{Deserialize, Serialize};

use crate::error::{AnomalyError, Result};
use crate::flagger::FlagResult;

/// Agreement report between the two anomaly definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodComparison {
    /// Keys flagged by both methods.
    pub both: Vec<String>,
    /// Keys flagged only by the statistical method.
    pub statistical_only: Vec<String>,
    /// Keys labeled noise only by the clustering run.
    pub cluster_only: Vec<String>,
    /// Rows analyzed.
    pub total_rows: usize,
    /// Total statistical anomalies.
    pub statistical_count: usize,
    /// Total clustering noise rows.
    pub cluster_noise_count: usize,
    /// `|both| / |union|`; 0 when neither method flagged anything.
    pub agreement_rate: f64,
}

/// Compare the statistical flags against the clustering run's noise
/// labels, row by row.
pub fn compare_methods(
    table: &FeatureTable,
    flags: &FlagResult,
    assignment: &LabelAssignment,
) -> Result<MethodComparison> {
    if flags.is_anomaly.len() != table.len() {
        return Err(AnomalyError::LengthMismatch {
            expected: table.len(),
            got: flags.is_anomaly.len(),
        });
    }

    let mut both = Vec::new();
    let mut statistical_only = Vec::new();
    let mut cluster_only = Vec::new();

    for row in 0..table.len() {
        let key = table.key(row);
        let statistical = flags.is_anomaly[row];
        let noise = assignment.get(key) == Some(Label::Noise);

        match (statistical, noise) {
            (true, true) => both.push(key.to_string()),
            (true, false) => statistical_only.push(key.to_string()),
            (false, true) => cluster_only.push(key.to_string()),
            (false, false) => {}
        }
    }

    let union = both.len() + statistical_only.len() + cluster_only.len();
    let agreement_rate = if union == 0 {
        0.0
    } else {
        both.len() as f64 / union as f64
    };

    Ok(MethodComparison {
        statistical_count: both.len() + statistical_only.len(),
        cluster_noise_count: both.len() + cluster_only.len(),
        total_rows: table.len(),
        agreement_rate,
        both,
        statistical_only,
        cluster_only,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn table(n: usize) -> FeatureTable {
        let entries = (0..n).map(|i| (format!("k{:02}", i), vec![i as f64])).collect();
        FeatureTable::new(vec!["x".to_string()], entries).unwrap()
    }

    fn assignment(noise: &[usize], n: usize) -> LabelAssignment {
        let mut labels = BTreeMap::new();
        for i in 0..n {
            let label = if noise.contains(&i) {
                Label::Noise
            } else {
                Label::Cluster(1)
            };
            labels.insert(format!("k{:02}", i), label);
        }
        LabelAssignment::new(labels)
    }

    fn flags(flagged: &[usize], n: usize) -> FlagResult {
        FlagResult {
            is_anomaly: (0..n).map(|i| flagged.contains(&i)).collect(),
            n_std: 2.5,
        }
    }

    #[test]
    fn test_overlap_buckets() {
        let t = table(5);
        // Statistical: {1, 2}. Noise: {2, 3}.
        let report = compare_methods(&t, &flags(&[1, 2], 5), &assignment(&[2, 3], 5)).unwrap();

        assert_eq!(report.both, vec!["k02"]);
        assert_eq!(report.statistical_only, vec!["k01"]);
        assert_eq!(report.cluster_only, vec!["k03"]);
        assert_eq!(report.statistical_count, 2);
        assert_eq!(report.cluster_noise_count, 2);
        assert_eq!(report.total_rows, 5);
        // 1 agreement over a union of 3.
        assert!((report.agreement_rate - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_anomalies_anywhere() {
        let t = table(3);
        let report = compare_methods(&t, &flags(&[], 3), &assignment(&[], 3)).unwrap();
        assert!(report.both.is_empty());
        assert_eq!(report.agreement_rate, 0.0);
    }

    #[test]
    fn test_perfect_agreement() {
        let t = table(4);
        let report = compare_methods(&t, &flags(&[0, 3], 4), &assignment(&[0, 3], 4)).unwrap();
        assert_eq!(report.both.len(), 2);
        assert!(report.statistical_only.is_empty());
        assert!(report.cluster_only.is_empty());
        assert_eq!(report.agreement_rate, 1.0);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let t = table(4);
        let result = compare_methods(&t, &flags(&[], 2), &assignment(&[], 4));
        assert!(matches!(result, Err(AnomalyError::LengthMismatch { .. })));
    }
}
