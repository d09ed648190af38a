//! Per-feature standard-deviation flagger.

use cluster_spi::FeatureTable;
use serde::{Deserialize, Serialize};

use crate::error::{AnomalyError, Result};

/// Statistical flagging result, aligned with the table's row order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagResult {
    /// Boolean mask indicating flagged rows.
    pub is_anomaly: Vec<bool>,
    /// Threshold in standard deviations used for flagging.
    pub n_std: f64,
}

impl FlagResult {
    /// Count of flagged rows.
    pub fn anomaly_count(&self) -> usize {
        self.is_anomaly.iter().filter(|&&x| x).count()
    }

    /// Keys of flagged rows.
    pub fn flagged_keys<'a>(&self, table: &'a FeatureTable) -> Vec<&'a str> {
        self.is_anomaly
            .iter()
            .enumerate()
            .filter_map(|(i, &flagged)| if flagged { Some(table.key(i)) } else { None })
            .collect()
    }
}

/// Flags rows whose feature values lie beyond a configured number of
/// standard deviations from the column mean.
///
/// A row is flagged when any one of the selected features is outside
/// the band; the bands use the sample standard deviation of each
/// column, matching the upstream pipeline.
#[derive(Debug, Clone)]
pub struct StdDevFlagger {
    n_std: f64,
}

impl Default for StdDevFlagger {
    fn default() -> Self {
        Self::new(2.5)
    }
}

impl StdDevFlagger {
    pub fn new(n_std: f64) -> Self {
        Self { n_std }
    }

    /// Flag rows of `table` over the given feature columns.
    pub fn flag(&self, table: &FeatureTable, features: &[String]) -> Result<FlagResult> {
        if !self.n_std.is_finite() || self.n_std <= 0.0 {
            return Err(AnomalyError::InvalidParameter {
                name: "n_std".to_string(),
                reason: "must be a finite value > 0".to_string(),
            });
        }
        if features.is_empty() {
            return Err(AnomalyError::InvalidParameter {
                name: "features".to_string(),
                reason: "at least one feature column is required".to_string(),
            });
        }

        let mut is_anomaly = vec![false; table.len()];
        for name in features {
            let values = table
                .column(name)
                .map_err(|_| AnomalyError::UnknownFeature { name: name.clone() })?;
            let Some((mean, std)) = column_stats(&values) else {
                continue;
            };

            let lower = mean - self.n_std * std;
            let upper = mean + self.n_std * std;
            for (i, &v) in values.iter().enumerate() {
                if v < lower || v > upper {
                    is_anomaly[i] = true;
                }
            }
        }

        Ok(FlagResult {
            is_anomaly,
            n_std: self.n_std,
        })
    }
}

/// Mean and sample standard deviation; `None` when fewer than two rows
/// make a std meaningless.
fn column_stats(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some((mean, var.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(values: &[f64]) -> FeatureTable {
        let entries = values
            .iter()
            .enumerate()
            .map(|(i, &v)| (format!("k{:02}", i), vec![v]))
            .collect();
        FeatureTable::new(vec!["x".to_string()], entries).unwrap()
    }

    fn x() -> Vec<String> {
        vec!["x".to_string()]
    }

    #[test]
    fn test_flags_extreme_value() {
        let t = table(&[10.0, 10.5, 9.5, 10.2, 9.8, 10.1, 9.9, 10.3, 9.7, 100.0]);
        let result = StdDevFlagger::new(2.5).flag(&t, &x()).unwrap();

        assert_eq!(result.anomaly_count(), 1);
        assert!(result.is_anomaly[9]);
        assert_eq!(result.flagged_keys(&t), vec!["k09"]);
    }

    #[test]
    fn test_no_flags_on_uniform_data() {
        let t = table(&[10.0, 10.1, 9.9, 10.05, 9.95, 10.02]);
        let result = StdDevFlagger::default().flag(&t, &x()).unwrap();
        assert_eq!(result.anomaly_count(), 0);
    }

    #[test]
    fn test_any_feature_out_of_band_flags_the_row() {
        let entries = vec![
            ("k0".to_string(), vec![1.0, 50.0]),
            ("k1".to_string(), vec![1.1, 50.5]),
            ("k2".to_string(), vec![0.9, 49.5]),
            ("k3".to_string(), vec![1.0, 50.2]),
            ("k4".to_string(), vec![1.05, 49.8]),
            // Normal on x, extreme on y.
            ("k5".to_string(), vec![1.0, 500.0]),
        ];
        let t = FeatureTable::new(vec!["x".to_string(), "y".to_string()], entries).unwrap();
        let result = StdDevFlagger::new(2.0)
            .flag(&t, &["x".to_string(), "y".to_string()])
            .unwrap();

        assert!(result.is_anomaly[5]);
        assert_eq!(result.anomaly_count(), 1);
    }

    #[test]
    fn test_invalid_n_std_rejected() {
        let t = table(&[1.0, 2.0]);
        assert!(StdDevFlagger::new(0.0).flag(&t, &x()).is_err());
        assert!(StdDevFlagger::new(-1.0).flag(&t, &x()).is_err());
        assert!(StdDevFlagger::new(f64::NAN).flag(&t, &x()).is_err());
    }

    #[test]
    fn test_unknown_feature_rejected() {
        let t = table(&[1.0, 2.0]);
        let result = StdDevFlagger::default().flag(&t, &["missing".to_string()]);
        assert!(matches!(result, Err(AnomalyError::UnknownFeature { .. })));
    }

    #[test]
    fn test_single_row_never_flagged() {
        let t = table(&[42.0]);
        let result = StdDevFlagger::default().flag(&t, &x()).unwrap();
        assert_eq!(result.anomaly_count(), 0);
    }
}
