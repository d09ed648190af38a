//! Brute-force distance oracle.

use cluster_spi::{ClusterError, FeatureTable, NeighborQuery, Result};

/// Neighborhood queries answered by scanning every row of the table.
///
/// Each call computes the Euclidean distance between the query row and
/// every other row over the configured feature subset, O(rows x
/// features) per query. Adequate for the few thousand rows this system
/// targets; larger tables would swap in a spatial index behind the same
/// [`NeighborQuery`] contract.
pub struct BruteForceQuery<'a> {
    table: &'a FeatureTable,
    feature_idx: Vec<usize>,
    eps: f64,
}

impl<'a> BruteForceQuery<'a> {
    /// Resolve the feature columns and validate the selected values.
    ///
    /// Fails on unknown column names and on non-finite values (NaN or
    /// infinity), which would otherwise corrupt neighborhood membership
    /// through comparisons that silently come out false.
    pub fn new(table: &'a FeatureTable, features: &[String], eps: f64) -> Result<Self> {
        let mut feature_idx = Vec::with_capacity(features.len());
        for name in features {
            let idx = table
                .column_index(name)
                .ok_or_else(|| ClusterError::UnknownFeature { name: name.clone() })?;
            feature_idx.push(idx);
        }

        for row in 0..table.len() {
            for (&col, name) in feature_idx.iter().zip(features) {
                if !table.value(row, col).is_finite() {
                    return Err(ClusterError::NonFiniteValue {
                        key: table.key(row).to_string(),
                        column: name.clone(),
                    });
                }
            }
        }

        Ok(Self {
            table,
            feature_idx,
            eps,
        })
    }

    /// Euclidean distance between two rows over the feature subset.
    fn distance(&self, a: usize, b: usize) -> f64 {
        self.feature_idx
            .iter()
            .map(|&col| {
                let d = self.table.value(a, col) - self.table.value(b, col);
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

impl NeighborQuery for BruteForceQuery<'_> {
    fn neighbors(&self, row: usize) -> Result<Vec<usize>> {
        // Inclusive bound: a point exactly at eps is a neighbor.
        Ok((0..self.table.len())
            .filter(|&other| self.distance(row, other) <= self.eps)
            .collect())
    }

    fn len(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(xs: &[f64]) -> FeatureTable {
        let entries = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| (format!("k{:02}", i), vec![x]))
            .collect();
        FeatureTable::new(vec!["x".to_string()], entries).unwrap()
    }

    fn features() -> Vec<String> {
        vec!["x".to_string()]
    }

    #[test]
    fn test_query_point_always_included() {
        let t = table(&[0.0, 100.0]);
        let q = BruteForceQuery::new(&t, &features(), 0.0).unwrap();
        assert_eq!(q.neighbors(0).unwrap(), vec![0]);
        assert_eq!(q.neighbors(1).unwrap(), vec![1]);
    }

    #[test]
    fn test_inclusive_radius_boundary() {
        // Distance between the points is exactly eps.
        let t = table(&[0.0, 1.5]);
        let q = BruteForceQuery::new(&t, &features(), 1.5).unwrap();
        assert_eq!(q.neighbors(0).unwrap(), vec![0, 1]);
        assert_eq!(q.neighbors(1).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_results_in_table_order() {
        let t = table(&[2.0, 0.0, 1.0, 10.0]);
        let q = BruteForceQuery::new(&t, &features(), 2.0).unwrap();
        // Keys sort as k00..k03, so indices follow insertion order here.
        assert_eq!(q.neighbors(1).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_multi_feature_euclidean() {
        let entries = vec![
            ("a".to_string(), vec![0.0, 0.0]),
            ("b".to_string(), vec![3.0, 4.0]),
        ];
        let t = FeatureTable::new(vec!["x".to_string(), "y".to_string()], entries).unwrap();
        let cols = vec!["x".to_string(), "y".to_string()];

        // 3-4-5 triangle: distance is 5.
        let q = BruteForceQuery::new(&t, &cols, 5.0).unwrap();
        assert_eq!(q.neighbors(0).unwrap(), vec![0, 1]);
        let q = BruteForceQuery::new(&t, &cols, 4.999).unwrap();
        assert_eq!(q.neighbors(0).unwrap(), vec![0]);
    }

    #[test]
    fn test_distance_over_feature_subset_only() {
        // Rows far apart on y but identical on x; querying on x alone
        // must ignore y.
        let entries = vec![
            ("a".to_string(), vec![1.0, 0.0]),
            ("b".to_string(), vec![1.0, 999.0]),
        ];
        let t = FeatureTable::new(vec!["x".to_string(), "y".to_string()], entries).unwrap();
        let q = BruteForceQuery::new(&t, &features(), 0.1).unwrap();
        assert_eq!(q.neighbors(0).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_unknown_feature_rejected() {
        let t = table(&[0.0]);
        let result = BruteForceQuery::new(&t, &[String::from("missing")], 1.0);
        assert!(matches!(result, Err(ClusterError::UnknownFeature { .. })));
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let t = table(&[0.0, f64::NAN]);
        let result = BruteForceQuery::new(&t, &features(), 1.0);
        assert!(matches!(result, Err(ClusterError::NonFiniteValue { .. })));
    }
}
