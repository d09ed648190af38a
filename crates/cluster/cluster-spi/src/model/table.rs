//! Read-only feature table consumed by the clustering core.

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

/// An ordered collection of rows, each keyed by an opaque, unique,
/// totally ordered identifier and holding one value per column.
///
/// Keys are timestamps upstream, but the core never parses them; it only
/// relies on their ordering. Rows are kept sorted by key ascending so
/// every iteration over the table sees the same order, which pins the
/// cluster-id numbering of a run. The table is immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureTable {
    columns: Vec<String>,
    keys: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureTable {
    /// Build a table from keyed rows.
    ///
    /// Rows are sorted by key; duplicate keys and rows whose length does
    /// not match the column list are rejected.
    pub fn new(columns: Vec<String>, mut entries: Vec<(String, Vec<f64>)>) -> Result<Self> {
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for pair in entries.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(ClusterError::DuplicateKey {
                    key: pair[0].0.clone(),
                });
            }
        }

        let mut keys = Vec::with_capacity(entries.len());
        let mut rows = Vec::with_capacity(entries.len());
        for (key, values) in entries {
            if values.len() != columns.len() {
                return Err(ClusterError::DimensionMismatch {
                    key,
                    expected: columns.len(),
                    got: values.len(),
                });
            }
            keys.push(key);
            rows.push(values);
        }

        Ok(Self {
            columns,
            keys,
            rows,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row keys, ascending.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Key of the row at `row`.
    pub fn key(&self, row: usize) -> &str {
        &self.keys[row]
    }

    /// All values of the row at `row`, in column order.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.rows[row]
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value at (`row`, column index `col`).
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col]
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| ClusterError::UnknownFeature {
                name: name.to_string(),
            })?;
        Ok(self.rows.iter().map(|r| r[idx]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    #[test]
    fn test_rows_sorted_by_key() {
        let table = FeatureTable::new(
            columns(),
            vec![
                ("2024-01-03".to_string(), vec![3.0, 30.0]),
                ("2024-01-01".to_string(), vec![1.0, 10.0]),
                ("2024-01-02".to_string(), vec![2.0, 20.0]),
            ],
        )
        .unwrap();

        assert_eq!(table.keys(), &["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(table.row(0), &[1.0, 10.0]);
        assert_eq!(table.row(2), &[3.0, 30.0]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = FeatureTable::new(
            columns(),
            vec![
                ("2024-01-01".to_string(), vec![1.0, 10.0]),
                ("2024-01-01".to_string(), vec![2.0, 20.0]),
            ],
        );
        assert!(matches!(result, Err(ClusterError::DuplicateKey { .. })));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let result = FeatureTable::new(
            columns(),
            vec![("2024-01-01".to_string(), vec![1.0])],
        );
        assert!(matches!(
            result,
            Err(ClusterError::DimensionMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_table_is_valid() {
        let table = FeatureTable::new(columns(), Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_column_access() {
        let table = FeatureTable::new(
            columns(),
            vec![
                ("k1".to_string(), vec![1.0, 10.0]),
                ("k2".to_string(), vec![2.0, 20.0]),
            ],
        )
        .unwrap();

        assert_eq!(table.column("b").unwrap(), vec![10.0, 20.0]);
        assert_eq!(table.column_index("a"), Some(0));
        assert_eq!(table.column_index("missing"), None);
        assert!(matches!(
            table.column("missing"),
            Err(ClusterError::UnknownFeature { .. })
        ));
    }
}
