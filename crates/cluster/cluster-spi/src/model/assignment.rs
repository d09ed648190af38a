//! Final output of a clustering run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Label;

/// Mapping from row key to final label. Immutable once a run completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelAssignment {
    labels: BTreeMap<String, Label>,
}

impl LabelAssignment {
    pub fn new(labels: BTreeMap<String, Label>) -> Self {
        Self { labels }
    }

    /// Label of a row, if the key was part of the run.
    pub fn get(&self, key: &str) -> Option<Label> {
        self.labels.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All (key, label) pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Label)> {
        self.labels.iter().map(|(k, &l)| (k.as_str(), l))
    }

    /// Keys whose final label is noise.
    pub fn noise_keys(&self) -> Vec<&str> {
        self.labels
            .iter()
            .filter(|(_, &l)| l == Label::Noise)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Member keys grouped by cluster id, ascending.
    pub fn clusters(&self) -> BTreeMap<u32, Vec<&str>> {
        let mut out: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
        for (key, label) in self.labels.iter() {
            if let Label::Cluster(id) = label {
                out.entry(*id).or_default().push(key.as_str());
            }
        }
        out
    }
}

/// Summary counts reported by the run driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of distinct cluster ids assigned during the run.
    pub cluster_count: usize,
    /// Rows whose final label is noise.
    pub noise_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment() -> LabelAssignment {
        let mut labels = BTreeMap::new();
        labels.insert("k1".to_string(), Label::Cluster(1));
        labels.insert("k2".to_string(), Label::Noise);
        labels.insert("k3".to_string(), Label::Cluster(1));
        labels.insert("k4".to_string(), Label::Cluster(2));
        LabelAssignment::new(labels)
    }

    #[test]
    fn test_get() {
        let a = assignment();
        assert_eq!(a.get("k1"), Some(Label::Cluster(1)));
        assert_eq!(a.get("k2"), Some(Label::Noise));
        assert_eq!(a.get("missing"), None);
    }

    #[test]
    fn test_noise_keys() {
        assert_eq!(assignment().noise_keys(), vec!["k2"]);
    }

    #[test]
    fn test_clusters_grouped_by_id() {
        let a = assignment();
        let clusters = a.clusters();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[&1], vec!["k1", "k3"]);
        assert_eq!(clusters[&2], vec!["k4"]);
    }
}
