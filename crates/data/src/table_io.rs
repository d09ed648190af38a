//! CSV reading and writing for feature tables.
//!
//! The on-disk layout follows the upstream pipeline: first column is the
//! timestamp key, remaining columns are numeric features, and labeled
//! files carry a trailing `cluster` column using `-1` for noise.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use cluster_spi::{FeatureTable, Label, LabelAssignment};

use crate::error::{DataError, Result};

/// Integer code for a label in CSV output: cluster id, `-1` for noise,
/// `-2` for unassigned (never emitted by a completed run).
pub fn label_code(label: Label) -> i64 {
    match label {
        Label::Cluster(id) => id as i64,
        Label::Noise => -1,
        Label::Unassigned => -2,
    }
}

/// Inverse of [`label_code`]. Codes below `-2`, the never-assigned id
/// `0`, and ids beyond `u32` have no label; a hand-edited file carrying
/// one must be rejected rather than cast.
pub fn label_from_code(code: i64) -> Option<Label> {
    match code {
        -1 => Some(Label::Noise),
        -2 => Some(Label::Unassigned),
        id if (1..=u32::MAX as i64).contains(&id) => Some(Label::Cluster(id as u32)),
        _ => None,
    }
}

/// Read a feature table from a CSV file. The first column is taken as
/// the row key; every other column must be numeric.
pub fn read_feature_table<P: AsRef<Path>>(path: P) -> Result<FeatureTable> {
    let file = File::open(path)?;
    read_feature_table_from(BufReader::new(file))
}

/// Read a feature table from any reader.
pub fn read_feature_table_from<R: Read>(reader: R) -> Result<FeatureTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() {
        return Err(DataError::MissingColumn {
            name: "key".to_string(),
        });
    }

    let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    let mut entries = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let key = record
            .get(0)
            .ok_or_else(|| DataError::MissingColumn {
                name: headers[0].to_string(),
            })?
            .to_string();

        let mut values = Vec::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let raw = record.get(i + 1).unwrap_or("").trim();
            let value = raw.parse::<f64>().map_err(|_| DataError::InvalidValue {
                key: key.clone(),
                column: column.clone(),
                value: raw.to_string(),
            })?;
            values.push(value);
        }
        entries.push((key, values));
    }

    Ok(FeatureTable::new(columns, entries)?)
}

/// Read a labeled results CSV (as written by [`write_labeled_table`]):
/// the feature table plus the integer cluster code per key.
pub fn read_labeled_table<P: AsRef<Path>>(path: P) -> Result<(FeatureTable, BTreeMap<String, i64>)> {
    let file = File::open(path)?;
    read_labeled_table_from(BufReader::new(file))
}

/// Read a labeled results CSV from any reader.
pub fn read_labeled_table_from<R: Read>(
    reader: R,
) -> Result<(FeatureTable, BTreeMap<String, i64>)> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let cluster_idx = headers
        .iter()
        .position(|h| h == "cluster")
        .ok_or_else(|| DataError::MissingColumn {
            name: "cluster".to_string(),
        })?;

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != 0 && i != cluster_idx)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut entries = Vec::new();
    let mut codes = BTreeMap::new();
    for record in csv_reader.records() {
        let record = record?;
        let key = record.get(0).unwrap_or("").to_string();

        let raw_code = record.get(cluster_idx).unwrap_or("").trim();
        let code = raw_code.parse::<i64>().map_err(|_| DataError::InvalidValue {
            key: key.clone(),
            column: "cluster".to_string(),
            value: raw_code.to_string(),
        })?;
        codes.insert(key.clone(), code);

        let mut values = Vec::with_capacity(columns.len());
        for (i, header) in headers.iter().enumerate() {
            if i == 0 || i == cluster_idx {
                continue;
            }
            let raw = record.get(i).unwrap_or("").trim();
            let value = raw.parse::<f64>().map_err(|_| DataError::InvalidValue {
                key: key.clone(),
                column: header.to_string(),
                value: raw.to_string(),
            })?;
            values.push(value);
        }
        entries.push((key, values));
    }

    Ok((FeatureTable::new(columns, entries)?, codes))
}

/// Write a feature table to CSV with `timestamp` as the key column.
pub fn write_feature_table<P: AsRef<Path>>(path: P, table: &FeatureTable) -> Result<()> {
    let file = File::create(path)?;
    write_feature_table_to(file, table)
}

/// Write a feature table to any writer.
pub fn write_feature_table_to<W: Write>(writer: W, table: &FeatureTable) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["timestamp".to_string()];
    header.extend(table.columns().iter().cloned());
    csv_writer.write_record(&header)?;

    for row in 0..table.len() {
        let mut record = vec![table.key(row).to_string()];
        record.extend(table.row(row).iter().map(|v| v.to_string()));
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the feature table with a trailing `cluster` column holding the
/// final label of each row, for downstream comparison and persistence.
pub fn write_labeled_table<P: AsRef<Path>>(
    path: P,
    table: &FeatureTable,
    assignment: &LabelAssignment,
) -> Result<()> {
    let file = File::create(path)?;
    write_labeled_table_to(file, table, assignment)
}

/// Write a labeled results CSV to any writer.
pub fn write_labeled_table_to<W: Write>(
    writer: W,
    table: &FeatureTable,
    assignment: &LabelAssignment,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["timestamp".to_string()];
    header.extend(table.columns().iter().cloned());
    header.push("cluster".to_string());
    csv_writer.write_record(&header)?;

    for row in 0..table.len() {
        let key = table.key(row);
        let label = assignment.get(key).unwrap_or(Label::Unassigned);

        let mut record = vec![key.to_string()];
        record.extend(table.row(row).iter().map(|v| v.to_string()));
        record.push(label_code(label).to_string());
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}
