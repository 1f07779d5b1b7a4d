//! Exporters: the flat CSV projection of the dataset, distribution tables,
//! and dataset JSON persistence. Every write goes through a temp file that
//! is promoted atomically.

use crate::aggregate::CorpusEntry;
use crate::features::FeatureVector;
use crate::util::{create_with_backoff, open_with_backoff, replace_file_atomic_backoff, tmp_sibling};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write the dataset as flat CSV: `u_id, u_sex, u_photo, u_uni, u_year`,
/// then one `f_<name>` column per exported feature. Raw counts never appear
/// in the projection.
pub fn write_dataset_csv(
    entries: &[CorpusEntry],
    path: &Path,
    write_buf_bytes: usize,
) -> Result<()> {
    let tmp = tmp_sibling(path);
    {
        let file = create_with_backoff(&tmp, 16, 50)
            .with_context(|| format!("create {}", tmp.display()))?;
        let mut w = csv::WriterBuilder::new()
            .buffer_capacity(write_buf_bytes)
            .from_writer(file);

        let mut header: Vec<String> = ["u_id", "u_sex", "u_photo", "u_uni", "u_year"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        header.extend(FeatureVector::EXPORTED.iter().map(|name| format!("f_{name}")));
        w.write_record(&header)?;

        for e in entries {
            let mut row: Vec<String> = vec![
                e.user.id.clone(),
                e.user.sex.to_string(),
                e.user.has_photo.to_string(),
                e.user.has_university.to_string(),
                e.user.year.to_string(),
            ];
            row.extend(e.features.exported_values().iter().map(|v| v.to_string()));
            w.write_record(&row)?;
        }
        w.flush()?;
    }
    replace_file_atomic_backoff(&tmp, path)
}

/// Two-column `key,count` table with no header; rows come out in the map's
/// (ascending) key order.
pub fn write_distribution_csv<K: Display>(
    table: &BTreeMap<K, u64>,
    path: &Path,
    write_buf_bytes: usize,
) -> Result<()> {
    let tmp = tmp_sibling(path);
    {
        let file = create_with_backoff(&tmp, 16, 50)
            .with_context(|| format!("create {}", tmp.display()))?;
        let mut w = csv::WriterBuilder::new()
            .buffer_capacity(write_buf_bytes)
            .from_writer(file);
        for (k, v) in table {
            w.write_record(&[k.to_string(), v.to_string()])?;
        }
        w.flush()?;
    }
    replace_file_atomic_backoff(&tmp, path)
}

/// Persist the full dataset as JSON.
pub fn write_dataset_json(
    entries: &[CorpusEntry],
    path: &Path,
    write_buf_bytes: usize,
) -> Result<()> {
    let tmp = tmp_sibling(path);
    {
        let file = create_with_backoff(&tmp, 16, 50)
            .with_context(|| format!("create {}", tmp.display()))?;
        let mut w = BufWriter::with_capacity(write_buf_bytes, file);
        serde_json::to_writer(&mut w, entries)?;
        w.flush()?;
    }
    replace_file_atomic_backoff(&tmp, path)
}

/// Re-load a previously persisted dataset (e.g. to rebuild distribution
/// tables without re-running aggregation).
pub fn read_dataset_json(path: &Path, read_buf_bytes: usize) -> Result<Vec<CorpusEntry>> {
    let file =
        open_with_backoff(path, 16, 50).with_context(|| format!("open {}", path.display()))?;
    let entries = serde_json::from_reader(BufReader::with_capacity(read_buf_bytes, file))
        .with_context(|| format!("parse dataset {}", path.display()))?;
    Ok(entries)
}
