//! On-disk dump store: `data_<source>.json[.zst]` documents holding raw
//! profiles and per-user comment lists, as handed over by collection.

use crate::util::{create_with_backoff, open_with_backoff, replace_file_atomic_backoff, tmp_sibling};
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use walkdir::WalkDir;
use zstd::stream::read::Decoder as ZstdDecoder;
use zstd::stream::write::Encoder as ZstdEncoder;

static DUMP_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data_[\w.-]+\.json(\.zst)?$").unwrap());

/// Provenance note written by the collector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DumpMeta {
    pub source: String,       // wall/group the comments came from
    pub retrieved_at: String, // RFC3339
}

impl DumpMeta {
    pub fn now(source: impl Into<String>) -> Self {
        let retrieved_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        Self { source: source.into(), retrieved_at }
    }
}

/// One collected corpus: raw profiles and per-user comment lists, keyed by
/// the user's opaque id. `BTreeMap` keeps iteration — and thus aggregation —
/// order deterministic.
///
/// Values stay raw JSON on purpose: a malformed profile or comment list must
/// only cost that one user, so shape errors surface per user during
/// aggregation instead of failing the whole file here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dump {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DumpMeta>,
    #[serde(default)]
    pub users: BTreeMap<String, Value>,
    #[serde(default)]
    pub data: BTreeMap<String, Value>,
}

impl Dump {
    /// Read a dump from `.json` or `.json.zst`.
    pub fn read(path: &Path, read_buf_bytes: usize) -> Result<Dump> {
        let file = open_with_backoff(path, 16, 50)
            .with_context(|| format!("open {}", path.display()))?;
        let dump = if is_zst(path) {
            let dec = ZstdDecoder::new(file)?;
            serde_json::from_reader(BufReader::with_capacity(read_buf_bytes, dec))
        } else {
            serde_json::from_reader(BufReader::with_capacity(read_buf_bytes, file))
        }
        .with_context(|| format!("parse dump {}", path.display()))?;
        Ok(dump)
    }

    /// Write a dump; compression follows the target extension. The document
    /// goes through a temp file promoted atomically, so a reader never
    /// observes a partial dump.
    pub fn write(&self, path: &Path, write_buf_bytes: usize) -> Result<()> {
        let tmp = tmp_sibling(path);
        {
            let file = create_with_backoff(&tmp, 16, 50)
                .with_context(|| format!("create {}", tmp.display()))?;
            if is_zst(path) {
                let mut enc = ZstdEncoder::new(file, 3)?;
                serde_json::to_writer(&mut enc, self)?;
                enc.finish()?;
            } else {
                let mut w = BufWriter::with_capacity(write_buf_bytes, file);
                serde_json::to_writer(&mut w, self)?;
                w.flush()?;
            }
        }
        replace_file_atomic_backoff(&tmp, path)
    }
}

fn is_zst(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("zst")
}

/// Find `data_*.json[.zst]` files directly under `dir`, sorted by name.
pub fn discover_dumps(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    if !dir.exists() {
        return found;
    }
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        if let Ok(ent) = entry {
            if let Some(name) = ent.file_name().to_str() {
                if DUMP_NAME.is_match(name) {
                    found.push(ent.path().to_path_buf());
                }
            }
        }
    }
    found.sort();
    found
}
