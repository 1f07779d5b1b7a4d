use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Write a plain-JSON dump document to `path`.
pub fn write_dump_json(path: &Path, doc: &Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    write!(&mut f, "{}", doc).unwrap();
}

/// Write a zstd-compressed dump document (`.json.zst`).
pub fn write_dump_zst(path: &Path, doc: &Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    write!(&mut enc, "{}", doc).unwrap();
    enc.finish().unwrap();
}

/// Read a CSV file into rows of raw string fields (skips empty lines).
pub fn read_csv_rows(path: &Path) -> Vec<Vec<String>> {
    let f = File::open(path).unwrap();
    let r = BufReader::new(f);
    r.lines()
        .map(|l| l.unwrap())
        .filter(|s| !s.is_empty())
        .map(|s| s.split(',').map(|x| x.to_string()).collect())
        .collect()
}

/// Build a tiny **valid** corpus directory with one dump (`data_a.json`):
/// - user 101: valid profile (born 1990), 4 clean comments → retained 4
/// - user 102: malformed bdate ("1990") → rejected
/// - user 103: valid profile but only 2 raw comments → below threshold 3
/// - user 104: 4 raw comments, 2 are emoticon-only → retained 2, below 3
///
/// With `min_comments(3)`, only user 101 contributes rows.
pub fn make_corpus_basic() -> PathBuf {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.into_path();

    let dump = json!({
        "users": {
            "101": {"id": 101, "bdate": "1.1.1990", "sex": 1, "has_photo": 1, "university": 2},
            "102": {"id": 102, "bdate": "1990", "sex": 2},
            "103": {"id": 103, "bdate": "5.6.1985"},
            "104": {"id": 104, "bdate": "2.2.2000", "has_photo": 0}
        },
        "data": {
            "101": ["Hello there!", "Nice weather today.", "I like it. A lot!", "Short one"],
            "102": ["Who cares?", "Not me.", "Or you.", "Nobody cares."],
            "103": ["Too few.", "Really too few."],
            "104": ["Good :)", ":)", ":(", "Fine then."]
        }
    });
    write_dump_json(&base.join("data").join("data_a.json"), &dump);
    base
}
