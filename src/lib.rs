mod config;
mod util;
mod progress;
mod concurrency;

mod tokenize;
mod normalize;
mod features;
mod profile;
mod aggregate;
mod report;

mod dump;
mod collect;
mod export;
mod pipeline;

pub use crate::config::PipelineOptions;
pub use crate::pipeline::{RunSummary, StyloETL};

pub use crate::normalize::normalize_comment;
pub use crate::features::{extract, FeatureVector};
pub use crate::profile::{normalize_profile, RawProfile, UserRecord};
pub use crate::aggregate::{aggregate, AggregateCfg, Corpus, CorpusEntry};
pub use crate::report::{by_birth_year, by_comment_count};

// Dump store: the on-disk handoff between collection and aggregation.
pub use crate::dump::{discover_dumps, Dump, DumpMeta};

// Collector glue (wall/comment/profile harvesting over a VK-style API).
pub use crate::collect::{Collector, CollectorCfg};

// Tabular/JSON exporters for application code.
pub use crate::export::{
    read_dataset_json, write_dataset_csv, write_dataset_json, write_distribution_csv,
};

// Expose progress helpers so binaries can share one MultiProgress.
pub use crate::progress::{make_count_progress, set_global_multiprogress};

// Robust file ops, importable from the crate root.
pub use crate::util::{create_with_backoff, open_with_backoff, replace_file_atomic_backoff};
