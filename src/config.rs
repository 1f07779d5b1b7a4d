use std::path::{Path, PathBuf};

/// User-facing options with sensible defaults and builder chaining.
///
/// All knobs are static run-time parameters; `StyloETL` copies them once at
/// the start of a run and never mutates them afterwards.
#[derive(Clone, Debug)]
pub struct PipelineOptions {
    pub data_dir: PathBuf,            // directory holding data_*.json[.zst] dumps
    pub out_dir: PathBuf,             // dataset JSON/CSV outputs
    pub analysis_dir: PathBuf,        // distribution tables

    pub min_comments: usize,          // per-user retained-comment threshold
    pub year_from: i32,               // inclusive birth-year lower bound
    pub year_to: i32,                 // inclusive birth-year upper bound
    pub squash_punct: bool,           // collapse runs of identical punctuation
    pub average: bool,                // one averaged row per user instead of one per comment

    pub parallelism: Option<usize>,   // Some(N) to size the rayon pool, None for default
    pub dump_concurrency: usize,      // limit number of dump files processed concurrently
    pub progress: bool,               // show progress bar
    pub progress_label: Option<String>, // optional label for progress bar

    // IO tuning
    pub read_buffer_bytes: usize,     // BufReader capacity
    pub write_buffer_bytes: usize,    // BufWriter capacity
}

impl Default for PipelineOptions {
    fn default() -> Self {
        let out = PathBuf::from("./out");
        // Defaults chosen to be safe but noticeably faster than std defaults.
        let default_read = 256 * 1024;
        let default_write = 256 * 1024;

        Self {
            data_dir: PathBuf::from("./data"),
            analysis_dir: out.join("analysis"),
            out_dir: out,

            min_comments: 10,
            year_from: 1957,
            year_to: 2010,
            squash_punct: true,
            average: false,

            parallelism: None,
            dump_concurrency: 1, // safe default: one dump fully materialized at a time
            progress: true,
            progress_label: None,

            read_buffer_bytes: default_read,
            write_buffer_bytes: default_write,
        }
    }
}

impl PipelineOptions {
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_out_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let out = dir.as_ref().to_path_buf();
        self.analysis_dir = out.join("analysis");
        self.out_dir = out;
        self
    }
    pub fn with_analysis_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.analysis_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_min_comments(mut self, n: usize) -> Self {
        self.min_comments = n;
        self
    }
    pub fn with_year_range(mut self, from: i32, to: i32) -> Self {
        self.year_from = from;
        self.year_to = to;
        self
    }
    pub fn with_squash_punct(mut self, yes: bool) -> Self {
        self.squash_punct = yes;
        self
    }
    pub fn with_average(mut self, yes: bool) -> Self {
        self.average = yes;
        self
    }
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }
    pub fn with_dump_concurrency(mut self, n: usize) -> Self {
        self.dump_concurrency = n.max(1);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }

    // IO buffers tuning
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
}
