use crate::aggregate::{aggregate, AggregateCfg, Corpus};
use crate::config::PipelineOptions;
use crate::dump::{discover_dumps, Dump};
use crate::export::{write_dataset_csv, write_dataset_json, write_distribution_csv};
use crate::progress::make_count_progress;
use crate::report::{by_birth_year, by_comment_count};
use crate::util::init_tracing_once;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};

/// Builder-style entry point for the whole pipeline.
#[derive(Clone)]
pub struct StyloETL {
    pub(crate) opts: PipelineOptions,
}

/// What a full run produced, for callers that log or assert on it.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunSummary {
    pub dumps: usize,
    pub users: usize,
    pub rows: usize,
}

impl StyloETL {
    pub fn new() -> Self {
        Self { opts: PipelineOptions::default() }
    }

    // -------- Builder methods --------
    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_data_dir(dir); self }
    pub fn out_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_out_dir(dir); self }
    pub fn analysis_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_analysis_dir(dir); self }
    pub fn min_comments(mut self, n: usize) -> Self { self.opts = self.opts.with_min_comments(n); self }
    pub fn year_range(mut self, from: i32, to: i32) -> Self { self.opts = self.opts.with_year_range(from, to); self }
    pub fn squash_punct(mut self, yes: bool) -> Self { self.opts = self.opts.with_squash_punct(yes); self }
    pub fn average(mut self, yes: bool) -> Self { self.opts = self.opts.with_average(yes); self }
    pub fn parallelism(mut self, threads: usize) -> Self { self.opts = self.opts.with_parallelism(threads); self }
    pub fn dump_concurrency(mut self, n: usize) -> Self { self.opts = self.opts.with_dump_concurrency(n); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }
    pub fn io_write_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_write_buffer(bytes); self }

    fn aggregate_cfg(&self) -> AggregateCfg {
        AggregateCfg {
            min_comments: self.opts.min_comments,
            year_from: self.opts.year_from,
            year_to: self.opts.year_to,
            squash_punct: self.opts.squash_punct,
            average: self.opts.average,
        }
    }

    /// Aggregate every dump under `data_dir` into one corpus.
    ///
    /// Dumps are processed `dump_concurrency` at a time; per-dump results
    /// are merged in discovery (name) order regardless of completion order,
    /// so a run is deterministic.
    pub fn aggregate_dumps(&self) -> Result<Corpus> {
        init_tracing_once();
        if let Some(n) = self.opts.parallelism {
            if n > 0 {
                rayon::ThreadPoolBuilder::new().num_threads(n).build_global().ok();
            }
        }

        let dumps = discover_dumps(&self.opts.data_dir);
        if dumps.is_empty() {
            tracing::warn!("No dump files found under {}. Check data_dir.", self.opts.data_dir.display());
            return Ok(Corpus::default());
        }
        tracing::info!("Planned {} dump files for processing.", dumps.len());

        let pb = if self.opts.progress {
            Some(make_count_progress(
                dumps.len() as u64,
                self.opts.progress_label.as_deref().unwrap_or("Aggregate: dumps"),
            ))
        } else {
            None
        };

        let cfg = self.aggregate_cfg();
        let jobs: Vec<(usize, PathBuf)> = dumps.into_iter().enumerate().collect();
        let parts = Mutex::new(Vec::<(usize, Corpus)>::new());

        crate::concurrency::for_each_limited(&jobs, self.opts.dump_concurrency, |(idx, path)| {
            let dump = Dump::read(path, self.opts.read_buffer_bytes)
                .with_context(|| format!("processing {}", path.display()))?;
            let part = aggregate(&dump.users, &dump.data, &cfg);
            parts.lock().push((*idx, part));
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            Ok(())
        })?;

        if let Some(pb) = pb {
            pb.finish_with_message("Aggregate: done");
        }

        let mut parts = parts.into_inner();
        parts.sort_by_key(|(idx, _)| *idx);
        let mut total = Corpus::default();
        for (_, part) in parts {
            total.merge(part);
        }
        Ok(total)
    }

    /// Full run: aggregate, persist the dataset (JSON + flat CSV), write
    /// both distribution tables.
    pub fn run(&self) -> Result<RunSummary> {
        let dump_count = discover_dumps(&self.opts.data_dir).len();
        let corpus = self.aggregate_dumps()?;

        fs::create_dir_all(&self.opts.out_dir)?;
        fs::create_dir_all(&self.opts.analysis_dir)?;

        // Averaged runs keep their historical `avg_` file prefix.
        let prefix = if self.opts.average { "avg_" } else { "" };
        let wb = self.opts.write_buffer_bytes;

        write_dataset_json(
            &corpus.entries,
            &self.opts.out_dir.join(format!("{prefix}preprocessed_data.json")),
            wb,
        )?;
        write_dataset_csv(
            &corpus.entries,
            &self.opts.out_dir.join(format!("{prefix}csv_data.csv")),
            wb,
        )?;

        write_distribution_csv(
            &by_comment_count(&corpus.retained_counts),
            &self.opts.analysis_dir.join("by_comments_count.csv"),
            wb,
        )?;
        write_distribution_csv(
            &by_birth_year(&corpus.entries, self.opts.year_from, self.opts.year_to),
            &self.opts.analysis_dir.join("by_birth_year.csv"),
            wb,
        )?;

        Ok(RunSummary {
            dumps: dump_count,
            users: corpus.retained_counts.len(),
            rows: corpus.entries.len(),
        })
    }
}

impl Default for StyloETL {
    fn default() -> Self {
        Self::new()
    }
}
