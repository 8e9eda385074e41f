//! Parallel parsing of many files.
//!
//! Files go into a shared injector queue. Each worker refills its own FIFO deque
//! from the injector in batches and, once that runs dry, steals from its peers.
//! Workers share only the keyword table and the options, both read-only, and
//! each owns the trees it builds. Results are put back in
//! input order before they are returned.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_deque::{Injector, Steal, Stealer, Worker};
use serde::Serialize;

use crate::parser::{Keywords, ParseOptions};
use crate::{Error, Result};

pub const DEFAULT_EXTENSIONS: &[&str] = &["plsql", "pks", "pkb", "sql"];

#[derive(Debug, Clone)]
pub struct BatchConfig {
    jobs: usize,
    extensions: Vec<String>,
    recursive: bool,
    options: ParseOptions,
}

impl Default for BatchConfig {
    fn default() -> Self {
        let jobs = thread::available_parallelism()
            .map_or(1, |n| n.get().saturating_sub(1))
            .max(1);
        Self {
            jobs,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            recursive: true,
            options: ParseOptions::default(),
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Extensions without the dot, matched case-insensitively.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
    }
}

/// Outcome for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// No error-severity diagnostics and no I/O failure.
    pub ok: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub lines: usize,
    pub bytes: usize,
    pub elapsed: Duration,
    /// Operational failure (unreadable file, invalid UTF-8).
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub total_elapsed: Duration,
    pub jobs: usize,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.ok).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.ok)
    }

    /// Fraction of files without errors; an empty batch counts as fully successful.
    pub fn success_rate(&self) -> f64 {
        if self.files.is_empty() {
            return 1.0;
        }
        self.succeeded() as f64 / self.files.len() as f64
    }

    pub fn error_count(&self) -> usize {
        self.files.iter().map(|f| f.error_count).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|f| f.warning_count).sum()
    }

    pub fn total_lines(&self) -> usize {
        self.files.iter().map(|f| f.lines).sum()
    }

    pub fn files_per_second(&self) -> f64 {
        let secs = self.total_elapsed.as_secs_f64();
        if secs == 0.0 {
            return self.files.len() as f64;
        }
        self.files.len() as f64 / secs
    }
}

/// Source files under `root` with a configured extension, sorted by path.
///
/// A `root` that is itself a file is returned as is, whatever its extension.
pub fn discover(root: &Path, config: &BatchConfig) -> Result<Vec<PathBuf>> {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| Error::Io { path, source }
    };
    let meta = std::fs::metadata(root).map_err(io_error(root))?;
    if meta.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir).map_err(io_error(&dir))? {
            let entry = entry.map_err(io_error(&dir))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(io_error(&path))?;
            if file_type.is_dir() {
                if config.recursive {
                    pending.push(path);
                }
            } else if config.matches(&path) {
                files.push(path);
            }
        }
    }
    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "discovered files");
    Ok(files)
}

struct Task {
    index: usize,
    path: PathBuf,
}

/// Parses every file in `files` and reports in the same order.
pub fn run(files: &[PathBuf], config: &BatchConfig) -> BatchReport {
    let started = Instant::now();
    let keywords = Keywords::new();
    let jobs = config.jobs.min(files.len()).max(1);

    let injector = Injector::new();
    for (index, path) in files.iter().enumerate() {
        injector.push(Task {
            index,
            path: path.clone(),
        });
    }
    let workers: Vec<Worker<Task>> = (0..jobs).map(|_| Worker::new_fifo()).collect();
    let stealers: Vec<Stealer<Task>> = workers.iter().map(Worker::stealer).collect();

    let mut results: Vec<(usize, FileReport)> = thread::scope(|scope| {
        let handles: Vec<_> = workers
            .into_iter()
            .enumerate()
            .map(|(worker_id, local)| {
                let injector = &injector;
                let stealers = &stealers;
                let keywords = &keywords;
                let options = &config.options;
                scope.spawn(move || {
                    tracing::debug!(worker_id, "worker started");
                    let mut done = Vec::new();
                    while let Some(task) = find_task(&local, injector, worker_id, stealers) {
                        done.push((task.index, parse_one(&task.path, keywords, options)));
                    }
                    tracing::debug!(worker_id, parsed = done.len(), "worker finished");
                    done
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    tracing::error!("batch worker panicked");
                    Vec::new()
                })
            })
            .collect()
    });
    results.sort_by_key(|(index, _)| *index);

    let report = BatchReport {
        files: results.into_iter().map(|(_, report)| report).collect(),
        total_elapsed: started.elapsed(),
        jobs,
    };
    tracing::info!(
        files = report.files.len(),
        succeeded = report.succeeded(),
        errors = report.error_count(),
        elapsed_ms = report.total_elapsed.as_millis() as u64,
        "batch finished"
    );
    report
}

fn parse_one(path: &Path, keywords: &Keywords, options: &ParseOptions) -> FileReport {
    let started = Instant::now();
    let failure = |error: String, bytes: usize| FileReport {
        path: path.to_path_buf(),
        ok: false,
        error_count: 0,
        warning_count: 0,
        lines: 0,
        bytes,
        elapsed: started.elapsed(),
        error: Some(error),
    };

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(source) => {
            let err = Error::Io {
                path: path.to_path_buf(),
                source,
            };
            return failure(err.to_string(), 0);
        }
    };
    let file = path.display().to_string();
    let parsed = catch_unwind(AssertUnwindSafe(|| {
        crate::parse_bytes(&bytes, &file, keywords, options)
    }));
    match parsed {
        Ok(Ok(parse)) => {
            let diagnostics = parse.diagnostics();
            FileReport {
                path: path.to_path_buf(),
                ok: !diagnostics.has_errors(),
                error_count: diagnostics.error_count(),
                warning_count: diagnostics.warning_count(),
                lines: parse.source().lines().count(),
                bytes: bytes.len(),
                elapsed: started.elapsed(),
                error: None,
            }
        }
        Ok(Err(err)) => failure(err.to_string(), bytes.len()),
        Err(_) => {
            tracing::error!(file = %file, "parser panicked");
            failure("parser panicked".to_string(), bytes.len())
        }
    }
}

fn find_task<T>(
    local: &Worker<T>,
    injector: &Injector<T>,
    worker_id: usize,
    stealers: &[Stealer<T>],
) -> Option<T> {
    if let Some(task) = local.pop() {
        return Some(task);
    }
    loop {
        match injector.steal_batch_and_pop(local) {
            Steal::Success(task) => return Some(task),
            Steal::Empty => break,
            Steal::Retry => (),
        }
    }
    steal_from_peers(worker_id, stealers)
}

fn steal_from_peers<T>(worker_id: usize, stealers: &[Stealer<T>]) -> Option<T> {
    let peer_count = stealers.len();
    if peer_count <= 1 {
        return None;
    }

    for offset in 1..peer_count {
        let peer = (worker_id + offset) % peer_count;
        loop {
            match stealers[peer].steal() {
                Steal::Success(task) => return Some(task),
                Steal::Empty => break,
                Steal::Retry => (),
            }
        }
    }
    None
}
