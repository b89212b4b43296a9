//! Pipeline wiring: source → pool → merger → orderer → sink

use super::{
    drain_to_sink, merge_streams, FileHasher, HashReport, JobExecutor, JobSource, PipelineStats,
    PoolHandles, ReportSink, WorkerPool,
};
use crate::config::PipelineConfig;
use crate::error::{HashPipeError, Result};
use crate::hash::{hash_reader, registry, Digest, HashAlgorithm};
use crate::progress::ProgressReporter;
use std::io::{self, Read};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    /// Algorithm every job used
    pub algorithm: HashAlgorithm,
    /// Jobs submitted
    pub jobs: usize,
    /// Workers started
    pub workers: usize,
    /// Reports handed to the sink
    pub emitted: usize,
    /// Reports carrying a digest
    pub succeeded: u64,
    /// Reports carrying a failure
    pub failed: u64,
    /// Bytes consumed by successful jobs
    pub bytes_hashed: u64,
    /// Wall time of the run
    pub duration: Duration,
}

impl PipelineSummary {
    /// Check that every job produced a digest
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.emitted == self.jobs
    }

    /// Hashing throughput in bytes/second
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.bytes_hashed as f64 / secs
        } else {
            0.0
        }
    }

    /// Print summary to stderr
    pub fn print_summary(&self) {
        eprintln!("\n=== Hash Summary ===");
        eprintln!("Algorithm:       {}", self.algorithm);
        eprintln!("Jobs:            {}", self.jobs);
        eprintln!("Workers:         {}", self.workers);
        eprintln!("Succeeded:       {}", self.succeeded);
        eprintln!("Failed:          {}", self.failed);
        eprintln!("Bytes hashed:    {}", humansize::format_size(self.bytes_hashed, humansize::BINARY));
        eprintln!("Duration:        {:.2?}", self.duration);
        eprintln!("Throughput:      {}/s", humansize::format_size(self.throughput() as u64, humansize::BINARY));
    }
}

/// Concurrent hashing pipeline
pub struct HashPipeline {
    config: PipelineConfig,
    executor: Arc<dyn JobExecutor>,
    progress: Option<ProgressReporter>,
    stats: Arc<PipelineStats>,
}

impl HashPipeline {
    /// Create a pipeline that hashes files from disk
    pub fn new(config: PipelineConfig) -> Self {
        let executor = Arc::new(FileHasher::new(config.read_buffer_size));
        Self {
            config,
            executor,
            progress: None,
            stats: Arc::new(PipelineStats::default()),
        }
    }

    /// Replace the job executor
    pub fn with_executor(mut self, executor: Arc<dyn JobExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Set progress reporter
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Live counters, cumulative over every run of this pipeline
    pub fn stats(&self) -> Arc<PipelineStats> {
        Arc::clone(&self.stats)
    }

    /// Run every job and hand each report to `sink`.
    ///
    /// An unsupported algorithm fails here before any thread starts. Per-job
    /// I/O failures do not fail the run; they arrive at the sink as reports.
    /// All spawned threads are joined before this returns.
    pub fn run<S>(&self, sink: &mut S) -> Result<PipelineSummary>
    where
        S: ReportSink + ?Sized,
    {
        let start = Instant::now();
        let source = JobSource::new(
            self.config.sources.iter().map(String::as_str),
            &self.config.algorithm,
        )?;

        let job_count = source.len();
        let algorithm = source.algorithm();

        self.stats
            .jobs_submitted
            .fetch_add(job_count as u64, Ordering::Relaxed);

        let mut pool = WorkerPool::new(self.config.workers, job_count)
            .with_result_buffer(self.config.buffer)
            .with_executor(Arc::clone(&self.executor))
            .with_stats(Arc::clone(&self.stats));
        if let Some(progress) = &self.progress {
            progress.set_total_jobs(job_count as u64);
            progress.set_current(algorithm.name());
            pool = pool.with_progress(progress.clone());
        }
        let workers = pool.workers();

        info!(
            "Hashing {} sources with {} on {} workers ({} order)",
            job_count, algorithm, workers, self.config.order
        );

        let (jobs, feeder) = source.spawn(self.config.queue_size)?;
        let PoolHandles { streams, handles } = pool.spawn(jobs)?;
        let (merged, forwarders) = merge_streams(streams, self.config.buffer)?;

        let mut tally = Tally::new(sink);
        let drained = drain_to_sink(&merged, self.config.order, job_count, &mut tally);

        // Closing the merged stream unblocks every upstream stage if the sink failed.
        drop(merged);
        let joined = join_all(feeder, handles, forwarders);

        joined?;
        let emitted = drained?;

        let summary = PipelineSummary {
            algorithm,
            jobs: job_count,
            workers,
            emitted,
            succeeded: tally.succeeded,
            failed: tally.failed,
            bytes_hashed: tally.bytes,
            duration: start.elapsed(),
        };

        if let Some(progress) = &self.progress {
            if summary.failed == 0 {
                progress.finish_success(&format!("{} sources hashed", summary.succeeded));
            } else {
                progress.finish_error(&format!("{} of {} sources failed", summary.failed, job_count));
            }
        }

        info!(
            "Finished {} jobs in {:.2?}: {} ok, {} failed",
            summary.emitted, summary.duration, summary.succeeded, summary.failed
        );
        debug!(
            "{} jobs finished over the lifetime of this pipeline",
            self.stats.jobs_finished()
        );

        Ok(summary)
    }
}

/// Counts the reports of one run on their way to the caller's sink
struct Tally<'a, S: ?Sized> {
    inner: &'a mut S,
    succeeded: u64,
    failed: u64,
    bytes: u64,
}

impl<'a, S: ReportSink + ?Sized> Tally<'a, S> {
    fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            succeeded: 0,
            failed: 0,
            bytes: 0,
        }
    }
}

impl<S: ReportSink + ?Sized> ReportSink for Tally<'_, S> {
    fn emit(&mut self, report: &HashReport) -> io::Result<()> {
        self.inner.emit(report)?;
        if report.is_success() {
            self.succeeded += 1;
            self.bytes += report.bytes;
        } else {
            self.failed += 1;
        }
        Ok(())
    }
}

fn join_all(
    feeder: JoinHandle<usize>,
    workers: Vec<JoinHandle<usize>>,
    forwarders: Vec<JoinHandle<usize>>,
) -> Result<()> {
    let mut first_error = None;

    match feeder.join() {
        Ok(sent) => debug!("Job source sent {} jobs", sent),
        Err(_) => first_error = Some(panicked("job source")),
    }

    for (index, handle) in workers.into_iter().enumerate() {
        if handle.join().is_err() {
            first_error.get_or_insert_with(|| panicked(&format!("worker {}", index)));
        }
    }

    for handle in forwarders {
        if handle.join().is_err() {
            first_error.get_or_insert_with(|| panicked("merge forwarder"));
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn panicked(role: &str) -> HashPipeError {
    HashPipeError::ThreadPoolError(format!("{} thread panicked", role))
}

/// Hash a single stream directly, outside the pool.
///
/// Used for standard input when no file list is given. An unknown algorithm
/// is reported before the stream is touched.
pub fn hash_single_stream<R: Read>(algorithm: &str, reader: R, buffer_size: usize) -> Result<Digest> {
    let algorithm = registry::lookup(algorithm)
        .ok_or_else(|| HashPipeError::UnsupportedAlgorithm(algorithm.to_string()))?;

    let (digest, bytes) =
        hash_reader(algorithm, reader, buffer_size.max(1)).map_err(HashPipeError::Stdin)?;
    debug!("Hashed {} bytes from a single stream with {}", bytes, algorithm);

    Ok(digest)
}
