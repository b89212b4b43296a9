//! Worker pool: W threads pulling from one shared job queue
//!
//! Each worker owns its own result stream. A worker keeps pulling until the
//! job queue is disconnected and drained, then drops its sender, which is
//! what lets the merger observe that the stream is finished.

use super::{FileHasher, HashJob, HashReport, JobExecutor, PipelineStats};
use crate::error::{HashPipeError, Result};
use crate::progress::ProgressReporter;
use crossbeam::channel::{bounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Default capacity of each per-worker result stream
pub const DEFAULT_RESULT_BUFFER: usize = 10;

/// Effective worker count for a run.
///
/// A request of zero means one worker per job. The result never exceeds
/// the job count, and is at least one whenever there is a job to run.
pub fn effective_workers(requested: usize, job_count: usize) -> usize {
    if requested == 0 {
        job_count
    } else {
        requested.min(job_count)
    }
}

/// Worker threads and the result streams they feed
#[derive(Debug)]
pub struct PoolHandles {
    /// One result stream per worker
    pub streams: Vec<Receiver<HashReport>>,
    /// Join handles; each yields the number of jobs that worker ran
    pub handles: Vec<JoinHandle<usize>>,
}

/// Fixed-size pool of hashing workers
pub struct WorkerPool {
    workers: usize,
    result_buffer: usize,
    executor: Arc<dyn JobExecutor>,
    stats: Arc<PipelineStats>,
    progress: Option<ProgressReporter>,
}

impl WorkerPool {
    /// Size a pool for `job_count` jobs.
    ///
    /// The count is fixed here, from the requested list, before any source
    /// is opened.
    pub fn new(requested: usize, job_count: usize) -> Self {
        Self {
            workers: effective_workers(requested, job_count),
            result_buffer: DEFAULT_RESULT_BUFFER,
            executor: Arc::new(FileHasher::default()),
            stats: Arc::new(PipelineStats::default()),
            progress: None,
        }
    }

    /// Set the capacity of each worker's result stream
    pub fn with_result_buffer(mut self, capacity: usize) -> Self {
        self.result_buffer = capacity;
        self
    }

    /// Replace the job executor
    pub fn with_executor(mut self, executor: Arc<dyn JobExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Share a statistics block with the caller
    pub fn with_stats(mut self, stats: Arc<PipelineStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Tick a progress bar as jobs finish
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Number of workers this pool will start
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Start the workers on a shared job queue
    pub fn spawn(&self, jobs: Receiver<HashJob>) -> Result<PoolHandles> {
        let mut streams = Vec::with_capacity(self.workers);
        let mut handles = Vec::with_capacity(self.workers);

        for worker_id in 0..self.workers {
            let (tx, rx) = bounded(self.result_buffer);
            let jobs = jobs.clone();
            let executor = Arc::clone(&self.executor);
            let stats = Arc::clone(&self.stats);
            let progress = self.progress.clone();

            let handle = thread::Builder::new()
                .name(format!("hashpipe-worker-{}", worker_id))
                .spawn(move || {
                    run_worker(
                        worker_id,
                        jobs,
                        tx,
                        executor.as_ref(),
                        &stats,
                        progress.as_ref(),
                    )
                })
                .map_err(|e| HashPipeError::ThreadPoolError(e.to_string()))?;

            streams.push(rx);
            handles.push(handle);
        }

        Ok(PoolHandles { streams, handles })
    }
}

fn run_worker(
    worker_id: usize,
    jobs: Receiver<HashJob>,
    results: Sender<HashReport>,
    executor: &dyn JobExecutor,
    stats: &PipelineStats,
    progress: Option<&ProgressReporter>,
) -> usize {
    let mut processed = 0usize;

    for job in jobs.iter() {
        stats.record_start();
        let report = executor.execute(job);
        stats.record_report(&report);

        match &report.outcome {
            Ok(digest) => tracing::debug!(
                worker = worker_id,
                sequence = report.job.sequence,
                bytes = report.bytes,
                "{} {}",
                digest,
                report.job.source
            ),
            Err(failure) => tracing::warn!(
                worker = worker_id,
                sequence = report.job.sequence,
                "{}: {}",
                report.job.source,
                failure
            ),
        }

        if let Some(progress) = progress {
            progress.increment_jobs(1);
        }

        processed += 1;
        if results.send(report).is_err() {
            tracing::debug!("Worker {} lost its result stream", worker_id);
            break;
        }
    }

    tracing::debug!("Worker {} shutting down after {} jobs", worker_id, processed);
    processed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::JobSource;
    use std::collections::HashSet;
    use std::sync::atomic::Ordering;
    use std::sync::{Barrier, Mutex};
    use std::thread::ThreadId;

    #[test]
    fn test_effective_workers() {
        assert_eq!(effective_workers(0, 5), 5);
        assert_eq!(effective_workers(2, 5), 2);
        assert_eq!(effective_workers(16, 5), 5);
        assert_eq!(effective_workers(1, 5), 1);
        assert_eq!(effective_workers(0, 0), 0);
        assert_eq!(effective_workers(4, 0), 0);
    }

    /// Holds every job until `barrier` is full, so the jobs must be on
    /// distinct threads at the same time
    struct Rendezvous {
        barrier: Barrier,
        threads: Mutex<HashSet<ThreadId>>,
    }

    impl JobExecutor for Rendezvous {
        fn execute(&self, job: HashJob) -> HashReport {
            self.threads.lock().unwrap().insert(thread::current().id());
            self.barrier.wait();
            FileHasher::default().execute(job)
        }
    }

    #[test]
    fn test_each_job_runs_once() {
        let names: Vec<String> = (0..12).map(|i| format!("/missing/{}", i)).collect();
        let source = JobSource::new(names, "crc32").unwrap();
        let stats = Arc::new(PipelineStats::default());
        let pool = WorkerPool::new(3, source.len()).with_stats(Arc::clone(&stats));
        assert_eq!(pool.workers(), 3);

        let (jobs, feeder) = source.spawn(0).unwrap();
        let PoolHandles { streams, handles } = pool.spawn(jobs).unwrap();
        assert_eq!(streams.len(), 3);

        // Drain the streams concurrently so no worker blocks on a full buffer.
        let collectors: Vec<_> = streams
            .into_iter()
            .map(|stream| thread::spawn(move || stream.iter().map(|r| r.sequence()).collect::<Vec<_>>()))
            .collect();

        let mut seen: Vec<usize> = collectors
            .into_iter()
            .flat_map(|c| c.join().unwrap())
            .collect();
        seen.sort_unstable();

        assert_eq!(seen, (0..12).collect::<Vec<_>>());
        let ran: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(ran, 12);
        assert_eq!(feeder.join().unwrap(), 12);
        assert_eq!(stats.jobs_failed.load(Ordering::Relaxed), 12);
    }

    #[test]
    fn test_zero_request_spawns_one_worker_per_job() {
        let rendezvous = Arc::new(Rendezvous {
            barrier: Barrier::new(5),
            threads: Mutex::new(HashSet::new()),
        });
        let source = JobSource::new(["/a", "/b", "/c", "/d", "/e"], "md5").unwrap();
        let pool = WorkerPool::new(0, source.len()).with_executor(rendezvous.clone());
        assert_eq!(pool.workers(), 5);

        let (jobs, feeder) = source.spawn(0).unwrap();
        let handles = pool.spawn(jobs).unwrap();
        let total: usize = handles
            .streams
            .into_iter()
            .map(|stream| stream.iter().count())
            .sum();

        assert_eq!(total, 5);
        for handle in handles.handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
        assert_eq!(feeder.join().unwrap(), 5);
        assert_eq!(rendezvous.threads.lock().unwrap().len(), 5);
    }
}
