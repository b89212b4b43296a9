//! Job source: turns the input list into a closed queue of jobs

use super::{HashJob, SourceId};
use crate::error::{HashPipeError, Result};
use crate::hash::{registry, HashAlgorithm};
use crossbeam::channel::{bounded, Receiver};
use std::thread::{self, JoinHandle};

/// Ordered, finite set of jobs built from the input identifiers
#[derive(Debug, Clone)]
pub struct JobSource {
    sources: Vec<SourceId>,
    algorithm: HashAlgorithm,
}

impl JobSource {
    /// Build a job source for the named algorithm.
    ///
    /// The name is resolved once here. An unknown name fails before any job
    /// exists, so no worker ever starts on a run that would fail everywhere.
    pub fn new<I, S>(identifiers: I, algorithm: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<SourceId>,
    {
        let algorithm = registry::lookup(algorithm)
            .ok_or_else(|| HashPipeError::UnsupportedAlgorithm(algorithm.to_string()))?;

        Ok(Self::with_algorithm(identifiers, algorithm))
    }

    /// Build a job source for an already resolved algorithm
    pub fn with_algorithm<I, S>(identifiers: I, algorithm: HashAlgorithm) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SourceId>,
    {
        Self {
            sources: identifiers.into_iter().map(Into::into).collect(),
            algorithm,
        }
    }

    /// Number of jobs this source will produce
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if there are no jobs
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Algorithm shared by every job
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Lazily yield the jobs in input order
    pub fn jobs(&self) -> impl Iterator<Item = HashJob> + '_ {
        self.sources
            .iter()
            .enumerate()
            .map(move |(sequence, source)| HashJob::new(sequence, source.clone(), self.algorithm))
    }

    /// Feed every job into a queue from a dedicated thread.
    ///
    /// The queue disconnects once the last job has been sent. A capacity of
    /// zero makes every send a rendezvous with a worker.
    pub fn spawn(self, capacity: usize) -> Result<(Receiver<HashJob>, JoinHandle<usize>)> {
        let (tx, rx) = bounded(capacity);

        let handle = thread::Builder::new()
            .name("hashpipe-source".to_string())
            .spawn(move || {
                let mut sent = 0usize;
                for job in self.jobs() {
                    if tx.send(job).is_err() {
                        tracing::debug!("Job queue closed after {} jobs", sent);
                        break;
                    }
                    sent += 1;
                }
                sent
            })
            .map_err(|e| HashPipeError::ThreadPoolError(e.to_string()))?;

        Ok((rx, handle))
    }
}
