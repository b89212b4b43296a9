use hashpipe::config::{OutputFormat, OutputOrder, PipelineConfig};
use hashpipe::core::{FileHasher, HashJob, HashPipeline, HashReport, JobExecutor, ReportWriter};
use hashpipe::error::HashPipeError;
use hashpipe::hash::{hash_bytes, HashAlgorithm};
use proptest::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn write_files(dir: &Path, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("file-{:03}.txt", i));
            std::fs::write(&path, format!("contents of file {}\n", i).repeat(i + 1)).unwrap();
            path.to_string_lossy().into_owned()
        })
        .collect()
}

fn run_collect(config: PipelineConfig) -> Vec<HashReport> {
    let mut reports: Vec<HashReport> = Vec::new();
    HashPipeline::new(config).run(&mut reports).unwrap();
    reports
}

#[test]
fn crc32_two_files_in_input_order() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    std::fs::write(&a, "123456789").unwrap();
    std::fs::write(&b, "The quick brown fox jumps over the lazy dog").unwrap();

    let config = PipelineConfig {
        sources: vec![
            a.to_string_lossy().into_owned(),
            b.to_string_lossy().into_owned(),
        ],
        algorithm: "crc32".to_string(),
        order: OutputOrder::Original,
        workers: 1,
        ..Default::default()
    };

    let mut writer = ReportWriter::new(Vec::new(), OutputFormat::Text, false);
    let summary = HashPipeline::new(config).run(&mut writer).unwrap();
    let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();

    let expected = format!("cbf43926 {}\n414fa339 {}\n", a.display(), b.display());
    assert_eq!(output, expected);
    assert_eq!(summary.workers, 1);
    assert!(summary.is_success());
}

#[test]
fn unknown_algorithm_emits_nothing() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig {
        sources: write_files(dir.path(), 3),
        algorithm: "nonexistent".to_string(),
        ..Default::default()
    };

    let mut reports: Vec<HashReport> = Vec::new();
    let err = HashPipeline::new(config).run(&mut reports).unwrap_err();

    assert!(err.is_setup_error());
    assert!(matches!(err, HashPipeError::UnsupportedAlgorithm(ref name) if name == "nonexistent"));
    assert!(reports.is_empty());
}

#[test]
fn zero_workers_means_one_per_job() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig {
        sources: write_files(dir.path(), 5),
        algorithm: "sha256".to_string(),
        workers: 0,
        ..Default::default()
    };

    let mut reports: Vec<HashReport> = Vec::new();
    let summary = HashPipeline::new(config).run(&mut reports).unwrap();

    assert_eq!(summary.workers, 5);
    assert_eq!(reports.len(), 5);
}

#[test]
fn one_missing_file_is_isolated() {
    let dir = TempDir::new().unwrap();
    let mut sources = write_files(dir.path(), 6);
    sources[2] = dir.path().join("does-not-exist").to_string_lossy().into_owned();

    let config = PipelineConfig {
        sources: sources.clone(),
        algorithm: "blake3".to_string(),
        order: OutputOrder::Original,
        workers: 3,
        ..Default::default()
    };

    let mut reports: Vec<HashReport> = Vec::new();
    let summary = HashPipeline::new(config).run(&mut reports).unwrap();

    assert_eq!(reports.len(), 6);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 5);
    assert!(!summary.is_success());

    let failed: Vec<&HashReport> = reports.iter().filter(|r| !r.is_success()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].sequence(), 2);
    assert_eq!(failed[0].job.source.to_string(), sources[2]);
}

/// Sleeps longer for earlier jobs so they finish last
struct DelayedExecutor {
    inner: FileHasher,
    jobs: usize,
}

impl JobExecutor for DelayedExecutor {
    fn execute(&self, job: HashJob) -> HashReport {
        let delay = (self.jobs - job.sequence) as u64 * 3;
        thread::sleep(Duration::from_millis(delay));
        self.inner.execute(job)
    }
}

#[test]
fn original_order_survives_scrambled_completion() {
    let dir = TempDir::new().unwrap();
    let sources = write_files(dir.path(), 16);

    let config = PipelineConfig {
        sources: sources.clone(),
        algorithm: "md5".to_string(),
        order: OutputOrder::Original,
        workers: 8,
        ..Default::default()
    };
    let executor = Arc::new(DelayedExecutor {
        inner: FileHasher::default(),
        jobs: sources.len(),
    });

    let mut reports: Vec<HashReport> = Vec::new();
    HashPipeline::new(config)
        .with_executor(executor)
        .run(&mut reports)
        .unwrap();

    let emitted: Vec<String> = reports.iter().map(|r| r.job.source.to_string()).collect();
    assert_eq!(emitted, sources);
}

#[test]
fn arrival_order_still_emits_everything() {
    let dir = TempDir::new().unwrap();
    let sources = write_files(dir.path(), 10);

    let config = PipelineConfig {
        sources: sources.clone(),
        algorithm: "xxhash64".to_string(),
        order: OutputOrder::Arrival,
        workers: 4,
        buffer: 0,
        queue_size: 0,
        ..Default::default()
    };

    let reports = run_collect(config);

    let mut emitted: Vec<String> = reports.iter().map(|r| r.job.source.to_string()).collect();
    emitted.sort();
    let mut expected = sources;
    expected.sort();
    assert_eq!(emitted, expected);
}

#[test]
fn same_content_same_digest() {
    let dir = TempDir::new().unwrap();
    let content = b"identical bytes in every file";
    let sources: Vec<String> = (0..8)
        .map(|i| {
            let path = dir.path().join(format!("copy-{}", i));
            std::fs::write(&path, content).unwrap();
            path.to_string_lossy().into_owned()
        })
        .collect();
    let expected = hash_bytes(content, HashAlgorithm::Sha3_256);

    let config = PipelineConfig {
        sources,
        algorithm: "sha3-256".to_string(),
        workers: 4,
        ..Default::default()
    };

    // Sequential runs, then two pipelines at once.
    let first = run_collect(config.clone());
    let second = run_collect(config.clone());
    let concurrent: Vec<Vec<HashReport>> = (0..2)
        .map(|_| {
            let config = config.clone();
            thread::spawn(move || run_collect(config))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    for report in first
        .iter()
        .chain(second.iter())
        .chain(concurrent.iter().flatten())
    {
        assert_eq!(report.digest(), Some(&expected));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn every_job_reported_exactly_once(
        count in 0usize..12,
        workers in 0usize..6,
        missing in proptest::collection::vec(any::<bool>(), 12),
        sorted in any::<bool>(),
    ) {
        let dir = TempDir::new().unwrap();
        let mut sources = write_files(dir.path(), count);
        for (i, source) in sources.iter_mut().enumerate() {
            if missing[i] {
                *source = dir.path().join(format!("gone-{}", i)).to_string_lossy().into_owned();
            }
        }

        let config = PipelineConfig {
            sources: sources.clone(),
            algorithm: "crc64-iso".to_string(),
            order: if sorted { OutputOrder::Original } else { OutputOrder::Arrival },
            workers,
            buffer: 1,
            ..Default::default()
        };

        let reports = run_collect(config);

        prop_assert_eq!(reports.len(), count);
        let sequences: HashSet<usize> = reports.iter().map(HashReport::sequence).collect();
        prop_assert_eq!(sequences, (0..count).collect::<HashSet<_>>());

        let failures = reports.iter().filter(|r| !r.is_success()).count();
        let expected_failures = missing.iter().take(count).filter(|&&m| m).count();
        prop_assert_eq!(failures, expected_failures);

        if sorted {
            let emitted: Vec<String> = reports.iter().map(|r| r.job.source.to_string()).collect();
            prop_assert_eq!(emitted, sources);
        }
    }
}
