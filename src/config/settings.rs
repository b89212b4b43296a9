//! Configuration settings for hashpipe
//!
//! Defines the command-line surface, the runtime configuration derived from
//! it, and their defaults.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Algorithm used when none is requested
pub const DEFAULT_HASH_ALGORITHM: &str = "sha256";

/// Default capacity of the job queue
pub const DEFAULT_QUEUE_SIZE: usize = 1024;

/// Default capacity of each result stream
pub const DEFAULT_BUFFER: usize = 10;

/// hashpipe - compute file digests on a pool of workers
#[derive(Parser, Debug, Clone)]
#[command(name = "hashpipe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concurrent file hashing with optional input-order output")]
#[command(long_about = r#"
hashpipe computes cryptographic digests and checksums for a list of files,
hashing them in parallel on a pool of worker threads.

Results are printed as they finish, or in the order the files were given
with --sort. A file that cannot be opened or read is reported on its own
line and does not stop the others.

Examples:
  hashpipe a.txt b.txt                      # sha256, completion order
  hashpipe -a crc32 -s *.log                # crc32, input order
  hashpipe -a blake3 -w 4 --progress big/*  # four workers with a progress bar
  cat file | hashpipe -i -a md5             # hash standard input
  hashpipe --list                           # supported algorithms
"#)]
pub struct CliArgs {
    /// Files to hash ("-" reads standard input)
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// Hash standard input as a single stream
    #[arg(short = 'i', long, conflicts_with = "files")]
    pub stdin: bool,

    /// Hash algorithm (see --list)
    #[arg(
        short = 'a',
        long = "hash",
        default_value = DEFAULT_HASH_ALGORITHM,
        env = "HASHPIPE_HASH",
        value_name = "ALGO"
    )]
    pub hash: String,

    /// Print results in input order instead of completion order
    #[arg(short = 's', long)]
    pub sort: bool,

    /// Number of workers (0 or less = one per file)
    #[arg(
        short = 'w',
        long,
        default_value = "0",
        env = "HASHPIPE_WORKERS",
        value_name = "NUM",
        allow_negative_numbers = true
    )]
    pub workers: i64,

    /// Print digests in uppercase hex
    #[arg(short = 'U', long)]
    pub upper: bool,

    /// Capacity of each result channel (0 = hand off directly)
    #[arg(short = 'b', long, default_value_t = DEFAULT_BUFFER, value_name = "NUM")]
    pub buffer: usize,

    /// Capacity of the job queue (0 = hand off directly)
    #[arg(long, default_value_t = DEFAULT_QUEUE_SIZE, value_name = "NUM")]
    pub queue_size: usize,

    /// Read buffer size per job (e.g., 64K, 1M)
    #[arg(long, default_value = "256K", value_name = "SIZE")]
    pub buffer_size: String,

    /// Output format for reports
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// List supported algorithms and exit
    #[arg(long)]
    pub list: bool,

    /// Show a progress bar on stderr
    #[arg(short = 'p', long)]
    pub progress: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress the summary and the progress bar)
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Order in which reports reach the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputOrder {
    /// As workers finish
    #[default]
    Arrival,
    /// Input order, after every job has finished
    Original,
}

impl fmt::Display for OutputOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arrival => f.write_str("arrival"),
            Self::Original => f.write_str("original"),
        }
    }
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `<digest> <source>` lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Source identifiers, in input order
    pub sources: Vec<String>,
    /// Algorithm name, resolved when the pipeline runs
    pub algorithm: String,
    /// Output order
    pub order: OutputOrder,
    /// Requested worker count (0 = one per job)
    pub workers: usize,
    /// Uppercase hex digests
    pub upper: bool,
    /// Result channel capacity
    pub buffer: usize,
    /// Job queue capacity
    pub queue_size: usize,
    /// Read buffer size in bytes
    pub read_buffer_size: usize,
    /// Report format
    pub format: OutputFormat,
    /// Show progress bar
    pub progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            algorithm: DEFAULT_HASH_ALGORITHM.to_string(),
            order: OutputOrder::Arrival,
            workers: 0, // One per job
            upper: false,
            buffer: DEFAULT_BUFFER,
            queue_size: DEFAULT_QUEUE_SIZE,
            read_buffer_size: 256 * 1024,
            format: OutputFormat::Text,
            progress: false,
        }
    }
}

impl PipelineConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        let read_buffer_size = parse_size(&args.buffer_size)
            .map_err(|e| format!("Invalid buffer size: {}", e))?;
        if read_buffer_size == 0 {
            return Err("Buffer size must be greater than zero".to_string());
        }
        let read_buffer_size = usize::try_from(read_buffer_size)
            .map_err(|_| format!("Buffer size too large: {}", args.buffer_size))?;

        Ok(Self {
            sources: args.files.clone(),
            algorithm: args.hash.clone(),
            order: if args.sort {
                OutputOrder::Original
            } else {
                OutputOrder::Arrival
            },
            workers: usize::try_from(args.workers.max(0))
                .map_err(|_| format!("Too many workers: {}", args.workers))?,
            upper: args.upper,
            buffer: args.buffer,
            queue_size: args.queue_size,
            read_buffer_size,
            format: args.output_format,
            progress: args.progress && !args.quiet,
        })
    }
}

/// Parse human-readable size string to bytes
pub fn parse_size(size: &str) -> Result<u64, String> {
    let size = size.trim().to_uppercase();

    if size.is_empty() {
        return Err("Empty size string".to_string());
    }

    let (num_str, multiplier) = if size.ends_with("GB") || size.ends_with('G') {
        (size.trim_end_matches(|c| c == 'G' || c == 'B'), 1024u64 * 1024 * 1024)
    } else if size.ends_with("MB") || size.ends_with('M') {
        (size.trim_end_matches(|c| c == 'M' || c == 'B'), 1024u64 * 1024)
    } else if size.ends_with("KB") || size.ends_with('K') {
        (size.trim_end_matches(|c| c == 'K' || c == 'B'), 1024u64)
    } else if size.ends_with('B') {
        (size.trim_end_matches('B'), 1u64)
    } else {
        (size.as_str(), 1u64)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {}", num_str))?;
    if num < 0.0 {
        return Err(format!("Negative size: {}", num_str));
    }

    Ok((num * multiplier as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("hashpipe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("1K").unwrap(), 1024);
        assert_eq!(parse_size("64kb").unwrap(), 64 * 1024);
        assert_eq!(parse_size("1M").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("1.5G").unwrap(), (1.5 * 1024.0 * 1024.0 * 1024.0) as u64);
        assert!(parse_size("").is_err());
        assert!(parse_size("lots").is_err());
        assert!(parse_size("-4K").is_err());
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["a.txt", "b.txt"]);
        let config = PipelineConfig::from_cli(&args).unwrap();

        assert_eq!(config.sources, vec!["a.txt", "b.txt"]);
        assert_eq!(config.algorithm, "sha256");
        assert_eq!(config.order, OutputOrder::Arrival);
        assert_eq!(config.workers, 0);
        assert_eq!(config.buffer, 10);
        assert_eq!(config.read_buffer_size, 256 * 1024);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_flags() {
        let args = parse(&[
            "-a", "crc32", "-s", "-w", "3", "-U", "-b", "0", "--buffer-size", "4K",
            "--output-format", "json", "x",
        ]);
        let config = PipelineConfig::from_cli(&args).unwrap();

        assert_eq!(config.algorithm, "crc32");
        assert_eq!(config.order, OutputOrder::Original);
        assert_eq!(config.workers, 3);
        assert!(config.upper);
        assert_eq!(config.buffer, 0);
        assert_eq!(config.read_buffer_size, 4096);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_negative_workers_mean_one_per_file() {
        for flags in [&["-w", "-1"][..], &["--workers=-1"][..], &["-w", "-8"][..]] {
            let mut argv = flags.to_vec();
            argv.extend(["a", "b"]);
            let args = parse(&argv);
            assert!(args.workers < 0);
            assert_eq!(args.files, vec!["a", "b"]);
            assert_eq!(PipelineConfig::from_cli(&args).unwrap().workers, 0);
        }
    }

    #[test]
    fn test_zero_read_buffer_rejected() {
        let args = parse(&["--buffer-size", "0", "a"]);
        assert!(PipelineConfig::from_cli(&args).is_err());
    }

    #[test]
    fn test_stdin_conflicts_with_files() {
        let result = CliArgs::try_parse_from(["hashpipe", "--stdin", "a.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_disables_progress() {
        let args = parse(&["-p", "-q", "a"]);
        assert!(!PipelineConfig::from_cli(&args).unwrap().progress);
    }

    #[test]
    fn test_order_display() {
        assert_eq!(OutputOrder::Original.to_string(), "original");
        assert_eq!(
            serde_json::to_string(&OutputOrder::Arrival).unwrap(),
            "\"arrival\""
        );
    }
}
