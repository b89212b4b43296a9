//! hashpipe CLI - Concurrent File Hashing
//!
//! Hashes the given files on a pool of workers and prints one line per file.

use clap::{CommandFactory, Parser};
use hashpipe::config::{CliArgs, PipelineConfig};
use hashpipe::core::{hash_single_stream, HashPipeline, ReportWriter};
use hashpipe::error::{HashPipeError, Result};
use hashpipe::hash::algorithm_names;
use hashpipe::progress::ProgressReporter;
use std::io::{self, BufWriter};
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; RUST_LOG wins over -v
    let level = match (args.quiet, args.verbose) {
        (true, _) | (false, 0) => "error",
        (false, 1) => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    if args.list {
        for name in algorithm_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    // Build configuration
    let config = PipelineConfig::from_cli(&args).map_err(HashPipeError::ConfigError)?;

    if args.stdin {
        let digest = hash_single_stream(
            &config.algorithm,
            io::stdin().lock(),
            config.read_buffer_size,
        )?;
        println!("{}", digest.to_hex(config.upper));
        return Ok(());
    }

    if config.sources.is_empty() {
        CliArgs::command()
            .print_help()
            .map_err(HashPipeError::Output)?;
        return Ok(());
    }

    // Print configuration if verbose
    if args.verbose > 0 && !args.quiet {
        print_config(&config, args.verbose);
    }

    let mut pipeline = HashPipeline::new(config.clone());
    if config.progress {
        pipeline = pipeline.with_progress(ProgressReporter::new());
    }

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(BufWriter::new(stdout.lock()), config.format, config.upper);
    let summary = pipeline.run(&mut writer)?;
    writer.into_inner().map_err(HashPipeError::Output)?;

    // Print results
    if args.verbose > 0 && !args.quiet {
        summary.print_summary();
    }

    Ok(())
}

fn print_config(config: &PipelineConfig, verbose: u8) {
    eprintln!("=== Configuration ===");
    eprintln!("Sources:     {}", config.sources.len());
    eprintln!("Algorithm:   {}", config.algorithm);
    eprintln!("Order:       {}", config.order);
    eprintln!(
        "Workers:     {}",
        if config.workers == 0 {
            format!("one per file (up to {})", config.sources.len())
        } else {
            config.workers.to_string()
        }
    );
    eprintln!("CPUs:        {}", num_cpus::get());
    eprintln!("Read buffer: {}", humansize::format_size(config.read_buffer_size as u64, humansize::BINARY));
    eprintln!("Buffer:      {}", config.buffer);
    eprintln!("Queue:       {}", config.queue_size);

    if verbose > 1 {
        match serde_json::to_string_pretty(config) {
            Ok(json) => eprintln!("{}", json),
            Err(e) => tracing::debug!("Could not serialize configuration: {}", e),
        }
    }

    eprintln!();
}
