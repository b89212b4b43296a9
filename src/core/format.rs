//! Report sinks and line formatting

use super::HashReport;
use crate::config::OutputFormat;
use serde::Serialize;
use std::io::{self, Write};

/// Destination for finished reports
pub trait ReportSink {
    /// Accept one report
    fn emit(&mut self, report: &HashReport) -> io::Result<()>;
}

impl ReportSink for Vec<HashReport> {
    fn emit(&mut self, report: &HashReport) -> io::Result<()> {
        self.push(report.clone());
        Ok(())
    }
}

/// Render a report as a single text line, without the trailing newline.
///
/// Success is `<hex> <source>`; failure is `<source>: <failure>`.
pub fn format_report(report: &HashReport, upper: bool) -> String {
    match &report.outcome {
        Ok(digest) => format!("{} {}", digest.to_hex(upper), report.job.source),
        Err(failure) => format!("{}: {}", report.job.source, failure),
    }
}

#[derive(Serialize)]
struct JsonRecord {
    sequence: usize,
    source: String,
    algorithm: &'static str,
    digest: Option<String>,
    error: Option<String>,
    bytes: u64,
}

/// Writes reports to any `Write` in text or JSON-lines form
pub struct ReportWriter<W: Write> {
    out: W,
    format: OutputFormat,
    upper: bool,
}

impl<W: Write> ReportWriter<W> {
    /// Create a writer
    pub fn new(out: W, format: OutputFormat, upper: bool) -> Self {
        Self { out, format, upper }
    }

    /// Flush and return the underlying writer
    pub fn into_inner(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_json(&mut self, report: &HashReport) -> io::Result<()> {
        let record = JsonRecord {
            sequence: report.sequence(),
            source: report.job.source.to_string(),
            algorithm: report.job.algorithm.name(),
            digest: report.digest().map(|d| d.to_hex(self.upper)),
            error: report.failure_info().map(ToString::to_string),
            bytes: report.bytes,
        };
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")
    }
}

impl<W: Write> ReportSink for ReportWriter<W> {
    fn emit(&mut self, report: &HashReport) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", format_report(report, self.upper)),
            OutputFormat::Json => self.write_json(report),
        }
    }
}
