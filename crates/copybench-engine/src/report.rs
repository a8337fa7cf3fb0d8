//! Benchmark report and its renderings
//!
//! Durations are compared to the traditional entry, which is always the
//! first one a harness records. Percentages are computed on nanoseconds and
//! shown with two decimals.

use chrono::{DateTime, Utc};
use copybench_types::{Availability, ByteCount, CopyOutcome, StrategyKind};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One strategy invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    /// Which strategy ran
    pub kind: StrategyKind,
    /// Where it wrote its copy
    pub destination: PathBuf,
    /// Availability at the time of the run
    pub availability: Availability,
    /// Wall-clock time of the invocation, `None` when it was not invoked
    pub elapsed: Option<Duration>,
    /// What happened
    pub outcome: CopyOutcome,
}

impl ReportEntry {
    /// Elapsed time in whole microseconds
    pub fn elapsed_micros(&self) -> Option<u64> {
        self.elapsed
            .map(|d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
    }
}

/// A strategy's duration relative to the baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    /// The strategy
    pub kind: StrategyKind,
    /// Percentage of the traditional duration, `None` when not computable
    pub percent: Option<f64>,
}

/// Timings of one benchmark run, in invocation order
#[derive(Debug, Clone)]
pub struct StrategyReport {
    source: PathBuf,
    source_size: Option<ByteCount>,
    probe_error: Option<String>,
    generated_at: DateTime<Utc>,
    entries: Vec<ReportEntry>,
}

impl StrategyReport {
    /// Start an empty report for `source`
    pub fn new(source: impl Into<PathBuf>, probe: Result<ByteCount, String>) -> Self {
        let (source_size, probe_error) = match probe {
            Ok(size) => (Some(size), None),
            Err(message) => (None, Some(message)),
        };
        Self {
            source: source.into(),
            source_size,
            probe_error,
            generated_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// Append an entry
    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    /// The benchmarked source file
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Size probed before the run, if the probe succeeded
    pub fn source_size(&self) -> Option<ByteCount> {
        self.source_size
    }

    /// Why the size probe failed, if it did
    pub fn probe_error(&self) -> Option<&str> {
        self.probe_error.as_deref()
    }

    /// When the run started
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// All entries in invocation order
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Entry for a specific strategy
    pub fn entry(&self, kind: StrategyKind) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// Check if every invoked strategy succeeded
    ///
    /// Strategies that were never invoked because the platform lacks them
    /// do not count as failures.
    pub fn all_succeeded(&self) -> bool {
        self.entries
            .iter()
            .filter(|e| e.elapsed.is_some())
            .all(|e| e.outcome.is_success())
    }

    fn baseline(&self) -> Option<Duration> {
        self.entry(StrategyKind::Traditional)
            .and_then(|e| e.elapsed)
            .filter(|d| !d.is_zero())
    }

    /// Duration of `kind` as a percentage of the traditional duration
    ///
    /// `None` when either duration is missing or the baseline is zero.
    pub fn relative_percent(&self, kind: StrategyKind) -> Option<f64> {
        let baseline = self.baseline()?;
        let elapsed = self.entry(kind)?.elapsed?;
        Some(elapsed.as_nanos() as f64 / baseline.as_nanos() as f64 * 100.0)
    }

    /// Relative percentages for every entry, in invocation order
    pub fn comparisons(&self) -> Vec<Comparison> {
        self.entries
            .iter()
            .map(|e| Comparison {
                kind: e.kind,
                percent: self.relative_percent(e.kind),
            })
            .collect()
    }

    /// Render the report as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&JsonReport::from(self))
    }
}

impl fmt::Display for StrategyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Source: {}", self.source.display())?;
        match (self.source_size, &self.probe_error) {
            (Some(size), _) => writeln!(f, " ({} bytes)", size)?,
            (None, Some(message)) => writeln!(f, " (size unknown: {})", message)?,
            (None, None) => writeln!(f)?,
        }
        writeln!(f, "Run at: {}", self.generated_at.to_rfc3339())?;
        writeln!(f)?;

        let width = self
            .entries
            .iter()
            .map(|e| e.kind.display_name().len())
            .max()
            .unwrap_or(0);

        for entry in &self.entries {
            write!(f, "{:<width$}  ", entry.kind.display_name(), width = width)?;
            match (&entry.elapsed, &entry.outcome) {
                (None, _) => writeln!(f, "unsupported ({})", entry.availability)?,
                (Some(elapsed), CopyOutcome::Success { .. }) => {
                    writeln!(f, "{} us", elapsed.as_micros())?;
                }
                (Some(elapsed), CopyOutcome::Failure { message, .. }) => {
                    writeln!(f, "FAILED: {} (after {} us)", message, elapsed.as_micros())?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "Performance comparison (lower is better):")?;
        for comparison in self.comparisons() {
            write!(f, "  {:<width$}  ", comparison.kind.display_name(), width = width)?;
            match comparison.percent {
                Some(percent) => writeln!(f, "{:.2}%", percent)?,
                None => writeln!(f, "n/a")?,
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    strategy: StrategyKind,
    name: &'static str,
    destination: &'a Path,
    availability: Availability,
    duration_us: Option<u64>,
    relative_percent: Option<f64>,
    outcome: &'a CopyOutcome,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a Path,
    source_size: Option<ByteCount>,
    probe_error: Option<&'a str>,
    generated_at: DateTime<Utc>,
    entries: Vec<JsonEntry<'a>>,
}

impl<'a> From<&'a StrategyReport> for JsonReport<'a> {
    fn from(report: &'a StrategyReport) -> Self {
        Self {
            source: &report.source,
            source_size: report.source_size,
            probe_error: report.probe_error(),
            generated_at: report.generated_at,
            entries: report
                .entries
                .iter()
                .map(|e| JsonEntry {
                    strategy: e.kind,
                    name: e.kind.display_name(),
                    destination: &e.destination,
                    availability: e.availability,
                    duration_us: e.elapsed_micros(),
                    relative_percent: report.relative_percent(e.kind),
                    outcome: &e.outcome,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copybench_types::ErrorKind;
    use rstest::rstest;

    fn entry(kind: StrategyKind, micros: Option<u64>) -> ReportEntry {
        ReportEntry {
            kind,
            destination: PathBuf::from(format!("out{}", kind.tag())),
            availability: if micros.is_some() {
                Availability::Available
            } else {
                Availability::Unsupported
            },
            elapsed: micros.map(Duration::from_micros),
            outcome: match micros {
                Some(_) => CopyOutcome::Success { bytes_copied: 10 },
                None => CopyOutcome::Failure {
                    kind: ErrorKind::UnsupportedPlatform,
                    message: "not here".to_string(),
                },
            },
        }
    }

    fn report(timings: [Option<u64>; 4]) -> StrategyReport {
        let mut report = StrategyReport::new("source.bin", Ok(10));
        for (kind, micros) in StrategyKind::ALL.iter().zip(timings) {
            report.push(entry(*kind, micros));
        }
        report
    }

    #[rstest]
    #[case(StrategyKind::Traditional, Some(100.0))]
    #[case(StrategyKind::MemoryMapped, Some(50.0))]
    #[case(StrategyKind::KernelTransfer, Some(250.0))]
    #[case(StrategyKind::PipeSplice, None)]
    fn test_relative_percent(#[case] kind: StrategyKind, #[case] expected: Option<f64>) {
        let report = report([Some(400), Some(200), Some(1000), None]);
        assert_eq!(report.relative_percent(kind), expected);
    }

    #[test]
    fn test_zero_baseline_is_not_computable() {
        let report = report([Some(0), Some(200), Some(1000), None]);
        assert!(report.comparisons().iter().all(|c| c.percent.is_none()));
    }

    #[test]
    fn test_all_succeeded_ignores_unsupported() {
        let mut report = report([Some(10), Some(10), None, None]);
        assert!(report.all_succeeded());

        report.push(ReportEntry {
            elapsed: Some(Duration::from_micros(5)),
            outcome: CopyOutcome::Failure {
                kind: ErrorKind::Io,
                message: "disk full".to_string(),
            },
            ..entry(StrategyKind::PipeSplice, Some(5))
        });
        assert!(!report.all_succeeded());
    }

    #[test]
    fn test_text_rendering() {
        let text = report([Some(400), Some(200), None, None]).to_string();

        assert!(text.starts_with("Source: source.bin (10 bytes)"));
        assert!(text.contains("400 us"));
        assert!(text.contains("unsupported (unsupported on this platform)"));
        assert!(text.contains("Performance comparison (lower is better):"));
        assert!(text.contains("100.00%"));
        assert!(text.contains("50.00%"));
        assert!(text.contains("n/a"));
    }

    #[test]
    fn test_text_rendering_probe_failure() {
        let report = StrategyReport::new("missing.bin", Err("no such file".to_string()));
        let text = report.to_string();
        assert!(text.contains("size unknown: no such file"));
    }

    #[test]
    fn test_json_rendering() {
        let json = report([Some(400), Some(200), None, None]).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["source_size"], 10);
        let entries = value["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0]["strategy"], "traditional");
        assert_eq!(entries[0]["relative_percent"], 100.0);
        assert_eq!(entries[1]["duration_us"], 200);
        assert_eq!(entries[2]["duration_us"], serde_json::Value::Null);
        assert_eq!(entries[2]["outcome"]["status"], "failure");
    }
}
