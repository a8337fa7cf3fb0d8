//! The benchmark harness

use crate::report::{ReportEntry, StrategyReport};
use copybench_strategies::capabilities::unsupported_reason;
use copybench_strategies::{create_all, probe_path, CapabilityTable, CopyStrategy, StrategyOptions};
use copybench_types::{CopyOutcome, Error, StrategyKind};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Destination path for one strategy: the prefix with the strategy tag appended
///
/// `/tmp/out` becomes `/tmp/out.traditional`, `/tmp/out.mmap`,
/// `/tmp/out.sendfile` and `/tmp/out.splice`.
pub fn destination_for(prefix: &Path, kind: StrategyKind) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(kind.tag());
    PathBuf::from(name)
}

/// Runs every strategy once and times it
pub struct BenchmarkHarness {
    capabilities: CapabilityTable,
    strategies: Vec<Box<dyn CopyStrategy>>,
}

impl BenchmarkHarness {
    /// Create a harness with default options and detected capabilities
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a harness with custom strategy options
    pub fn with_options(options: StrategyOptions) -> Self {
        Self::builder().with_options(options).build()
    }

    /// Start building a harness
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::new()
    }

    /// The capability table consulted before each invocation
    pub fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    /// Strategies in invocation order
    pub fn kinds(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Copy `source` with every strategy and collect the timings
    ///
    /// Never fails as a whole: probe failures, unsupported mechanisms and
    /// copy failures all end up as entries in the report.
    pub fn run(&self, source: &Path, dest_prefix: &Path) -> StrategyReport {
        info!(
            "Benchmarking {} strategies: {} -> {}.*",
            self.strategies.len(),
            source.display(),
            dest_prefix.display()
        );

        let probe = probe_path(source);
        match &probe {
            Ok(size) => info!("Source size: {} bytes", size),
            Err(e) => warn!("Could not probe source size: {}", e),
        }
        let mut report = StrategyReport::new(source, probe.map_err(|e| e.to_string()));

        for strategy in &self.strategies {
            report.push(self.run_one(strategy.as_ref(), source, dest_prefix));
        }

        report
    }

    fn run_one(&self, strategy: &dyn CopyStrategy, source: &Path, dest_prefix: &Path) -> ReportEntry {
        let kind = strategy.kind();
        let destination = destination_for(dest_prefix, kind);
        let availability = self.capabilities.availability(kind);

        if !availability.is_available() {
            warn!("Skipping {}: {}", kind, availability);
            let error = Error::unsupported(kind, unsupported_reason(kind, availability));
            return ReportEntry {
                kind,
                destination,
                availability,
                elapsed: None,
                outcome: CopyOutcome::from(&error),
            };
        }

        let start = Instant::now();
        let result = strategy.copy(source, &destination);
        let elapsed = start.elapsed();

        match &result {
            Ok(bytes) => info!("{} copied {} bytes in {:?}", kind, bytes, elapsed),
            Err(e) => warn!("{} failed after {:?}: {}", kind, elapsed, e),
        }

        ReportEntry {
            kind,
            destination,
            availability,
            elapsed: Some(elapsed),
            outcome: CopyOutcome::from(result),
        }
    }
}

impl Default for BenchmarkHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BenchmarkHarness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchmarkHarness")
            .field("capabilities", &self.capabilities)
            .field("strategies", &self.kinds())
            .finish()
    }
}

/// Builder for [`BenchmarkHarness`]
#[derive(Default)]
pub struct HarnessBuilder {
    options: StrategyOptions,
    capabilities: Option<CapabilityTable>,
    overrides: Vec<Box<dyn CopyStrategy>>,
}

impl HarnessBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strategy options
    pub fn with_options(mut self, options: StrategyOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a specific capability table instead of detecting one
    pub fn with_capabilities(mut self, capabilities: CapabilityTable) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Replace the built-in implementation of the strategy's kind
    pub fn with_strategy(mut self, strategy: Box<dyn CopyStrategy>) -> Self {
        self.overrides.retain(|s| s.kind() != strategy.kind());
        self.overrides.push(strategy);
        self
    }

    /// Build the harness
    pub fn build(self) -> BenchmarkHarness {
        let mut overrides = self.overrides;
        let strategies = create_all(&self.options)
            .into_iter()
            .map(|builtin| {
                match overrides.iter().position(|s| s.kind() == builtin.kind()) {
                    Some(index) => overrides.swap_remove(index),
                    None => builtin,
                }
            })
            .collect();

        BenchmarkHarness {
            capabilities: self.capabilities.unwrap_or_else(CapabilityTable::detect),
            strategies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copybench_types::{Availability, ByteCount, ErrorKind, Result, Side};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Strategy that counts its invocations and always fails
    struct FailingStrategy {
        kind: StrategyKind,
        calls: Arc<AtomicUsize>,
    }

    impl CopyStrategy for FailingStrategy {
        fn kind(&self) -> StrategyKind {
            self.kind
        }

        fn copy(&self, _source: &Path, destination: &Path) -> Result<ByteCount> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::io(
                Side::Destination,
                destination,
                io::Error::from_raw_os_error(28),
            ))
        }
    }

    fn all_available() -> CapabilityTable {
        StrategyKind::ALL
            .iter()
            .fold(CapabilityTable::detect(), |table, &kind| {
                table.with(kind, Availability::Available)
            })
    }

    #[test]
    fn test_destination_for() {
        let prefix = Path::new("/tmp/out");
        assert_eq!(
            destination_for(prefix, StrategyKind::Traditional),
            PathBuf::from("/tmp/out.traditional")
        );
        assert_eq!(
            destination_for(prefix, StrategyKind::MemoryMapped),
            PathBuf::from("/tmp/out.mmap")
        );
        assert_eq!(
            destination_for(prefix, StrategyKind::KernelTransfer),
            PathBuf::from("/tmp/out.sendfile")
        );
        assert_eq!(
            destination_for(prefix, StrategyKind::PipeSplice),
            PathBuf::from("/tmp/out.splice")
        );
    }

    #[test]
    fn test_fixed_order() {
        let harness = BenchmarkHarness::new();
        assert_eq!(harness.kinds(), StrategyKind::ALL.to_vec());
    }

    #[test]
    fn test_override_keeps_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let harness = BenchmarkHarness::builder()
            .with_strategy(Box::new(FailingStrategy {
                kind: StrategyKind::MemoryMapped,
                calls,
            }))
            .build();
        assert_eq!(harness.kinds(), StrategyKind::ALL.to_vec());
    }

    #[test]
    fn test_unsupported_strategy_is_not_invoked() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.bin");
        std::fs::write(&source, b"payload").unwrap();
        let prefix = temp_dir.path().join("out");

        let calls = Arc::new(AtomicUsize::new(0));
        let harness = BenchmarkHarness::builder()
            .with_capabilities(
                all_available().with(StrategyKind::MemoryMapped, Availability::Unsupported),
            )
            .with_strategy(Box::new(FailingStrategy {
                kind: StrategyKind::MemoryMapped,
                calls: Arc::clone(&calls),
            }))
            .build();

        let report = harness.run(&source, &prefix);
        let entry = report.entry(StrategyKind::MemoryMapped).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(entry.elapsed, None);
        assert_eq!(entry.availability, Availability::Unsupported);
        assert_eq!(entry.outcome.error_kind(), Some(ErrorKind::UnsupportedPlatform));
        assert!(!entry.destination.exists());
    }

    #[test]
    fn test_failure_does_not_abort_run() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.bin");
        std::fs::write(&source, vec![5u8; 8192]).unwrap();
        let prefix = temp_dir.path().join("out");

        let calls = Arc::new(AtomicUsize::new(0));
        let harness = BenchmarkHarness::builder()
            .with_capabilities(
                all_available()
                    .with(StrategyKind::KernelTransfer, Availability::UnsupportedOnThisBuild)
                    .with(StrategyKind::PipeSplice, Availability::UnsupportedOnThisBuild),
            )
            .with_strategy(Box::new(FailingStrategy {
                kind: StrategyKind::Traditional,
                calls: Arc::clone(&calls),
            }))
            .build();

        let report = harness.run(&source, &prefix);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.entries().len(), 4);
        let traditional = report.entry(StrategyKind::Traditional).unwrap();
        assert_eq!(traditional.outcome.error_kind(), Some(ErrorKind::Io));
        assert!(traditional.elapsed.is_some());

        let mmap = report.entry(StrategyKind::MemoryMapped).unwrap();
        assert!(mmap.outcome.is_success());
        assert_eq!(std::fs::read(&mmap.destination).unwrap(), vec![5u8; 8192]);
    }

    #[test]
    fn test_probe_failure_still_runs_strategies() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("missing.bin");
        let prefix = temp_dir.path().join("out");

        let report = BenchmarkHarness::new().run(&source, &prefix);

        assert_eq!(report.source_size(), None);
        assert!(report.probe_error().is_some());
        for entry in report.entries() {
            assert!(!entry.outcome.is_success());
            assert!(!entry.destination.exists());
        }
    }
}
