//! Kernel-assisted copy via sendfile
//!
//! The kernel moves the bytes between the two descriptors; nothing is copied
//! through a user-space buffer. Linux and macOS use different calling
//! conventions, handled in their platform modules. Elsewhere the strategy
//! reports [`copybench_types::Error::UnsupportedPlatform`] instead of falling back.

use crate::strategy::CopyStrategy;
use copybench_types::{ByteCount, Result, RetryPolicy, StrategyKind};
use std::path::Path;

/// sendfile based copy
#[derive(Debug, Clone, Copy, Default)]
pub struct KernelTransferCopy {
    retry: RetryPolicy,
}

impl KernelTransferCopy {
    /// Create a kernel transfer strategy with unbounded transient retries
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the transient retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl CopyStrategy for KernelTransferCopy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::KernelTransfer
    }

    #[cfg(all(feature = "kernel-transfer", any(target_os = "linux", target_os = "macos")))]
    fn copy(&self, source: &Path, destination: &Path) -> Result<ByteCount> {
        use crate::probe::probe_size;
        use crate::strategy::{create_destination, open_source};

        let source_file = open_source(source)?;
        let dest_file = create_destination(destination, false)?;
        let size = probe_size(&source_file, source)?;

        #[cfg(target_os = "linux")]
        let copied = crate::linux::sendfile_all(
            &source_file,
            source,
            &dest_file,
            destination,
            size,
            self.retry,
        )?;

        #[cfg(target_os = "macos")]
        let copied = crate::macos::sendfile_all(
            &source_file,
            source,
            &dest_file,
            destination,
            size,
            self.retry,
        )?;

        Ok(copied)
    }

    #[cfg(not(all(feature = "kernel-transfer", any(target_os = "linux", target_os = "macos"))))]
    fn copy(&self, _source: &Path, _destination: &Path) -> Result<ByteCount> {
        use crate::capabilities::{unsupported_reason, CapabilityTable};
        use copybench_types::Error;

        let availability = CapabilityTable::detect().availability(self.kind());
        Err(Error::unsupported(
            self.kind(),
            unsupported_reason(self.kind(), availability),
        ))
    }
}
