//! Pipe-mediated splice copy
//!
//! Each round splices up to one chunk from the source into an anonymous pipe
//! and then drains exactly that many bytes from the pipe into the
//! destination. Linux only.

use crate::strategy::CopyStrategy;
use copybench_types::{ByteCount, ChunkSize, Result, RetryPolicy, StrategyKind};
use std::path::Path;

/// splice(2) through a pipe
#[derive(Debug, Clone, Copy, Default)]
pub struct PipeSpliceCopy {
    chunk_size: ChunkSize,
    retry: RetryPolicy,
}

impl PipeSpliceCopy {
    /// Create a splice strategy with 64KB rounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the per-round chunk size
    pub fn with_chunk_size(mut self, chunk_size: ChunkSize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Override the transient retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Configured chunk size
    pub fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }
}

impl CopyStrategy for PipeSpliceCopy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PipeSplice
    }

    #[cfg(all(feature = "splice", target_os = "linux"))]
    fn copy(&self, source: &Path, destination: &Path) -> Result<ByteCount> {
        use crate::probe::probe_size;
        use crate::strategy::{create_destination, open_source};

        let source_file = open_source(source)?;
        let dest_file = create_destination(destination, false)?;
        let size = probe_size(&source_file, source)?;

        crate::linux::splice_all(
            &source_file,
            source,
            &dest_file,
            destination,
            size,
            self.chunk_size.get(),
            self.retry,
        )
    }

    #[cfg(not(all(feature = "splice", target_os = "linux")))]
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
