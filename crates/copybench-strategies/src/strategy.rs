//! The copy strategy abstraction
//!
//! Each strategy copies one whole file. Descriptors, mappings and pipes are
//! owned values inside the call, so they are released on every return path.

use crate::kernel_transfer::KernelTransferCopy;
use crate::memory_map::MemoryMappedCopy;
use crate::splice::PipeSpliceCopy;
use crate::traditional::TraditionalCopy;
use copybench_types::{
    BufferSize, ByteCount, ChunkSize, Error, Result, RetryPolicy, Side, StrategyKind,
};
use std::fs::{File, OpenOptions};
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Permission bits for newly created destination files
pub const DESTINATION_MODE: u32 = 0o644;

/// A way of copying a file's contents from one path to another
pub trait CopyStrategy: Send + Sync {
    /// Which strategy this is
    fn kind(&self) -> StrategyKind;

    /// Copy all of `source` to `destination`, creating or truncating it
    ///
    /// Returns the number of bytes copied.
    fn copy(&self, source: &Path, destination: &Path) -> Result<ByteCount>;
}

/// Tunables shared by the strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrategyOptions {
    /// Buffer size for the traditional strategy
    pub buffer_size: BufferSize,
    /// Per-round chunk size for the splice strategy
    pub splice_chunk_size: ChunkSize,
    /// Retry policy for transient syscall results
    pub retry: RetryPolicy,
}

/// Create the strategy implementation for `kind`
pub fn create_strategy(kind: StrategyKind, options: &StrategyOptions) -> Box<dyn CopyStrategy> {
    match kind {
        StrategyKind::Traditional => Box::new(
            TraditionalCopy::new()
                .with_buffer_size(options.buffer_size)
                .with_retry(options.retry),
        ),
        StrategyKind::MemoryMapped => Box::new(MemoryMappedCopy::new()),
        StrategyKind::KernelTransfer => {
            Box::new(KernelTransferCopy::new().with_retry(options.retry))
        }
        StrategyKind::PipeSplice => Box::new(
            PipeSpliceCopy::new()
                .with_chunk_size(options.splice_chunk_size)
                .with_retry(options.retry),
        ),
    }
}

/// Create all four strategies in benchmark order
pub fn create_all(options: &StrategyOptions) -> Vec<Box<dyn CopyStrategy>> {
    StrategyKind::ALL
        .iter()
        .map(|&kind| create_strategy(kind, options))
        .collect()
}

/// Open the source file read-only
pub fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| Error::open(Side::Source, path, e))
}

/// Create or truncate the destination file
///
/// `readable` is needed when the destination will be mapped shared/read-write.
pub fn create_destination(path: &Path, readable: bool) -> Result<File> {
    let mut options = OpenOptions::new();
    options.read(readable).write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(DESTINATION_MODE);

    options
        .open(path)
        .map_err(|e| Error::open(Side::Destination, path, e))
}
