//! Buffered read/write copy
//!
//! The baseline strategy: every byte passes through a user-space buffer via
//! explicit `read` and `write` calls on unbuffered `File`s.

use crate::retry::retry_transient;
use crate::strategy::{create_destination, open_source, CopyStrategy};
use copybench_types::{BufferSize, ByteCount, Error, Result, RetryPolicy, Side, StrategyKind};
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::debug;

/// read/write loop through a fixed-size buffer
#[derive(Debug, Clone, Copy, Default)]
pub struct TraditionalCopy {
    buffer_size: BufferSize,
    retry: RetryPolicy,
}

impl TraditionalCopy {
    /// Create a strategy with the default 4KB buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the buffer size
    pub fn with_buffer_size(mut self, buffer_size: BufferSize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Override the transient retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Configured buffer size
    pub fn buffer_size(&self) -> BufferSize {
        self.buffer_size
    }
}

impl CopyStrategy for TraditionalCopy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Traditional
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<ByteCount> {
        let mut source_file = open_source(source)?;
        let mut dest_file = create_destination(destination, false)?;

        copy_stream(
            &mut source_file,
            source,
            &mut dest_file,
            destination,
            self.buffer_size.get(),
            self.retry,
        )
    }
}

/// Copy everything `reader` yields into `writer`
///
/// Each chunk read is fully written before the next read; a short write is
/// continued from where it stopped. The paths only label errors.
pub fn copy_stream<R, W>(
    reader: &mut R,
    source: &Path,
    writer: &mut W,
    destination: &Path,
    buffer_size: usize,
    retry: RetryPolicy,
) -> Result<ByteCount>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut total: ByteCount = 0;
    let mut short_writes = 0u64;

    loop {
        let bytes_read = retry_transient(retry, || reader.read(&mut buffer))
            .map_err(|e| Error::io(Side::Source, source, e))?;
        if bytes_read == 0 {
            break;
        }

        let mut pending = &buffer[..bytes_read];
        while !pending.is_empty() {
            let written = retry_transient(retry, || writer.write(pending))
                .map_err(|e| Error::io(Side::Destination, destination, e))?;
            if written == 0 {
                return Err(Error::io(
                    Side::Destination,
                    destination,
                    io::Error::new(io::ErrorKind::WriteZero, "write accepted zero bytes"),
                ));
            }
            if written < pending.len() {
                short_writes += 1;
            }
            pending = &pending[written..];
        }

        total += bytes_read as ByteCount;
    }

    writer
        .flush()
        .map_err(|e| Error::io(Side::Destination, destination, e))?;

    debug!(
        "read/write copied {} bytes with a {} byte buffer ({} short writes)",
        total, buffer_size, short_writes
    );
    Ok(total)
}
