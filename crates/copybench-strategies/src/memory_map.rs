//! Memory-mapped copy
//!
//! The source is mapped private/read-only, the destination shared/read-write
//! after it has been sized to match, and the whole extent is copied with a
//! single memcpy between the two mappings.

use crate::probe::probe_size;
use crate::strategy::{create_destination, open_source, CopyStrategy};
use copybench_types::{ByteCount, Error, Result, Side, StrategyKind};
use memmap2::{Mmap, MmapMut, MmapOptions};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// mmap/munmap based copy
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryMappedCopy {
    populate: bool,
}

impl MemoryMappedCopy {
    /// Create a memory-mapped copy strategy
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fault the mappings when they are created
    pub fn with_populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }

    fn options(&self, len: usize) -> MmapOptions {
        let mut options = MmapOptions::new();
        options.len(len);
        if self.populate {
            options.populate();
        }
        options
    }

    fn map_source(&self, file: &File, path: &Path, len: usize) -> Result<Mmap> {
        // SAFETY: the mapping is read-only and private; the file stays open
        // for the mapping's lifetime and nothing in this process writes it.
        unsafe { self.options(len).map_copy_read_only(file) }
            .map_err(|e| Error::map(Side::Source, path, e))
    }

    fn map_destination(&self, file: &File, path: &Path, len: usize) -> Result<MmapMut> {
        // SAFETY: the destination was just created by this call and sized to
        // `len`; no other mapping of it exists.
        unsafe { self.options(len).map_mut(file) }
            .map_err(|e| Error::map(Side::Destination, path, e))
    }
}

impl CopyStrategy for MemoryMappedCopy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MemoryMapped
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<ByteCount> {
        let source_file = open_source(source)?;
        let size = probe_size(&source_file, source)?;
        let len = usize::try_from(size).map_err(|_| {
            Error::map(
                Side::Source,
                source,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} bytes exceed the address space", size),
                ),
            )
        })?;

        let dest_file = create_destination(destination, true)?;
        dest_file
            .set_len(size)
            .map_err(|e| Error::map(Side::Destination, destination, e))?;

        if len == 0 {
            debug!("Empty source, skipping memory mapping");
            return Ok(0);
        }

        let source_map = self.map_source(&source_file, source, len)?;
        let mut dest_map = self.map_destination(&dest_file, destination, len)?;

        dest_map.copy_from_slice(&source_map);

        debug!("mmap copied {} bytes", len);
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copybench_types::ErrorKind;
    use rstest::rstest;
    use tempfile::TempDir;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 239) as u8).collect()
    }

    #[rstest]
    #[case(1)]
    #[case(4096)]
    #[case(10 * 1024 * 1024 + 3)]
    fn test_copy_file(#[case] size: usize) {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.bin");
        let destination = temp_dir.path().join("dest.bin");
        let data = sample(size);
        std::fs::write(&source, &data).unwrap();

        let copied = MemoryMappedCopy::new().copy(&source, &destination).unwrap();

        assert_eq!(copied, size as u64);
        assert_eq!(std::fs::read(&destination).unwrap(), data);
    }

    #[test]
    fn test_empty_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("empty.bin");
        let destination = temp_dir.path().join("dest.bin");
        std::fs::write(&source, b"").unwrap();
        std::fs::write(&destination, b"stale data").unwrap();

        let copied = MemoryMappedCopy::new().copy(&source, &destination).unwrap();

        assert_eq!(copied, 0);
        assert_eq!(std::fs::metadata(&destination).unwrap().len(), 0);
    }

    #[test]
    fn test_overwrites_larger_destination() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.bin");
        let destination = temp_dir.path().join("dest.bin");
        std::fs::write(&source, b"short").unwrap();
        std::fs::write(&destination, vec![0xAAu8; 100_000]).unwrap();

        MemoryMappedCopy::new()
            .with_populate(true)
            .copy(&source, &destination)
            .unwrap();

        assert_eq!(std::fs::read(&destination).unwrap(), b"short");
    }

    #[test]
    fn test_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("dest.bin");

        let error = MemoryMappedCopy::new()
            .copy(&temp_dir.path().join("missing.bin"), &destination)
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Open);
        assert!(!destination.exists());
    }
}
