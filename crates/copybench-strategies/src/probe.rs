//! Source file size detection

use copybench_types::{ByteCount, Error, Result};
use std::fs::File;
use std::path::Path;

use crate::strategy::open_source;

/// Exact current byte length of an open file
///
/// `path` is only used to label the error.
pub fn probe_size(file: &File, path: &Path) -> Result<ByteCount> {
    let metadata = file.metadata().map_err(|e| Error::size_probe(path, e))?;
    Ok(metadata.len())
}

/// Open `path` read-only and return its byte length
pub fn probe_path(path: &Path) -> Result<ByteCount> {
    let file = open_source(path)?;
    probe_size(&file, path)
}
