//! Unified test utilities for copybench tests and benchmarks

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test data generation patterns
#[derive(Debug, Clone, Copy)]
pub enum TestDataPattern {
    /// All zeros
    Zeros,
    /// Deterministic pseudo-random bytes
    Random,
    /// Repeating ramp, easy to eyeball in a hex dump
    Realistic,
}

/// Seed for [`TestDataPattern::Random`]
pub const RANDOM_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Generate test data with specified pattern
///
/// The same size and pattern always yield the same bytes.
pub fn generate_test_data(size: usize, pattern: TestDataPattern) -> Vec<u8> {
    match pattern {
        TestDataPattern::Zeros => vec![0u8; size],
        TestDataPattern::Random => {
            // xorshift64*, eight bytes per step
            let mut state = RANDOM_SEED;
            let mut data = Vec::with_capacity(size + 8);
            while data.len() < size {
                state ^= state >> 12;
                state ^= state << 25;
                state ^= state >> 27;
                data.extend_from_slice(&state.wrapping_mul(0x2545_F491_4F6C_DD1D).to_le_bytes());
            }
            data.truncate(size);
            data
        }
        TestDataPattern::Realistic => (0..size).map(|i| ((i * 7 + 13) % 256) as u8).collect(),
    }
}

/// Create a temporary file with test data
pub fn create_test_file(
    temp_dir: &TempDir,
    name: &str,
    size: usize,
    pattern: TestDataPattern,
) -> PathBuf {
    let file_path = temp_dir.path().join(name);
    let data = generate_test_data(size, pattern);
    fs::write(&file_path, data).expect("Failed to write test file");
    file_path
}

/// Common file sizes for tests and benchmarks
pub struct CommonFileSizes;

impl CommonFileSizes {
    /// Empty file
    pub const EMPTY: usize = 0;
    /// 4KB, one traditional buffer
    pub const SMALL: usize = 4 * 1024;
    /// 64KB, one splice chunk
    pub const MEDIUM: usize = 64 * 1024;
    /// 1MB
    pub const LARGE: usize = 1024 * 1024;
    /// 10MB
    pub const XLARGE: usize = 10 * 1024 * 1024;

    /// Sizes suitable for benchmarks
    pub fn benchmark() -> Vec<(&'static str, usize)> {
        vec![
            ("4KB", Self::SMALL),
            ("64KB", Self::MEDIUM),
            ("1MB", Self::LARGE),
            ("10MB", Self::XLARGE),
        ]
    }
}
