//! copybench testing suite
//!
//! Shared helpers for the cross-crate integration tests and the criterion
//! benchmarks.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Unified test utilities
///
/// Deterministic test data and scratch files used by every test and
/// benchmark in this crate.
pub mod test_utils;
