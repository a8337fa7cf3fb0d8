//! Benchmark harness for copybench
//!
//! This crate runs every copy strategy once against the same source file and
//! turns the timings into a comparison relative to the traditional
//! read/write strategy.
//!
//! # Features
//!
//! - **Fixed order**: traditional, memory mapped, kernel transfer, pipe splice
//! - **One destination per strategy**: the destination prefix plus a stable tag
//! - **No silent drops**: unsupported strategies stay in the report
//! - **Failure isolation**: a failing strategy is recorded and the run continues
//!
//! # Examples
//!
//! ```rust,no_run
//! use copybench_engine::BenchmarkHarness;
//! use std::path::Path;
//!
//! let harness = BenchmarkHarness::new();
//! let report = harness.run(Path::new("input.bin"), Path::new("/tmp/out"));
//! println!("{}", report);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod harness;
pub mod report;

pub use harness::{destination_for, BenchmarkHarness, HarnessBuilder};
pub use report::{Comparison, ReportEntry, StrategyReport};
