//! Core types and error handling for copybench
//!
//! This crate provides the shared vocabulary of the copybench workspace:
//!
//! - **Error handling**: one error type whose variants name the failing side and path
//! - **Core types**: strategy identities, platform availability and copy outcomes
//! - **Configuration values**: validated buffer/chunk sizes and the transient retry policy
//!
//! # Features
//!
//! - `serde`: Enable serialization support
//!
//! # Examples
//!
//! ```rust
//! use copybench_types::{CopyOutcome, Result, StrategyKind};
//!
//! fn finished(bytes: u64) -> Result<u64> {
//!     Ok(bytes)
//! }
//!
//! let outcome = CopyOutcome::from(finished(1024));
//! assert!(outcome.is_success());
//! assert_eq!(StrategyKind::Traditional.tag(), ".traditional");
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod result;
pub mod types;

// Re-export commonly used types
pub use config::{BufferSize, ChunkSize, RetryPolicy};
pub use error::{Error, ErrorKind, Side};
pub use result::Result;
pub use types::*;
