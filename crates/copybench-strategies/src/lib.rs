//! File copy strategies for copybench
//!
//! This crate implements four ways of copying one file's contents to
//! another path, all behind the [`CopyStrategy`] trait:
//!
//! - **Traditional**: `read`/`write` through a user-space buffer (the baseline)
//! - **Memory mapped**: map both files and copy between the mappings
//! - **Kernel transfer**: `sendfile`, no user-space buffer at all
//! - **Pipe splice**: `splice` into and out of an anonymous pipe
//!
//! Which of these can run on the current host is described by
//! [`CapabilityTable`]. A strategy that cannot run fails with
//! `UnsupportedPlatform` instead of silently falling back.
//!
//! # Features
//!
//! - `serde` (default): Enable serialization support for capability tables
//! - `kernel-transfer` (default): Build the sendfile strategy
//! - `splice` (default): Build the splice strategy (Linux only)
//!
//! # Platform Support
//!
//! - **Linux**: all four strategies
//! - **macOS**: traditional, memory mapped and kernel transfer
//! - **Other**: traditional and memory mapped
//!
//! # Examples
//!
//! ```rust,no_run
//! use copybench_strategies::{create_strategy, StrategyOptions};
//! use copybench_types::StrategyKind;
//! use std::path::Path;
//!
//! let strategy = create_strategy(StrategyKind::Traditional, &StrategyOptions::default());
//! let copied = strategy.copy(Path::new("source.bin"), Path::new("dest.bin"))?;
//! println!("copied {} bytes", copied);
//! # Ok::<(), copybench_types::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod capabilities;
pub mod kernel_transfer;
pub mod memory_map;
pub mod probe;
pub mod retry;
pub mod splice;
pub mod strategy;
pub mod traditional;

#[cfg(all(
    target_os = "linux",
    any(feature = "kernel-transfer", feature = "splice")
))]
pub mod linux;

#[cfg(all(target_os = "macos", feature = "kernel-transfer"))]
pub mod macos;

// Re-export main types
pub use capabilities::{CapabilityEntry, CapabilityTable};
pub use kernel_transfer::KernelTransferCopy;
pub use memory_map::MemoryMappedCopy;
pub use probe::{probe_path, probe_size};
pub use splice::PipeSpliceCopy;
pub use strategy::{create_all, create_strategy, CopyStrategy, StrategyOptions};
pub use traditional::TraditionalCopy;
