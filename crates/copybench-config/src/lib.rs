//! Configuration for copybench
//!
//! Settings are layered: built-in defaults, then an optional YAML, TOML or
//! JSON file, then environment variables prefixed with `COPYBENCH`
//! (`COPYBENCH__COPY__BUFFER_SIZE=8192`).
//!
//! # Examples
//!
//! ```rust
//! use copybench_config::{BenchConfig, ConfigBuilder};
//!
//! let config = ConfigBuilder::new()
//!     .add_defaults()
//!     .add_source_file("copybench.yaml")
//!     .add_env_prefix("COPYBENCH")
//!     .build()
//!     .expect("Failed to load configuration");
//!
//! println!("Buffer size: {}", config.copy.buffer_size.get());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use copybench_strategies::StrategyOptions;
use copybench_types::{BufferSize, ChunkSize, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod builder;
pub mod error;
pub mod loader;

pub use builder::ConfigBuilder;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "COPYBENCH";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Strategy tunables
    pub copy: CopyConfig,
    /// Report rendering
    pub report: ReportConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl BenchConfig {
    /// Strategy options derived from the copy section
    pub fn strategy_options(&self) -> StrategyOptions {
        StrategyOptions {
            buffer_size: self.copy.buffer_size,
            splice_chunk_size: self.copy.splice_chunk_size,
            retry: self.copy.retry,
        }
    }
}

/// Strategy tunables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyConfig {
    /// Buffer size for the read/write strategy
    pub buffer_size: BufferSize,
    /// Per-round chunk size for the splice strategy
    pub splice_chunk_size: ChunkSize,
    /// Retry policy for "would block" and "interrupted" results
    pub retry: RetryPolicy,
}

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human readable table
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Report configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format
    pub format: ReportFormat,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level, used when neither flags nor `RUST_LOG` choose one
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BenchConfig::default();
        assert_eq!(config.copy.buffer_size.get(), 4096);
        assert_eq!(config.copy.splice_chunk_size.get(), 65536);
        assert_eq!(config.copy.retry.max_retries, None);
        assert_eq!(config.report.format, ReportFormat::Text);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_strategy_options() {
        let mut config = BenchConfig::default();
        config.copy.buffer_size = BufferSize::new(8192).unwrap();
        config.copy.retry = RetryPolicy::bounded(3);

        let options = config.strategy_options();
        assert_eq!(options.buffer_size.get(), 8192);
        assert_eq!(options.splice_chunk_size, ChunkSize::default());
        assert_eq!(options.retry, RetryPolicy::bounded(3));
    }
}
