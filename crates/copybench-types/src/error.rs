//! Error types and handling for copybench
//!
//! Every strategy reports failures through [`Error`]. Each variant carries the
//! path involved and, where the operating system produced one, the underlying
//! [`std::io::Error`] so a failed report entry can be diagnosed without
//! re-running the copy.

use crate::StrategyKind;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Which end of a transfer an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    /// The file being read
    Source,
    /// The file being written
    Destination,
    /// The intermediate kernel pipe used by splice
    Pipe,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Destination => f.write_str("destination"),
            Self::Pipe => f.write_str("pipe"),
        }
    }
}

/// Main error type for copy strategies
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A file could not be opened or created
    #[error("Failed to open {side} file '{}': {source}", path.display())]
    Open {
        /// Which file failed to open
        side: Side,
        /// Path that was being opened
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// The size of an open file could not be queried
    #[error("Failed to query size of '{}': {source}", path.display())]
    SizeProbe {
        /// Path of the probed file
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// A memory mapping could not be established or the destination could not be sized
    #[error("Memory mapping failed for {side} file '{}': {source}", path.display())]
    Map {
        /// Which file could not be mapped or sized
        side: Side,
        /// Path of that file
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// An unrecoverable read, write or transfer failure
    #[error("I/O error on {side} '{}': {source}", path.display())]
    Io {
        /// Which side of the transfer failed
        side: Side,
        /// Path of the file on that side
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// The host platform (or this build) does not offer the mechanism
    #[error("{strategy} is not supported: {reason}")]
    UnsupportedPlatform {
        /// Strategy that was requested
        strategy: StrategyKind,
        /// Why it is unavailable
        reason: String,
    },

    /// An invalid configuration value
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the invalid value
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// Source or destination could not be opened
    Open,
    /// File status query failed
    SizeProbe,
    /// Mapping or destination sizing failed
    Map,
    /// Read, write or transfer failed
    Io,
    /// Mechanism not offered by the host
    UnsupportedPlatform,
    /// Invalid configuration value
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "OpenError",
            Self::SizeProbe => "SizeProbeError",
            Self::Map => "MapError",
            Self::Io => "IOError",
            Self::UnsupportedPlatform => "UnsupportedPlatformError",
            Self::Config => "ConfigError",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Open { .. } => ErrorKind::Open,
            Self::SizeProbe { .. } => ErrorKind::SizeProbe,
            Self::Map { .. } => ErrorKind::Map,
            Self::Io { .. } => ErrorKind::Io,
            Self::UnsupportedPlatform { .. } => ErrorKind::UnsupportedPlatform,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// The side of the transfer this error refers to, if any
    pub fn side(&self) -> Option<Side> {
        match self {
            Self::Open { side, .. } | Self::Map { side, .. } | Self::Io { side, .. } => {
                Some(*side)
            }
            Self::SizeProbe { .. } => Some(Side::Source),
            Self::UnsupportedPlatform { .. } | Self::Config { .. } => None,
        }
    }

    /// The path this error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Open { path, .. }
            | Self::SizeProbe { path, .. }
            | Self::Map { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::UnsupportedPlatform { .. } | Self::Config { .. } => None,
        }
    }

    /// Create an open error
    pub fn open(side: Side, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Open {
            side,
            path: path.into(),
            source,
        }
    }

    /// Create a size probe error
    pub fn size_probe(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SizeProbe {
            path: path.into(),
            source,
        }
    }

    /// Create a mapping error
    pub fn map(side: Side, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Map {
            side,
            path: path.into(),
            source,
        }
    }

    /// Create an I/O error
    pub fn io(side: Side, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            side,
            path: path.into(),
            source,
        }
    }

    /// Create an unsupported platform error
    pub fn unsupported<S: Into<String>>(strategy: StrategyKind, reason: S) -> Self {
        Self::UnsupportedPlatform {
            strategy,
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::error::Error as _;

    proptest! {
        #[test]
        fn test_error_kind_consistency(message in ".*", path in "[a-z/]{1,32}") {
            let errors = vec![
                Error::open(Side::Source, &path, io::Error::other(message.clone())),
                Error::size_probe(&path, io::Error::other(message.clone())),
                Error::map(Side::Destination, &path, io::Error::other(message.clone())),
                Error::io(Side::Pipe, &path, io::Error::other(message.clone())),
            ];

            for error in errors {
                prop_assert_eq!(error.path(), Some(Path::new(&path)));
                prop_assert!(error.side().is_some());
                prop_assert!(error.source().is_some());
                match error {
                    Error::Open { .. } => prop_assert_eq!(error.kind(), ErrorKind::Open),
                    Error::SizeProbe { .. } => prop_assert_eq!(error.kind(), ErrorKind::SizeProbe),
                    Error::Map { .. } => prop_assert_eq!(error.kind(), ErrorKind::Map),
                    Error::Io { .. } => prop_assert_eq!(error.kind(), ErrorKind::Io),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_open_error_message_names_side_and_path() {
        let error = Error::open(
            Side::Source,
            "/nonexistent/file.bin",
            io::Error::from(io::ErrorKind::NotFound),
        );

        let message = error.to_string();
        assert!(message.contains("source"));
        assert!(message.contains("/nonexistent/file.bin"));
        assert_eq!(error.kind(), ErrorKind::Open);
    }

    #[test]
    fn test_io_error_reports_failing_side() {
        let error = Error::io(
            Side::Destination,
            "/tmp/out.bin",
            io::Error::from_raw_os_error(28),
        );

        assert_eq!(error.side(), Some(Side::Destination));
        assert!(error.to_string().starts_with("I/O error on destination"));
    }

    #[test]
    fn test_unsupported_error() {
        let error = Error::unsupported(StrategyKind::PipeSplice, "splice is only available on Linux");

        assert_eq!(error.kind(), ErrorKind::UnsupportedPlatform);
        assert_eq!(error.side(), None);
        assert_eq!(error.path(), None);
        assert!(error.to_string().contains("splice"));
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::Open.to_string(), "OpenError");
        assert_eq!(ErrorKind::Io.to_string(), "IOError");
        assert_eq!(
            ErrorKind::UnsupportedPlatform.to_string(),
            "UnsupportedPlatformError"
        );
    }
}
