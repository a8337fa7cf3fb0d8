//! Core data types for copybench
//!
//! Strategy identities, platform availability and per-invocation outcomes.

use crate::{Error, ErrorKind};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// File size or transfer length in bytes
pub type ByteCount = u64;

/// The four copy strategies, in the order the benchmark runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StrategyKind {
    /// read/write loop through a user-space buffer
    Traditional,
    /// mmap both files and memcpy between the mappings
    MemoryMapped,
    /// sendfile between two descriptors
    KernelTransfer,
    /// splice through an anonymous pipe
    PipeSplice,
}

impl StrategyKind {
    /// All strategies in benchmark order
    pub const ALL: [Self; 4] = [
        Self::Traditional,
        Self::MemoryMapped,
        Self::KernelTransfer,
        Self::PipeSplice,
    ];

    /// Suffix appended to the destination prefix for this strategy's output file
    pub fn tag(self) -> &'static str {
        match self {
            Self::Traditional => ".traditional",
            Self::MemoryMapped => ".mmap",
            Self::KernelTransfer => ".sendfile",
            Self::PipeSplice => ".splice",
        }
    }

    /// Human readable name used in reports
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Traditional => "Traditional",
            Self::MemoryMapped => "mmap/munmap",
            Self::KernelTransfer => "sendfile",
            Self::PipeSplice => "splice",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Whether a strategy's mechanism can run here
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Availability {
    /// The mechanism is compiled in and offered by the host OS
    Available,
    /// The host OS does not offer the mechanism
    Unsupported,
    /// The mechanism was compiled out of this build
    UnsupportedOnThisBuild,
}

impl Availability {
    /// Check if the strategy can be invoked
    pub fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("available"),
            Self::Unsupported => f.write_str("unsupported on this platform"),
            Self::UnsupportedOnThisBuild => f.write_str("unsupported on this build"),
        }
    }
}

/// Final result of one strategy invocation
///
/// Built from the strategy's `Result`; a copy either finished or failed,
/// there is no partial state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum CopyOutcome {
    /// All bytes were copied
    Success {
        /// Number of bytes written to the destination
        bytes_copied: ByteCount,
    },
    /// The strategy failed
    Failure {
        /// Category of the failure
        kind: ErrorKind,
        /// Full error text, including path and OS error
        message: String,
    },
}

impl CopyOutcome {
    /// Check if the copy succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Failure kind, if the copy failed
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl From<&Error> for CopyOutcome {
    fn from(error: &Error) -> Self {
        Self::Failure {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl From<crate::Result<ByteCount>> for CopyOutcome {
    fn from(result: crate::Result<ByteCount>) -> Self {
        match result {
            Ok(bytes_copied) => Self::Success { bytes_copied },
            Err(error) => Self::from(&error),
        }
    }
}

impl fmt::Display for CopyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { bytes_copied } => write!(f, "ok ({} bytes)", bytes_copied),
            Self::Failure { kind, message } => write!(f, "FAILED [{}]: {}", kind, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Side;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case(StrategyKind::Traditional, ".traditional")]
    #[case(StrategyKind::MemoryMapped, ".mmap")]
    #[case(StrategyKind::KernelTransfer, ".sendfile")]
    #[case(StrategyKind::PipeSplice, ".splice")]
    fn test_strategy_tags(#[case] kind: StrategyKind, #[case] tag: &str) {
        assert_eq!(kind.tag(), tag);
    }

    #[test]
    fn test_tags_are_distinct() {
        let tags: HashSet<_> = StrategyKind::ALL.iter().map(|k| k.tag()).collect();
        assert_eq!(tags.len(), StrategyKind::ALL.len());
    }

    #[test]
    fn test_benchmark_order_starts_with_traditional() {
        assert_eq!(StrategyKind::ALL[0], StrategyKind::Traditional);
        assert_eq!(StrategyKind::ALL[3], StrategyKind::PipeSplice);
    }

    #[test]
    fn test_outcome_from_result() {
        let ok: crate::Result<u64> = Ok(42);
        assert_eq!(
            CopyOutcome::from(ok),
            CopyOutcome::Success { bytes_copied: 42 }
        );

        let err: crate::Result<u64> = Err(Error::open(
            Side::Source,
            "missing.bin",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ));
        let outcome = CopyOutcome::from(err);
        assert!(!outcome.is_success());
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Open));
    }

    #[test]
    fn test_availability() {
        assert!(Availability::Available.is_available());
        assert!(!Availability::Unsupported.is_available());
        assert!(!Availability::UnsupportedOnThisBuild.is_available());
        assert_eq!(
            Availability::UnsupportedOnThisBuild.to_string(),
            "unsupported on this build"
        );
    }
}
