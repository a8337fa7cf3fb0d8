//! Platform capability detection
//!
//! Which copy mechanisms this host and this build can run. The table is
//! resolved once and consulted by callers instead of branching on the
//! target platform at every call site.

use copybench_types::{Availability, StrategyKind};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Availability of every copy strategy on the current host
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CapabilityTable {
    entries: Vec<CapabilityEntry>,
}

/// One row of the capability table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CapabilityEntry {
    /// The strategy
    pub kind: StrategyKind,
    /// Whether it can run here
    pub availability: Availability,
}

impl CapabilityTable {
    /// Detect capabilities for the current platform and build
    pub fn detect() -> Self {
        let entries = StrategyKind::ALL
            .iter()
            .map(|&kind| CapabilityEntry {
                kind,
                availability: detect_availability(kind),
            })
            .collect::<Vec<_>>();

        debug!("Detected copy capabilities: {:?}", entries);
        Self { entries }
    }

    /// Availability of a single strategy
    pub fn availability(&self, kind: StrategyKind) -> Availability {
        self.entries
            .iter()
            .find(|entry| entry.kind == kind)
            .map_or(Availability::Unsupported, |entry| entry.availability)
    }

    /// Check if a strategy can be invoked
    pub fn is_available(&self, kind: StrategyKind) -> bool {
        self.availability(kind).is_available()
    }

    /// Override the availability of one strategy
    pub fn with(mut self, kind: StrategyKind, availability: Availability) -> Self {
        match self.entries.iter_mut().find(|entry| entry.kind == kind) {
            Some(entry) => entry.availability = availability,
            None => self.entries.push(CapabilityEntry { kind, availability }),
        }
        self
    }

    /// Rows in benchmark order
    pub fn entries(&self) -> &[CapabilityEntry] {
        &self.entries
    }
}

impl Default for CapabilityTable {
    fn default() -> Self {
        Self::detect()
    }
}

/// Explain why a strategy cannot run
pub fn unsupported_reason(kind: StrategyKind, availability: Availability) -> String {
    match (kind, availability) {
        (_, Availability::Available) => format!("{} is available", kind),
        (StrategyKind::KernelTransfer, Availability::Unsupported) => {
            "sendfile is not available on this system".to_string()
        }
        (StrategyKind::PipeSplice, Availability::Unsupported) => {
            "splice is only available on Linux systems".to_string()
        }
        (_, Availability::Unsupported) => format!("{} is not available on this system", kind),
        (_, Availability::UnsupportedOnThisBuild) => {
            format!("{} support was not compiled into this build", kind)
        }
    }
}

/// Short description of the mechanism behind a strategy
pub fn mechanism(kind: StrategyKind) -> &'static str {
    match kind {
        StrategyKind::Traditional => "read(2)/write(2) through a user-space buffer",
        StrategyKind::MemoryMapped => "mmap(2) both files and copy between the mappings",
        StrategyKind::KernelTransfer => "sendfile(2) between the two descriptors",
        StrategyKind::PipeSplice => "splice(2) file -> pipe -> file",
    }
}

fn detect_availability(kind: StrategyKind) -> Availability {
    match kind {
        StrategyKind::Traditional | StrategyKind::MemoryMapped => Availability::Available,
        StrategyKind::KernelTransfer => gate(
            cfg!(any(target_os = "linux", target_os = "macos")),
            cfg!(feature = "kernel-transfer"),
        ),
        StrategyKind::PipeSplice => gate(cfg!(target_os = "linux"), cfg!(feature = "splice")),
    }
}

fn gate(platform_supported: bool, compiled_in: bool) -> Availability {
    if !platform_supported {
        Availability::Unsupported
    } else if !compiled_in {
        Availability::UnsupportedOnThisBuild
    } else {
        Availability::Available
    }
}
