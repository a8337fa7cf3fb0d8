//! Result type alias for copybench operations

use crate::Error;

/// Result type alias for copybench operations
pub type Result<T> = std::result::Result<T, Error>;
