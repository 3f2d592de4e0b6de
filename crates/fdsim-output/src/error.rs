//! Errors from output registry lookups.

use thiserror::Error;

/// Errors from the output registry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OutputError {
    /// The requested index is past the end of the registry.
    #[error("output index {index} out of range (registry has {len} outputs)")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of registered outputs.
        len: usize,
    },
}
