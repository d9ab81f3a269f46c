//! Error types for driver operations

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for driver operations
pub type Result<T> = std::result::Result<T, ZynnError>;

/// Errors that can occur during accelerator operations
#[derive(Debug, Error)]
pub enum ZynnError {
    /// Device memory node not found or not accessible
    #[error("Device memory not accessible: {path}")]
    DeviceNotFound {
        /// Path that was checked
        path: PathBuf,
    },

    /// I/O error during device access
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// Mapping the register window failed
    #[error("Failed to map register window: {reason}")]
    MapFailed {
        /// Reason for failure
        reason: String,
    },

    /// Inference did not complete within the timeout budget
    #[error("Inference timeout after {waited:?}")]
    Timeout {
        /// Accumulated polling time when the wait gave up
        waited: Duration,
    },

    /// Empty output vector passed to the interpreter
    #[error("Empty output vector")]
    EmptyOutputVector,

    /// Class index out of range for the output vector
    #[error("Class index {index} out of range (vector has {count} classes)")]
    InvalidClassIndex {
        /// Requested index
        index: usize,
        /// Number of classes in the vector
        count: usize,
    },

    /// Bulk data transfer failed
    #[error("Transfer failed: {reason}")]
    TransferFailed {
        /// Reason for failure
        reason: String,
    },
}

impl ZynnError {
    /// Create a device not found error
    pub fn device_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DeviceNotFound { path: path.into() }
    }

    /// Create a map failed error
    pub fn map_failed(reason: impl Into<String>) -> Self {
        Self::MapFailed {
            reason: reason.into(),
        }
    }

    /// Create a transfer failed error
    pub fn transfer_failed(reason: impl Into<String>) -> Self {
        Self::TransferFailed {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_distinct_from_transfer_failure() {
        let timeout = ZynnError::Timeout {
            waited: Duration::from_millis(1),
        };
        let transfer = ZynnError::transfer_failed("DMA stalled");
        assert!(matches!(timeout, ZynnError::Timeout { .. }));
        assert!(matches!(transfer, ZynnError::TransferFailed { .. }));
    }

    #[test]
    fn error_messages_name_the_failure() {
        let e = ZynnError::InvalidClassIndex { index: 12, count: 10 };
        assert_eq!(
            e.to_string(),
            "Class index 12 out of range (vector has 10 classes)"
        );
    }
}
