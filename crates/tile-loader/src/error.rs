//! Error types for image transfer operations.

use thiserror::Error;

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors that can occur while moving an image out of flash.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A caller-supplied parameter was unusable.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with it.
        reason: String,
    },

    /// The requested tag is not present in the boot filesystem.
    #[error("Tag not found in boot filesystem: {tag}")]
    TagNotFound {
        /// Tag that was looked up.
        tag: String,
    },

    /// A flash read failed partway through a transfer.
    #[error("Flash read at {offset:#x} failed: {reason}")]
    FlashRead {
        /// Flash byte offset of the failing read.
        offset: u64,
        /// Reason for failure.
        reason: String,
    },

    /// The block-transfer primitive reported failure.
    #[error("Transfer failed: {reason}")]
    TransferFailed {
        /// Reason for failure.
        reason: String,
    },

    /// The image does not fit within a single window program.
    #[error("Destination too large: {length} bytes exceeds window reach of {reach}")]
    DestinationTooLarge {
        /// Image length in bytes.
        length: u64,
        /// Window reach in bytes.
        reach: u64,
    },

    /// I/O error from a file-backed flash store.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a tag-not-found error.
    pub fn tag_not_found(tag: impl Into<String>) -> Self {
        Self::TagNotFound { tag: tag.into() }
    }

    /// Create a flash-read error.
    pub fn flash_read(offset: u64, reason: impl Into<String>) -> Self {
        Self::FlashRead {
            offset,
            reason: reason.into(),
        }
    }

    /// Create a transfer-failed error.
    pub fn transfer_failed(reason: impl Into<String>) -> Self {
        Self::TransferFailed {
            reason: reason.into(),
        }
    }
}
