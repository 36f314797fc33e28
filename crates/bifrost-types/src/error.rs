//! Error types for the bridge data model.

use thiserror::Error;

/// Result type for metadata envelope operations.
pub type MetaResult<T> = Result<T, MetaError>;

/// Errors raised by the metadata envelope codec.
#[derive(Debug, Error)]
pub enum MetaError {
    /// The carrier does not hold the expected bridge metadata.
    ///
    /// Raised when a result or specs object is handed back to the bridge
    /// but was never produced by it — `kind` names the carrier that was
    /// expected ("job", "job results", "hardware specs").
    #[error("{kind} does not carry bridge metadata — object was not produced by this bridge")]
    MissingProvenance {
        /// Which carrier kind the caller asserted.
        kind: String,
    },

    /// Envelope value failed to serialize or deserialize.
    #[error("Metadata serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
