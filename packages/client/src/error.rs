//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The `pkey` payload could not be parsed
    #[error("Received an unusable private key: {0}")]
    InvalidKey(String),

    /// An encrypted envelope arrived before any `pkey`
    #[error("No private key held for this session")]
    MissingKey,

    /// Base64 or RSA failure on an incoming envelope
    #[error("Failed to decrypt incoming message: {0}")]
    DecryptionFailed(String),
}
