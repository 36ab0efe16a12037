//! Error taxonomy for the secure session vault.
//!
//! Every variant renders to a short, human-readable string. These strings are
//! exactly what crosses the UI boundary inside a failure envelope, so they
//! must never carry stack traces, raw payloads, or secret material.

use thiserror::Error;

/// Errors surfaced by vault, session, and router operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The persisted ciphertext record could not be parsed into its three
    /// required fields. Raised before any cryptographic work is attempted.
    #[error("Malformed encrypted wallet record: {0}")]
    MalformedBlob(String),

    /// AEAD authentication failed. Deliberately covers both a wrong password
    /// and corrupted ciphertext so callers cannot distinguish the two.
    #[error("Unable to decrypt wallet")]
    Decryption,

    /// The supplied password did not unlock the vault.
    #[error("Incorrect password")]
    IncorrectPassword,

    /// The operation requires a vault that was never created.
    #[error("No wallet found")]
    NoWallet,

    /// A vault already exists and must not be silently overwritten.
    #[error("Wallet already exists")]
    WalletExists,

    /// The operation requires an active privileged handle that does not
    /// exist yet (locked session, or handle construction failed).
    #[error("Wallet not initialized")]
    NotInitialized,

    /// The persistence platform reported a fault (quota, access, I/O).
    #[error("Storage error: {0}")]
    Storage(String),

    /// The external network/protocol collaborator failed. Reported
    /// distinctly from local faults so the UI can suggest checking the
    /// connection.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The transport delivered a message the router does not recognize.
    #[error("Unknown message")]
    UnknownMessage,

    /// An unexpected internal fault.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Fault raised by a [`crate::storage::WalletStore`] implementation.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct StorageError(String);

impl StorageError {
    /// Creates a storage error with the given platform fault description.
    #[must_use]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self(message.into())
    }
}

impl From<StorageError> for WalletError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.0)
    }
}

/// Fault raised by the external signing SDK collaborator.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct UpstreamError(String);

impl UpstreamError {
    /// Creates an upstream error with the given fault description.
    #[must_use]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self(message.into())
    }
}

impl From<UpstreamError> for WalletError {
    fn from(err: UpstreamError) -> Self {
        Self::Upstream(err.0)
    }
}
