//! Encrypted store adapter: durable key-value persistence for the vault
//! ciphertext and the network preference.
//!
//! This layer only moves already-opaque strings. It must never be handed
//! plaintext seed material; encryption happens in [`crate::vault`] before
//! anything reaches a [`WalletStore`].

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::warn;

use crate::error::{StorageError, WalletError};
use crate::vault::EncryptedBlob;
use crate::Network;

/// Logical record holding the serialized [`EncryptedBlob`]. Absence of this
/// record means the wallet was never created.
pub const ENCRYPTED_WALLET_RECORD: &str = "encrypted_wallet";

/// Logical record holding the network preference (`"signet" | "mainnet"`).
pub const NETWORK_RECORD: &str = "network";

/// Durable, async key-value persistence behind the vault.
///
/// Implementations wrap whatever the platform provides (extension storage,
/// a file, a database row) and surface platform faults as [`StorageError`].
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Reads the value stored under `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] on an underlying platform fault.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] on an underlying platform fault
    /// (quota exceeded, access denied).
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Typed adapter over a [`WalletStore`] for the two records the vault owns.
#[derive(Clone)]
pub struct StoreAdapter {
    inner: Arc<dyn WalletStore>,
}

impl StoreAdapter {
    /// Wraps a platform store.
    #[must_use]
    pub fn new(inner: Arc<dyn WalletStore>) -> Self {
        Self { inner }
    }

    /// Loads and parses the persisted vault ciphertext, if any.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Storage`] on a platform fault and
    /// [`WalletError::MalformedBlob`] when the record exists but cannot be
    /// parsed.
    pub async fn read_blob(&self) -> Result<Option<EncryptedBlob>, WalletError> {
        match self.inner.get(ENCRYPTED_WALLET_RECORD).await? {
            Some(raw) => Ok(Some(EncryptedBlob::from_json(&raw)?)),
            None => Ok(None),
        }
    }

    /// Persists the vault ciphertext.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Storage`] on a platform fault.
    pub async fn write_blob(&self, blob: &EncryptedBlob) -> Result<(), WalletError> {
        let raw = blob.to_json()?;
        self.inner.set(ENCRYPTED_WALLET_RECORD, &raw).await?;
        Ok(())
    }

    /// Returns `true` iff the vault ciphertext record is present.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Storage`] on a platform fault.
    pub async fn has_wallet(&self) -> Result<bool, WalletError> {
        Ok(self.inner.get(ENCRYPTED_WALLET_RECORD).await?.is_some())
    }

    /// Reads the network preference. An absent or malformed record falls
    /// back to [`Network::Signet`].
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Storage`] on a platform fault.
    pub async fn network(&self) -> Result<Network, WalletError> {
        match self.inner.get(NETWORK_RECORD).await? {
            Some(raw) => match Network::from_str(&raw) {
                Ok(network) => Ok(network),
                Err(_) => {
                    warn!(record = %raw, "malformed network preference, using default");
                    Ok(Network::default())
                }
            },
            None => Ok(Network::default()),
        }
    }

    /// Persists the network preference.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Storage`] on a platform fault.
    pub async fn set_network(&self, network: Network) -> Result<(), WalletError> {
        self.inner.set(NETWORK_RECORD, &network.to_string()).await?;
        Ok(())
    }
}

/// Thread-safe in-memory [`WalletStore`].
///
/// Not durable; intended for tests and for embedding the session vault in
/// environments without platform storage.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WalletStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let records = self
            .records
            .read()
            .map_err(|_| StorageError::new("lock poisoned"))?;
        Ok(records.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::new("lock poisoned"))?;
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
