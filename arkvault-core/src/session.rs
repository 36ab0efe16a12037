//! Session state machine: the process-lifetime holder of the decrypted
//! seed and the derived privileged handle.
//!
//! The session is owned exclusively by the privileged execution context.
//! The UI side never holds a reference to the secret or the handle; only
//! derived, non-secret projections (status, balances, addresses) cross the
//! boundary.
//!
//! Handle construction is deliberately asymmetric to the unlock itself: a
//! failing SDK leaves the session unlocked-without-a-handle so the user can
//! retry (for example by switching network) without re-entering the
//! password. There is no automatic retry and no auto-relock.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::error::WalletError;
use crate::sdk::{ArkHandle, ArkSdk, MnemonicProvider};
use crate::storage::{StoreAdapter, WalletStore};
use crate::{vault, Network};

/// Transient, memory-only session contents. Never persisted.
///
/// Invariant: `handle` is `Some` only if `secret` is `Some`; both are
/// cleared together under one mutex guard on lock.
#[derive(Default)]
struct SessionState {
    secret: Option<SecretString>,
    handle: Option<Arc<dyn ArkHandle>>,
}

/// Wallet lifecycle status as reported across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalletStatus {
    /// Whether a vault ciphertext exists in storage.
    pub initialized: bool,
    /// Whether the session currently holds no decrypted secret.
    pub locked: bool,
}

/// On-chain and off-chain balances in satoshis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balance {
    /// Sum of on-chain coin amounts.
    pub onchain: u64,
    /// Sum of spendable off-chain output amounts.
    pub offchain: u64,
}

/// Receive addresses as reported across the boundary. Empty string when
/// the SDK has no address available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Addresses {
    /// On-chain receive address.
    pub onchain: String,
    /// Off-chain (Ark) receive address.
    pub offchain: String,
}

/// The session vault: vault codec plus store adapter plus in-memory state.
///
/// Mutating transitions (`generate`, `unlock`, `lock`, `set_network`) are
/// serialized by an internal mutex; queries observe the current snapshot.
pub struct WalletSession {
    store: StoreAdapter,
    sdk: Arc<dyn ArkSdk>,
    mnemonic: Arc<dyn MnemonicProvider>,
    state: Mutex<SessionState>,
}

impl WalletSession {
    /// Creates a locked session over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn WalletStore>,
        sdk: Arc<dyn ArkSdk>,
        mnemonic: Arc<dyn MnemonicProvider>,
    ) -> Self {
        Self {
            store: StoreAdapter::new(store),
            sdk,
            mnemonic,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Generates fresh seed material, encrypts it under `password`, and
    /// persists the vault. The session stays locked.
    ///
    /// Policy: re-invoking with a vault already on disk is rejected; an
    /// existing vault is never silently overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::WalletExists`] when a vault is already
    /// persisted, or [`WalletError::Storage`] on a platform fault.
    pub async fn generate(&self, password: &str) -> Result<(), WalletError> {
        let _state = self.state.lock().await;
        if self.store.has_wallet().await? {
            return Err(WalletError::WalletExists);
        }
        let seed = Zeroizing::new(self.mnemonic.generate()?);
        let blob = vault::encrypt(seed.as_str(), password)?;
        self.store.write_blob(&blob).await?;
        debug!("wallet generated, vault persisted, session locked");
        Ok(())
    }

    /// Decrypts the persisted vault with `password` and attempts to
    /// construct the privileged handle for the current network preference.
    ///
    /// A failing handle construction does not roll back the unlock: the
    /// secret stays held and the failure is logged, so the user can retry
    /// handle construction without re-entering the password.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::NoWallet`] when no vault exists,
    /// [`WalletError::IncorrectPassword`] on an authentication failure, or
    /// [`WalletError::Storage`] on a platform fault.
    pub async fn unlock(&self, password: &str) -> Result<(), WalletError> {
        let mut state = self.state.lock().await;
        let blob = self.store.read_blob().await?.ok_or(WalletError::NoWallet)?;
        let seed = vault::decrypt(&blob, password).map_err(|err| match err {
            WalletError::Decryption => WalletError::IncorrectPassword,
            other => other,
        })?;

        let network = self.store.network().await.unwrap_or_else(|err| {
            warn!(error = %err, "network preference unreadable, using default");
            Network::default()
        });

        let attempt = self.sdk.connect(seed.expose_secret(), network).await;
        state.secret = Some(seed);
        match attempt {
            Ok(handle) => {
                state.handle = Some(handle);
                debug!(%network, "session unlocked");
            }
            Err(err) => {
                warn!(error = %err, "handle construction failed, session unlocked without a handle");
                state.handle = None;
            }
        }
        Ok(())
    }

    /// Clears the secret and the privileged handle. Idempotent: locking an
    /// already-locked session is a no-op.
    pub async fn lock(&self) {
        let mut state = self.state.lock().await;
        state.secret = None;
        state.handle = None;
        debug!("session locked");
    }

    /// Persists the network preference. If the session is unlocked, the
    /// privileged handle is re-derived from the in-memory secret; a failed
    /// re-derivation clears the stale handle but does not undo the
    /// preference write or lock the session.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Storage`] when the preference cannot be
    /// persisted.
    pub async fn set_network(&self, network: Network) -> Result<(), WalletError> {
        let mut state = self.state.lock().await;
        self.store.set_network(network).await?;

        let Some(secret) = state.secret.as_ref() else {
            return Ok(());
        };
        let attempt = self.sdk.connect(secret.expose_secret(), network).await;
        match attempt {
            Ok(handle) => {
                state.handle = Some(handle);
                debug!(%network, "privileged handle re-derived");
            }
            Err(err) => {
                warn!(error = %err, %network, "handle re-derivation failed, clearing stale handle");
                state.handle = None;
            }
        }
        Ok(())
    }

    /// Reads the persisted network preference.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Storage`] on a platform fault.
    pub async fn network(&self) -> Result<Network, WalletError> {
        self.store.network().await
    }

    /// Reports `{initialized, locked}`. Pure read.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Storage`] on a platform fault.
    pub async fn status(&self) -> Result<WalletStatus, WalletError> {
        let initialized = self.store.has_wallet().await?;
        let locked = self.state.lock().await.secret.is_none();
        Ok(WalletStatus { initialized, locked })
    }

    /// Fetches the on-chain and off-chain balances independently. Either
    /// subsystem failing degrades that figure to zero, with the fault kept
    /// visible in diagnostics; one side failing never zeroes out the other.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::NotInitialized`] when no privileged handle
    /// is available.
    pub async fn balance(&self) -> Result<Balance, WalletError> {
        let handle = self.privileged_handle().await?;

        let onchain = match handle.coins().await {
            Ok(coins) => coins.iter().map(|coin| coin.amount).sum(),
            Err(err) => {
                warn!(error = %err, "on-chain balance query failed, reporting zero");
                0
            }
        };
        let offchain = match handle.vtxos().await {
            Ok(vtxos) => vtxos
                .iter()
                .filter(|vtxo| vtxo.spendable)
                .map(|vtxo| vtxo.amount)
                .sum(),
            Err(err) => {
                warn!(error = %err, "off-chain balance query failed, reporting zero");
                0
            }
        };

        Ok(Balance { onchain, offchain })
    }

    /// Reports the wallet's receive addresses, substituting an empty string
    /// for anything the SDK cannot provide.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::NotInitialized`] when no privileged handle
    /// is available.
    pub async fn addresses(&self) -> Result<Addresses, WalletError> {
        let handle = self.privileged_handle().await?;
        Ok(Addresses {
            onchain: handle.onchain_address().unwrap_or_default(),
            offchain: handle.offchain_address().unwrap_or_default(),
        })
    }

    /// Boards `amount` satoshis into the Ark by sending them to the
    /// boarding on-chain address. Returns the transaction id.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::NotInitialized`] when no privileged handle is
    /// available, or [`WalletError::Upstream`] when the boarding address is
    /// unavailable or the broadcast fails.
    pub async fn onboard(&self, amount: u64) -> Result<String, WalletError> {
        let handle = self.privileged_handle().await?;
        let address = handle
            .boarding_address()
            .ok_or_else(|| WalletError::Upstream("boarding address unavailable".to_string()))?;
        let txid = handle.send_bitcoin(&address, amount).await?;
        debug!(%txid, amount, "boarding transaction broadcast");
        Ok(txid)
    }

    /// Snapshot of the current privileged handle.
    async fn privileged_handle(&self) -> Result<Arc<dyn ArkHandle>, WalletError> {
        self.state
            .lock()
            .await
            .handle
            .clone()
            .ok_or(WalletError::NotInitialized)
    }
}
