//! Seams for the external collaborators the session vault consumes.
//!
//! The Ark signing/UTXO engine and the mnemonic generator are opaque to
//! this crate. Upstream responses are loosely shaped across SDK versions,
//! so implementations must normalize amounts into smallest-unit integers
//! at this boundary; nothing past it ever sees the upstream wire shapes.

use std::sync::Arc;

use async_trait::async_trait;
use rand::{rngs::OsRng, RngCore};

use crate::error::{UpstreamError, WalletError};
use crate::Network;

/// A spendable on-chain output, normalized on ingress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coin {
    /// Amount in satoshis.
    pub amount: u64,
}

/// A virtual transaction output held off-chain, normalized on ingress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vtxo {
    /// Amount in satoshis.
    pub amount: u64,
    /// Whether the output is currently spendable.
    pub spendable: bool,
}

/// The privileged handle: an SDK instance bound to a decrypted seed and a
/// network selection. Required for any balance, address, or send operation.
#[async_trait]
pub trait ArkHandle: Send + Sync {
    /// Fetches the wallet's on-chain coins.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] on any network or protocol fault.
    async fn coins(&self) -> Result<Vec<Coin>, UpstreamError>;

    /// Fetches the wallet's off-chain virtual outputs.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] on any network or protocol fault.
    async fn vtxos(&self) -> Result<Vec<Vtxo>, UpstreamError>;

    /// Broadcasts a payment of `amount` satoshis to `address` and returns
    /// the transaction id.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] when the broadcast fails.
    async fn send_bitcoin(&self, address: &str, amount: u64) -> Result<String, UpstreamError>;

    /// The wallet's on-chain receive address, when the SDK has one.
    fn onchain_address(&self) -> Option<String>;

    /// The wallet's off-chain (Ark) receive address, when the SDK has one.
    fn offchain_address(&self) -> Option<String>;

    /// The on-chain address used to board funds into the Ark, when the SDK
    /// has one.
    fn boarding_address(&self) -> Option<String>;
}

/// Factory for privileged handles.
#[async_trait]
pub trait ArkSdk: Send + Sync {
    /// Constructs a handle bound to `seed` and `network`.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] when the SDK cannot be initialized,
    /// e.g. because its service endpoints are unreachable.
    async fn connect(
        &self,
        seed: &str,
        network: Network,
    ) -> Result<Arc<dyn ArkHandle>, UpstreamError>;
}

/// Source of fresh seed material for wallet generation.
pub trait MnemonicProvider: Send + Sync {
    /// Generates a new mnemonic phrase.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Internal`] when generation fails.
    fn generate(&self) -> Result<String, WalletError>;
}

/// Default [`MnemonicProvider`]: a 12-word English BIP-39 mnemonic from
/// 128 bits of OS randomness.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bip39Mnemonic;

impl MnemonicProvider for Bip39Mnemonic {
    fn generate(&self) -> Result<String, WalletError> {
        let mut entropy = [0u8; 16];
        OsRng.fill_bytes(&mut entropy);
        let mnemonic = bip39::Mnemonic::from_entropy(&entropy)
            .map_err(|err| WalletError::Internal(format!("mnemonic generation failed: {err}")))?;
        Ok(mnemonic.to_string())
    }
}
