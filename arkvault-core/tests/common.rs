//! Common test collaborators shared across integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use arkvault_core::error::{StorageError, UpstreamError, WalletError};
use arkvault_core::sdk::{ArkHandle, ArkSdk, Coin, MnemonicProvider, Vtxo};
use arkvault_core::storage::WalletStore;
use arkvault_core::Network;

/// The classic BIP-39 test vector phrase.
pub const TEST_SEED: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// Mnemonic provider that always yields the same phrase.
pub struct FixedMnemonic(pub &'static str);

impl MnemonicProvider for FixedMnemonic {
    fn generate(&self) -> Result<String, WalletError> {
        Ok(self.0.to_string())
    }
}

/// Configurable privileged-handle double.
#[derive(Default)]
pub struct MockHandle {
    /// Coins returned by `coins()`.
    pub coins: Vec<Coin>,
    /// Vtxos returned by `vtxos()`.
    pub vtxos: Vec<Vtxo>,
    /// Fail the on-chain query with a not-found condition.
    pub fail_coins: bool,
    /// Fail the off-chain query with a not-found condition.
    pub fail_vtxos: bool,
    /// On-chain address, if any.
    pub onchain: Option<String>,
    /// Off-chain address, if any.
    pub offchain: Option<String>,
    /// Boarding address, if any.
    pub boarding: Option<String>,
    /// Fail `send_bitcoin` with a broadcast error.
    pub fail_send: bool,
    /// Records every `send_bitcoin` call as `(address, amount)`.
    pub sent: Mutex<Vec<(String, u64)>>,
}

#[async_trait]
impl ArkHandle for MockHandle {
    async fn coins(&self) -> Result<Vec<Coin>, UpstreamError> {
        if self.fail_coins {
            return Err(UpstreamError::new("coins not found"));
        }
        Ok(self.coins.clone())
    }

    async fn vtxos(&self) -> Result<Vec<Vtxo>, UpstreamError> {
        if self.fail_vtxos {
            return Err(UpstreamError::new("vtxos not found"));
        }
        Ok(self.vtxos.clone())
    }

    async fn send_bitcoin(&self, address: &str, amount: u64) -> Result<String, UpstreamError> {
        if self.fail_send {
            return Err(UpstreamError::new("broadcast rejected"));
        }
        self.sent
            .lock()
            .expect("sent lock")
            .push((address.to_string(), amount));
        Ok(format!("txid-{amount}"))
    }

    fn onchain_address(&self) -> Option<String> {
        self.onchain.clone()
    }

    fn offchain_address(&self) -> Option<String> {
        self.offchain.clone()
    }

    fn boarding_address(&self) -> Option<String> {
        self.boarding.clone()
    }
}

/// Configurable SDK double that records connection attempts.
pub struct MockSdk {
    fail_connect: AtomicBool,
    /// Number of `connect` calls observed.
    pub connects: AtomicUsize,
    /// Network passed to the most recent `connect` call.
    pub last_network: Mutex<Option<Network>>,
    /// Seed passed to the most recent `connect` call.
    pub last_seed: Mutex<Option<String>>,
    handle: Mutex<Arc<MockHandle>>,
}

impl MockSdk {
    /// An SDK double handing out a default (empty) handle.
    pub fn new() -> Self {
        Self::with_handle(MockHandle::default())
    }

    /// An SDK double handing out the given handle on every connect.
    pub fn with_handle(handle: MockHandle) -> Self {
        Self {
            fail_connect: AtomicBool::new(false),
            connects: AtomicUsize::new(0),
            last_network: Mutex::new(None),
            last_seed: Mutex::new(None),
            handle: Mutex::new(Arc::new(handle)),
        }
    }

    /// Replaces the handle handed out by subsequent connects.
    pub fn set_handle(&self, handle: MockHandle) {
        *self.handle.lock().expect("handle lock") = Arc::new(handle);
    }

    /// Makes subsequent connects fail (or succeed again).
    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }
}

impl Default for MockSdk {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArkSdk for MockSdk {
    async fn connect(
        &self,
        seed: &str,
        network: Network,
    ) -> Result<Arc<dyn ArkHandle>, UpstreamError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        *self.last_network.lock().expect("network lock") = Some(network);
        *self.last_seed.lock().expect("seed lock") = Some(seed.to_string());
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(UpstreamError::new("ark service unreachable"));
        }
        Ok(self.handle.lock().expect("handle lock").clone())
    }
}

/// Store double where every operation reports a platform fault.
pub struct FailingStore;

#[async_trait]
impl WalletStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::new("quota exceeded"))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::new("quota exceeded"))
    }
}

/// Installs a test subscriber so degraded-path warnings are visible when
/// running with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
