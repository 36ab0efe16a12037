//! Secure session vault for the Arkvault browser-extension wallet.
//!
//! The privileged background context owns everything in this crate; the
//! untrusted rendering context can only reach it through the typed message
//! protocol in [`router`]. Four layers, leaves first:
//!
//! - [`vault`] — password-derived encryption of the wallet seed
//!   (PBKDF2-HMAC-SHA256 into AES-256-GCM).
//! - [`storage`] — durable key-value persistence of the vault ciphertext
//!   and the network preference.
//! - [`session`] — the in-memory lifecycle gating access to the decrypted
//!   seed and the privileged SDK handle.
//! - [`router`] — the request/response protocol crossing the trust
//!   boundary, with a never-throwing response envelope.
//!
//! The Ark signing/UTXO engine and the mnemonic generator are consumed as
//! opaque collaborators through the traits in [`sdk`].

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::significant_drop_tightening)]

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Network selector threaded through to the external SDK collaborator.
///
/// Persisted as a lowercase string; an absent or malformed record falls
/// back to [`Network::Signet`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Network {
    /// Bitcoin signet (default).
    #[default]
    Signet,
    /// Bitcoin mainnet.
    Mainnet,
}

pub mod error;
pub mod router;
pub mod sdk;
pub mod session;
pub mod storage;
pub mod vault;

pub use error::{StorageError, UpstreamError, WalletError};
pub use router::{Message, Response, ResponseData, Router};
pub use session::{Addresses, Balance, WalletSession, WalletStatus};
pub use storage::{MemoryStore, StoreAdapter, WalletStore};
pub use vault::EncryptedBlob;
