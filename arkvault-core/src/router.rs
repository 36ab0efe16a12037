//! Privileged message router: the only entry point by which the UI context
//! can trigger session or vault operations.
//!
//! The boundary crossing is total and closed: every request yields exactly
//! one response envelope, every tag maps to exactly one handler, and no
//! internal fault ever reaches the transport unboxed. The untrusted side
//! only ever sees `{success, data?, error?}`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::WalletError;
use crate::session::{Addresses, Balance, WalletSession, WalletStatus};
use crate::Network;

/// The closed set of requests the UI context may issue.
///
/// On the wire this is a tagged JSON object, e.g.
/// `{"type": "UnlockWallet", "password": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// Create a new wallet encrypted under the given password.
    GenerateWallet {
        /// Password used to encrypt the freshly generated seed.
        password: String,
    },
    /// Query `{initialized, locked}`.
    GetWalletStatus,
    /// Decrypt the vault and start a session.
    UnlockWallet {
        /// Password to decrypt the vault with.
        password: String,
    },
    /// Clear the in-memory secret and handle.
    LockWallet,
    /// Query on-chain and off-chain balances.
    GetBalance,
    /// Query receive addresses.
    GetAddresses,
    /// Query the persisted network preference.
    GetNetwork,
    /// Persist a new network preference.
    SetNetwork {
        /// The network to select.
        network: Network,
    },
    /// Board funds into the Ark.
    Onboard {
        /// Amount in satoshis.
        amount: u64,
    },
}

/// Success payloads, one shape per request tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    /// Payload for [`Message::GetWalletStatus`].
    Status(WalletStatus),
    /// Payload for [`Message::GetBalance`].
    Balance(Balance),
    /// Payload for [`Message::GetAddresses`].
    Addresses(Addresses),
    /// Payload for [`Message::GetNetwork`].
    Network {
        /// The persisted network preference.
        network: Network,
    },
    /// Payload for [`Message::Onboard`].
    Txid {
        /// Transaction id of the broadcast boarding transaction.
        txid: String,
    },
}

/// The response envelope. Exactly one of `data`/`error` is meaningful,
/// selected by `success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    /// Whether the request succeeded.
    pub success: bool,
    /// Success payload, when the request has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
    /// Short, human-readable failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    fn ok(data: Option<ResponseData>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn failure(error: &WalletError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

/// Dispatches typed requests to the session vault.
pub struct Router {
    session: Arc<WalletSession>,
}

impl Router {
    /// Creates a router over a session.
    #[must_use]
    pub fn new(session: Arc<WalletSession>) -> Self {
        Self { session }
    }

    /// Dispatches one request and returns exactly one envelope.
    ///
    /// Total: every fault raised while processing, including by the
    /// external SDK collaborator, is captured and reported as
    /// `{success: false, error}`.
    pub async fn dispatch(&self, message: Message) -> Response {
        debug!(message = message_tag(&message), "dispatching request");
        match self.handle(message).await {
            Ok(data) => Response::ok(data),
            Err(err) => {
                warn!(error = %err, "request failed");
                Response::failure(&err)
            }
        }
    }

    /// Transport-facing entry: parses a raw JSON message and dispatches it.
    ///
    /// A closed sum type makes an unknown tag impossible to construct in
    /// Rust; this branch exists for the untrusted transport, which can send
    /// anything. Undeserializable input is answered with a failure
    /// envelope, never ignored and never a fault.
    pub async fn dispatch_raw(&self, raw: &str) -> Response {
        match serde_json::from_str::<Message>(raw) {
            Ok(message) => self.dispatch(message).await,
            Err(err) => {
                warn!(error = %err, "unrecognized message from transport");
                Response::failure(&WalletError::UnknownMessage)
            }
        }
    }

    async fn handle(&self, message: Message) -> Result<Option<ResponseData>, WalletError> {
        match message {
            Message::GenerateWallet { password } => {
                self.session.generate(&password).await?;
                Ok(None)
            }
            Message::GetWalletStatus => {
                let status = self.session.status().await?;
                Ok(Some(ResponseData::Status(status)))
            }
            Message::UnlockWallet { password } => {
                self.session.unlock(&password).await?;
                Ok(None)
            }
            Message::LockWallet => {
                self.session.lock().await;
                Ok(None)
            }
            Message::GetBalance => {
                let balance = self.session.balance().await?;
                Ok(Some(ResponseData::Balance(balance)))
            }
            Message::GetAddresses => {
                let addresses = self.session.addresses().await?;
                Ok(Some(ResponseData::Addresses(addresses)))
            }
            Message::GetNetwork => {
                let network = self.session.network().await?;
                Ok(Some(ResponseData::Network { network }))
            }
            Message::SetNetwork { network } => {
                self.session.set_network(network).await?;
                Ok(None)
            }
            Message::Onboard { amount } => {
                let txid = self.session.onboard(amount).await?;
                Ok(Some(ResponseData::Txid { txid }))
            }
        }
    }
}

const fn message_tag(message: &Message) -> &'static str {
    match message {
        Message::GenerateWallet { .. } => "GenerateWallet",
        Message::GetWalletStatus => "GetWalletStatus",
        Message::UnlockWallet { .. } => "UnlockWallet",
        Message::LockWallet => "LockWallet",
        Message::GetBalance => "GetBalance",
        Message::GetAddresses => "GetAddresses",
        Message::GetNetwork => "GetNetwork",
        Message::SetNetwork { .. } => "SetNetwork",
        Message::Onboard { .. } => "Onboard",
    }
}
