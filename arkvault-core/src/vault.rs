//! Vault codec: password-based encryption of the wallet seed.
//!
//! Turns a user password and an arbitrary plaintext secret into a
//! ciphertext that is non-recoverable without the password, and back.
//!
//! The at-rest format is a JSON object `{cipherText, salt, iv}` with every
//! field base64-encoded. The key is derived with PBKDF2-HMAC-SHA256 at a
//! fixed work factor and used exclusively for AES-256-GCM. Salt and nonce
//! are drawn fresh from the OS RNG on every encryption call; reuse across
//! blobs is forbidden.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::Hmac;
use rand::{rngs::OsRng, RngCore};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::WalletError;

/// PBKDF2 work factor. Fixed and documented: changing it breaks decryption
/// of existing vaults.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

const KEY_LEN: usize = 32;

/// At-rest representation of an encrypted secret.
///
/// Created once at wallet-generation time and immutable thereafter. All
/// three fields are base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EncryptedBlob {
    /// AEAD output (ciphertext plus authentication tag), base64.
    pub cipher_text: String,
    /// PBKDF2 salt (16 bytes), base64. Persisted so the key can be
    /// re-derived at decryption time.
    pub salt: String,
    /// AES-GCM nonce (12 bytes), base64.
    pub iv: String,
}

impl EncryptedBlob {
    /// Parses the persisted JSON record.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::MalformedBlob`] when the input is not a JSON
    /// object with exactly the three required fields. No cryptographic work
    /// is attempted.
    pub fn from_json(raw: &str) -> Result<Self, WalletError> {
        serde_json::from_str(raw).map_err(|err| WalletError::MalformedBlob(err.to_string()))
    }

    /// Serializes the blob for persistence.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Internal`] if JSON serialization fails, which
    /// cannot happen for this struct in practice.
    pub fn to_json(&self) -> Result<String, WalletError> {
        serde_json::to_string(self).map_err(|err| WalletError::Internal(err.to_string()))
    }
}

/// Derives the AEAD key from a password and salt.
///
/// Deterministic: the same `(password, salt)` pair always yields the same
/// key, which is what makes decryption possible. The key never leaves this
/// module and is zeroized on drop.
fn derive_key(password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, WalletError> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(
        password.as_bytes(),
        salt,
        PBKDF2_ITERATIONS,
        key.as_mut_slice(),
    )
    .map_err(|err| WalletError::Internal(format!("key derivation failed: {err}")))?;
    Ok(key)
}

/// Encrypts `plaintext` under `password` with a fresh salt and nonce.
///
/// Pure value-in, value-out: never touches storage.
///
/// # Errors
///
/// Returns [`WalletError::Internal`] if the AEAD cipher rejects the input,
/// which does not happen for valid key and nonce sizes.
pub fn encrypt(plaintext: &str, password: &str) -> Result<EncryptedBlob, WalletError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut iv = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut iv);

    let key = derive_key(password, &salt)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
    let cipher_text = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
        .map_err(|_| WalletError::Internal("AEAD encryption failed".to_string()))?;

    Ok(EncryptedBlob {
        cipher_text: BASE64.encode(cipher_text),
        salt: BASE64.encode(salt),
        iv: BASE64.encode(iv),
    })
}

/// Decrypts a blob with the supplied password.
///
/// # Errors
///
/// Returns [`WalletError::MalformedBlob`] when any field fails base64
/// decoding or has the wrong length, before any cryptographic operation.
/// Returns [`WalletError::Decryption`] on AEAD authentication failure; the
/// error does not distinguish a wrong password from corrupted data.
pub fn decrypt(blob: &EncryptedBlob, password: &str) -> Result<SecretString, WalletError> {
    let cipher_text = decode_field(&blob.cipher_text, "cipherText")?;
    let salt = decode_field(&blob.salt, "salt")?;
    let iv = decode_field(&blob.iv, "iv")?;
    if salt.len() != SALT_LEN {
        return Err(WalletError::MalformedBlob(format!(
            "salt length mismatch: expected {SALT_LEN}, got {}",
            salt.len()
        )));
    }
    if iv.len() != NONCE_LEN {
        return Err(WalletError::MalformedBlob(format!(
            "iv length mismatch: expected {NONCE_LEN}, got {}",
            iv.len()
        )));
    }

    let key = derive_key(password, &salt)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&iv), cipher_text.as_ref())
        .map_err(|_| WalletError::Decryption)?;

    // Seed material is UTF-8 by construction; anything else means the
    // ciphertext authenticated under a different encoding and is treated
    // as the same unified failure.
    let plaintext = String::from_utf8(plaintext).map_err(|_| WalletError::Decryption)?;
    Ok(SecretString::from(plaintext))
}

fn decode_field(value: &str, field: &str) -> Result<Vec<u8>, WalletError> {
    BASE64
        .decode(value)
        .map_err(|err| WalletError::MalformedBlob(format!("{field}: {err}")))
}
