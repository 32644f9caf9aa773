//! Authenticated encryption of the serialized claim set (AES-256-GCM).
//! Wire shape: 12-byte random nonce followed by ciphertext+tag. Any bit flip,
//! truncation, or wrong key fails closed as `TokenError::BadPayload`; no
//! partial plaintext is ever returned.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

use crate::error::TokenError;
use crate::token::ClaimSet;

const NONCE_LEN: usize = 12;

/// Process-wide symmetric key for the inner payload. Loaded once at startup,
/// read-only afterwards; concurrent use needs no synchronization.
#[derive(Clone, PartialEq, Eq)]
pub struct PayloadKey([u8; 32]);

impl PayloadKey {
    /// Fresh random key. Tokens encrypted under it are only readable by this
    /// process instance and die with it.
    pub fn generate() -> Result<Self> {
        let mut buf = [0u8; 32];
        getrandom::getrandom(&mut buf).map_err(|e| anyhow!(e.to_string()))?;
        Ok(Self(buf))
    }

    /// Parse a persisted key: base64 of exactly 32 bytes.
    pub fn from_base64(s: &str) -> Result<Self> {
        let raw = B64.decode(s.trim()).map_err(|e| anyhow!("payload key is not base64: {}", e))?;
        let buf: [u8; 32] = raw
            .try_into()
            .map_err(|v: Vec<u8>| anyhow!("payload key must be 32 bytes, got {}", v.len()))?;
        Ok(Self(buf))
    }

    pub fn to_base64(&self) -> String {
        B64.encode(self.0)
    }
}

// Key bytes stay out of Debug output and logs.
impl std::fmt::Debug for PayloadKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PayloadKey(..)")
    }
}

pub struct PayloadCipher {
    aead: Aes256Gcm,
}

impl PayloadCipher {
    pub fn new(key: &PayloadKey) -> Self {
        let aead = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));
        Self { aead }
    }

    /// Serialize and encrypt a claim set. Output is nonce || ciphertext.
    pub fn encrypt(&self, claims: &ClaimSet) -> Result<Vec<u8>> {
        let plain = serde_json::to_vec(claims)?;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        getrandom::getrandom(&mut nonce_bytes).map_err(|e| anyhow!(e.to_string()))?;
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ct = self
            .aead
            .encrypt(nonce, plain.as_ref())
            .map_err(|_| anyhow!("aead encryption failed"))?;
        let mut out = Vec::with_capacity(NONCE_LEN + ct.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ct);
        Ok(out)
    }

    /// Decrypt and deserialize. Every failure mode collapses to `BadPayload`:
    /// the caller learns that the inner layer rejected, nothing more.
    pub fn decrypt(&self, payload: &[u8]) -> Result<ClaimSet, TokenError> {
        if payload.len() <= NONCE_LEN {
            return Err(TokenError::BadPayload);
        }
        let (nonce_bytes, ct) = payload.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);
        let plain = self.aead.decrypt(nonce, ct).map_err(|_| TokenError::BadPayload)?;
        serde_json::from_slice(&plain).map_err(|_| TokenError::BadPayload)
    }
}
