//! Outer token codec: compact signed JWT (three dot-separated base64url
//! segments) whose JSON payload carries a single field, `encrypted_data`,
//! holding the base64 of the AEAD-encrypted claim set.
//!
//! `parse` walks the integrity layers in a fixed order, and each layer fails
//! with its own `TokenError` variant: outer signature first (`BadSignature`),
//! then inner decryption (`BadPayload`), then expiry (`Expired`). The outer
//! signature covers the whole structure, so a tampered inner payload is
//! normally caught at the signature check; a forged-but-signed payload still
//! dies at decryption.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuthError, AuthResult, TokenError};
use crate::token::{ClaimSet, PayloadCipher, PayloadKey};

/// Publicly visible shape of the signed payload segment. Everything about the
/// session lives inside `encrypted_data`; the outer JSON is deliberately
/// opaque.
#[derive(Debug, Serialize, Deserialize)]
struct OuterClaims {
    encrypted_data: String,
}

pub struct TokenCodec {
    cipher: PayloadCipher,
    encoding: EncodingKey,
    decoding: DecodingKey,
    header: Header,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(signing_secret: &str, algorithm: Algorithm, payload_key: &PayloadKey) -> Self {
        // Expiry is enforced on the decrypted inner claims, not by the JWT
        // library: the outer payload carries no `exp` at all.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();
        Self {
            cipher: PayloadCipher::new(payload_key),
            encoding: EncodingKey::from_secret(signing_secret.as_bytes()),
            decoding: DecodingKey::from_secret(signing_secret.as_bytes()),
            header: Header::new(algorithm),
            validation,
        }
    }

    /// Encrypt the claim set, wrap it, sign it. Returns the compact string.
    pub fn issue(&self, claims: &ClaimSet) -> AuthResult<String> {
        let payload = self
            .cipher
            .encrypt(claims)
            .map_err(|e| AuthError::internal(format!("claim encryption failed: {}", e)))?;
        let outer = OuterClaims { encrypted_data: B64.encode(payload) };
        encode(&self.header, &outer, &self.encoding)
            .map_err(|e| AuthError::internal(format!("token signing failed: {}", e)))
    }

    /// Verify and unwrap an inbound token against the current clock.
    pub fn parse(&self, token: &str) -> Result<ClaimSet, TokenError> {
        self.parse_at(token, Utc::now().timestamp())
    }

    /// Like `parse`, with expiry evaluated against the supplied timestamp.
    pub fn parse_at(&self, token: &str, now: i64) -> Result<ClaimSet, TokenError> {
        let outer = decode::<OuterClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                debug!(target: "coffer", "outer signature rejected: {}", e);
                TokenError::BadSignature
            })?
            .claims;
        let payload = B64
            .decode(outer.encrypted_data.as_bytes())
            .map_err(|_| TokenError::BadPayload)?;
        let claims = self.cipher.decrypt(&payload)?;
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}
