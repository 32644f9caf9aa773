//! Unified error model for the token subsystem.
//! Inner distinctions (signature vs payload vs expiry) are preserved for logs
//! and diagnostics, while `public_message` collapses everything token-related
//! to one uniform response so clients learn nothing about which layer failed.

use std::fmt::{Display, Formatter};

/// Failures raised while parsing an inbound token, one per integrity layer.
/// The layers are checked strictly in this order: outer signature, inner
/// decryption, expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Outer signature invalid: wrong signing key or algorithm, malformed or
    /// truncated compact serialization.
    BadSignature,
    /// Inner decryption failed: tampered ciphertext, or a payload key other
    /// than the one that produced it (process restart, second instance).
    BadPayload,
    /// Claims decrypted cleanly but `exp` is in the past.
    Expired,
}

impl Display for TokenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::BadSignature => write!(f, "bad_signature: outer token signature rejected"),
            TokenError::BadPayload => write!(f, "bad_payload: encrypted claim payload rejected"),
            TokenError::Expired => write!(f, "expired: token is past its expiry"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Why an `Unauthenticated` rejection happened. Logged, never sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// One of the token integrity layers failed.
    Token(TokenError),
    /// Token verified but its subject no longer exists in the user directory
    /// (account deleted after issuance).
    UnknownSubject,
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::Token(e) => write!(f, "{}", e),
            RejectReason::UnknownSubject => write!(f, "unknown_subject: no such user in directory"),
        }
    }
}

/// Top-level authentication error surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Bad username or password at login. Deliberately covers both unknown
    /// user and wrong password with a single indistinguishable variant.
    InvalidCredentials,
    /// An inbound bearer token was rejected; the reason stays server-side.
    Unauthenticated { reason: RejectReason },
    /// Registration attempted with a name that is already taken.
    UserExists,
    /// Unexpected internal failure (hashing, signing, serialization).
    Internal { message: String },
}

impl AuthError {
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        AuthError::Internal { message: msg.into() }
    }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials => 401,
            AuthError::Unauthenticated { .. } => 401,
            AuthError::UserExists => 409,
            AuthError::Internal { .. } => 500,
        }
    }

    /// Client-facing message. All token rejections collapse to one string.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "incorrect username or password",
            AuthError::Unauthenticated { .. } => "could not validate credentials",
            AuthError::UserExists => "username already registered",
            AuthError::Internal { .. } => "internal error",
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "invalid_credentials"),
            AuthError::Unauthenticated { reason } => write!(f, "unauthenticated: {}", reason),
            AuthError::UserExists => write!(f, "user_exists"),
            AuthError::Internal { message } => write!(f, "internal: {}", message),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        AuthError::Unauthenticated { reason: RejectReason::Token(e) }
    }
}

/// Startup configuration failure. Fatal: the process must not begin serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing { name: &'static str },
    Invalid { name: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing { name } => write!(f, "missing required setting {}", name),
            ConfigError::Invalid { name, reason } => {
                write!(f, "invalid setting {}: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_mapping() {
        assert_eq!(AuthError::InvalidCredentials.http_status(), 401);
        let r = AuthError::Unauthenticated { reason: RejectReason::Token(TokenError::Expired) };
        assert_eq!(r.http_status(), 401);
        assert_eq!(AuthError::UserExists.http_status(), 409);
        assert_eq!(AuthError::internal("boom").http_status(), 500);
    }

    #[test]
    fn token_rejections_share_one_public_message() {
        let sig: AuthError = TokenError::BadSignature.into();
        let pay: AuthError = TokenError::BadPayload.into();
        let exp: AuthError = TokenError::Expired.into();
        assert_eq!(sig.public_message(), pay.public_message());
        assert_eq!(pay.public_message(), exp.public_message());
        // while the logged detail still tells them apart
        assert_ne!(sig.to_string(), pay.to_string());
        assert_ne!(pay.to_string(), exp.to_string());
    }

    #[test]
    fn from_token_error_preserves_reason() {
        let e: AuthError = TokenError::BadPayload.into();
        match e {
            AuthError::Unauthenticated { reason: RejectReason::Token(TokenError::BadPayload) } => {}
            other => panic!("unexpected mapping: {:?}", other),
        }
    }
}
