//! Coffer: the authentication token subsystem of a per-user balance API.
//!
//! Login verifies an Argon2 password hash and issues a double-layer bearer
//! token: the claim set is AES-256-GCM encrypted (inner payload) and the
//! ciphertext rides inside a signed compact JWT (outer token). Authentication
//! walks the layers back in a fixed order — outer signature, inner
//! decryption, expiry — and then resolves the principal through the user
//! directory. HTTP wiring, the balance ledger, and persistent storage live
//! elsewhere; this crate exposes the `UserDirectory` seam for them.

pub mod config;
pub mod error;
pub mod identity;
pub mod security;
pub mod token;

pub use config::Settings;
pub use error::{AuthError, AuthResult, ConfigError, RejectReason, TokenError};
pub use identity::{Authenticator, InMemoryDirectory, Principal, UserDirectory, UserRecord};
pub use token::{ClaimSet, PayloadCipher, PayloadKey, TokenCodec};
