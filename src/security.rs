//! Password hashing and verification (Argon2id, PHC string format).
//! Each hash call draws a fresh random salt, so hashing the same password
//! twice yields different strings that both verify. Verification is a pure
//! function of (plaintext, stored hash); a malformed stored hash is logged
//! and treated as a mismatch, never a panic.

use anyhow::{anyhow, Result};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use tracing::warn;

pub fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!(e.to_string()))?
        .to_string();
    Ok(phc)
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => {
            let argon2 = Argon2::default();
            argon2.verify_password(password.as_bytes(), &parsed).is_ok()
        }
        Err(e) => {
            warn!(target: "coffer", "stored password hash is malformed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let phc = hash_password("pw1").expect("hash");
        assert!(verify_password(&phc, "pw1"));
        assert!(!verify_password(&phc, "pw2"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("secret").expect("hash");
        let b = hash_password("secret").expect("hash");
        assert_ne!(a, b);
        assert!(verify_password(&a, "secret"));
        assert!(verify_password(&b, "secret"));
    }

    #[test]
    fn malformed_hash_fails_closed() {
        assert!(!verify_password("not-a-phc-string", "anything"));
        assert!(!verify_password("", "anything"));
    }
}
