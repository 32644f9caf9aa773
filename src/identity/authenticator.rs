//! Session authenticator: verify password → issue token, and verify token →
//! resolve principal. Stateless per request; nothing survives a call except
//! the directory contents.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{AuthError, AuthResult, RejectReason};
use crate::identity::{Principal, UserDirectory, UserRecord};
use crate::security;
use crate::token::{ClaimSet, TokenCodec};

pub struct Authenticator {
    directory: Arc<dyn UserDirectory>,
    codec: TokenCodec,
    ttl_minutes: i64,
    // Hash of no real password. Unknown users still pay one verification so
    // login latency does not reveal whether a name exists.
    decoy_hash: String,
}

impl Authenticator {
    pub fn new(settings: &Settings, directory: Arc<dyn UserDirectory>) -> AuthResult<Self> {
        let codec =
            TokenCodec::new(&settings.jwt_secret, settings.jwt_algorithm, &settings.payload_key);
        let decoy_hash = security::hash_password("decoy")
            .map_err(|e| AuthError::internal(format!("decoy hash setup failed: {}", e)))?;
        Ok(Self { directory, codec, ttl_minutes: settings.token_ttl_minutes, decoy_hash })
    }

    /// Verify a name/password pair and issue a bearer token. Unknown name and
    /// wrong password are indistinguishable to the caller.
    pub fn login(&self, name: &str, password: &str) -> AuthResult<String> {
        let user = self
            .directory
            .find_by_name(name)
            .map_err(|e| AuthError::internal(format!("directory lookup failed: {}", e)))?;
        let ok = match &user {
            Some(u) => security::verify_password(&u.password_hash, password),
            None => {
                let _ = security::verify_password(&self.decoy_hash, password);
                false
            }
        };
        if !ok {
            warn!(target: "coffer", "login rejected for '{}'", name);
            return Err(AuthError::InvalidCredentials);
        }
        let token = self.issue_for(name)?;
        info!(target: "coffer", "login ok user={}", name);
        Ok(token)
    }

    /// Resolve the principal behind a bearer token. The directory lookup is
    /// mandatory: a stateless token outlives account deletion, and this is
    /// the only place that catches it.
    pub fn authenticate(&self, token: &str) -> AuthResult<Principal> {
        let claims = self.codec.parse(token).map_err(|e| {
            warn!(target: "coffer", "token rejected: {}", e);
            AuthError::from(e)
        })?;
        let user = self
            .directory
            .find_by_name(&claims.sub)
            .map_err(|e| AuthError::internal(format!("directory lookup failed: {}", e)))?;
        match user {
            Some(u) => Ok(Principal::new(u.name)),
            None => {
                warn!(target: "coffer", "token subject '{}' no longer exists", claims.sub);
                Err(AuthError::Unauthenticated { reason: RejectReason::UnknownSubject })
            }
        }
    }

    /// Create a user and log them straight in, returning their first token.
    pub fn register(&self, name: &str, password: &str) -> AuthResult<String> {
        let password_hash = security::hash_password(password)
            .map_err(|e| AuthError::internal(format!("password hashing failed: {}", e)))?;
        let inserted = self
            .directory
            .insert(UserRecord { name: name.to_string(), password_hash })
            .map_err(|e| AuthError::internal(format!("directory insert failed: {}", e)))?;
        if !inserted {
            return Err(AuthError::UserExists);
        }
        info!(target: "coffer", "registered user={}", name);
        self.issue_for(name)
    }

    /// Re-hash under a new password after verifying the old one. Unknown name
    /// and wrong old password are indistinguishable, as at login.
    pub fn change_password(&self, name: &str, old: &str, new: &str) -> AuthResult<()> {
        let user = self
            .directory
            .find_by_name(name)
            .map_err(|e| AuthError::internal(format!("directory lookup failed: {}", e)))?;
        let ok = match &user {
            Some(u) => security::verify_password(&u.password_hash, old),
            None => {
                let _ = security::verify_password(&self.decoy_hash, old);
                false
            }
        };
        if !ok {
            return Err(AuthError::InvalidCredentials);
        }
        let password_hash = security::hash_password(new)
            .map_err(|e| AuthError::internal(format!("password hashing failed: {}", e)))?;
        let updated = self
            .directory
            .update(UserRecord { name: name.to_string(), password_hash })
            .map_err(|e| AuthError::internal(format!("directory update failed: {}", e)))?;
        if !updated {
            // Deleted between lookup and update; report as the same rejection.
            return Err(AuthError::InvalidCredentials);
        }
        info!(target: "coffer", "password changed user={}", name);
        Ok(())
    }

    fn issue_for(&self, name: &str) -> AuthResult<String> {
        let claims = ClaimSet::issue_now(name, self.ttl_minutes);
        self.codec.issue(&claims)
    }
}
