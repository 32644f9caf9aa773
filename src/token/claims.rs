use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The set of facts a token asserts about its holder. Built fresh on every
/// issuance and never mutated afterwards; nothing is stored server-side.
/// Extra claims supplied by the caller ride along via `flatten` and survive
/// the encrypt/decrypt round trip exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClaimSet {
    /// Subject: the username the token was issued to.
    pub sub: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl ClaimSet {
    /// Build a claim set for `subject` valid for `ttl_minutes` from now.
    pub fn issue_now(subject: &str, ttl_minutes: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl_minutes * 60,
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    /// Expiry test against an explicit clock reading. `exp == now` counts as
    /// expired.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}
