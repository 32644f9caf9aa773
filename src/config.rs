//! Startup configuration, read once from environment variables. A missing or
//! invalid value is a fatal `ConfigError`; nothing here is retried or
//! defaulted at request time.
//!
//! `COFFER_PAYLOAD_KEY` is the persisted inner-payload key (base64, 32
//! bytes). When unset the process generates a fresh key and runs in ephemeral
//! single-instance mode: every outstanding token dies with the process, and a
//! second instance cannot read tokens issued by the first. That mode is an
//! explicit choice and is logged loudly at startup.

use jsonwebtoken::Algorithm;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::token::PayloadKey;

pub const ENV_JWT_SECRET: &str = "COFFER_JWT_SECRET";
pub const ENV_JWT_ALGORITHM: &str = "COFFER_JWT_ALGORITHM";
pub const ENV_TOKEN_TTL_MINUTES: &str = "COFFER_TOKEN_TTL_MINUTES";
pub const ENV_PAYLOAD_KEY: &str = "COFFER_PAYLOAD_KEY";

const DEFAULT_ALGORITHM: &str = "HS256";
const DEFAULT_TTL_MINUTES: i64 = 60;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Secret for the outer signature. Stable across restarts.
    pub jwt_secret: String,
    /// Outer signature algorithm. HMAC family only.
    pub jwt_algorithm: Algorithm,
    /// Token lifetime in minutes.
    pub token_ttl_minutes: i64,
    /// Inner-payload key, persisted or freshly generated.
    pub payload_key: PayloadKey,
    /// False when `payload_key` was generated at startup rather than loaded.
    pub payload_key_persisted: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any name→value source. `from_env` is this over
    /// `std::env::var`; tests pass closures.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = match get(ENV_JWT_SECRET) {
            Some(s) if !s.is_empty() => s,
            Some(_) => {
                return Err(ConfigError::Invalid {
                    name: ENV_JWT_SECRET,
                    reason: "must not be empty".into(),
                })
            }
            None => return Err(ConfigError::Missing { name: ENV_JWT_SECRET }),
        };

        let alg_name = get(ENV_JWT_ALGORITHM).unwrap_or_else(|| DEFAULT_ALGORITHM.to_string());
        let jwt_algorithm = parse_hmac_algorithm(&alg_name)?;

        let token_ttl_minutes = match get(ENV_TOKEN_TTL_MINUTES) {
            None => DEFAULT_TTL_MINUTES,
            Some(raw) => raw.trim().parse::<i64>().ok().filter(|m| *m >= 0).ok_or_else(|| {
                ConfigError::Invalid {
                    name: ENV_TOKEN_TTL_MINUTES,
                    reason: format!("expected a non-negative integer, got '{}'", raw),
                }
            })?,
        };

        let (payload_key, payload_key_persisted) = match get(ENV_PAYLOAD_KEY) {
            Some(b64) => {
                let key = PayloadKey::from_base64(&b64).map_err(|e| ConfigError::Invalid {
                    name: ENV_PAYLOAD_KEY,
                    reason: e.to_string(),
                })?;
                (key, true)
            }
            None => {
                let key = PayloadKey::generate().map_err(|e| ConfigError::Invalid {
                    name: ENV_PAYLOAD_KEY,
                    reason: format!("failed to generate ephemeral key: {}", e),
                })?;
                warn!(
                    target: "coffer",
                    "{} is unset: generated an ephemeral payload key; all issued tokens \
                     will be rejected after a restart and by any other instance",
                    ENV_PAYLOAD_KEY
                );
                (key, false)
            }
        };

        info!(
            target: "coffer",
            "settings loaded: algorithm={:?}, ttl_minutes={}, payload_key_persisted={}",
            jwt_algorithm, token_ttl_minutes, payload_key_persisted
        );

        Ok(Settings {
            jwt_secret,
            jwt_algorithm,
            token_ttl_minutes,
            payload_key,
            payload_key_persisted,
        })
    }
}

fn parse_hmac_algorithm(name: &str) -> Result<Algorithm, ConfigError> {
    match name.trim() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(ConfigError::Invalid {
            name: ENV_JWT_ALGORITHM,
            reason: format!("unsupported algorithm '{}', expected HS256/HS384/HS512", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name| map.get(name).map(|v| v.to_string())
    }

    #[test]
    fn minimal_settings_use_defaults() {
        let s = Settings::from_lookup(lookup(&[(ENV_JWT_SECRET, "s3cret")])).unwrap();
        assert_eq!(s.jwt_algorithm, Algorithm::HS256);
        assert_eq!(s.token_ttl_minutes, 60);
        assert!(!s.payload_key_persisted);
    }

    #[test]
    fn missing_secret_is_fatal() {
        let err = Settings::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing { name: ENV_JWT_SECRET });
        let err = Settings::from_lookup(lookup(&[(ENV_JWT_SECRET, "")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name, .. } if name == ENV_JWT_SECRET));
    }

    #[test]
    fn bad_algorithm_and_ttl_are_fatal() {
        let err = Settings::from_lookup(lookup(&[
            (ENV_JWT_SECRET, "s"),
            (ENV_JWT_ALGORITHM, "RS256"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name, .. } if name == ENV_JWT_ALGORITHM));

        let err = Settings::from_lookup(lookup(&[
            (ENV_JWT_SECRET, "s"),
            (ENV_TOKEN_TTL_MINUTES, "sixty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name, .. } if name == ENV_TOKEN_TTL_MINUTES));

        let err = Settings::from_lookup(lookup(&[
            (ENV_JWT_SECRET, "s"),
            (ENV_TOKEN_TTL_MINUTES, "-5"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name, .. } if name == ENV_TOKEN_TTL_MINUTES));
    }

    #[test]
    fn persisted_payload_key_round_trips() {
        let key = PayloadKey::generate().unwrap();
        let b64 = key.to_base64();
        let s = Settings::from_lookup(lookup(&[
            (ENV_JWT_SECRET, "s"),
            (ENV_PAYLOAD_KEY, b64.as_str()),
        ]))
        .unwrap();
        assert!(s.payload_key_persisted);
        assert_eq!(s.payload_key, key);

        let err = Settings::from_lookup(lookup(&[
            (ENV_JWT_SECRET, "s"),
            (ENV_PAYLOAD_KEY, "dG9vLXNob3J0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name, .. } if name == ENV_PAYLOAD_KEY));
    }
}
