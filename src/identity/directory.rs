//! User directory: the storage seam the authenticator talks through. Plain
//! repository interface so the token subsystem never touches a concrete
//! persistence technology; `InMemoryDirectory` backs tests and
//! single-process deployments.

use std::collections::HashMap;

use anyhow::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Stored user row. The plaintext password never appears here, only the PHC
/// hash produced by `security::hash_password`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub name: String,
    pub password_hash: String,
}

pub trait UserDirectory: Send + Sync {
    /// Look up a user by exact name.
    fn find_by_name(&self, name: &str) -> Result<Option<UserRecord>>;

    /// Insert a new user. Returns `false` (without writing) when the name is
    /// already taken.
    fn insert(&self, user: UserRecord) -> Result<bool>;

    /// Replace an existing user's record. Returns `false` when the name is
    /// unknown.
    fn update(&self, user: UserRecord) -> Result<bool>;
}

#[derive(Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserDirectory for InMemoryDirectory {
    fn find_by_name(&self, name: &str) -> Result<Option<UserRecord>> {
        Ok(self.users.read().get(name).cloned())
    }

    fn insert(&self, user: UserRecord) -> Result<bool> {
        let mut m = self.users.write();
        if m.contains_key(&user.name) {
            return Ok(false);
        }
        m.insert(user.name.clone(), user);
        Ok(true)
    }

    fn update(&self, user: UserRecord) -> Result<bool> {
        let mut m = self.users.write();
        match m.get_mut(&user.name) {
            Some(slot) => {
                *slot = user;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
