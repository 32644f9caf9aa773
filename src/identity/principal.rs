use serde::{Deserialize, Serialize};

/// The authenticated user, resolved from a verified token. Only produced
/// after both token layers, the expiry check, and the directory lookup have
/// all passed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
}

impl Principal {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}
