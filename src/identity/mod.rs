//! Principal resolution and session login for the balance API. Keep the
//! public surface thin and split implementation across sub-modules.

mod authenticator;
mod directory;
mod principal;

pub use authenticator::Authenticator;
pub use directory::{InMemoryDirectory, UserDirectory, UserRecord};
pub use principal::Principal;
