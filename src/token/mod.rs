//! Double-layer token construction: an AEAD-encrypted claim set (inner
//! payload) wrapped in a signed compact JWT (outer token). Keep the public
//! surface thin and split implementation across sub-modules.

mod claims;
mod cipher;
mod codec;

pub use claims::ClaimSet;
pub use cipher::{PayloadCipher, PayloadKey};
pub use codec::TokenCodec;
