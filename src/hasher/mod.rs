//! Salted password hashing and random token generation.
//!
//! The router and the deferred store only see the [`Hasher`] trait; the
//! SHA-512 implementation lives in [`Sha512Hasher`].

mod error;
mod sha512;

#[cfg(test)]
pub(crate) mod testing;

pub use error::Error;
pub use sha512::Sha512Hasher;

/// The hashing capability the service depends on.
pub trait Hasher: Send + Sync {
    /// Deterministic digest of `secret` followed by `salt`.
    fn digest(&self, secret: &str, salt: &str) -> String;

    /// A cryptographically random string of exactly `length` characters.
    fn random_token(&self, length: usize) -> Result<String, Error>;
}
