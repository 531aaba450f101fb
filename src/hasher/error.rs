//! Error types for the hash provider.

use thiserror::Error;

/// Errors raised while producing random material.
#[derive(Debug, Error)]
pub enum Error {
    /// The operating system random source could not be read.
    #[error("Random source unavailable: {0}")]
    RandomSource(#[from] rand::Error),
}
