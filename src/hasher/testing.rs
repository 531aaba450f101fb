//! Hasher doubles shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::hasher::{Error, Hasher, Sha512Hasher};

/// Real digests, predictable tokens (`t0`, `t1`, ...), and a call counter.
#[derive(Default)]
pub struct CountingHasher {
    calls: AtomicUsize,
}

impl CountingHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Hasher for CountingHasher {
    fn digest(&self, secret: &str, salt: &str) -> String {
        Sha512Hasher.digest(secret, salt)
    }

    fn random_token(&self, length: usize) -> Result<String, Error> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if length == 0 {
            return Ok(String::new());
        }
        Ok(format!("t{n}"))
    }
}

/// A hasher whose random source is always broken.
pub struct FailingHasher;

impl Hasher for FailingHasher {
    fn digest(&self, secret: &str, salt: &str) -> String {
        Sha512Hasher.digest(secret, salt)
    }

    fn random_token(&self, _length: usize) -> Result<String, Error> {
        Err(Error::RandomSource(rand::Error::new(std::io::Error::new(
            std::io::ErrorKind::Other,
            "entropy pool closed",
        ))))
    }
}
