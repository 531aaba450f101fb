use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha512};

use crate::hasher::{Error, Hasher};

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

// Largest multiple of the alphabet size that fits in a byte; anything above
// is rejected so every character is equally likely.
const ACCEPT_BELOW: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// SHA-512 digests encoded as standard base64, tokens drawn from the OS RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha512Hasher;

impl Sha512Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl Hasher for Sha512Hasher {
    fn digest(&self, secret: &str, salt: &str) -> String {
        let mut hasher = Sha512::new();
        hasher.update(secret.as_bytes());
        hasher.update(salt.as_bytes());
        STANDARD.encode(hasher.finalize())
    }

    fn random_token(&self, length: usize) -> Result<String, Error> {
        let mut token = String::with_capacity(length);
        let mut buf = [0u8; 64];
        while token.len() < length {
            OsRng.try_fill_bytes(&mut buf)?;
            for &byte in buf.iter().filter(|&&b| b < ACCEPT_BELOW) {
                if token.len() == length {
                    break;
                }
                token.push(ALPHABET[(byte as usize) % ALPHABET.len()] as char);
            }
        }
        Ok(token)
    }
}
