//! Password hashing implementations.
//!
//! Encrypted passwords are stored as `SALTHEX$HASHHEX`, where the hash is
//! SHA-256 over the salt followed by the password. Verification uses
//! constant-time comparison.

use core::fmt::Write;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::{AuthError, PasswordHasher};

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// SHA-256 password hasher with constant-time verification.
#[derive(Debug, Copy, Clone, Default)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    /// Create a new SHA-256 hasher.
    pub const fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, password: &str, salt: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());

        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }

    fn verify(&self, password: &str, salt: &[u8], hash: &[u8; 32]) -> bool {
        self.hash(password, salt).ct_eq(hash).into()
    }
}

/// Encrypt `password` with a fresh random salt.
///
/// # Returns
///
/// The stored form, `SALTHEX$HASHHEX`, or `AuthError::Entropy` when the
/// system random source fails.
pub fn encrypt(password: &str) -> Result<String, AuthError> {
    let mut salt = [0u8; SALT_LEN];
    getrandom::fill(&mut salt).map_err(|_| AuthError::Entropy)?;
    Ok(encrypt_with_salt(password, &salt))
}

/// Encrypt `password` with a caller-supplied salt.
pub fn encrypt_with_salt(password: &str, salt: &[u8]) -> String {
    let hash = Sha256Hasher::new().hash(password, salt);
    let mut out = String::with_capacity(salt.len() * 2 + 1 + hash.len() * 2);
    push_hex(&mut out, salt);
    out.push('$');
    push_hex(&mut out, &hash);
    out
}

/// Check `password` against a stored `SALTHEX$HASHHEX` string.
///
/// Malformed stored strings never verify.
pub fn verify(password: &str, stored: &str) -> bool {
    let Some((salt_hex, hash_hex)) = stored.split_once('$') else {
        return false;
    };
    let (Some(salt), Some(hash)) = (decode_hex(salt_hex), decode_hex(hash_hex)) else {
        return false;
    };
    let Ok(hash) = <[u8; 32]>::try_from(hash.as_slice()) else {
        return false;
    };
    Sha256Hasher::new().verify(password, &salt, &hash)
}

fn push_hex(out: &mut String, bytes: &[u8]) {
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.is_empty() || s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
        .collect()
}
