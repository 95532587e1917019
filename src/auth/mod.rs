//! Password encryption.
//!
//! With the `authentication` feature, login and enable passwords can be
//! kept in encrypted form (`password 8 ...`) and `service
//! password-encryption` becomes available. Without it, only cleartext
//! passwords verify.

#![cfg_attr(not(feature = "authentication"), allow(unused_imports))]

use thiserror::Error;

// Sub-modules
#[cfg(feature = "authentication")]
pub mod password;

// Re-exports
#[cfg(feature = "authentication")]
pub use password::{Sha256Hasher, encrypt, verify};

/// Password handling failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// System random source failed while generating a salt
    #[error("no entropy available for password salt")]
    Entropy,

    /// Encryption requested in a build without the `authentication` feature
    #[error("password encryption is not supported")]
    Unsupported,
}

/// Password hasher trait (requires authentication feature).
///
/// Provides password hashing and verification with salt.
/// Must use constant-time comparison for verification.
#[cfg(feature = "authentication")]
pub trait PasswordHasher {
    /// Hash password with salt.
    fn hash(&self, password: &str, salt: &[u8]) -> [u8; 32];

    /// Verify password against hash using constant-time comparison.
    fn verify(&self, password: &str, salt: &[u8], hash: &[u8; 32]) -> bool;
}

/// Encrypt a password for storage.
#[cfg(feature = "authentication")]
pub fn encrypt_password(password: &str) -> Result<String, AuthError> {
    encrypt(password)
}

/// Encrypt a password for storage (stub version - always fails).
#[cfg(not(feature = "authentication"))]
pub fn encrypt_password(_password: &str) -> Result<String, AuthError> {
    Err(AuthError::Unsupported)
}

/// Check a typed password against an encrypted one.
#[cfg(feature = "authentication")]
pub fn verify_encrypted(password: &str, stored: &str) -> bool {
    verify(password, stored)
}

/// Check a typed password against an encrypted one (stub version - never
/// matches).
#[cfg(not(feature = "authentication"))]
pub fn verify_encrypted(_password: &str, _stored: &str) -> bool {
    false
}
