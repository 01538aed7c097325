//! Opaque key-material bytes with secure memory handling.
//!
//! This module provides [`KeyMaterial`], the owned buffer type that carries
//! raw key bytes inside a keyset. The buffer is:
//! - Zeroized on drop to prevent secrets lingering in memory
//! - Never exposed in debug output
//! - Compared in constant time to prevent timing attacks
//!
//! # Security
//!
//! Unlike a fixed 32-byte secret key, keyset entries carry material of
//! arbitrary, algorithm-defined length, so `KeyMaterial` wraps a `Vec<u8>`.
//! It implements `Clone` because a keyset must be clonable as a whole (e.g.
//! as the input to public-keyset derivation); every clone keeps the
//! zeroize-on-drop guarantee.

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An owned byte buffer holding opaque key material.
///
/// # Security
///
/// The bytes are securely erased from memory when the value is dropped,
/// and never appear in debug output.
///
/// # Example
///
/// ```
/// use sealkey_core::KeyMaterial;
///
/// let material = KeyMaterial::new(vec![0x42; 32]);
/// assert_eq!(material.len(), 32);
/// assert_eq!(format!("{material:?}"), "KeyMaterial([REDACTED])");
/// ```
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    /// Create key material from raw bytes.
    ///
    /// The input vector is taken over; the caller holds no further copy.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Expose the raw bytes for cryptographic operations.
    ///
    /// # Security
    ///
    /// The returned reference must not be stored or copied beyond the
    /// immediate cryptographic operation.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the length of the key material in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Prevent accidental debug printing of secrets
impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial([REDACTED])")
    }
}

// Constant-time equality comparison to prevent timing attacks
impl PartialEq for KeyMaterial {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for KeyMaterial {}

impl From<Vec<u8>> for KeyMaterial {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for KeyMaterial {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}
