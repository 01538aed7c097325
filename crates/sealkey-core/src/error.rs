//! Error types for the sealkey key-management library.
//!
//! This module provides error types for all failure modes in the sealkey
//! system, organized by domain:
//!
//! - [`EnvelopeError`] - Envelope read/write protocol failures
//! - [`AeadError`] - Master-key AEAD failures
//! - [`DeriveError`] - Public-keyset derivation failures
//! - [`GenerateError`] - Keyset generation failures
//! - [`SealkeyError`] - Top-level error that wraps all error types
//!
//! Every error names the stage that failed (read vs decrypt vs parse vs
//! encrypt vs write vs derive vs generate), so callers can tell a
//! corrupted-input condition from a wrong-key or unsupported-key-type
//! condition. No error is retryable from this layer; retry policy, if any,
//! belongs to the caller.
//!
//! # Example
//!
//! ```rust
//! use sealkey_core::error::{EnvelopeError, SealkeyError};
//!
//! fn check(ciphertext: &[u8]) -> Result<(), SealkeyError> {
//!     if ciphertext.is_empty() {
//!         return Err(EnvelopeError::decrypt("empty ciphertext").into());
//!     }
//!     Ok(())
//! }
//! ```

use crate::keyset::KeyMaterialType;

/// Top-level error type for the sealkey library.
///
/// This enum wraps all domain-specific error types and provides
/// automatic conversion via the `#[from]` attribute.
#[derive(Debug, thiserror::Error)]
pub enum SealkeyError {
    /// Envelope read/write protocol failed.
    #[error("Envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    /// Master-key AEAD operation failed.
    #[error("AEAD error: {0}")]
    Aead(#[from] AeadError),

    /// Public-keyset derivation failed.
    #[error("Derivation error: {0}")]
    Derive(#[from] DeriveError),

    /// Keyset generation failed.
    #[error("Generation error: {0}")]
    Generate(#[from] GenerateError),
}

// ============================================================================
// EnvelopeError
// ============================================================================

/// Errors that can occur while moving a keyset across the serialization
/// boundary.
///
/// The read path can fail at three distinct stages (read, decrypt, parse)
/// and the write path at three more (encode, encrypt, write). Decryption
/// failure and parse failure are deliberately distinct variants: the former
/// usually means a wrong master key or tampered ciphertext, the latter means
/// the master key was right but the plaintext is not a keyset.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The reader failed to produce an encrypted keyset.
    #[error("error reading encrypted keyset: {0}")]
    Read(#[source] std::io::Error),

    /// Decryption of the encrypted keyset failed (wrong key or tampering).
    #[error("error decrypting keyset: {context}")]
    Decrypt {
        /// The underlying decryption failure message.
        context: String,
    },

    /// The decrypted bytes do not parse as a keyset.
    #[error("decrypted data is not a valid keyset: {context}")]
    Parse {
        /// Context about what failed to parse. Never contains key material.
        context: String,
    },

    /// The keyset could not be encoded to its canonical byte form.
    #[error("error encoding keyset: {context}")]
    Encode {
        /// Context about the encoding failure.
        context: String,
    },

    /// Encryption of the serialized keyset failed.
    #[error("error encrypting keyset: {context}")]
    Encrypt {
        /// The underlying encryption failure message.
        context: String,
    },

    /// The writer failed to accept the encrypted keyset.
    #[error("error writing encrypted keyset: {0}")]
    Write(#[source] std::io::Error),

    /// No writer was supplied to the write operation.
    #[error("writer must be provided")]
    MissingWriter,
}

impl EnvelopeError {
    /// Create a `Decrypt` error with context.
    #[must_use]
    pub fn decrypt(context: impl Into<String>) -> Self {
        Self::Decrypt {
            context: context.into(),
        }
    }

    /// Create a `Parse` error with context.
    #[must_use]
    pub fn parse(context: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
        }
    }

    /// Create an `Encode` error with context.
    #[must_use]
    pub fn encode(context: impl Into<String>) -> Self {
        Self::Encode {
            context: context.into(),
        }
    }

    /// Create an `Encrypt` error with context.
    #[must_use]
    pub fn encrypt(context: impl Into<String>) -> Self {
        Self::Encrypt {
            context: context.into(),
        }
    }
}

// ============================================================================
// AeadError
// ============================================================================

/// Errors produced by an AEAD capability.
///
/// Messages are intentionally generic: a failed decryption must not reveal
/// whether the key, the nonce, or the tag was at fault.
#[derive(Debug, thiserror::Error)]
pub enum AeadError {
    /// Encryption failed.
    #[error("encryption failed")]
    EncryptionFailed,

    /// Decryption failed (wrong key, truncated input, or tampering).
    #[error("decryption failed")]
    DecryptionFailed,
}

// ============================================================================
// DeriveError
// ============================================================================

/// Errors that can occur during public-keyset derivation.
///
/// Derivation is all-or-nothing: any of these errors means no public keyset
/// was produced at all.
#[derive(Debug, thiserror::Error)]
pub enum DeriveError {
    /// A key entry does not hold asymmetric-private material.
    #[error("key {key_id} holds {material_type} material, expected asymmetric-private")]
    NotPrivate {
        /// The id of the offending key entry.
        key_id: u32,
        /// The material classification the entry actually holds.
        material_type: KeyMaterialType,
    },

    /// No deriver is registered for the entry's type url.
    #[error("no public-key deriver registered for type url: {type_url}")]
    UnknownTypeUrl {
        /// The type url that was looked up.
        type_url: String,
    },

    /// The registered deriver rejected the key material.
    #[error("public key derivation failed: {context}")]
    Derivation {
        /// Context about why derivation failed.
        context: String,
    },
}

impl DeriveError {
    /// Create a `NotPrivate` error.
    #[must_use]
    pub const fn not_private(key_id: u32, material_type: KeyMaterialType) -> Self {
        Self::NotPrivate {
            key_id,
            material_type,
        }
    }

    /// Create an `UnknownTypeUrl` error.
    #[must_use]
    pub fn unknown_type_url(type_url: impl Into<String>) -> Self {
        Self::UnknownTypeUrl {
            type_url: type_url.into(),
        }
    }

    /// Create a `Derivation` error with context.
    #[must_use]
    pub fn derivation(context: impl Into<String>) -> Self {
        Self::Derivation {
            context: context.into(),
        }
    }
}

// ============================================================================
// GenerateError
// ============================================================================

/// Errors that can occur during keyset generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// No key generator is registered for the template's type url.
    #[error("unsupported key template: {type_url}")]
    UnsupportedTemplate {
        /// The type url the template asked for.
        type_url: String,
    },

    /// The generator failed to produce key material.
    #[error("key generation failed: {context}")]
    Generation {
        /// Context about why generation failed.
        context: String,
    },
}

impl GenerateError {
    /// Create an `UnsupportedTemplate` error.
    #[must_use]
    pub fn unsupported_template(type_url: impl Into<String>) -> Self {
        Self::UnsupportedTemplate {
            type_url: type_url.into(),
        }
    }

    /// Create a `Generation` error with context.
    #[must_use]
    pub fn generation(context: impl Into<String>) -> Self {
        Self::Generation {
            context: context.into(),
        }
    }
}

// ============================================================================
// Result type aliases
// ============================================================================

/// A `Result` type alias using [`SealkeyError`] as the error type.
pub type Result<T> = std::result::Result<T, SealkeyError>;

/// A `Result` type alias for envelope read/write operations.
pub type EnvelopeResult<T> = std::result::Result<T, EnvelopeError>;

/// A `Result` type alias for AEAD operations.
pub type AeadResult<T> = std::result::Result<T, AeadError>;

/// A `Result` type alias for derivation operations.
pub type DeriveResult<T> = std::result::Result<T, DeriveError>;

/// A `Result` type alias for generation operations.
pub type GenerateResult<T> = std::result::Result<T, GenerateError>;

// ============================================================================
// Unit Tests
// ============================================================================
