//! Keyset wire records and their canonical byte encoding.
//!
//! This module defines the serializable records that cross the envelope
//! boundary:
//!
//! - [`Keyset`] - an ordered collection of key entries plus a primary-key marker
//! - [`KeyEntry`] - one key: id, status, output-prefix preference, key data
//! - [`KeyData`] - type url, opaque key material, material classification
//! - [`EncryptedKeyset`] - the opaque AEAD ciphertext of a serialized keyset
//! - [`KeysetInfo`] / [`KeyInfo`] - non-secret summaries safe to log
//!
//! The record shapes are fixed: changing them is a breaking change to every
//! stored keyset. The byte-level encoding is kept behind
//! [`Keyset::encode`] / [`Keyset::decode`] and carries a version byte so the
//! format can evolve without ambiguity.

use serde::{Deserialize, Serialize};

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::material::KeyMaterial;

/// Current keyset encoding version.
///
/// Prepended to the canonical byte encoding; bumped on any change to the
/// record shapes below.
pub const KEYSET_ENCODING_VERSION: u8 = 1;

// ============================================================================
// Enums
// ============================================================================

/// Lifecycle status of a key entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyStatus {
    /// The key may be used for all operations.
    Enabled,
    /// The key is retained but must not be used to produce new output.
    Disabled,
    /// The key material has been destroyed; only the metadata remains.
    Destroyed,
}

impl std::fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enabled => f.write_str("enabled"),
            Self::Disabled => f.write_str("disabled"),
            Self::Destroyed => f.write_str("destroyed"),
        }
    }
}

/// Classification of the key material held by an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyMaterialType {
    /// The classification could not be determined.
    Unknown,
    /// Symmetric key material.
    Symmetric,
    /// The private half of an asymmetric key pair.
    AsymmetricPrivate,
    /// The public half of an asymmetric key pair.
    AsymmetricPublic,
}

impl std::fmt::Display for KeyMaterialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::Symmetric => f.write_str("symmetric"),
            Self::AsymmetricPrivate => f.write_str("asymmetric-private"),
            Self::AsymmetricPublic => f.write_str("asymmetric-public"),
        }
    }
}

/// How a primitive's output is tagged with the id of the key that produced it.
///
/// Carried per entry so the preference survives derivation and round-trips:
/// a derived public entry keeps the prefix preference of its private
/// counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputPrefixType {
    /// No prefix; output is the bare primitive output.
    Raw,
    /// Output is prefixed with an encoding of the producing key's id.
    Prefixed,
    /// Deprecated prefix scheme retained for old keysets.
    Legacy,
}

impl std::fmt::Display for OutputPrefixType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw => f.write_str("raw"),
            Self::Prefixed => f.write_str("prefixed"),
            Self::Legacy => f.write_str("legacy"),
        }
    }
}

// ============================================================================
// Wire records
// ============================================================================

/// The typed key material of a single entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyData {
    /// Opaque identifier of the key type. Dispatch on this string is how
    /// the core stays ignorant of concrete algorithms.
    pub type_url: String,
    /// The raw key material. Zeroized on drop, redacted in debug output.
    pub value: KeyMaterial,
    /// Classification of `value`.
    pub key_material_type: KeyMaterialType,
}

/// One key entry of a keyset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    /// Identifier of this key within the keyset.
    pub key_id: u32,
    /// Lifecycle status.
    pub status: KeyStatus,
    /// Output-prefix preference, preserved across derivation.
    pub output_prefix_type: OutputPrefixType,
    /// The typed key material.
    pub key_data: KeyData,
}

/// An ordered collection of key entries plus a primary-key marker.
///
/// `primary_key_id` must reference an entry present in `key`; this core
/// preserves the invariant across its operations but does not enforce it at
/// construction beyond what parsing guarantees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyset {
    /// The id of the primary key entry.
    pub primary_key_id: u32,
    /// The key entries, in their original order.
    pub key: Vec<KeyEntry>,
}

impl Keyset {
    /// The key entries, in order.
    #[must_use]
    pub fn entries(&self) -> &[KeyEntry] {
        &self.key
    }

    /// Number of key entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.key.len()
    }

    /// Check whether the keyset has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    /// Encode the keyset to its canonical byte form.
    ///
    /// The output is `version || record bytes`. The caller owns the returned
    /// buffer and is responsible for zeroizing it once it has been encrypted.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Encode`] if serialization fails.
    pub fn encode(&self) -> EnvelopeResult<Vec<u8>> {
        let record = bincode::serialize(self).map_err(|e| EnvelopeError::encode(e.to_string()))?;
        let mut bytes = Vec::with_capacity(1 + record.len());
        bytes.push(KEYSET_ENCODING_VERSION);
        bytes.extend_from_slice(&record);
        Ok(bytes)
    }

    /// Decode a keyset from its canonical byte form.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Parse`] if the input is empty, carries an
    /// unsupported version byte, or does not decode as a keyset record.
    /// The error message never contains input bytes.
    pub fn decode(bytes: &[u8]) -> EnvelopeResult<Self> {
        let (&version, record) = bytes
            .split_first()
            .ok_or_else(|| EnvelopeError::parse("empty keyset encoding"))?;
        if version != KEYSET_ENCODING_VERSION {
            return Err(EnvelopeError::parse(format!(
                "unsupported keyset encoding version: {version}"
            )));
        }
        bincode::deserialize(record).map_err(|e| EnvelopeError::parse(e.to_string()))
    }

    /// Produce a non-secret summary of this keyset.
    #[must_use]
    pub fn info(&self) -> KeysetInfo {
        KeysetInfo {
            primary_key_id: self.primary_key_id,
            entries: self
                .key
                .iter()
                .map(|entry| KeyInfo {
                    key_id: entry.key_id,
                    status: entry.status,
                    output_prefix_type: entry.output_prefix_type,
                    type_url: entry.key_data.type_url.clone(),
                })
                .collect(),
        }
    }
}

/// The AEAD ciphertext of a serialized keyset.
///
/// Exists only at the serialization boundary; this core never persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedKeyset {
    /// The opaque ciphertext blob.
    pub encrypted_keyset: Vec<u8>,
}

// ============================================================================
// Introspection
// ============================================================================

/// Non-secret summary of a keyset, safe to log or display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeysetInfo {
    /// The id of the primary key entry.
    pub primary_key_id: u32,
    /// Per-entry summaries, in keyset order.
    pub entries: Vec<KeyInfo>,
}

/// Non-secret summary of one key entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyInfo {
    /// Identifier of the key within its keyset.
    pub key_id: u32,
    /// Lifecycle status.
    pub status: KeyStatus,
    /// Output-prefix preference.
    pub output_prefix_type: OutputPrefixType,
    /// The entry's type url.
    pub type_url: String,
}

// ============================================================================
// Tests
// ============================================================================
