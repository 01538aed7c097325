//! The keyset handle: the in-memory owner of a keyset.
//!
//! A [`KeysetHandle`] wraps exactly one [`Keyset`] and is the only way key
//! material crosses the serialization boundary. Handles are born four ways:
//!
//! - [`KeysetHandle::read`] - decrypt an externally supplied ciphertext
//! - [`KeysetHandle::generate_new`] - delegate to a [`KeyManager`]
//! - [`KeysetHandle::public_keyset_handle`] - derive a public-only keyset
//! - [`KeysetHandle::from_keyset`] - wrap a cleartext keyset the caller
//!   already trusts (managers and tests; see its security note)
//!
//! The reverse boundary crossing is [`KeysetHandle::write`], which encrypts
//! the keyset under a caller-supplied master-key AEAD before it leaves
//! memory.
//!
//! # Security
//!
//! - The handle is the sole owner of its keyset; public introspection goes
//!   through [`KeysetHandle::keyset_info`], which carries no key material
//! - Serialized plaintext is zeroized as soon as it has been encrypted or
//!   parsed
//! - The envelope always uses empty associated data: the scheme
//!   authenticates the keyset bytes only, and binding contextual metadata
//!   would be a breaking change to the wire contract
//!
//! # Example
//!
//! ```rust
//! use std::io::Cursor;
//! use sealkey::aead::XChaCha20Poly1305Aead;
//! use sealkey::handle::KeysetHandle;
//! use sealkey::io::{BinaryKeysetReader, BinaryKeysetWriter};
//! use sealkey::manager::{KeyTemplate, KeysetManager};
//!
//! let manager = KeysetManager::new();
//! let handle = KeysetHandle::generate_new(&KeyTemplate::ed25519(), &manager)
//!     .expect("generation failed");
//!
//! // Seal the keyset under a master key...
//! let aead = XChaCha20Poly1305Aead::new([0x42; 32]);
//! let mut buffer = Vec::new();
//! handle
//!     .write(Some(&mut BinaryKeysetWriter::new(&mut buffer)), &aead)
//!     .expect("write failed");
//!
//! // ...and recover it.
//! let restored = KeysetHandle::read(
//!     &mut BinaryKeysetReader::new(Cursor::new(buffer)),
//!     &aead,
//! )
//! .expect("read failed");
//! assert_eq!(restored.keyset(), handle.keyset());
//! ```

use sealkey_core::error::{DeriveError, DeriveResult, EnvelopeError, EnvelopeResult, GenerateResult};
use sealkey_core::{KeyEntry, KeyMaterialType, Keyset, KeysetInfo};
use zeroize::Zeroize;

use crate::aead::Aead;
use crate::io::{KeysetReader, KeysetWriter};
use crate::manager::{KeyManager, KeyTemplate};
use crate::registry::TypeRegistry;

/// Associated data for every envelope AEAD call.
///
/// Fixed to empty by the wire contract: ciphertexts written by one
/// implementation must decrypt under any other.
const KEYSET_ASSOCIATED_DATA: &[u8] = b"";

/// The in-memory owner of one keyset.
///
/// Immutable after construction, so `&KeysetHandle` is safe to share across
/// threads. Holds no external resources; dropping it zeroizes the key
/// material it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetHandle {
    keyset: Keyset,
}

impl KeysetHandle {
    /// Wrap a cleartext keyset in a handle.
    ///
    /// # Security
    ///
    /// This bypasses envelope protection: the caller vouches that the
    /// keyset came from somewhere trustworthy. Intended for [`KeyManager`]
    /// implementations wrapping freshly generated material and for tests;
    /// keysets read from storage or transport should come in through
    /// [`KeysetHandle::read`] instead.
    #[must_use]
    pub const fn from_keyset(keyset: Keyset) -> Self {
        Self { keyset }
    }

    /// Read and decrypt a keyset from `reader` using `master_key_aead`.
    ///
    /// The reader is consulted exactly once. The ciphertext it produces is
    /// decrypted with empty associated data, and the plaintext must decode
    /// as a keyset. No partial state survives a failure: the operation
    /// either returns a fully formed handle or an error.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::Read`] if the reader fails
    /// - [`EnvelopeError::Decrypt`] if decryption fails (wrong master key
    ///   or tampered ciphertext) — no fallback key is attempted
    /// - [`EnvelopeError::Parse`] if the plaintext is not a keyset
    pub fn read(
        reader: &mut dyn KeysetReader,
        master_key_aead: &dyn Aead,
    ) -> EnvelopeResult<Self> {
        let encrypted = reader.read_encrypted().map_err(EnvelopeError::Read)?;

        let mut plaintext = master_key_aead
            .decrypt(&encrypted.encrypted_keyset, KEYSET_ASSOCIATED_DATA)
            .map_err(|e| EnvelopeError::decrypt(e.to_string()))?;

        let keyset = Keyset::decode(&plaintext);
        plaintext.zeroize();

        Ok(Self { keyset: keyset? })
    }

    /// Encrypt the keyset under `master_key_aead` and hand it to `writer`.
    ///
    /// A missing writer is rejected before any cryptography runs. The
    /// writer is invoked exactly once, and only after encryption has
    /// succeeded, so partial writes never occur. The writer's own result is
    /// returned unchanged (wrapped with the write stage).
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::MissingWriter`] if `writer` is `None`
    /// - [`EnvelopeError::Encode`] if the keyset cannot be serialized
    /// - [`EnvelopeError::Encrypt`] if encryption fails
    /// - [`EnvelopeError::Write`] if the writer fails
    pub fn write(
        &self,
        writer: Option<&mut dyn KeysetWriter>,
        master_key_aead: &dyn Aead,
    ) -> EnvelopeResult<()> {
        let Some(writer) = writer else {
            return Err(EnvelopeError::MissingWriter);
        };

        let mut plaintext = self.keyset.encode()?;
        let encrypted = master_key_aead
            .encrypt(&plaintext, KEYSET_ASSOCIATED_DATA)
            .map_err(|e| EnvelopeError::encrypt(e.to_string()));
        plaintext.zeroize();

        let encrypted_keyset = encrypted?;
        writer
            .write(&sealkey_core::EncryptedKeyset { encrypted_keyset })
            .map_err(EnvelopeError::Write)
    }

    /// Generate a fresh keyset for `template` via `manager`.
    ///
    /// Pure delegation: the manager interprets the template, produces the
    /// keyset, and wraps the handle. Every manager failure propagates
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Whatever the manager returns for an unsupported template or a
    /// generation failure.
    pub fn generate_new(
        template: &KeyTemplate,
        manager: &dyn KeyManager,
    ) -> GenerateResult<Self> {
        manager.generate(template)
    }

    /// Derive the public-only counterpart of this keyset.
    ///
    /// Walks every entry in original order, replacing private material with
    /// public material derived through `registry`. The result keeps each
    /// entry's key id, status and output-prefix preference, and carries the
    /// original `primary_key_id` over unchanged. This handle is left
    /// untouched.
    ///
    /// All-or-nothing: a failure on any entry discards all derived work and
    /// returns the error. An empty keyset derives to an empty public
    /// keyset.
    ///
    /// # Errors
    ///
    /// - [`DeriveError::NotPrivate`] if any entry is not asymmetric-private
    ///   (symmetric and already-public entries fail the whole operation)
    /// - [`DeriveError::UnknownTypeUrl`] if the registry has no deriver for
    ///   an entry's type url
    /// - [`DeriveError::Derivation`] if a deriver rejects its material
    pub fn public_keyset_handle(&self, registry: &TypeRegistry) -> DeriveResult<Self> {
        let mut public_entries = Vec::with_capacity(self.keyset.len());
        for entry in self.keyset.entries() {
            public_entries.push(extract_public_key(entry, registry)?);
        }

        Ok(Self::from_keyset(Keyset {
            primary_key_id: self.keyset.primary_key_id,
            key: public_entries,
        }))
    }

    /// The owned keyset.
    ///
    /// # Security
    ///
    /// The returned view reaches raw key material. Prefer
    /// [`KeysetHandle::keyset_info`] anywhere the material itself is not
    /// needed.
    #[must_use]
    pub const fn keyset(&self) -> &Keyset {
        &self.keyset
    }

    /// A non-secret summary of the keyset, safe to log or display.
    #[must_use]
    pub fn keyset_info(&self) -> KeysetInfo {
        self.keyset.info()
    }

    /// The id of the primary key entry.
    #[must_use]
    pub const fn primary_key_id(&self) -> u32 {
        self.keyset.primary_key_id
    }

    /// Number of key entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyset.len()
    }

    /// Check whether the keyset has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyset.is_empty()
    }
}

/// Derive the public counterpart of one key entry.
///
/// Only asymmetric-private entries are derivable; everything else fails the
/// entry (and with it, the whole keyset derivation).
fn extract_public_key(entry: &KeyEntry, registry: &TypeRegistry) -> DeriveResult<KeyEntry> {
    if entry.key_data.key_material_type != KeyMaterialType::AsymmetricPrivate {
        return Err(DeriveError::not_private(
            entry.key_id,
            entry.key_data.key_material_type,
        ));
    }

    let key_data = registry.get_public_key_data(&entry.key_data.type_url, &entry.key_data.value)?;

    Ok(KeyEntry {
        key_id: entry.key_id,
        status: entry.status,
        output_prefix_type: entry.output_prefix_type,
        key_data,
    })
}

// ============================================================================
// Tests
// ============================================================================
