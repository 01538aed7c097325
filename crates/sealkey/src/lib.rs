//! # sealkey
//!
//! Envelope-encrypted keyset management.
//!
//! A keyset is an ordered collection of versioned keys with one designated
//! primary. This crate manages the keyset *lifecycle* - generation, sealed
//! storage, and public-counterpart derivation - without implementing any
//! end-use cryptography itself. Signing, verification, and data encryption
//! live with the callers that consume the key material.
//!
//! ## Modules
//!
//! - [`handle`] - The [`KeysetHandle`], owner of a keyset in memory
//! - [`aead`] - The master-key [`Aead`](aead::Aead) capability and the
//!   bundled XChaCha20-Poly1305 implementation
//! - [`io`] - Reader/writer seams for encrypted keysets, plus binary
//!   framing over `std::io` streams
//! - [`manager`] - Keyset generation from templates
//! - [`registry`] - Public-key derivation, keyed by type url
//!
//! Wire records, errors, and the zeroizing key-material buffer live in
//! [`sealkey_core`] and are re-exported here.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::io::Cursor;
//! use sealkey::{
//!     BinaryKeysetReader, BinaryKeysetWriter, KeyTemplate, KeysetHandle,
//!     KeysetManager, TypeRegistry, XChaCha20Poly1305Aead,
//! };
//!
//! // Generate a fresh signing keyset.
//! let manager = KeysetManager::new();
//! let handle = KeysetHandle::generate_new(&KeyTemplate::ed25519(), &manager)
//!     .expect("generation failed");
//!
//! // Seal it under a master key.
//! let master_key_aead = XChaCha20Poly1305Aead::new([0x42; 32]);
//! let mut sealed = Vec::new();
//! handle
//!     .write(Some(&mut BinaryKeysetWriter::new(&mut sealed)), &master_key_aead)
//!     .expect("write failed");
//!
//! // Recover it later.
//! let restored = KeysetHandle::read(
//!     &mut BinaryKeysetReader::new(Cursor::new(sealed)),
//!     &master_key_aead,
//! )
//! .expect("read failed");
//!
//! // Derive the shareable public counterpart.
//! let public = restored
//!     .public_keyset_handle(&TypeRegistry::new())
//!     .expect("derivation failed");
//! assert_eq!(public.primary_key_id(), handle.primary_key_id());
//! ```
//!
//! ## Security
//!
//! - Keysets cross the serialization boundary only as AEAD ciphertext
//! - Key material is zeroized on drop and redacted in debug output
//! - No unsafe code allowed

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod aead;
pub mod handle;
pub mod io;
pub mod manager;
pub mod registry;

// Re-export commonly used types
pub use aead::{Aead, XChaCha20Poly1305Aead, MASTER_KEY_LEN};
pub use handle::KeysetHandle;
pub use io::{BinaryKeysetReader, BinaryKeysetWriter, KeysetReader, KeysetWriter};
pub use manager::{Ed25519KeyGenerator, KeyGenerator, KeyManager, KeyTemplate, KeysetManager};
pub use registry::{
    Ed25519Deriver, PublicKeyDeriver, TypeRegistry, ED25519_PRIVATE_KEY_TYPE_URL,
    ED25519_PUBLIC_KEY_TYPE_URL,
};
pub use sealkey_core::{
    AeadError, DeriveError, EncryptedKeyset, EnvelopeError, GenerateError, KeyData, KeyEntry,
    KeyInfo, KeyMaterial, KeyMaterialType, KeyStatus, Keyset, KeysetInfo, OutputPrefixType,
    Result, SealkeyError,
};
