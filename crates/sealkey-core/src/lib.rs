//! # sealkey-core
//!
//! Core keyset types and error definitions for the sealkey key-management
//! library.
//!
//! This crate provides the foundational records shared across all sealkey
//! crates:
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`keyset`] - Keyset wire records and their canonical byte encoding
//! - [`material`] - The zeroize-on-drop [`KeyMaterial`] buffer
//!
//! ## Error Handling
//!
//! Every failure carries the stage it happened at, so callers can tell a
//! corrupted input from a wrong master key from an unsupported key type:
//!
//! ```rust
//! use sealkey_core::error::{EnvelopeError, SealkeyError};
//!
//! let err: SealkeyError = EnvelopeError::decrypt("decryption failed").into();
//! assert_eq!(
//!     err.to_string(),
//!     "Envelope error: error decrypting keyset: decryption failed"
//! );
//! ```
//!
//! ## Core Types
//!
//! ```rust
//! use sealkey_core::{KeyData, KeyEntry, KeyMaterial, KeyMaterialType, KeyStatus,
//!     Keyset, OutputPrefixType};
//!
//! let keyset = Keyset {
//!     primary_key_id: 7,
//!     key: vec![KeyEntry {
//!         key_id: 7,
//!         status: KeyStatus::Enabled,
//!         output_prefix_type: OutputPrefixType::Prefixed,
//!         key_data: KeyData {
//!             type_url: "example/demo-key".to_string(),
//!             value: KeyMaterial::new(vec![0u8; 32]),
//!             key_material_type: KeyMaterialType::Symmetric,
//!         },
//!     }],
//! };
//!
//! // The canonical encoding round-trips.
//! let bytes = keyset.encode().expect("encodable");
//! assert_eq!(Keyset::decode(&bytes).expect("decodable"), keyset);
//!
//! // Introspection never exposes key material.
//! assert_eq!(keyset.info().primary_key_id, 7);
//! ```
//!
//! ## Security
//!
//! - Key material is zeroized on drop and redacted in debug output
//! - Key material comparisons run in constant time
//! - No unsafe code allowed

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keyset;
pub mod material;

// Re-export commonly used types
pub use error::{
    AeadError, DeriveError, EnvelopeError, GenerateError, Result, SealkeyError,
};
pub use keyset::{
    EncryptedKeyset, KeyData, KeyEntry, KeyInfo, KeyMaterialType, KeyStatus, Keyset, KeysetInfo,
    OutputPrefixType, KEYSET_ENCODING_VERSION,
};
pub use material::KeyMaterial;
