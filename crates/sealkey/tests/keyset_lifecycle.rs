//! End-to-end tests for the keyset lifecycle.
//!
//! This suite exercises the full surface as a caller would:
//! - Generate, seal, recover, derive - all through public APIs
//! - Cross-key and corruption failure paths
//! - Custom trait implementations plugged into every seam

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use sealkey::{
    Aead, BinaryKeysetReader, BinaryKeysetWriter, DeriveError, EncryptedKeyset, EnvelopeError,
    KeyData, KeyEntry, KeyManager, KeyMaterial, KeyMaterialType, KeyStatus, KeyTemplate,
    Keyset, KeysetHandle, KeysetManager, KeysetReader, KeysetWriter, OutputPrefixType,
    PublicKeyDeriver, SealkeyError, TypeRegistry, XChaCha20Poly1305Aead,
    ED25519_PRIVATE_KEY_TYPE_URL, ED25519_PUBLIC_KEY_TYPE_URL,
};
use sealkey_core::error::{AeadResult, DeriveResult};

// ============================================================================
// Fixtures
// ============================================================================

fn master_aead() -> XChaCha20Poly1305Aead {
    XChaCha20Poly1305Aead::new([0x42; 32])
}

fn seal(handle: &KeysetHandle, aead: &dyn Aead) -> Vec<u8> {
    let mut buffer = Vec::new();
    handle
        .write(Some(&mut BinaryKeysetWriter::new(&mut buffer)), aead)
        .expect("write should succeed");
    buffer
}

fn unseal(bytes: Vec<u8>, aead: &dyn Aead) -> Result<KeysetHandle, EnvelopeError> {
    KeysetHandle::read(&mut BinaryKeysetReader::new(Cursor::new(bytes)), aead)
}

// ============================================================================
// Full Lifecycle Tests
// ============================================================================

#[test]
fn test_generate_seal_recover_derive() {
    let manager = KeysetManager::new();
    let handle = KeysetHandle::generate_new(&KeyTemplate::ed25519(), &manager)
        .expect("generation should succeed");

    let aead = master_aead();
    let sealed = seal(&handle, &aead);
    let restored = unseal(sealed, &aead).expect("recovery should succeed");
    assert_eq!(restored.keyset(), handle.keyset());

    let public = restored
        .public_keyset_handle(&TypeRegistry::new())
        .expect("derivation should succeed");

    assert_eq!(public.len(), 1);
    assert_eq!(public.primary_key_id(), handle.primary_key_id());
    let entry = &public.keyset().entries()[0];
    assert_eq!(entry.key_data.type_url, ED25519_PUBLIC_KEY_TYPE_URL);
    assert_eq!(
        entry.key_data.key_material_type,
        KeyMaterialType::AsymmetricPublic
    );
    assert_eq!(entry.key_data.value.len(), 32);
}

#[test]
fn test_public_keyset_round_trips_independently() {
    // A derived public keyset is a full keyset in its own right: it can be
    // sealed and recovered just like the private one.
    let manager = KeysetManager::new();
    let handle = KeysetHandle::generate_new(&KeyTemplate::ed25519(), &manager)
        .expect("generation should succeed");
    let public = handle
        .public_keyset_handle(&TypeRegistry::new())
        .expect("derivation should succeed");

    let aead = master_aead();
    let restored = unseal(seal(&public, &aead), &aead).expect("recovery should succeed");
    assert_eq!(restored.keyset(), public.keyset());
}

#[test]
fn test_derivation_is_deterministic() {
    let manager = KeysetManager::new();
    let handle = KeysetHandle::generate_new(&KeyTemplate::ed25519(), &manager)
        .expect("generation should succeed");
    let registry = TypeRegistry::new();

    let a = handle.public_keyset_handle(&registry).expect("derivable");
    let b = handle.public_keyset_handle(&registry).expect("derivable");
    assert_eq!(a.keyset(), b.keyset());
}

#[test]
fn test_sealed_bytes_do_not_leak_key_material() {
    let private_bytes = vec![0x5A; 32];
    let handle = KeysetHandle::from_keyset(Keyset {
        primary_key_id: 1,
        key: vec![KeyEntry {
            key_id: 1,
            status: KeyStatus::Enabled,
            output_prefix_type: OutputPrefixType::Raw,
            key_data: KeyData {
                type_url: ED25519_PRIVATE_KEY_TYPE_URL.to_string(),
                value: KeyMaterial::new(private_bytes.clone()),
                key_material_type: KeyMaterialType::AsymmetricPrivate,
            },
        }],
    });

    let sealed = seal(&handle, &master_aead());
    let leaked = sealed
        .windows(private_bytes.len())
        .any(|window| window == private_bytes.as_slice());
    assert!(!leaked, "sealed output contains raw key material");
}

// ============================================================================
// Failure Path Tests
// ============================================================================

#[test]
fn test_recovery_with_rotated_master_key_fails() {
    let manager = KeysetManager::new();
    let handle = KeysetHandle::generate_new(&KeyTemplate::ed25519(), &manager)
        .expect("generation should succeed");

    let sealed = seal(&handle, &master_aead());
    let other = XChaCha20Poly1305Aead::new([0x43; 32]);
    assert!(matches!(
        unseal(sealed, &other),
        Err(EnvelopeError::Decrypt { .. })
    ));
}

#[test]
fn test_recovery_of_corrupted_envelope_fails() {
    let manager = KeysetManager::new();
    let handle = KeysetHandle::generate_new(&KeyTemplate::ed25519(), &manager)
        .expect("generation should succeed");
    let aead = master_aead();
    let sealed = seal(&handle, &aead);

    // Any corrupted body byte must be rejected; skip the 4-byte frame
    // length so every flip lands inside the ciphertext.
    for index in [4, sealed.len() / 2, sealed.len() - 1] {
        let mut corrupted = sealed.clone();
        corrupted[index] ^= 0x80;
        assert!(
            matches!(
                unseal(corrupted, &aead),
                Err(EnvelopeError::Decrypt { .. })
            ),
            "corruption at byte {index} was not detected"
        );
    }
}

#[test]
fn test_missing_writer_is_rejected_before_encryption() {
    struct PanickingAead;

    impl Aead for PanickingAead {
        fn encrypt(&self, _plaintext: &[u8], _associated_data: &[u8]) -> AeadResult<Vec<u8>> {
            panic!("encrypt must not run without a writer");
        }

        fn decrypt(&self, _ciphertext: &[u8], _associated_data: &[u8]) -> AeadResult<Vec<u8>> {
            panic!("decrypt must not run without a writer");
        }
    }

    let manager = KeysetManager::new();
    let handle = KeysetHandle::generate_new(&KeyTemplate::ed25519(), &manager)
        .expect("generation should succeed");

    let result = handle.write(None, &PanickingAead);
    assert!(matches!(result, Err(EnvelopeError::MissingWriter)));
}

#[test]
fn test_reader_is_consulted_exactly_once() {
    struct CountingReader {
        inner: Vec<u8>,
        calls: AtomicUsize,
    }

    impl KeysetReader for CountingReader {
        fn read_encrypted(&mut self) -> std::io::Result<EncryptedKeyset> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            BinaryKeysetReader::new(Cursor::new(self.inner.clone())).read_encrypted()
        }
    }

    let manager = KeysetManager::new();
    let handle = KeysetHandle::generate_new(&KeyTemplate::ed25519(), &manager)
        .expect("generation should succeed");
    let aead = master_aead();

    let mut reader = CountingReader {
        inner: seal(&handle, &aead),
        calls: AtomicUsize::new(0),
    };
    KeysetHandle::read(&mut reader, &aead).expect("read should succeed");
    assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_writer_not_invoked_when_encryption_fails() {
    struct BrokenAead;

    impl Aead for BrokenAead {
        fn encrypt(&self, _plaintext: &[u8], _associated_data: &[u8]) -> AeadResult<Vec<u8>> {
            Err(sealkey::AeadError::EncryptionFailed)
        }

        fn decrypt(&self, _ciphertext: &[u8], _associated_data: &[u8]) -> AeadResult<Vec<u8>> {
            Err(sealkey::AeadError::DecryptionFailed)
        }
    }

    struct PanickingWriter;

    impl KeysetWriter for PanickingWriter {
        fn write(&mut self, _encrypted: &EncryptedKeyset) -> std::io::Result<()> {
            panic!("writer must not run after a failed encryption");
        }
    }

    let manager = KeysetManager::new();
    let handle = KeysetHandle::generate_new(&KeyTemplate::ed25519(), &manager)
        .expect("generation should succeed");

    let result = handle.write(Some(&mut PanickingWriter), &BrokenAead);
    assert!(matches!(result, Err(EnvelopeError::Encrypt { .. })));
}

#[test]
fn test_derivation_failure_names_the_offending_key() {
    let handle = KeysetHandle::from_keyset(Keyset {
        primary_key_id: 10,
        key: vec![
            KeyEntry {
                key_id: 10,
                status: KeyStatus::Enabled,
                output_prefix_type: OutputPrefixType::Prefixed,
                key_data: KeyData {
                    type_url: ED25519_PRIVATE_KEY_TYPE_URL.to_string(),
                    value: KeyMaterial::new(vec![0x11; 32]),
                    key_material_type: KeyMaterialType::AsymmetricPrivate,
                },
            },
            KeyEntry {
                key_id: 20,
                status: KeyStatus::Disabled,
                output_prefix_type: OutputPrefixType::Raw,
                key_data: KeyData {
                    type_url: "example/aes-gcm".to_string(),
                    value: KeyMaterial::new(vec![0x22; 32]),
                    key_material_type: KeyMaterialType::Symmetric,
                },
            },
        ],
    });

    let err = handle
        .public_keyset_handle(&TypeRegistry::new())
        .expect_err("symmetric entry must fail the derivation");
    assert!(matches!(
        err,
        DeriveError::NotPrivate {
            key_id: 20,
            material_type: KeyMaterialType::Symmetric
        }
    ));
    assert!(err.to_string().contains("20"));
}

// ============================================================================
// Seam Tests (caller-supplied implementations)
// ============================================================================

/// Derives "public" material by reversing the private bytes. Nonsense
/// cryptographically, but perfect for observing the dispatch contract.
struct ReversingDeriver;

impl PublicKeyDeriver for ReversingDeriver {
    fn private_type_url(&self) -> &str {
        "example/reversible-private"
    }

    fn derive_public(&self, private_key: &KeyMaterial) -> DeriveResult<KeyData> {
        let mut bytes = private_key.as_bytes().to_vec();
        bytes.reverse();
        Ok(KeyData {
            type_url: "example/reversible-public".to_string(),
            value: KeyMaterial::new(bytes),
            key_material_type: KeyMaterialType::AsymmetricPublic,
        })
    }
}

#[test]
fn test_custom_deriver_plugs_into_the_registry() {
    let mut registry = TypeRegistry::empty();
    registry.register(ReversingDeriver);

    let handle = KeysetHandle::from_keyset(Keyset {
        primary_key_id: 5,
        key: vec![KeyEntry {
            key_id: 5,
            status: KeyStatus::Enabled,
            output_prefix_type: OutputPrefixType::Legacy,
            key_data: KeyData {
                type_url: "example/reversible-private".to_string(),
                value: KeyMaterial::new(vec![1, 2, 3, 4]),
                key_material_type: KeyMaterialType::AsymmetricPrivate,
            },
        }],
    });

    let public = handle
        .public_keyset_handle(&registry)
        .expect("derivation should succeed");

    let entry = &public.keyset().entries()[0];
    assert_eq!(entry.key_data.value.as_bytes(), &[4, 3, 2, 1]);
    assert_eq!(entry.output_prefix_type, OutputPrefixType::Legacy);
    assert_eq!(entry.status, KeyStatus::Enabled);
}

#[test]
fn test_in_memory_reader_writer_implementations() {
    // A caller-owned slot standing in for a KMS-backed store.
    struct Slot {
        stored: Option<EncryptedKeyset>,
    }

    impl KeysetWriter for Slot {
        fn write(&mut self, encrypted: &EncryptedKeyset) -> std::io::Result<()> {
            self.stored = Some(encrypted.clone());
            Ok(())
        }
    }

    impl KeysetReader for Slot {
        fn read_encrypted(&mut self) -> std::io::Result<EncryptedKeyset> {
            self.stored
                .clone()
                .ok_or_else(|| std::io::Error::other("slot is empty"))
        }
    }

    let manager = KeysetManager::new();
    let handle = KeysetHandle::generate_new(&KeyTemplate::ed25519(), &manager)
        .expect("generation should succeed");
    let aead = master_aead();

    let mut slot = Slot { stored: None };
    handle
        .write(Some(&mut slot), &aead)
        .expect("write should succeed");

    let restored = KeysetHandle::read(&mut slot, &aead).expect("read should succeed");
    assert_eq!(restored.keyset(), handle.keyset());

    // An empty slot surfaces as a read-stage failure.
    let mut empty = Slot { stored: None };
    assert!(matches!(
        KeysetHandle::read(&mut empty, &aead),
        Err(EnvelopeError::Read(_))
    ));
}

// ============================================================================
// Error Unification Tests
// ============================================================================

#[test]
fn test_stage_errors_convert_into_the_top_level_error() {
    let manager = KeysetManager::new();
    let envelope: SealkeyError = EnvelopeError::MissingWriter.into();
    assert!(matches!(envelope, SealkeyError::Envelope(_)));

    let generate: SealkeyError = manager
        .generate(&KeyTemplate::new("example/unknown", OutputPrefixType::Raw))
        .map_err(SealkeyError::from)
        .expect_err("unsupported template");
    assert!(matches!(generate, SealkeyError::Generate(_)));
}

#[test]
fn test_handle_debug_never_prints_key_material() {
    let secret = vec![0x77; 32];
    let handle = KeysetHandle::from_keyset(Keyset {
        primary_key_id: 1,
        key: vec![KeyEntry {
            key_id: 1,
            status: KeyStatus::Enabled,
            output_prefix_type: OutputPrefixType::Prefixed,
            key_data: KeyData {
                type_url: ED25519_PRIVATE_KEY_TYPE_URL.to_string(),
                value: KeyMaterial::new(secret),
                key_material_type: KeyMaterialType::AsymmetricPrivate,
            },
        }],
    });

    let rendered = format!("{handle:?}");
    assert!(rendered.contains("[REDACTED]"));
    assert!(!rendered.contains("119")); // 0x77 as decimal
    assert!(!rendered.contains("0x77"));
}
