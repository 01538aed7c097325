//! Type registry for public-key derivation.
//!
//! This module provides the [`TypeRegistry`] that maps an opaque type url to
//! a [`PublicKeyDeriver`] capable of deriving public key material from
//! private key material. The registry is how public-keyset derivation stays
//! ignorant of concrete algorithms: new key types register by inserting into
//! the table, not by touching the handle.
//!
//! # Design
//!
//! The registry is:
//! - **Thread-safe**: `Arc` internally, so clones are cheap and shareable
//! - **Immutable in production**: [`TypeRegistry::new()`] registers the
//!   bundled derivers
//! - **Injected, never global**: every operation that needs the registry
//!   takes it as a parameter, so tests run against fake derivers
//!
//! # Example
//!
//! ```
//! use sealkey::registry::{TypeRegistry, ED25519_PRIVATE_KEY_TYPE_URL};
//!
//! let registry = TypeRegistry::new();
//! assert!(registry.supports(ED25519_PRIVATE_KEY_TYPE_URL));
//! assert!(!registry.supports("example/unknown"));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use sealkey_core::error::{DeriveError, DeriveResult};
use sealkey_core::{KeyData, KeyMaterial, KeyMaterialType};

/// Type url of the bundled Ed25519 private key type.
pub const ED25519_PRIVATE_KEY_TYPE_URL: &str = "type.sealkey.dev/Ed25519PrivateKey";

/// Type url of the bundled Ed25519 public key type.
pub const ED25519_PUBLIC_KEY_TYPE_URL: &str = "type.sealkey.dev/Ed25519PublicKey";

/// Length of an Ed25519 private scalar in bytes.
const ED25519_PRIVATE_KEY_LEN: usize = 32;

/// A capability that derives public key material from private key material.
///
/// Public and private variants of a primitive may use different type urls,
/// so the returned [`KeyData`] carries the public counterpart's url along
/// with the derived bytes and an asymmetric-public classification.
pub trait PublicKeyDeriver: Send + Sync {
    /// The private-key type url this deriver handles.
    fn private_type_url(&self) -> &str;

    /// Derive the public [`KeyData`] for the given private key material.
    ///
    /// # Errors
    ///
    /// Returns [`DeriveError::Derivation`] if the material does not form a
    /// valid private key of this type.
    fn derive_public(&self, private_key: &KeyMaterial) -> DeriveResult<KeyData>;
}

/// Registry of public-key derivers, keyed by private-key type url.
///
/// Cloning is cheap ([`Arc`] internally). Use [`TypeRegistry::new()`] for
/// the bundled derivers or [`TypeRegistry::empty()`] plus
/// [`TypeRegistry::register()`] to build one for tests.
#[derive(Clone)]
pub struct TypeRegistry {
    derivers: Arc<HashMap<String, Arc<dyn PublicKeyDeriver>>>,
}

impl TypeRegistry {
    /// Create a registry with the bundled derivers.
    ///
    /// Currently bundled:
    /// - [`Ed25519Deriver`] under [`ED25519_PRIVATE_KEY_TYPE_URL`]
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Ed25519Deriver);
        registry
    }

    /// Create an empty registry (for testing, or for callers that want full
    /// control over the deriver set).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            derivers: Arc::new(HashMap::new()),
        }
    }

    /// Register a deriver under its private-key type url.
    ///
    /// A deriver already registered under the same url is replaced.
    pub fn register<D: PublicKeyDeriver + 'static>(&mut self, deriver: D) {
        let derivers = Arc::make_mut(&mut self.derivers);
        derivers.insert(deriver.private_type_url().to_string(), Arc::new(deriver));
    }

    /// Look up the deriver for a type url.
    #[must_use]
    pub fn get(&self, type_url: &str) -> Option<&dyn PublicKeyDeriver> {
        self.derivers.get(type_url).map(AsRef::as_ref)
    }

    /// Check whether a type url has a registered deriver.
    #[must_use]
    pub fn supports(&self, type_url: &str) -> bool {
        self.derivers.contains_key(type_url)
    }

    /// Number of registered derivers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.derivers.len()
    }

    /// Check whether the registry has no derivers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.derivers.is_empty()
    }

    /// Derive public key data for private key material of the given type.
    ///
    /// This is the lookup-and-dispatch used by public-keyset derivation.
    ///
    /// # Errors
    ///
    /// - [`DeriveError::UnknownTypeUrl`] if no deriver is registered for
    ///   `type_url`
    /// - [`DeriveError::Derivation`] if the registered deriver rejects the
    ///   material
    pub fn get_public_key_data(
        &self,
        type_url: &str,
        private_key: &KeyMaterial,
    ) -> DeriveResult<KeyData> {
        let deriver = self
            .get(type_url)
            .ok_or_else(|| DeriveError::unknown_type_url(type_url))?;
        deriver.derive_public(private_key)
    }

    /// List all registered type urls, sorted for stable output.
    #[must_use]
    pub fn registered_type_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.derivers.keys().map(String::as_str).collect();
        urls.sort_unstable();
        urls
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("derivers", &self.registered_type_urls())
            .finish()
    }
}

// ============================================================================
// Ed25519
// ============================================================================

/// Derives Ed25519 verifying keys from 32-byte private scalars.
#[derive(Debug, Clone, Copy)]
pub struct Ed25519Deriver;

impl PublicKeyDeriver for Ed25519Deriver {
    fn private_type_url(&self) -> &str {
        ED25519_PRIVATE_KEY_TYPE_URL
    }

    fn derive_public(&self, private_key: &KeyMaterial) -> DeriveResult<KeyData> {
        let bytes: [u8; ED25519_PRIVATE_KEY_LEN] =
            private_key.as_bytes().try_into().map_err(|_| {
                DeriveError::derivation(format!(
                    "ed25519 private key must be {ED25519_PRIVATE_KEY_LEN} bytes, got {}",
                    private_key.len()
                ))
            })?;

        let signing_key = ed25519_dalek::SigningKey::from_bytes(&bytes);
        let public_bytes = signing_key.verifying_key().to_bytes();

        Ok(KeyData {
            type_url: ED25519_PUBLIC_KEY_TYPE_URL.to_string(),
            value: KeyMaterial::new(public_bytes.to_vec()),
            key_material_type: KeyMaterialType::AsymmetricPublic,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    struct FakeDeriver {
        url: &'static str,
    }

    impl PublicKeyDeriver for FakeDeriver {
        fn private_type_url(&self) -> &str {
            self.url
        }

        fn derive_public(&self, private_key: &KeyMaterial) -> DeriveResult<KeyData> {
            // Reverse the bytes so tests can check the output came from here.
            let mut bytes = private_key.as_bytes().to_vec();
            bytes.reverse();
            Ok(KeyData {
                type_url: format!("{}.public", self.url),
                value: KeyMaterial::new(bytes),
                key_material_type: KeyMaterialType::AsymmetricPublic,
            })
        }
    }

    // ------------------------------------------------------------------------
    // Construction Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_new_registers_bundled_derivers() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.len(), 1);
        assert!(registry.supports(ED25519_PRIVATE_KEY_TYPE_URL));
    }

    #[test]
    fn test_empty_registry() {
        let registry = TypeRegistry::empty();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.registered_type_urls().is_empty());
    }

    #[test]
    fn test_default_is_new() {
        assert_eq!(TypeRegistry::default().len(), TypeRegistry::new().len());
    }

    // ------------------------------------------------------------------------
    // Registration and Lookup Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_register_and_get() {
        let mut registry = TypeRegistry::empty();
        registry.register(FakeDeriver { url: "example/a" });

        assert!(registry.supports("example/a"));
        assert!(registry.get("example/a").is_some());
        assert!(registry.get("example/b").is_none());
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = TypeRegistry::empty();
        registry.register(FakeDeriver { url: "example/a" });
        registry.register(FakeDeriver { url: "example/a" });
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registered_type_urls_sorted() {
        let mut registry = TypeRegistry::empty();
        registry.register(FakeDeriver { url: "example/b" });
        registry.register(FakeDeriver { url: "example/a" });

        assert_eq!(registry.registered_type_urls(), vec!["example/a", "example/b"]);
    }

    // ------------------------------------------------------------------------
    // Dispatch Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_get_public_key_data_dispatches() {
        let mut registry = TypeRegistry::empty();
        registry.register(FakeDeriver { url: "example/a" });

        let private = KeyMaterial::new(vec![1, 2, 3]);
        let key_data = registry.get_public_key_data("example/a", &private).unwrap();

        assert_eq!(key_data.type_url, "example/a.public");
        assert_eq!(key_data.value.as_bytes(), &[3, 2, 1]);
        assert_eq!(key_data.key_material_type, KeyMaterialType::AsymmetricPublic);
    }

    #[test]
    fn test_get_public_key_data_unknown_url() {
        let registry = TypeRegistry::empty();
        let result = registry.get_public_key_data("example/missing", &KeyMaterial::new(vec![]));
        assert!(matches!(
            result,
            Err(DeriveError::UnknownTypeUrl { type_url }) if type_url == "example/missing"
        ));
    }

    // ------------------------------------------------------------------------
    // Ed25519 Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_ed25519_derivation_matches_dalek() {
        let scalar = [0x42u8; 32];
        let expected = ed25519_dalek::SigningKey::from_bytes(&scalar)
            .verifying_key()
            .to_bytes();

        let key_data = Ed25519Deriver
            .derive_public(&KeyMaterial::new(scalar.to_vec()))
            .unwrap();

        assert_eq!(key_data.value.as_bytes(), &expected);
        assert_eq!(key_data.type_url, ED25519_PUBLIC_KEY_TYPE_URL);
        assert_eq!(key_data.key_material_type, KeyMaterialType::AsymmetricPublic);
    }

    #[test]
    fn test_ed25519_rejects_wrong_length() {
        let result = Ed25519Deriver.derive_public(&KeyMaterial::new(vec![0u8; 31]));
        assert!(matches!(result, Err(DeriveError::Derivation { .. })));
    }

    #[test]
    fn test_ed25519_via_registry() {
        let registry = TypeRegistry::new();
        let key_data = registry
            .get_public_key_data(ED25519_PRIVATE_KEY_TYPE_URL, &KeyMaterial::new(vec![7; 32]))
            .unwrap();
        assert_eq!(key_data.value.len(), 32);
    }

    // ------------------------------------------------------------------------
    // Clone and Thread Safety Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_clone_shares_arc() {
        let registry = TypeRegistry::new();
        let clone = registry.clone();
        assert!(Arc::ptr_eq(&registry.derivers, &clone.derivers));
    }

    #[test]
    fn test_clone_mutation_is_independent() {
        let registry = TypeRegistry::empty();
        let mut clone = registry.clone();
        clone.register(FakeDeriver { url: "example/a" });

        assert!(registry.is_empty());
        assert_eq!(clone.len(), 1);
    }

    #[test]
    fn test_registry_across_threads() {
        let registry = TypeRegistry::new();
        let clone = registry.clone();

        let handle = std::thread::spawn(move || clone.supports(ED25519_PRIVATE_KEY_TYPE_URL));
        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_registry_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypeRegistry>();
    }

    #[test]
    fn test_debug_lists_type_urls() {
        let registry = TypeRegistry::new();
        let rendered = format!("{registry:?}");
        assert!(rendered.contains("TypeRegistry"));
        assert!(rendered.contains(ED25519_PRIVATE_KEY_TYPE_URL));
    }
}
