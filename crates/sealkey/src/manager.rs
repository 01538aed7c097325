//! Keyset generation: templates, managers, and key generators.
//!
//! Generation is a pure delegation boundary: [`KeysetHandle::generate_new`]
//! hands a [`KeyTemplate`] to an injected [`KeyManager`] and returns
//! whatever handle (or error) the manager produces. This module provides
//! the capability trait plus a bundled implementation, [`KeysetManager`],
//! that builds a fresh single-key keyset from per-type [`KeyGenerator`]s.
//!
//! # Example
//!
//! ```
//! use sealkey::handle::KeysetHandle;
//! use sealkey::manager::{KeyTemplate, KeysetManager};
//!
//! let manager = KeysetManager::new();
//! let handle = KeysetHandle::generate_new(&KeyTemplate::ed25519(), &manager)
//!     .expect("generation failed");
//! assert_eq!(handle.len(), 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use rand::RngCore;
use sealkey_core::error::{GenerateError, GenerateResult};
use sealkey_core::{KeyData, KeyEntry, KeyMaterial, KeyMaterialType, KeyStatus, Keyset, OutputPrefixType};

use crate::handle::KeysetHandle;
use crate::registry::ED25519_PRIVATE_KEY_TYPE_URL;

/// A template describing the key a manager should generate.
///
/// Opaque to the handle: only the manager interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTemplate {
    /// The type url of the key to generate.
    pub type_url: String,
    /// The output-prefix preference the new key entry should carry.
    pub output_prefix_type: OutputPrefixType,
}

impl KeyTemplate {
    /// Create a template for an arbitrary type url.
    #[must_use]
    pub fn new(type_url: impl Into<String>, output_prefix_type: OutputPrefixType) -> Self {
        Self {
            type_url: type_url.into(),
            output_prefix_type,
        }
    }

    /// Template for a fresh Ed25519 signing key with prefixed output.
    #[must_use]
    pub fn ed25519() -> Self {
        Self::new(ED25519_PRIVATE_KEY_TYPE_URL, OutputPrefixType::Prefixed)
    }
}

/// A capability that turns a template into a fully formed keyset handle.
///
/// Injected into [`KeysetHandle::generate_new`]; the handle makes no
/// cryptographic decisions of its own on this path.
pub trait KeyManager: Send + Sync {
    /// Generate a new keyset for the template and wrap it in a handle.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::UnsupportedTemplate`] if the manager does not
    ///   know the template's type url
    /// - [`GenerateError::Generation`] if key material could not be produced
    fn generate(&self, template: &KeyTemplate) -> GenerateResult<KeysetHandle>;
}

/// A capability that produces fresh key material for one type url.
pub trait KeyGenerator: Send + Sync {
    /// The type url this generator produces keys for.
    fn type_url(&self) -> &str;

    /// Generate fresh key data.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Generation`] if material could not be
    /// produced.
    fn new_key(&self) -> GenerateResult<KeyData>;
}

/// The bundled key manager: a table of [`KeyGenerator`]s keyed by type url.
///
/// A generated keyset holds exactly one enabled entry with a random nonzero
/// key id, marked primary. Rotation and multi-key lifecycles are a caller
/// concern, layered on top of handles.
#[derive(Clone)]
pub struct KeysetManager {
    generators: Arc<HashMap<String, Arc<dyn KeyGenerator>>>,
}

impl KeysetManager {
    /// Create a manager with the bundled generators.
    ///
    /// Currently bundled:
    /// - [`Ed25519KeyGenerator`] under the Ed25519 private-key type url
    #[must_use]
    pub fn new() -> Self {
        let mut manager = Self::empty();
        manager.register(Ed25519KeyGenerator);
        manager
    }

    /// Create a manager with no generators (for testing).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            generators: Arc::new(HashMap::new()),
        }
    }

    /// Register a generator under its type url, replacing any existing one.
    pub fn register<G: KeyGenerator + 'static>(&mut self, generator: G) {
        let generators = Arc::make_mut(&mut self.generators);
        generators.insert(generator.type_url().to_string(), Arc::new(generator));
    }

    /// Check whether a type url has a registered generator.
    #[must_use]
    pub fn supports(&self, type_url: &str) -> bool {
        self.generators.contains_key(type_url)
    }
}

impl KeyManager for KeysetManager {
    fn generate(&self, template: &KeyTemplate) -> GenerateResult<KeysetHandle> {
        let generator = self
            .generators
            .get(&template.type_url)
            .ok_or_else(|| GenerateError::unsupported_template(&template.type_url))?;

        let key_data = generator.new_key()?;
        let key_id = random_key_id();

        let keyset = Keyset {
            primary_key_id: key_id,
            key: vec![KeyEntry {
                key_id,
                status: KeyStatus::Enabled,
                output_prefix_type: template.output_prefix_type,
                key_data,
            }],
        };
        Ok(KeysetHandle::from_keyset(keyset))
    }
}

impl Default for KeysetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeysetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut urls: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        urls.sort_unstable();
        f.debug_struct("KeysetManager")
            .field("generators", &urls)
            .finish()
    }
}

/// Pick a random nonzero key id.
///
/// Zero is reserved: an all-defaults keyset must never accidentally address
/// a real key.
fn random_key_id() -> u32 {
    loop {
        let id = rand::rngs::OsRng.next_u32();
        if id != 0 {
            return id;
        }
    }
}

// ============================================================================
// Ed25519
// ============================================================================

/// Generates fresh Ed25519 private keys from the OS secure RNG.
#[derive(Debug, Clone, Copy)]
pub struct Ed25519KeyGenerator;

impl KeyGenerator for Ed25519KeyGenerator {
    fn type_url(&self) -> &str {
        ED25519_PRIVATE_KEY_TYPE_URL
    }

    fn new_key(&self) -> GenerateResult<KeyData> {
        let mut scalar = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut scalar);

        Ok(KeyData {
            type_url: ED25519_PRIVATE_KEY_TYPE_URL.to_string(),
            value: KeyMaterial::new(scalar.to_vec()),
            key_material_type: KeyMaterialType::AsymmetricPrivate,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
