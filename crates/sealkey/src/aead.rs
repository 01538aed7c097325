//! The master-key AEAD capability.
//!
//! This module defines the [`Aead`] trait that envelope encryption is built
//! on, plus one bundled implementation, [`XChaCha20Poly1305Aead`]. Anything
//! that can authenticate-encrypt byte blobs can serve as a master key: a
//! local cipher keyed from a KDF, a KMS client, a hardware token. The
//! envelope protocol only ever sees the trait.
//!
//! # Security Properties
//!
//! - **Authenticated Encryption**: any tampering with the ciphertext is
//!   detected during decryption.
//! - **Random Nonce**: the bundled implementation uses XChaCha20-Poly1305
//!   with a fresh random 24-byte nonce per encryption, generated from the
//!   operating system's secure RNG. The extended nonce makes random
//!   generation collision-safe.
//! - **Zeroization**: the raw key bytes handed to the constructor are
//!   zeroized as soon as the cipher is initialized.
//!
//! # Ciphertext Format
//!
//! The bundled implementation produces `nonce (24 bytes) || ciphertext+tag`.
//!
//! # Example
//!
//! ```rust
//! use sealkey::aead::{Aead, XChaCha20Poly1305Aead};
//!
//! let aead = XChaCha20Poly1305Aead::new([0x42; 32]);
//!
//! let ciphertext = aead.encrypt(b"plaintext", b"").expect("encryption failed");
//! let plaintext = aead.decrypt(&ciphertext, b"").expect("decryption failed");
//! assert_eq!(plaintext, b"plaintext");
//! ```

use chacha20poly1305::{
    aead::{Aead as _, KeyInit, Payload},
    Key, XChaCha20Poly1305, XNonce,
};
use rand::RngCore;
use sealkey_core::error::{AeadError, AeadResult};
use zeroize::Zeroize;

/// Length of a master key in bytes.
pub const MASTER_KEY_LEN: usize = 32;

/// Length of the nonce prepended to bundled-AEAD ciphertexts.
pub const NONCE_LEN: usize = 24;

/// Authenticated encryption with associated data.
///
/// Implementations must be deterministic failures: an operation either
/// returns the full output or an error, never partial bytes. The envelope
/// protocol always calls these with empty associated data; the parameter
/// exists so implementations stay general.
pub trait Aead: Send + Sync {
    /// Encrypt `plaintext`, authenticating `associated_data` alongside it.
    ///
    /// # Errors
    ///
    /// Returns [`AeadError::EncryptionFailed`] if encryption fails.
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> AeadResult<Vec<u8>>;

    /// Decrypt `ciphertext`, verifying `associated_data` was authenticated.
    ///
    /// # Errors
    ///
    /// Returns [`AeadError::DecryptionFailed`] if the key is wrong, the
    /// input is truncated, or the ciphertext was tampered with. The error
    /// does not say which.
    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> AeadResult<Vec<u8>>;
}

/// XChaCha20-Poly1305 AEAD keyed by 32 raw key bytes.
///
/// # Security
///
/// The key bytes passed to [`XChaCha20Poly1305Aead::new`] are zeroized
/// before the constructor returns. How the caller obtained them (KDF, KMS
/// unwrap, config) is outside this type's concern.
pub struct XChaCha20Poly1305Aead {
    cipher: XChaCha20Poly1305,
}

impl XChaCha20Poly1305Aead {
    /// Create an AEAD from raw master-key bytes.
    ///
    /// Consumes and zeroizes the key array.
    #[must_use]
    pub fn new(mut key_bytes: [u8; MASTER_KEY_LEN]) -> Self {
        let cipher = XChaCha20Poly1305::new(Key::from_slice(&key_bytes));
        key_bytes.zeroize();
        Self { cipher }
    }
}

impl Aead for XChaCha20Poly1305Aead {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> AeadResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(
                XNonce::from_slice(&nonce_bytes),
                Payload {
                    msg: plaintext,
                    aad: associated_data,
                },
            )
            .map_err(|_| AeadError::EncryptionFailed)?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> AeadResult<Vec<u8>> {
        if ciphertext.len() < NONCE_LEN {
            return Err(AeadError::DecryptionFailed);
        }
        let (nonce_bytes, body) = ciphertext.split_at(NONCE_LEN);

        self.cipher
            .decrypt(
                XNonce::from_slice(nonce_bytes),
                Payload {
                    msg: body,
                    aad: associated_data,
                },
            )
            .map_err(|_| AeadError::DecryptionFailed)
    }
}

// Never expose cipher state in debug output
impl std::fmt::Debug for XChaCha20Poly1305Aead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("XChaCha20Poly1305Aead([REDACTED])")
    }
}

// ============================================================================
// Tests
// ============================================================================
