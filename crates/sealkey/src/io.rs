//! Reader and writer capabilities for encrypted keysets.
//!
//! This module defines the transport seams of the envelope protocol:
//! [`KeysetReader`] produces an [`EncryptedKeyset`], [`KeysetWriter`]
//! accepts one. The handle never touches files, sockets, or KMS APIs
//! itself; callers plug in whatever transport they have.
//!
//! Bundled implementations [`BinaryKeysetReader`] and [`BinaryKeysetWriter`]
//! frame the ciphertext over any [`std::io::Read`] / [`std::io::Write`]
//! stream as a 4-byte big-endian length followed by the ciphertext bytes.
//!
//! # Example
//!
//! ```rust
//! use std::io::Cursor;
//! use sealkey::io::{BinaryKeysetReader, BinaryKeysetWriter, KeysetReader, KeysetWriter};
//! use sealkey_core::EncryptedKeyset;
//!
//! let encrypted = EncryptedKeyset { encrypted_keyset: vec![1, 2, 3] };
//!
//! let mut buffer = Vec::new();
//! BinaryKeysetWriter::new(&mut buffer).write(&encrypted).expect("write failed");
//!
//! let mut reader = BinaryKeysetReader::new(Cursor::new(buffer));
//! let read_back = reader.read_encrypted().expect("read failed");
//! assert_eq!(read_back, encrypted);
//! ```

use std::io;

use sealkey_core::EncryptedKeyset;

/// Upper bound on a framed encrypted keyset, in bytes.
///
/// Guards the reader against allocating from a corrupt or hostile length
/// prefix. Keysets are small; 16 MiB is far beyond any legitimate one.
pub const MAX_ENCRYPTED_KEYSET_LEN: usize = 16 * 1024 * 1024;

/// A source of encrypted keysets.
///
/// Opaque transport (file, stream, KMS-backed store) supplied by the caller.
/// Reading consumes the reader's current record; the envelope protocol calls
/// it exactly once per read operation.
pub trait KeysetReader {
    /// Produce the next encrypted keyset.
    ///
    /// # Errors
    ///
    /// Any I/O or transport failure. The envelope protocol surfaces it as an
    /// invalid-input condition with the message passed through.
    fn read_encrypted(&mut self) -> io::Result<EncryptedKeyset>;
}

/// A sink for encrypted keysets.
pub trait KeysetWriter {
    /// Write one encrypted keyset.
    ///
    /// # Errors
    ///
    /// Any I/O or transport failure. The envelope protocol returns it
    /// unchanged.
    fn write(&mut self, encrypted: &EncryptedKeyset) -> io::Result<()>;
}

// ============================================================================
// Binary framing over std::io streams
// ============================================================================

/// Reads a length-prefixed encrypted keyset from an [`io::Read`] stream.
#[derive(Debug)]
pub struct BinaryKeysetReader<R> {
    inner: R,
}

impl<R: io::Read> BinaryKeysetReader<R> {
    /// Wrap a byte stream.
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: io::Read> KeysetReader for BinaryKeysetReader<R> {
    fn read_encrypted(&mut self) -> io::Result<EncryptedKeyset> {
        let mut len_bytes = [0u8; 4];
        self.inner.read_exact(&mut len_bytes)?;
        let len = u32::from_be_bytes(len_bytes) as usize;

        if len > MAX_ENCRYPTED_KEYSET_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("encrypted keyset length {len} exceeds maximum"),
            ));
        }

        let mut encrypted_keyset = vec![0u8; len];
        self.inner.read_exact(&mut encrypted_keyset)?;
        Ok(EncryptedKeyset { encrypted_keyset })
    }
}

/// Writes a length-prefixed encrypted keyset to an [`io::Write`] stream.
#[derive(Debug)]
pub struct BinaryKeysetWriter<W> {
    inner: W,
}

impl<W: io::Write> BinaryKeysetWriter<W> {
    /// Wrap a byte stream.
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: io::Write> KeysetWriter for BinaryKeysetWriter<W> {
    fn write(&mut self, encrypted: &EncryptedKeyset) -> io::Result<()> {
        let len = u32::try_from(encrypted.encrypted_keyset.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "encrypted keyset too large to frame",
            )
        })?;
        self.inner.write_all(&len.to_be_bytes())?;
        self.inner.write_all(&encrypted.encrypted_keyset)?;
        self.inner.flush()
    }
}

// ============================================================================
// Tests
// ============================================================================
