//! Encapsulation header codec.
//!
//! Every encapsulated request starts with a fixed 7-byte header naming the key and algorithms
//! the client used:
//!
//! ```text
//! +--------+-----------+-----------+-----------+
//! | key_id | kem_id    | kdf_id    | aead_id   |
//! | 1 byte | 2 bytes   | 2 bytes   | 2 bytes   |
//! +--------+-----------+-----------+-----------+
//! ```
//!
//! It is followed by the encapsulated key (`Nenc` bytes) and the HPKE ciphertext. The same
//! header bytes are bound into the HPKE `info` parameter (see [`Header::recipient_info`]), so a
//! header that is altered in transit makes decryption fail.

use bytes::{Buf, BufMut};
use ohttp_crypto::HpkeCipherSuite;

use crate::algorithm::{self, AeadSpec, KdfSpec, KemSpec};
use crate::error::{Error, Result};

/// Length of the encapsulation header in bytes.
pub const HEADER_LENGTH: usize = 7;

/// Media type bound into the HPKE `info` of a request.
pub const DEFAULT_REQUEST_LABEL: &str = "message/bhttp request";

/// Exporter context for the response secret.
pub const DEFAULT_RESPONSE_LABEL: &str = "message/bhttp response";

/// Parsed encapsulation header with resolved algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    key_id: u8,
    kem: &'static KemSpec,
    kdf: &'static KdfSpec,
    aead: &'static AeadSpec,
}

impl Header {
    /// Build a header, resolving KEM, KDF and AEAD in that order.
    pub fn new(key_id: u8, kem_id: u16, kdf_id: u16, aead_id: u16) -> Result<Self> {
        Ok(Self {
            key_id,
            kem: algorithm::resolve_kem(kem_id)?,
            kdf: algorithm::resolve_kdf(kdf_id)?,
            aead: algorithm::resolve_aead(aead_id)?,
        })
    }

    /// Parse the header at the start of an encapsulated request.
    ///
    /// Only the first [`HEADER_LENGTH`] bytes are read.
    pub fn parse(message: &[u8]) -> Result<Self> {
        if message.len() < HEADER_LENGTH {
            return Err(Error::InvalidMessage(format!(
                "message of {} bytes is shorter than the {}-byte header",
                message.len(),
                HEADER_LENGTH
            )));
        }

        let mut data = &message[..HEADER_LENGTH];
        let key_id = data.get_u8();
        let kem_id = data.get_u16();
        let kdf_id = data.get_u16();
        let aead_id = data.get_u16();

        Self::new(key_id, kem_id, kdf_id, aead_id)
    }

    /// Encode to wire format.
    pub fn encode(&self) -> [u8; HEADER_LENGTH] {
        let mut out = [0u8; HEADER_LENGTH];
        let mut buf = &mut out[..];
        buf.put_u8(self.key_id);
        buf.put_u16(self.kem.id);
        buf.put_u16(self.kdf.id);
        buf.put_u16(self.aead.id);
        out
    }

    /// Key identifier.
    pub fn key_id(&self) -> u8 {
        self.key_id
    }

    /// Resolved KEM.
    pub fn kem(&self) -> &'static KemSpec {
        self.kem
    }

    /// Resolved KDF.
    pub fn kdf(&self) -> &'static KdfSpec {
        self.kdf
    }

    /// Resolved AEAD.
    pub fn aead(&self) -> &'static AeadSpec {
        self.aead
    }

    /// HPKE cipher suite named by this header.
    pub fn cipher_suite(&self) -> HpkeCipherSuite {
        algorithm::hpke_suite(self.kem, self.kdf, self.aead)
    }

    /// HPKE `info`: `label || 0x00 || header`.
    pub fn recipient_info(&self, label: &str) -> Vec<u8> {
        let mut info = Vec::with_capacity(label.len() + 1 + HEADER_LENGTH);
        info.extend_from_slice(label.as_bytes());
        info.push(0);
        info.extend_from_slice(&self.encode());
        info
    }
}

/// Borrow the encapsulated key that follows the header.
pub fn extract_encapsulated_secret<'a>(message: &'a [u8], kem: &KemSpec) -> Result<&'a [u8]> {
    let end = HEADER_LENGTH + kem.enc_length;
    message.get(HEADER_LENGTH..end).ok_or_else(|| {
        Error::InvalidMessage(format!(
            "message of {} bytes cannot hold a {}-byte encapsulated key",
            message.len(),
            kem.enc_length
        ))
    })
}

/// Borrow the ciphertext after the header and encapsulated key. May be empty.
pub fn extract_ciphertext<'a>(message: &'a [u8], kem: &KemSpec) -> Result<&'a [u8]> {
    let start = HEADER_LENGTH + kem.enc_length;
    message.get(start..).ok_or_else(|| {
        Error::InvalidMessage(format!(
            "message of {} bytes ends before the ciphertext",
            message.len()
        ))
    })
}
