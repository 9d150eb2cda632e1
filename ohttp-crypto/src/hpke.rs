//! HPKE (Hybrid Public Key Encryption) - RFC 9180
//!
//! OHTTP uses HPKE in base mode: the client sets up a sender context against the gateway's
//! public key, the gateway sets up the matching recipient context from the encapsulated key.
//! Both sides then export the response secret from their context.

use zeroize::Zeroizing;

use crate::{AeadAlgorithm, KdfAlgorithm, Result};

/// HPKE KEM (Key Encapsulation Mechanism) algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum HpkeKem {
    /// DHKEM with P-256 and HKDF-SHA256
    DhkemP256HkdfSha256,
    /// DHKEM with P-384 and HKDF-SHA384
    DhkemP384HkdfSha384,
    /// DHKEM with P-521 and HKDF-SHA512
    DhkemP521HkdfSha512,
    /// DHKEM with X25519 and HKDF-SHA256
    DhkemX25519HkdfSha256,
    /// DHKEM with X448 and HKDF-SHA512
    DhkemX448HkdfSha512,
}

impl HpkeKem {
    /// Length of a serialized public key (`Npk`).
    pub const fn public_key_len(self) -> usize {
        match self {
            HpkeKem::DhkemP256HkdfSha256 => 65, // Uncompressed P-256 point
            HpkeKem::DhkemP384HkdfSha384 => 97,
            HpkeKem::DhkemP521HkdfSha512 => 133,
            HpkeKem::DhkemX25519HkdfSha256 => 32,
            HpkeKem::DhkemX448HkdfSha512 => 56,
        }
    }

    /// Length of a serialized private key (`Nsk`).
    pub const fn private_key_len(self) -> usize {
        match self {
            HpkeKem::DhkemP256HkdfSha256 => 32,
            HpkeKem::DhkemP384HkdfSha384 => 48,
            HpkeKem::DhkemP521HkdfSha512 => 66,
            HpkeKem::DhkemX25519HkdfSha256 => 32,
            HpkeKem::DhkemX448HkdfSha512 => 56,
        }
    }

    /// Length of the encapsulated key (`Nenc`).
    ///
    /// For every DHKEM the encapsulated key is the serialized ephemeral public key.
    pub const fn enc_len(self) -> usize {
        self.public_key_len()
    }
}

/// HPKE cipher suite combining KEM, KDF, and AEAD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HpkeCipherSuite {
    /// Key Encapsulation Mechanism
    pub kem: HpkeKem,
    /// Key Derivation Function
    pub kdf: KdfAlgorithm,
    /// AEAD cipher
    pub aead: AeadAlgorithm,
}

impl HpkeCipherSuite {
    /// Create a new HPKE cipher suite
    pub fn new(kem: HpkeKem, kdf: KdfAlgorithm, aead: AeadAlgorithm) -> Self {
        Self { kem, kdf, aead }
    }

    /// Get the length of the encapsulated key for this KEM
    pub fn nenc(&self) -> usize {
        self.kem.enc_len()
    }
}

/// HPKE context bound to one sender or recipient.
///
/// Contexts are owned values; dropping one releases any state held by the backend.
pub trait HpkeContext: Send + Sync {
    /// Encrypt a message with associated data
    ///
    /// # Arguments
    ///
    /// * `aad` - Associated authenticated data
    /// * `plaintext` - Data to encrypt
    ///
    /// # Returns
    ///
    /// Ciphertext (including authentication tag)
    fn seal(&mut self, aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt a message with associated data
    ///
    /// # Arguments
    ///
    /// * `aad` - Associated authenticated data
    /// * `ciphertext` - Data to decrypt (including authentication tag)
    ///
    /// # Returns
    ///
    /// Plaintext if authentication succeeds
    fn open(&mut self, aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>;

    /// Export a secret from the HPKE context
    ///
    /// # Arguments
    ///
    /// * `exporter_context` - Application-specific context string
    /// * `length` - Desired output length
    ///
    /// # Returns
    ///
    /// Derived secret of requested length
    fn export(&self, exporter_context: &[u8], length: usize) -> Result<Zeroizing<Vec<u8>>>;
}

/// HPKE operations in base mode for a fixed cipher suite.
pub trait Hpke: Send + Sync {
    /// Get the cipher suite this HPKE instance uses
    fn cipher_suite(&self) -> HpkeCipherSuite;

    /// Generate a new HPKE keypair
    ///
    /// # Returns
    ///
    /// (secret_key, public_key) as raw bytes
    fn generate_keypair(&self) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>)>;

    /// Setup sender context in base mode
    ///
    /// # Arguments
    ///
    /// * `pk_r` - Recipient's public key
    /// * `info` - Application-specific context information
    ///
    /// # Returns
    ///
    /// (encapsulated_key, sender_context)
    fn setup_base_sender(
        &self,
        pk_r: &[u8],
        info: &[u8],
    ) -> Result<(Vec<u8>, Box<dyn HpkeContext>)>;

    /// Setup recipient context in base mode
    ///
    /// # Arguments
    ///
    /// * `enc` - Encapsulated key from sender
    /// * `sk_r` - Recipient's secret key
    /// * `info` - Application-specific context information
    ///
    /// # Returns
    ///
    /// Recipient context for decryption and secret export
    fn setup_base_recipient(
        &self,
        enc: &[u8],
        sk_r: &[u8],
        info: &[u8],
    ) -> Result<Box<dyn HpkeContext>>;
}
