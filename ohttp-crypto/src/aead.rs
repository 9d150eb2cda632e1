//! AEAD (Authenticated Encryption with Associated Data) cipher interface.

use crate::Result;

/// AEAD algorithms usable in an HPKE cipher suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AeadAlgorithm {
    /// AES-128-GCM
    Aes128Gcm,
    /// AES-256-GCM
    Aes256Gcm,
    /// ChaCha20-Poly1305
    ChaCha20Poly1305,
}

impl AeadAlgorithm {
    /// Get the key size in bytes for this algorithm (`Nk`).
    pub const fn key_size(self) -> usize {
        match self {
            AeadAlgorithm::Aes128Gcm => 16,
            AeadAlgorithm::Aes256Gcm => 32,
            AeadAlgorithm::ChaCha20Poly1305 => 32,
        }
    }

    /// Get the nonce size in bytes for this algorithm (`Nn`).
    pub const fn nonce_size(self) -> usize {
        match self {
            AeadAlgorithm::Aes128Gcm => 12,
            AeadAlgorithm::Aes256Gcm => 12,
            AeadAlgorithm::ChaCha20Poly1305 => 12,
        }
    }

    /// Get the authentication tag size in bytes for this algorithm (`Nt`).
    pub const fn tag_size(self) -> usize {
        match self {
            AeadAlgorithm::Aes128Gcm => 16,
            AeadAlgorithm::Aes256Gcm => 16,
            AeadAlgorithm::ChaCha20Poly1305 => 16,
        }
    }

    /// Get the name of this algorithm as used in RFC 9180.
    pub const fn name(self) -> &'static str {
        match self {
            AeadAlgorithm::Aes128Gcm => "AES-128-GCM",
            AeadAlgorithm::Aes256Gcm => "AES-256-GCM",
            AeadAlgorithm::ChaCha20Poly1305 => "ChaCha20Poly1305",
        }
    }
}

/// AEAD cipher trait.
///
/// # Security Requirements
///
/// - Tag verification MUST be constant-time
/// - Nonces MUST NOT be reused with the same key
///
/// # Example
///
/// ```rust,no_run
/// use ohttp_crypto::Aead;
///
/// fn encrypt_example(aead: &dyn Aead) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
///     let key = &[0u8; 16]; // In practice, use a derived key
///     let nonce = &[0u8; 12]; // In practice, use a unique nonce
///     let ciphertext = aead.seal(key, nonce, b"", b"secret message")?;
///     Ok(ciphertext)
/// }
/// ```
pub trait Aead: Send + Sync {
    /// Encrypt and authenticate plaintext.
    ///
    /// # Arguments
    ///
    /// * `key` - Encryption key (size must match algorithm)
    /// * `nonce` - Nonce (size must match algorithm, MUST be unique per encryption)
    /// * `aad` - Additional authenticated data (can be empty)
    /// * `plaintext` - Data to encrypt
    ///
    /// # Returns
    ///
    /// Ciphertext with authentication tag appended.
    ///
    /// # Errors
    ///
    /// - `InvalidKeySize` if key size doesn't match
    /// - `InvalidNonceSize` if nonce size doesn't match
    fn seal(&self, key: &[u8], nonce: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt and verify ciphertext.
    ///
    /// # Arguments
    ///
    /// * `key` - Decryption key (size must match algorithm)
    /// * `nonce` - Nonce (size must match algorithm)
    /// * `aad` - Additional authenticated data (must match what was used in encryption)
    /// * `ciphertext` - Ciphertext with authentication tag appended
    ///
    /// # Errors
    ///
    /// - `InvalidKeySize` if key size doesn't match
    /// - `InvalidNonceSize` if nonce size doesn't match
    /// - `AuthenticationFailed` if tag verification fails
    fn open(&self, key: &[u8], nonce: &[u8], aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>;

    /// Get the algorithm this cipher implements.
    fn algorithm(&self) -> AeadAlgorithm;

    /// Get the key size in bytes.
    fn key_size(&self) -> usize {
        self.algorithm().key_size()
    }

    /// Get the nonce size in bytes.
    fn nonce_size(&self) -> usize {
        self.algorithm().nonce_size()
    }

    /// Get the authentication tag size in bytes.
    fn tag_size(&self) -> usize {
        self.algorithm().tag_size()
    }
}
