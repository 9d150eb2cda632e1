//! Key Derivation Function (KDF) interface.

use zeroize::Zeroizing;

use crate::Result;

/// HKDF variants usable in an HPKE cipher suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KdfAlgorithm {
    /// HKDF with SHA-256
    HkdfSha256,
    /// HKDF with SHA-384
    HkdfSha384,
    /// HKDF with SHA-512
    HkdfSha512,
}

impl KdfAlgorithm {
    /// Output size of the underlying hash function (`Nh`).
    pub const fn output_size(self) -> usize {
        match self {
            KdfAlgorithm::HkdfSha256 => 32,
            KdfAlgorithm::HkdfSha384 => 48,
            KdfAlgorithm::HkdfSha512 => 64,
        }
    }

    /// Get the name of this KDF algorithm.
    pub const fn name(self) -> &'static str {
        match self {
            KdfAlgorithm::HkdfSha256 => "HKDF-SHA256",
            KdfAlgorithm::HkdfSha384 => "HKDF-SHA384",
            KdfAlgorithm::HkdfSha512 => "HKDF-SHA512",
        }
    }
}

/// KDF trait.
///
/// HKDF as defined in RFC 5869:
/// - Extract: `HKDF-Extract(salt, IKM) -> PRK`
/// - Expand: `HKDF-Expand(PRK, info, length) -> OKM`
///
/// # Example (HKDF)
///
/// ```rust,no_run
/// use ohttp_crypto::Kdf;
///
/// fn derive_key(kdf: &dyn Kdf) -> Vec<u8> {
///     let prk = kdf.extract(b"salt", b"input key material");
///     kdf.expand(&prk, b"key", 16).unwrap().to_vec()
/// }
/// ```
pub trait Kdf: Send + Sync {
    /// HKDF-Extract: Extract a pseudorandom key from input key material.
    ///
    /// # Arguments
    ///
    /// * `salt` - Salt (can be empty)
    /// * `ikm` - Input key material
    ///
    /// # Returns
    ///
    /// Pseudorandom key (PRK) of length `hash_output_size`
    fn extract(&self, salt: &[u8], ikm: &[u8]) -> Zeroizing<Vec<u8>>;

    /// HKDF-Expand: Expand a pseudorandom key to desired length.
    ///
    /// # Arguments
    ///
    /// * `prk` - Pseudorandom key from extract()
    /// * `info` - Context and application specific information
    /// * `length` - Desired output length in bytes
    ///
    /// # Errors
    ///
    /// Returns error if `length` is too large (> 255 * hash_output_size) or the PRK is
    /// shorter than the hash output.
    fn expand(&self, prk: &[u8], info: &[u8], length: usize) -> Result<Zeroizing<Vec<u8>>>;

    /// Get the KDF algorithm.
    fn algorithm(&self) -> KdfAlgorithm;

    /// Get the output size of the underlying hash function.
    fn hash_output_size(&self) -> usize {
        self.algorithm().output_size()
    }
}
