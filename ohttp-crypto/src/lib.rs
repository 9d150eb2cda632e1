//! # OHTTP Cryptographic Provider Interface
//!
//! This crate defines the cryptographic abstraction layer used by the OHTTP protocol engine.
//! It provides trait-based interfaces so that the engine never depends on a concrete
//! cryptographic library.
//!
//! ## Design Goals
//!
//! 1. **Pluggable:** Any backend (RustCrypto, aws-lc-rs, a platform keystore) can be used
//! 2. **Injectable:** The provider is passed explicitly, there is no global instance
//! 3. **Scoped state:** HPKE contexts are owned values released when dropped
//!
//! ## Architecture
//!
//! ```text
//! CryptoProvider (main trait)
//! ├── Hpke (RFC 9180 base mode: sender/recipient setup, key generation)
//! │   └── HpkeContext (seal, open, export)
//! ├── Aead (AES-GCM, ChaCha20-Poly1305)
//! ├── Kdf (HKDF extract/expand)
//! └── Random (CSPRNG)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use ohttp_crypto::{AeadAlgorithm, CryptoProvider, Error};
//!
//! fn example(provider: &dyn CryptoProvider) -> Result<(), Error> {
//!     let aead = provider.aead(AeadAlgorithm::Aes128Gcm)?;
//!
//!     let ciphertext = aead.seal(key, nonce, aad, plaintext)?;
//!     let plaintext = aead.open(key, nonce, aad, &ciphertext)?;
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_qualifications,
    missing_debug_implementations
)]

pub mod aead;
pub mod error;
pub mod hpke;
pub mod kdf;
pub mod random;

pub use aead::{Aead, AeadAlgorithm};
pub use error::{Error, Result};
pub use hpke::{Hpke, HpkeCipherSuite, HpkeContext, HpkeKem};
pub use kdf::{Kdf, KdfAlgorithm};
pub use random::Random;

/// The main cryptographic provider trait.
///
/// Implementations supply every primitive the OHTTP engine consumes. The trait is object-safe
/// so that callers can hold a `&dyn CryptoProvider` and swap in a test double.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Each operation creates its own HPKE context, so a
/// single provider can serve concurrent requests.
pub trait CryptoProvider: Send + Sync + 'static {
    /// Create a new instance of the crypto provider.
    fn new() -> Self
    where
        Self: Sized;

    /// Get an HPKE instance for a KEM/KDF/AEAD combination.
    ///
    /// # Arguments
    ///
    /// * `cipher_suite` - The HPKE cipher suite (KEM + KDF + AEAD combination)
    ///
    /// # Returns
    ///
    /// An HPKE instance, or an error if the cipher suite is not supported.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use ohttp_crypto::{AeadAlgorithm, CryptoProvider, HpkeCipherSuite, HpkeKem, KdfAlgorithm};
    ///
    /// let suite = HpkeCipherSuite::new(
    ///     HpkeKem::DhkemX25519HkdfSha256,
    ///     KdfAlgorithm::HkdfSha256,
    ///     AeadAlgorithm::Aes128Gcm,
    /// );
    /// let hpke = provider.hpke(suite)?;
    ///
    /// let (sk, pk) = hpke.generate_keypair()?;
    /// let (enc, mut sender) = hpke.setup_base_sender(&pk, b"info")?;
    /// let mut recipient = hpke.setup_base_recipient(&enc, &sk, b"info")?;
    /// ```
    fn hpke(&self, cipher_suite: HpkeCipherSuite) -> Result<Box<dyn Hpke>>;

    /// Get an AEAD cipher instance.
    ///
    /// # Arguments
    ///
    /// * `algorithm` - The AEAD algorithm to use
    ///
    /// # Returns
    ///
    /// An AEAD cipher instance, or an error if the algorithm is not supported.
    fn aead(&self, algorithm: AeadAlgorithm) -> Result<Box<dyn Aead>>;

    /// Get a KDF (Key Derivation Function) instance.
    ///
    /// # Arguments
    ///
    /// * `algorithm` - The KDF algorithm to use
    ///
    /// # Returns
    ///
    /// A KDF instance, or an error if the algorithm is not supported.
    fn kdf(&self, algorithm: KdfAlgorithm) -> Result<Box<dyn Kdf>>;

    /// Get the random number generator.
    ///
    /// # Returns
    ///
    /// A cryptographically secure random number generator.
    fn random(&self) -> &dyn Random;

    /// Check if the provider supports a specific HPKE cipher suite.
    ///
    /// This can be used to query capabilities without setting up a context.
    fn supports_hpke(&self, cipher_suite: HpkeCipherSuite) -> bool {
        self.hpke(cipher_suite).is_ok()
    }

    /// Check if the provider supports a specific AEAD algorithm.
    fn supports_aead(&self, algorithm: AeadAlgorithm) -> bool {
        self.aead(algorithm).is_ok()
    }

    /// Check if the provider supports a specific KDF algorithm.
    fn supports_kdf(&self, algorithm: KdfAlgorithm) -> bool {
        self.kdf(algorithm).is_ok()
    }
}
