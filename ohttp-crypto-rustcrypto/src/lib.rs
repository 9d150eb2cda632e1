//! # RustCrypto-based Cryptography Provider for OHTTP
//!
//! This crate provides a [`CryptoProvider`] implementation for the OHTTP protocol engine using
//! the RustCrypto crates and [hpke-rs](https://github.com/cryspen/hpke-rs) as the underlying
//! cryptographic backend.
//!
//! ## Supported Algorithms
//!
//! - **HPKE KEM**: DHKEM(X25519, HKDF-SHA256), DHKEM(P-256, HKDF-SHA256)
//! - **KDF**: HKDF-SHA256, HKDF-SHA384, HKDF-SHA512
//! - **AEAD**: AES-128-GCM, AES-256-GCM, ChaCha20-Poly1305
//! - **RNG**: Operating system CSPRNG
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ohttp_crypto::CryptoProvider;
//! use ohttp_crypto_rustcrypto::RustCryptoProvider;
//!
//! let provider = RustCryptoProvider::new();
//! ```

#![deny(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_qualifications,
    missing_debug_implementations
)]

use ohttp_crypto::{
    Aead, AeadAlgorithm, CryptoProvider, Hpke, HpkeCipherSuite, Kdf, KdfAlgorithm, Random, Result,
};

pub mod aead;
pub mod hkdf;
pub mod hpke_impl;
pub mod random;

use random::OsRandom;

/// Cryptography provider backed by RustCrypto and hpke-rs.
///
/// # Thread Safety
///
/// This provider is `Send + Sync` and can be safely shared across threads.
///
/// # Example
///
/// ```rust,no_run
/// use ohttp_crypto::CryptoProvider;
/// use ohttp_crypto_rustcrypto::RustCryptoProvider;
///
/// let provider = RustCryptoProvider::new();
/// ```
#[derive(Debug)]
pub struct RustCryptoProvider {
    /// Random number generator instance
    random: OsRandom,
}

impl Default for RustCryptoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoProvider for RustCryptoProvider {
    fn new() -> Self {
        Self { random: OsRandom }
    }

    fn hpke(&self, cipher_suite: HpkeCipherSuite) -> Result<Box<dyn Hpke>> {
        hpke_impl::create_hpke(cipher_suite)
    }

    fn aead(&self, algorithm: AeadAlgorithm) -> Result<Box<dyn Aead>> {
        aead::create_aead(algorithm)
    }

    fn kdf(&self, algorithm: KdfAlgorithm) -> Result<Box<dyn Kdf>> {
        hkdf::create_kdf(algorithm)
    }

    fn random(&self) -> &dyn Random {
        &self.random
    }
}
