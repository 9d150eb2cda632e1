//! # Mock Cryptography Provider for OHTTP
//!
//! A deterministic [`CryptoProvider`] for tests. Every primitive is built from SHA-512 so that
//! results are reproducible and cheap to compute.
//!
//! **This provider offers no security whatsoever.** The "KEM" derives the shared secret from
//! public values only. Never use it outside of tests.
//!
//! Besides determinism the mock tracks how many HPKE contexts are alive, which lets tests check
//! that the engine releases its contexts on every exit path:
//!
//! ```rust
//! use ohttp_crypto::CryptoProvider;
//! use ohttp_crypto_mock::MockCryptoProvider;
//!
//! let provider = MockCryptoProvider::new();
//! assert_eq!(provider.live_contexts(), 0);
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_qualifications,
    missing_debug_implementations
)]

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use ohttp_crypto::{
    Aead, AeadAlgorithm, CryptoProvider, Hpke, HpkeCipherSuite, Kdf, KdfAlgorithm, Random, Result,
};
use sha2::{Digest, Sha512};

mod hpke;
mod symmetric;

pub use hpke::MockHpke;
pub use symmetric::{MockAead, MockKdf};

/// Deterministic test provider.
#[derive(Debug)]
pub struct MockCryptoProvider {
    random: MockRandom,
    live_contexts: Arc<AtomicUsize>,
}

impl MockCryptoProvider {
    /// Create a provider whose random generator always fills buffers with `byte`.
    pub fn with_fixed_random(byte: u8) -> Self {
        Self {
            random: MockRandom {
                fixed: Some(byte),
                counter: AtomicU64::new(0),
            },
            live_contexts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of HPKE contexts created by this provider that have not been dropped yet.
    pub fn live_contexts(&self) -> usize {
        self.live_contexts.load(Ordering::SeqCst)
    }
}

impl Default for MockCryptoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoProvider for MockCryptoProvider {
    fn new() -> Self {
        Self {
            random: MockRandom {
                fixed: None,
                counter: AtomicU64::new(0),
            },
            live_contexts: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn hpke(&self, cipher_suite: HpkeCipherSuite) -> Result<Box<dyn Hpke>> {
        Ok(Box::new(MockHpke::new(
            cipher_suite,
            self.next_seed(),
            Arc::clone(&self.live_contexts),
        )))
    }

    fn aead(&self, algorithm: AeadAlgorithm) -> Result<Box<dyn Aead>> {
        Ok(Box::new(MockAead::new(algorithm)))
    }

    fn kdf(&self, algorithm: KdfAlgorithm) -> Result<Box<dyn Kdf>> {
        Ok(Box::new(MockKdf::new(algorithm)))
    }

    fn random(&self) -> &dyn Random {
        &self.random
    }
}

impl MockCryptoProvider {
    fn next_seed(&self) -> [u8; 8] {
        self.random.counter.fetch_add(1, Ordering::SeqCst).to_be_bytes()
    }
}

/// Counter-based generator: block `i` is `SHA-512("mock random" || i)`.
#[derive(Debug)]
struct MockRandom {
    fixed: Option<u8>,
    counter: AtomicU64,
}

impl Random for MockRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        if let Some(byte) = self.fixed {
            dest.fill(byte);
            return Ok(());
        }

        for chunk in dest.chunks_mut(64) {
            let i = self.counter.fetch_add(1, Ordering::SeqCst);
            let block = Sha512::new()
                .chain_update(b"mock random")
                .chain_update(i.to_be_bytes())
                .finalize();
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
        Ok(())
    }
}

/// SHA-512 over the concatenation of `parts`.
pub(crate) fn hash(parts: &[&[u8]]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; 64];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Expand `seed` to `len` bytes with counter-mode SHA-512.
pub(crate) fn stretch(seed: &[u8], label: &[u8], len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut counter = 0u32;
    while out.len() < len {
        let block = hash(&[seed, label, &counter.to_be_bytes()]);
        let take = (len - out.len()).min(block.len());
        out.extend_from_slice(&block[..take]);
        counter += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_random() {
        let provider = MockCryptoProvider::with_fixed_random(0xAB);
        assert_eq!(provider.random().generate(4).unwrap(), vec![0xAB; 4]);
    }

    #[test]
    fn test_counter_random_advances() {
        let provider = MockCryptoProvider::new();
        let a = provider.random().generate(16).unwrap();
        let b = provider.random().generate(16).unwrap();
        assert_ne!(a, b);

        // Same sequence from a fresh provider.
        let again = MockCryptoProvider::new();
        assert_eq!(again.random().generate(16).unwrap(), a);
    }

    #[test]
    fn test_stretch_lengths() {
        assert_eq!(stretch(b"seed", b"label", 0).len(), 0);
        assert_eq!(stretch(b"seed", b"label", 100).len(), 100);
        assert_eq!(stretch(b"seed", b"label", 100)[..64], stretch(b"seed", b"label", 64)[..]);
    }
}
