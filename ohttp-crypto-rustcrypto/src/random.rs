//! Cryptographically secure random number generation using the operating system RNG.

use ohttp_crypto::{Error, Random, Result};
use rand::rngs::OsRng;
use rand::RngCore;

/// Random number generator backed by [`OsRng`].
#[derive(Debug, Clone, Copy)]
pub struct OsRandom;

impl Random for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        OsRng.try_fill_bytes(dest).map_err(|e| {
            tracing::warn!("OS random number generator failed: {}", e);
            Error::RandomGenerationFailed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_generation() {
        let rng = OsRandom;

        let mut buf1 = [0u8; 32];
        let mut buf2 = [0u8; 32];

        rng.fill(&mut buf1).unwrap();
        rng.fill(&mut buf2).unwrap();

        // Should not be all zeros
        assert_ne!(&buf1[..], &[0u8; 32][..]);

        // Should generate different values
        assert_ne!(&buf1[..], &buf2[..]);
    }

    #[test]
    fn test_generate_length() {
        let rng = OsRandom;
        assert_eq!(rng.generate(32).unwrap().len(), 32);
        assert!(rng.generate(0).unwrap().is_empty());
    }
}
