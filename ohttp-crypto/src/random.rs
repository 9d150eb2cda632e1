//! Cryptographically Secure Random Number Generator (CSPRNG) interface.

use crate::Result;

/// Random number generator trait.
///
/// OHTTP draws the response nonce from this generator, so it must be a CSPRNG seeded from the
/// operating system.
///
/// # Example
///
/// ```rust,no_run
/// use ohttp_crypto::Random;
///
/// fn response_nonce(rng: &dyn Random) -> Vec<u8> {
///     rng.generate(16).unwrap()
/// }
/// ```
pub trait Random: Send + Sync {
    /// Fill a buffer with random bytes.
    ///
    /// # Errors
    ///
    /// Returns error if random generation fails (e.g., OS RNG unavailable).
    fn fill(&self, dest: &mut [u8]) -> Result<()>;

    /// Generate a random byte vector of specified length.
    fn generate(&self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.fill(&mut buf)?;
        Ok(buf)
    }
}
