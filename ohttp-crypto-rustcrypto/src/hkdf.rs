//! HKDF implementations using the `hkdf` and `sha2` crates.

use hkdf::Hkdf;
use ohttp_crypto::{Error, Kdf, KdfAlgorithm, Result};
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

/// Create a KDF instance for the specified algorithm.
pub fn create_kdf(algorithm: KdfAlgorithm) -> Result<Box<dyn Kdf>> {
    match algorithm {
        KdfAlgorithm::HkdfSha256 => Ok(Box::new(HkdfSha256Impl)),
        KdfAlgorithm::HkdfSha384 => Ok(Box::new(HkdfSha384Impl)),
        KdfAlgorithm::HkdfSha512 => Ok(Box::new(HkdfSha512Impl)),
    }
}

macro_rules! hkdf_impl {
    ($name:ident, $digest:ty, $algorithm:expr) => {
        #[derive(Debug, Clone, Copy)]
        struct $name;

        impl Kdf for $name {
            fn extract(&self, salt: &[u8], ikm: &[u8]) -> Zeroizing<Vec<u8>> {
                let (prk, _) = Hkdf::<$digest>::extract(Some(salt), ikm);
                Zeroizing::new(prk.to_vec())
            }

            fn expand(&self, prk: &[u8], info: &[u8], length: usize) -> Result<Zeroizing<Vec<u8>>> {
                let hkdf = Hkdf::<$digest>::from_prk(prk).map_err(|_| Error::InvalidKeySize {
                    expected: $algorithm.output_size(),
                    actual: prk.len(),
                })?;
                let mut output = Zeroizing::new(vec![0u8; length]);
                hkdf.expand(info, &mut output)
                    .map_err(|_| Error::InvalidLength)?;
                Ok(output)
            }

            fn algorithm(&self) -> KdfAlgorithm {
                $algorithm
            }
        }
    };
}

hkdf_impl!(HkdfSha256Impl, Sha256, KdfAlgorithm::HkdfSha256);
hkdf_impl!(HkdfSha384Impl, Sha384, KdfAlgorithm::HkdfSha384);
hkdf_impl!(HkdfSha512Impl, Sha512, KdfAlgorithm::HkdfSha512);
