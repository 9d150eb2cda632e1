//! AEAD cipher implementations using the `aes-gcm` and `chacha20poly1305` crates.

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead as AeadCipher, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm};
use chacha20poly1305::ChaCha20Poly1305;
use ohttp_crypto::{Aead, AeadAlgorithm, Error, Result};

/// Create an AEAD cipher instance for the specified algorithm.
pub fn create_aead(algorithm: AeadAlgorithm) -> Result<Box<dyn Aead>> {
    Ok(Box::new(RustCryptoAead { algorithm }))
}

/// AEAD cipher dispatching to the RustCrypto implementation of `algorithm`.
///
/// All supported algorithms use a 12-byte nonce and a 16-byte tag.
#[derive(Debug)]
struct RustCryptoAead {
    algorithm: AeadAlgorithm,
}

impl RustCryptoAead {
    fn check_sizes(&self, key: &[u8], nonce: &[u8]) -> Result<()> {
        if key.len() != self.algorithm.key_size() {
            return Err(Error::InvalidKeySize {
                expected: self.algorithm.key_size(),
                actual: key.len(),
            });
        }

        if nonce.len() != self.algorithm.nonce_size() {
            return Err(Error::InvalidNonceSize {
                expected: self.algorithm.nonce_size(),
                actual: nonce.len(),
            });
        }

        Ok(())
    }
}

fn seal_with<C: KeyInit + AeadCipher>(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let cipher = C::new_from_slice(key).map_err(|_| Error::InvalidKeySize {
        expected: C::key_size(),
        actual: key.len(),
    })?;
    cipher
        .encrypt(
            GenericArray::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| Error::EncryptionFailed)
}

fn open_with<C: KeyInit + AeadCipher>(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let cipher = C::new_from_slice(key).map_err(|_| Error::InvalidKeySize {
        expected: C::key_size(),
        actual: key.len(),
    })?;
    cipher
        .decrypt(
            GenericArray::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| Error::AuthenticationFailed)
}

impl Aead for RustCryptoAead {
    fn seal(&self, key: &[u8], nonce: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        self.check_sizes(key, nonce)?;

        match self.algorithm {
            AeadAlgorithm::Aes128Gcm => seal_with::<Aes128Gcm>(key, nonce, aad, plaintext),
            AeadAlgorithm::Aes256Gcm => seal_with::<Aes256Gcm>(key, nonce, aad, plaintext),
            AeadAlgorithm::ChaCha20Poly1305 => {
                seal_with::<ChaCha20Poly1305>(key, nonce, aad, plaintext)
            },
        }
    }

    fn open(&self, key: &[u8], nonce: &[u8], aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.check_sizes(key, nonce)?;

        if ciphertext.len() < self.algorithm.tag_size() {
            return Err(Error::AuthenticationFailed);
        }

        match self.algorithm {
            AeadAlgorithm::Aes128Gcm => open_with::<Aes128Gcm>(key, nonce, aad, ciphertext),
            AeadAlgorithm::Aes256Gcm => open_with::<Aes256Gcm>(key, nonce, aad, ciphertext),
            AeadAlgorithm::ChaCha20Poly1305 => {
                open_with::<ChaCha20Poly1305>(key, nonce, aad, ciphertext)
            },
        }
    }

    fn algorithm(&self) -> AeadAlgorithm {
        self.algorithm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_all_algorithms() {
        for algorithm in [
            AeadAlgorithm::Aes128Gcm,
            AeadAlgorithm::Aes256Gcm,
            AeadAlgorithm::ChaCha20Poly1305,
        ] {
            let aead = create_aead(algorithm).unwrap();

            let key = vec![7u8; algorithm.key_size()];
            let nonce = vec![1u8; algorithm.nonce_size()];
            let plaintext = b"secret message";

            let ciphertext = aead.seal(&key, &nonce, b"", plaintext).unwrap();
            assert_eq!(ciphertext.len(), plaintext.len() + 16); // +16 for tag

            let decrypted = aead.open(&key, &nonce, b"", &ciphertext).unwrap();
            assert_eq!(decrypted, plaintext);
        }
    }

    // Test case 1 from the GCM specification (McGrew & Viega).
    #[test]
    fn test_aes128gcm_empty_plaintext_vector() {
        let aead = create_aead(AeadAlgorithm::Aes128Gcm).unwrap();
        let ciphertext = aead.seal(&[0u8; 16], &[0u8; 12], &[], &[]).unwrap();
        assert_eq!(hex::encode(ciphertext), "58e2fccefa7e3061367f1d57a4e7455a");
    }

    #[test]
    fn test_authentication_failure() {
        let aead = create_aead(AeadAlgorithm::Aes128Gcm).unwrap();

        let key = [0u8; 16];
        let nonce = [0u8; 12];
        let plaintext = b"secret message";

        let mut ciphertext = aead.seal(&key, &nonce, b"", plaintext).unwrap();

        // Corrupt the tag
        let len = ciphertext.len();
        ciphertext[len - 1] ^= 1;

        let result = aead.open(&key, &nonce, b"", &ciphertext);
        assert_eq!(result.unwrap_err(), Error::AuthenticationFailed);
    }

    #[test]
    fn test_truncated_ciphertext() {
        let aead = create_aead(AeadAlgorithm::ChaCha20Poly1305).unwrap();
        let result = aead.open(&[0u8; 32], &[0u8; 12], b"", &[0u8; 15]);
        assert_eq!(result.unwrap_err(), Error::AuthenticationFailed);
    }

    #[test]
    fn test_invalid_key_size() {
        let aead = create_aead(AeadAlgorithm::Aes128Gcm).unwrap();

        let key = [0u8; 32]; // Wrong size
        let nonce = [0u8; 12];

        let result = aead.seal(&key, &nonce, &[], b"test");
        assert!(matches!(
            result,
            Err(Error::InvalidKeySize {
                expected: 16,
                actual: 32
            })
        ));
    }

    #[test]
    fn test_invalid_nonce_size() {
        let aead = create_aead(AeadAlgorithm::Aes256Gcm).unwrap();

        let key = [0u8; 32];
        let nonce = [0u8; 16]; // Wrong size

        let result = aead.seal(&key, &nonce, &[], b"test");
        assert!(matches!(result, Err(Error::InvalidNonceSize { .. })));
    }
}
