//! Mock KDF and AEAD built from SHA-512.

use ohttp_crypto::{Aead, AeadAlgorithm, Error, Kdf, KdfAlgorithm, Result};
use zeroize::Zeroizing;

use crate::{hash, stretch};

/// Mock HKDF: extract is a salted hash, expand is counter-mode hashing.
#[derive(Debug, Clone, Copy)]
pub struct MockKdf {
    algorithm: KdfAlgorithm,
}

impl MockKdf {
    /// Create a mock KDF reporting `algorithm`'s output size.
    pub fn new(algorithm: KdfAlgorithm) -> Self {
        Self { algorithm }
    }
}

impl Kdf for MockKdf {
    fn extract(&self, salt: &[u8], ikm: &[u8]) -> Zeroizing<Vec<u8>> {
        let prk = hash(&[b"extract", &(salt.len() as u64).to_be_bytes(), salt, ikm]);
        Zeroizing::new(prk[..self.algorithm.output_size()].to_vec())
    }

    fn expand(&self, prk: &[u8], info: &[u8], length: usize) -> Result<Zeroizing<Vec<u8>>> {
        if length > 255 * self.algorithm.output_size() {
            return Err(Error::InvalidLength);
        }
        Ok(Zeroizing::new(stretch(prk, info, length)))
    }

    fn algorithm(&self) -> KdfAlgorithm {
        self.algorithm
    }
}

/// Mock AEAD: hash keystream XOR plus a 16-byte hash tag.
#[derive(Debug, Clone, Copy)]
pub struct MockAead {
    algorithm: AeadAlgorithm,
}

impl MockAead {
    /// Create a mock AEAD with `algorithm`'s key, nonce and tag sizes.
    pub fn new(algorithm: AeadAlgorithm) -> Self {
        Self { algorithm }
    }

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

    fn tag(&self, key: &[u8], nonce: &[u8], aad: &[u8], body: &[u8]) -> Vec<u8> {
        let tag = hash(&[b"tag", key, nonce, &(aad.len() as u64).to_be_bytes(), aad, body]);
        tag[..self.algorithm.tag_size()].to_vec()
    }
}

pub(crate) fn xor_keystream(key: &[u8], nonce: &[u8], data: &[u8]) -> Vec<u8> {
    let mut seed = key.to_vec();
    seed.extend_from_slice(nonce);
    let stream = stretch(&seed, b"keystream", data.len());
    data.iter().zip(stream).map(|(d, k)| d ^ k).collect()
}

impl Aead for MockAead {
    fn seal(&self, key: &[u8], nonce: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        self.check_sizes(key, nonce)?;
        let mut out = xor_keystream(key, nonce, plaintext);
        let tag = self.tag(key, nonce, aad, &out);
        out.extend_from_slice(&tag);
        Ok(out)
    }

    fn open(&self, key: &[u8], nonce: &[u8], aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.check_sizes(key, nonce)?;
        let body_len = ciphertext
            .len()
            .checked_sub(self.algorithm.tag_size())
            .ok_or(Error::AuthenticationFailed)?;
        let (body, tag) = ciphertext.split_at(body_len);
        if self.tag(key, nonce, aad, body) != tag {
            return Err(Error::AuthenticationFailed);
        }
        Ok(xor_keystream(key, nonce, body))
    }

    fn algorithm(&self) -> AeadAlgorithm {
        self.algorithm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_aead_round_trip() {
        let aead = MockAead::new(AeadAlgorithm::Aes128Gcm);
        let ct = aead.seal(&[1; 16], &[2; 12], b"aad", b"hello").unwrap();
        assert_eq!(ct.len(), 5 + 16);
        assert_eq!(aead.open(&[1; 16], &[2; 12], b"aad", &ct).unwrap(), b"hello");
    }

    #[test]
    fn test_mock_aead_rejects_tampering() {
        let aead = MockAead::new(AeadAlgorithm::ChaCha20Poly1305);
        let mut ct = aead.seal(&[1; 32], &[2; 12], b"", b"hello").unwrap();
        ct[0] ^= 0x80;
        assert_eq!(
            aead.open(&[1; 32], &[2; 12], b"", &ct).unwrap_err(),
            Error::AuthenticationFailed
        );
        assert_eq!(
            aead.open(&[1; 32], &[2; 12], b"", &[0; 3]).unwrap_err(),
            Error::AuthenticationFailed
        );
    }

    #[test]
    fn test_mock_kdf_sizes() {
        let kdf = MockKdf::new(KdfAlgorithm::HkdfSha384);
        assert_eq!(kdf.extract(b"salt", b"ikm").len(), 48);
        assert_eq!(kdf.expand(&[0; 48], b"key", 32).unwrap().len(), 32);
        assert_eq!(kdf.expand(&[0; 48], b"key", 255 * 48 + 1).unwrap_err(), Error::InvalidLength);
    }
}
