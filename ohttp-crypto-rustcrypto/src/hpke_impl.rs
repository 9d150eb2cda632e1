//! HPKE implementation using hpke-rs with the RustCrypto backend.

use std::sync::Mutex;

use hpke_rs::{Hpke as HpkeRs, HpkePrivateKey, HpkePublicKey, Mode};
use hpke_rs_crypto::types::{
    AeadAlgorithm as HpkeRsAead, KdfAlgorithm as HpkeRsKdf, KemAlgorithm as HpkeRsKem,
};
use hpke_rs_rust_crypto::HpkeRustCrypto;
use ohttp_crypto::{
    AeadAlgorithm, Error, Hpke, HpkeCipherSuite, HpkeContext as HpkeContextTrait, HpkeKem,
    KdfAlgorithm, Result,
};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// Create an HPKE instance with the given cipher suite
pub fn create_hpke(cipher_suite: HpkeCipherSuite) -> Result<Box<dyn Hpke>> {
    Ok(Box::new(RustCryptoHpke::new(cipher_suite)?))
}

/// Wrapper for an hpke-rs context to implement our trait
struct RustCryptoHpkeContext {
    inner: Mutex<hpke_rs::Context<HpkeRustCrypto>>,
    aead: AeadAlgorithm,
}

impl RustCryptoHpkeContext {
    fn new(ctx: hpke_rs::Context<HpkeRustCrypto>, aead: AeadAlgorithm) -> Self {
        Self {
            inner: Mutex::new(ctx),
            aead,
        }
    }
}

impl HpkeContextTrait for RustCryptoHpkeContext {
    fn seal(&mut self, aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        let ctx = self
            .inner
            .get_mut()
            .map_err(|_| Error::Internal("HPKE context lock poisoned".into()))?;
        ctx.seal(aad, plaintext)
            .map_err(|e| Error::CryptoError(format!("HPKE seal failed: {:?}", e)))
    }

    fn open(&mut self, aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        let tag_size = self.aead.tag_size();
        let ctx = self
            .inner
            .get_mut()
            .map_err(|_| Error::Internal("HPKE context lock poisoned".into()))?;

        // hpke-rs-rust-crypto refuses ciphertexts that are only a tag. The tag of an empty
        // plaintext depends only on key, nonce and aad, so sealing "" at the same sequence
        // number reproduces it. The sequence number is consumed even when the tags differ.
        if ciphertext.len() == tag_size {
            let expected = ctx
                .seal(aad, &[])
                .map_err(|e| Error::CryptoError(format!("HPKE seal failed: {:?}", e)))?;
            if bool::from(expected.ct_eq(ciphertext)) {
                return Ok(Vec::new());
            }
            tracing::trace!("HPKE open failed: tag mismatch on empty plaintext");
            return Err(Error::AuthenticationFailed);
        }

        ctx.open(aad, ciphertext).map_err(|e| {
            tracing::trace!("HPKE open failed: {:?}", e);
            Error::AuthenticationFailed
        })
    }

    fn export(&self, exporter_context: &[u8], length: usize) -> Result<Zeroizing<Vec<u8>>> {
        let ctx = self
            .inner
            .lock()
            .map_err(|_| Error::Internal("HPKE context lock poisoned".into()))?;
        ctx.export(exporter_context, length)
            .map(Zeroizing::new)
            .map_err(|e| Error::ExportFailed(format!("{:?}", e)))
    }
}

/// HPKE implementation using hpke-rs
#[derive(Debug)]
pub struct RustCryptoHpke {
    cipher_suite: HpkeCipherSuite,
    kem: HpkeRsKem,
    kdf: HpkeRsKdf,
    aead: HpkeRsAead,
}

impl RustCryptoHpke {
    /// Create a new HPKE instance with the given cipher suite
    pub fn new(cipher_suite: HpkeCipherSuite) -> Result<Self> {
        // hpke-rs-rust-crypto only implements the X25519 and P-256 DHKEMs
        let kem = match cipher_suite.kem {
            HpkeKem::DhkemX25519HkdfSha256 => HpkeRsKem::DhKem25519,
            HpkeKem::DhkemP256HkdfSha256 => HpkeRsKem::DhKemP256,
            other => {
                return Err(Error::UnsupportedAlgorithm(format!(
                    "KEM {:?} not supported, only X25519 and P-256 are available",
                    other
                )))
            },
        };

        let kdf = match cipher_suite.kdf {
            KdfAlgorithm::HkdfSha256 => HpkeRsKdf::HkdfSha256,
            KdfAlgorithm::HkdfSha384 => HpkeRsKdf::HkdfSha384,
            KdfAlgorithm::HkdfSha512 => HpkeRsKdf::HkdfSha512,
        };

        let aead = match cipher_suite.aead {
            AeadAlgorithm::Aes128Gcm => HpkeRsAead::Aes128Gcm,
            AeadAlgorithm::Aes256Gcm => HpkeRsAead::Aes256Gcm,
            AeadAlgorithm::ChaCha20Poly1305 => HpkeRsAead::ChaCha20Poly1305,
        };

        Ok(Self {
            cipher_suite,
            kem,
            kdf,
            aead,
        })
    }

    // hpke-rs keeps its PRNG inside the instance and needs `&mut self` for sender setup and
    // key generation, so every operation gets its own instance.
    fn instance(&self) -> HpkeRs<HpkeRustCrypto> {
        HpkeRs::<HpkeRustCrypto>::new(Mode::Base, self.kem, self.kdf, self.aead)
    }

    fn check_enc(&self, enc: &[u8]) -> Result<()> {
        if enc.len() != self.cipher_suite.nenc() {
            return Err(Error::ContextSetupFailed(format!(
                "encapsulated key must be {} bytes, got {}",
                self.cipher_suite.nenc(),
                enc.len()
            )));
        }
        Ok(())
    }
}

impl Hpke for RustCryptoHpke {
    fn cipher_suite(&self) -> HpkeCipherSuite {
        self.cipher_suite
    }

    fn generate_keypair(&self) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>)> {
        let mut hpke = self.instance();
        let (sk, pk) = hpke
            .generate_key_pair()
            .map_err(|e| Error::CryptoError(format!("HPKE keypair generation failed: {:?}", e)))?
            .into_keys();
        Ok((Zeroizing::new(sk.as_slice().to_vec()), pk.as_slice().to_vec()))
    }

    fn setup_base_sender(
        &self,
        pk_r: &[u8],
        info: &[u8],
    ) -> Result<(Vec<u8>, Box<dyn HpkeContextTrait>)> {
        if pk_r.len() != self.cipher_suite.kem.public_key_len() {
            return Err(Error::InvalidPublicKey);
        }

        let mut hpke = self.instance();
        let pk_r = HpkePublicKey::new(pk_r.to_vec());
        let (enc, ctx) = hpke
            .setup_sender(&pk_r, info, None, None, None)
            .map_err(|e| Error::ContextSetupFailed(format!("setup_base_sender: {:?}", e)))?;

        Ok((enc, Box::new(RustCryptoHpkeContext::new(ctx, self.cipher_suite.aead))))
    }

    fn setup_base_recipient(
        &self,
        enc: &[u8],
        sk_r: &[u8],
        info: &[u8],
    ) -> Result<Box<dyn HpkeContextTrait>> {
        self.check_enc(enc)?;
        if sk_r.len() != self.cipher_suite.kem.private_key_len() {
            return Err(Error::InvalidPrivateKey);
        }

        let hpke = self.instance();
        let sk_r = HpkePrivateKey::new(sk_r.to_vec());
        let ctx = hpke
            .setup_receiver(enc, &sk_r, info, None, None, None)
            .map_err(|e| Error::ContextSetupFailed(format!("setup_base_recipient: {:?}", e)))?;

        Ok(Box::new(RustCryptoHpkeContext::new(ctx, self.cipher_suite.aead)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x25519_suite(aead: AeadAlgorithm) -> HpkeCipherSuite {
        HpkeCipherSuite::new(HpkeKem::DhkemX25519HkdfSha256, KdfAlgorithm::HkdfSha256, aead)
    }

    #[test]
    fn test_hpke_context() {
        let hpke = RustCryptoHpke::new(x25519_suite(AeadAlgorithm::Aes128Gcm)).unwrap();

        let (sk_r, pk_r) = hpke.generate_keypair().unwrap();
        assert_eq!(pk_r.len(), 32);
        let info = b"message/bhttp request\x00header";

        let (enc, mut sender_ctx) = hpke.setup_base_sender(&pk_r, info).unwrap();
        assert_eq!(enc.len(), 32);
        let mut recipient_ctx = hpke.setup_base_recipient(&enc, &sk_r, info).unwrap();

        let ct = sender_ctx.seal(&[], b"GET /").unwrap();
        let pt = recipient_ctx.open(&[], &ct).unwrap();
        assert_eq!(pt, b"GET /");
    }

    #[test]
    fn test_hpke_export() {
        let hpke = RustCryptoHpke::new(x25519_suite(AeadAlgorithm::ChaCha20Poly1305)).unwrap();

        let (sk_r, pk_r) = hpke.generate_keypair().unwrap();
        let info = b"session";

        let (enc, sender_ctx) = hpke.setup_base_sender(&pk_r, info).unwrap();
        let recipient_ctx = hpke.setup_base_recipient(&enc, &sk_r, info).unwrap();

        let context = b"message/bhttp response";
        let sender_secret = sender_ctx.export(context, 32).unwrap();
        let recipient_secret = recipient_ctx.export(context, 32).unwrap();

        assert_eq!(sender_secret, recipient_secret);
        assert_eq!(sender_secret.len(), 32);
    }

    #[test]
    fn test_p256_cipher_suite() {
        let suite = HpkeCipherSuite::new(
            HpkeKem::DhkemP256HkdfSha256,
            KdfAlgorithm::HkdfSha256,
            AeadAlgorithm::Aes256Gcm,
        );
        let hpke = RustCryptoHpke::new(suite).unwrap();

        let (sk_r, pk_r) = hpke.generate_keypair().unwrap();
        assert_eq!(pk_r.len(), 65);

        let (enc, mut sender_ctx) = hpke.setup_base_sender(&pk_r, b"").unwrap();
        assert_eq!(enc.len(), 65);
        let mut recipient_ctx = hpke.setup_base_recipient(&enc, &sk_r, b"").unwrap();

        let ct = sender_ctx.seal(b"", b"test with AES-256-GCM").unwrap();
        assert_eq!(recipient_ctx.open(b"", &ct).unwrap(), b"test with AES-256-GCM");
    }

    #[test]
    fn test_empty_plaintext_round_trip() {
        for aead in [
            AeadAlgorithm::Aes128Gcm,
            AeadAlgorithm::Aes256Gcm,
            AeadAlgorithm::ChaCha20Poly1305,
        ] {
            let hpke = RustCryptoHpke::new(x25519_suite(aead)).unwrap();
            let (sk_r, pk_r) = hpke.generate_keypair().unwrap();

            let (enc, mut sender_ctx) = hpke.setup_base_sender(&pk_r, b"info").unwrap();
            let mut recipient_ctx = hpke.setup_base_recipient(&enc, &sk_r, b"info").unwrap();

            let ct = sender_ctx.seal(b"", b"").unwrap();
            assert_eq!(ct.len(), aead.tag_size());
            assert!(recipient_ctx.open(b"", &ct).unwrap().is_empty());

            // Sequence numbers stay in step after an empty message
            let ct = sender_ctx.seal(b"", b"second").unwrap();
            assert_eq!(recipient_ctx.open(b"", &ct).unwrap(), b"second");
        }
    }

    #[test]
    fn test_empty_plaintext_tampering() {
        let hpke = RustCryptoHpke::new(x25519_suite(AeadAlgorithm::Aes128Gcm)).unwrap();
        let (sk_r, pk_r) = hpke.generate_keypair().unwrap();

        let (enc, mut sender_ctx) = hpke.setup_base_sender(&pk_r, b"info").unwrap();
        let mut ct = sender_ctx.seal(b"", b"").unwrap();
        ct[0] ^= 0x01;

        let mut recipient_ctx = hpke.setup_base_recipient(&enc, &sk_r, b"info").unwrap();
        assert_eq!(recipient_ctx.open(b"", &ct).unwrap_err(), Error::AuthenticationFailed);

        let mut recipient_ctx = hpke.setup_base_recipient(&enc, &sk_r, b"info").unwrap();
        ct[0] ^= 0x01;
        assert_eq!(recipient_ctx.open(b"other aad", &ct).unwrap_err(), Error::AuthenticationFailed);
    }

    #[test]
    fn test_wrong_key_fails_open() {
        let hpke = RustCryptoHpke::new(x25519_suite(AeadAlgorithm::Aes128Gcm)).unwrap();

        let (_, pk_r) = hpke.generate_keypair().unwrap();
        let (other_sk, _) = hpke.generate_keypair().unwrap();

        let (enc, mut sender_ctx) = hpke.setup_base_sender(&pk_r, b"info").unwrap();
        let ct = sender_ctx.seal(b"", b"secret").unwrap();

        let mut recipient_ctx = hpke.setup_base_recipient(&enc, &other_sk, b"info").unwrap();
        assert_eq!(recipient_ctx.open(b"", &ct).unwrap_err(), Error::AuthenticationFailed);
    }

    #[test]
    fn test_bad_enc_length() {
        let hpke = RustCryptoHpke::new(x25519_suite(AeadAlgorithm::Aes128Gcm)).unwrap();
        let (sk_r, _) = hpke.generate_keypair().unwrap();

        let result = hpke.setup_base_recipient(&[0u8; 31], &sk_r, b"info");
        assert!(matches!(result, Err(Error::ContextSetupFailed(_))));
    }

    #[test]
    fn test_bad_private_key_length() {
        let hpke = RustCryptoHpke::new(x25519_suite(AeadAlgorithm::Aes128Gcm)).unwrap();
        let (_, pk_r) = hpke.generate_keypair().unwrap();
        let (enc, _) = hpke.setup_base_sender(&pk_r, b"info").unwrap();

        let result = hpke.setup_base_recipient(&enc, &[0x11; 31], b"info");
        assert_eq!(result.err(), Some(Error::InvalidPrivateKey));
    }

    #[test]
    fn test_unsupported_kem() {
        let suite = HpkeCipherSuite::new(
            HpkeKem::DhkemX448HkdfSha512,
            KdfAlgorithm::HkdfSha512,
            AeadAlgorithm::Aes128Gcm,
        );
        assert!(matches!(
            RustCryptoHpke::new(suite),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }
}
