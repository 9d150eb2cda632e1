//! Mock HPKE with a hash-based "KEM".
//!
//! `pk = H("pk" || sk)` and the shared secret is `H("shared" || enc || pk_r)`, so both sides can
//! compute it. The key schedule and AEAD reuse the mock symmetric primitives.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use ohttp_crypto::{Aead, Error, Hpke, HpkeCipherSuite, HpkeContext, Result};
use zeroize::Zeroizing;

use crate::symmetric::MockAead;
use crate::{hash, stretch};

/// Mock HPKE instance for one cipher suite.
#[derive(Debug)]
pub struct MockHpke {
    cipher_suite: HpkeCipherSuite,
    seed: [u8; 8],
    counter: AtomicU64,
    live_contexts: Arc<AtomicUsize>,
}

impl MockHpke {
    pub(crate) fn new(
        cipher_suite: HpkeCipherSuite,
        seed: [u8; 8],
        live_contexts: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            cipher_suite,
            seed,
            counter: AtomicU64::new(0),
            live_contexts,
        }
    }

    fn fresh_secret(&self, label: &[u8]) -> Vec<u8> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        stretch(
            &[&self.seed[..], &n.to_be_bytes()].concat(),
            label,
            self.cipher_suite.kem.private_key_len(),
        )
    }

    fn public_key(&self, sk: &[u8]) -> Vec<u8> {
        stretch(sk, b"pk", self.cipher_suite.kem.public_key_len())
    }

    fn context(&self, enc: &[u8], pk_r: &[u8], info: &[u8]) -> MockHpkeContext {
        let shared = hash(&[b"shared", enc, pk_r]);
        let schedule = hash(&[b"schedule", &shared, &(info.len() as u64).to_be_bytes(), info]);
        let aead = self.cipher_suite.aead;

        self.live_contexts.fetch_add(1, Ordering::SeqCst);
        MockHpkeContext {
            aead: MockAead::new(aead),
            key: Zeroizing::new(stretch(&schedule, b"key", aead.key_size())),
            base_nonce: stretch(&schedule, b"base_nonce", aead.nonce_size()),
            exporter_secret: Zeroizing::new(stretch(&schedule, b"exp", 64)),
            sequence: 0,
            live_contexts: Arc::clone(&self.live_contexts),
        }
    }
}

impl Hpke for MockHpke {
    fn cipher_suite(&self) -> HpkeCipherSuite {
        self.cipher_suite
    }

    fn generate_keypair(&self) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>)> {
        let sk = self.fresh_secret(b"sk");
        let pk = self.public_key(&sk);
        Ok((Zeroizing::new(sk), pk))
    }

    fn setup_base_sender(
        &self,
        pk_r: &[u8],
        info: &[u8],
    ) -> Result<(Vec<u8>, Box<dyn HpkeContext>)> {
        if pk_r.len() != self.cipher_suite.kem.public_key_len() {
            return Err(Error::InvalidPublicKey);
        }

        let ephemeral = self.fresh_secret(b"ephemeral");
        let enc = self.public_key(&ephemeral);
        let ctx = self.context(&enc, pk_r, info);
        Ok((enc, Box::new(ctx)))
    }

    fn setup_base_recipient(
        &self,
        enc: &[u8],
        sk_r: &[u8],
        info: &[u8],
    ) -> Result<Box<dyn HpkeContext>> {
        if enc.len() != self.cipher_suite.nenc() {
            return Err(Error::ContextSetupFailed(format!(
                "encapsulated key must be {} bytes, got {}",
                self.cipher_suite.nenc(),
                enc.len()
            )));
        }
        if sk_r.len() != self.cipher_suite.kem.private_key_len() {
            return Err(Error::InvalidPrivateKey);
        }

        let pk_r = self.public_key(sk_r);
        Ok(Box::new(self.context(enc, &pk_r, info)))
    }
}

/// Mock HPKE context; decrements the provider's live counter on drop.
struct MockHpkeContext {
    aead: MockAead,
    key: Zeroizing<Vec<u8>>,
    base_nonce: Vec<u8>,
    exporter_secret: Zeroizing<Vec<u8>>,
    sequence: u64,
    live_contexts: Arc<AtomicUsize>,
}

impl MockHpkeContext {
    fn next_nonce(&mut self) -> Vec<u8> {
        let mut nonce = self.base_nonce.clone();
        let seq = self.sequence.to_be_bytes();
        let offset = nonce.len() - seq.len();
        for (n, s) in nonce[offset..].iter_mut().zip(seq) {
            *n ^= s;
        }
        self.sequence += 1;
        nonce
    }
}

impl HpkeContext for MockHpkeContext {
    fn seal(&mut self, aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = self.next_nonce();
        self.aead.seal(&self.key, &nonce, aad, plaintext)
    }

    fn open(&mut self, aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        let nonce = self.next_nonce();
        self.aead.open(&self.key, &nonce, aad, ciphertext)
    }

    fn export(&self, exporter_context: &[u8], length: usize) -> Result<Zeroizing<Vec<u8>>> {
        Ok(Zeroizing::new(stretch(
            &self.exporter_secret,
            exporter_context,
            length,
        )))
    }
}

impl Drop for MockHpkeContext {
    fn drop(&mut self) {
        self.live_contexts.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockCryptoProvider;
    use ohttp_crypto::{AeadAlgorithm, CryptoProvider, HpkeKem, KdfAlgorithm};

    fn suite() -> HpkeCipherSuite {
        HpkeCipherSuite::new(
            HpkeKem::DhkemX25519HkdfSha256,
            KdfAlgorithm::HkdfSha256,
            AeadAlgorithm::Aes128Gcm,
        )
    }

    #[test]
    fn test_sender_recipient_agree() {
        let provider = MockCryptoProvider::new();
        let hpke = provider.hpke(suite()).unwrap();
        let (sk, pk) = hpke.generate_keypair().unwrap();

        let (enc, mut sender) = hpke.setup_base_sender(&pk, b"info").unwrap();
        let mut recipient = hpke.setup_base_recipient(&enc, &sk, b"info").unwrap();

        let ct = sender.seal(b"", b"ping").unwrap();
        assert_eq!(recipient.open(b"", &ct).unwrap(), b"ping");
        assert_eq!(
            sender.export(b"label", 16).unwrap(),
            recipient.export(b"label", 16).unwrap()
        );
    }

    #[test]
    fn test_wrong_key_fails_open() {
        let provider = MockCryptoProvider::new();
        let hpke = provider.hpke(suite()).unwrap();
        let (_, pk) = hpke.generate_keypair().unwrap();
        let (other_sk, _) = hpke.generate_keypair().unwrap();

        let (enc, mut sender) = hpke.setup_base_sender(&pk, b"info").unwrap();
        let ct = sender.seal(b"", b"ping").unwrap();
        let mut recipient = hpke.setup_base_recipient(&enc, &other_sk, b"info").unwrap();
        assert_eq!(recipient.open(b"", &ct).unwrap_err(), Error::AuthenticationFailed);
    }

    #[test]
    fn test_private_key_length_checked() {
        let provider = MockCryptoProvider::new();
        let hpke = provider.hpke(suite()).unwrap();
        let (sk, pk) = hpke.generate_keypair().unwrap();
        assert_eq!(sk.len(), 32);

        let (enc, _) = hpke.setup_base_sender(&pk, b"").unwrap();
        let result = hpke.setup_base_recipient(&enc, &sk[..31], b"");
        assert_eq!(result.err(), Some(Error::InvalidPrivateKey));
    }

    #[test]
    fn test_live_context_tracking() {
        let provider = MockCryptoProvider::new();
        let hpke = provider.hpke(suite()).unwrap();
        let (_, pk) = hpke.generate_keypair().unwrap();

        let (_, ctx) = hpke.setup_base_sender(&pk, b"").unwrap();
        assert_eq!(provider.live_contexts(), 1);
        drop(ctx);
        assert_eq!(provider.live_contexts(), 0);
    }
}
