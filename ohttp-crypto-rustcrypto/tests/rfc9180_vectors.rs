//! RFC 9180 Appendix A Known-Answer Tests
//!
//! Runs the base-mode recipient side of the published vectors through the provider:
//! the first sealed message must open and the exporter must reproduce the listed secret.

use ohttp_crypto::{AeadAlgorithm, CryptoProvider, HpkeCipherSuite, HpkeKem, KdfAlgorithm};
use ohttp_crypto_rustcrypto::RustCryptoProvider;

const INFO: &str = "4f6465206f6e2061204772656369616e2055726e";
const PLAINTEXT: &str = "4265617574792069732074727574682c20747275746820626561757479";
const AAD_SEQ_0: &str = "436f756e742d30";
const EXPORTER_CONTEXT: &str = "54657374436f6e74657874";

struct Vector {
    suite: HpkeCipherSuite,
    sk_r: &'static str,
    enc: &'static str,
    ciphertext: &'static str,
    exported: &'static str,
}

fn check(vector: &Vector) {
    let provider = RustCryptoProvider::new();
    let hpke = provider.hpke(vector.suite).unwrap();

    let mut context = hpke
        .setup_base_recipient(
            &hex::decode(vector.enc).unwrap(),
            &hex::decode(vector.sk_r).unwrap(),
            &hex::decode(INFO).unwrap(),
        )
        .unwrap();

    let plaintext = context
        .open(
            &hex::decode(AAD_SEQ_0).unwrap(),
            &hex::decode(vector.ciphertext).unwrap(),
        )
        .unwrap();
    assert_eq!(hex::encode(plaintext), PLAINTEXT);

    let exported = context
        .export(&hex::decode(EXPORTER_CONTEXT).unwrap(), 32)
        .unwrap();
    assert_eq!(hex::encode(&exported[..]), vector.exported);
}

// A.1: DHKEM(X25519, HKDF-SHA256), HKDF-SHA256, AES-128-GCM
#[test]
fn test_x25519_sha256_aes128gcm() {
    check(&Vector {
        suite: HpkeCipherSuite::new(
            HpkeKem::DhkemX25519HkdfSha256,
            KdfAlgorithm::HkdfSha256,
            AeadAlgorithm::Aes128Gcm,
        ),
        sk_r: "4612c550263fc8ad58375df3f557aac531d26850903e55a9f23f21d8534e8ac8",
        enc: "37fda3567bdbd628e88668c3c8d7e97d1d1253b6d4ea6d44c150f741f1bf4431",
        ciphertext: "f938558b5d72f1a23810b4be2ab4f84331acc02fc97babc53a52ae8218a355a96d8770ac83d07bea87e13c512a",
        exported: "e9e43065102c3836401bed8c3c3c75ae46be1639869391d62c61f1ec7af54931",
    });
}

// A.2: DHKEM(X25519, HKDF-SHA256), HKDF-SHA256, ChaCha20-Poly1305
#[test]
fn test_x25519_sha256_chacha20poly1305() {
    check(&Vector {
        suite: HpkeCipherSuite::new(
            HpkeKem::DhkemX25519HkdfSha256,
            KdfAlgorithm::HkdfSha256,
            AeadAlgorithm::ChaCha20Poly1305,
        ),
        sk_r: "8057991eef8f1f1af18f4a9491d16a1ce333f695d4db8e38da75975c4478e0fb",
        enc: "1afa08d3dec047a643885163f1180476fa7ddb54c6a8029ea33f95796bf2ac4a",
        ciphertext: "1c5250d8034ec2b784ba2cfd69dbdb8af406cfe3ff938e131f0def8c8b60b4db21993c62ce81883d2dd1b51a28",
        exported: "5acb09211139c43b3090489a9da433e8a30ee7188ba8b0a9a1ccf0c229283e53",
    });
}

// A.3: DHKEM(P-256, HKDF-SHA256), HKDF-SHA256, AES-128-GCM
#[test]
fn test_p256_sha256_aes128gcm() {
    check(&Vector {
        suite: HpkeCipherSuite::new(
            HpkeKem::DhkemP256HkdfSha256,
            KdfAlgorithm::HkdfSha256,
            AeadAlgorithm::Aes128Gcm,
        ),
        sk_r: "f3ce7fdae57e1a310d87f1ebbde6f328be0a99cdbcadf4d6589cf29de4b8ffd2",
        enc: "04a92719c6195d5085104f469a8b9814d5838ff72b60501e2c4466e5e67b325ac98536d7b61a1af4b78e5b7f951c0900be863c403ce65c9bfcb9382657222d18c4",
        ciphertext: "5ad590bb8baa577f8619db35a36311226a896e7342a6d836d8b7bcd2f20b6c7f9076ac232e3ab2523f39513434",
        exported: "d8f1ea7942adbba7412c6d431c62d01371ea476b823eb697e1f6e6cae1dab85a",
    });
}

#[test]
fn test_wrong_aad_fails() {
    let provider = RustCryptoProvider::new();
    let hpke = provider
        .hpke(HpkeCipherSuite::new(
            HpkeKem::DhkemX25519HkdfSha256,
            KdfAlgorithm::HkdfSha256,
            AeadAlgorithm::Aes128Gcm,
        ))
        .unwrap();
    let mut context = hpke
        .setup_base_recipient(
            &hex::decode("37fda3567bdbd628e88668c3c8d7e97d1d1253b6d4ea6d44c150f741f1bf4431").unwrap(),
            &hex::decode("4612c550263fc8ad58375df3f557aac531d26850903e55a9f23f21d8534e8ac8").unwrap(),
            &hex::decode(INFO).unwrap(),
        )
        .unwrap();

    let ciphertext = hex::decode(
        "f938558b5d72f1a23810b4be2ab4f84331acc02fc97babc53a52ae8218a355a96d8770ac83d07bea87e13c512a",
    )
    .unwrap();
    assert!(context.open(b"Count-1", &ciphertext).is_err());
}
