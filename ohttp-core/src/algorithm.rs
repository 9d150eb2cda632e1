//! Algorithm registry.
//!
//! Maps the 16-bit identifiers carried in key configurations and message headers (RFC 9180
//! numbering) to static descriptors with the lengths the codecs need. Lookups fail closed:
//! an identifier that is not listed here is rejected with [`Error::UnsupportedAlgorithm`].
//!
//! | Kind | Id     | Algorithm                  | Npk/Nenc | Nk | Nn | Nh/Nt |
//! |------|--------|----------------------------|----------|----|----|-------|
//! | KEM  | 0x0010 | DHKEM(P-256, HKDF-SHA256)  | 65       |    |    |       |
//! | KEM  | 0x0011 | DHKEM(P-384, HKDF-SHA384)  | 97       |    |    |       |
//! | KEM  | 0x0012 | DHKEM(P-521, HKDF-SHA512)  | 133      |    |    |       |
//! | KEM  | 0x0020 | DHKEM(X25519, HKDF-SHA256) | 32       |    |    |       |
//! | KEM  | 0x0021 | DHKEM(X448, HKDF-SHA512)   | 56       |    |    |       |
//! | KDF  | 0x0001 | HKDF-SHA256                |          |    |    | 32    |
//! | KDF  | 0x0002 | HKDF-SHA384                |          |    |    | 48    |
//! | KDF  | 0x0003 | HKDF-SHA512                |          |    |    | 64    |
//! | AEAD | 0x0001 | AES-128-GCM                |          | 16 | 12 | 16    |
//! | AEAD | 0x0002 | AES-256-GCM                |          | 32 | 12 | 16    |
//! | AEAD | 0x0003 | ChaCha20-Poly1305          |          | 32 | 12 | 16    |
//!
//! The export-only AEAD (0xFFFF) is not registered since both directions of OHTTP seal data.

use ohttp_crypto::{
    Aead, AeadAlgorithm, CryptoProvider, HpkeCipherSuite, HpkeKem, Kdf, KdfAlgorithm,
};

use crate::error::{AlgorithmKind, Error, Result};

/// KEM descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KemSpec {
    /// Wire-format identifier
    pub id: u16,
    /// Human-readable name
    pub name: &'static str,
    /// Provider-level KEM
    pub kem: HpkeKem,
    /// Length of a serialized public key (`Npk`)
    pub public_key_length: usize,
    /// Length of the encapsulated key (`Nenc`)
    pub enc_length: usize,
}

/// KDF descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfSpec {
    /// Wire-format identifier
    pub id: u16,
    /// Human-readable name
    pub name: &'static str,
    /// Provider-level KDF
    pub algorithm: KdfAlgorithm,
    /// Hash output length (`Nh`)
    pub hash_length: usize,
}

impl KdfSpec {
    /// Obtain this KDF from `provider`.
    pub fn kdf(&self, provider: &dyn CryptoProvider) -> Result<Box<dyn Kdf>> {
        Ok(provider.kdf(self.algorithm)?)
    }
}

/// AEAD descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AeadSpec {
    /// Wire-format identifier
    pub id: u16,
    /// Human-readable name
    pub name: &'static str,
    /// Provider-level AEAD
    pub algorithm: AeadAlgorithm,
    /// Key length (`Nk`)
    pub key_length: usize,
    /// Nonce length (`Nn`)
    pub nonce_length: usize,
    /// Authentication tag length (`Nt`)
    pub tag_length: usize,
}

impl AeadSpec {
    /// Length of the nonce prefixed to an encapsulated response: `max(Nn, Nk)`.
    pub const fn response_nonce_length(&self) -> usize {
        if self.nonce_length > self.key_length {
            self.nonce_length
        } else {
            self.key_length
        }
    }

    /// Obtain this AEAD from `provider`.
    pub fn aead(&self, provider: &dyn CryptoProvider) -> Result<Box<dyn Aead>> {
        Ok(provider.aead(self.algorithm)?)
    }
}

/// DHKEM(P-256, HKDF-SHA256)
pub const DHKEM_P256_HKDF_SHA256: u16 = 0x0010;
/// DHKEM(P-384, HKDF-SHA384)
pub const DHKEM_P384_HKDF_SHA384: u16 = 0x0011;
/// DHKEM(P-521, HKDF-SHA512)
pub const DHKEM_P521_HKDF_SHA512: u16 = 0x0012;
/// DHKEM(X25519, HKDF-SHA256)
pub const DHKEM_X25519_HKDF_SHA256: u16 = 0x0020;
/// DHKEM(X448, HKDF-SHA512)
pub const DHKEM_X448_HKDF_SHA512: u16 = 0x0021;

/// HKDF-SHA256
pub const HKDF_SHA256: u16 = 0x0001;
/// HKDF-SHA384
pub const HKDF_SHA384: u16 = 0x0002;
/// HKDF-SHA512
pub const HKDF_SHA512: u16 = 0x0003;

/// AES-128-GCM
pub const AES_128_GCM: u16 = 0x0001;
/// AES-256-GCM
pub const AES_256_GCM: u16 = 0x0002;
/// ChaCha20-Poly1305
pub const CHACHA20_POLY1305: u16 = 0x0003;

const fn kem(id: u16, name: &'static str, kem: HpkeKem) -> KemSpec {
    KemSpec {
        id,
        name,
        kem,
        public_key_length: kem.public_key_len(),
        enc_length: kem.enc_len(),
    }
}

static KEMS: [KemSpec; 5] = [
    kem(DHKEM_P256_HKDF_SHA256, "DHKEM(P-256, HKDF-SHA256)", HpkeKem::DhkemP256HkdfSha256),
    kem(DHKEM_P384_HKDF_SHA384, "DHKEM(P-384, HKDF-SHA384)", HpkeKem::DhkemP384HkdfSha384),
    kem(DHKEM_P521_HKDF_SHA512, "DHKEM(P-521, HKDF-SHA512)", HpkeKem::DhkemP521HkdfSha512),
    kem(DHKEM_X25519_HKDF_SHA256, "DHKEM(X25519, HKDF-SHA256)", HpkeKem::DhkemX25519HkdfSha256),
    kem(DHKEM_X448_HKDF_SHA512, "DHKEM(X448, HKDF-SHA512)", HpkeKem::DhkemX448HkdfSha512),
];

static KDFS: [KdfSpec; 3] = [
    KdfSpec {
        id: HKDF_SHA256,
        name: "HKDF-SHA256",
        algorithm: KdfAlgorithm::HkdfSha256,
        hash_length: 32,
    },
    KdfSpec {
        id: HKDF_SHA384,
        name: "HKDF-SHA384",
        algorithm: KdfAlgorithm::HkdfSha384,
        hash_length: 48,
    },
    KdfSpec {
        id: HKDF_SHA512,
        name: "HKDF-SHA512",
        algorithm: KdfAlgorithm::HkdfSha512,
        hash_length: 64,
    },
];

static AEADS: [AeadSpec; 3] = [
    AeadSpec {
        id: AES_128_GCM,
        name: "AES-128-GCM",
        algorithm: AeadAlgorithm::Aes128Gcm,
        key_length: 16,
        nonce_length: 12,
        tag_length: 16,
    },
    AeadSpec {
        id: AES_256_GCM,
        name: "AES-256-GCM",
        algorithm: AeadAlgorithm::Aes256Gcm,
        key_length: 32,
        nonce_length: 12,
        tag_length: 16,
    },
    AeadSpec {
        id: CHACHA20_POLY1305,
        name: "ChaCha20-Poly1305",
        algorithm: AeadAlgorithm::ChaCha20Poly1305,
        key_length: 32,
        nonce_length: 12,
        tag_length: 16,
    },
];

/// Look up a KEM by wire identifier.
pub fn resolve_kem(id: u16) -> Result<&'static KemSpec> {
    KEMS.iter()
        .find(|spec| spec.id == id)
        .ok_or_else(|| Error::unsupported(AlgorithmKind::Kem, id))
}

/// Look up a KDF by wire identifier.
pub fn resolve_kdf(id: u16) -> Result<&'static KdfSpec> {
    KDFS.iter()
        .find(|spec| spec.id == id)
        .ok_or_else(|| Error::unsupported(AlgorithmKind::Kdf, id))
}

/// Look up an AEAD by wire identifier.
pub fn resolve_aead(id: u16) -> Result<&'static AeadSpec> {
    AEADS
        .iter()
        .find(|spec| spec.id == id)
        .ok_or_else(|| Error::unsupported(AlgorithmKind::Aead, id))
}

/// All registered KEMs.
pub fn supported_kems() -> impl Iterator<Item = &'static KemSpec> {
    KEMS.iter()
}

/// All registered KDFs.
pub fn supported_kdfs() -> impl Iterator<Item = &'static KdfSpec> {
    KDFS.iter()
}

/// All registered AEADs.
pub fn supported_aeads() -> impl Iterator<Item = &'static AeadSpec> {
    AEADS.iter()
}

/// HPKE cipher suite for a resolved KEM/KDF/AEAD triple.
pub fn hpke_suite(kem: &KemSpec, kdf: &KdfSpec, aead: &AeadSpec) -> HpkeCipherSuite {
    HpkeCipherSuite::new(kem.kem, kdf.algorithm, aead.algorithm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_ids() {
        let kem = resolve_kem(DHKEM_X25519_HKDF_SHA256).unwrap();
        assert_eq!(kem.public_key_length, 32);
        assert_eq!(kem.enc_length, 32);

        let kem = resolve_kem(DHKEM_P256_HKDF_SHA256).unwrap();
        assert_eq!(kem.public_key_length, 65);

        assert_eq!(resolve_kdf(HKDF_SHA384).unwrap().hash_length, 48);

        let aead = resolve_aead(CHACHA20_POLY1305).unwrap();
        assert_eq!(aead.key_length, 32);
        assert_eq!(aead.nonce_length, 12);
    }

    #[test]
    fn test_unknown_ids_fail_closed() {
        assert_eq!(
            resolve_kem(0x0000).unwrap_err(),
            Error::UnsupportedAlgorithm {
                kind: AlgorithmKind::Kem,
                id: 0x0000
            }
        );
        assert!(matches!(
            resolve_kdf(0x0004),
            Err(Error::UnsupportedAlgorithm {
                kind: AlgorithmKind::Kdf,
                ..
            })
        ));
        // Export-only AEAD is not usable for OHTTP
        assert!(matches!(
            resolve_aead(0xFFFF),
            Err(Error::UnsupportedAlgorithm {
                kind: AlgorithmKind::Aead,
                id: 0xFFFF
            })
        ));
    }

    #[test]
    fn test_response_nonce_length() {
        assert_eq!(resolve_aead(AES_128_GCM).unwrap().response_nonce_length(), 16);
        assert_eq!(resolve_aead(AES_256_GCM).unwrap().response_nonce_length(), 32);
        assert_eq!(resolve_aead(CHACHA20_POLY1305).unwrap().response_nonce_length(), 32);
    }

    #[test]
    fn test_registry_matches_provider_lengths() {
        for kem in supported_kems() {
            assert_eq!(kem.public_key_length, kem.kem.public_key_len());
        }
        for kdf in supported_kdfs() {
            assert_eq!(kdf.hash_length, kdf.algorithm.output_size());
        }
        for aead in supported_aeads() {
            assert_eq!(aead.key_length, aead.algorithm.key_size());
            assert_eq!(aead.nonce_length, aead.algorithm.nonce_size());
            assert_eq!(aead.tag_length, aead.algorithm.tag_size());
        }
        assert_eq!(supported_kems().count(), 5);
    }
}
