//! OHTTP key configuration.
//!
//! A gateway publishes its HPKE public key together with the algorithms it accepts:
//!
//! ```text
//! key_id (1) || kem_id (2) || public_key (Npk) || algorithms_length (2) ||
//!     [kdf_id (2) || aead_id (2)]+
//! ```
//!
//! Clients use the first KDF/AEAD pair. A parsed [`KeyConfig`] keeps only that pair and always
//! serializes with exactly one.
//!
//! Gateways with several keys publish them as an `application/ohttp-keys` list, handled by
//! [`KeyConfigList`].

use bytes::{Buf, BufMut, BytesMut};
use ohttp_crypto::{CryptoProvider, HpkeCipherSuite};
use zeroize::Zeroizing;

use crate::algorithm::{self, AeadSpec, KdfSpec, KemSpec};
use crate::error::{Error, Result};
use crate::header::{Header, DEFAULT_REQUEST_LABEL, HEADER_LENGTH};

/// Size of one KDF/AEAD pair in the algorithm list.
const ALGORITHM_PAIR_LENGTH: usize = 4;

/// A gateway's public key and the algorithms to use with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyConfig {
    key_id: u8,
    kem_id: u16,
    kdf_id: u16,
    aead_id: u16,
    public_key: Vec<u8>,
}

impl KeyConfig {
    /// Parse a serialized key configuration.
    ///
    /// The whole buffer must be consumed. Only the first KDF/AEAD pair is resolved and kept;
    /// further pairs must be present but are ignored.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut data = bytes;

        if data.remaining() < 3 {
            return Err(Error::InvalidKeyConfig("too short for key id and KEM".into()));
        }
        let key_id = data.get_u8();
        let kem_id = data.get_u16();
        let kem = algorithm::resolve_kem(kem_id)?;

        if data.remaining() < kem.public_key_length {
            return Err(Error::InvalidKeyConfig(format!(
                "public key truncated: need {} bytes, have {}",
                kem.public_key_length,
                data.remaining()
            )));
        }
        let public_key = data[..kem.public_key_length].to_vec();
        data.advance(kem.public_key_length);

        if data.remaining() < 2 {
            return Err(Error::InvalidKeyConfig("missing algorithms length".into()));
        }
        let algorithms_length = data.get_u16() as usize;
        if algorithms_length != data.remaining() {
            return Err(Error::InvalidKeyConfig(format!(
                "length mismatch: algorithms length {} but {} bytes remain",
                algorithms_length,
                data.remaining()
            )));
        }
        if algorithms_length == 0 || algorithms_length % ALGORITHM_PAIR_LENGTH != 0 {
            return Err(Error::InvalidKeyConfig(format!(
                "algorithms length {} is not a non-zero multiple of {}",
                algorithms_length, ALGORITHM_PAIR_LENGTH
            )));
        }

        let kdf_id = data.get_u16();
        let aead_id = data.get_u16();
        algorithm::resolve_kdf(kdf_id)?;
        algorithm::resolve_aead(aead_id)?;

        let ignored = algorithms_length / ALGORITHM_PAIR_LENGTH - 1;
        if ignored > 0 {
            tracing::trace!("Key config {} lists {} extra algorithm pair(s)", key_id, ignored);
        }

        Ok(Self {
            key_id,
            kem_id,
            kdf_id,
            aead_id,
            public_key,
        })
    }

    /// Serialize with a single KDF/AEAD pair.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(self.serialized_len());
        buf.put_u8(self.key_id);
        buf.put_u16(self.kem_id);
        buf.put_slice(&self.public_key);
        buf.put_u16(ALGORITHM_PAIR_LENGTH as u16);
        buf.put_u16(self.kdf_id);
        buf.put_u16(self.aead_id);
        buf.to_vec()
    }

    fn serialized_len(&self) -> usize {
        1 + 2 + self.public_key.len() + 2 + ALGORITHM_PAIR_LENGTH
    }

    /// The 7-byte encapsulation header for requests made with this configuration.
    pub fn header(&self) -> [u8; HEADER_LENGTH] {
        let mut out = [0u8; HEADER_LENGTH];
        let mut buf = &mut out[..];
        buf.put_u8(self.key_id);
        buf.put_u16(self.kem_id);
        buf.put_u16(self.kdf_id);
        buf.put_u16(self.aead_id);
        out
    }

    /// HPKE `info` for a request: `"message/bhttp request" || 0x00 || header`.
    pub fn recipient_info(&self) -> Vec<u8> {
        self.recipient_info_with_label(DEFAULT_REQUEST_LABEL)
    }

    /// HPKE `info` with a non-default media type.
    pub fn recipient_info_with_label(&self, label: &str) -> Vec<u8> {
        let header = self.header();
        let mut info = Vec::with_capacity(label.len() + 1 + HEADER_LENGTH);
        info.extend_from_slice(label.as_bytes());
        info.push(0);
        info.extend_from_slice(&header);
        info
    }

    /// Resolve the identifiers into a [`Header`].
    pub fn to_header(&self) -> Result<Header> {
        Header::new(self.key_id, self.kem_id, self.kdf_id, self.aead_id)
    }

    /// HPKE cipher suite of this configuration.
    pub fn cipher_suite(&self) -> Result<HpkeCipherSuite> {
        Ok(self.to_header()?.cipher_suite())
    }

    /// Key identifier.
    pub fn key_id(&self) -> u8 {
        self.key_id
    }

    /// KEM identifier.
    pub fn kem_id(&self) -> u16 {
        self.kem_id
    }

    /// KDF identifier.
    pub fn kdf_id(&self) -> u16 {
        self.kdf_id
    }

    /// AEAD identifier.
    pub fn aead_id(&self) -> u16 {
        self.aead_id
    }

    /// Encoded HPKE public key.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }
}

/// Builder for [`KeyConfig`].
///
/// Defaults to DHKEM(X25519, HKDF-SHA256), HKDF-SHA256 and AES-128-GCM.
///
/// # Example
///
/// ```rust
/// use ohttp_core::algorithm::{CHACHA20_POLY1305, HKDF_SHA256};
/// use ohttp_core::KeyConfigBuilder;
///
/// let config = KeyConfigBuilder::new(1)
///     .algorithms(HKDF_SHA256, CHACHA20_POLY1305)
///     .public_key(vec![0x42; 32])
///     .build()
///     .unwrap();
/// assert_eq!(config.header(), [0x01, 0x00, 0x20, 0x00, 0x01, 0x00, 0x03]);
/// ```
#[derive(Debug, Clone)]
pub struct KeyConfigBuilder {
    key_id: u8,
    kem_id: u16,
    kdf_id: u16,
    aead_id: u16,
    public_key: Option<Vec<u8>>,
}

impl KeyConfigBuilder {
    /// Start a configuration for `key_id`.
    pub fn new(key_id: u8) -> Self {
        Self {
            key_id,
            kem_id: algorithm::DHKEM_X25519_HKDF_SHA256,
            kdf_id: algorithm::HKDF_SHA256,
            aead_id: algorithm::AES_128_GCM,
            public_key: None,
        }
    }

    /// Set the KEM.
    pub fn kem(mut self, kem_id: u16) -> Self {
        self.kem_id = kem_id;
        self
    }

    /// Set the KDF/AEAD pair.
    pub fn algorithms(mut self, kdf_id: u16, aead_id: u16) -> Self {
        self.kdf_id = kdf_id;
        self.aead_id = aead_id;
        self
    }

    /// Set an existing public key.
    pub fn public_key(mut self, public_key: Vec<u8>) -> Self {
        self.public_key = Some(public_key);
        self
    }

    fn resolve(&self) -> Result<(&'static KemSpec, &'static KdfSpec, &'static AeadSpec)> {
        Ok((
            algorithm::resolve_kem(self.kem_id)?,
            algorithm::resolve_kdf(self.kdf_id)?,
            algorithm::resolve_aead(self.aead_id)?,
        ))
    }

    fn finish(self, public_key: Vec<u8>, kem: &KemSpec) -> Result<KeyConfig> {
        if public_key.len() != kem.public_key_length {
            return Err(Error::InvalidKeyConfig(format!(
                "{} public key must be {} bytes, got {}",
                kem.name,
                kem.public_key_length,
                public_key.len()
            )));
        }

        Ok(KeyConfig {
            key_id: self.key_id,
            kem_id: self.kem_id,
            kdf_id: self.kdf_id,
            aead_id: self.aead_id,
            public_key,
        })
    }

    /// Build from the public key set with [`KeyConfigBuilder::public_key`].
    pub fn build(mut self) -> Result<KeyConfig> {
        let (kem, _, _) = self.resolve()?;
        let public_key = self
            .public_key
            .take()
            .ok_or_else(|| Error::InvalidKeyConfig("public key is required".into()))?;
        self.finish(public_key, kem)
    }

    /// Generate a fresh key pair with `provider` and build the configuration.
    ///
    /// Returns the configuration to publish and the private key the gateway must keep.
    pub fn generate(
        self,
        provider: &dyn CryptoProvider,
    ) -> Result<(KeyConfig, Zeroizing<Vec<u8>>)> {
        let (kem, kdf, aead) = self.resolve()?;
        let hpke = provider.hpke(algorithm::hpke_suite(kem, kdf, aead))?;
        let (private_key, public_key) = hpke.generate_keypair()?;

        tracing::debug!("Generated {} key pair for key id {}", kem.name, self.key_id);
        Ok((self.finish(public_key, kem)?, private_key))
    }
}

/// Sequence of key configurations (`application/ohttp-keys`).
///
/// Format: `[length (2 bytes) || KeyConfig]*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyConfigList {
    configs: Vec<KeyConfig>,
}

impl KeyConfigList {
    /// Create a list from configurations.
    pub fn new(configs: Vec<KeyConfig>) -> Self {
        Self { configs }
    }

    /// Append a configuration.
    pub fn add(&mut self, config: KeyConfig) {
        self.configs.push(config);
    }

    /// Encode to wire format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = BytesMut::new();
        for config in &self.configs {
            let encoded = config.serialize();
            let len = u16::try_from(encoded.len()).map_err(|_| {
                Error::InvalidKeyConfig(format!("key config {} too long", config.key_id))
            })?;
            buf.put_u16(len);
            buf.put_slice(&encoded);
        }
        Ok(buf.to_vec())
    }

    /// Decode from wire format.
    ///
    /// Entries with unsupported algorithms are skipped; any other malformed entry fails the
    /// whole list.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut data = bytes;
        let mut configs = Vec::new();

        while data.has_remaining() {
            if data.remaining() < 2 {
                return Err(Error::InvalidKeyConfig("truncated entry length".into()));
            }
            let len = data.get_u16() as usize;
            if data.remaining() < len {
                return Err(Error::InvalidKeyConfig(format!(
                    "entry of {} bytes truncated to {}",
                    len,
                    data.remaining()
                )));
            }

            match KeyConfig::parse(&data[..len]) {
                Ok(config) => configs.push(config),
                Err(Error::UnsupportedAlgorithm { kind, id }) => {
                    tracing::debug!("Skipping key config with unsupported {} 0x{:04X}", kind, id);
                },
                Err(e) => return Err(e),
            }
            data.advance(len);
        }

        Ok(Self { configs })
    }

    /// First configuration with `key_id`.
    pub fn find(&self, key_id: u8) -> Option<&KeyConfig> {
        self.configs.iter().find(|c| c.key_id == key_id)
    }

    /// All configurations in order.
    pub fn configs(&self) -> &[KeyConfig] {
        &self.configs
    }

    /// Check if list is empty
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Get number of configs
    pub fn len(&self) -> usize {
        self.configs.len()
    }
}
