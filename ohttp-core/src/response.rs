//! Response encryption.
//!
//! Both ends export a secret from the request's HPKE context and stretch it into a one-shot
//! AEAD key and nonce:
//!
//! ```text
//! secret         = context.Export("message/bhttp response", Nk)
//! response_nonce = random(max(Nn, Nk))
//! salt           = enc || response_nonce
//! prk            = Extract(salt, secret)
//! aead_key       = Expand(prk, "key", Nk)
//! aead_nonce     = Expand(prk, "nonce", Nn)
//! response       = response_nonce || Seal(aead_key, aead_nonce, "", plaintext)
//! ```

use core::fmt;

use ohttp_crypto::{CryptoProvider, HpkeContext};
use zeroize::Zeroizing;

use crate::algorithm::{AeadSpec, KdfSpec};
use crate::error::{Error, ProtocolError, Result};

const KEY_LABEL: &[u8] = b"key";
const NONCE_LABEL: &[u8] = b"nonce";

/// AEAD key and nonce protecting one response.
pub struct ResponseKeys {
    key: Zeroizing<Vec<u8>>,
    nonce: Vec<u8>,
}

impl ResponseKeys {
    /// AEAD key (`Nk` bytes).
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// AEAD nonce (`Nn` bytes).
    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }
}

impl fmt::Debug for ResponseKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseKeys")
            .field("key_len", &self.key.len())
            .field("nonce_len", &self.nonce.len())
            .finish()
    }
}

/// Derive the response AEAD key and nonce.
///
/// Deterministic in all inputs. `secret` is the value exported from the request context.
pub fn derive_response_keys(
    provider: &dyn CryptoProvider,
    kdf: &KdfSpec,
    aead: &AeadSpec,
    secret: &[u8],
    enc: &[u8],
    response_nonce: &[u8],
) -> Result<ResponseKeys> {
    let hkdf = kdf.kdf(provider)?;

    let mut salt = Vec::with_capacity(enc.len() + response_nonce.len());
    salt.extend_from_slice(enc);
    salt.extend_from_slice(response_nonce);

    let prk = hkdf.extract(&salt, secret);
    let expand = |label: &[u8], len: usize| {
        hkdf.expand(&prk, label, len).map_err(|e| {
            tracing::debug!("{} expand failed: {:?}", kdf.name, e);
            Error::ProtocolError(ProtocolError::KeyDerivationFailed)
        })
    };

    let key = expand(KEY_LABEL, aead.key_length)?;
    let nonce = expand(NONCE_LABEL, aead.nonce_length)?;

    Ok(ResponseKeys {
        key,
        nonce: nonce.to_vec(),
    })
}

/// Secret material needed to protect the response to one request.
///
/// Held by the gateway after decapsulating a request and by the client after encapsulating
/// one. The secret is wiped when the context is dropped.
pub struct ResponseContext {
    secret: Zeroizing<Vec<u8>>,
    enc: Vec<u8>,
    kdf: &'static KdfSpec,
    aead: &'static AeadSpec,
}

impl ResponseContext {
    /// Export the response secret from a request context.
    pub(crate) fn export(
        context: &dyn HpkeContext,
        label: &str,
        enc: &[u8],
        kdf: &'static KdfSpec,
        aead: &'static AeadSpec,
    ) -> Result<Self> {
        let secret = context
            .export(label.as_bytes(), aead.key_length)
            .map_err(|e| {
                tracing::debug!("Response secret export failed: {:?}", e);
                Error::ProtocolError(ProtocolError::ExportFailed)
            })?;

        Ok(Self {
            secret,
            enc: enc.to_vec(),
            kdf,
            aead,
        })
    }

    /// Encapsulated key of the request this context answers.
    pub fn enc(&self) -> &[u8] {
        &self.enc
    }

    /// AEAD protecting the response.
    pub fn aead(&self) -> &'static AeadSpec {
        self.aead
    }

    /// KDF deriving the response keys.
    pub fn kdf(&self) -> &'static KdfSpec {
        self.kdf
    }

    /// Encrypt `plaintext` as `response_nonce || ciphertext`.
    pub fn encrypt_response(
        &self,
        provider: &dyn CryptoProvider,
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let response_nonce = provider
            .random()
            .generate(self.aead.response_nonce_length())?;
        let keys = derive_response_keys(
            provider,
            self.kdf,
            self.aead,
            &self.secret,
            &self.enc,
            &response_nonce,
        )?;

        let ciphertext = self
            .aead
            .aead(provider)?
            .seal(&keys.key, &keys.nonce, &[], plaintext)
            .map_err(|e| {
                tracing::debug!("Response seal failed: {:?}", e);
                Error::ProtocolError(ProtocolError::EncryptionFailed)
            })?;

        let mut response = response_nonce;
        response.extend_from_slice(&ciphertext);
        Ok(response)
    }

    /// Decrypt an encapsulated response produced by [`ResponseContext::encrypt_response`].
    pub fn decrypt_response(
        &self,
        provider: &dyn CryptoProvider,
        response: &[u8],
    ) -> Result<Vec<u8>> {
        let nonce_len = self.aead.response_nonce_length();
        if response.len() < nonce_len {
            return Err(Error::InvalidMessage(format!(
                "response of {} bytes is shorter than the {}-byte response nonce",
                response.len(),
                nonce_len
            )));
        }

        let (response_nonce, ciphertext) = response.split_at(nonce_len);
        let keys = derive_response_keys(
            provider,
            self.kdf,
            self.aead,
            &self.secret,
            &self.enc,
            response_nonce,
        )?;

        self.aead
            .aead(provider)?
            .open(&keys.key, &keys.nonce, &[], ciphertext)
            .map_err(|e| {
                tracing::debug!("Response open failed: {:?}", e);
                Error::ProtocolError(ProtocolError::DecryptionFailed)
            })
    }
}

impl fmt::Debug for ResponseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseContext")
            .field("kdf", &self.kdf.name)
            .field("aead", &self.aead.name)
            .field("enc_len", &self.enc.len())
            .finish_non_exhaustive()
    }
}
