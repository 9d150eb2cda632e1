//! Client (sender) side of OHTTP.

use ohttp_crypto::CryptoProvider;

use crate::error::{Error, ProtocolError, Result};
use crate::key_config::KeyConfig;
use crate::response::ResponseContext;
use crate::Config;

/// Encapsulates requests for a gateway's [`KeyConfig`].
#[derive(Debug, Clone, Default)]
pub struct Client {
    config: Config,
}

impl Client {
    /// Create a client with `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The client configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Encrypt `plaintext` to the gateway described by `key_config`.
    ///
    /// The returned [`ClientRequest`] carries the bytes to send and the state needed to
    /// decrypt the gateway's answer.
    pub fn encrypt_request(
        &self,
        provider: &dyn CryptoProvider,
        key_config: &KeyConfig,
        plaintext: &[u8],
    ) -> Result<ClientRequest> {
        let header = key_config.to_header()?;
        let enc_len = header.kem().enc_length;
        let ciphertext_len = plaintext.len() + header.aead().tag_length;
        let request_len = header.encode().len() + enc_len + ciphertext_len;
        self.config.check_message_size("request", request_len)?;

        let info = header.recipient_info(&self.config.request_label);
        let hpke = provider.hpke(header.cipher_suite())?;
        let (enc, mut context) = hpke
            .setup_base_sender(key_config.public_key(), &info)
            .map_err(|e| {
                tracing::debug!(
                    "HPKE sender setup failed for key {}: {:?}",
                    key_config.key_id(),
                    e
                );
                Error::ProtocolError(ProtocolError::ContextSetupFailed)
            })?;

        let ciphertext = context.seal(&[], plaintext).map_err(|e| {
            tracing::debug!("Request seal failed: {:?}", e);
            Error::ProtocolError(ProtocolError::EncryptionFailed)
        })?;

        let response = ResponseContext::export(
            context.as_ref(),
            &self.config.response_label,
            &enc,
            header.kdf(),
            header.aead(),
        )?;

        let mut request = Vec::with_capacity(request_len);
        request.extend_from_slice(&header.encode());
        request.extend_from_slice(&enc);
        request.extend_from_slice(&ciphertext);

        Ok(ClientRequest {
            request,
            response,
            max_message_size: self.config.max_message_size,
        })
    }
}

/// An encapsulated request awaiting its response.
#[derive(Debug)]
pub struct ClientRequest {
    request: Vec<u8>,
    response: ResponseContext,
    max_message_size: usize,
}

impl ClientRequest {
    /// Encapsulated request: `header || enc || ciphertext`.
    pub fn request(&self) -> &[u8] {
        &self.request
    }

    /// State used to decrypt the response.
    pub fn response_context(&self) -> &ResponseContext {
        &self.response
    }

    /// Decrypt the gateway's encapsulated response.
    pub fn decrypt_response(
        &self,
        provider: &dyn CryptoProvider,
        response: &[u8],
    ) -> Result<Vec<u8>> {
        if response.len() > self.max_message_size {
            return Err(Error::InvalidMessage(format!(
                "response of {} bytes exceeds the {}-byte limit",
                response.len(),
                self.max_message_size
            )));
        }
        self.response.decrypt_response(provider, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{DHKEM_P256_HKDF_SHA256, DHKEM_X448_HKDF_SHA512};
    use crate::header::{Header, HEADER_LENGTH};
    use crate::KeyConfigBuilder;
    use ohttp_crypto_mock::MockCryptoProvider;
    use ohttp_crypto_rustcrypto::RustCryptoProvider;

    #[test]
    fn test_request_layout() {
        let provider = MockCryptoProvider::new();
        let (config, _) = KeyConfigBuilder::new(0x2A).generate(&provider).unwrap();

        let request = Client::default()
            .encrypt_request(&provider, &config, b"abc")
            .unwrap();
        let bytes = request.request();
        assert_eq!(bytes.len(), HEADER_LENGTH + 32 + 3 + 16);
        assert_eq!(&bytes[..HEADER_LENGTH], &config.header());
        assert_eq!(Header::parse(bytes).unwrap().key_id(), 0x2A);
        assert_eq!(request.response_context().enc(), &bytes[7..39]);
        assert_eq!(provider.live_contexts(), 0);
    }

    #[test]
    fn test_fresh_encapsulation_per_request() {
        let provider = MockCryptoProvider::new();
        let (config, _) = KeyConfigBuilder::new(1).generate(&provider).unwrap();
        let client = Client::default();

        let a = client.encrypt_request(&provider, &config, b"same").unwrap();
        let b = client.encrypt_request(&provider, &config, b"same").unwrap();
        assert_ne!(a.request(), b.request());
    }

    #[test]
    fn test_invalid_public_key_is_setup_failure() {
        let provider = RustCryptoProvider::new();
        // Not a point on P-256
        let config = KeyConfigBuilder::new(1)
            .kem(DHKEM_P256_HKDF_SHA256)
            .public_key(vec![0u8; 65])
            .build()
            .unwrap();

        assert_eq!(
            Client::default()
                .encrypt_request(&provider, &config, b"x")
                .unwrap_err(),
            Error::ProtocolError(ProtocolError::ContextSetupFailed)
        );
    }

    #[test]
    fn test_unsupported_provider_suite() {
        let provider = RustCryptoProvider::new();
        let config = KeyConfigBuilder::new(1)
            .kem(DHKEM_X448_HKDF_SHA512)
            .public_key(vec![0x11; 56])
            .build()
            .unwrap();

        assert!(matches!(
            Client::default().encrypt_request(&provider, &config, b"x"),
            Err(Error::CryptoError(_))
        ));
    }

    #[test]
    fn test_response_size_limit() {
        let provider = MockCryptoProvider::new();
        let (config, _) = KeyConfigBuilder::new(1).generate(&provider).unwrap();
        let client = Client::new(Config::builder().with_max_message_size(64).build().unwrap());

        let request = client.encrypt_request(&provider, &config, b"").unwrap();
        assert!(matches!(
            request.decrypt_response(&provider, &[0u8; 65]),
            Err(Error::InvalidMessage(_))
        ));
        assert!(matches!(
            client.encrypt_request(&provider, &config, &[0u8; 64]),
            Err(Error::InvalidMessage(_))
        ));
    }
}
