//! Gateway (recipient) side of OHTTP.
//!
//! ```text
//! Client                                   Gateway
//!
//! hdr || enc || ct          -------->
//!                                   Header::parse(hdr)
//!                                   SetupBaseR(enc, sk, label || 0 || hdr)
//!                                   open("", ct) = request
//!                                   Export(response label, Nk) = secret
//!                           <--------   response_nonce || Seal(...)
//! ```
//!
//! Every call sets up a fresh HPKE context and drops it before returning, on success and on
//! every error path.

use ohttp_crypto::{CryptoProvider, HpkeContext};

use crate::error::{Error, ProtocolError, Result};
use crate::header::{self, Header};
use crate::response::ResponseContext;
use crate::Config;

/// Encapsulated request split into its parts.
struct Parsed<'a> {
    header: Header,
    enc: &'a [u8],
    ciphertext: &'a [u8],
}

/// Recipient context established from an encapsulated request.
struct Opened<'a> {
    request: Parsed<'a>,
    context: Box<dyn HpkeContext>,
}

/// Decrypts encapsulated requests and encrypts the matching responses.
///
/// # Example
///
/// ```rust
/// use ohttp_core::{Client, Gateway, KeyConfigBuilder};
/// use ohttp_crypto::CryptoProvider;
/// use ohttp_crypto_rustcrypto::RustCryptoProvider;
///
/// let provider = RustCryptoProvider::new();
/// let (key_config, private_key) = KeyConfigBuilder::new(1).generate(&provider).unwrap();
///
/// let request = Client::default()
///     .encrypt_request(&provider, &key_config, b"GET /")
///     .unwrap();
///
/// let gateway = Gateway::default();
/// let (body, response_context) = gateway
///     .decapsulate(&provider, &private_key, request.request())
///     .unwrap();
/// assert_eq!(body, b"GET /");
///
/// let response = response_context.encrypt_response(&provider, b"200 OK").unwrap();
/// assert_eq!(request.decrypt_response(&provider, &response).unwrap(), b"200 OK");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Gateway {
    config: Config,
}

impl Gateway {
    /// Create a gateway with `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The gateway configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn parse<'a>(&self, request: &'a [u8]) -> Result<Parsed<'a>> {
        self.config.check_message_size("request", request.len())?;

        let header = Header::parse(request)?;
        let enc = header::extract_encapsulated_secret(request, header.kem())?;
        let ciphertext = header::extract_ciphertext(request, header.kem())?;

        tracing::trace!(
            "Request for key {} using {}, {}, {}",
            header.key_id(),
            header.kem().name,
            header.kdf().name,
            header.aead().name
        );

        Ok(Parsed {
            header,
            enc,
            ciphertext,
        })
    }

    fn setup<'a>(
        &self,
        provider: &dyn CryptoProvider,
        private_key: &[u8],
        request: Parsed<'a>,
    ) -> Result<Opened<'a>> {
        let header = &request.header;
        let info = header.recipient_info(&self.config.request_label);

        let hpke = provider.hpke(header.cipher_suite())?;
        let context = hpke
            .setup_base_recipient(request.enc, private_key, &info)
            .map_err(|e| {
                tracing::debug!("HPKE recipient setup failed for key {}: {:?}", header.key_id(), e);
                Error::ProtocolError(ProtocolError::ContextSetupFailed)
            })?;

        Ok(Opened { request, context })
    }

    fn open(opened: &mut Opened<'_>) -> Result<Vec<u8>> {
        opened
            .context
            .open(&[], opened.request.ciphertext)
            .map_err(|e| {
                tracing::debug!("Request open failed: {:?}", e);
                Error::ProtocolError(ProtocolError::DecryptionFailed)
            })
    }

    fn response_context(&self, opened: &Opened<'_>) -> Result<ResponseContext> {
        ResponseContext::export(
            opened.context.as_ref(),
            &self.config.response_label,
            opened.request.enc,
            opened.request.header.kdf(),
            opened.request.header.aead(),
        )
    }

    /// Decrypt an encapsulated request with the gateway's private key.
    pub fn decrypt(
        &self,
        provider: &dyn CryptoProvider,
        private_key: &[u8],
        request: &[u8],
    ) -> Result<Vec<u8>> {
        let parsed = self.parse(request)?;
        let mut opened = self.setup(provider, private_key, parsed)?;
        Self::open(&mut opened)
    }

    /// Decrypt an encapsulated request and keep what is needed to answer it.
    pub fn decapsulate(
        &self,
        provider: &dyn CryptoProvider,
        private_key: &[u8],
        request: &[u8],
    ) -> Result<(Vec<u8>, ResponseContext)> {
        let parsed = self.parse(request)?;
        let mut opened = self.setup(provider, private_key, parsed)?;
        let plaintext = Self::open(&mut opened)?;
        let response = self.response_context(&opened)?;
        Ok((plaintext, response))
    }

    /// Encrypt `plaintext` as the response to `request`.
    ///
    /// The request's HPKE context is set up again from `private_key`; its ciphertext is not
    /// opened.
    pub fn encrypt(
        &self,
        provider: &dyn CryptoProvider,
        private_key: &[u8],
        request: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let parsed = self.parse(request)?;
        let aead = parsed.header.aead();
        self.config.check_message_size(
            "response",
            aead.response_nonce_length() + plaintext.len() + aead.tag_length,
        )?;

        let opened = self.setup(provider, private_key, parsed)?;
        let response = self.response_context(&opened)?;
        drop(opened);

        response.encrypt_response(provider, plaintext)
    }
}
