//! # OHTTP Core
//!
//! Protocol engine for Oblivious HTTP (RFC 9458).
//!
//! This crate covers the wire formats and the cryptographic composition of OHTTP:
//! - Algorithm registry (KEM/KDF/AEAD identifiers)
//! - Key configuration codec, single entries and `application/ohttp-keys` lists
//! - Encapsulation header codec
//! - Client request encapsulation and response decapsulation
//! - Gateway request decapsulation and response encapsulation
//!
//! Transport of the messages and key provisioning are left to the caller. All primitives are
//! reached through an injected [`ohttp_crypto::CryptoProvider`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │       ohttp-core (this crate)           │
//! │  ┌──────────────────────────────────┐   │
//! │  │   Client / Gateway               │   │
//! │  ├──────────────────────────────────┤   │
//! │  │   Response Encryption            │   │
//! │  ├──────────────────────────────────┤   │
//! │  │   Key Config / Header Codecs     │   │
//! │  ├──────────────────────────────────┤   │
//! │  │   Algorithm Registry             │   │
//! │  └──────────────────────────────────┘   │
//! └─────────────────┬───────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────┐
//! │      ohttp-crypto (trait interface)     │
//! └─────────────────────────────────────────┘
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    unused_qualifications
)]
#![forbid(unsafe_code)]

// Re-export crypto interface
pub use ohttp_crypto;

pub mod algorithm;
pub mod client;
pub mod error;
pub mod gateway;
pub mod header;
pub mod key_config;
pub mod response;

pub use algorithm::{resolve_aead, resolve_kdf, resolve_kem, AeadSpec, KdfSpec, KemSpec};
pub use client::{Client, ClientRequest};
pub use error::{AlgorithmKind, Error, ProtocolError, Result};
pub use gateway::Gateway;
pub use header::{Header, DEFAULT_REQUEST_LABEL, DEFAULT_RESPONSE_LABEL, HEADER_LENGTH};
pub use key_config::{KeyConfig, KeyConfigBuilder, KeyConfigList};
pub use response::{derive_response_keys, ResponseContext, ResponseKeys};

/// Default bound on encapsulated request and response size.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// OHTTP engine configuration.
///
/// # Example
///
/// ```rust
/// use ohttp_core::Config;
///
/// let config = Config::builder()
///     .with_max_message_size(16 * 1024)
///     .build()
///     .unwrap();
/// assert_eq!(config.request_label, "message/bhttp request");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Media type bound into the request's HPKE info (default: `message/bhttp request`)
    pub request_label: String,

    /// Exporter context for the response secret (default: `message/bhttp response`)
    pub response_label: String,

    /// Largest encapsulated request or response accepted (default: 64 KiB)
    pub max_message_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_label: DEFAULT_REQUEST_LABEL.into(),
            response_label: DEFAULT_RESPONSE_LABEL.into(),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub(crate) fn check_message_size(&self, what: &str, len: usize) -> Result<()> {
        if len > self.max_message_size {
            return Err(Error::InvalidMessage(format!(
                "{} of {} bytes exceeds the {}-byte limit",
                what, len, self.max_message_size
            )));
        }
        Ok(())
    }
}

/// Configuration builder.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the request media type label.
    pub fn with_request_label(mut self, label: impl Into<String>) -> Self {
        self.config.request_label = label.into();
        self
    }

    /// Set the response exporter label.
    pub fn with_response_label(mut self, label: impl Into<String>) -> Self {
        self.config.response_label = label.into();
        self
    }

    /// Set the maximum encapsulated message size.
    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.config.max_message_size = size;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<Config> {
        for (name, label) in [
            ("request", &self.config.request_label),
            ("response", &self.config.response_label),
        ] {
            if label.is_empty() {
                return Err(Error::InvalidConfig(format!("{} label is empty", name)));
            }
            // The request label is terminated by 0x00 in the HPKE info
            if label.as_bytes().contains(&0) {
                return Err(Error::InvalidConfig(format!(
                    "{} label contains a NUL byte",
                    name
                )));
            }
        }

        if self.config.max_message_size < HEADER_LENGTH {
            return Err(Error::InvalidConfig(format!(
                "max message size must be at least {} bytes",
                HEADER_LENGTH
            )));
        }

        Ok(self.config)
    }
}
