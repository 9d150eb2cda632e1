//! Error types for the OHTTP protocol engine.

use core::fmt;

/// Result type for OHTTP operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur while encoding, decoding or processing OHTTP messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A KEM, KDF or AEAD identifier is not in the algorithm registry.
    UnsupportedAlgorithm {
        /// Which registry the lookup failed in
        kind: AlgorithmKind,
        /// The wire-format identifier
        id: u16,
    },

    /// Key configuration layout violation
    InvalidKeyConfig(String),

    /// Encapsulated message is truncated or oversized
    InvalidMessage(String),

    /// HPKE or response encryption step failed
    ProtocolError(ProtocolError),

    /// Invalid configuration
    InvalidConfig(String),

    /// Any other failure reported by the cryptographic provider
    CryptoError(String),
}

impl Error {
    pub(crate) fn unsupported(kind: AlgorithmKind, id: u16) -> Self {
        Error::UnsupportedAlgorithm { kind, id }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedAlgorithm { kind, id } => {
                write!(f, "Unsupported {} identifier: 0x{:04X}", kind, id)
            },
            Error::InvalidKeyConfig(msg) => write!(f, "Invalid key configuration: {}", msg),
            Error::InvalidMessage(msg) => write!(f, "Invalid message: {}", msg),
            Error::ProtocolError(e) => write!(f, "Protocol error: {}", e),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<ohttp_crypto::Error> for Error {
    fn from(e: ohttp_crypto::Error) -> Self {
        Error::CryptoError(format!("{:?}", e))
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Error::ProtocolError(e)
    }
}

/// Registry an algorithm identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmKind {
    /// Key encapsulation mechanism
    Kem,
    /// Key derivation function
    Kdf,
    /// Authenticated encryption
    Aead,
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlgorithmKind::Kem => "KEM",
            AlgorithmKind::Kdf => "KDF",
            AlgorithmKind::Aead => "AEAD",
        };
        f.write_str(name)
    }
}

/// Failures of the cryptographic steps of request and response processing.
///
/// These are reported instead of an empty plaintext, so callers can never mistake a failed
/// decryption for an empty message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolError {
    /// HPKE sender or recipient context could not be established
    ContextSetupFailed,

    /// Request or response ciphertext did not authenticate
    DecryptionFailed,

    /// Response secret could not be exported from the HPKE context
    ExportFailed,

    /// HKDF extract/expand of the response key or nonce failed
    KeyDerivationFailed,

    /// Sealing the request or response failed
    EncryptionFailed,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ProtocolError::ContextSetupFailed => "HPKE context setup failed",
            ProtocolError::DecryptionFailed => "decryption failed",
            ProtocolError::ExportFailed => "secret export failed",
            ProtocolError::KeyDerivationFailed => "response key derivation failed",
            ProtocolError::EncryptionFailed => "encryption failed",
        };
        f.write_str(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unsupported(AlgorithmKind::Kem, 0x0099);
        assert_eq!(err.to_string(), "Unsupported KEM identifier: 0x0099");

        let err = Error::from(ProtocolError::DecryptionFailed);
        assert_eq!(err.to_string(), "Protocol error: decryption failed");
    }

    #[test]
    fn test_from_crypto_error() {
        let err = Error::from(ohttp_crypto::Error::RandomGenerationFailed);
        assert!(matches!(err, Error::CryptoError(_)));
    }
}
