//! Crypto error types.

use thiserror::Error;

/// Errors raised by key, signature, and hashing operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The supplied bytes do not decode to a valid public key.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// The supplied bytes do not decode to a valid signature.
    #[error("invalid signature encoding")]
    InvalidSignatureEncoding,

    /// Signature verification failed against the given message and key.
    #[error("signature verification failed")]
    VerificationFailed,

    /// The supplied seed is not the expected length for key derivation.
    #[error("invalid seed length: expected {expected}, got {actual}")]
    InvalidSeedLength {
        /// Expected seed length in bytes.
        expected: usize,
        /// Actual seed length in bytes.
        actual: usize,
    },
}
