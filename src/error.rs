use thiserror::Error;

/// Errors returned by container encryption and decryption.
///
/// Every failure is terminal for the call that produced it; nothing is
/// retried internally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptError {
    /// The OS random generator could not supply salt or IV bytes.
    #[error("OS random generator unavailable")]
    RandomnessUnavailable,

    /// The input is not a container this crate can parse.
    #[error("malformed container: {0}")]
    MalformedContainer(&'static str),

    /// The input is shorter than the smallest possible container.
    #[error("container too short: {len} bytes, need at least {min}")]
    ContainerTooShort { len: usize, min: usize },

    /// Tag mismatch. Wrong passphrase and tampering are deliberately
    /// indistinguishable.
    #[error("wrong passphrase or corrupted data")]
    AuthenticationFailed,

    /// Authenticated ciphertext that still cannot be decrypted.
    #[error("corrupted container: {0}")]
    StructuralCorruption(&'static str),
}
