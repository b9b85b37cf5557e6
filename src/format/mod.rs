//! Container format handling.
//!
//! Provides version-aware parsing and serialization of sealed config files.

use crate::crypto::{IV_LEN, MAC_LEN, SALT_LEN};
use crate::error::CryptError;

pub mod v1;

/// Magic bytes identifying a sealed config container ("SUPC").
pub const MAGIC: &[u8; 4] = b"SUPC";
/// Length of magic bytes.
pub const MAGIC_LEN: usize = 4;
/// Length of version field.
pub const VER_LEN: usize = 1;
/// Latest format version
pub const CURRENT_VERSION: u8 = v1::VERSION_V1;

/// Fixed-width fields every container carries: IV, salt and tag.
pub const FIELDS_LEN: usize = IV_LEN + SALT_LEN + MAC_LEN;
/// Smallest byte string that can hold a framed container.
pub const MIN_LEN: usize = MAGIC_LEN + VER_LEN + FIELDS_LEN;

/// The output of one encryption call.
///
/// Immutable once built: fields are only readable. The tag covers
/// `ciphertext ‖ iv ‖ salt` and is keyed by the raw passphrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    version: u8,
    ciphertext: Vec<u8>,
    iv: [u8; IV_LEN],
    salt: [u8; SALT_LEN],
    mac: [u8; MAC_LEN],
}

impl Container {
    /// Creates a new Container from its components.
    pub fn new(
        ciphertext: Vec<u8>,
        iv: [u8; IV_LEN],
        salt: [u8; SALT_LEN],
        mac: [u8; MAC_LEN],
    ) -> Self {
        Self {
            version: CURRENT_VERSION,
            ciphertext,
            iv,
            salt,
            mac,
        }
    }

    /// Returns the container format version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the AES-256-CBC ciphertext.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Returns the CBC initialization vector.
    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// Returns the salt used for key derivation.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Returns the authentication tag.
    pub fn mac(&self) -> &[u8; MAC_LEN] {
        &self.mac
    }

    /// Serializes this container. Only v1 is ever constructed.
    pub fn to_bytes(&self) -> Vec<u8> {
        v1::serialize(self)
    }
}

/// Returns `true` if `data` starts with the container magic.
pub fn is_container(data: &[u8]) -> bool {
    data.starts_with(MAGIC)
}

/// Parses a sealed container.
///
/// Automatically dispatches to the appropriate version parser.
///
/// # Errors
///
/// Returns an error if:
/// - The input is shorter than [`MIN_LEN`] (checked before anything else)
/// - The magic bytes are invalid
/// - The version is unsupported
pub fn parse(data: &[u8]) -> Result<Container, CryptError> {
    if data.len() < MIN_LEN {
        return Err(CryptError::ContainerTooShort {
            len: data.len(),
            min: MIN_LEN,
        });
    }

    if !is_container(data) {
        return Err(CryptError::MalformedContainer("invalid magic"));
    }

    match data[MAGIC_LEN] {
        v1::VERSION_V1 => v1::parse(data),
        _ => Err(CryptError::MalformedContainer("unsupported version")),
    }
}
