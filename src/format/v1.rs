//! Container format v1.
//!
//! V1 Format:
//! ```text
//! MAGIC (4) | VERSION (1) | IV (16) | SALT (32) | MAC (32) | CIPHERTEXT
//! ```

use super::{Container, MAGIC, MIN_LEN};
use crate::{
    crypto::{IV_LEN, MAC_LEN, SALT_LEN},
    error::CryptError,
    format::{MAGIC_LEN, VER_LEN},
};

/// Current container format version.
pub const VERSION_V1: u8 = 1;

/// Parses a v1 container. Magic and version are already checked.
///
/// # Errors
///
/// Returns an error if the input is too short for the v1 header.
pub fn parse(data: &[u8]) -> Result<Container, CryptError> {
    if data.len() < MIN_LEN {
        return Err(CryptError::ContainerTooShort {
            len: data.len(),
            min: MIN_LEN,
        });
    }

    let mut offset = MAGIC_LEN + VER_LEN;

    let iv: [u8; IV_LEN] = data[offset..offset + IV_LEN]
        .try_into()
        .map_err(|_| CryptError::MalformedContainer("invalid iv length"))?;
    offset += IV_LEN;

    let salt: [u8; SALT_LEN] = data[offset..offset + SALT_LEN]
        .try_into()
        .map_err(|_| CryptError::MalformedContainer("invalid salt length"))?;
    offset += SALT_LEN;

    let mac: [u8; MAC_LEN] = data[offset..offset + MAC_LEN]
        .try_into()
        .map_err(|_| CryptError::MalformedContainer("invalid mac length"))?;
    offset += MAC_LEN;

    let ciphertext = data[offset..].to_vec();

    Ok(Container::new(ciphertext, iv, salt, mac))
}

/// Serializes a container to v1 bytes.
pub fn serialize(container: &Container) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MIN_LEN + container.ciphertext().len());

    buf.extend_from_slice(MAGIC);
    buf.push(VERSION_V1);

    buf.extend_from_slice(container.iv());
    buf.extend_from_slice(container.salt());
    buf.extend_from_slice(container.mac());
    buf.extend_from_slice(container.ciphertext());

    buf
}
