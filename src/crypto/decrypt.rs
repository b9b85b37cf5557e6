use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::{BLOCK_LEN, cbc, kdf, mac, padding};
use crate::error::CryptError;
use crate::format::{self, Container};

/// Parse `container_bytes` and decrypt it with `passphrase`.
///
/// # Errors
///
/// - [`CryptError::ContainerTooShort`] / [`CryptError::MalformedContainer`]
///   when the bytes are not a container
/// - [`CryptError::AuthenticationFailed`] on tag mismatch
/// - [`CryptError::StructuralCorruption`] when authenticated ciphertext
///   cannot be decrypted
pub fn decrypt(passphrase: &[u8], container_bytes: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptError> {
    let container = format::parse(container_bytes)?;
    open(passphrase, &container)
}

/// Decrypt an already parsed container.
///
/// The tag is verified before the key is derived or any block is
/// decrypted. Nothing below the verification runs on unauthenticated data.
pub fn open(passphrase: &[u8], container: &Container) -> Result<Zeroizing<Vec<u8>>, CryptError> {
    if let Err(e) = mac::verify_mac(
        passphrase,
        container.ciphertext(),
        container.iv(),
        container.salt(),
        container.mac(),
    ) {
        warn!("container authentication failed");
        return Err(e);
    }

    let ciphertext = container.ciphertext();
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CryptError::StructuralCorruption(
            "ciphertext is not a multiple of the block size",
        ));
    }

    let key = kdf::derive_key(passphrase, container.salt());
    let padded = cbc::decrypt_cbc(&key, container.iv(), ciphertext);
    drop(key);

    let plaintext = padding::unpad(padded)?;

    debug!(
        ciphertext_len = ciphertext.len(),
        plaintext_len = plaintext.len(),
        "config decrypted"
    );

    Ok(plaintext)
}
