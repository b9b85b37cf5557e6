use tracing::debug;

use super::{IV_LEN, SALT_LEN, cbc, kdf, mac, padding, random::random_array};
use crate::error::CryptError;
use crate::format::Container;

/// Encrypt `plaintext` under `passphrase`.
///
/// Salt and IV are drawn fresh from the OS generator on every call. The
/// plaintext is always padded, the tag is computed over
/// `ciphertext ‖ iv ‖ salt` with the passphrase itself as the HMAC key.
///
/// # Errors
///
/// Fails only with [`CryptError::RandomnessUnavailable`].
pub fn encrypt(passphrase: &[u8], plaintext: &[u8]) -> Result<Container, CryptError> {
    let salt: [u8; SALT_LEN] = random_array()?;
    let key = kdf::derive_key(passphrase, &salt);

    let padded = padding::pad(plaintext);

    let iv: [u8; IV_LEN] = random_array()?;
    let ciphertext = cbc::encrypt_cbc(&key, &iv, &padded);
    drop(padded);
    drop(key);

    let tag = mac::compute_mac(passphrase, &ciphertext, &iv, &salt);

    debug!(
        plaintext_len = plaintext.len(),
        ciphertext_len = ciphertext.len(),
        "config encrypted"
    );

    Ok(Container::new(ciphertext, iv, salt, tag))
}

/// Encrypt and serialize in one step.
pub fn seal(passphrase: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptError> {
    Ok(encrypt(passphrase, plaintext)?.to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{BLOCK_LEN, decrypt};

    #[test]
    fn ciphertext_is_padded_to_next_block() {
        let container = encrypt(b"pw", b"hello").unwrap();
        assert_eq!(container.ciphertext().len(), BLOCK_LEN);

        let container = encrypt(b"pw", &[0u8; 17]).unwrap();
        assert_eq!(container.ciphertext().len(), 2 * BLOCK_LEN);
    }

    #[test]
    fn aligned_plaintext_gains_full_block() {
        for blocks in [1, 2, 4] {
            let plaintext = vec![0x41u8; blocks * BLOCK_LEN];
            let container = encrypt(b"pw", &plaintext).unwrap();
            assert_eq!(container.ciphertext().len(), plaintext.len() + BLOCK_LEN);
        }
    }

    #[test]
    fn empty_plaintext_encrypts_to_one_block() {
        let container = encrypt(b"pw", b"").unwrap();
        assert_eq!(container.ciphertext().len(), BLOCK_LEN);
    }

    #[test]
    fn each_call_uses_fresh_iv_and_salt() {
        let a = encrypt(b"pw", b"same plaintext").unwrap();
        let b = encrypt(b"pw", b"same plaintext").unwrap();

        assert_ne!(a.iv(), b.iv());
        assert_ne!(a.salt(), b.salt());
        assert_ne!(a.ciphertext(), b.ciphertext());
        assert_ne!(a.mac(), b.mac());
    }

    #[test]
    fn tag_is_keyed_by_raw_passphrase() {
        let container = encrypt(b"pw", b"data").unwrap();
        let expected = mac::compute_mac(
            b"pw",
            container.ciphertext(),
            container.iv(),
            container.salt(),
        );
        assert_eq!(container.mac(), &expected);
    }

    #[test]
    fn ciphertext_is_cbc_under_derived_key() {
        let container = encrypt(b"pw", b"data").unwrap();
        let key = kdf::derive_key(b"pw", container.salt());

        let decrypted = cbc::decrypt_cbc(&key, container.iv(), container.ciphertext());
        assert_eq!(&decrypted[..4], b"data");
        assert!(decrypted[4..].iter().all(|&b| b == 12));
    }

    #[test]
    fn seal_output_decrypts() {
        let sealed = seal(b"pw", b"{\"URL\":\"https://example.com\"}").unwrap();
        let plaintext = decrypt(b"pw", &sealed).unwrap();
        assert_eq!(*plaintext, b"{\"URL\":\"https://example.com\"}");
    }
}
