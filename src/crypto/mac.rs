//! HMAC-SHA256 over `ciphertext ‖ iv ‖ salt`.
//!
//! The MAC key is the raw passphrase, not the derived key. This is part of
//! the v1 container format.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::MAC_LEN;
use crate::error::CryptError;

pub type HmacSha256 = Hmac<Sha256>;

fn keyed(passphrase: &[u8], ciphertext: &[u8], iv: &[u8], salt: &[u8]) -> HmacSha256 {
    // HMAC accepts keys of any length, so this never fails.
    let mut mac = <HmacSha256 as Mac>::new_from_slice(passphrase)
        .unwrap_or_else(|_| unreachable!("HMAC takes keys of any length"));
    mac.update(ciphertext);
    mac.update(iv);
    mac.update(salt);
    mac
}

/// Compute the container tag.
pub fn compute_mac(passphrase: &[u8], ciphertext: &[u8], iv: &[u8], salt: &[u8]) -> [u8; MAC_LEN] {
    keyed(passphrase, ciphertext, iv, salt)
        .finalize()
        .into_bytes()
        .into()
}

/// Check `expected` against a freshly computed tag in constant time.
pub fn verify_mac(
    passphrase: &[u8],
    ciphertext: &[u8],
    iv: &[u8],
    salt: &[u8],
    expected: &[u8],
) -> Result<(), CryptError> {
    keyed(passphrase, ciphertext, iv, salt)
        .verify_slice(expected)
        .map_err(|_| CryptError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_covers_concatenation_in_order() {
        let joined = compute_mac(b"key", b"abc", b"def", b"ghi");
        let split_differently = compute_mac(b"key", b"ab", b"cdef", b"ghi");

        // Same concatenated bytes, same tag.
        assert_eq!(joined, split_differently);

        let reordered = compute_mac(b"key", b"def", b"abc", b"ghi");
        assert_ne!(joined, reordered);
    }

    #[test]
    fn mac_matches_rfc4231_case_2() {
        // HMAC-SHA256, key = "Jefe", data = "what do ya want for nothing?"
        let expected: [u8; 32] = [
            0x5b, 0xdc, 0xc1, 0x46, 0xbf, 0x60, 0x75, 0x4e, 0x6a, 0x04, 0x24, 0x26, 0x08, 0x95,
            0x75, 0xc7, 0x5a, 0x00, 0x3f, 0x08, 0x9d, 0x27, 0x39, 0x83, 0x9d, 0xec, 0x58, 0xb9,
            0x64, 0xec, 0x38, 0x43,
        ];

        let tag = compute_mac(b"Jefe", b"what do ya ", b"want for ", b"nothing?");
        assert_eq!(tag, expected);
    }

    #[test]
    fn verify_accepts_matching_tag() {
        let tag = compute_mac(b"pw", b"ct", b"iv", b"salt");
        assert!(verify_mac(b"pw", b"ct", b"iv", b"salt", &tag).is_ok());
    }

    #[test]
    fn verify_rejects_wrong_key_and_short_tag() {
        let tag = compute_mac(b"pw", b"ct", b"iv", b"salt");

        assert_eq!(
            verify_mac(b"other", b"ct", b"iv", b"salt", &tag),
            Err(CryptError::AuthenticationFailed)
        );
        assert_eq!(
            verify_mac(b"pw", b"ct", b"iv", b"salt", &tag[..16]),
            Err(CryptError::AuthenticationFailed)
        );
    }
}
