use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::{KEY_LEN, PBKDF2_ITERATIONS};

/// Derive the AES-256 key from a passphrase and salt.
///
/// PBKDF2-HMAC-SHA256 with a fixed iteration count, so the salt stored in a
/// container is all that is needed to rebuild the key.
pub fn derive_key(passphrase: &[u8], salt: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(passphrase, salt, PBKDF2_ITERATIONS, key.as_mut());
    key
}
