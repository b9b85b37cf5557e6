//! AES-256 in CBC mode.
//!
//! Chaining is done by hand over the `aes` block cipher. Both directions
//! expect block-aligned input; callers pad or check lengths first.

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes256Dec, Aes256Enc, Block};
use zeroize::Zeroizing;

use super::{BLOCK_LEN, IV_LEN, KEY_LEN};

fn xor_into(block: &mut Block, other: &[u8]) {
    for (b, o) in block.iter_mut().zip(other) {
        *b ^= o;
    }
}

/// Encrypt block-aligned `padded` plaintext.
pub fn encrypt_cbc(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN], padded: &[u8]) -> Vec<u8> {
    debug_assert_eq!(padded.len() % BLOCK_LEN, 0);

    let cipher = Aes256Enc::new(key.into());
    let mut ciphertext = Vec::with_capacity(padded.len());
    let mut prev = Block::from(*iv);

    for chunk in padded.chunks_exact(BLOCK_LEN) {
        let mut block = Block::clone_from_slice(chunk);
        xor_into(&mut block, &prev);
        cipher.encrypt_block(&mut block);

        ciphertext.extend_from_slice(&block);
        prev = block;
    }

    ciphertext
}

/// Decrypt block-aligned `ciphertext`. Padding is left in place.
pub fn decrypt_cbc(
    key: &[u8; KEY_LEN],
    iv: &[u8; IV_LEN],
    ciphertext: &[u8],
) -> Zeroizing<Vec<u8>> {
    debug_assert_eq!(ciphertext.len() % BLOCK_LEN, 0);

    let cipher = Aes256Dec::new(key.into());
    let mut plaintext = Zeroizing::new(Vec::with_capacity(ciphertext.len()));
    let mut prev: &[u8] = iv;

    for chunk in ciphertext.chunks_exact(BLOCK_LEN) {
        let mut block = Block::clone_from_slice(chunk);
        cipher.decrypt_block(&mut block);
        xor_into(&mut block, prev);

        plaintext.extend_from_slice(&block);
        prev = chunk;
    }

    plaintext
}
