//! PKCS#7 padding to the AES block size.

use zeroize::Zeroizing;

use super::BLOCK_LEN;
use crate::error::CryptError;

/// Pad `data` up to the next block boundary.
///
/// Padding is always added: block-aligned input gets a full extra block.
pub fn pad(data: &[u8]) -> Zeroizing<Vec<u8>> {
    let pad_len = BLOCK_LEN - data.len() % BLOCK_LEN;

    let mut padded = Zeroizing::new(Vec::with_capacity(data.len() + pad_len));
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Strip the padding written by [`pad`].
///
/// Only the final byte is read. Callers authenticate the buffer first, so
/// this is a bounds check, not a validity oracle.
pub fn unpad(mut data: Zeroizing<Vec<u8>>) -> Result<Zeroizing<Vec<u8>>, CryptError> {
    let pad_len = match data.last() {
        Some(&b) => b as usize,
        None => return Err(CryptError::StructuralCorruption("empty plaintext")),
    };

    if pad_len == 0 || pad_len > BLOCK_LEN || pad_len > data.len() {
        return Err(CryptError::StructuralCorruption("invalid padding"));
    }

    let len = data.len() - pad_len;
    data.truncate(len);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_fills_partial_block() {
        let padded = pad(b"hello");
        assert_eq!(padded.len(), BLOCK_LEN);
        assert!(padded[5..].iter().all(|&b| b == 11));
    }

    #[test]
    fn pad_adds_full_block_when_aligned() {
        let data = [0xAAu8; BLOCK_LEN * 2];
        let padded = pad(&data);

        assert_eq!(padded.len(), data.len() + BLOCK_LEN);
        assert!(padded[data.len()..].iter().all(|&b| b == BLOCK_LEN as u8));
    }

    #[test]
    fn pad_empty_input_is_one_block() {
        let padded = pad(b"");
        assert_eq!(*padded, vec![BLOCK_LEN as u8; BLOCK_LEN]);
    }

    #[test]
    fn unpad_reverses_pad() {
        for len in 0..=40 {
            let data: Vec<u8> = (0..len as u8).collect();
            let restored = unpad(pad(&data)).unwrap();
            assert_eq!(*restored, data);
        }
    }

    #[test]
    fn unpad_rejects_zero_pad_byte() {
        let data = Zeroizing::new(vec![1u8, 2, 3, 0]);
        assert_eq!(
            unpad(data),
            Err(CryptError::StructuralCorruption("invalid padding"))
        );
    }

    #[test]
    fn unpad_rejects_oversized_pad_byte() {
        let mut block = vec![0u8; BLOCK_LEN];
        block[BLOCK_LEN - 1] = 17;
        assert!(unpad(Zeroizing::new(block)).is_err());

        assert!(unpad(Zeroizing::new(vec![4u8, 4])).is_err());
    }

    #[test]
    fn unpad_rejects_empty_buffer() {
        assert!(unpad(Zeroizing::new(Vec::new())).is_err());
    }
}
