use getrandom::fill;

use crate::error::CryptError;

/// Fill buffer with cryptographically secure random bytes
pub fn fill_random(buf: &mut [u8]) -> Result<(), CryptError> {
    fill(buf).map_err(|e| {
        tracing::error!(error = %e, "OS random generator failed");
        CryptError::RandomnessUnavailable
    })
}

/// Fresh random array of `N` bytes.
pub fn random_array<const N: usize>() -> Result<[u8; N], CryptError> {
    let mut out = [0u8; N];
    fill_random(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_arrays_differ() {
        let a: [u8; 32] = random_array().unwrap();
        let b: [u8; 32] = random_array().unwrap();
        assert_ne!(a, b);
    }
}
