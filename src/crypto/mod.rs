//! Cryptographic primitives for the config container.
//!
//! Provides key derivation, padding, AES-256-CBC chaining, HMAC
//! authentication and the encrypt/decrypt pair built from them.

pub mod cbc;
pub mod decrypt;
pub mod encrypt;
pub mod kdf;
pub mod mac;
pub mod padding;
pub mod random;

pub use decrypt::{decrypt, open};
pub use encrypt::{encrypt, seal};
pub use kdf::derive_key;

/// Length of the KDF salt (32 bytes).
pub const SALT_LEN: usize = 32;
/// Length of the CBC initialization vector (one AES block).
pub const IV_LEN: usize = 16;
/// Length of the encryption key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the HMAC-SHA256 tag.
pub const MAC_LEN: usize = 32;
/// AES block size.
pub const BLOCK_LEN: usize = 16;
/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 4096;
