mod config;
pub mod crypto;
mod error;
pub mod format;
mod storage;

pub use crate::config::Config;
pub use crate::crypto::{decrypt, derive_key, encrypt, open, seal};
pub use crate::error::CryptError;
pub use crate::format::Container;
pub use crate::storage::Storage;
use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use tracing::info;
use zeroize::Zeroizing;

/// A config file that may be stored sealed or in plaintext.
pub struct ConfigFile {
    storage: Storage,
}

impl ConfigFile {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::new(Storage::new(path))
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Whether the file on disk is a sealed container.
    pub fn is_encrypted(&self) -> Result<bool> {
        Ok(format::is_container(&self.storage.load()?))
    }

    /// Seal the plaintext config in place.
    pub fn encrypt(&self, passphrase: &[u8]) -> Result<()> {
        let plaintext = Zeroizing::new(self.storage.load()?);
        if format::is_container(&plaintext) {
            bail!("{} is already encrypted", self.storage.path().display());
        }

        let sealed = crypto::seal(passphrase, &plaintext).context("failed to encrypt config")?;
        drop(plaintext);

        self.storage.save(&sealed)?;
        info!(path = %self.storage.path().display(), "config encrypted");
        Ok(())
    }

    /// Replace the sealed config with its plaintext.
    pub fn decrypt(&self, passphrase: &[u8]) -> Result<()> {
        let data = self.storage.load()?;
        if !format::is_container(&data) {
            bail!("{} is not encrypted", self.storage.path().display());
        }

        let plaintext = crypto::decrypt(passphrase, &data).with_context(|| {
            format!("failed to decrypt {}", self.storage.path().display())
        })?;

        self.storage.save(&plaintext)?;
        info!(path = %self.storage.path().display(), "config decrypted");
        Ok(())
    }

    /// Config bytes, decrypted when a non-empty passphrase is given.
    ///
    /// An absent or empty passphrase means the file is expected to be
    /// plaintext.
    pub fn read(&self, passphrase: Option<&[u8]>) -> Result<Zeroizing<Vec<u8>>> {
        let data = self.storage.load()?;

        match passphrase {
            Some(p) if !p.is_empty() => crypto::decrypt(p, &data).with_context(|| {
                format!("failed to decrypt {}", self.storage.path().display())
            }),
            _ if format::is_container(&data) => bail!(
                "{} is encrypted; a key is required",
                self.storage.path().display()
            ),
            _ => Ok(Zeroizing::new(data)),
        }
    }

    /// Read, parse and validate the config.
    pub fn load(&self, passphrase: Option<&[u8]>) -> Result<Config> {
        let data = self.read(passphrase)?;
        Config::from_slice(&data)
            .with_context(|| format!("invalid config in {}", self.storage.path().display()))
    }
}
