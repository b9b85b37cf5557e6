//! File access for config files that are rewritten in place.

use anyhow::{Context, Result};
use getrandom::fill;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A config file on disk.
///
/// Reads are plain; writes go through a temporary sibling file and an
/// atomic replace so a crash never leaves a half-encrypted config behind.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Creates a new Storage instance with the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns `true` if the config file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Returns the path to the config file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the entire file into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).with_context(|| format!("failed to read {}", self.path.display()))
    }

    /// Replaces the file contents atomically.
    ///
    /// 1. Write to a randomly named temp file next to the target (owner-only
    ///    permissions on Unix, the contents are credentials or their
    ///    ciphertext)
    /// 2. fsync the temp file
    /// 3. Rename it over the target
    /// 4. fsync the parent directory so the rename survives a crash
    ///
    /// Creates parent directories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, data: &[u8]) -> Result<()> {
        let parent = self.parent_dir();
        fs::create_dir_all(&parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;

        let tmp_path = self.random_tmp_path()?;

        let mut tmp_file = Self::create_private(&tmp_path)
            .with_context(|| format!("failed to create temporary file {}", tmp_path.display()))?;

        let written = tmp_file.write_all(data).and_then(|()| tmp_file.sync_all());
        drop(tmp_file);
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e).context("failed to write temporary file");
        }

        if let Err(e) = self.atomic_replace(&tmp_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        // Directory fsync is not supported on Windows.
        #[cfg(not(target_os = "windows"))]
        File::open(&parent)?.sync_all()?;

        tracing::debug!(path = %self.path.display(), bytes = data.len(), "config file written");
        Ok(())
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    #[cfg(unix)]
    fn create_private(path: &Path) -> std::io::Result<File> {
        use std::os::unix::fs::OpenOptionsExt;

        OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(path)
    }

    #[cfg(not(unix))]
    fn create_private(path: &Path) -> std::io::Result<File> {
        OpenOptions::new().write(true).create_new(true).open(path)
    }

    /// Temp file name in the target's directory: `name.tmp.<randomhex>`.
    fn random_tmp_path(&self) -> Result<PathBuf> {
        let mut buf = [0u8; 8];
        fill(&mut buf).context("OS random generator unavailable")?;

        let rand_string = buf.iter().map(|b| format!("{:02x}", b)).collect::<String>();

        let file_name = self
            .path
            .file_name()
            .with_context(|| format!("{} is not a file path", self.path.display()))?
            .to_string_lossy();

        Ok(self
            .path
            .with_file_name(format!("{file_name}.tmp.{rand_string}")))
    }

    /// Atomically replaces the target file with the temporary file.
    ///
    /// Uses Windows `ReplaceFileW` with `REPLACEFILE_WRITE_THROUGH` when the
    /// target exists, a plain rename otherwise (`ReplaceFileW` requires an
    /// existing target).
    #[cfg(target_os = "windows")]
    fn atomic_replace(&self, tmp_path: &Path) -> Result<()> {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;
        use windows_sys::Win32::Storage::FileSystem::{REPLACEFILE_WRITE_THROUGH, ReplaceFileW};

        if !self.exists() {
            fs::rename(tmp_path, &self.path).context("rename failed")?;
            return Ok(());
        }

        fn to_wide(s: &OsStr) -> Vec<u16> {
            s.encode_wide().chain(std::iter::once(0)).collect()
        }

        let target_w = to_wide(self.path.as_os_str());
        let tmp_w = to_wide(tmp_path.as_os_str());

        // SAFETY:
        // - Strings are valid UTF-16 and null-terminated
        // - Pointers remain valid during the call
        // - Windows does not retain the pointers after return
        let result = unsafe {
            ReplaceFileW(
                target_w.as_ptr(),
                tmp_w.as_ptr(),
                std::ptr::null(),
                REPLACEFILE_WRITE_THROUGH,
                std::ptr::null(),
                std::ptr::null(),
            )
        };

        if result == 0 {
            let err = std::io::Error::last_os_error();
            return Err(err).context("atomic replace failed");
        }

        Ok(())
    }

    /// Atomically replaces the target file with the temporary file.
    ///
    /// On Unix, `rename()` is atomic when both paths are on the same filesystem.
    #[cfg(not(target_os = "windows"))]
    fn atomic_replace(&self, tmp_path: &Path) -> Result<()> {
        fs::rename(tmp_path, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_returns_written_data() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("config.json"));

        storage.save(b"{\"URL\":\"x\"}").unwrap();

        assert_eq!(storage.load().unwrap(), b"{\"URL\":\"x\"}");
    }

    #[test]
    fn load_error_names_the_file() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("missing.json"));

        let err = storage.load().unwrap_err();
        assert!(format!("{err}").contains("missing.json"));
    }

    #[test]
    fn exists_tracks_save() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("config.json"));

        assert!(!storage.exists());
        storage.save(b"data").unwrap();
        assert!(storage.exists());
    }

    #[test]
    fn tmp_path_is_sibling_and_unique() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let storage = Storage::new(path.clone());

        let a = storage.random_tmp_path().unwrap();
        let b = storage.random_tmp_path().unwrap();

        assert_eq!(a.parent(), path.parent());
        assert_ne!(a, path);
        assert_ne!(a, b);
    }

    #[test]
    fn save_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let storage = Storage::new(path.clone());

        storage.save(b"plaintext").unwrap();
        storage.save(b"ciphertext").unwrap();

        assert_eq!(fs::read(path).unwrap(), b"ciphertext");
    }

    #[test]
    fn no_tmp_file_left_after_save() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("config.json"));
        storage.save(b"data").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();

        assert_eq!(entries, vec!["config.json"]);
    }

    #[test]
    fn parent_directory_is_created() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("etc").join("sup").join("config.json");

        Storage::new(nested.clone()).save(b"data").unwrap();

        assert!(nested.exists());
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        Storage::new(path.clone()).save(b"secret").unwrap();

        let mode = fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
