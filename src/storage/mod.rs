// src/storage/mod.rs
use std::path::PathBuf;
use thiserror::Error;

pub mod file;
pub mod memory;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Write failed: {0}")]
    WriteError(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Synchronous key-value slot the record store persists into.
///
/// Writes are all-or-nothing and last-write-wins.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

// Enum to hold specific backend implementations
#[derive(Debug)]
pub enum BackendType {
    Memory(memory::MemoryBackend),
    File(file::FileBackend),
}

// The storage handle used by the binary; the store itself is generic
#[derive(Debug)]
pub struct Storage {
    pub backend: BackendType,
}

impl Storage {
    /// Opens a backend from a URL: `memory:` or `file:<dir>`. A bare path is a file backend.
    pub fn open(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(StorageError::ConfigError("Empty storage URL".into()));
        }

        let backend = if url == "memory:" {
            BackendType::Memory(memory::MemoryBackend::new())
        } else {
            let dir = url.strip_prefix("file:").unwrap_or(url);
            if dir.is_empty() {
                return Err(StorageError::ConfigError("Missing directory in file storage URL".into()));
            }
            BackendType::File(file::FileBackend::new(PathBuf::from(dir))?)
        };

        log::info!("Opened {} storage", Self::kind_of(&backend));
        Ok(Self { backend })
    }

    fn kind_of(backend: &BackendType) -> &'static str {
        match backend {
            BackendType::Memory(_) => "in-memory",
            BackendType::File(_) => "file",
        }
    }

    pub fn get_backend_type(&self) -> &'static str {
        Self::kind_of(&self.backend)
    }
}

impl StorageBackend for Storage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match &self.backend {
            BackendType::Memory(backend) => backend.get(key),
            BackendType::File(backend) => backend.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match &mut self.backend {
            BackendType::Memory(backend) => backend.set(key, value),
            BackendType::File(backend) => backend.set(key, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_url_opens_memory_backend() {
        let storage = Storage::open("memory:").unwrap();
        assert_eq!(storage.get_backend_type(), "in-memory");
    }

    #[test]
    fn file_url_and_bare_path_open_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("file:{}", dir.path().display());
        assert_eq!(Storage::open(&url).unwrap().get_backend_type(), "file");

        let bare = dir.path().join("nested");
        let storage = Storage::open(&bare.display().to_string()).unwrap();
        assert_eq!(storage.get_backend_type(), "file");
        assert!(bare.is_dir());
    }

    #[test]
    fn empty_urls_are_rejected() {
        assert!(matches!(Storage::open("  "), Err(StorageError::ConfigError(_))));
        assert!(matches!(Storage::open("file:"), Err(StorageError::ConfigError(_))));
    }

    #[test]
    fn storage_delegates_to_backend() {
        let mut storage = Storage::open("memory:").unwrap();
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(storage.get("other").unwrap(), None);
    }
}
