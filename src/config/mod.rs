#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::storage::{FileStorage, MemoryStorage};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::path::PathBuf;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    File(PathBuf),
    Memory,
}

/// Effective settings after merging the config file with command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub backend: StorageBackend,
    pub seed: bool,
    pub log_level: Option<String>,
    pub json_logs: bool,
    pub verbose: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self::from_toml(&TomlConfig::default())
    }
}

impl AppSettings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let backend = match config.storage.backend.as_str() {
            "memory" => StorageBackend::Memory,
            _ => StorageBackend::File(PathBuf::from(&config.storage.path)),
        };

        Self {
            backend,
            seed: config.seed.enabled,
            log_level: config.logging.level.clone(),
            json_logs: config.logging.json,
            verbose: false,
        }
    }

    /// Reads and validates a config file, or returns defaults when `path` is `None`.
    pub fn load(path: Option<&std::path::Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                tracing::debug!("Loaded configuration from {}", path.display());
                Ok(Self::from_toml(&config))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn open_storage(&self) -> Box<dyn Storage> {
        match &self.backend {
            StorageBackend::File(path) => Box::new(FileStorage::new(path.clone())),
            StorageBackend::Memory => Box::new(MemoryStorage::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.backend, StorageBackend::File(PathBuf::from("./data")));
        assert!(settings.seed);
        assert!(!settings.json_logs);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[storage]\nbackend = \"cloud\"\n").unwrap();

        assert!(AppSettings::load(Some(temp_file.path())).is_err());
    }

    #[test]
    fn test_load_memory_backend() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\nbackend = \"memory\"\n[seed]\nenabled = false\n")
            .unwrap();

        let settings = AppSettings::load(Some(temp_file.path())).unwrap();
        assert_eq!(settings.backend, StorageBackend::Memory);
        assert!(!settings.seed);
    }
}
