use crate::utils::error::{EdulistError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_one_of, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

pub const STORAGE_BACKENDS: [&str; 2] = ["file", "memory"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub storage: StorageConfig,
    pub seed: SeedConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: String,
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            path: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: bool,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EdulistError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_one_of("storage.backend", &self.storage.backend, &STORAGE_BACKENDS)?;

        if self.storage.backend == "file" {
            validate_path("storage.path", &self.storage.path)?;
        }

        if let Some(level) = &self.logging.level {
            validate_non_empty_string("logging.level", level)?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[storage]
backend = "memory"
path = "./somewhere"

[seed]
enabled = false

[logging]
level = "debug"
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.storage.backend, "memory");
        assert!(!config.seed.enabled);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.storage.backend, "file");
        assert_eq!(config.storage.path, "./data");
        assert!(config.seed.enabled);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("EDULIST_TEST_DATA_DIR", "/tmp/edulist-test");

        let toml_content = r#"
[storage]
path = "${EDULIST_TEST_DATA_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.storage.path, "/tmp/edulist-test");

        std::env::remove_var("EDULIST_TEST_DATA_DIR");
    }

    #[test]
    fn test_unset_env_var_left_in_place() {
        let config =
            TomlConfig::from_toml_str("[storage]\npath = \"${EDULIST_SURELY_UNSET_VAR}\"\n")
                .unwrap();
        assert_eq!(config.storage.path, "${EDULIST_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_config_validation() {
        let bad_backend = TomlConfig::from_toml_str("[storage]\nbackend = \"s3\"\n").unwrap();
        assert!(bad_backend.validate().is_err());

        let empty_path = TomlConfig::from_toml_str("[storage]\npath = \"\"\n").unwrap();
        assert!(empty_path.validate().is_err());

        let memory_empty_path =
            TomlConfig::from_toml_str("[storage]\nbackend = \"memory\"\npath = \"\"\n").unwrap();
        assert!(memory_empty_path.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[storage\nbackend = 1").unwrap_err();
        assert!(matches!(err, EdulistError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\nbackend = \"memory\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.storage.backend, "memory");
    }
}
