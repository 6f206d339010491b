use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_TAGS: [&str; 5] = ["React", "Next.js", "Tailwind", "JavaScript", "CSS"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(alias = "suggestedTags", default = "default_tags")]
    pub suggested_tags: Vec<String>,
}

fn default_tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|tag| tag.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suggested_tags: default_tags(),
        }
    }
}

impl Config {
    /// Reads a config file. A missing file is `Ok(None)`.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        config.normalize();

        Ok(Some(config))
    }

    /// Loads from `path` (or the default location), falling back to the
    /// built-in suggestions when no file exists.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => Self::expand_path(path).unwrap_or_else(|| path.to_path_buf()),
            None => Self::config_path(),
        };
        Ok(Self::load_from_path(&path)?.unwrap_or_default())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/tagline");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Replaces the suggestions with labels given on the command line.
    pub fn override_tags(&mut self, tags: Vec<String>) {
        if tags.is_empty() {
            return;
        }
        self.suggested_tags = tags;
        self.normalize();
    }

    fn normalize(&mut self) {
        self.suggested_tags = self
            .suggested_tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn config_path_is_expanded() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/tagline/config.toml"));
    }

    #[test]
    fn missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nonexistent.toml");

        assert!(Config::load_from_path(&missing).unwrap().is_none());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_or_default(Some(&missing)).unwrap();
        assert_eq!(
            config.suggested_tags,
            vec!["React", "Next.js", "Tailwind", "JavaScript", "CSS"]
        );
    }

    #[test]
    fn reads_snake_case_key() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "suggested_tags = [\"Rust\", \" Go \", \"\"]\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(config.suggested_tags, vec!["Rust", "Go"]);
    }

    #[test]
    fn reads_camel_case_key() {
        let config: Config = toml::from_str("suggestedTags = [\"Zig\"]").unwrap();

        assert_eq!(config.suggested_tags, vec!["Zig"]);
    }

    #[test]
    fn empty_file_uses_default_tags() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_file_reports_its_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "suggested_tags = 3").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn command_line_tags_replace_configured_ones() {
        let mut config = Config::default();
        config.override_tags(vec!["Rust".to_string(), "  ".to_string()]);
        assert_eq!(config.suggested_tags, vec!["Rust"]);

        config.override_tags(Vec::new());
        assert_eq!(config.suggested_tags, vec!["Rust"]);
    }
}
