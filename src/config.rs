//! Analyzer configuration, loaded from TOML

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::ConfigError;
use crate::search::DepthMode;

/// Settings for an [`Analyzer`](crate::engine::Analyzer) session.
///
/// Every key is optional in the file:
///
/// ```toml
/// book_path = "opening_book.bin"
/// threads = 0
/// time_limit_ms = 5000
/// depth_mode = "from-root"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Opening book file; without one, shallow positions are searched
    pub book_path: Option<PathBuf>,

    /// Worker threads for per-action search: 1 runs on the calling thread,
    /// 0 uses rayon's default pool, n builds a pool of n
    pub threads: usize,

    /// Give up on an evaluation after this many milliseconds
    pub time_limit_ms: Option<u64>,

    /// How forced-sequence lengths are reported
    pub depth_mode: DepthMode,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            book_path: None,
            threads: 1,
            time_limit_ms: None,
            depth_mode: DepthMode::Absolute,
        }
    }
}

impl AnalyzerConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;
        info!(threads = config.threads, book = ?config.book_path, "Config loaded successfully");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.threads, 1);
        assert!(config.book_path.is_none());
        assert!(config.time_limit_ms.is_none());
        assert_eq!(config.depth_mode, DepthMode::Absolute);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(AnalyzerConfig::from_toml_str("").unwrap(), AnalyzerConfig::default());
    }

    #[test]
    fn test_parse_all_keys() {
        let config = AnalyzerConfig::from_toml_str(
            r#"
            book_path = "book.bin"
            threads = 4
            time_limit_ms = 250
            depth_mode = "from-root"
            "#,
        )
        .unwrap();
        assert_eq!(config.book_path, Some(PathBuf::from("book.bin")));
        assert_eq!(config.threads, 4);
        assert_eq!(config.time_limit_ms, Some(250));
        assert_eq!(config.depth_mode, DepthMode::FromRoot);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            AnalyzerConfig::from_toml_str("depth_mode = \"sideways\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AnalyzerConfig::from_toml_str("threads = -1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "threads = 2").unwrap();
        let config = AnalyzerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.threads, 2);

        let missing = file.path().with_extension("missing");
        assert!(matches!(AnalyzerConfig::from_file(missing), Err(ConfigError::Io(_))));
    }
}
