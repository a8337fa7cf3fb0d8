//! Configuration loader utilities

use crate::{BenchConfig, ConfigBuilder, ConfigError, ConfigResult, ENV_PREFIX};
use std::path::{Path, PathBuf};

/// File names probed by [`ConfigLoader::load_default`], in order
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["copybench.yaml", "copybench.yml", "copybench.toml"];

/// Configuration loader with common loading patterns
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the first default file found in the working
    /// directory, then the environment
    pub fn load_default() -> ConfigResult<BenchConfig> {
        let mut builder = ConfigBuilder::new().add_defaults();

        if let Some(path) = Self::config_exists() {
            builder = builder.add_source_file(path);
        }

        builder.add_env_prefix(ENV_PREFIX).build()
    }

    /// Load configuration from a specific file, then the environment
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<BenchConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Configuration file not found",
                ),
            });
        }

        ConfigBuilder::new()
            .add_defaults()
            .add_source_file(path)
            .add_env_prefix(ENV_PREFIX)
            .build()
    }

    /// Save configuration to a file, format chosen by extension (YAML by default)
    pub fn save_to_file<P: AsRef<Path>>(config: &BenchConfig, path: P) -> ConfigResult<()> {
        let path = path.as_ref();

        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(config)?,
            Some("json") => serde_json::to_string_pretty(config)?,
            _ => serde_yaml::to_string(config)?,
        };

        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// First default configuration file present in the working directory
    pub fn config_exists() -> Option<PathBuf> {
        DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportFormat;
    use copybench_types::{BufferSize, RetryPolicy};
    use rstest::rstest;
    use tempfile::TempDir;

    fn customized() -> BenchConfig {
        let mut config = BenchConfig::default();
        config.copy.buffer_size = BufferSize::new(65536).unwrap();
        config.copy.retry = RetryPolicy::bounded(100);
        config.report.format = ReportFormat::Json;
        config.logging.level = "debug".to_string();
        config
    }

    #[rstest]
    #[case("bench.yaml")]
    #[case("bench.toml")]
    #[case("bench.json")]
    fn test_save_and_load(#[case] name: &str) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(name);

        let original = customized();
        ConfigLoader::save_to_file(&original, &config_path).unwrap();

        let loaded = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_save_default_unbounded_retry() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("defaults.toml");

        ConfigLoader::save_to_file(&BenchConfig::default(), &config_path).unwrap();

        let loaded = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.copy.retry, RetryPolicy::unbounded());
    }

    #[test]
    fn test_load_missing_file() {
        let error = ConfigLoader::load_from_file("/nonexistent/copybench.yaml").unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
    }
}
