//! Configuration builder for layered loading

use crate::{BenchConfig, ConfigError, ConfigResult};
use config::{ConfigBuilder as ConfigBuilderInner, Environment, File, FileFormat};
use std::path::{Path, PathBuf};

/// Log levels accepted in `logging.level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration builder for loading configuration from multiple sources
#[derive(Debug)]
pub struct ConfigBuilder {
    inner: ConfigBuilderInner<config::builder::DefaultState>,
    sources: Vec<ConfigSource>,
    env_separator: String,
}

#[derive(Debug, Clone)]
enum ConfigSource {
    File { path: PathBuf, format: FileFormat },
    Defaults,
    Environment { prefix: String },
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            inner: config::Config::builder(),
            sources: Vec::new(),
            env_separator: "__".to_string(),
        }
    }

    /// Add default configuration values
    pub fn add_defaults(mut self) -> Self {
        self.sources.push(ConfigSource::Defaults);
        self
    }

    /// Add a configuration file source
    ///
    /// Files that do not exist are skipped when building.
    pub fn add_source_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let format = Self::detect_format(&path);
        self.sources.push(ConfigSource::File { path, format });
        self
    }

    /// Add environment variable source with prefix
    pub fn add_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.sources.push(ConfigSource::Environment {
            prefix: prefix.into(),
        });
        self
    }

    /// Set environment variable separator (default: "__")
    pub fn env_separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.env_separator = separator.into();
        self
    }

    /// Build the configuration
    pub fn build(mut self) -> ConfigResult<BenchConfig> {
        // Defaults are always the base layer
        let defaults = serde_yaml::to_value(BenchConfig::default())
            .map_err(|e| ConfigError::other(format!("Failed to serialize defaults: {}", e)))?;
        self.inner = self.inner.add_source(config::Config::try_from(&defaults)?);

        for source in &self.sources {
            match source {
                ConfigSource::File { path, format } => {
                    if path.exists() {
                        self.inner = self
                            .inner
                            .add_source(File::from(path.clone()).format(*format));
                    }
                }
                ConfigSource::Environment { prefix } => {
                    self.inner = self.inner.add_source(
                        Environment::with_prefix(prefix)
                            .prefix_separator(&self.env_separator)
                            .separator(&self.env_separator),
                    );
                }
                ConfigSource::Defaults => {}
            }
        }

        let config: BenchConfig = self.inner.build()?.try_deserialize()?;
        Self::validate(&config)?;

        Ok(config)
    }

    /// Try to build the configuration, returning defaults on error
    pub fn build_or_default(self) -> BenchConfig {
        self.build().unwrap_or_default()
    }

    /// Detect file format from extension
    pub(crate) fn detect_format(path: &Path) -> FileFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("json") => FileFormat::Json,
            _ => FileFormat::Yaml,
        }
    }

    /// Validate what the value types cannot check on their own
    fn validate(config: &BenchConfig) -> ConfigResult<()> {
        if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::invalid_value(
                "logging.level",
                format!(
                    "'{}' is not one of: {}",
                    config.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportFormat;
    use copybench_types::RetryPolicy;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn config_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::new().add_defaults().build().unwrap();
        assert_eq!(config, BenchConfig::default());
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let config = ConfigBuilder::new()
            .add_defaults()
            .add_source_file("/nonexistent/copybench.yaml")
            .build()
            .unwrap();
        assert_eq!(config, BenchConfig::default());
    }

    #[rstest]
    #[case(
        ".yaml",
        "copy:\n  buffer_size: 8192\n  retry:\n    max_retries: 10\nreport:\n  format: json\n"
    )]
    #[case(
        ".toml",
        "[copy]\nbuffer_size = 8192\n\n[copy.retry]\nmax_retries = 10\n\n[report]\nformat = \"json\"\n"
    )]
    #[case(
        ".json",
        r#"{"copy": {"buffer_size": 8192, "retry": {"max_retries": 10}}, "report": {"format": "json"}}"#
    )]
    fn test_builder_file_formats(#[case] suffix: &str, #[case] content: &str) {
        let file = config_file(suffix, content);

        let config = ConfigBuilder::new()
            .add_defaults()
            .add_source_file(file.path())
            .build()
            .unwrap();

        assert_eq!(config.copy.buffer_size.get(), 8192);
        assert_eq!(config.copy.splice_chunk_size.get(), 65536);
        assert_eq!(config.copy.retry, RetryPolicy::bounded(10));
        assert_eq!(config.report.format, ReportFormat::Json);
    }

    #[test]
    fn test_zero_buffer_size_rejected() {
        let file = config_file(".yaml", "copy:\n  buffer_size: 0\n");

        let result = ConfigBuilder::new()
            .add_defaults()
            .add_source_file(file.path())
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_builder_validation() {
        let file = config_file(".yaml", "logging:\n  level: loud\n");

        let error = ConfigBuilder::new()
            .add_defaults()
            .add_source_file(file.path())
            .build()
            .unwrap_err();

        assert!(error.to_string().contains("logging.level"));
        assert_eq!(
            ConfigBuilder::new()
                .add_source_file(file.path())
                .build_or_default(),
            BenchConfig::default()
        );
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            ConfigBuilder::detect_format(Path::new("a.toml")),
            FileFormat::Toml
        );
        assert_eq!(
            ConfigBuilder::detect_format(Path::new("a.json")),
            FileFormat::Json
        );
        assert_eq!(
            ConfigBuilder::detect_format(Path::new("a.yml")),
            FileFormat::Yaml
        );
    }
}
