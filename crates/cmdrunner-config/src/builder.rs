use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use cmdrunner_utils::error::ConfigError;
use cmdrunner_utils::types::ConfigSource;

use crate::{Config, ExecutorConfig, LoggingConfig};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding the executor without config files or
    /// environment variables.
    ///
    /// ```rust,no_run
    /// use cmdrunner_config::Config;
    /// use std::time::Duration;
    ///
    /// let config = Config::builder()
    ///     .work_dir("/tmp/sandbox")
    ///     .timeout(Duration::from_secs(10))
    ///     .encoding("windows-1254")
    ///     .build()
    ///     .expect("valid config");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Fluent builder for [`Config`].
///
/// Every value set here is attributed to [`ConfigSource::Programmatic`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    work_dir: Option<PathBuf>,
    timeout: Option<Duration>,
    encoding: Option<String>,
    kill_grace: Option<Duration>,
    shell: Option<String>,
    verbose: Option<bool>,
    mirror: Option<bool>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn work_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(path.into());
        self
    }

    /// Default timeout; sub-second precision is rounded up to whole seconds.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    #[must_use]
    pub fn kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = Some(grace);
        self
    }

    #[must_use]
    pub fn shell(mut self, program: impl Into<String>) -> Self {
        self.shell = Some(program.into());
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    #[must_use]
    pub fn mirror(mut self, mirror: bool) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut source_attribution = HashMap::new();
        let mut mark = |key: &str, set: bool| {
            if set {
                source_attribution.insert(key.to_string(), ConfigSource::Programmatic);
            }
        };

        mark("work_dir", self.work_dir.is_some());
        mark("timeout_secs", self.timeout.is_some());
        mark("encoding", self.encoding.is_some());
        mark("kill_grace_ms", self.kill_grace.is_some());
        mark("shell", self.shell.is_some());
        mark("verbose", self.verbose.is_some());
        mark("mirror", self.mirror.is_some());

        let config = Config {
            executor: ExecutorConfig {
                work_dir: self.work_dir,
                timeout_secs: self.timeout.map(whole_seconds),
                encoding: self.encoding,
                kill_grace_ms: self
                    .kill_grace
                    .map(|grace| u64::try_from(grace.as_millis()).unwrap_or(u64::MAX)),
                shell: self.shell,
            },
            logging: LoggingConfig {
                verbose: self.verbose,
                mirror: self.mirror,
            },
            source_attribution,
        };

        config.validate()?;
        Ok(config)
    }
}

fn whole_seconds(timeout: Duration) -> u64 {
    let secs = timeout.as_secs();
    if timeout.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_values_are_programmatic() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::builder()
            .work_dir(temp.path())
            .timeout(Duration::from_secs(5))
            .encoding("windows-1254")
            .mirror(false)
            .build()
            .unwrap();

        assert_eq!(config.work_dir(), temp.path());
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.output_encoding().unwrap().name(), "windows-1254");
        assert!(!config.mirror());
        assert_eq!(config.source_of("timeout_secs"), ConfigSource::Programmatic);
        assert_eq!(config.source_of("kill_grace_ms"), ConfigSource::Defaults);
    }

    #[test]
    fn test_sub_second_timeout_rounds_up() {
        let config = Config::builder()
            .timeout(Duration::from_millis(1500))
            .build()
            .unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(2));

        let tiny = Config::builder()
            .timeout(Duration::from_millis(1))
            .build()
            .unwrap();
        assert_eq!(tiny.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_builder_validates() {
        let err = Config::builder()
            .timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }
}
