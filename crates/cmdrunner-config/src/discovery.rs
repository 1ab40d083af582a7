use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use cmdrunner_utils::error::ConfigError;
use cmdrunner_utils::types::ConfigSource;

use crate::{CliArgs, Config, ExecutorConfig, LoggingConfig};

/// Directory searched for during discovery.
pub const CONFIG_DIR: &str = ".cmdrunner";
pub const CONFIG_FILE: &str = "config.toml";

/// Overrides `[executor] timeout_secs`.
pub const ENV_TIMEOUT: &str = "CMDRUNNER_TIMEOUT";
/// Overrides `[executor] encoding`.
pub const ENV_ENCODING: &str = "CMDRUNNER_ENCODING";

const REPO_ROOT_MARKERS: [&str; 3] = [".git", ".hg", ".svn"];

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
struct TomlConfig {
    executor: Option<ExecutorConfig>,
    logging: Option<LoggingConfig>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > env > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is provided in `cli_args`.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        let mut source_attribution = HashMap::new();
        let mut executor = ExecutorConfig::default();
        let mut logging = LoggingConfig::default();

        let config_path = match &cli_args.config_path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ConfigError::NotFound {
                        path: explicit.display().to_string(),
                    }
                    .into());
                }
                Some(explicit.clone())
            }
            None => Self::discover_config_file_from(start_dir)?,
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            let source = ConfigSource::ConfigFile(path.clone());

            if let Some(file_executor) = file_config.executor {
                if file_executor.work_dir.is_some() {
                    // Relative work_dir is resolved against the directory holding `.cmdrunner/`
                    executor.work_dir = file_executor
                        .work_dir
                        .map(|dir| resolve_against_config(path, dir));
                    source_attribution.insert("work_dir".to_string(), source.clone());
                }
                if file_executor.timeout_secs.is_some() {
                    executor.timeout_secs = file_executor.timeout_secs;
                    source_attribution.insert("timeout_secs".to_string(), source.clone());
                }
                if file_executor.encoding.is_some() {
                    executor.encoding = file_executor.encoding;
                    source_attribution.insert("encoding".to_string(), source.clone());
                }
                if file_executor.kill_grace_ms.is_some() {
                    executor.kill_grace_ms = file_executor.kill_grace_ms;
                    source_attribution.insert("kill_grace_ms".to_string(), source.clone());
                }
                if file_executor.shell.is_some() {
                    executor.shell = file_executor.shell;
                    source_attribution.insert("shell".to_string(), source.clone());
                }
            }

            if let Some(file_logging) = file_config.logging {
                if file_logging.verbose.is_some() {
                    logging.verbose = file_logging.verbose;
                    source_attribution.insert("verbose".to_string(), source.clone());
                }
                if file_logging.mirror.is_some() {
                    logging.mirror = file_logging.mirror;
                    source_attribution.insert("mirror".to_string(), source.clone());
                }
            }
        }

        // Environment overrides file values
        if let Some(raw) = read_env(ENV_TIMEOUT) {
            let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT.to_string(),
                value: format!("'{raw}' is not a whole number of seconds"),
            })?;
            executor.timeout_secs = Some(secs);
            source_attribution.insert("timeout_secs".to_string(), ConfigSource::Env);
        }
        if let Some(raw) = read_env(ENV_ENCODING) {
            executor.encoding = Some(raw.trim().to_string());
            source_attribution.insert("encoding".to_string(), ConfigSource::Env);
        }

        // CLI overrides everything
        if let Some(work_dir) = &cli_args.work_dir {
            executor.work_dir = Some(work_dir.clone());
            source_attribution.insert("work_dir".to_string(), ConfigSource::Cli);
        }
        if let Some(timeout_secs) = cli_args.timeout_secs {
            executor.timeout_secs = Some(timeout_secs);
            source_attribution.insert("timeout_secs".to_string(), ConfigSource::Cli);
        }
        if let Some(encoding) = &cli_args.encoding {
            executor.encoding = Some(encoding.clone());
            source_attribution.insert("encoding".to_string(), ConfigSource::Cli);
        }
        if let Some(shell) = &cli_args.shell {
            executor.shell = Some(shell.clone());
            source_attribution.insert("shell".to_string(), ConfigSource::Cli);
        }
        if let Some(verbose) = cli_args.verbose {
            logging.verbose = Some(verbose);
            source_attribution.insert("verbose".to_string(), ConfigSource::Cli);
        }

        let config = Self {
            executor,
            logging,
            source_attribution,
        };

        config.validate()?;

        Ok(config)
    }

    /// Walk up from `start_dir` looking for `.cmdrunner/config.toml`, stopping
    /// at repository root markers (.git, .hg, .svn) or the filesystem root.
    pub fn discover_config_file_from(start_dir: &Path) -> Result<Option<PathBuf>> {
        for dir in start_dir.ancestors() {
            let candidate = dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
            if REPO_ROOT_MARKERS.iter().any(|marker| dir.join(marker).exists()) {
                break;
            }
        }
        Ok(None)
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config: TomlConfig = toml::from_str(&content).map_err(|e| {
                    ConfigError::InvalidFile(format!("{}: {e}", path.display()))
                })?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TomlConfig::default()),
            Err(e) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            )),
        }
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn resolve_against_config(config_path: &Path, dir: PathBuf) -> PathBuf {
    if dir.is_absolute() {
        return dir;
    }
    // <root>/.cmdrunner/config.toml -> <root>
    match config_path.parent().and_then(Path::parent) {
        Some(root) => root.join(dir),
        None => dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(root: &Path, body: &str) -> PathBuf {
        let dir = root.join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, body).unwrap();
        path
    }

    struct EnvGuard(&'static str);

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            // SAFETY: tests touching the environment are #[serial]
            unsafe { env::set_var(key, value) };
            Self(key)
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // SAFETY: see EnvGuard::set
            unsafe { env::remove_var(self.0) };
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_file() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();

        let config = Config::discover_from(temp.path(), &CliArgs::default()).unwrap();
        assert_eq!(config.executor, ExecutorConfig::default());
        assert_eq!(config.source_of("timeout_secs"), ConfigSource::Defaults);
    }

    #[test]
    #[serial]
    fn test_file_is_found_from_nested_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        let path = write_config(
            temp.path(),
            r#"
            [executor]
            timeout_secs = 12
            work_dir = "sandbox"

            [logging]
            mirror = false
            "#,
        );
        fs::create_dir_all(temp.path().join("sandbox")).unwrap();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let config = Config::discover_from(&nested, &CliArgs::default()).unwrap();
        assert_eq!(config.executor.timeout_secs, Some(12));
        assert_eq!(config.work_dir(), temp.path().join("sandbox"));
        assert!(!config.mirror());
        assert_eq!(
            config.source_of("timeout_secs"),
            ConfigSource::ConfigFile(path)
        );
    }

    #[test]
    #[serial]
    fn test_discovery_stops_at_repository_root() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "[executor]\ntimeout_secs = 7\n");
        let repo = temp.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();

        let found = Config::discover_config_file_from(&repo).unwrap();
        assert!(found.is_none());
    }

    #[test]
    #[serial]
    fn test_precedence_cli_over_env_over_file() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        write_config(
            temp.path(),
            "[executor]\ntimeout_secs = 12\nencoding = \"windows-1252\"\n",
        );

        let _timeout = EnvGuard::set(ENV_TIMEOUT, "20");
        let _encoding = EnvGuard::set(ENV_ENCODING, "ibm866");

        let from_env = Config::discover_from(temp.path(), &CliArgs::default()).unwrap();
        assert_eq!(from_env.executor.timeout_secs, Some(20));
        assert_eq!(from_env.encoding_label(), "ibm866");
        assert_eq!(from_env.source_of("timeout_secs"), ConfigSource::Env);

        let cli = CliArgs {
            timeout_secs: Some(3),
            ..CliArgs::default()
        };
        let from_cli = Config::discover_from(temp.path(), &cli).unwrap();
        assert_eq!(from_cli.executor.timeout_secs, Some(3));
        assert_eq!(from_cli.source_of("timeout_secs"), ConfigSource::Cli);
        assert_eq!(from_cli.source_of("encoding"), ConfigSource::Env);
    }

    #[test]
    #[serial]
    fn test_bad_env_timeout_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        let _timeout = EnvGuard::set(ENV_TIMEOUT, "soon");

        let err = Config::discover_from(temp.path(), &CliArgs::default()).unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT));
    }

    #[test]
    #[serial]
    fn test_explicit_missing_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let cli = CliArgs {
            config_path: Some(temp.path().join("missing.toml")),
            ..CliArgs::default()
        };
        let err = Config::discover_from(temp.path(), &cli).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    #[serial]
    fn test_malformed_toml_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        write_config(temp.path(), "[executor\ntimeout_secs = ");

        let err = Config::discover_from(temp.path(), &CliArgs::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid configuration file"));
    }
}
