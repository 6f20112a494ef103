//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `DV_*`
//! environment variables, and merging configurations with proper
//! precedence rules.

use crate::disposable::DisposableDomains;
use crate::error::DomainVerifyError;
use crate::types::MAX_CONCURRENCY;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration loaded from TOML files.
///
/// This represents the structure of configuration files that users can create
/// to set default values and extend the disposable blocklist.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Disposable blocklist sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocklist: Option<BlocklistConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    /// Default concurrency level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Resolver timeout (as string, e.g., "5s", "30s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Input CSV path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    /// Path of the `domain,error` report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Path of the unique-domain report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_output: Option<String>,
}

/// Where disposable domains come from.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BlocklistConfig {
    /// File with one domain per line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Extra domains listed inline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<Vec<String>>,

    /// Include the built-in list (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub builtin: Option<bool>,
}

impl BlocklistConfig {
    /// Build the classifier described by this configuration.
    pub fn load(&self) -> Result<DisposableDomains, DomainVerifyError> {
        let mut classifier = if self.builtin.unwrap_or(true) {
            DisposableDomains::builtin()
        } else {
            DisposableDomains::default()
        };

        if let Some(file) = &self.file {
            classifier = classifier.merged_with(DisposableDomains::from_file(file)?);
        }

        if let Some(domains) = &self.domains {
            let inline = domains
                .iter()
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty());
            classifier = classifier.merged_with(DisposableDomains::new(inline));
        }

        debug!(domains = classifier.len(), "blocklist loaded");
        Ok(classifier)
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The parsed configuration or an error if parsing fails.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainVerifyError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainVerifyError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainVerifyError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            DomainVerifyError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        debug!(path = %path.display(), "configuration file loaded");
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is loaded first, then the home directory file, then the
    /// local file; later files override earlier ones field by field. A
    /// discovered file that cannot be read, parsed or validated fails the
    /// whole load.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainVerifyError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            let config = self.load_file(&path).map_err(|e| {
                DomainVerifyError::config(format!(
                    "Failed to load config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            merged_config = self.merge_configs(merged_config, config);
            loaded_files.push(path);
        }

        if self.verbose && loaded_files.len() > 1 {
            let order: Vec<String> = loaded_files
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            warn!(
                "Multiple config files found, later ones take precedence: {}",
                order.join(", ")
            );
        }

        Ok(merged_config)
    }

    /// Get the local configuration file path.
    ///
    /// Looks for configuration files in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./domain-verify.toml", "./.domain-verify.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Get the global configuration file path.
    ///
    /// Looks for configuration files in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let candidates = [".domain-verify.toml", "domain-verify.toml"];

        candidates
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Get the XDG configuration file path.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-verify").join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations with proper precedence.
    ///
    /// Values from `higher` take precedence over values from `lower`.
    /// Inline blocklist domains accumulate across files.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(lower_defaults), Some(higher_defaults)) => Some(DefaultsConfig {
                    concurrency: higher_defaults.concurrency.or(lower_defaults.concurrency),
                    timeout: higher_defaults.timeout.or(lower_defaults.timeout),
                    input: higher_defaults.input.or(lower_defaults.input),
                    output: higher_defaults.output.or(lower_defaults.output),
                    unique_output: higher_defaults
                        .unique_output
                        .or(lower_defaults.unique_output),
                }),
                (lower_defaults, higher_defaults) => higher_defaults.or(lower_defaults),
            },
            blocklist: match (lower.blocklist, higher.blocklist) {
                (Some(lower_list), Some(higher_list)) => {
                    let domains = match (lower_list.domains, higher_list.domains) {
                        (Some(mut lower_domains), Some(higher_domains)) => {
                            lower_domains.extend(higher_domains);
                            Some(lower_domains)
                        }
                        (lower_domains, higher_domains) => higher_domains.or(lower_domains),
                    };
                    Some(BlocklistConfig {
                        file: higher_list.file.or(lower_list.file),
                        domains,
                        builtin: higher_list.builtin.or(lower_list.builtin),
                    })
                }
                (lower_list, higher_list) => higher_list.or(lower_list),
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainVerifyError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > MAX_CONCURRENCY {
                    return Err(DomainVerifyError::config(format!(
                        "Concurrency must be between 1 and {}",
                        MAX_CONCURRENCY
                    )));
                }
            }

            if let Some(timeout_str) = &defaults.timeout {
                if parse_timeout(timeout_str).is_none() {
                    return Err(DomainVerifyError::config(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                        timeout_str
                    )));
                }
            }

            for (name, value) in [
                ("input", &defaults.input),
                ("output", &defaults.output),
                ("unique_output", &defaults.unique_output),
            ] {
                if matches!(value, Some(v) if v.trim().is_empty()) {
                    return Err(DomainVerifyError::config(format!(
                        "'{}' cannot be an empty path",
                        name
                    )));
                }
            }
        }

        if let Some(domains) = config.blocklist.as_ref().and_then(|b| b.domains.as_ref()) {
            for domain in domains {
                if domain.trim().is_empty() || domain.contains(char::is_whitespace) {
                    return Err(DomainVerifyError::config(format!(
                        "Invalid blocklist domain '{}'",
                        domain
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via DV_* environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub timeout: Option<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub unique_output: Option<String>,
    pub blocklist: Option<String>,
    pub config: Option<String>,
}

/// Load configuration from environment variables.
///
/// Parses all DV_* environment variables and returns a structured configuration.
/// Invalid values are ignored, with a warning when `verbose` is set.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    load_env_config_from(|key| env::var(key).ok(), verbose)
}

/// Same as [`load_env_config`], reading variables through `lookup`.
pub fn load_env_config_from<F>(lookup: F, verbose: bool) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    // DV_CONCURRENCY - simultaneous DNS queries
    if let Some(val) = lookup("DV_CONCURRENCY") {
        match val.trim().parse::<usize>() {
            Ok(concurrency) if (1..=MAX_CONCURRENCY).contains(&concurrency) => {
                debug!("Using DV_CONCURRENCY={}", concurrency);
                env_config.concurrency = Some(concurrency);
            }
            _ => {
                if verbose {
                    warn!("Invalid DV_CONCURRENCY='{}', must be 1-{}", val, MAX_CONCURRENCY);
                }
            }
        }
    }

    // DV_TIMEOUT - resolver timeout
    if let Some(val) = lookup("DV_TIMEOUT") {
        if parse_timeout(&val).is_some() {
            debug!("Using DV_TIMEOUT={}", val);
            env_config.timeout = Some(val);
        } else if verbose {
            warn!("Invalid DV_TIMEOUT='{}', use format like '5s', '30s', '2m'", val);
        }
    }

    let path_vars: [(&str, &mut Option<String>); 5] = [
        ("DV_INPUT", &mut env_config.input),
        ("DV_OUTPUT", &mut env_config.output),
        ("DV_UNIQUE_OUTPUT", &mut env_config.unique_output),
        ("DV_BLOCKLIST", &mut env_config.blocklist),
        ("DV_CONFIG", &mut env_config.config),
    ];
    for (key, slot) in path_vars {
        if let Some(val) = lookup(key) {
            if val.trim().is_empty() {
                if verbose {
                    warn!("Ignoring empty {}", key);
                }
            } else {
                debug!("Using {}={}", key, val);
                *slot = Some(val);
            }
        }
    }

    env_config
}

/// Parse a timeout string like "5s", "30s", "2m" or a bare number of seconds.
///
/// Zero is rejected: the resolver needs a positive timeout.
pub fn parse_timeout(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let seconds = if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.trim().parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.trim().parse::<u64>().ok().and_then(|m| m.checked_mul(60))
    } else {
        timeout_str.parse::<u64>().ok()
    }?;

    (seconds > 0).then(|| Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("5s"), Some(Duration::from_secs(5)));
        assert_eq!(parse_timeout("30S"), Some(Duration::from_secs(30)));
        assert_eq!(parse_timeout("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_timeout("5"), Some(Duration::from_secs(5)));
        assert_eq!(parse_timeout("0s"), None);
        assert_eq!(parse_timeout("invalid"), None);
    }

    #[test]
    fn test_load_valid_config() {
        let temp_file = write_config(
            r#"
[defaults]
concurrency = 25
timeout = "3s"
input = "contacts.csv"

[blocklist]
domains = ["trash.example"]
builtin = false
"#,
        );

        let manager = ConfigManager::new(false);
        let config = manager.load_file(temp_file.path()).unwrap();

        let defaults = config.defaults.unwrap();
        assert_eq!(defaults.concurrency, Some(25));
        assert_eq!(defaults.timeout, Some("3s".to_string()));
        assert_eq!(defaults.input, Some("contacts.csv".to_string()));
        assert_eq!(defaults.output, None);

        let blocklist = config.blocklist.unwrap();
        assert_eq!(blocklist.builtin, Some(false));
        assert_eq!(blocklist.domains, Some(vec!["trash.example".to_string()]));
    }

    #[test]
    fn test_invalid_concurrency() {
        let temp_file = write_config("[defaults]\nconcurrency = 0\n");
        let manager = ConfigManager::new(false);
        assert!(manager.load_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let temp_file = write_config("[defaults]\ntimeout = \"soon\"\n");
        let manager = ConfigManager::new(false);
        let err = manager.load_file(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid timeout format"));
    }

    #[test]
    fn test_malformed_toml() {
        let temp_file = write_config("[defaults\nconcurrency = 5\n");
        let manager = ConfigManager::new(false);
        let err = manager.load_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, DomainVerifyError::ConfigError { .. }));
    }

    #[test]
    fn test_missing_config_file() {
        let manager = ConfigManager::new(false);
        let err = manager.load_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, DomainVerifyError::FileError { .. }));
    }

    #[test]
    fn test_merge_configs() {
        let manager = ConfigManager::new(false);

        let lower = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(10),
                input: Some("a.csv".to_string()),
                ..Default::default()
            }),
            blocklist: Some(BlocklistConfig {
                domains: Some(vec!["one.test".to_string()]),
                builtin: Some(false),
                ..Default::default()
            }),
        };

        let higher = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(25),
                ..Default::default()
            }),
            blocklist: Some(BlocklistConfig {
                domains: Some(vec!["two.test".to_string()]),
                ..Default::default()
            }),
        };

        let merged = manager.merge_configs(lower, higher);
        let defaults = merged.defaults.unwrap();
        assert_eq!(defaults.concurrency, Some(25)); // Higher wins
        assert_eq!(defaults.input, Some("a.csv".to_string())); // Lower preserved

        let blocklist = merged.blocklist.unwrap();
        assert_eq!(
            blocklist.domains,
            Some(vec!["one.test".to_string(), "two.test".to_string()])
        );
        assert_eq!(blocklist.builtin, Some(false));
    }

    #[test]
    fn test_blocklist_load() {
        let mut list = NamedTempFile::new().unwrap();
        writeln!(list, "burner.test").unwrap();
        list.flush().unwrap();

        let config = BlocklistConfig {
            file: Some(list.path().to_string_lossy().into_owned()),
            domains: Some(vec![" Inline.Test ".to_string()]),
            builtin: Some(false),
        };
        let classifier = config.load().unwrap();

        assert_eq!(classifier.len(), 2);
        assert!(classifier.is_disposable("burner.test"));
        assert!(classifier.is_disposable("inline.test"));
        assert!(!classifier.is_disposable("mailinator.com"));

        let default = BlocklistConfig::default().load().unwrap();
        assert!(default.is_disposable("mailinator.com"));
    }

    #[test]
    fn test_load_env_config() {
        let env = load_env_config_from(
            env_from(&[
                ("DV_CONCURRENCY", "40"),
                ("DV_TIMEOUT", "2m"),
                ("DV_INPUT", "in.csv"),
                ("DV_BLOCKLIST", "extra.txt"),
            ]),
            false,
        );

        assert_eq!(env.concurrency, Some(40));
        assert_eq!(env.timeout, Some("2m".to_string()));
        assert_eq!(env.input, Some("in.csv".to_string()));
        assert_eq!(env.blocklist, Some("extra.txt".to_string()));
        assert_eq!(env.output, None);
        assert_eq!(env.config, None);
    }

    #[test]
    fn test_load_env_config_ignores_invalid() {
        let env = load_env_config_from(
            env_from(&[
                ("DV_CONCURRENCY", "0"),
                ("DV_TIMEOUT", "forever"),
                ("DV_OUTPUT", "  "),
            ]),
            true,
        );
        assert_eq!(env, EnvConfig::default());
    }
}
