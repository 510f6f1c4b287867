//! Configuration loading from flags, environment and disk.
//!
//! Precedence, highest first: command-line flag, environment variable,
//! TOML file (`--config`), built-in default.
//!
//! Flags are parsed strictly by clap. Environment variables are read
//! leniently: an empty variable counts as unset and an unparsable one is
//! reported and skipped, so a bad deployment value never stops startup.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::builder::BoolishValueParser;
use clap::Parser;

use crate::config::schema::{Config, ServiceConfig};
use crate::config::validation::{validate, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),
}

/// Command-line interface.
#[derive(Debug, Default, Parser)]
#[command(name = "amialive", version, about = "Liveness endpoint that occasionally tells a joke")]
pub struct Cli {
    /// Optional TOML config file
    #[arg(short, long, env = "AMIALIVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to run the server on [env: PORT]
    #[arg(long)]
    pub port: Option<u16>,

    /// Percentage chance to show a joke (0-100) [env: JOKE_CHANCE]
    #[arg(long, allow_negative_numbers = true)]
    pub joke_chance: Option<i64>,

    /// Comma-separated JokeAPI categories [env: JOKE_CATEGORY]
    #[arg(long)]
    pub joke_category: Option<String>,

    /// Enable safe-mode for jokes [env: JOKE_SAFEMODE]
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub joke_safe_mode: Option<bool>,

    /// Max JokeAPI requests per minute (1-120) [env: JOKES_REQUESTS]
    #[arg(long, allow_negative_numbers = true)]
    pub jokes_requests: Option<i64>,

    /// Base URL of the JokeAPI joke endpoint [env: JOKE_API_URL]
    #[arg(long)]
    pub joke_api_url: Option<String>,

    /// Upstream request timeout in seconds [env: JOKE_TIMEOUT_SECS]
    #[arg(long)]
    pub joke_timeout_secs: Option<u64>,

    /// Log level, overridden by RUST_LOG [env: LOG_LEVEL]
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Overlay every value given on the command line.
    pub fn apply(&self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(chance) = self.joke_chance {
            config.joke_chance = chance;
        }
        if let Some(category) = &self.joke_category {
            config.joke_category = category.clone();
        }
        if let Some(safe_mode) = self.joke_safe_mode {
            config.joke_safe_mode = safe_mode;
        }
        if let Some(requests) = self.jokes_requests {
            config.jokes_requests = requests;
        }
        if let Some(url) = &self.joke_api_url {
            config.joke_api_url = url.clone();
        }
        if let Some(timeout) = self.joke_timeout_secs {
            config.joke_timeout_secs = timeout;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config
    }
}

/// An environment variable whose value could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEnvVar {
    pub key: &'static str,
    pub value: String,
}

impl fmt::Display for InvalidEnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.key, self.value)
    }
}

/// Settings taken from environment variables.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub port: Option<u16>,
    pub joke_chance: Option<i64>,
    pub joke_category: Option<String>,
    pub joke_safe_mode: Option<bool>,
    pub jokes_requests: Option<i64>,
    pub joke_api_url: Option<String>,
    pub joke_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    /// Variables that were set but unparsable; their settings keep the
    /// file or built-in value.
    pub invalid: Vec<InvalidEnvVar>,
}

impl EnvOverrides {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut invalid = Vec::new();
        let port = parse_var("PORT", &lookup, &mut invalid, parse_number);
        let joke_chance = parse_var("JOKE_CHANCE", &lookup, &mut invalid, parse_number);
        let jokes_requests = parse_var("JOKES_REQUESTS", &lookup, &mut invalid, parse_number);
        let joke_timeout_secs = parse_var("JOKE_TIMEOUT_SECS", &lookup, &mut invalid, parse_number);
        let joke_safe_mode = parse_var("JOKE_SAFEMODE", &lookup, &mut invalid, parse_bool);

        Self {
            port,
            joke_chance,
            joke_category: non_empty(&lookup, "JOKE_CATEGORY"),
            joke_safe_mode,
            jokes_requests,
            joke_api_url: non_empty(&lookup, "JOKE_API_URL"),
            joke_timeout_secs,
            log_level: non_empty(&lookup, "LOG_LEVEL"),
            invalid,
        }
    }

    /// Log every unparsable variable. Call once the subscriber is installed.
    pub fn report_invalid(&self) {
        for var in &self.invalid {
            tracing::warn!(key = var.key, value = %var.value, "Invalid value for {}, using default", var.key);
        }
    }

    /// Overlay every value found in the environment.
    pub fn apply(&self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(chance) = self.joke_chance {
            config.joke_chance = chance;
        }
        if let Some(category) = &self.joke_category {
            config.joke_category = category.clone();
        }
        if let Some(safe_mode) = self.joke_safe_mode {
            config.joke_safe_mode = safe_mode;
        }
        if let Some(requests) = self.jokes_requests {
            config.jokes_requests = requests;
        }
        if let Some(url) = &self.joke_api_url {
            config.joke_api_url = url.clone();
        }
        if let Some(timeout) = self.joke_timeout_secs {
            config.joke_timeout_secs = timeout;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config
    }
}

/// Value of `key` with surrounding whitespace removed; empty counts as unset.
fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T, F, P>(
    key: &'static str,
    lookup: &F,
    invalid: &mut Vec<InvalidEnvVar>,
    parse: P,
) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    let value = non_empty(lookup, key)?;
    let parsed = parse(&value);
    if parsed.is_none() {
        invalid.push(InvalidEnvVar { key, value });
    }
    parsed
}

fn parse_number<T: FromStr>(value: &str) -> Option<T> {
    value.parse().ok()
}

/// Same spellings clap's boolish parser accepts.
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Some(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a TOML config file without validating it.
pub fn load_config_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Merge all configuration sources without validating.
pub fn resolve(cli: &Cli, env: &EnvOverrides) -> Result<ServiceConfig, ConfigError> {
    let base = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => ServiceConfig::default(),
    };
    Ok(cli.apply(env.apply(base)))
}

/// Resolve all configuration sources into a validated [`Config`].
pub fn load_config(cli: &Cli, env: &EnvOverrides) -> Result<Config, ConfigError> {
    env.report_invalid();
    Ok(validate(resolve(cli, env)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jokes::JokeCategory;
    use std::collections::HashMap;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("amialive-{}-{}.toml", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    fn env_of(vars: &[(&str, &str)]) -> EnvOverrides {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvOverrides::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = load_config(&Cli::default(), &EnvOverrides::default()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.joke_chance_percent, 30);
        assert_eq!(config.joke_category_path(), "Programming");
        assert!(config.safe_mode);
        assert_eq!(config.rate_limit_per_minute, 60);
    }

    #[test]
    fn test_file_values_are_used() {
        let path = temp_config(
            "file",
            r#"
                port = 9000
                joke_chance = 75
                joke_category = "dark, pun"
                joke_safe_mode = false
                jokes_requests = 500
            "#,
        );

        let cli = Cli {
            config: Some(path.clone()),
            ..Cli::default()
        };
        let config = load_config(&cli, &EnvOverrides::default()).unwrap();
        std::fs::remove_file(&path).unwrap_or_default();

        assert_eq!(config.port, 9000);
        assert_eq!(config.joke_chance_percent, 75);
        assert_eq!(config.joke_categories, vec![JokeCategory::Dark, JokeCategory::Pun]);
        assert!(!config.safe_mode);
        assert_eq!(config.rate_limit_per_minute, 120);
    }

    #[test]
    fn test_cli_overrides_env_and_file() {
        let path = temp_config("override", "port = 9000\njoke_chance = 75\njokes_requests = 10\n");

        let cli = Cli {
            config: Some(path.clone()),
            port: Some(9100),
            joke_safe_mode: Some(false),
            ..Cli::default()
        };
        let env = env_of(&[("PORT", "9200"), ("JOKE_CHANCE", "40"), ("JOKE_SAFEMODE", "true")]);
        let config = load_config(&cli, &env).unwrap();
        std::fs::remove_file(&path).unwrap_or_default();

        assert_eq!(config.port, 9100);
        assert_eq!(config.joke_chance_percent, 40);
        assert!(!config.safe_mode);
        assert_eq!(config.rate_limit_per_minute, 10);
    }

    #[test]
    fn test_env_values_are_used() {
        let env = env_of(&[
            ("PORT", "3000"),
            ("JOKE_CHANCE", " 55 "),
            ("JOKE_CATEGORY", "pun"),
            ("JOKE_SAFEMODE", "off"),
            ("JOKES_REQUESTS", "-3"),
            ("JOKE_TIMEOUT_SECS", "2"),
            ("LOG_LEVEL", "debug"),
        ]);
        assert!(env.invalid.is_empty());

        let config = load_config(&Cli::default(), &env).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.joke_chance_percent, 55);
        assert_eq!(config.joke_categories, vec![JokeCategory::Pun]);
        assert!(!config.safe_mode);
        assert_eq!(config.rate_limit_per_minute, 1);
        assert_eq!(config.request_timeout.as_secs(), 2);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_empty_env_values_count_as_unset() {
        let env = env_of(&[
            ("PORT", ""),
            ("JOKE_CHANCE", ""),
            ("JOKE_CATEGORY", "  "),
            ("JOKE_SAFEMODE", ""),
            ("JOKES_REQUESTS", ""),
            ("LOG_LEVEL", ""),
        ]);
        assert!(env.invalid.is_empty());

        let config = load_config(&Cli::default(), &env).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.joke_chance_percent, 30);
        assert_eq!(config.joke_category_path(), "Programming");
        assert!(config.safe_mode);
        assert_eq!(config.rate_limit_per_minute, 60);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_env_values_fall_back() {
        let env = env_of(&[
            ("PORT", "http"),
            ("JOKE_CHANCE", "abc"),
            ("JOKE_SAFEMODE", "maybe"),
            ("JOKES_REQUESTS", "1.5"),
            ("JOKE_TIMEOUT_SECS", "-1"),
        ]);
        let keys: Vec<&str> = env.invalid.iter().map(|v| v.key).collect();
        assert_eq!(
            keys,
            vec!["PORT", "JOKE_CHANCE", "JOKES_REQUESTS", "JOKE_TIMEOUT_SECS", "JOKE_SAFEMODE"]
        );
        assert_eq!(env.invalid[1].to_string(), "JOKE_CHANCE=\"abc\"");

        let config = load_config(&Cli::default(), &env).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.joke_chance_percent, 30);
        assert!(config.safe_mode);
        assert_eq!(config.rate_limit_per_minute, 60);
        assert_eq!(config.request_timeout.as_secs(), 5);
    }

    #[test]
    fn test_invalid_env_value_keeps_file_value() {
        let path = temp_config("env-fallback", "joke_chance = 80\n");
        let cli = Cli {
            config: Some(path.clone()),
            ..Cli::default()
        };
        let config = load_config(&cli, &env_of(&[("JOKE_CHANCE", "lots")])).unwrap();
        std::fs::remove_file(&path).unwrap_or_default();

        assert_eq!(config.joke_chance_percent, 80);
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from([
            "amialive",
            "--port",
            "3000",
            "--joke-chance",
            "-5",
            "--joke-category",
            "spooky,christmas",
            "--joke-safe-mode",
            "no",
            "--jokes-requests",
            "-1",
        ])
        .unwrap();

        assert_eq!(cli.port, Some(3000));
        assert_eq!(cli.joke_chance, Some(-5));
        assert_eq!(cli.joke_safe_mode, Some(false));

        let config = validate(cli.apply(ServiceConfig::default())).unwrap();
        assert_eq!(config.joke_chance_percent, 0);
        assert_eq!(config.joke_category_path(), "Spooky,Christmas");
        assert_eq!(config.rate_limit_per_minute, 1);
    }

    #[test]
    fn test_invalid_flag_is_rejected() {
        assert!(Cli::try_parse_from(["amialive", "--joke-chance", "abc"]).is_err());
        assert!(Cli::try_parse_from(["amialive", "--joke-safe-mode", "maybe"]).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/definitely/not/here/amialive.toml")),
            ..Cli::default()
        };
        assert!(matches!(
            load_config(&cli, &EnvOverrides::default()),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let path = temp_config("malformed", "port = \"not a number\"\n");
        let err = load_config_file(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap_or_default();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
