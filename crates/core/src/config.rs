use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::DEFAULT_MIN_SERIAL_LENGTH;

pub const DEVELOPMENT_BASE_URL: &str = "http://localhost:5000";
pub const PRODUCTION_BASE_URL: &str = "https://snibackend-production.up.railway.app";
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["storefront.toml", "config/storefront.toml"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub warranty: WarrantyConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub environment: ApiEnvironment,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub admin_token: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct WarrantyConfig {
    pub min_serial_length: usize,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiEnvironment {
    Development,
    Production,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_environment: Option<ApiEnvironment>,
    pub api_base_url: Option<String>,
    pub api_timeout_secs: Option<u64>,
    pub admin_token: Option<String>,
    pub min_serial_length: Option<usize>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                environment: ApiEnvironment::Development,
                base_url: None,
                timeout_secs: 15,
                admin_token: None,
            },
            warranty: WarrantyConfig { min_serial_length: DEFAULT_MIN_SERIAL_LENGTH },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl ApiEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Development => DEVELOPMENT_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl ApiConfig {
    /// Explicit `base_url` when set, otherwise the endpoint of the selected
    /// environment. Never ends with a slash.
    pub fn resolved_base_url(&self) -> String {
        let base = match self.base_url.as_deref().map(str::trim) {
            Some(explicit) if !explicit.is_empty() => explicit,
            _ => self.environment.default_base_url(),
        };
        base.trim_end_matches('/').to_string()
    }

    pub fn has_admin_token(&self) -> bool {
        self.admin_token
            .as_ref()
            .map(|token| !token.expose_secret().trim().is_empty())
            .unwrap_or(false)
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for ApiEnvironment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::Validation(format!(
                "unsupported api environment `{other}` (expected development|production)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_CANDIDATES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        // A blank base URL selects the environment endpoint.
        config.api.base_url = config.api.base_url.take().filter(|url| !url.trim().is_empty());
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(api) = patch.api {
            if let Some(environment) = api.environment {
                self.api.environment = environment;
            }
            if let Some(base_url) = api.base_url {
                self.api.base_url = Some(base_url);
            }
            if let Some(timeout_secs) = api.timeout_secs {
                self.api.timeout_secs = timeout_secs;
            }
            if let Some(admin_token_value) = api.admin_token {
                self.api.admin_token = Some(secret_value(admin_token_value));
            }
        }

        if let Some(warranty) = patch.warranty {
            if let Some(min_serial_length) = warranty.min_serial_length {
                self.warranty.min_serial_length = min_serial_length;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("STOREFRONT_API_ENVIRONMENT") {
            self.api.environment = value.parse()?;
        }
        if let Some(value) = read_env("STOREFRONT_API_BASE_URL") {
            self.api.base_url = Some(value);
        }
        if let Some(value) = read_env("STOREFRONT_API_TIMEOUT_SECS") {
            self.api.timeout_secs = parse_u64("STOREFRONT_API_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("STOREFRONT_API_ADMIN_TOKEN") {
            self.api.admin_token = Some(secret_value(value));
        }

        if let Some(value) = read_env("STOREFRONT_WARRANTY_MIN_SERIAL_LENGTH") {
            self.warranty.min_serial_length =
                parse_usize("STOREFRONT_WARRANTY_MIN_SERIAL_LENGTH", &value)?;
        }

        let log_level =
            read_env("STOREFRONT_LOGGING_LEVEL").or_else(|| read_env("STOREFRONT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("STOREFRONT_LOGGING_FORMAT").or_else(|| read_env("STOREFRONT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(environment) = overrides.api_environment {
            self.api.environment = environment;
        }
        if let Some(base_url) = overrides.api_base_url {
            self.api.base_url = Some(base_url);
        }
        if let Some(timeout_secs) = overrides.api_timeout_secs {
            self.api.timeout_secs = timeout_secs;
        }
        if let Some(admin_token) = overrides.admin_token {
            self.api.admin_token = Some(secret_value(admin_token));
        }
        if let Some(min_serial_length) = overrides.min_serial_length {
            self.warranty.min_serial_length = min_serial_length;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_api(&self.api)?;
        validate_warranty(&self.warranty)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Path of the config file `load` would read, if any.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_api(api: &ApiConfig) -> Result<(), ConfigError> {
    if let Some(base_url) = api.base_url.as_deref().map(str::trim) {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "api.base_url must start with http:// or https://".to_string(),
            ));
        }
    }

    if api.timeout_secs == 0 || api.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "api.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_warranty(warranty: &WarrantyConfig) -> Result<(), ConfigError> {
    if warranty.min_serial_length == 0 || warranty.min_serial_length > 64 {
        return Err(ConfigError::Validation(
            "warranty.min_serial_length must be in range 1..=64".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    api: Option<ApiPatch>,
    warranty: Option<WarrantyPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiPatch {
    environment: Option<ApiEnvironment>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    admin_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WarrantyPatch {
    min_serial_length: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
