use std::env;
use std::fs;
use std::path::Path;

use storefront_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let sources = Sources {
        doc: load_config_file_doc(config_file_path.as_deref()),
        path: config_file_path.as_deref(),
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "api.environment",
        config.api.environment.as_str(),
        sources.of("api.environment", &["STOREFRONT_API_ENVIRONMENT"]),
    ));
    lines.push(render_line(
        "api.base_url",
        config.api.base_url.as_deref().unwrap_or("<unset>"),
        sources.of("api.base_url", &["STOREFRONT_API_BASE_URL"]),
    ));
    lines.push(format!("  resolved endpoint: {}", config.api.resolved_base_url()));
    lines.push(render_line(
        "api.timeout_secs",
        &config.api.timeout_secs.to_string(),
        sources.of("api.timeout_secs", &["STOREFRONT_API_TIMEOUT_SECS"]),
    ));

    let admin_token = if config.api.has_admin_token() { "<redacted>" } else { "<unset>" };
    lines.push(render_line(
        "api.admin_token",
        admin_token,
        sources.of("api.admin_token", &["STOREFRONT_API_ADMIN_TOKEN"]),
    ));

    lines.push(render_line(
        "warranty.min_serial_length",
        &config.warranty.min_serial_length.to_string(),
        sources.of("warranty.min_serial_length", &["STOREFRONT_WARRANTY_MIN_SERIAL_LENGTH"]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        sources.of("logging.level", &["STOREFRONT_LOGGING_LEVEL", "STOREFRONT_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        sources.of("logging.format", &["STOREFRONT_LOGGING_FORMAT", "STOREFRONT_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

struct Sources<'a> {
    doc: Option<Value>,
    path: Option<&'a Path>,
}

impl Sources<'_> {
    fn of(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some(env_key) = env_keys.iter().find(|key| env_is_set(key)) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = &self.doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .path
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

fn env_is_set(key: &str) -> bool {
    env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
