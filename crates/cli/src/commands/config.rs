use std::env;
use std::fs;
use std::path::Path;

use recommender_core::config::{resolve_config_path, AppConfig, LoadOptions};
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

    let entries = [
        (
            "dataset.path",
            config.dataset.path.display().to_string(),
            &["RECOMMENDER_DATASET_PATH"][..],
        ),
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            &["RECOMMENDER_SERVER_BIND_ADDRESS"][..],
        ),
        ("server.port", config.server.port.to_string(), &["RECOMMENDER_SERVER_PORT"][..]),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["RECOMMENDER_SERVER_GRACEFUL_SHUTDOWN_SECS"][..],
        ),
        (
            "cors.allowed_origins",
            config.cors.allowed_origins.join(","),
            &["RECOMMENDER_CORS_ALLOWED_ORIGINS"][..],
        ),
        (
            "pagination.default_page_size",
            config.pagination.default_page_size.to_string(),
            &["RECOMMENDER_PAGINATION_DEFAULT_PAGE_SIZE"][..],
        ),
        (
            "pagination.max_page_size",
            config.pagination.max_page_size.to_string(),
            &["RECOMMENDER_PAGINATION_MAX_PAGE_SIZE"][..],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["RECOMMENDER_LOGGING_LEVEL", "RECOMMENDER_LOG_LEVEL"][..],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            &["RECOMMENDER_LOGGING_FORMAT", "RECOMMENDER_LOG_FORMAT"][..],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(entries.iter().map(|(key, value, env_keys)| {
        render_line(key, value, sources.field_source(key, env_keys))
    }));

    lines.join("\n")
}

struct Sources<'a> {
    doc: Option<Value>,
    path: Option<&'a Path>,
}

impl Sources<'_> {
    fn field_source(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
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
