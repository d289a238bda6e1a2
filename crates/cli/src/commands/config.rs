use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use closet_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => render(&config, detect_config_path().as_deref()),
        Err(error) => format!("config validation failed: {error}"),
    }
}

/// One rendered setting: dotted key, display value and the env var that can
/// override it.
struct Setting {
    key: &'static str,
    value: String,
    env_key: &'static str,
}

fn setting(key: &'static str, value: impl ToString, env_key: &'static str) -> Setting {
    Setting { key, value: value.to_string(), env_key }
}

fn settings(config: &AppConfig) -> Vec<Setting> {
    let weights = &config.recommendation.weights;
    let thresholds = &config.recommendation.thresholds;

    vec![
        setting("database.url", &config.database.url, "CLOSET_DATABASE_URL"),
        setting(
            "database.max_connections",
            config.database.max_connections,
            "CLOSET_DATABASE_MAX_CONNECTIONS",
        ),
        setting(
            "database.timeout_secs",
            config.database.timeout_secs,
            "CLOSET_DATABASE_TIMEOUT_SECS",
        ),
        setting("server.bind_address", &config.server.bind_address, "CLOSET_SERVER_BIND_ADDRESS"),
        setting("server.port", config.server.port, "CLOSET_SERVER_PORT"),
        setting(
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs,
            "CLOSET_SERVER_GRACEFUL_SHUTDOWN_SECS",
        ),
        setting(
            "server.max_upload_bytes",
            config.server.max_upload_bytes,
            "CLOSET_SERVER_MAX_UPLOAD_BYTES",
        ),
        setting(
            "storage.image_root",
            config.storage.image_root.display(),
            "CLOSET_STORAGE_IMAGE_ROOT",
        ),
        setting(
            "storage.public_base_url",
            &config.storage.public_base_url,
            "CLOSET_STORAGE_PUBLIC_BASE_URL",
        ),
        setting("classifier.endpoint", &config.classifier.endpoint, "CLOSET_CLASSIFIER_ENDPOINT"),
        setting(
            "classifier.timeout_secs",
            config.classifier.timeout_secs,
            "CLOSET_CLASSIFIER_TIMEOUT_SECS",
        ),
        setting("weather.enabled", config.weather.enabled, "CLOSET_WEATHER_ENABLED"),
        setting("weather.base_url", &config.weather.base_url, "CLOSET_WEATHER_BASE_URL"),
        setting(
            "weather.service_key",
            redact_key(config.weather.service_key.as_ref().map(|key| key.expose_secret())),
            "CLOSET_WEATHER_SERVICE_KEY",
        ),
        setting("weather.timeout_secs", config.weather.timeout_secs, "CLOSET_WEATHER_TIMEOUT_SECS"),
        setting("weather.grid_nx", config.weather.grid_nx, "CLOSET_WEATHER_GRID_NX"),
        setting("weather.grid_ny", config.weather.grid_ny, "CLOSET_WEATHER_GRID_NY"),
        setting("weather.region", &config.weather.region, "CLOSET_WEATHER_REGION"),
        setting(
            "weather.required_for_recommendation",
            config.weather.required_for_recommendation,
            "CLOSET_WEATHER_REQUIRED_FOR_RECOMMENDATION",
        ),
        setting(
            "recommendation.max_distance",
            config.recommendation.max_distance,
            "CLOSET_RECOMMENDATION_MAX_DISTANCE",
        ),
        setting(
            "recommendation.tie_break",
            format!("{:?}", config.recommendation.tie_break),
            "CLOSET_RECOMMENDATION_TIE_BREAK",
        ),
        setting(
            "recommendation.weights.weather_influence",
            weights.weather_influence,
            "CLOSET_RECOMMENDATION_WEATHER_INFLUENCE",
        ),
        setting(
            "recommendation.weights",
            format!(
                "style={} color={} material={} length={} print={}",
                weights.style, weights.color, weights.material, weights.length, weights.print
            ),
            "",
        ),
        setting(
            "recommendation.thresholds",
            format!(
                "cold_temp={} hot_temp={} muggy_humidity={} windy_speed={}",
                thresholds.cold_temp,
                thresholds.hot_temp,
                thresholds.muggy_humidity,
                thresholds.windy_speed
            ),
            "",
        ),
        setting("logging.level", &config.logging.level, "CLOSET_LOGGING_LEVEL"),
        setting("logging.format", format!("{:?}", config.logging.format), "CLOSET_LOGGING_FORMAT"),
    ]
}

fn render(config: &AppConfig, config_file_path: Option<&Path>) -> String {
    let config_file_doc = load_config_file_doc(config_file_path);

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for entry in settings(config) {
        let source = field_source(
            entry.key,
            (!entry.env_key.is_empty()).then_some(entry.env_key),
            config_file_doc.as_ref(),
            config_file_path,
        );
        lines.push(render_line(entry.key, &entry.value, source));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("closet.toml"), PathBuf::from("config/closet.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
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

/// Keeps the first four characters of long keys so operators can tell keys
/// apart.
fn redact_key(key: Option<&str>) -> String {
    let Some(key) = key.map(str::trim) else {
        return "<unset>".to_string();
    };
    if key.is_empty() {
        return "<empty>".to_string();
    }
    if key.chars().count() > 12 {
        let prefix: String = key.chars().take(4).collect();
        return format!("{prefix}***");
    }
    "<redacted>".to_string()
}
