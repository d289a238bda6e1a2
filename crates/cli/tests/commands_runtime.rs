use std::env;
use std::sync::{Mutex, OnceLock};

use closet_cli::commands::{config, doctor, migrate};
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn migrate_returns_success_with_valid_env() {
    let dir = TempDir::new().expect("tempdir");
    let database_url = sqlite_url(&dir);

    with_env(&[("CLOSET_DATABASE_URL", &database_url)], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_when_weather_key_missing() {
    with_env(&[("CLOSET_WEATHER_ENABLED", "true")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn doctor_passes_after_migrate() {
    let dir = TempDir::new().expect("tempdir");
    let database_url = sqlite_url(&dir);
    let image_root = dir.path().join("images").display().to_string();

    with_env(
        &[("CLOSET_DATABASE_URL", &database_url), ("CLOSET_STORAGE_IMAGE_ROOT", &image_root)],
        || {
            let before = doctor::run(true);
            assert_eq!(before.exit_code, 1, "schema should be missing before migrate");

            assert_eq!(migrate::run().exit_code, 0);

            let after = doctor::run(true);
            assert_eq!(after.exit_code, 0, "expected all checks to pass: {}", after.output);
            let report = parse_payload(&after.output);
            assert_eq!(report["overall_status"], "pass");
            assert_eq!(report["checks"].as_array().map(Vec::len), Some(4));
        },
    );
}

#[test]
fn doctor_skips_checks_when_config_invalid() {
    with_env(&[("CLOSET_WEATHER_ENABLED", "true")], || {
        let result = doctor::run(false);
        assert_eq!(result.exit_code, 1);
        assert!(result.output.contains("- [fail] config_validation"));
        assert!(result.output.contains("- [skip] database_connectivity"));
    });
}

#[test]
fn config_attributes_env_overrides_and_redacts_service_key() {
    with_env(
        &[
            ("CLOSET_WEATHER_ENABLED", "true"),
            ("CLOSET_WEATHER_SERVICE_KEY", "kma-service-key-0123456789"),
            ("CLOSET_SERVER_PORT", "9090"),
        ],
        || {
            let output = config::run();
            assert!(output.contains("- server.port = 9090 (source: env (CLOSET_SERVER_PORT))"));
            assert!(output.contains("- weather.service_key = kma-*** (source: env"));
            assert!(!output.contains("0123456789"));
        },
    );
}

fn sqlite_url(dir: &TempDir) -> String {
    format!("sqlite://{}", dir.path().join("closet.db").display())
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "CLOSET_DATABASE_URL",
        "CLOSET_DATABASE_MAX_CONNECTIONS",
        "CLOSET_DATABASE_TIMEOUT_SECS",
        "CLOSET_SERVER_BIND_ADDRESS",
        "CLOSET_SERVER_PORT",
        "CLOSET_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "CLOSET_SERVER_MAX_UPLOAD_BYTES",
        "CLOSET_STORAGE_IMAGE_ROOT",
        "CLOSET_STORAGE_PUBLIC_BASE_URL",
        "CLOSET_CLASSIFIER_ENDPOINT",
        "CLOSET_CLASSIFIER_TIMEOUT_SECS",
        "CLOSET_WEATHER_ENABLED",
        "CLOSET_WEATHER_BASE_URL",
        "CLOSET_WEATHER_SERVICE_KEY",
        "CLOSET_WEATHER_TIMEOUT_SECS",
        "CLOSET_WEATHER_GRID_NX",
        "CLOSET_WEATHER_GRID_NY",
        "CLOSET_WEATHER_REGION",
        "CLOSET_WEATHER_REQUIRED_FOR_RECOMMENDATION",
        "CLOSET_RECOMMENDATION_MAX_DISTANCE",
        "CLOSET_RECOMMENDATION_TIE_BREAK",
        "CLOSET_RECOMMENDATION_WEATHER_INFLUENCE",
        "CLOSET_LOGGING_LEVEL",
        "CLOSET_LOGGING_FORMAT",
        "CLOSET_LOG_LEVEL",
        "CLOSET_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
