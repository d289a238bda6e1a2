use std::path::Path;

use closet_core::config::{AppConfig, LoadOptions};
use closet_db::connect_with_settings;
use serde::Serialize;

use crate::commands::{block_on, escape_json, CommandResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into() }
    }

    fn skipped(name: &'static str) -> Self {
        Self {
            name,
            status: CheckStatus::Skipped,
            details: "skipped because configuration did not load".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report(AppConfig::load(LoadOptions::default()));
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                concat!(
                    "{{\"overall_status\":\"fail\",",
                    "\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}"
                ),
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report<E: std::fmt::Display>(loaded: Result<AppConfig, E>) -> DoctorReport {
    let checks = match loaded {
        Ok(config) => vec![
            DoctorCheck::pass("config_validation", "configuration loaded and validated"),
            check_database_connectivity(&config),
            check_image_root(&config.storage.image_root),
            check_weather_readiness(&config),
        ],
        Err(error) => vec![
            DoctorCheck::fail("config_validation", error.to_string()),
            DoctorCheck::skipped("database_connectivity"),
            DoctorCheck::skipped("image_storage"),
            DoctorCheck::skipped("weather_readiness"),
        ],
    };

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_database_connectivity(config: &AppConfig) -> DoctorCheck {
    const NAME: &str = "database_connectivity";

    let outcome = block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

        let schema = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM garment")
            .fetch_one(&pool)
            .await;
        pool.close().await;
        Ok::<bool, String>(schema.is_ok())
    });

    let url = &config.database.url;
    match outcome {
        Ok(Ok(true)) => DoctorCheck::pass(NAME, format!("connected using `{url}`")),
        Ok(Ok(false)) => DoctorCheck::fail(
            NAME,
            format!("connected using `{url}` but the schema is missing; run `closet migrate`"),
        ),
        Ok(Err(error)) => DoctorCheck::fail(NAME, error),
        Err(error) => {
            DoctorCheck::fail(NAME, format!("failed to initialize async runtime: {error}"))
        }
    }
}

fn check_image_root(image_root: &Path) -> DoctorCheck {
    const NAME: &str = "image_storage";

    if !image_root.exists() {
        return DoctorCheck::pass(
            NAME,
            format!("`{}` does not exist yet and will be created at startup", image_root.display()),
        );
    }
    match std::fs::metadata(image_root) {
        Ok(metadata) if !metadata.is_dir() => {
            DoctorCheck::fail(NAME, format!("`{}` is not a directory", image_root.display()))
        }
        Ok(metadata) if metadata.permissions().readonly() => {
            DoctorCheck::fail(NAME, format!("`{}` is read-only", image_root.display()))
        }
        Ok(_) => {
            DoctorCheck::pass(NAME, format!("writing images under `{}`", image_root.display()))
        }
        Err(error) => {
            DoctorCheck::fail(NAME, format!("cannot inspect `{}`: {error}", image_root.display()))
        }
    }
}

fn check_weather_readiness(config: &AppConfig) -> DoctorCheck {
    const NAME: &str = "weather_readiness";

    let weather = &config.weather;
    match (weather.enabled, weather.required_for_recommendation) {
        (true, _) => DoctorCheck::pass(
            NAME,
            format!("forecast lookups enabled for grid ({}, {})", weather.grid_nx, weather.grid_ny),
        ),
        (false, true) => DoctorCheck::fail(
            NAME,
            "weather is required for recommendations but lookups are disabled",
        ),
        (false, false) => {
            DoctorCheck::pass(NAME, "weather disabled; recommendations score weather as neutral")
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_config_skips_dependent_checks() {
        let report = build_report::<&str>(Err("weather.service_key is required"));

        assert_eq!(report.overall_status, CheckStatus::Fail);
        assert_eq!(report.checks[0].status, CheckStatus::Fail);
        assert!(report.checks[1..].iter().all(|check| check.status == CheckStatus::Skipped));
    }

    #[test]
    fn required_weather_without_lookups_fails() {
        let mut config = AppConfig::default();
        config.weather.required_for_recommendation = true;

        assert_eq!(check_weather_readiness(&config).status, CheckStatus::Fail);
    }

    #[test]
    fn image_root_that_is_a_file_fails() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").expect("write");

        assert_eq!(check_image_root(&file).status, CheckStatus::Fail);
        assert_eq!(check_image_root(dir.path()).status, CheckStatus::Pass);
    }

    #[test]
    fn human_report_marks_each_check() {
        let report = build_report::<&str>(Err("bad config"));
        let rendered = render_human(&report);

        assert!(rendered.starts_with("doctor: one or more readiness checks failed"));
        assert!(rendered.contains("- [fail] config_validation: bad config"));
        assert!(rendered.contains("- [skip] image_storage"));
    }
}
