use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use closet_core::config::{AppConfig, LoadOptions};
use closet_core::{
    GarmentAttributes, GarmentRecord, RecommendationEngine, RecommendationMode,
    RecommendationRequest, Sex, Style, UserProfile, WeatherSummary,
};
use serde::de::DeserializeOwned;

use crate::commands::CommandResult;

#[derive(Debug, Args)]
pub struct RecommendArgs {
    #[arg(long, help = "JSON array of garment records to choose from")]
    pub wardrobe: PathBuf,
    #[arg(long, help = "Target style, e.g. casual, formal, street")]
    pub style: String,
    #[arg(long)]
    pub age: u8,
    #[arg(long, help = "female, male or other")]
    pub sex: String,
    #[arg(
        long,
        help = "full, complete_top or complete_bottom (derived from --anchor-id when omitted)"
    )]
    pub mode: Option<String>,
    #[arg(long = "anchor-id", help = "Id of the wardrobe garment to build around")]
    pub anchor_id: Option<String>,
    #[arg(long, help = "JSON weather summary; weather scores as neutral when omitted")]
    pub weather: Option<PathBuf>,
}

type Failure = (&'static str, String, u8);

pub fn run(args: &RecommendArgs) -> CommandResult {
    let engine = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config.recommendation.engine(),
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    recommend_with(&engine, args).unwrap_or_else(|(error_class, message, exit_code)| {
        CommandResult::failure("recommend", error_class, message, exit_code)
    })
}

fn recommend_with(
    engine: &RecommendationEngine,
    args: &RecommendArgs,
) -> Result<CommandResult, Failure> {
    let wardrobe: Vec<GarmentRecord> = read_json(&args.wardrobe).map_err(input_failure)?;
    let weather: Option<WeatherSummary> =
        args.weather.as_deref().map(read_json).transpose().map_err(input_failure)?;

    let style: Style = args.style.parse().map_err(request_failure)?;
    let sex: Sex = args.sex.parse().map_err(request_failure)?;
    let anchor = match &args.anchor_id {
        Some(id) => Some(find_anchor(&wardrobe, id)?),
        None => None,
    };
    let mode = match (&args.mode, anchor) {
        (Some(raw), _) => raw.parse::<RecommendationMode>().map_err(request_failure)?,
        (None, Some(anchor)) => RecommendationMode::completing(anchor.group()),
        (None, None) => RecommendationMode::Full,
    };

    let request = RecommendationRequest {
        mode,
        profile: UserProfile { age: args.age, sex },
        style,
        weather,
        anchor,
    };
    let result = engine.recommend(&request, &wardrobe).map_err(request_failure)?;

    let message = if result.success() {
        format!("{} outfit chosen from {} garments", mode.as_str(), wardrobe.len())
    } else {
        format!("no suitable garment among {} for {}", wardrobe.len(), mode.as_str())
    };
    let data = serde_json::to_value(&result)
        .map_err(|error| ("serialization", error.to_string(), 6u8))?;
    Ok(CommandResult::success_with_data("recommend", message, Some(data)))
}

fn find_anchor(wardrobe: &[GarmentRecord], id: &str) -> Result<GarmentAttributes, Failure> {
    wardrobe
        .iter()
        .find(|record| record.id.0 == id)
        .map(|record| record.attributes)
        .ok_or_else(|| ("not_found", format!("garment `{id}` is not in the wardrobe"), 4))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse `{}`", path.display()))
}

fn input_failure(error: anyhow::Error) -> Failure {
    ("input", format!("{error:#}"), 3)
}

fn request_failure(error: impl std::fmt::Display) -> Failure {
    ("invalid_request", error.to_string(), 5)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, value: Value) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, value.to_string()).expect("write fixture");
        path
    }

    fn wardrobe(dir: &TempDir) -> PathBuf {
        let garment = |id: &str, category: &str, material: &str, length: &str, minute: u32| {
            json!({
                "id": id,
                "category": category,
                "color": "navy",
                "print": "solid",
                "material": material,
                "length": length,
                "style": "casual",
                "image_ref": format!("/images/u1/{id}.jpg"),
                "added_at": format!("2024-03-01T09:{minute:02}:00Z"),
            })
        };
        write(
            dir,
            "wardrobe.json",
            json!([
                garment("linen_tee", "t_shirt", "linen", "short", 0),
                garment("wool_coat", "coat", "wool", "long", 1),
                garment("jeans", "jeans", "denim", "long", 2),
            ]),
        )
    }

    fn args(wardrobe: PathBuf) -> RecommendArgs {
        RecommendArgs {
            wardrobe,
            style: "casual".to_string(),
            age: 29,
            sex: "female".to_string(),
            mode: None,
            anchor_id: None,
            weather: None,
        }
    }

    fn payload(result: &CommandResult) -> Value {
        serde_json::from_str(&result.output).expect("command output should be valid JSON")
    }

    #[test]
    fn full_outfit_follows_the_weather_file() {
        let dir = TempDir::new().expect("tempdir");
        let mut args = args(wardrobe(&dir));
        args.weather = Some(write(
            &dir,
            "weather.json",
            json!({ "currentTemp": -3.0, "condition": "snow" }),
        ));

        let result = recommend_with(&RecommendationEngine::new(), &args).expect("recommend");

        assert_eq!(result.exit_code, 0);
        let payload = payload(&result);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["shape"], "full_pair");
        assert_eq!(payload["data"]["top"]["chosen"]["id"], "wool_coat");
    }

    #[test]
    fn anchor_id_derives_the_completing_mode() {
        let dir = TempDir::new().expect("tempdir");
        let mut args = args(wardrobe(&dir));
        args.anchor_id = Some("jeans".to_string());

        let result = recommend_with(&RecommendationEngine::new(), &args).expect("recommend");

        assert_eq!(payload(&result)["data"]["shape"], "top_only");
    }

    #[test]
    fn unknown_anchor_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let mut args = args(wardrobe(&dir));
        args.anchor_id = Some("ghost".to_string());

        let (class, _, code) =
            recommend_with(&RecommendationEngine::new(), &args).expect_err("missing anchor");

        assert_eq!((class, code), ("not_found", 4));
    }

    #[test]
    fn unreadable_wardrobe_is_an_input_failure() {
        let dir = TempDir::new().expect("tempdir");
        let args = args(dir.path().join("missing.json"));

        let (class, message, code) =
            recommend_with(&RecommendationEngine::new(), &args).expect_err("missing file");

        assert_eq!((class, code), ("input", 3));
        assert!(message.contains("missing.json"));
    }

    #[test]
    fn unknown_style_is_an_invalid_request() {
        let dir = TempDir::new().expect("tempdir");
        let mut args = args(wardrobe(&dir));
        args.style = "cyberpunk".to_string();

        let (class, _, code) =
            recommend_with(&RecommendationEngine::new(), &args).expect_err("bad style");

        assert_eq!((class, code), ("invalid_request", 5));
    }
}
