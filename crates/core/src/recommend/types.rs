//! Types for the outfit recommendation core

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::garment::{GarmentAttributes, GarmentId, GarmentRecord, ImageRef};
use crate::domain::profile::{AgeBracket, UserProfile};
use crate::domain::weather::WeatherSummary;
use crate::taxonomy::{Group, Style};

/// Which slot(s) a request asks the engine to fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMode {
    /// Pick both a top and a bottom.
    Full,
    /// Pick a top for a fixed bottom anchor.
    CompleteTop,
    /// Pick a bottom for a fixed top anchor.
    CompleteBottom,
}

impl RecommendationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::CompleteTop => "complete_top",
            Self::CompleteBottom => "complete_bottom",
        }
    }

    /// Group of the slot being completed, `None` for full outfits.
    pub fn completed_group(self) -> Option<Group> {
        match self {
            Self::Full => None,
            Self::CompleteTop => Some(Group::Top),
            Self::CompleteBottom => Some(Group::Bottom),
        }
    }

    /// Group the anchor garment must come from.
    pub fn anchor_group(self) -> Option<Group> {
        self.completed_group().map(Group::opposite)
    }

    /// Mode that completes an outfit around an anchor of the given group.
    pub fn completing(anchor_group: Group) -> Self {
        match anchor_group {
            Group::Top => Self::CompleteBottom,
            Group::Bottom => Self::CompleteTop,
        }
    }
}

impl std::str::FromStr for RecommendationMode {
    type Err = RequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "full" => Ok(Self::Full),
            "complete_top" | "top" => Ok(Self::CompleteTop),
            "complete_bottom" | "bottom" => Ok(Self::CompleteBottom),
            other => Err(RequestError::InvalidField {
                field: "mode",
                reason: format!(
                    "unsupported mode `{other}` (expected full|complete_top|complete_bottom)"
                ),
            }),
        }
    }
}

/// Rejections raised before the engine runs.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("mode `{}` requires an anchor garment", .mode.as_str())]
    MissingAnchor { mode: RecommendationMode },
    #[error("mode `full` does not take an anchor garment")]
    UnexpectedAnchor,
    #[error("mode `{}` needs a {expected} anchor but got a {actual} garment", .mode.as_str())]
    AnchorGroupMismatch { mode: RecommendationMode, expected: Group, actual: Group },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecommendationRequest {
    pub mode: RecommendationMode,
    pub profile: UserProfile,
    pub style: Style,
    /// `None` when weather is unavailable; treated as neutral.
    pub weather: Option<WeatherSummary>,
    pub anchor: Option<GarmentAttributes>,
}

impl RecommendationRequest {
    pub fn full(profile: UserProfile, style: Style) -> Self {
        Self { mode: RecommendationMode::Full, profile, style, weather: None, anchor: None }
    }

    pub fn complete(profile: UserProfile, style: Style, anchor: GarmentAttributes) -> Self {
        Self {
            mode: RecommendationMode::completing(anchor.group()),
            profile,
            style,
            weather: None,
            anchor: Some(anchor),
        }
    }

    pub fn with_weather(mut self, weather: Option<WeatherSummary>) -> Self {
        self.weather = weather;
        self
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        match (self.mode.anchor_group(), &self.anchor) {
            (None, None) => Ok(()),
            (None, Some(_)) => Err(RequestError::UnexpectedAnchor),
            (Some(_), None) => Err(RequestError::MissingAnchor { mode: self.mode }),
            (Some(expected), Some(anchor)) if anchor.group() != expected => {
                Err(RequestError::AnchorGroupMismatch {
                    mode: self.mode,
                    expected,
                    actual: anchor.group(),
                })
            }
            (Some(_), Some(_)) => Ok(()),
        }
    }
}

/// What the engine is trying to get close to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetProfile {
    pub style: Style,
    pub age_bracket: AgeBracket,
    pub anchor: Option<GarmentAttributes>,
}

impl TargetProfile {
    pub fn from_request(request: &RecommendationRequest) -> Self {
        Self {
            style: request.style,
            age_bracket: request.profile.age_bracket(),
            anchor: request.anchor,
        }
    }
}

/// Per-dimension dissimilarities in `0.0..=1.0` and their weighted total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub style: f64,
    pub color: f64,
    pub print: f64,
    pub material: f64,
    pub length: f64,
    /// Weighted distance; lower is a better fit.
    pub distance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChosenGarment {
    pub id: GarmentId,
    #[serde(flatten)]
    pub attributes: GarmentAttributes,
    pub image_ref: ImageRef,
    pub distance: f64,
    pub reasons: Vec<String>,
}

impl ChosenGarment {
    pub fn from_record(record: &GarmentRecord, distance: f64, reasons: Vec<String>) -> Self {
        Self {
            id: record.id.clone(),
            attributes: record.attributes,
            image_ref: record.image_ref.clone(),
            distance,
            reasons,
        }
    }
}

/// Outcome for one slot. `success: false` with no choice means nothing in
/// the closet qualified; it is not an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotOutcome {
    pub success: bool,
    pub chosen: Option<ChosenGarment>,
}

impl SlotOutcome {
    pub fn chosen(garment: ChosenGarment) -> Self {
        Self { success: true, chosen: Some(garment) }
    }

    pub fn none() -> Self {
        Self { success: false, chosen: None }
    }

    pub fn chosen_id(&self) -> Option<&GarmentId> {
        self.chosen.as_ref().map(|garment| &garment.id)
    }
}

/// Response shapes toward the HTTP layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RecommendationResult {
    FullPair { success: bool, top: SlotOutcome, bottom: SlotOutcome },
    TopOnly { success: bool, top: SlotOutcome },
    BottomOnly { success: bool, bottom: SlotOutcome },
}

impl RecommendationResult {
    pub fn success(&self) -> bool {
        match self {
            Self::FullPair { success, .. }
            | Self::TopOnly { success, .. }
            | Self::BottomOnly { success, .. } => *success,
        }
    }

    pub fn slot(&self, group: Group) -> Option<&SlotOutcome> {
        match (self, group) {
            (Self::FullPair { top, .. }, Group::Top) | (Self::TopOnly { top, .. }, Group::Top) => {
                Some(top)
            }
            (Self::FullPair { bottom, .. }, Group::Bottom)
            | (Self::BottomOnly { bottom, .. }, Group::Bottom) => Some(bottom),
            _ => None,
        }
    }
}
