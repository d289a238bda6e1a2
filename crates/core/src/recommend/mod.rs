//! Outfit recommendation
//!
//! Picks the garment(s) from a user's closet that sit closest to a target
//! built from the requested style, the user's demographic profile, today's
//! weather and, when completing an outfit, the fixed anchor garment.

mod assembler;
mod engine;
mod scoring;
mod snapshot;
mod suitability;
mod types;

pub use assembler::assemble;
pub use engine::{RankedCandidate, RecommendationEngine};
pub use scoring::{ScoringPolicy, ScoringWeights, TieBreak, WeightedModesPolicy};
pub use snapshot::WardrobeSnapshot;
pub use suitability::{SuitabilityBias, SuitabilityThresholds};
pub use types::*;

use crate::domain::garment::{GarmentAttributes, GarmentRecord};
use crate::domain::profile::UserProfile;
use crate::domain::weather::WeatherSummary;
use crate::taxonomy::Style;

/// Default dimension weights
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    style: 0.35,
    color: 0.25,
    material: 0.15,
    length: 0.15,
    print: 0.10,
    weather_influence: 1.0,
};

/// Largest distance a completing garment may have and still be offered
pub const DEFAULT_MAX_DISTANCE: f64 = 0.6;

/// Distances closer than this are treated as ties
pub const TIE_EPSILON: f64 = 1e-9;

/// Recommends an outfit from `wardrobe`.
///
/// `weather: None` means weather is unavailable and is scored as neutral.
pub fn recommend<P: ScoringPolicy>(
    profile: UserProfile,
    style: Style,
    weather: Option<WeatherSummary>,
    mode: RecommendationMode,
    anchor: Option<GarmentAttributes>,
    wardrobe: &[GarmentRecord],
    engine: &RecommendationEngine<P>,
) -> Result<RecommendationResult, RequestError> {
    let request = RecommendationRequest { mode, profile, style, weather, anchor };
    engine.recommend(&request, wardrobe)
}
