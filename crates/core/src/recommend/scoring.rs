//! Scoring policies for outfit candidates

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::garment::{GarmentAttributes, GarmentRecord};
use crate::taxonomy::{Color, ToneFamily};

use super::suitability::SuitabilityBias;
use super::types::{ScoreBreakdown, TargetProfile};
use super::{DEFAULT_MAX_DISTANCE, DEFAULT_WEIGHTS};

/// Importance of each attribute dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight for style match (default: 0.35)
    pub style: f64,
    /// Weight for color coordination (default: 0.25)
    pub color: f64,
    /// Weight for weather-driven material fit (default: 0.15)
    pub material: f64,
    /// Weight for weather-driven length fit (default: 0.15)
    pub length: f64,
    /// Weight for print coordination (default: 0.10)
    pub print: f64,
    /// Multiplier on the material and length weights (default: 1.0)
    pub weather_influence: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

/// Ordering applied between candidates whose distances are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Most recently added garment first.
    #[default]
    MostRecent,
    /// Lexicographically smallest garment id first.
    LowestId,
}

/// Strategy for measuring how well a candidate fits a target profile.
pub trait ScoringPolicy: Send + Sync {
    fn score(
        &self,
        target: &TargetProfile,
        bias: &SuitabilityBias,
        candidate: &GarmentAttributes,
    ) -> ScoreBreakdown;

    /// Whether a candidate clears the minimum compatibility bar.
    fn accepts(&self, breakdown: &ScoreBreakdown) -> bool;

    /// Orders two equally scored candidates; `Less` means `a` wins.
    fn tie_break(&self, a: &GarmentRecord, b: &GarmentRecord) -> Ordering;

    fn reasons(
        &self,
        target: &TargetProfile,
        bias: &SuitabilityBias,
        candidate: &GarmentAttributes,
        breakdown: &ScoreBreakdown,
    ) -> Vec<String>;
}

/// Weighted k-modes style dissimilarity over categorical attributes.
#[derive(Debug, Clone)]
pub struct WeightedModesPolicy {
    weights: ScoringWeights,
    max_distance: f64,
    tie_break: TieBreak,
}

impl WeightedModesPolicy {
    pub fn new() -> Self {
        Self {
            weights: ScoringWeights::default(),
            max_distance: DEFAULT_MAX_DISTANCE,
            tie_break: TieBreak::default(),
        }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    fn style_dissimilarity(target: &TargetProfile, candidate: &GarmentAttributes) -> f64 {
        let requested = 1.0 - target.style.affinity(candidate.style);
        match &target.anchor {
            Some(anchor) => 0.7 * requested + 0.3 * (1.0 - anchor.style.affinity(candidate.style)),
            None => requested,
        }
    }

    fn palette_dissimilarity(target: &TargetProfile, color: Color) -> f64 {
        if color.is_neutral() {
            return 0.0;
        }
        let tolerance = (target.style.bold_color_tolerance()
            + target.age_bracket.bold_color_shift())
        .clamp(0.0, 1.0);
        0.6 * (1.0 - tolerance)
    }

    fn color_dissimilarity(target: &TargetProfile, candidate: &GarmentAttributes) -> f64 {
        let palette = Self::palette_dissimilarity(target, candidate.color);
        match &target.anchor {
            Some(anchor) => 0.7 * color_pairing(anchor.color, candidate.color) + 0.3 * palette,
            None => palette,
        }
    }

    fn print_dissimilarity(target: &TargetProfile, candidate: &GarmentAttributes) -> f64 {
        let loudness = candidate.print.loudness();
        let Some(anchor) = &target.anchor else {
            return loudness * (1.0 - target.style.print_tolerance());
        };

        if !candidate.print.is_patterned() {
            return 0.0;
        }

        let clash = if !anchor.print.is_patterned() {
            0.3 * loudness
        } else if anchor.print == candidate.print {
            1.0
        } else {
            0.9
        };

        // A neutral anchor carries more prints than a bold one.
        if anchor.color.is_neutral() {
            clash * 0.6
        } else {
            clash
        }
    }
}

/// Dissimilarity of putting `candidate` next to `anchor`.
fn color_pairing(anchor: Color, candidate: Color) -> f64 {
    if anchor == candidate {
        return if anchor.is_neutral() { 0.3 } else { 0.6 };
    }

    match (anchor.tone(), candidate.tone()) {
        (ToneFamily::Neutral, ToneFamily::Neutral) => 0.1,
        (ToneFamily::Neutral, _) | (_, ToneFamily::Neutral) => 0.0,
        (a, b) if a == b => 0.4,
        (ToneFamily::Earth, _) | (_, ToneFamily::Earth) => 0.5,
        _ => 0.8,
    }
}

impl Default for WeightedModesPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringPolicy for WeightedModesPolicy {
    fn score(
        &self,
        target: &TargetProfile,
        bias: &SuitabilityBias,
        candidate: &GarmentAttributes,
    ) -> ScoreBreakdown {
        let style = Self::style_dissimilarity(target, candidate);
        let color = Self::color_dissimilarity(target, candidate);
        let print = Self::print_dissimilarity(target, candidate);
        let material = 0.5 - 0.5 * bias.material_fit(candidate.material);
        let length = 0.5 - 0.5 * bias.length_fit(candidate.length);

        let weather = self.weights.weather_influence.max(0.0);
        let weighted = [
            (style, self.weights.style),
            (color, self.weights.color),
            (print, self.weights.print),
            (material, self.weights.material * weather),
            (length, self.weights.length * weather),
        ];
        let total_weight: f64 = weighted.iter().map(|(_, weight)| weight.max(0.0)).sum();
        let distance = if total_weight == 0.0 {
            0.0
        } else {
            weighted.iter().map(|(value, weight)| value * weight.max(0.0)).sum::<f64>()
                / total_weight
        };

        ScoreBreakdown { style, color, print, material, length, distance }
    }

    fn accepts(&self, breakdown: &ScoreBreakdown) -> bool {
        breakdown.distance <= self.max_distance
    }

    fn tie_break(&self, a: &GarmentRecord, b: &GarmentRecord) -> Ordering {
        let primary = match self.tie_break {
            TieBreak::MostRecent => b.added_at.cmp(&a.added_at),
            TieBreak::LowestId => Ordering::Equal,
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    fn reasons(
        &self,
        target: &TargetProfile,
        bias: &SuitabilityBias,
        candidate: &GarmentAttributes,
        breakdown: &ScoreBreakdown,
    ) -> Vec<String> {
        let mut reasons = Vec::new();

        if breakdown.style < 0.25 {
            reasons.push(format!("Fits the {} style you asked for", target.style));
        }

        if let Some(anchor) = &target.anchor {
            if breakdown.color < 0.2 {
                reasons.push(format!(
                    "{} goes well with your {} {}",
                    capitalize(candidate.color.as_str()),
                    anchor.color,
                    anchor.category
                ));
            }
        } else if breakdown.color < 0.1 {
            reasons.push(format!("Easy-to-match {} tone", candidate.color));
        }

        if !bias.is_neutral() && (breakdown.material < 0.35 || breakdown.length < 0.35) {
            reasons.push(format!(
                "{} {} suits today's weather",
                capitalize(candidate.length.as_str()),
                candidate.material
            ));
        }

        // Ensure at least one reason
        if reasons.is_empty() {
            reasons.push("Closest match in your closet".to_string());
        }

        reasons
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>().replace('_', " "),
        None => String::new(),
    }
}
