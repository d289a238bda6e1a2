//! Recommendation engine implementation

use super::assembler::assemble;
use super::scoring::{ScoringPolicy, WeightedModesPolicy};
use super::snapshot::WardrobeSnapshot;
use super::suitability::{SuitabilityBias, SuitabilityThresholds};
use super::types::*;
use super::TIE_EPSILON;
use crate::domain::garment::GarmentRecord;
use crate::taxonomy::Group;

/// A scored candidate, in ranking order.
#[derive(Debug, Clone, Copy)]
pub struct RankedCandidate<'a> {
    pub record: &'a GarmentRecord,
    pub breakdown: ScoreBreakdown,
}

/// Outfit recommendation engine bound to one scoring policy.
#[derive(Debug, Clone)]
pub struct RecommendationEngine<P = WeightedModesPolicy> {
    policy: P,
    thresholds: SuitabilityThresholds,
}

impl RecommendationEngine<WeightedModesPolicy> {
    pub fn new() -> Self {
        Self::with_policy(WeightedModesPolicy::new())
    }
}

impl Default for RecommendationEngine<WeightedModesPolicy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ScoringPolicy> RecommendationEngine<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy, thresholds: SuitabilityThresholds::default() }
    }

    pub fn with_thresholds(mut self, thresholds: SuitabilityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn thresholds(&self) -> &SuitabilityThresholds {
        &self.thresholds
    }

    /// Recommends garments for `request` out of `wardrobe`.
    ///
    /// An empty or unqualified slot is reported as `success: false`; only a
    /// malformed request is an error.
    pub fn recommend(
        &self,
        request: &RecommendationRequest,
        wardrobe: &[GarmentRecord],
    ) -> Result<RecommendationResult, RequestError> {
        request.validate()?;

        let snapshot = WardrobeSnapshot::build(
            wardrobe,
            request.mode,
            request.anchor.map(|anchor| anchor.category),
        )?;
        let bias = SuitabilityBias::from_weather(request.weather.as_ref(), &self.thresholds);
        let target = TargetProfile::from_request(request);

        // Full outfits always get the closest garment; completions must clear the bar.
        let enforce_bar = request.mode != RecommendationMode::Full;
        let (tops, bottoms) = snapshot.partition();

        let fills = |group: Group| match request.mode.completed_group() {
            None => true,
            Some(completed) => completed == group,
        };

        let top = if fills(Group::Top) {
            self.select(&target, &bias, &tops, enforce_bar)
        } else {
            SlotOutcome::none()
        };
        let bottom = if fills(Group::Bottom) {
            self.select(&target, &bias, &bottoms, enforce_bar)
        } else {
            SlotOutcome::none()
        };

        Ok(assemble(request.mode, top, bottom))
    }

    /// Scores every candidate and orders them best first.
    pub fn rank<'a>(
        &self,
        target: &TargetProfile,
        bias: &SuitabilityBias,
        candidates: &[&'a GarmentRecord],
    ) -> Vec<RankedCandidate<'a>> {
        let mut ranked: Vec<RankedCandidate<'a>> = candidates
            .iter()
            .copied()
            .map(|record| RankedCandidate {
                record,
                breakdown: self.policy.score(target, bias, &record.attributes),
            })
            .collect();

        ranked.sort_by(|a, b| {
            a.breakdown
                .distance
                .total_cmp(&b.breakdown.distance)
                .then_with(|| self.policy.tie_break(a.record, b.record))
        });
        ranked
    }

    /// Picks the closest candidate for one slot.
    pub fn select(
        &self,
        target: &TargetProfile,
        bias: &SuitabilityBias,
        candidates: &[&GarmentRecord],
        enforce_bar: bool,
    ) -> SlotOutcome {
        let ranked = self.rank(target, bias, candidates);
        let Some(best_distance) = ranked.first().map(|best| best.breakdown.distance) else {
            return SlotOutcome::none();
        };

        let winner = ranked
            .iter()
            .take_while(|candidate| candidate.breakdown.distance - best_distance <= TIE_EPSILON)
            .min_by(|a, b| self.policy.tie_break(a.record, b.record));

        match winner {
            Some(winner) if !enforce_bar || self.policy.accepts(&winner.breakdown) => {
                let reasons = self.policy.reasons(
                    target,
                    bias,
                    &winner.record.attributes,
                    &winner.breakdown,
                );
                SlotOutcome::chosen(ChosenGarment::from_record(
                    winner.record,
                    winner.breakdown.distance,
                    reasons,
                ))
            }
            _ => SlotOutcome::none(),
        }
    }
}
