use super::types::{RecommendationMode, RecommendationResult, SlotOutcome};

/// Packages per-slot outcomes into the response shape for `mode`.
///
/// Slots are given as `(top, bottom)`; the one a mode does not fill is
/// ignored. A full pair only succeeds when both slots resolved.
pub fn assemble(
    mode: RecommendationMode,
    top: SlotOutcome,
    bottom: SlotOutcome,
) -> RecommendationResult {
    match mode {
        RecommendationMode::Full => RecommendationResult::FullPair {
            success: top.success && bottom.success,
            top,
            bottom,
        },
        RecommendationMode::CompleteTop => {
            RecommendationResult::TopOnly { success: top.success, top }
        }
        RecommendationMode::CompleteBottom => {
            RecommendationResult::BottomOnly { success: bottom.success, bottom }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::garment::{GarmentAttributes, GarmentId, ImageRef};
    use crate::recommend::types::ChosenGarment;
    use crate::taxonomy::{Category, Color, Group, Length, Material, Print, Style};

    fn chosen(id: &str) -> SlotOutcome {
        SlotOutcome::chosen(ChosenGarment {
            id: GarmentId(id.to_string()),
            attributes: GarmentAttributes {
                category: Category::Shirt,
                color: Color::White,
                print: Print::Solid,
                material: Material::Cotton,
                length: Length::Regular,
                style: Style::Casual,
            },
            image_ref: ImageRef(format!("images/u1/{id}.jpg")),
            distance: 0.1,
            reasons: vec!["Closest match in your closet".to_string()],
        })
    }

    #[test]
    fn full_pair_requires_both_slots() {
        let result = assemble(RecommendationMode::Full, chosen("a"), SlotOutcome::none());

        assert!(!result.success());
        assert!(result.slot(Group::Top).is_some_and(|slot| slot.success));
        assert!(result.slot(Group::Bottom).is_some_and(|slot| !slot.success));
    }

    #[test]
    fn completing_modes_only_carry_their_slot() {
        let result = assemble(RecommendationMode::CompleteBottom, chosen("a"), chosen("b"));

        assert!(result.success());
        assert!(result.slot(Group::Top).is_none());
        assert_eq!(
            result.slot(Group::Bottom).and_then(SlotOutcome::chosen_id).map(|id| id.0.as_str()),
            Some("b")
        );
    }

    #[test]
    fn none_chosen_serializes_as_null() {
        let result =
            assemble(RecommendationMode::CompleteTop, SlotOutcome::none(), SlotOutcome::none());
        let json = serde_json::to_value(&result).expect("serialize");

        assert_eq!(json["shape"], "top_only");
        assert_eq!(json["success"], false);
        assert!(json["top"]["chosen"].is_null());
    }
}
