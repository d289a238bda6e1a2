use crate::domain::garment::GarmentRecord;
use crate::taxonomy::{Category, Group};

use super::types::{RecommendationMode, RequestError};

/// Candidate garments for one request, optionally narrowed to a single group.
#[derive(Clone, Debug)]
pub struct WardrobeSnapshot<'a> {
    pub group: Option<Group>,
    garments: Vec<&'a GarmentRecord>,
}

impl<'a> WardrobeSnapshot<'a> {
    /// Filters an already-fetched wardrobe for `mode`.
    ///
    /// Completing an outfit keeps only the group opposite to the anchor; a
    /// full outfit keeps everything. An empty result is a valid snapshot.
    pub fn build(
        wardrobe: &'a [GarmentRecord],
        mode: RecommendationMode,
        anchor_category: Option<Category>,
    ) -> Result<Self, RequestError> {
        let group = match (mode, anchor_category) {
            (RecommendationMode::Full, None) => None,
            (RecommendationMode::Full, Some(_)) => return Err(RequestError::UnexpectedAnchor),
            (_, None) => return Err(RequestError::MissingAnchor { mode }),
            (_, Some(category)) => {
                let wanted = category.group().opposite();
                if Some(wanted) != mode.completed_group() {
                    return Err(RequestError::AnchorGroupMismatch {
                        mode,
                        expected: wanted,
                        actual: category.group(),
                    });
                }
                Some(wanted)
            }
        };

        let garments = wardrobe
            .iter()
            .filter(|garment| group.map_or(true, |wanted| garment.group() == wanted))
            .collect();

        Ok(Self { group, garments })
    }

    pub fn garments(&self) -> &[&'a GarmentRecord] {
        &self.garments
    }

    pub fn len(&self) -> usize {
        self.garments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.garments.is_empty()
    }

    /// Splits the snapshot into top-group and bottom-group candidates.
    pub fn partition(&self) -> (Vec<&'a GarmentRecord>, Vec<&'a GarmentRecord>) {
        self.garments.iter().copied().partition(|garment| garment.group() == Group::Top)
    }
}
