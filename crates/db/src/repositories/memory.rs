use std::collections::HashMap;

use tokio::sync::RwLock;

use closet_core::domain::garment::{GarmentId, GarmentRecord, UserId};
use closet_core::taxonomy::Group;

use super::{GarmentRepository, ProfileRepository, RepositoryError, StoredGarment, StoredProfile};

/// Per-user garments kept in insertion order.
#[derive(Default)]
pub struct InMemoryGarmentRepository {
    garments: RwLock<HashMap<String, Vec<StoredGarment>>>,
}

#[async_trait::async_trait]
impl GarmentRepository for InMemoryGarmentRepository {
    async fn list_for_user(
        &self,
        uid: &UserId,
        group: Option<Group>,
    ) -> Result<Vec<GarmentRecord>, RepositoryError> {
        let garments = self.garments.read().await;
        let mut records: Vec<GarmentRecord> = garments
            .get(&uid.0)
            .map(|stored| {
                stored
                    .iter()
                    .filter(|garment| group.map_or(true, |group| garment.record.group() == group))
                    .map(|garment| garment.record.clone())
                    .collect()
            })
            .unwrap_or_default();
        // Stable sort keeps insertion order among equal timestamps.
        records.sort_by_key(|record| record.added_at);
        Ok(records)
    }

    async fn find(
        &self,
        uid: &UserId,
        id: &GarmentId,
    ) -> Result<Option<StoredGarment>, RepositoryError> {
        let garments = self.garments.read().await;
        Ok(garments
            .get(&uid.0)
            .and_then(|stored| stored.iter().find(|garment| &garment.record.id == id))
            .cloned())
    }

    async fn save(&self, garment: StoredGarment) -> Result<(), RepositoryError> {
        let mut garments = self.garments.write().await;
        let stored = garments.entry(garment.uid.0.clone()).or_default();
        match stored.iter_mut().find(|existing| existing.record.id == garment.record.id) {
            Some(existing) => {
                let added_at = existing.record.added_at;
                *existing = garment;
                existing.record.added_at = added_at;
            }
            None => stored.push(garment),
        }
        Ok(())
    }

    async fn delete(&self, uid: &UserId, id: &GarmentId) -> Result<bool, RepositoryError> {
        let mut garments = self.garments.write().await;
        let Some(stored) = garments.get_mut(&uid.0) else {
            return Ok(false);
        };
        let before = stored.len();
        stored.retain(|garment| &garment.record.id != id);
        Ok(stored.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<String, StoredProfile>>,
}

#[async_trait::async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find(&self, uid: &UserId) -> Result<Option<StoredProfile>, RepositoryError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(&uid.0).cloned())
    }

    async fn save(&self, profile: StoredProfile) -> Result<(), RepositoryError> {
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.uid.0.clone(), profile);
        Ok(())
    }
}
