use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use closet_core::domain::garment::{GarmentId, GarmentRecord, UserId};
use closet_core::domain::profile::{Sex, UserProfile};
use closet_core::taxonomy::Group;
use closet_core::ApplicationError;

pub mod garment;
pub mod memory;
pub mod profile;

pub use garment::SqlGarmentRepository;
pub use memory::{InMemoryGarmentRepository, InMemoryProfileRepository};
pub use profile::SqlProfileRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        Self::Persistence(value.to_string())
    }
}

/// A garment as persisted for one user.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredGarment {
    pub uid: UserId,
    /// Original upload name; the image store key is derived from it.
    pub image_name: String,
    pub record: GarmentRecord,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredProfile {
    pub uid: UserId,
    pub age: u8,
    pub sex: Sex,
    pub updated_at: DateTime<Utc>,
}

impl StoredProfile {
    pub fn profile(&self) -> UserProfile {
        UserProfile { age: self.age, sex: self.sex }
    }
}

#[async_trait]
pub trait GarmentRepository: Send + Sync {
    /// Garments of `uid` in insertion order, optionally limited to one group.
    async fn list_for_user(
        &self,
        uid: &UserId,
        group: Option<Group>,
    ) -> Result<Vec<GarmentRecord>, RepositoryError>;

    async fn find(
        &self,
        uid: &UserId,
        id: &GarmentId,
    ) -> Result<Option<StoredGarment>, RepositoryError>;

    /// Inserts or replaces a garment; a replaced garment keeps its `added_at`.
    async fn save(&self, garment: StoredGarment) -> Result<(), RepositoryError>;

    /// Returns whether a garment was removed.
    async fn delete(&self, uid: &UserId, id: &GarmentId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find(&self, uid: &UserId) -> Result<Option<StoredProfile>, RepositoryError>;
    async fn save(&self, profile: StoredProfile) -> Result<(), RepositoryError>;
}
