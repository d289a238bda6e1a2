use chrono::{DateTime, Utc};
use sqlx::Row;

use closet_core::domain::garment::UserId;

use super::{ProfileRepository, RepositoryError, StoredProfile};
use crate::DbPool;

pub struct SqlProfileRepository {
    pool: DbPool,
}

impl SqlProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> Result<StoredProfile, RepositoryError> {
    let uid: String = row.try_get("uid").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let age: i64 = row.try_get("age").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let sex: String = row.try_get("sex").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let updated_at_str: String =
        row.try_get("updated_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let age = u8::try_from(age)
        .map_err(|_| RepositoryError::Decode(format!("age out of range: {age}")))?;
    let sex = sex.parse().map_err(|e| RepositoryError::Decode(format!("sex: {e}")))?;
    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("updated_at: {e}")))?;

    Ok(StoredProfile { uid: UserId(uid), age, sex, updated_at })
}

#[async_trait::async_trait]
impl ProfileRepository for SqlProfileRepository {
    async fn find(&self, uid: &UserId) -> Result<Option<StoredProfile>, RepositoryError> {
        let row = sqlx::query("SELECT uid, age, sex, updated_at FROM user_profile WHERE uid = ?")
            .bind(&uid.0)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_profile(r)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, profile: StoredProfile) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO user_profile (uid, age, sex, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(uid) DO UPDATE SET
                 age = excluded.age,
                 sex = excluded.sex,
                 updated_at = excluded.updated_at",
        )
        .bind(&profile.uid.0)
        .bind(i64::from(profile.age))
        .bind(profile.sex.as_str())
        .bind(profile.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use closet_core::domain::garment::UserId;
    use closet_core::domain::profile::Sex;

    use super::SqlProfileRepository;
    use crate::repositories::{ProfileRepository, StoredProfile};
    use crate::{connect_with_settings, migrations};

    async fn repo() -> SqlProfileRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        SqlProfileRepository::new(pool)
    }

    fn profile(age: u8, sex: Sex) -> StoredProfile {
        StoredProfile {
            uid: UserId("u1".to_string()),
            age,
            sex,
            updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("timestamp"),
        }
    }

    #[tokio::test]
    async fn missing_profile_is_none() {
        let repo = repo().await;
        assert_eq!(repo.find(&UserId("nobody".to_string())).await.expect("find"), None);
    }

    #[tokio::test]
    async fn save_overwrites_previous_profile() {
        let repo = repo().await;
        repo.save(profile(24, Sex::Female)).await.expect("save");
        repo.save(profile(25, Sex::Other)).await.expect("overwrite");

        let found = repo.find(&UserId("u1".to_string())).await.expect("find").expect("profile");
        assert_eq!(found.age, 25);
        assert_eq!(found.sex, Sex::Other);
        assert_eq!(found.profile().age_bracket(), closet_core::AgeBracket::YoungAdult);
    }
}
