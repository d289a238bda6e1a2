use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::Row;

use closet_core::domain::garment::{GarmentAttributes, GarmentId, GarmentRecord, ImageRef, UserId};
use closet_core::taxonomy::Group;

use super::{GarmentRepository, RepositoryError, StoredGarment};
use crate::DbPool;

const GARMENT_COLUMNS: &str = "uid, id, category, color, print, material, length, style,
                               image_name, image_ref, added_at";

pub struct SqlGarmentRepository {
    pool: DbPool,
}

impl SqlGarmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode<T>(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<T, RepositoryError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.try_get(column).map_err(|e| RepositoryError::Decode(e.to_string()))?;
    raw.parse::<T>().map_err(|e| RepositoryError::Decode(format!("{column}: {e}")))
}

fn row_to_garment(row: &sqlx::sqlite::SqliteRow) -> Result<StoredGarment, RepositoryError> {
    let uid: String = row.try_get("uid").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let image_name: String =
        row.try_get("image_name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let image_ref: String =
        row.try_get("image_ref").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let added_at_str: String =
        row.try_get("added_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let added_at = DateTime::parse_from_rfc3339(&added_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("added_at: {e}")))?;

    let attributes = GarmentAttributes {
        category: decode(row, "category")?,
        color: decode(row, "color")?,
        print: decode(row, "print")?,
        material: decode(row, "material")?,
        length: decode(row, "length")?,
        style: decode(row, "style")?,
    };

    Ok(StoredGarment {
        uid: UserId(uid),
        image_name,
        record: GarmentRecord {
            id: GarmentId(id),
            attributes,
            image_ref: ImageRef(image_ref),
            added_at,
        },
    })
}

#[async_trait::async_trait]
impl GarmentRepository for SqlGarmentRepository {
    async fn list_for_user(
        &self,
        uid: &UserId,
        group: Option<Group>,
    ) -> Result<Vec<GarmentRecord>, RepositoryError> {
        let sql = format!(
            "SELECT {GARMENT_COLUMNS} FROM garment
             WHERE uid = ? AND (? IS NULL OR garment_group = ?)
             ORDER BY added_at ASC, rowid ASC"
        );
        let group = group.map(Group::as_str);
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(&sql)
            .bind(&uid.0)
            .bind(group)
            .bind(group)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| row_to_garment(row).map(|stored| stored.record)).collect()
    }

    async fn find(
        &self,
        uid: &UserId,
        id: &GarmentId,
    ) -> Result<Option<StoredGarment>, RepositoryError> {
        let sql = format!("SELECT {GARMENT_COLUMNS} FROM garment WHERE uid = ? AND id = ?");
        let row = sqlx::query(&sql).bind(&uid.0).bind(&id.0).fetch_optional(&self.pool).await?;

        match row {
            Some(ref r) => Ok(Some(row_to_garment(r)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, garment: StoredGarment) -> Result<(), RepositoryError> {
        let record = &garment.record;
        let attributes = &record.attributes;

        sqlx::query(
            "INSERT INTO garment (uid, id, category, garment_group, color, print, material,
                                  length, style, image_name, image_ref, added_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(uid, id) DO UPDATE SET
                 category = excluded.category,
                 garment_group = excluded.garment_group,
                 color = excluded.color,
                 print = excluded.print,
                 material = excluded.material,
                 length = excluded.length,
                 style = excluded.style,
                 image_name = excluded.image_name,
                 image_ref = excluded.image_ref",
        )
        .bind(&garment.uid.0)
        .bind(&record.id.0)
        .bind(attributes.category.as_str())
        .bind(attributes.group().as_str())
        .bind(attributes.color.as_str())
        .bind(attributes.print.as_str())
        .bind(attributes.material.as_str())
        .bind(attributes.length.as_str())
        .bind(attributes.style.as_str())
        .bind(&garment.image_name)
        .bind(&record.image_ref.0)
        .bind(record.added_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, uid: &UserId, id: &GarmentId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM garment WHERE uid = ? AND id = ?")
            .bind(&uid.0)
            .bind(&id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
