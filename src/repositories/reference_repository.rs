// src/repositories/reference_repository.rs

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::{CollectionKind, MediaType, Reference};
use crate::error::{AppError, AppResult};

pub trait ReferenceRepository: Send + Sync {
    /// Insert or replace; repeat adds of the same (owner, item, media type)
    /// within a collection overwrite the existing row.
    fn upsert(&self, kind: CollectionKind, reference: &Reference) -> AppResult<()>;

    fn get(
        &self,
        kind: CollectionKind,
        owner_id: Uuid,
        item_id: i64,
        media_type: MediaType,
    ) -> AppResult<Option<Reference>>;

    /// Newest first
    fn list(&self, kind: CollectionKind, owner_id: Uuid) -> AppResult<Vec<Reference>>;

    /// Returns whether a row was actually removed
    fn remove(
        &self,
        kind: CollectionKind,
        owner_id: Uuid,
        item_id: i64,
        media_type: MediaType,
    ) -> AppResult<bool>;

    /// Removes every reference of one owner's collection, returns the count
    fn clear(&self, kind: CollectionKind, owner_id: Uuid) -> AppResult<usize>;
}

pub struct SqliteReferenceRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteReferenceRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_reference(row: &Row) -> Result<Reference, rusqlite::Error> {
        let owner_id = Uuid::parse_str(&row.get::<_, String>("owner_id")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let item_id: i64 = row.get("item_id")?;
        let media_type = MediaType::parse(&row.get::<_, String>("media_type")?);
        let title: String = row.get("title")?;
        let poster_path: Option<String> = row.get("poster_path")?;

        let created_at = DateTime::parse_from_rfc3339(&row.get::<_, String>("created_at")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(Reference {
            owner_id,
            item_id,
            media_type,
            title,
            poster_path,
            created_at,
        })
    }
}

impl ReferenceRepository for SqliteReferenceRepository {
    fn upsert(&self, kind: CollectionKind, reference: &Reference) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR REPLACE INTO collection_refs
             (owner_id, collection, item_id, media_type, title, poster_path, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                reference.owner_id.to_string(),
                kind.as_str(),
                reference.item_id,
                reference.media_type.as_str(),
                reference.title,
                reference.poster_path,
                reference.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get(
        &self,
        kind: CollectionKind,
        owner_id: Uuid,
        item_id: i64,
        media_type: MediaType,
    ) -> AppResult<Option<Reference>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT * FROM collection_refs
             WHERE owner_id = ?1 AND collection = ?2 AND item_id = ?3 AND media_type = ?4",
        )?;

        match stmt.query_row(
            params![
                owner_id.to_string(),
                kind.as_str(),
                item_id,
                media_type.as_str()
            ],
            Self::row_to_reference,
        ) {
            Ok(reference) => Ok(Some(reference)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list(&self, kind: CollectionKind, owner_id: Uuid) -> AppResult<Vec<Reference>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT * FROM collection_refs
             WHERE owner_id = ?1 AND collection = ?2
             ORDER BY created_at DESC",
        )?;

        let references: Vec<Reference> = stmt
            .query_map(
                params![owner_id.to_string(), kind.as_str()],
                Self::row_to_reference,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(references)
    }

    fn remove(
        &self,
        kind: CollectionKind,
        owner_id: Uuid,
        item_id: i64,
        media_type: MediaType,
    ) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let removed = conn.execute(
            "DELETE FROM collection_refs
             WHERE owner_id = ?1 AND collection = ?2 AND item_id = ?3 AND media_type = ?4",
            params![
                owner_id.to_string(),
                kind.as_str(),
                item_id,
                media_type.as_str()
            ],
        )?;

        Ok(removed > 0)
    }

    fn clear(&self, kind: CollectionKind, owner_id: Uuid) -> AppResult<usize> {
        let conn = self.pool.get()?;

        let removed = conn.execute(
            "DELETE FROM collection_refs WHERE owner_id = ?1 AND collection = ?2",
            params![owner_id.to_string(), kind.as_str()],
        )?;

        Ok(removed)
    }
}
