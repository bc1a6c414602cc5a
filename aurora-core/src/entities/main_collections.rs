use aurora_sdk::objects::catalog::{MainCollectionBody, MainCollectionResponse, MediaImage};
use kanau::processor::Processor;
use sqlx::types::Json;

use crate::entities::{merge_optional_text, merge_text};
use crate::error::StoreError;
use crate::framework::DatabaseProcessor;

/// A top-level line of jewelry, e.g. "Fine Jewelry".
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MainCollectionRecord {
    pub id: i32,
    pub name: String,
    pub status: Option<String>,
    pub description: Option<String>,
    pub image: Option<Json<MediaImage>>,
}

impl From<MainCollectionRecord> for MainCollectionResponse {
    fn from(record: MainCollectionRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            status: record.status,
            description: record.description,
            image: record.image.map(|image| image.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListMainCollections;

impl Processor<ListMainCollections> for DatabaseProcessor {
    type Output = Vec<MainCollectionRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:ListMainCollections")]
    async fn process(&self, _: ListMainCollections) -> Result<Vec<MainCollectionRecord>, StoreError> {
        let rows = sqlx::query_as::<_, MainCollectionRecord>(
            "SELECT id, name, status, description, image FROM main_collections ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone)]
pub struct GetMainCollectionById {
    pub id: i32,
}

impl Processor<GetMainCollectionById> for DatabaseProcessor {
    type Output = Option<MainCollectionRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:GetMainCollectionById")]
    async fn process(
        &self,
        query: GetMainCollectionById,
    ) -> Result<Option<MainCollectionRecord>, StoreError> {
        let row = sqlx::query_as::<_, MainCollectionRecord>(
            "SELECT id, name, status, description, image FROM main_collections WHERE id = $1",
        )
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[derive(Debug, Clone)]
pub struct GetMainCollectionByName {
    pub name: String,
}

impl Processor<GetMainCollectionByName> for DatabaseProcessor {
    type Output = Option<MainCollectionRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:GetMainCollectionByName")]
    async fn process(
        &self,
        query: GetMainCollectionByName,
    ) -> Result<Option<MainCollectionRecord>, StoreError> {
        let row = sqlx::query_as::<_, MainCollectionRecord>(
            "SELECT id, name, status, description, image FROM main_collections WHERE name = $1",
        )
        .bind(query.name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

/// Case-insensitive substring search on the name. `None` lists everything.
#[derive(Debug, Clone)]
pub struct SearchMainCollections {
    pub name: Option<String>,
}

impl Processor<SearchMainCollections> for DatabaseProcessor {
    type Output = Vec<MainCollectionRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:SearchMainCollections")]
    async fn process(
        &self,
        query: SearchMainCollections,
    ) -> Result<Vec<MainCollectionRecord>, StoreError> {
        let pattern = query.name.map(|name| format!("%{}%", name.trim()));
        let rows = sqlx::query_as::<_, MainCollectionRecord>(
            r#"
            SELECT id, name, status, description, image
            FROM main_collections
            WHERE $1::text IS NULL OR name ILIKE $1
            ORDER BY id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone)]
pub struct CreateMainCollection {
    pub name: String,
    pub status: Option<String>,
    pub description: Option<String>,
    pub image: Option<MediaImage>,
}

impl Processor<CreateMainCollection> for DatabaseProcessor {
    type Output = MainCollectionRecord;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateMainCollection")]
    async fn process(&self, insert: CreateMainCollection) -> Result<MainCollectionRecord, StoreError> {
        let row = sqlx::query_as::<_, MainCollectionRecord>(
            r#"
            INSERT INTO main_collections (name, status, description, image)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, status, description, image
            "#,
        )
        .bind(insert.name.trim())
        .bind(insert.status)
        .bind(insert.description)
        .bind(insert.image.map(Json))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

/// Apply a partial update; `None` when the main collection does not exist.
#[derive(Debug, Clone)]
pub struct UpdateMainCollection {
    pub id: i32,
    pub changes: MainCollectionBody,
}

impl Processor<UpdateMainCollection> for DatabaseProcessor {
    type Output = Option<MainCollectionRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateMainCollection")]
    async fn process(
        &self,
        update: UpdateMainCollection,
    ) -> Result<Option<MainCollectionRecord>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let Some(current) = sqlx::query_as::<_, MainCollectionRecord>(
            "SELECT id, name, status, description, image FROM main_collections WHERE id = $1 FOR UPDATE",
        )
        .bind(update.id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        let UpdateMainCollection { id, changes } = update;
        let row = sqlx::query_as::<_, MainCollectionRecord>(
            r#"
            UPDATE main_collections
            SET name = $2, status = $3, description = $4, image = $5
            WHERE id = $1
            RETURNING id, name, status, description, image
            "#,
        )
        .bind(id)
        .bind(merge_text(changes.name, current.name))
        .bind(merge_optional_text(changes.status, current.status))
        .bind(merge_optional_text(changes.description, current.description))
        .bind(changes.image.map(Json).or(current.image))
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(row))
    }
}

/// Delete a main collection. Its collections are kept and detached.
#[derive(Debug, Clone)]
pub struct DeleteMainCollection {
    pub id: i32,
}

impl Processor<DeleteMainCollection> for DatabaseProcessor {
    type Output = bool;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteMainCollection")]
    async fn process(&self, query: DeleteMainCollection) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM main_collections WHERE id = $1")
            .bind(query.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
