use aurora_sdk::objects::catalog::{
    CollectionBody, CollectionOption, CollectionResponse, CollectionTile, MediaImage,
};
use kanau::processor::Processor;
use sqlx::types::Json;

use crate::entities::{merge_optional_text, merge_text};
use crate::error::StoreError;
use crate::framework::DatabaseProcessor;

const COLLECTION_COLUMNS: &str = "id, name, description, status, image, main_collection_id";

/// A sub-collection inside a main collection, e.g. "Aurora" or "Daria".
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CollectionRecord {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub image: Option<Json<MediaImage>>,
    pub main_collection_id: Option<i32>,
}

impl CollectionRecord {
    pub fn tile(&self) -> CollectionTile {
        CollectionTile {
            id: self.id,
            name: self.name.clone(),
            image: self.image.as_ref().map(|image| image.0.clone()),
        }
    }
}

impl From<CollectionRecord> for CollectionResponse {
    fn from(record: CollectionRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            status: record.status,
            image: record.image.map(|image| image.0),
            main_collection_id: record.main_collection_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CollectionOptionRow {
    pub id: i32,
    pub name: String,
}

impl From<CollectionOptionRow> for CollectionOption {
    fn from(row: CollectionOptionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListCollections;

impl Processor<ListCollections> for DatabaseProcessor {
    type Output = Vec<CollectionRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:ListCollections")]
    async fn process(&self, _: ListCollections) -> Result<Vec<CollectionRecord>, StoreError> {
        let rows = sqlx::query_as::<_, CollectionRecord>(&format!(
            "SELECT {COLLECTION_COLUMNS} FROM collections ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone)]
pub struct ListCollectionsInMainCollection {
    pub main_collection_id: i32,
}

impl Processor<ListCollectionsInMainCollection> for DatabaseProcessor {
    type Output = Vec<CollectionRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:ListCollectionsInMainCollection")]
    async fn process(
        &self,
        query: ListCollectionsInMainCollection,
    ) -> Result<Vec<CollectionRecord>, StoreError> {
        let rows = sqlx::query_as::<_, CollectionRecord>(&format!(
            "SELECT {COLLECTION_COLUMNS} FROM collections WHERE main_collection_id = $1 ORDER BY id"
        ))
        .bind(query.main_collection_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone)]
pub struct GetCollectionById {
    pub id: i32,
}

impl Processor<GetCollectionById> for DatabaseProcessor {
    type Output = Option<CollectionRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCollectionById")]
    async fn process(&self, query: GetCollectionById) -> Result<Option<CollectionRecord>, StoreError> {
        let row = sqlx::query_as::<_, CollectionRecord>(&format!(
            "SELECT {COLLECTION_COLUMNS} FROM collections WHERE id = $1"
        ))
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[derive(Debug, Clone)]
pub struct GetCollectionByName {
    pub name: String,
}

impl Processor<GetCollectionByName> for DatabaseProcessor {
    type Output = Option<CollectionRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCollectionByName")]
    async fn process(
        &self,
        query: GetCollectionByName,
    ) -> Result<Option<CollectionRecord>, StoreError> {
        let row = sqlx::query_as::<_, CollectionRecord>(&format!(
            "SELECT {COLLECTION_COLUMNS} FROM collections WHERE name = $1"
        ))
        .bind(query.name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

/// Id and name of every collection, for the product editor dropdown.
#[derive(Debug, Clone)]
pub struct ListCollectionOptions;

impl Processor<ListCollectionOptions> for DatabaseProcessor {
    type Output = Vec<CollectionOptionRow>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:ListCollectionOptions")]
    async fn process(&self, _: ListCollectionOptions) -> Result<Vec<CollectionOptionRow>, StoreError> {
        let rows = sqlx::query_as::<_, CollectionOptionRow>(
            "SELECT id, name FROM collections ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone)]
pub struct CreateCollection {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub image: Option<MediaImage>,
    pub main_collection_id: Option<i32>,
}

impl Processor<CreateCollection> for DatabaseProcessor {
    type Output = CollectionRecord;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateCollection")]
    async fn process(&self, insert: CreateCollection) -> Result<CollectionRecord, StoreError> {
        let row = sqlx::query_as::<_, CollectionRecord>(&format!(
            r#"
            INSERT INTO collections (name, description, status, image, main_collection_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLLECTION_COLUMNS}
            "#
        ))
        .bind(insert.name.trim())
        .bind(insert.description)
        .bind(insert.status)
        .bind(insert.image.map(Json))
        .bind(insert.main_collection_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

/// Apply a partial update; `None` when the collection does not exist.
#[derive(Debug, Clone)]
pub struct UpdateCollection {
    pub id: i32,
    pub changes: CollectionBody,
}

impl Processor<UpdateCollection> for DatabaseProcessor {
    type Output = Option<CollectionRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateCollection")]
    async fn process(&self, update: UpdateCollection) -> Result<Option<CollectionRecord>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let Some(current) = sqlx::query_as::<_, CollectionRecord>(&format!(
            "SELECT {COLLECTION_COLUMNS} FROM collections WHERE id = $1 FOR UPDATE"
        ))
        .bind(update.id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        let UpdateCollection { id, changes } = update;
        let row = sqlx::query_as::<_, CollectionRecord>(&format!(
            r#"
            UPDATE collections
            SET name = $2, description = $3, status = $4, image = $5, main_collection_id = $6
            WHERE id = $1
            RETURNING {COLLECTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(merge_text(changes.name, current.name))
        .bind(merge_optional_text(changes.description, current.description))
        .bind(merge_optional_text(changes.status, current.status))
        .bind(changes.image.map(Json).or(current.image))
        .bind(changes.main_collection_id.or(current.main_collection_id))
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(row))
    }
}

/// Delete a collection. Its products are kept and detached.
#[derive(Debug, Clone)]
pub struct DeleteCollection {
    pub id: i32,
}

impl Processor<DeleteCollection> for DatabaseProcessor {
    type Output = bool;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteCollection")]
    async fn process(&self, query: DeleteCollection) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(query.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
