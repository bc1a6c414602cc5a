use aurora_sdk::objects::catalog::{CategoryBody, CategoryResponse, MediaImage};
use kanau::processor::Processor;
use sqlx::types::Json;

use crate::entities::merge_text;
use crate::error::StoreError;
use crate::framework::DatabaseProcessor;

/// A product type, e.g. "Rings" or "Earrings".
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CategoryRecord {
    pub id: i32,
    pub name: String,
    pub image: Option<Json<MediaImage>>,
}

impl From<CategoryRecord> for CategoryResponse {
    fn from(record: CategoryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            image: record.image.map(|image| image.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListCategories;

impl Processor<ListCategories> for DatabaseProcessor {
    type Output = Vec<CategoryRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:ListCategories")]
    async fn process(&self, _: ListCategories) -> Result<Vec<CategoryRecord>, StoreError> {
        let rows = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, name, image FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone)]
pub struct GetCategoryById {
    pub id: i32,
}

impl Processor<GetCategoryById> for DatabaseProcessor {
    type Output = Option<CategoryRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCategoryById")]
    async fn process(&self, query: GetCategoryById) -> Result<Option<CategoryRecord>, StoreError> {
        let row = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, name, image FROM categories WHERE id = $1",
        )
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[derive(Debug, Clone)]
pub struct GetCategoryByName {
    pub name: String,
}

impl Processor<GetCategoryByName> for DatabaseProcessor {
    type Output = Option<CategoryRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCategoryByName")]
    async fn process(&self, query: GetCategoryByName) -> Result<Option<CategoryRecord>, StoreError> {
        let row = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, name, image FROM categories WHERE name = $1",
        )
        .bind(query.name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
    pub image: Option<MediaImage>,
}

impl Processor<CreateCategory> for DatabaseProcessor {
    type Output = CategoryRecord;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateCategory")]
    async fn process(&self, insert: CreateCategory) -> Result<CategoryRecord, StoreError> {
        let row = sqlx::query_as::<_, CategoryRecord>(
            "INSERT INTO categories (name, image) VALUES ($1, $2) RETURNING id, name, image",
        )
        .bind(insert.name.trim())
        .bind(insert.image.map(Json))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

/// Apply a partial update; `None` when the category does not exist.
#[derive(Debug, Clone)]
pub struct UpdateCategory {
    pub id: i32,
    pub changes: CategoryBody,
}

impl Processor<UpdateCategory> for DatabaseProcessor {
    type Output = Option<CategoryRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateCategory")]
    async fn process(&self, update: UpdateCategory) -> Result<Option<CategoryRecord>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let Some(current) = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, name, image FROM categories WHERE id = $1 FOR UPDATE",
        )
        .bind(update.id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        let UpdateCategory { id, changes } = update;
        let row = sqlx::query_as::<_, CategoryRecord>(
            "UPDATE categories SET name = $2, image = $3 WHERE id = $1 RETURNING id, name, image",
        )
        .bind(id)
        .bind(merge_text(changes.name, current.name))
        .bind(changes.image.map(Json).or(current.image))
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(row))
    }
}

/// Delete a category. Its products are kept and detached.
#[derive(Debug, Clone)]
pub struct DeleteCategory {
    pub id: i32,
}

impl Processor<DeleteCategory> for DatabaseProcessor {
    type Output = bool;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteCategory")]
    async fn process(&self, query: DeleteCategory) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(query.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
