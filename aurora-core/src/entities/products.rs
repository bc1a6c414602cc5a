use aurora_sdk::objects::catalog::{MediaImage, NamedRef, ProductBody, ProductCard, ProductResponse};
use kanau::processor::Processor;
use rust_decimal::Decimal;
use sqlx::types::Json;

use crate::entities::{merge_list, merge_optional_text, merge_text, unix_timestamp};
use crate::error::StoreError;
use crate::framework::DatabaseProcessor;

const PRODUCT_COLUMNS: &str = "product_id, product_title, product_description, product_price, \
    product_types, product_tags, published, product_size, gold_color, enamel_colors, \
    hook_options, product_images, collection_id, category_id, created_at";

const CARD_SELECT: &str = r#"
    SELECT p.product_id, p.product_title, p.product_price, p.product_types, p.product_images,
           p.collection_id, p.category_id,
           cat.name AS category_name, col.name AS collection_name
    FROM products p
    LEFT JOIN categories cat ON cat.id = p.category_id
    LEFT JOIN collections col ON col.id = p.collection_id
"#;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProductRecord {
    pub product_id: i32,
    pub product_title: String,
    pub product_description: Option<String>,
    pub product_price: Decimal,
    pub product_types: Option<String>,
    pub product_tags: Vec<String>,
    pub published: bool,
    pub product_size: Vec<String>,
    pub gold_color: Vec<String>,
    pub enamel_colors: Vec<String>,
    pub hook_options: Vec<String>,
    pub product_images: Json<Vec<MediaImage>>,
    pub collection_id: Option<i32>,
    pub category_id: Option<i32>,
    pub created_at: time::PrimitiveDateTime,
}

impl From<ProductRecord> for ProductResponse {
    fn from(record: ProductRecord) -> Self {
        Self {
            product_id: record.product_id,
            product_title: record.product_title,
            product_description: record.product_description,
            product_price: record.product_price,
            product_types: record.product_types,
            product_tags: record.product_tags,
            published: record.published,
            product_size: record.product_size,
            gold_color: record.gold_color,
            enamel_colors: record.enamel_colors,
            hook_options: record.hook_options,
            product_images: record.product_images.0,
            collection_id: record.collection_id,
            category_id: record.category_id,
            created_at: unix_timestamp(record.created_at),
        }
    }
}

/// A product joined with the names of its category and collection.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProductCardRow {
    pub product_id: i32,
    pub product_title: String,
    pub product_price: Decimal,
    pub product_types: Option<String>,
    pub product_images: Json<Vec<MediaImage>>,
    pub collection_id: Option<i32>,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub collection_name: Option<String>,
}

impl From<ProductCardRow> for ProductCard {
    fn from(row: ProductCardRow) -> Self {
        Self {
            product_id: row.product_id,
            product_title: row.product_title,
            product_price: row.product_price,
            product_types: row.product_types,
            product_images: row.product_images.0,
            category: row.category_name.map(|name| NamedRef { name }),
            collection: row.collection_name.map(|name| NamedRef { name }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListProducts;

impl Processor<ListProducts> for DatabaseProcessor {
    type Output = Vec<ProductRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:ListProducts")]
    async fn process(&self, _: ListProducts) -> Result<Vec<ProductRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY product_id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone)]
pub struct ListProductCards;

impl Processor<ListProductCards> for DatabaseProcessor {
    type Output = Vec<ProductCardRow>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:ListProductCards")]
    async fn process(&self, _: ListProductCards) -> Result<Vec<ProductCardRow>, StoreError> {
        let rows = sqlx::query_as::<_, ProductCardRow>(&format!(
            "{CARD_SELECT} ORDER BY p.product_id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// The most recently added products, newest first.
#[derive(Debug, Clone)]
pub struct ListNewArrivals {
    pub limit: i64,
}

impl Processor<ListNewArrivals> for DatabaseProcessor {
    type Output = Vec<ProductCardRow>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:ListNewArrivals")]
    async fn process(&self, query: ListNewArrivals) -> Result<Vec<ProductCardRow>, StoreError> {
        let rows = sqlx::query_as::<_, ProductCardRow>(&format!(
            "{CARD_SELECT} ORDER BY p.product_id DESC LIMIT $1"
        ))
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone)]
pub struct GetProductById {
    pub id: i32,
}

impl Processor<GetProductById> for DatabaseProcessor {
    type Output = Option<ProductRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:GetProductById")]
    async fn process(&self, query: GetProductById) -> Result<Option<ProductRecord>, StoreError> {
        let row = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1"
        ))
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

/// Products of a collection, most expensive first.
#[derive(Debug, Clone)]
pub struct ListProductsInCollection {
    pub collection_id: i32,
}

impl Processor<ListProductsInCollection> for DatabaseProcessor {
    type Output = Vec<ProductCardRow>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:ListProductsInCollection")]
    async fn process(
        &self,
        query: ListProductsInCollection,
    ) -> Result<Vec<ProductCardRow>, StoreError> {
        let rows = sqlx::query_as::<_, ProductCardRow>(&format!(
            "{CARD_SELECT} WHERE p.collection_id = $1 ORDER BY p.product_price DESC, p.product_id"
        ))
        .bind(query.collection_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone)]
pub struct ListProductsInCategory {
    pub category_id: i32,
}

impl Processor<ListProductsInCategory> for DatabaseProcessor {
    type Output = Vec<ProductCardRow>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:ListProductsInCategory")]
    async fn process(&self, query: ListProductsInCategory) -> Result<Vec<ProductCardRow>, StoreError> {
        let rows = sqlx::query_as::<_, ProductCardRow>(&format!(
            "{CARD_SELECT} WHERE p.category_id = $1 ORDER BY p.product_id"
        ))
        .bind(query.category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Case-insensitive match on the title or the product types, ordered by
/// title.
#[derive(Debug, Clone)]
pub struct SearchProducts {
    pub query: String,
}

impl Processor<SearchProducts> for DatabaseProcessor {
    type Output = Vec<ProductCardRow>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:SearchProducts")]
    async fn process(&self, search: SearchProducts) -> Result<Vec<ProductCardRow>, StoreError> {
        let pattern = format!("%{}%", search.query.trim());
        let rows = sqlx::query_as::<_, ProductCardRow>(&format!(
            "{CARD_SELECT} WHERE p.product_title ILIKE $1 OR p.product_types ILIKE $1 \
             ORDER BY p.product_title ASC"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub product_title: String,
    pub product_description: Option<String>,
    pub product_price: Decimal,
    pub product_types: Option<String>,
    pub product_tags: Vec<String>,
    pub published: bool,
    pub product_size: Vec<String>,
    pub gold_color: Vec<String>,
    pub enamel_colors: Vec<String>,
    pub hook_options: Vec<String>,
    pub product_images: Vec<MediaImage>,
    pub collection_id: Option<i32>,
    pub category_id: Option<i32>,
}

impl Processor<CreateProduct> for DatabaseProcessor {
    type Output = ProductRecord;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateProduct")]
    async fn process(&self, insert: CreateProduct) -> Result<ProductRecord, StoreError> {
        let row = sqlx::query_as::<_, ProductRecord>(&format!(
            r#"
            INSERT INTO products (product_title, product_description, product_price,
                product_types, product_tags, published, product_size, gold_color,
                enamel_colors, hook_options, product_images, collection_id, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(insert.product_title.trim())
        .bind(insert.product_description)
        .bind(insert.product_price)
        .bind(insert.product_types)
        .bind(insert.product_tags)
        .bind(insert.published)
        .bind(insert.product_size)
        .bind(insert.gold_color)
        .bind(insert.enamel_colors)
        .bind(insert.hook_options)
        .bind(Json(insert.product_images))
        .bind(insert.collection_id)
        .bind(insert.category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

/// Apply a partial update; `None` when the product does not exist.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub id: i32,
    pub changes: ProductBody,
}

impl Processor<UpdateProduct> for DatabaseProcessor {
    type Output = Option<ProductRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateProduct")]
    async fn process(&self, update: UpdateProduct) -> Result<Option<ProductRecord>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let Some(current) = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1 FOR UPDATE"
        ))
        .bind(update.id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        let UpdateProduct { id, changes } = update;
        let images = match changes.product_images {
            Some(images) if !images.is_empty() => Json(images),
            _ => current.product_images,
        };
        let row = sqlx::query_as::<_, ProductRecord>(&format!(
            r#"
            UPDATE products
            SET product_title = $2, product_description = $3, product_price = $4,
                product_types = $5, product_tags = $6, published = $7, product_size = $8,
                gold_color = $9, enamel_colors = $10, hook_options = $11,
                product_images = $12, collection_id = $13, category_id = $14
            WHERE product_id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(merge_text(changes.product_title, current.product_title))
        .bind(merge_optional_text(
            changes.product_description,
            current.product_description,
        ))
        .bind(changes.product_price.unwrap_or(current.product_price))
        .bind(merge_optional_text(changes.product_types, current.product_types))
        .bind(merge_list(changes.product_tags, current.product_tags))
        .bind(changes.published.unwrap_or(current.published))
        .bind(merge_list(changes.product_size, current.product_size))
        .bind(merge_list(changes.gold_color, current.gold_color))
        .bind(merge_list(changes.enamel_colors, current.enamel_colors))
        .bind(merge_list(changes.hook_options, current.hook_options))
        .bind(images)
        .bind(changes.collection_id.or(current.collection_id))
        .bind(changes.category_id.or(current.category_id))
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(row))
    }
}

#[derive(Debug, Clone)]
pub struct DeleteProduct {
    pub id: i32,
}

impl Processor<DeleteProduct> for DatabaseProcessor {
    type Output = bool;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteProduct")]
    async fn process(&self, query: DeleteProduct) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(query.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_carries_joined_names() {
        let row = ProductCardRow {
            product_id: 9,
            product_title: "Aurora Hoops".to_string(),
            product_price: Decimal::new(12500, 2),
            product_types: Some("earrings".to_string()),
            product_images: Json(vec![MediaImage {
                public_id: "aurora/hoops".to_string(),
                url: "https://res.example.com/aurora/hoops.jpg".to_string(),
            }]),
            collection_id: Some(2),
            category_id: None,
            category_name: None,
            collection_name: Some("Aurora".to_string()),
        };
        let card = ProductCard::from(row);
        assert_eq!(card.category, None);
        assert_eq!(card.collection.map(|c| c.name).as_deref(), Some("Aurora"));
        assert_eq!(card.product_images.len(), 1);
    }
}
