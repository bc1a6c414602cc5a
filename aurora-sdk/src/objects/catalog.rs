//! Catalog bodies: main collections, collections, categories and products.
//!
//! Field names follow the storefront frontend, which uses the column names
//! for products (`product_title`, `product_price`, ...) and camelCase only
//! for the foreign keys.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{Validate, ValidationError, check_length};

/// An image hosted on the media host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaImage {
    pub public_id: String,
    pub url: String,
}

/// A bare name, used for filter lists on catalog pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainCollectionResponse {
    pub id: i32,
    pub name: String,
    pub status: Option<String>,
    pub description: Option<String>,
    pub image: Option<MediaImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub image: Option<MediaImage>,
    #[serde(rename = "mainCollectionId")]
    pub main_collection_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub image: Option<MediaImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
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
    pub product_images: Vec<MediaImage>,
    #[serde(rename = "collectionId")]
    pub collection_id: Option<i32>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<i32>,
    pub created_at: i64,
}

/// The subset of a product shown on listing pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCard {
    pub product_id: i32,
    pub product_title: String,
    pub product_price: Decimal,
    pub product_types: Option<String>,
    pub product_images: Vec<MediaImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<NamedRef>,
}

// ---------------------------------------------------------------------------
// Storefront pages
// ---------------------------------------------------------------------------

/// `GET /products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListing {
    pub products: Vec<ProductCard>,
    pub categories: Vec<NamedRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWithProducts {
    pub name: String,
    pub products: Vec<ProductCard>,
}

/// `GET /products/category/{category_type}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPage {
    pub category: CategoryWithProducts,
    pub collection: Vec<NamedRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionTile {
    pub id: i32,
    pub name: String,
    pub image: Option<MediaImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainCollectionWithCollections {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub collections: Vec<CollectionTile>,
}

/// `GET /collections/main/{main_jewelry_title}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainCollectionPage {
    pub main_jewelry: MainCollectionWithCollections,
    pub category: Vec<CategoryResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionWithProducts {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub image: Option<MediaImage>,
    pub products: Vec<ProductCard>,
}

/// `GET /collections/{collection_name}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionPage {
    pub collection: CollectionWithProducts,
    pub categories: Vec<NamedRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionOption {
    pub id: i32,
    pub name: String,
}

/// `GET /admin/collections/select/{id}`: dropdown options plus the
/// collection the product currently belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelect {
    pub collections: Vec<CollectionOption>,
    pub collection_id: Option<i32>,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Minimum query length before a product search touches the database.
pub const MIN_SEARCH_LEN: usize = 4;

/// Body of `POST /products/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query_string: Option<String>,
}

impl SearchRequest {
    /// The lowercased, trimmed query, or `None` when it is too short to
    /// search for.
    pub fn normalized(&self) -> Option<String> {
        let query = self.query_string.as_deref()?.trim().to_lowercase();
        (query.chars().count() >= MIN_SEARCH_LEN).then_some(query)
    }
}

/// Body of `POST /collections/browse`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseRequest {
    #[serde(default)]
    pub main_collection_name: Option<String>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl BrowseRequest {
    /// The main-collection filter. `all`, blank and names of three
    /// characters or fewer mean "no filter".
    pub fn main_collection_filter(&self) -> Option<&str> {
        let name = self.main_collection_name.as_deref()?.trim();
        (name.chars().count() > 3 && !name.eq_ignore_ascii_case("all")).then_some(name)
    }
}

fn check_optional(
    field: &'static str,
    value: &Option<String>,
    min: usize,
) -> Result<(), ValidationError> {
    match value.as_deref() {
        Some(value) if !value.trim().is_empty() => check_length(field, value, min, None),
        _ => Ok(()),
    }
}

fn require<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ValidationError::new(field, "is required")),
    }
}

/// Create / update body of a main collection. Absent fields keep their stored
/// value on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainCollectionBody {
    pub name: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub image: Option<MediaImage>,
}

impl MainCollectionBody {
    pub fn require_name(&self) -> Result<&str, ValidationError> {
        require("name", &self.name)
    }
}

impl Validate for MainCollectionBody {
    fn validate(&self) -> Result<(), ValidationError> {
        check_optional("name", &self.name, 2)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub image: Option<MediaImage>,
    #[serde(default, rename = "mainCollectionId")]
    pub main_collection_id: Option<i32>,
}

impl CollectionBody {
    pub fn require_name(&self) -> Result<&str, ValidationError> {
        require("name", &self.name)
    }
}

impl Validate for CollectionBody {
    fn validate(&self) -> Result<(), ValidationError> {
        check_optional("name", &self.name, 2)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBody {
    pub name: Option<String>,
    pub image: Option<MediaImage>,
}

impl CategoryBody {
    pub fn require_name(&self) -> Result<&str, ValidationError> {
        require("name", &self.name)
    }
}

impl Validate for CategoryBody {
    fn validate(&self) -> Result<(), ValidationError> {
        check_optional("name", &self.name, 2)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductBody {
    pub product_title: Option<String>,
    pub product_description: Option<String>,
    pub product_price: Option<Decimal>,
    pub product_types: Option<String>,
    pub product_tags: Option<Vec<String>>,
    pub published: Option<bool>,
    pub product_size: Option<Vec<String>>,
    pub gold_color: Option<Vec<String>>,
    pub enamel_colors: Option<Vec<String>>,
    pub hook_options: Option<Vec<String>>,
    pub product_images: Option<Vec<MediaImage>>,
    #[serde(default, rename = "collectionId")]
    pub collection_id: Option<i32>,
    #[serde(default, rename = "categoryId")]
    pub category_id: Option<i32>,
}

impl ProductBody {
    pub fn require_title(&self) -> Result<&str, ValidationError> {
        require("product_title", &self.product_title)
    }

    pub fn require_price(&self) -> Result<Decimal, ValidationError> {
        self.product_price
            .ok_or_else(|| ValidationError::new("product_price", "is required"))
    }
}

impl Validate for ProductBody {
    fn validate(&self) -> Result<(), ValidationError> {
        check_optional("product_title", &self.product_title, 2)?;
        match self.product_price {
            Some(price) if price < Decimal::ZERO => Err(ValidationError::new(
                "product_price",
                "must not be negative",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_normalization() {
        let short = SearchRequest {
            query_string: Some(" Rin ".to_string()),
        };
        assert_eq!(short.normalized(), None);

        let ok = SearchRequest {
            query_string: Some("  Rings ".to_string()),
        };
        assert_eq!(ok.normalized().as_deref(), Some("rings"));

        assert_eq!(SearchRequest::default().normalized(), None);
    }

    #[test]
    fn test_browse_filter() {
        let browse: BrowseRequest =
            serde_json::from_value(json!({"mainCollectionName": "Fine Jewelry", "type": "ring"}))
                .unwrap();
        assert_eq!(browse.main_collection_filter(), Some("Fine Jewelry"));
        assert_eq!(browse.kind.as_deref(), Some("ring"));

        let all = BrowseRequest {
            main_collection_name: Some("all".to_string()),
            ..BrowseRequest::default()
        };
        assert_eq!(all.main_collection_filter(), None);

        let short = BrowseRequest {
            main_collection_name: Some("Fin".to_string()),
            ..BrowseRequest::default()
        };
        assert_eq!(short.main_collection_filter(), None);
    }

    #[test]
    fn test_product_body_wire_format() {
        let body: ProductBody = serde_json::from_value(json!({
            "product_title": "Aurora Ring",
            "product_price": "250.50",
            "gold_color": ["yellow", "rose"],
            "collectionId": 3
        }))
        .unwrap();
        assert_eq!(body.require_title().unwrap(), "Aurora Ring");
        assert_eq!(body.require_price().unwrap(), Decimal::new(25050, 2));
        assert_eq!(body.collection_id, Some(3));
        assert!(body.validate().is_ok());

        let negative = ProductBody {
            product_price: Some(Decimal::from(-1)),
            ..body
        };
        assert_eq!(negative.validate().unwrap_err().field, "product_price");
    }

    #[test]
    fn test_create_requires_name() {
        let body = CategoryBody::default();
        assert_eq!(body.require_name().unwrap_err().field, "name");

        let body = CategoryBody {
            name: Some("  Rings ".to_string()),
            image: None,
        };
        assert_eq!(body.require_name().unwrap(), "Rings");
    }
}
