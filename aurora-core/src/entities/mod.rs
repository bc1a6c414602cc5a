pub mod categories;
pub mod collections;
pub mod conditions;
pub mod main_collections;
pub mod orders;
pub mod products;
pub mod users;

use aurora_sdk::objects::{FulfillmentStatus as SdkFulfillmentStatus, Role as SdkRole};

/// Role of an account for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `aurora_sdk::objects::Role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "user_role")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

impl From<UserRole> for SdkRole {
    fn from(value: UserRole) -> Self {
        match value {
            UserRole::Customer => SdkRole::Customer,
            UserRole::Admin => SdkRole::Admin,
        }
    }
}

impl From<SdkRole> for UserRole {
    fn from(value: SdkRole) -> Self {
        match value {
            SdkRole::Customer => UserRole::Customer,
            SdkRole::Admin => UserRole::Admin,
        }
    }
}

/// Fulfillment status for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see
/// `aurora_sdk::objects::FulfillmentStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "fulfillment_status")]
pub enum FulfillmentStatus {
    #[default]
    Unfulfilled,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl From<FulfillmentStatus> for SdkFulfillmentStatus {
    fn from(value: FulfillmentStatus) -> Self {
        match value {
            FulfillmentStatus::Unfulfilled => SdkFulfillmentStatus::Unfulfilled,
            FulfillmentStatus::Processing => SdkFulfillmentStatus::Processing,
            FulfillmentStatus::Shipped => SdkFulfillmentStatus::Shipped,
            FulfillmentStatus::Delivered => SdkFulfillmentStatus::Delivered,
            FulfillmentStatus::Cancelled => SdkFulfillmentStatus::Cancelled,
        }
    }
}

impl From<SdkFulfillmentStatus> for FulfillmentStatus {
    fn from(value: SdkFulfillmentStatus) -> Self {
        match value {
            SdkFulfillmentStatus::Unfulfilled => FulfillmentStatus::Unfulfilled,
            SdkFulfillmentStatus::Processing => FulfillmentStatus::Processing,
            SdkFulfillmentStatus::Shipped => FulfillmentStatus::Shipped,
            SdkFulfillmentStatus::Delivered => FulfillmentStatus::Delivered,
            SdkFulfillmentStatus::Cancelled => FulfillmentStatus::Cancelled,
        }
    }
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------
//
// Admin edit forms send the whole entity with untouched fields left empty.
// An absent or blank value keeps what is stored.

pub fn merge_text(new: Option<String>, old: String) -> String {
    match new {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => old,
    }
}

pub fn merge_optional_text(new: Option<String>, old: Option<String>) -> Option<String> {
    match new {
        Some(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => old,
    }
}

pub fn merge_list<T>(new: Option<Vec<T>>, old: Vec<T>) -> Vec<T> {
    match new {
        Some(values) if !values.is_empty() => values,
        _ => old,
    }
}

/// Unix timestamp of a `timestamp without time zone` column, read as UTC.
pub fn unix_timestamp(at: time::PrimitiveDateTime) -> i64 {
    at.assume_utc().unix_timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_text() {
        assert_eq!(merge_text(None, "old".to_string()), "old");
        assert_eq!(merge_text(Some("  ".to_string()), "old".to_string()), "old");
        assert_eq!(merge_text(Some(" new ".to_string()), "old".to_string()), "new");
    }

    #[test]
    fn test_merge_optional_text() {
        assert_eq!(merge_optional_text(None, None), None);
        assert_eq!(
            merge_optional_text(Some(String::new()), Some("old".to_string())),
            Some("old".to_string())
        );
        assert_eq!(
            merge_optional_text(Some("new".to_string()), None),
            Some("new".to_string())
        );
    }

    #[test]
    fn test_merge_list() {
        assert_eq!(merge_list(Some(vec![]), vec![1, 2]), vec![1, 2]);
        assert_eq!(merge_list(Some(vec![3]), vec![1, 2]), vec![3]);
        assert_eq!(merge_list::<i32>(None, vec![]), Vec::<i32>::new());
    }

    #[test]
    fn test_status_conversions() {
        let status: SdkFulfillmentStatus = FulfillmentStatus::Shipped.into();
        assert_eq!(status, SdkFulfillmentStatus::Shipped);
        let role: UserRole = SdkRole::Admin.into();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_unix_timestamp() {
        let at = time::macros::datetime!(2024-01-01 00:00:00);
        assert_eq!(unix_timestamp(at), 1_704_067_200);
    }
}
