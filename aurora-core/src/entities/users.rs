use aurora_sdk::objects::user::{AddressBook, UserProfile};
use kanau::processor::Processor;
use sqlx::types::Json;

use crate::entities::{UserRole, unix_timestamp};
use crate::error::StoreError;
use crate::framework::DatabaseProcessor;

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, password, addresses, role, created_at";

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    /// Argon2 PHC string. `None` for accounts created by the external
    /// identity provider.
    pub password: Option<String>,
    pub addresses: Json<AddressBook>,
    pub role: UserRole,
    pub created_at: time::PrimitiveDateTime,
}

impl UserRecord {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            addresses: self.addresses.0.clone(),
            role: self.role.into(),
            created_at: unix_timestamp(self.created_at),
        }
    }
}

/// A customer row of the admin table, with the number of orders placed.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserListRow {
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub addresses: Json<AddressBook>,
    pub order_count: i64,
}

#[derive(Debug, Clone)]
pub struct GetUserById {
    pub id: i32,
}

impl Processor<GetUserById> for DatabaseProcessor {
    type Output = Option<UserRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:GetUserById")]
    async fn process(&self, query: GetUserById) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

/// E-mail addresses are compared case-insensitively.
#[derive(Debug, Clone)]
pub struct GetUserByEmail {
    pub email: String,
}

impl Processor<GetUserByEmail> for DatabaseProcessor {
    type Output = Option<UserRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:GetUserByEmail")]
    async fn process(&self, query: GetUserByEmail) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(query.email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

/// Register a customer with a password. An existing e-mail yields
/// [`StoreError::Conflict`].
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

impl Processor<CreateUser> for DatabaseProcessor {
    type Output = UserRecord;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateUser")]
    async fn process(&self, insert: CreateUser) -> Result<UserRecord, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, email, password, addresses, role)
            VALUES ($1, $2, $3, $4, $5, 'customer')
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(insert.first_name.trim())
        .bind(insert.last_name.trim())
        .bind(insert.email.trim().to_lowercase())
        .bind(insert.password_hash)
        .bind(Json(AddressBook::default()))
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}

/// Create a password-less customer account for an e-mail verified by the
/// identity provider. `None` when the e-mail is already registered; the
/// existing account is never touched.
#[derive(Debug, Clone)]
pub struct CreateExternalUser {
    pub email: String,
}

impl Processor<CreateExternalUser> for DatabaseProcessor {
    type Output = Option<UserRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateExternalUser")]
    async fn process(&self, insert: CreateExternalUser) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (email, addresses, role)
            VALUES ($1, $2, 'customer')
            ON CONFLICT (email) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(insert.email.trim().to_lowercase())
        .bind(Json(AddressBook::default()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateUserAddresses {
    pub id: i32,
    pub addresses: AddressBook,
}

impl Processor<UpdateUserAddresses> for DatabaseProcessor {
    type Output = Option<UserRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateUserAddresses")]
    async fn process(&self, update: UpdateUserAddresses) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET addresses = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(update.id)
        .bind(Json(update.addresses))
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[derive(Debug, Clone)]
pub struct ListUsers {
    pub limit: i64,
    pub offset: i64,
}

impl Processor<ListUsers> for DatabaseProcessor {
    type Output = Vec<UserListRow>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:ListUsers")]
    async fn process(&self, query: ListUsers) -> Result<Vec<UserListRow>, StoreError> {
        let users = sqlx::query_as::<_, UserListRow>(
            r#"
            SELECT u.id, u.first_name, u.last_name, u.email, u.addresses,
                   COUNT(o.order_number) AS order_count
            FROM users u
            LEFT JOIN orders o ON o.user_id = u.id
            GROUP BY u.id
            ORDER BY u.id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}

/// Delete an account. Its orders are kept and lose their owner.
#[derive(Debug, Clone)]
pub struct DeleteUser {
    pub id: i32,
}

impl Processor<DeleteUser> for DatabaseProcessor {
    type Output = bool;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteUser")]
    async fn process(&self, query: DeleteUser) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(query.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Create the bootstrap administrator, or promote and re-key an existing
/// account with the same e-mail.
#[derive(Debug, Clone)]
pub struct UpsertAdminUser {
    pub email: String,
    pub password_hash: String,
}

impl Processor<UpsertAdminUser> for DatabaseProcessor {
    type Output = UserRecord;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:UpsertAdminUser")]
    async fn process(&self, upsert: UpsertAdminUser) -> Result<UserRecord, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, email, password, addresses, role)
            VALUES ('Store', 'Admin', $1, $2, $3, 'admin')
            ON CONFLICT (email) DO UPDATE
                SET password = EXCLUDED.password, role = 'admin'
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(upsert.email.trim().to_lowercase())
        .bind(upsert.password_hash)
        .bind(Json(AddressBook::default()))
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_sdk::objects::Role;

    #[test]
    fn test_profile_drops_password() {
        let user = UserRecord {
            id: 4,
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            email: "jane@example.com".to_string(),
            password: Some("$argon2id$v=19$...".to_string()),
            addresses: Json(AddressBook::default()),
            role: UserRole::Admin,
            created_at: time::macros::datetime!(2024-01-01 00:00:00),
        };
        let profile = user.profile();
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.created_at, 1_704_067_200);
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password").is_none());
    }
}
