//! Persistence error taxonomy.
//!
//! Processors return [`StoreError`] instead of raw `sqlx::Error` so that the
//! HTTP layer can map failures to status codes without inspecting driver
//! messages.

/// Kind of a failed persistence operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("record not found")]
    NotFound,
    /// A unique or foreign-key constraint rejected the write.
    #[error("constraint violation{}", .constraint.as_deref().map(|c| format!(" on {c}")).unwrap_or_default())]
    Conflict { constraint: Option<String> },
    /// The database could not be reached; the request may succeed later.
    #[error("database unavailable: {0}")]
    Transient(#[source] sqlx::Error),
    #[error("unexpected database error: {0}")]
    Unexpected(#[source] sqlx::Error),
}

impl StoreError {
    pub fn conflict(constraint: impl Into<String>) -> Self {
        Self::Conflict {
            constraint: Some(constraint.into()),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db)
                if db.is_unique_violation() || db.is_foreign_key_violation() =>
            {
                StoreError::Conflict {
                    constraint: db.constraint().map(str::to_owned),
                }
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_) => StoreError::Transient(err),
            _ => StoreError::Unexpected(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;

    #[derive(Debug)]
    struct FakeDbError {
        kind: ErrorKind,
    }

    impl std::fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "fake database error")
        }
    }

    impl std::error::Error for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "fake database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            None
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            Some("orders_payment_intent_key")
        }

        fn kind(&self) -> ErrorKind {
            match &self.kind {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
                ErrorKind::CheckViolation => ErrorKind::CheckViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn db_error(kind: ErrorKind) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError { kind }))
    }

    #[test]
    fn test_row_not_found_is_not_found() {
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::NotFound
        ));
    }

    #[test]
    fn test_constraint_violations_are_conflicts() {
        match StoreError::from(db_error(ErrorKind::UniqueViolation)) {
            StoreError::Conflict { constraint } => {
                assert_eq!(constraint.as_deref(), Some("orders_payment_intent_key"))
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert!(StoreError::from(db_error(ErrorKind::ForeignKeyViolation)).is_conflict());
        assert!(matches!(
            StoreError::from(db_error(ErrorKind::CheckViolation)),
            StoreError::Unexpected(_)
        ));
    }

    #[test]
    fn test_connectivity_errors_are_transient() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Transient(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolClosed),
            StoreError::Transient(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::Protocol("unexpected message".to_string())),
            StoreError::Transient(_)
        ));
    }

    #[test]
    fn test_other_errors_are_unexpected() {
        assert!(matches!(
            StoreError::from(sqlx::Error::ColumnNotFound("price".to_string())),
            StoreError::Unexpected(_)
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StoreError::conflict("users_email_key").to_string(),
            "constraint violation on users_email_key"
        );
        assert_eq!(
            StoreError::Conflict { constraint: None }.to_string(),
            "constraint violation"
        );
    }
}
