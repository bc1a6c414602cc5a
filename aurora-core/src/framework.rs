use sqlx::PgPool;

/// Runs persistence queries against the shared pool. Every entity query is a
/// `kanau` processor implemented on this type.
#[derive(Debug, Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}

impl DatabaseProcessor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
