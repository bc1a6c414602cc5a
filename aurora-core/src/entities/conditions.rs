//! The terms-and-conditions document, stored as a single row with id 1.

use aurora_sdk::objects::conditions::{ConditionsBody, ConditionsResponse};
use kanau::processor::Processor;

use crate::error::StoreError;
use crate::framework::DatabaseProcessor;

const CONDITIONS_ID: i32 = 1;

const CONDITIONS_COLUMNS: &str = "shipping, refund_and_exchange, accounts_and_membership, \
    repairs_and_defects, payment, website_usage, shopping_at_aurora, pricing_policy, \
    property_and_risk, safety_of_personal_details, copyright_and_trademarks, content, \
    third_party_links, acceptance_of_terms, backups";

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ConditionsRecord {
    pub shipping: String,
    pub refund_and_exchange: String,
    pub accounts_and_membership: String,
    pub repairs_and_defects: String,
    pub payment: String,
    pub website_usage: String,
    pub shopping_at_aurora: String,
    pub pricing_policy: String,
    pub property_and_risk: String,
    pub safety_of_personal_details: String,
    pub copyright_and_trademarks: String,
    pub content: String,
    pub third_party_links: String,
    pub acceptance_of_terms: String,
    pub backups: String,
}

impl From<ConditionsRecord> for ConditionsResponse {
    fn from(r: ConditionsRecord) -> Self {
        Self {
            shipping: r.shipping,
            refund_and_exchange: r.refund_and_exchange,
            accounts_and_membership: r.accounts_and_membership,
            repairs_and_defects: r.repairs_and_defects,
            payment: r.payment,
            website_usage: r.website_usage,
            shopping_at_aurora: r.shopping_at_aurora,
            pricing_policy: r.pricing_policy,
            property_and_risk: r.property_and_risk,
            safety_of_personal_details: r.safety_of_personal_details,
            copyright_and_trademarks: r.copyright_and_trademarks,
            content: r.content,
            third_party_links: r.third_party_links,
            acceptance_of_terms: r.acceptance_of_terms,
            backups: r.backups,
        }
    }
}

fn bind_sections<'q>(
    query: sqlx::query::QueryAs<'q, sqlx::Postgres, ConditionsRecord, sqlx::postgres::PgArguments>,
    doc: ConditionsResponse,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, ConditionsRecord, sqlx::postgres::PgArguments> {
    query
        .bind(doc.shipping)
        .bind(doc.refund_and_exchange)
        .bind(doc.accounts_and_membership)
        .bind(doc.repairs_and_defects)
        .bind(doc.payment)
        .bind(doc.website_usage)
        .bind(doc.shopping_at_aurora)
        .bind(doc.pricing_policy)
        .bind(doc.property_and_risk)
        .bind(doc.safety_of_personal_details)
        .bind(doc.copyright_and_trademarks)
        .bind(doc.content)
        .bind(doc.third_party_links)
        .bind(doc.acceptance_of_terms)
        .bind(doc.backups)
}

#[derive(Debug, Clone)]
pub struct GetConditions;

impl Processor<GetConditions> for DatabaseProcessor {
    type Output = Option<ConditionsRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:GetConditions")]
    async fn process(&self, _: GetConditions) -> Result<Option<ConditionsRecord>, StoreError> {
        let row = sqlx::query_as::<_, ConditionsRecord>(&format!(
            "SELECT {CONDITIONS_COLUMNS} FROM conditions WHERE id = $1"
        ))
        .bind(CONDITIONS_ID)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

/// Create the document. Missing sections are stored empty; an existing
/// document yields [`StoreError::Conflict`].
#[derive(Debug, Clone)]
pub struct CreateConditions {
    pub body: ConditionsBody,
}

impl Processor<CreateConditions> for DatabaseProcessor {
    type Output = ConditionsRecord;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateConditions")]
    async fn process(&self, insert: CreateConditions) -> Result<ConditionsRecord, StoreError> {
        let doc = insert.body.apply_to(&ConditionsResponse::default());
        let sql = format!(
            r#"
            INSERT INTO conditions (id, {CONDITIONS_COLUMNS})
            VALUES ({CONDITIONS_ID}, $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {CONDITIONS_COLUMNS}
            "#
        );
        let row = bind_sections(sqlx::query_as::<_, ConditionsRecord>(&sql), doc)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }
}

/// Overlay non-blank sections on the stored document; `None` when no
/// document exists.
#[derive(Debug, Clone)]
pub struct UpdateConditions {
    pub changes: ConditionsBody,
}

impl Processor<UpdateConditions> for DatabaseProcessor {
    type Output = Option<ConditionsRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateConditions")]
    async fn process(&self, update: UpdateConditions) -> Result<Option<ConditionsRecord>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let Some(current) = sqlx::query_as::<_, ConditionsRecord>(&format!(
            "SELECT {CONDITIONS_COLUMNS} FROM conditions WHERE id = $1 FOR UPDATE"
        ))
        .bind(CONDITIONS_ID)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        let doc = update.changes.apply_to(&current.into());
        let sql = format!(
            r#"
            UPDATE conditions SET
                shipping = $1, refund_and_exchange = $2, accounts_and_membership = $3,
                repairs_and_defects = $4, payment = $5, website_usage = $6,
                shopping_at_aurora = $7, pricing_policy = $8, property_and_risk = $9,
                safety_of_personal_details = $10, copyright_and_trademarks = $11,
                content = $12, third_party_links = $13, acceptance_of_terms = $14,
                backups = $15
            WHERE id = {CONDITIONS_ID}
            RETURNING {CONDITIONS_COLUMNS}
            "#
        );
        let row = bind_sections(sqlx::query_as::<_, ConditionsRecord>(&sql), doc)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(row))
    }
}

#[derive(Debug, Clone)]
pub struct DeleteConditions;

impl Processor<DeleteConditions> for DatabaseProcessor {
    type Output = bool;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteConditions")]
    async fn process(&self, _: DeleteConditions) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM conditions WHERE id = $1")
            .bind(CONDITIONS_ID)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
