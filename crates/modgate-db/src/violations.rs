//! Violation persistence.
//!
//! The gateway consumes persistence only through [`ViolationRepository`];
//! the Postgres implementation lives here so the scoring crates stay free
//! of database concerns and tests can substitute an in-memory store.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use modgate_core::models::{ContentType, Violation};
use modgate_core::AppError;

#[async_trait::async_trait]
pub trait ViolationRepository: Send + Sync {
    /// Append one violation record. Records are never updated or deleted.
    async fn record_violation(&self, violation: &Violation) -> Result<(), AppError>;

    /// Violations for a user recorded at or after `since`, oldest first.
    async fn query_violations(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Violation>, AppError>;
}

#[derive(Clone)]
pub struct PostgresViolationRepository {
    pool: PgPool,
}

impl PostgresViolationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ViolationRepository for PostgresViolationRepository {
    #[tracing::instrument(skip(self, violation), fields(
        db.table = "violations",
        db.operation = "insert",
        user_id = %violation.user_id,
        content_type = %violation.content_type.as_str()
    ))]
    async fn record_violation(&self, violation: &Violation) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO violations (id, user_id, content_type, content_summary, score, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(violation.id)
        .bind(&violation.user_id)
        .bind(violation.content_type.as_str())
        .bind(&violation.content_summary)
        .bind(violation.score)
        .bind(violation.recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(
        db.table = "violations",
        db.operation = "select",
        user_id = %user_id
    ))]
    async fn query_violations(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Violation>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, content_type, content_summary, score, recorded_at
            FROM violations
            WHERE user_id = $1 AND recorded_at >= $2
            ORDER BY recorded_at ASC
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let content_type: String = row.try_get("content_type")?;
                Ok(Violation {
                    id: row.try_get::<Uuid, _>("id")?,
                    user_id: row.try_get("user_id")?,
                    content_type: content_type
                        .parse::<ContentType>()
                        .unwrap_or(ContentType::File),
                    content_summary: row.try_get("content_summary")?,
                    score: row.try_get("score")?,
                    recorded_at: row.try_get("recorded_at")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(AppError::from)
    }
}
