use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use crate::store::CvStore;

#[derive(Debug, Clone)]
pub struct PgCvStore {
    pool: PgPool,
}

impl PgCvStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CvStore for PgCvStore {
    async fn fetch_json(&self, id: i32) -> Option<String> {
        let result: Result<Option<String>, sqlx::Error> = sqlx::query_scalar(
            "SELECT parsed_data FROM parsed_cv_data WHERE id = $1 AND is_valid_cv = TRUE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to fetch parsed CV {id}: {e}");
                None
            }
        }
    }

    async fn mark_generated(&self, id: i32) -> bool {
        let result = sqlx::query(
            r#"
            UPDATE parsed_cv_data
            SET is_standard_cv_generated = TRUE
            WHERE id = $1 AND is_standard_cv_generated = FALSE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => done.rows_affected() > 0,
            Err(e) => {
                error!("Failed to mark CV {id} as generated: {e}");
                false
            }
        }
    }

    async fn list_pending(&self, ids: &[i32]) -> Vec<i32> {
        if ids.is_empty() {
            return Vec::new();
        }

        let result: Result<Vec<i32>, sqlx::Error> = sqlx::query_scalar(
            r#"
            SELECT id FROM parsed_cv_data
            WHERE id = ANY($1)
              AND is_valid_cv = TRUE
              AND is_standard_cv_generated = FALSE
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;

        result.unwrap_or_else(|e| {
            error!("Failed to list pending CVs among {} ids: {e}", ids.len());
            Vec::new()
        })
    }

    async fn list_pending_ordered(&self, limit: i64) -> Vec<i32> {
        let result: Result<Vec<i32>, sqlx::Error> = sqlx::query_scalar(
            r#"
            SELECT id FROM parsed_cv_data
            WHERE is_valid_cv = TRUE AND is_standard_cv_generated = FALSE
            ORDER BY id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await;

        result.unwrap_or_else(|e| {
            error!("Failed to list up to {limit} pending CVs: {e}");
            Vec::new()
        })
    }
}
