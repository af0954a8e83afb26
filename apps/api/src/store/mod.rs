//! Record store: the `parsed_cv_data` table behind a trait.
//!
//! Every operation degrades instead of failing: a connectivity or query error
//! is logged where it happens and reported as "no data" (`None`, `false`,
//! empty list). Callers treat that the same as a missing record.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

pub use postgres::PgCvStore;

#[async_trait]
pub trait CvStore: Send + Sync {
    /// Parsed CV JSON for a record marked valid, regardless of its
    /// generated flag.
    async fn fetch_json(&self, id: i32) -> Option<String>;

    /// Flips the generated flag. Returns `true` only when this call changed
    /// the row; a record that was already generated yields `false`.
    async fn mark_generated(&self, id: i32) -> bool;

    /// The subset of `ids` that are valid and not yet generated, ascending.
    async fn list_pending(&self, ids: &[i32]) -> Vec<i32>;

    /// Up to `limit` valid, not-yet-generated ids in ascending order.
    async fn list_pending_ordered(&self, limit: i64) -> Vec<i32>;
}
