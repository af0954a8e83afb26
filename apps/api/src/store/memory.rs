//! In-memory `CvStore` for tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::store::CvStore;

#[derive(Debug, Clone)]
struct Row {
    parsed_data: String,
    is_valid_cv: bool,
    is_standard_cv_generated: bool,
}

#[derive(Debug, Default)]
pub struct MemoryCvStore {
    rows: Mutex<BTreeMap<i32, Row>>,
    calls: AtomicUsize,
}

impl MemoryCvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a valid, not-yet-generated record.
    pub fn insert(&self, id: i32, parsed_data: &str) {
        self.insert_row(id, parsed_data, true, false);
    }

    pub fn insert_row(&self, id: i32, parsed_data: &str, valid: bool, generated: bool) {
        self.rows.lock().unwrap().insert(
            id,
            Row {
                parsed_data: parsed_data.to_string(),
                is_valid_cv: valid,
                is_standard_cv_generated: generated,
            },
        );
    }

    pub fn is_generated(&self, id: i32) -> bool {
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .map(|row| row.is_standard_cv_generated)
            .unwrap_or(false)
    }

    /// Number of trait calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CvStore for MemoryCvStore {
    async fn fetch_json(&self, id: i32) -> Option<String> {
        self.touch();
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|row| row.is_valid_cv)
            .map(|row| row.parsed_data.clone())
    }

    async fn mark_generated(&self, id: i32) -> bool {
        self.touch();
        match self.rows.lock().unwrap().get_mut(&id) {
            Some(row) if !row.is_standard_cv_generated => {
                row.is_standard_cv_generated = true;
                true
            }
            _ => false,
        }
    }

    async fn list_pending(&self, ids: &[i32]) -> Vec<i32> {
        self.touch();
        let rows = self.rows.lock().unwrap();
        let mut pending: Vec<i32> = ids
            .iter()
            .copied()
            .filter(|id| {
                rows.get(id)
                    .is_some_and(|row| row.is_valid_cv && !row.is_standard_cv_generated)
            })
            .collect();
        pending.sort_unstable();
        pending.dedup();
        pending
    }

    async fn list_pending_ordered(&self, limit: i64) -> Vec<i32> {
        self.touch();
        let take = usize::try_from(limit).unwrap_or(0);
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, row)| row.is_valid_cv && !row.is_standard_cv_generated)
            .map(|(id, _)| *id)
            .take(take)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mark_generated_is_idempotent() {
        let store = MemoryCvStore::new();
        store.insert(1, "{}");
        assert!(store.mark_generated(1).await);
        assert!(!store.mark_generated(1).await);
        assert!(store.is_generated(1));
        assert!(!store.mark_generated(42).await);
    }

    #[tokio::test]
    async fn test_quantity_selection_is_ascending_and_bounded() {
        let store = MemoryCvStore::new();
        for id in [5, 2, 9, 1] {
            store.insert(id, "{}");
        }
        assert_eq!(store.list_pending_ordered(2).await, vec![1, 2]);
        assert_eq!(store.list_pending_ordered(10).await, vec![1, 2, 5, 9]);
        assert!(store.list_pending_ordered(0).await.is_empty());
    }

    #[tokio::test]
    async fn test_pending_excludes_generated_and_invalid() {
        let store = MemoryCvStore::new();
        store.insert(1, "{}");
        store.insert_row(2, "{}", true, true);
        store.insert_row(3, "{}", false, false);
        assert_eq!(store.list_pending(&[3, 2, 1, 4]).await, vec![1]);
        assert_eq!(store.list_pending_ordered(10).await, vec![1]);
    }

    #[tokio::test]
    async fn test_fetch_ignores_invalid_but_not_generated() {
        let store = MemoryCvStore::new();
        store.insert_row(1, r#"{"Name":"A"}"#, true, true);
        store.insert_row(2, "{}", false, false);
        assert_eq!(store.fetch_json(1).await.as_deref(), Some(r#"{"Name":"A"}"#));
        assert!(store.fetch_json(2).await.is_none());
        assert_eq!(store.calls(), 2);
    }
}
