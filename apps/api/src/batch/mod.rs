//! Batch orchestration: pick records, render them, flag them, bundle them.
//!
//! Three modes share one per-record unit (fetch → parse → render → mark):
//!   - single id: render one record, no flag change, no archive
//!   - explicit ids: render the pending subset, flag and zip
//!   - quantity: render the first N pending records by id, flag and zip
//!
//! A unit failure in a bulk mode is logged and the id is left out of the
//! archive. Rendered files and the archive live in a per-request scratch
//! directory that is removed when the request finishes, whichever way.

pub mod archive;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tokio::task::{spawn_blocking, JoinError};
use tracing::{error, info, warn};

use crate::batch::archive::{unique_entry_name, write_archive, ArchiveEntry, ArchiveError};
use crate::record::{CandidateRecord, RecordError};
use crate::render::{render_candidate, RenderContext, RenderError, RenderedDocument};
use crate::store::CvStore;

pub const BY_IDS_ARCHIVE: &str = "bulk_pdfs_by_ids.zip";
pub const BY_QUANTITY_ARCHIVE: &str = "bulk_pdfs_by_quantity.zip";

const SCRATCH_PREFIX: &str = "cv-batch-";

#[derive(Debug, Error)]
pub enum BatchError {
    /// No eligible record, or nothing left after per-record failures.
    #[error("{0}")]
    NothingToDo(String),

    #[error("quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),

    #[error("CV {id} has malformed data: {source}")]
    Malformed { id: i32, source: RecordError },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("render task failed: {0}")]
    Task(#[from] JoinError),
}

/// A zip archive held in memory, ready to send.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Ids included in the archive, ascending.
    pub ids: Vec<i32>,
}

#[derive(Debug)]
struct RenderedFile {
    id: i32,
    file_name: String,
    path: PathBuf,
}

pub struct BatchOrchestrator {
    store: Arc<dyn CvStore>,
    render: RenderContext,
    max_concurrency: usize,
    scratch_root: PathBuf,
}

impl BatchOrchestrator {
    pub fn new(
        store: Arc<dyn CvStore>,
        render: RenderContext,
        max_concurrency: usize,
        scratch_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            render,
            max_concurrency: max_concurrency.max(1),
            scratch_root: scratch_root.into(),
        }
    }

    /// Renders one valid record. The generated flag is left untouched.
    pub async fn render_single(&self, id: i32) -> Result<RenderedDocument, BatchError> {
        let record = self.load(id).await?;
        let ctx = self.render.clone();
        let document = spawn_blocking(move || render_candidate(&record, &ctx)).await??;
        info!(
            "Rendered CV {id} as {} ({} pages)",
            document.file_name, document.page_count
        );
        Ok(document)
    }

    /// Renders and flags the pending subset of `ids`.
    pub async fn render_by_ids(&self, ids: Vec<i32>) -> Result<Bundle, BatchError> {
        let selected = self.store.list_pending(&ids).await;
        info!(
            "Bulk by ids: {} requested, {} pending",
            ids.len(),
            selected.len()
        );
        if selected.is_empty() {
            return Err(BatchError::NothingToDo(
                "No pending CVs found for the given ids".to_string(),
            ));
        }
        self.bundle(selected, BY_IDS_ARCHIVE).await
    }

    /// Renders and flags up to `quantity` pending records, lowest ids first.
    /// A non-positive quantity is rejected before the store is consulted.
    pub async fn render_by_quantity(&self, quantity: i64) -> Result<Bundle, BatchError> {
        if quantity <= 0 {
            return Err(BatchError::InvalidQuantity(quantity));
        }
        let selected = self.store.list_pending_ordered(quantity).await;
        info!(
            "Bulk by quantity: {quantity} requested, {} pending",
            selected.len()
        );
        if selected.is_empty() {
            return Err(BatchError::NothingToDo("No pending CVs found".to_string()));
        }
        self.bundle(selected, BY_QUANTITY_ARCHIVE).await
    }

    async fn load(&self, id: i32) -> Result<CandidateRecord, BatchError> {
        let json = self
            .store
            .fetch_json(id)
            .await
            .ok_or_else(|| BatchError::NothingToDo(format!("No CV found for id {id}")))?;
        CandidateRecord::parse(&json).map_err(|source| BatchError::Malformed { id, source })
    }

    async fn bundle(&self, ids: Vec<i32>, archive_name: &str) -> Result<Bundle, BatchError> {
        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(&self.scratch_root)
            .map_err(ArchiveError::from)?;
        let dir = scratch.path();

        let mut rendered: Vec<RenderedFile> = stream::iter(ids)
            .map(|id| async move { (id, self.render_unit(id, dir).await) })
            .buffer_unordered(self.max_concurrency)
            .filter_map(|(id, outcome)| async move {
                match outcome {
                    Ok(file) => Some(file),
                    Err(BatchError::NothingToDo(msg)) => {
                        warn!("Skipping CV {id}: {msg}");
                        None
                    }
                    Err(e) => {
                        error!("Failed to render CV {id}: {e}");
                        None
                    }
                }
            })
            .collect()
            .await;

        if rendered.is_empty() {
            return Err(BatchError::NothingToDo(
                "None of the selected CVs could be rendered".to_string(),
            ));
        }

        rendered.sort_by_key(|file| file.id);
        let mut used = HashSet::new();
        let entries: Vec<ArchiveEntry> = rendered
            .iter()
            .map(|file| ArchiveEntry {
                name: unique_entry_name(&file.file_name, file.id, &mut used),
                path: file.path.clone(),
            })
            .collect();
        let included: Vec<i32> = rendered.iter().map(|file| file.id).collect();

        let zip_path = dir.join(archive_name);
        let bytes = spawn_blocking(move || -> Result<Vec<u8>, ArchiveError> {
            write_archive(&zip_path, &entries)?;
            Ok(std::fs::read(&zip_path)?)
        })
        .await??;

        info!(
            "Bundled {} CVs into {archive_name} ({} bytes)",
            included.len(),
            bytes.len()
        );

        Ok(Bundle {
            file_name: archive_name.to_string(),
            bytes,
            ids: included,
        })
    }

    /// fetch → parse → render to `{dir}/{id}.pdf` → mark generated.
    async fn render_unit(&self, id: i32, dir: &Path) -> Result<RenderedFile, BatchError> {
        let record = self.load(id).await?;
        let ctx = self.render.clone();
        let path = dir.join(format!("{id}.pdf"));
        let target = path.clone();

        let file_name = spawn_blocking(move || -> Result<String, RenderError> {
            let document = render_candidate(&record, &ctx)?;
            std::fs::write(&target, &document.bytes)?;
            Ok(document.file_name)
        })
        .await??;

        if self.store.mark_generated(id).await {
            info!("Rendered CV {id} as {file_name}");
        } else {
            warn!("Rendered CV {id} but its generated flag was not changed");
        }

        Ok(RenderedFile {
            id,
            file_name,
            path,
        })
    }
}
