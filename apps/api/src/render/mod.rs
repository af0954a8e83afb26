//! Document renderer: one candidate record in, one two-column PDF out.
//!
//! Pipeline: compose sidebar → compose main flow → paginate & emit.
//! Rendering is synchronous and CPU-bound; async callers wrap it in
//! `tokio::task::spawn_blocking`.

pub mod blocks;
pub mod compose;
pub mod paginate;
pub mod pdf;

use std::sync::Arc;

use thiserror::Error;

use crate::assets::HeaderImage;
use crate::layout::PageGeometry;
use crate::record::CandidateRecord;
use crate::render::compose::{compose_main_flow, compose_sidebar};
use crate::render::paginate::{paginate, MainColumnFrame, SidebarDecoration};
use crate::render::pdf::write_document;

const DEFAULT_FILE_STEM: &str = "CV";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a render needs besides the record. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub geometry: PageGeometry,
    pub header_image: Option<Arc<HeaderImage>>,
}

impl RenderContext {
    pub fn new(geometry: PageGeometry, header_image: Option<HeaderImage>) -> Self {
        Self {
            geometry,
            header_image: header_image.map(Arc::new),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

pub fn render_candidate(
    record: &CandidateRecord,
    ctx: &RenderContext,
) -> Result<RenderedDocument, RenderError> {
    let header = ctx.header_image.as_deref();

    let sidebar = SidebarDecoration::new(compose_sidebar(record), &ctx.geometry);
    let main_flow = compose_main_flow(record, header);
    let frame = MainColumnFrame::new(&ctx.geometry);

    let pages = paginate(&main_flow, &ctx.geometry, &[&sidebar, &frame]);
    let page_count = pages.len();

    let name = record.non_empty("Name");
    let bytes = write_document(pages, &ctx.geometry, header, name.as_deref())?;

    Ok(RenderedDocument {
        file_name: document_file_name(record),
        bytes,
        page_count,
    })
}

/// `{Name}.pdf` with spaces and path-hostile characters replaced by `_`,
/// or `CV.pdf` when the record has no name.
pub fn document_file_name(record: &CandidateRecord) -> String {
    let stem = record
        .non_empty("Name")
        .map(|name| sanitize_file_stem(name.trim()))
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| DEFAULT_FILE_STEM.to_string());
    format!("{stem}.pdf")
}

fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
