//! Zip bundling of rendered files.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("archive io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file on disk and the name it gets inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Returns `name` if unused, otherwise `name` with `_{id}` inserted before
/// the extension, repeated until the result is unused. The returned name is
/// recorded in `used`.
pub fn unique_entry_name(name: &str, id: i32, used: &mut HashSet<String>) -> String {
    let mut candidate = name.to_string();
    while used.contains(&candidate) {
        candidate = match candidate.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{id}.{ext}"),
            _ => format!("{candidate}_{id}"),
        };
    }
    used.insert(candidate.clone());
    candidate
}

/// Writes every entry into a new zip file at `target`. Blocking.
pub fn write_archive(target: &Path, entries: &[ArchiveEntry]) -> Result<(), ArchiveError> {
    let file = File::create(target)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for entry in entries {
        let contents = std::fs::read(&entry.path)?;
        zip.start_file(entry.name.as_str(), options)?;
        zip.write_all(&contents)?;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    Ok(())
}
