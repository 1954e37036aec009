//! PDF export of an answer.
//!
//! Layout happens in [`build_export`], which produces a backend-independent
//! [`Document`]; [`render_pdf`] turns that into PDF bytes.
//!
//! [`Document`]: crate::render::Document
mod document;
mod pdf;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::AnswerRecord;
use crate::render::PageGeometry;

pub use document::{
    APPENDIX_HEADING, ENTRY_FONT_SIZE, HEADING_FONT_SIZE, TITLE_GAP, TITLE_LINE_ADVANCE,
    build_export, build_export_with,
};
pub use pdf::{render_pdf, win_ansi};

/// Default file name of an exported answer.
pub const EXPORT_FILE_NAME: &str = "Dietnerd.pdf";

/// Errors that can occur while exporting an answer.
#[derive(Debug, Error)]
pub enum ExportError {
    /// PDF serialization failed
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Serializing the PDF into memory failed
    #[error("Failed to serialize PDF: {0}")]
    Serialize(#[from] std::io::Error),

    /// Writing the output file failed
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lays out, renders and writes `record` as a PDF at `path`.
///
/// Returns the number of pages written.
pub fn save_pdf(path: &Path, record: &AnswerRecord) -> Result<usize, ExportError> {
    let geometry = PageGeometry::a4();
    let document = build_export(
        &record.question,
        &record.output,
        &record.metadata,
        geometry,
    );
    let bytes = render_pdf(&document, &geometry)?;
    std::fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), pages = document.page_count(), "exported answer");
    Ok(document.page_count())
}
