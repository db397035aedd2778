//! Document I/O
//!
//! Parsing and serialization run on the blocking pool, file access on `tokio::fs`.

use crate::geometry::PageGeometry;
use crate::render::{media_box, page_rotation};
use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// Load a PDF document from disk
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    load_pdf_bytes(bytes).await
}

/// Parse a PDF document already in memory
pub async fn load_pdf_bytes(bytes: Vec<u8>) -> Result<Document> {
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Serialize a document
pub async fn document_to_bytes(mut doc: Document) -> Result<Vec<u8>> {
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, ResizeError>(writer)
    })
    .await??;
    Ok(bytes)
}

/// Native geometry of one source page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageInfo {
    /// MediaBox in points, unrotated
    pub media_box: Rect,
    /// `/Rotate` in degrees
    pub rotation: i64,
}

impl PageInfo {
    /// Displayed size in millimeters, rotation applied
    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::from_points(self.media_box.width, self.media_box.height, self.rotation)
    }
}

/// What the editing session needs to know about a loaded document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub pages: Vec<PageInfo>,
    /// Size of the source file in bytes, when known
    pub file_size: Option<u64>,
}

impl DocumentInfo {
    pub fn from_document(doc: &Document) -> Result<Self> {
        let pages: Vec<PageInfo> = doc
            .get_pages()
            .values()
            .map(|&id| PageInfo {
                media_box: media_box(doc, id),
                rotation: page_rotation(doc, id),
            })
            .collect();

        if pages.is_empty() {
            return Err(ResizeError::NoPages);
        }

        Ok(Self {
            pages,
            file_size: None,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Result<&PageInfo> {
        self.pages.get(index).ok_or(ResizeError::PageOutOfRange {
            index,
            count: self.pages.len(),
        })
    }
}
