use lopdf::Document;
use pdf_async_runtime::{DocumentId, OutputTarget, PdfUpdate};
use pdf_resize::export::{self, OutputPlatform};
use pdf_resize::{DocumentInfo, DownloadFolder, LocalDisk, SaveOutcome, SaveRequest, load_pdf};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Parsed documents kept alive for saving, by ID
pub struct DocStore {
    documents: HashMap<DocumentId, Arc<Document>>,
    next_id: u64,
}

impl DocStore {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn insert(&mut self, doc: Document) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        self.documents.insert(id, Arc::new(doc));
        id
    }

    pub fn get(&self, id: DocumentId) -> Option<Arc<Document>> {
        self.documents.get(&id).cloned()
    }

    pub fn remove(&mut self, id: DocumentId) -> bool {
        self.documents.remove(&id).is_some()
    }
}

pub async fn handle_load(
    path: PathBuf,
    store: &mut DocStore,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let doc = match load_pdf(&path).await {
        Ok(doc) => doc,
        Err(e) => {
            let _ = update_tx.send(PdfUpdate::Error {
                message: format!("Failed to load PDF: {e}"),
            });
            return;
        }
    };

    let mut info = match DocumentInfo::from_document(&doc) {
        Ok(info) => info,
        Err(e) => {
            let _ = update_tx.send(PdfUpdate::Error {
                message: format!("Failed to read {}: {e}", path.display()),
            });
            return;
        }
    };
    info.file_size = tokio::fs::metadata(&path).await.ok().map(|m| m.len());

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let doc_id = store.insert(doc);
    log::info!("Loaded {} ({} pages)", path.display(), info.page_count());

    let _ = update_tx.send(PdfUpdate::Loaded {
        doc_id,
        path,
        file_name,
        info,
    });
}

pub async fn handle_save(
    doc_id: DocumentId,
    generation: u64,
    request: SaveRequest,
    target: OutputTarget,
    store: &DocStore,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let Some(doc) = store.get(doc_id) else {
        send_missing(generation, update_tx);
        return;
    };

    let result = match &target {
        OutputTarget::Disk => export::save(&LocalDisk, doc, &request).await,
        OutputTarget::Downloads(dir) => {
            export::save(&DownloadFolder::new(dir.clone()), doc, &request).await
        }
    };

    let update = match result {
        Ok(SaveOutcome::Saved(paths)) => PdfUpdate::SaveComplete { generation, paths },
        Ok(SaveOutcome::Conflict(conflicts)) => PdfUpdate::SaveConflict {
            generation,
            request,
            conflicts,
        },
        Err(e) => {
            log::error!("Save failed: {e}");
            PdfUpdate::SaveFailed {
                generation,
                message: e.to_string(),
            }
        }
    };
    let _ = update_tx.send(update);
}

pub async fn handle_write_selected(
    doc_id: DocumentId,
    generation: u64,
    request: SaveRequest,
    indices: Vec<usize>,
    target: OutputTarget,
    store: &DocStore,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let Some(doc) = store.get(doc_id) else {
        send_missing(generation, update_tx);
        return;
    };

    let result = match &target {
        OutputTarget::Disk => write_with(&LocalDisk, doc, &request, &indices).await,
        OutputTarget::Downloads(dir) => {
            write_with(&DownloadFolder::new(dir.clone()), doc, &request, &indices).await
        }
    };

    let update = match result {
        Ok(paths) => PdfUpdate::SaveComplete { generation, paths },
        Err(e) => {
            log::error!("Save failed: {e}");
            PdfUpdate::SaveFailed {
                generation,
                message: e.to_string(),
            }
        }
    };
    let _ = update_tx.send(update);
}

async fn write_with<P: OutputPlatform>(
    platform: &P,
    doc: Arc<Document>,
    request: &SaveRequest,
    indices: &[usize],
) -> pdf_resize::Result<Vec<PathBuf>> {
    if indices.is_empty() {
        log::info!("Nothing selected to write");
        return Ok(Vec::new());
    }
    export::write_selected(platform, doc, request, indices).await
}

pub fn handle_close(
    doc_id: DocumentId,
    store: &mut DocStore,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    if store.remove(doc_id) {
        log::debug!("Closed document {:?}", doc_id);
    }
    let _ = update_tx.send(PdfUpdate::Closed { doc_id });
}

fn send_missing(generation: u64, update_tx: &mpsc::UnboundedSender<PdfUpdate>) {
    let _ = update_tx.send(PdfUpdate::SaveFailed {
        generation,
        message: "The document is no longer loaded".to_string(),
    });
}
