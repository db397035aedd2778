use pdf_async_runtime::{PdfCommand, PdfUpdate};
use tokio::sync::mpsc;

use crate::handlers::{self, document::DocStore};

/// Async worker task that processes PDF commands and sends updates.
///
/// Commands run one at a time, so two saves never overlap.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<PdfCommand>,
    update_tx: mpsc::UnboundedSender<PdfUpdate>,
) {
    let mut store = DocStore::new();

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut store, &update_tx).await;
    }
    log::debug!("Worker stopped");
}

async fn process_command(
    cmd: PdfCommand,
    store: &mut DocStore,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    match cmd {
        PdfCommand::Load { path } => {
            handlers::document::handle_load(path, store, update_tx).await;
        }
        PdfCommand::Save {
            doc_id,
            generation,
            request,
            target,
        } => {
            handlers::document::handle_save(doc_id, generation, request, target, store, update_tx)
                .await;
        }
        PdfCommand::WriteSelected {
            doc_id,
            generation,
            request,
            indices,
            target,
        } => {
            handlers::document::handle_write_selected(
                doc_id, generation, request, indices, target, store, update_tx,
            )
            .await;
        }
        PdfCommand::Close { doc_id } => {
            handlers::document::handle_close(doc_id, store, update_tx);
        }
        PdfCommand::LoadConfig { path } => {
            handlers::config::handle_load_config(path, update_tx).await;
        }
        PdfCommand::SaveConfig { path, options } => {
            handlers::config::handle_save_config(path, options, update_tx).await;
        }
        PdfCommand::LoadPresets { path } => {
            handlers::config::handle_load_presets(path, update_tx).await;
        }
        PdfCommand::SavePresets { path, presets } => {
            handlers::config::handle_save_presets(path, presets, update_tx).await;
        }
    }
}
