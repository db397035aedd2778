use pdf_async_runtime::{PdfUpdate, PresetList, ResizeOptions};
use std::path::PathBuf;
use tokio::sync::mpsc;

pub async fn handle_load_config(path: PathBuf, update_tx: &mpsc::UnboundedSender<PdfUpdate>) {
    match ResizeOptions::load(&path).await {
        Ok(options) => {
            log::info!("Configuration loaded from {}", path.display());
            let _ = update_tx.send(PdfUpdate::ConfigLoaded { options });
        }
        Err(e) => {
            let _ = update_tx.send(PdfUpdate::Error {
                message: format!("Failed to load configuration: {e}"),
            });
        }
    }
}

pub async fn handle_save_config(
    path: PathBuf,
    options: ResizeOptions,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    match options.save(&path).await {
        Ok(()) => {
            log::info!("Configuration saved to {}", path.display());
            let _ = update_tx.send(PdfUpdate::ConfigSaved { path });
        }
        Err(e) => {
            let _ = update_tx.send(PdfUpdate::Error {
                message: format!("Failed to save configuration: {e}"),
            });
        }
    }
}

pub async fn handle_load_presets(path: PathBuf, update_tx: &mpsc::UnboundedSender<PdfUpdate>) {
    match PresetList::load(&path).await {
        Ok(presets) => {
            log::info!("{} presets loaded from {}", presets.len(), path.display());
            let _ = update_tx.send(PdfUpdate::PresetsLoaded { presets });
        }
        Err(e) => {
            let _ = update_tx.send(PdfUpdate::Error {
                message: format!("Failed to load presets: {e}"),
            });
        }
    }
}

pub async fn handle_save_presets(
    path: PathBuf,
    presets: PresetList,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    match presets.save(&path).await {
        Ok(()) => {
            log::info!("Presets saved to {}", path.display());
            let _ = update_tx.send(PdfUpdate::PresetsSaved { path });
        }
        Err(e) => {
            let _ = update_tx.send(PdfUpdate::Error {
                message: format!("Failed to save presets: {e}"),
            });
        }
    }
}
