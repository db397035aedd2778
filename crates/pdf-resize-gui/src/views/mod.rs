mod adjusters;
mod dialogs;
mod document;
mod export;
mod presets;
pub mod state;

pub use adjusters::{show_adjusters, show_trim};
pub use dialogs::show_save_dialogs;
pub use document::show_document;
pub use export::{show_destination, show_filename, show_save};
pub use presets::show_presets_window;
pub use state::ViewState;

use pdf_async_runtime::{PdfCommand, ResizeOptions};
use tokio::sync::mpsc;

pub fn open_pdf_dialog(command_tx: &mpsc::UnboundedSender<PdfCommand>) {
    if let Some(path) = rfd::FileDialog::new()
        .add_filter("PDF", &["pdf"])
        .pick_file()
    {
        let _ = command_tx.send(PdfCommand::Load { path });
    }
}

pub fn load_configuration_dialog(command_tx: &mpsc::UnboundedSender<PdfCommand>) {
    if let Some(path) = rfd::FileDialog::new()
        .add_filter("JSON", &["json"])
        .pick_file()
    {
        let _ = command_tx.send(PdfCommand::LoadConfig { path });
    }
}

pub fn save_configuration_dialog(
    options: ResizeOptions,
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
) {
    if let Some(path) = rfd::FileDialog::new()
        .add_filter("JSON", &["json"])
        .set_file_name("resize_config.json")
        .save_file()
    {
        let _ = command_tx.send(PdfCommand::SaveConfig { path, options });
    }
}
