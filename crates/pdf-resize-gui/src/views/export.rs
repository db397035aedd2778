use eframe::egui;
use pdf_async_runtime::{DocumentId, PdfCommand};
use pdf_resize::constants::PDF_EXTENSION;
use pdf_resize::tokens::expand_filename;
use pdf_resize::{FilenameToken, ResizeSession, SaveStatus};
use tokio::sync::mpsc;

use super::state::ViewState;

const FILENAME_ID: &str = "output_file_name";

pub fn show_filename(ui: &mut egui::Ui, session: &mut ResizeSession, state: &mut ViewState) {
    ui.heading("File name");

    let id = egui::Id::new(FILENAME_ID);
    let mut value = session.filename().value().to_string();
    let output = egui::TextEdit::singleline(&mut value)
        .id(id)
        .hint_text("Source file name")
        .desired_width(f32::INFINITY)
        .show(ui);
    if output.response.changed() {
        session.filename_mut().set_value(value.clone());
    }
    if let Some(range) = output.cursor_range {
        let (a, b) = (range.primary.index, range.secondary.index);
        state.filename_selection = Some(byte_offset(&value, a.min(b))..byte_offset(&value, a.max(b)));
    }

    ui.horizontal_wrapped(|ui| {
        ui.label("Insert:");
        for token in FilenameToken::ALL {
            if ui.small_button(token.text()).clicked() {
                let len = session.filename().value().len();
                let selection = state.filename_selection.clone().unwrap_or(len..len);
                let caret = session.filename_mut().insert(selection, token);
                state.filename_selection = Some(caret..caret);
                place_caret(ui.ctx(), id, session.filename().value(), caret);
            }
        }
    });

    ui.horizontal_wrapped(|ui| {
        let editor = session.filename();
        let (can_size, can_date, modified) = (
            editor.can_replace_size(),
            editor.can_replace_date(),
            editor.is_modified(),
        );

        if ui
            .add_enabled(can_size, egui::Button::new("Replace size").small())
            .on_hover_text("Replace a size like 210x297 or A4 with *size*")
            .clicked()
        {
            session.filename_mut().replace_size();
        }
        for token in [FilenameToken::Yymmdd, FilenameToken::Ddmmyy] {
            if ui
                .add_enabled(
                    can_date,
                    egui::Button::new(format!("Date → {}", token.text())).small(),
                )
                .clicked()
            {
                session.filename_mut().replace_date(token);
            }
        }
        if ui
            .add_enabled(modified, egui::Button::new("↺ Restore").small())
            .on_hover_text(session.filename().original().to_string())
            .clicked()
        {
            session.filename_mut().restore();
            state.filename_selection = None;
        }
    });

    if let Some(adj) = session.adjusters().first() {
        let today = chrono::Local::now().date_naive();
        let name = expand_filename(session.filename().value(), adj.width(), adj.height(), today);
        ui.small(format!("→ {name}.{PDF_EXTENSION}"));
    }
}

pub fn show_destination(ui: &mut egui::Ui, session: &mut ResizeSession, state: &mut ViewState) {
    ui.heading("Destination");

    ui.horizontal(|ui| {
        match session.export_folder() {
            Some(folder) => ui.label(folder.display().to_string()),
            None => ui.weak("No folder selected"),
        };
        if ui.button("📁 Choose…").clicked() {
            let mut dialog = rfd::FileDialog::new();
            if let Some(folder) = session.export_folder() {
                dialog = dialog.set_directory(folder);
            }
            if let Some(folder) = dialog.pick_folder() {
                session.set_export_folder(Some(folder));
            }
        }
    });

    ui.horizontal(|ui| {
        let mut enabled = session.use_subfolder();
        if ui.checkbox(&mut enabled, "Subfolder").changed() {
            session.set_use_subfolder(enabled);
        }
        let response = ui.add_enabled(
            enabled,
            egui::TextEdit::singleline(&mut state.subfolder_name).desired_width(120.0),
        );
        if response.changed() {
            session.set_subfolder_name(state.subfolder_name.clone());
        }
    });

    ui.horizontal(|ui| {
        let mut downloads = state.download_dir.is_some();
        if ui
            .checkbox(&mut downloads, "Send to downloads folder")
            .on_hover_text("Files land in one folder and existing files are replaced without asking")
            .changed()
        {
            state.download_dir = if downloads {
                rfd::FileDialog::new().pick_folder()
            } else {
                None
            };
        }
        if let Some(dir) = &state.download_dir {
            ui.weak(dir.display().to_string());
        }
    });
}

pub fn show_save(
    ui: &mut egui::Ui,
    session: &mut ResizeSession,
    state: &ViewState,
    doc_id: Option<DocumentId>,
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
) {
    let status = session.save_status().clone();
    let ready = doc_id.is_some() && session.export_folder().is_some();
    let enabled = ready && status != SaveStatus::Saving;

    ui.horizontal(|ui| {
        let button = egui::Button::new(format!("💾 {}", status.label())).min_size(egui::vec2(120.0, 28.0));
        if ui.add_enabled(enabled, button).clicked() {
            if let Some(doc_id) = doc_id {
                start_save(session, state, doc_id, command_tx);
            }
        }
        if status == SaveStatus::Saving {
            ui.spinner();
        }
    });

    if !ready {
        ui.weak("Open a PDF and choose a folder to save");
    }
}

fn start_save(
    session: &mut ResizeSession,
    state: &ViewState,
    doc_id: DocumentId,
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
) {
    let today = chrono::Local::now().date_naive();
    match session.begin_save(today) {
        Ok((generation, request)) => {
            log::info!("Saving {} output(s)", request.outputs.len());
            let _ = command_tx.send(PdfCommand::Save {
                doc_id,
                generation,
                request,
                target: state.output_target(),
            });
        }
        Err(e) => log::warn!("Cannot save: {e}"),
    }
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

fn place_caret(ctx: &egui::Context, id: egui::Id, text: &str, byte_caret: usize) {
    let char_caret = text[..byte_caret.min(text.len())].chars().count();
    if let Some(mut edit_state) = egui::TextEdit::load_state(ctx, id) {
        let caret = egui::text::CCursor::new(char_caret);
        edit_state
            .cursor
            .set_char_range(Some(egui::text::CCursorRange::one(caret)));
        edit_state.store(ctx, id);
    }
    ctx.memory_mut(|m| m.request_focus(id));
}
