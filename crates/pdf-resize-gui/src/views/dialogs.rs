use eframe::egui;
use pdf_async_runtime::{DocumentId, PdfCommand};
use pdf_resize::{PrimaryAction, ResizeSession, SaveStatus};
use tokio::sync::mpsc;

use super::state::ViewState;

/// Conflict and error modals for the save workflow
pub fn show_save_dialogs(
    ctx: &egui::Context,
    session: &mut ResizeSession,
    state: &ViewState,
    doc_id: Option<DocumentId>,
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
) {
    match session.save_status().clone() {
        SaveStatus::Conflict => show_conflicts(ctx, session, state, doc_id, command_tx),
        SaveStatus::Error(message) => show_error(ctx, session, &message),
        _ => {}
    }
}

fn show_conflicts(
    ctx: &egui::Context,
    session: &mut ResizeSession,
    state: &ViewState,
    doc_id: Option<DocumentId>,
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
) {
    let Some(conflicts) = session.conflicts().cloned() else {
        return;
    };

    let modal = egui::Modal::new(egui::Id::new("save_conflicts")).show(ctx, |ui| {
        ui.set_max_width(420.0);
        ui.heading("Files already exist");
        ui.label(format!(
            "{} of {} files are already in the destination. Untick the ones to keep.",
            conflicts.conflict_count(),
            conflicts.entries().len()
        ));
        ui.separator();

        for (index, entry) in conflicts.entries().iter().enumerate() {
            ui.horizontal(|ui| {
                if entry.is_conflict {
                    let mut overwrite = entry.should_overwrite;
                    if ui.checkbox(&mut overwrite, &entry.file_name).changed() {
                        session.toggle_conflict(index);
                    }
                    ui.weak("exists");
                } else {
                    ui.add_enabled(false, egui::Checkbox::new(&mut true, &entry.file_name));
                    ui.weak("new");
                }
            });
        }

        ui.separator();
        let mut resolve = false;
        let mut cancel = false;
        ui.horizontal(|ui| {
            let action = session
                .conflicts()
                .map(|set| set.primary_action())
                .unwrap_or(PrimaryAction::Continue);
            resolve = ui.button(action.label()).clicked();
            cancel = ui.button("Cancel").clicked();
        });
        (resolve, cancel)
    });

    let (resolve, cancel) = modal.inner;
    if resolve {
        resolve_conflicts(session, state, doc_id, command_tx);
    } else if cancel || modal.should_close() {
        session.cancel_conflicts();
    }
}

fn resolve_conflicts(
    session: &mut ResizeSession,
    state: &ViewState,
    doc_id: Option<DocumentId>,
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
) {
    let Some(doc_id) = doc_id else {
        session.cancel_conflicts();
        return;
    };
    match session.resolve_conflicts() {
        Ok((generation, request, indices)) => {
            log::info!("Writing {} of {} outputs", indices.len(), request.outputs.len());
            let _ = command_tx.send(PdfCommand::WriteSelected {
                doc_id,
                generation,
                request,
                indices,
                target: state.output_target(),
            });
        }
        Err(e) => log::warn!("Cannot resolve conflicts: {e}"),
    }
}

fn show_error(ctx: &egui::Context, session: &mut ResizeSession, message: &str) {
    let modal = egui::Modal::new(egui::Id::new("save_error")).show(ctx, |ui| {
        ui.set_max_width(420.0);
        ui.heading("Save failed");
        ui.label(message);
        ui.add_space(8.0);
        ui.button("OK").clicked()
    });
    if modal.inner || modal.should_close() {
        session.acknowledge_error();
    }
}
