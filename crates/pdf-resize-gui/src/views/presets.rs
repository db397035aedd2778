use eframe::egui;
use pdf_async_runtime::PdfCommand;
use pdf_resize::PresetList;
use pdf_resize::format::format_size_mm;
use tokio::sync::mpsc;

use super::state::ViewState;
use crate::ui_components::{NumericInput, labeled_text};

pub fn show_presets_window(
    ctx: &egui::Context,
    presets: &mut PresetList,
    state: &mut ViewState,
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
) {
    let mut open = state.show_presets;
    egui::Window::new("Presets")
        .open(&mut open)
        .resizable(false)
        .show(ctx, |ui| {
            show_list(ui, presets, state);
            ui.separator();
            show_editor(ui, presets, state);
            ui.separator();
            show_actions(ui, presets, command_tx);
        });
    state.show_presets = open;
}

fn show_list(ui: &mut egui::Ui, presets: &mut PresetList, state: &mut ViewState) {
    let count = presets.len();
    let mut move_up = None;
    let mut move_down = None;
    let mut remove = None;

    egui::Grid::new("preset_list").striped(true).show(ui, |ui| {
        for (idx, preset) in presets.items().iter().enumerate() {
            ui.label(&preset.name);
            ui.label(format_size_mm(preset.width, preset.height));
            ui.horizontal(|ui| {
                if ui.add_enabled(idx > 0, egui::Button::new("▲").small()).clicked() {
                    move_up = Some(idx);
                }
                if ui
                    .add_enabled(idx + 1 < count, egui::Button::new("▼").small())
                    .clicked()
                {
                    move_down = Some(idx);
                }
                if ui.small_button("✏").clicked() {
                    state.preset_editor.edit(idx, preset);
                }
                if ui.small_button("✖").clicked() {
                    remove = Some(idx);
                }
            });
            ui.end_row();
        }
    });

    if let Some(idx) = move_up {
        presets.move_item(idx, idx - 1);
    }
    if let Some(idx) = move_down {
        presets.move_item(idx, idx + 1);
    }
    if let Some(idx) = remove {
        presets.remove(idx);
        state.preset_editor.clear();
    }
}

fn show_editor(ui: &mut egui::Ui, presets: &mut PresetList, state: &mut ViewState) {
    let editor = &mut state.preset_editor;
    labeled_text(ui, "Name:", &mut editor.name, 140.0);
    ui.horizontal(|ui| {
        ui.label("W");
        NumericInput::new(&mut editor.width, "preset_width").show(ui);
        ui.label("H");
        NumericInput::new(&mut editor.height, "preset_height").show(ui);
        ui.label("mm");
    });

    ui.horizontal(|ui| {
        let label = if editor.editing.is_some() {
            "Update"
        } else {
            "➕ Add"
        };
        if ui.button(label).clicked() {
            let preset = editor.preset();
            let result = match editor.editing {
                Some(index) => presets.update(index, preset),
                None => presets.add(preset),
            };
            match result {
                Ok(()) => editor.clear(),
                Err(e) => editor.error = Some(e.to_string()),
            }
        }
        if editor.editing.is_some() && ui.button("Cancel").clicked() {
            editor.clear();
        }
    });

    if let Some(error) = &editor.error {
        ui.colored_label(ui.visuals().error_fg_color, error);
    }
}

fn show_actions(
    ui: &mut egui::Ui,
    presets: &mut PresetList,
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
) {
    ui.horizontal(|ui| {
        if ui
            .add_enabled(
                presets.is_missing_defaults(),
                egui::Button::new("Restore defaults"),
            )
            .clicked()
        {
            presets.restore_defaults();
        }

        if ui.button("📂 Load…").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("JSON", &["json"])
                .pick_file()
            {
                let _ = command_tx.send(PdfCommand::LoadPresets { path });
            }
        }

        if ui.button("💾 Save…").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("JSON", &["json"])
                .set_file_name("presets.json")
                .save_file()
            {
                let _ = command_tx.send(PdfCommand::SavePresets {
                    path,
                    presets: presets.clone(),
                });
            }
        }
    });
}
