use eframe::egui;
use pdf_resize::format::{format_mm, format_size_mm};
use pdf_resize::{AdjusterId, PresetList, ResizeSession, SizeMode};

use super::state::ViewState;
use crate::ui_components::{NumericInput, button_group};

pub fn show_trim(ui: &mut egui::Ui, session: &mut ResizeSession, state: &mut ViewState) {
    ui.heading("Trim");
    ui.horizontal(|ui| {
        ui.label("Margin:");
        if let Some(trim) = NumericInput::new(&mut state.trim, "trim")
            .suffix("mm")
            .show(ui)
        {
            session.set_trim(trim);
        }
    });
    if let Some(effective) = session.effective_size() {
        ui.label(format!(
            "Trimmed size: {}",
            format_size_mm(effective.width, effective.height)
        ));
    }
}

pub fn show_adjusters(
    ui: &mut egui::Ui,
    session: &mut ResizeSession,
    state: &mut ViewState,
    presets: &PresetList,
) {
    ui.heading("Output sizes");

    let ids: Vec<AdjusterId> = session.adjusters().iter().map(|a| a.id()).collect();
    let removable = ids.len() > 1;
    for (index, id) in ids.into_iter().enumerate() {
        let card = egui::Frame::group(ui.style()).show(ui, |ui| {
            show_card(ui, index, id, removable, session, state, presets);
        });
        if card.response.contains_pointer() {
            state.focused = Some(id);
        }
        ui.add_space(4.0);
    }

    ui.horizontal(|ui| {
        if ui.button("➕ Add size").clicked() {
            let id = session.add_adjuster();
            state.focused = Some(id);
        }
    });

    let has_document = session.document().is_some();
    ui.horizontal(|ui| {
        if ui
            .add_enabled(has_document, egui::Button::new("Set to PDF size"))
            .clicked()
        {
            session.set_to_pdf_dimensions();
        }
        if ui
            .add_enabled(
                has_document && session.trim() > 0.0,
                egui::Button::new("Set to trimmed size"),
            )
            .clicked()
        {
            session.set_to_trimmed_dimensions();
        }
    });
}

fn show_card(
    ui: &mut egui::Ui,
    index: usize,
    id: AdjusterId,
    removable: bool,
    session: &mut ResizeSession,
    state: &mut ViewState,
    presets: &PresetList,
) {
    let Some(adj) = session.adjuster(id).cloned() else {
        return;
    };

    ui.horizontal(|ui| {
        ui.strong(format!("Output {}", index + 1));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add_enabled(removable, egui::Button::new("✖").small())
                .on_hover_text("Remove this size")
                .clicked()
            {
                session.remove_adjuster(id);
            }
        });
    });

    let matching = presets.matching(adj.size()).map(|p| p.name.as_str());
    egui::ComboBox::from_id_salt(("preset", id))
        .selected_text(matching.unwrap_or("Custom"))
        .show_ui(ui, |ui| {
            for preset in presets.items() {
                let label = format!("{} ({})", preset.name, format_size_mm(preset.width, preset.height));
                if ui
                    .selectable_label(matching == Some(preset.name.as_str()), label)
                    .clicked()
                {
                    session.apply_preset(id, preset.size());
                }
            }
        });

    let mut mode = adj.mode;
    let options: Vec<(SizeMode, &str)> = SizeMode::ALL.iter().map(|&m| (m, m.label())).collect();
    if button_group(ui, &mut mode, &options) {
        session.set_mode(id, mode);
    }

    let Some(fields) = state.dims.get_mut(&id) else {
        return;
    };
    ui.horizontal(|ui| {
        ui.label("W");
        ui.add_enabled_ui(adj.mode != SizeMode::SetWidth, |ui| {
            if let Some(width) = NumericInput::new(&mut fields.width, ("width", id)).show(ui) {
                session.set_width(id, width);
            }
        });
        ui.label("H");
        ui.add_enabled_ui(adj.mode != SizeMode::SetHeight, |ui| {
            if let Some(height) = NumericInput::new(&mut fields.height, ("height", id)).show(ui) {
                session.set_height(id, height);
            }
        });
        ui.label("mm");

        if adj.mode == SizeMode::Fill
            && ui
                .button("⇄")
                .on_hover_text("Swap width and height")
                .clicked()
        {
            session.swap_dimensions(id);
        }
    });

    ui.small(format!(
        "{} × {} mm, {}",
        format_mm(adj.width()),
        format_mm(adj.height()),
        adj.mode.label().to_lowercase()
    ));
}
