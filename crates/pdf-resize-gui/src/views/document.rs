use eframe::egui;
use pdf_async_runtime::PdfCommand;
use pdf_resize::format::{format_file_size, format_size_mm};
use pdf_resize::{PageSelection, ResizeSession};
use tokio::sync::mpsc;

use super::state::ViewState;

const PAGE_FILL: egui::Color32 = egui::Color32::WHITE;
const PAGE_STROKE: egui::Color32 = egui::Color32::from_gray(120);
const CROP_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(120, 30, 30, 90);

pub fn show_document(
    ui: &mut egui::Ui,
    session: &mut ResizeSession,
    state: &ViewState,
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
) {
    let Some(doc) = session.document() else {
        show_empty(ui, command_tx);
        return;
    };
    let file_name = doc.file_name.clone();
    let file_size = doc.info.file_size;

    handle_page_keys(ui, session);

    ui.horizontal(|ui| {
        let page = session.current_page();
        let count = session.page_count();

        if ui
            .add_enabled(page > 0, egui::Button::new("◀ Previous"))
            .clicked()
        {
            session.previous_page();
        }
        ui.label(format!("Page {} of {}", page + 1, count));
        if ui
            .add_enabled(page + 1 < count, egui::Button::new("Next ▶"))
            .clicked()
        {
            session.next_page();
        }

        ui.separator();
        let mut all = session.page_selection() == PageSelection::All;
        if ui.checkbox(&mut all, "Export all pages").changed() {
            session.set_page_selection(if all {
                PageSelection::All
            } else {
                PageSelection::Single
            });
        }
    });

    ui.horizontal(|ui| {
        ui.strong(&file_name);
        if let Some(page) = session.page_geometry() {
            ui.label(format_size_mm(page.width, page.height));
        }
        if let Some(bytes) = file_size {
            ui.label(format_file_size(bytes));
        }
    });
    ui.separator();

    show_page_preview(ui, session, state);
}

fn show_empty(ui: &mut egui::Ui, command_tx: &mpsc::UnboundedSender<PdfCommand>) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.heading("No PDF loaded");
            ui.label("Drop a PDF here or open one");
            if ui.button("📂 Open PDF…").clicked() {
                super::open_pdf_dialog(command_tx);
            }
        });
    });
}

/// Left/right arrows flip pages while no text field has focus
fn handle_page_keys(ui: &egui::Ui, session: &mut ResizeSession) {
    if ui.ctx().memory(|m| m.focused().is_some()) {
        return;
    }
    let (left, right) = ui.input(|i| {
        (
            i.key_pressed(egui::Key::ArrowLeft),
            i.key_pressed(egui::Key::ArrowRight),
        )
    });
    if left {
        session.previous_page();
    } else if right {
        session.next_page();
    }
}

fn show_page_preview(ui: &mut egui::Ui, session: &ResizeSession, state: &ViewState) {
    let Some(page) = session.page_geometry() else {
        return;
    };
    let available = ui.available_size();
    let (response, painter) = ui.allocate_painter(available, egui::Sense::hover());
    let area = response.rect.shrink(16.0);
    if area.width() <= 0.0 || area.height() <= 0.0 || page.width <= 0.0 || page.height <= 0.0 {
        return;
    }

    let px_per_mm = (area.width() as f64 / page.width).min(area.height() as f64 / page.height);
    let size = egui::vec2(
        (page.width * px_per_mm) as f32,
        (page.height * px_per_mm) as f32,
    );
    let page_rect = egui::Rect::from_center_size(area.center(), size);

    painter.rect_filled(page_rect, 0.0, PAGE_FILL);
    painter.rect_stroke(
        page_rect,
        0.0,
        egui::Stroke::new(1.0, PAGE_STROKE),
        egui::StrokeKind::Outside,
    );

    let Some(focused) = state.focused else {
        return;
    };
    if let Some(insets) = session.crop_overlay(focused, px_per_mm) {
        let (top, right, bottom, left) = (
            insets.top.max(0.0) as f32,
            insets.right.max(0.0) as f32,
            insets.bottom.max(0.0) as f32,
            insets.left.max(0.0) as f32,
        );
        let min = page_rect.min;
        let max = page_rect.max;
        let bands = [
            egui::Rect::from_min_max(min, egui::pos2(max.x, min.y + top)),
            egui::Rect::from_min_max(egui::pos2(min.x, max.y - bottom), max),
            egui::Rect::from_min_max(
                egui::pos2(min.x, min.y + top),
                egui::pos2(min.x + left, max.y - bottom),
            ),
            egui::Rect::from_min_max(
                egui::pos2(max.x - right, min.y + top),
                egui::pos2(max.x, max.y - bottom),
            ),
        ];
        for band in bands {
            if band.is_positive() {
                painter.rect_filled(band.intersect(page_rect), 0.0, CROP_FILL);
            }
        }
    }

    if let Some(adj) = session.adjuster(focused) {
        painter.text(
            page_rect.center(),
            egui::Align2::CENTER_CENTER,
            format!("→ {}", format_size_mm(adj.width(), adj.height())),
            egui::FontId::proportional(16.0),
            egui::Color32::from_gray(80),
        );
    }
}
