use eframe::egui;
use pdf_resize::format::NumericField;

/// Free-text millimeter input backed by a [`NumericField`].
///
/// Returns the value to commit this frame: complete numbers while typing,
/// the reformatted value on blur, and the stepped value for arrow keys
/// (Shift steps by 10 mm).
pub struct NumericInput<'a> {
    field: &'a mut NumericField,
    id_salt: egui::Id,
    width: f32,
    suffix: Option<&'a str>,
}

impl<'a> NumericInput<'a> {
    pub fn new(field: &'a mut NumericField, id_salt: impl std::hash::Hash) -> Self {
        Self {
            field,
            id_salt: egui::Id::new(id_salt),
            width: 70.0,
            suffix: None,
        }
    }

    pub fn suffix(mut self, suffix: &'a str) -> Self {
        self.suffix = Some(suffix);
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> Option<f64> {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(self.field.text_mut())
                    .id_salt(self.id_salt)
                    .desired_width(self.width),
            );
            if let Some(suffix) = self.suffix {
                ui.label(suffix);
            }

            let mut committed = None;
            if response.changed() {
                let raw = self.field.text().to_string();
                committed = self.field.on_input(&raw);
            }
            if response.has_focus() {
                let (up, down, shift) = ui.input(|i| {
                    (
                        i.key_pressed(egui::Key::ArrowUp),
                        i.key_pressed(egui::Key::ArrowDown),
                        i.modifiers.shift,
                    )
                });
                if up || down {
                    committed = Some(self.field.on_step(up, shift));
                }
            }
            if response.lost_focus() {
                committed = self.field.on_blur().or(committed);
            }
            committed
        })
        .inner
    }
}

/// Horizontal button group for enum selection
pub fn button_group<T>(ui: &mut egui::Ui, value: &mut T, options: &[(T, &str)]) -> bool
where
    T: PartialEq + Clone,
{
    let mut changed = false;
    ui.horizontal(|ui| {
        for (option_value, option_text) in options {
            if ui
                .selectable_value(value, option_value.clone(), *option_text)
                .changed()
            {
                changed = true;
            }
        }
    });
    changed
}

/// Labeled single-line text field; returns true when the text changed
pub fn labeled_text(ui: &mut egui::Ui, label: &str, text: &mut String, width: f32) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::TextEdit::singleline(text).desired_width(width))
            .changed()
    })
    .inner
}
