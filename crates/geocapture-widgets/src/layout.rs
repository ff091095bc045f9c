//! Layout helpers: separators, section labels, key/value rows.

use egui::{Color32, Pos2, RichText, Stroke, Ui};

use crate::theme;

/// Draw a short vertical separator between toolbar groups.
pub fn vertical_separator(ui: &mut Ui) {
    ui.add_space(4.0);
    let rect = ui.available_rect_before_wrap();
    let height = 16.0;
    let x = rect.left();
    let top = rect.center().y - height / 2.0;
    ui.painter().line_segment(
        [Pos2::new(x, top), Pos2::new(x, top + height)],
        Stroke::new(1.0, Color32::from_gray(210)),
    );
    ui.add_space(5.0);
}

/// Draw a section label (small, muted, upper-case text).
pub fn section_label(ui: &mut Ui, text: &str) {
    ui.label(
        RichText::new(text.to_uppercase())
            .size(10.0)
            .color(theme::TEXT_MUTED),
    );
}

/// A label and a monospace value on one line.
pub fn key_value_row(ui: &mut Ui, key: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(key).size(11.0).color(theme::TEXT_MUTED));
        ui.label(
            RichText::new(value)
                .size(11.0)
                .family(egui::FontFamily::Monospace)
                .color(theme::TEXT),
        );
    });
}
