//! Menu components: menu items, separators, floating panel frames.

use egui::{
    vec2, Align2, Color32, CornerRadius, CursorIcon, FontId, Frame, Margin, Pos2, Sense, Stroke,
    Ui,
};

use crate::{sizing, theme};

/// Show a menu item with label and optional shortcut.
pub fn menu_item(ui: &mut Ui, label: &str, shortcut: &str) -> bool {
    menu_item_enabled(ui, label, shortcut, true)
}

/// Show a menu item that greys out when disabled.
pub fn menu_item_enabled(ui: &mut Ui, label: &str, shortcut: &str, enabled: bool) -> bool {
    let size = vec2(ui.available_width(), 26.0);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        if enabled && response.hovered() {
            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), theme::HOVER_BG);
        }

        let (text_color, shortcut_color) = if enabled {
            (theme::TEXT, theme::TEXT_MUTED)
        } else {
            (Color32::from_gray(180), Color32::from_gray(200))
        };

        ui.painter().text(
            Pos2::new(rect.left() + 10.0, rect.center().y),
            Align2::LEFT_CENTER,
            label,
            FontId::proportional(13.0),
            text_color,
        );
        if !shortcut.is_empty() {
            ui.painter().text(
                Pos2::new(rect.right() - 10.0, rect.center().y),
                Align2::RIGHT_CENTER,
                shortcut,
                FontId::proportional(11.0),
                shortcut_color,
            );
        }
    }

    let clicked = response.clicked();
    if enabled {
        response.on_hover_cursor(CursorIcon::PointingHand);
    }
    enabled && clicked
}

/// Draw a menu separator line.
pub fn menu_separator(ui: &mut Ui) {
    ui.add_space(3.0);
    let rect = ui.available_rect_before_wrap();
    ui.painter().line_segment(
        [
            Pos2::new(rect.left() + 6.0, rect.top()),
            Pos2::new(rect.right() - 6.0, rect.top()),
        ],
        Stroke::new(1.0, Color32::from_gray(230)),
    );
    ui.add_space(3.0);
}

fn floating_frame(blur: u8, margin: Margin) -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(margin)
}

/// Frame for floating panels (menus, the geometry form).
pub fn panel_frame() -> Frame {
    floating_frame(8, Margin::same(8))
}

/// Frame for the map toolbar.
pub fn toolbar_frame() -> Frame {
    floating_frame(6, Margin::symmetric(8, 4))
}
