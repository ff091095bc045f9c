//! Button components: mode buttons, action buttons, compass, layer switch.

use egui::{
    vec2, Align2, Color32, CornerRadius, CursorIcon, FontId, Pos2, Response, Sense, Shape, Stroke,
    StrokeKind, Ui, Vec2,
};

use crate::{sizing, theme};

/// Show the hover tooltip, with the shortcut in muted text when given.
fn tooltip(response: Response, text: &str, shortcut: Option<&str>) -> Response {
    match shortcut {
        Some(shortcut) => response.on_hover_ui(|ui| {
            ui.horizontal(|ui| {
                ui.label(text);
                ui.label(
                    egui::RichText::new(format!("({})", shortcut))
                        .color(Color32::from_gray(128))
                        .small(),
                );
            });
        }),
        None => response.on_hover_text(text),
    }
}

fn label_width(ui: &Ui, label: &str, font_id: &FontId) -> f32 {
    ui.painter()
        .layout_no_wrap(label.to_string(), font_id.clone(), Color32::PLACEHOLDER)
        .size()
        .x
}

/// A text button that stays highlighted while its drawing mode is active.
pub struct ModeButton<'a> {
    label: &'a str,
    tooltip: &'a str,
    shortcut: Option<&'a str>,
    active: bool,
}

impl<'a> ModeButton<'a> {
    pub fn new(label: &'a str, tooltip: &'a str) -> Self {
        Self {
            label,
            tooltip,
            shortcut: None,
            active: false,
        }
    }

    /// Set whether the mode is active.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Set keyboard shortcut (shown in hover tooltip).
    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = FontId::proportional(12.0);
        let width = label_width(ui, self.label, &font_id) + 20.0;
        let (rect, response) =
            ui.allocate_exact_size(vec2(width, sizing::BUTTON_HEIGHT), Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.active {
                theme::ACCENT
            } else if response.hovered() {
                theme::HOVER_BG
            } else {
                Color32::TRANSPARENT
            };
            let text_color = if self.active {
                Color32::WHITE
            } else {
                theme::TEXT
            };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(6), bg_color);
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.label,
                font_id,
                text_color,
            );
        }

        let clicked = response.clicked();
        tooltip(response, self.tooltip, self.shortcut).on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// A one-shot action button. Destructive actions hover in red.
pub struct ActionButton<'a> {
    label: &'a str,
    shortcut: Option<&'a str>,
    danger: bool,
    enabled: bool,
}

impl<'a> ActionButton<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            shortcut: None,
            danger: false,
            enabled: true,
        }
    }

    /// Add a shortcut hint.
    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Style as a destructive action.
    pub fn danger(mut self) -> Self {
        self.danger = true;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Show the button and return true if clicked while enabled.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = FontId::proportional(12.0);
        let width = label_width(ui, self.label, &font_id) + 20.0;
        let (rect, response) =
            ui.allocate_exact_size(vec2(width, sizing::BUTTON_HEIGHT), Sense::click());

        if ui.is_rect_visible(rect) {
            let hovered = self.enabled && response.hovered();
            let (bg_color, text_color) = match (hovered, self.danger) {
                _ if !self.enabled => (Color32::TRANSPARENT, Color32::from_gray(180)),
                (true, true) => (theme::DANGER, Color32::WHITE),
                (true, false) => (theme::HOVER_BG, theme::TEXT),
                (false, true) => (Color32::TRANSPARENT, theme::DANGER),
                (false, false) => (Color32::TRANSPARENT, theme::TEXT),
            };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.label,
                font_id,
                text_color,
            );
        }

        let clicked = response.clicked();
        let response = match self.shortcut {
            Some(shortcut) => response.on_hover_text(format!("Shortcut: {shortcut}")),
            None => response,
        };
        if self.enabled {
            response.on_hover_cursor(CursorIcon::PointingHand);
        }
        self.enabled && clicked
    }
}

/// Needle tip and tail for a compass of `radius` centred at `center`.
///
/// `bearing` is the view rotation in radians; the needle points at map north.
pub fn needle_points(center: Pos2, radius: f32, bearing: f32) -> (Pos2, Pos2) {
    let north = Vec2::angled(bearing - std::f32::consts::FRAC_PI_2);
    (center + north * radius, center - north * radius)
}

/// A round button showing map north. Clicking it resets the bearing.
pub struct CompassButton<'a> {
    bearing: f32,
    tooltip: &'a str,
    shortcut: Option<&'a str>,
}

impl<'a> CompassButton<'a> {
    pub fn new(bearing: f32, tooltip: &'a str) -> Self {
        Self {
            bearing,
            tooltip,
            shortcut: None,
        }
    }

    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Show the compass and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let (rect, response) =
            ui.allocate_exact_size(Vec2::splat(sizing::COMPASS), Sense::click());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            let center = rect.center();
            let radius = rect.width() / 2.0 - 1.0;
            let bg_color = if response.hovered() {
                theme::HOVER_BG
            } else {
                Color32::WHITE
            };
            painter.circle_filled(center, radius, bg_color);
            painter.circle_stroke(center, radius, Stroke::new(1.0, theme::BORDER));

            let (tip, tail) = needle_points(center, radius - 6.0, self.bearing);
            let across = (tip - center).rot90().normalized() * 4.0;
            painter.add(Shape::convex_polygon(
                vec![tip, center + across, center - across],
                theme::DANGER,
                Stroke::NONE,
            ));
            painter.add(Shape::convex_polygon(
                vec![tail, center - across, center + across],
                Color32::from_gray(150),
                Stroke::NONE,
            ));
            painter.circle_filled(center, 1.5, Color32::WHITE);
        }

        let clicked = response.clicked();
        tooltip(response, self.tooltip, self.shortcut).on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// A segmented switch between a fixed set of options.
pub struct LayerSwitch<'a> {
    options: &'a [&'a str],
    current: usize,
    tooltip: &'a str,
}

impl<'a> LayerSwitch<'a> {
    pub fn new(options: &'a [&'a str], current: usize, tooltip: &'a str) -> Self {
        Self {
            options,
            current,
            tooltip,
        }
    }

    /// Show the switch. Returns the clicked option's index when it differs from the current one.
    pub fn show(self, ui: &mut Ui) -> Option<usize> {
        let font_id = FontId::proportional(11.0);
        let widths: Vec<f32> = self
            .options
            .iter()
            .map(|label| label_width(ui, label, &font_id) + 16.0)
            .collect();
        let total = vec2(widths.iter().sum::<f32>() + 4.0, sizing::BUTTON_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(total, Sense::click());

        let mut chosen = None;
        let mut left = rect.left() + 2.0;
        let pointer = response.interact_pointer_pos();

        if ui.is_rect_visible(rect) {
            ui.painter().rect(
                rect,
                CornerRadius::same(6),
                Color32::from_gray(238),
                Stroke::new(1.0, theme::BORDER),
                StrokeKind::Inside,
            );
        }

        for (index, (label, width)) in self.options.iter().zip(&widths).enumerate() {
            let segment = egui::Rect::from_min_size(
                Pos2::new(left, rect.top() + 2.0),
                vec2(*width, rect.height() - 4.0),
            );
            left += width;

            let selected = index == self.current;
            if ui.is_rect_visible(segment) {
                if selected {
                    ui.painter().rect_filled(
                        segment,
                        CornerRadius::same(sizing::CORNER_RADIUS),
                        Color32::WHITE,
                    );
                }
                ui.painter().text(
                    segment.center(),
                    Align2::CENTER_CENTER,
                    *label,
                    font_id.clone(),
                    if selected { theme::TEXT } else { theme::TEXT_MUTED },
                );
            }

            if response.clicked() && !selected && pointer.is_some_and(|p| segment.contains(p)) {
                chosen = Some(index);
            }
        }

        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        chosen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_needle_points_up_when_north_up() {
        let (tip, tail) = needle_points(Pos2::new(10.0, 10.0), 5.0, 0.0);
        assert!((tip.x - 10.0).abs() < 1e-5 && (tip.y - 5.0).abs() < 1e-5);
        assert!((tail.y - 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_needle_follows_bearing() {
        // A quarter turn clockwise puts north on the right
        let (tip, _) = needle_points(Pos2::ZERO, 5.0, FRAC_PI_2);
        assert!((tip.x - 5.0).abs() < 1e-5 && tip.y.abs() < 1e-5);
    }
}
