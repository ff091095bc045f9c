//! egui panels around the map: toolbar, file menu, compass and geometry form.

use egui::{Align2, Color32, Context, Pos2, RichText, Vec2};
use geocapture_core::{BaseLayer, DrawMode, GeometryPair, LonLat};
use geocapture_widgets::{
    ActionButton, CompassButton, LayerSwitch, ModeButton, key_value_row, menu_item,
    menu_separator, panel_frame, section_label, sizing, theme, toolbar_frame, vertical_separator,
};

use crate::shortcuts::ShortcutRegistry;

/// Actions requested by the UI or by keyboard shortcuts.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Enter point drawing mode.
    StartPoint,
    /// Enter boundary drawing mode.
    StartPolygon,
    /// Switch between street and satellite.
    ToggleBaseLayer,
    /// Pick a base layer directly.
    SetBaseLayer(BaseLayer),
    /// Animate the bearing back to north.
    ResetRotation,
    RotateLeft,
    RotateRight,
    /// Remove both geometries.
    ClearAll,
    /// Abandon the draw in progress.
    CancelDrawing,
    OpenGeoJson,
    SaveGeoJson,
}

/// UI-only state that persists between frames.
#[derive(Debug, Default)]
pub struct UiState {
    pub menu_open: bool,
    pub shortcuts_open: bool,
    pub show_json: bool,
    /// Last error or notice, shown under the form.
    pub notice: Option<String>,
}

/// Snapshot of the map the panels display.
#[derive(Debug, Clone, Default)]
pub struct MapStatus {
    pub mode: DrawMode,
    pub base_layer: BaseLayer,
    /// View bearing in radians.
    pub bearing: f64,
    pub zoom: f64,
    /// Pointer position over the map.
    pub cursor: Option<LonLat>,
    /// The form's copy of the geometries, as last reported by the editor.
    pub geometries: GeometryPair,
    /// Number of change notifications received.
    pub change_count: usize,
}

const LAYERS: [BaseLayer; 2] = [BaseLayer::Street, BaseLayer::Satellite];

/// Render all panels. Returns the action triggered this frame, if any.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState, status: &MapStatus) -> Option<UiAction> {
    let toolbar_action = render_toolbar(ctx, status);
    let menu_action = render_file_menu(ctx, ui_state);
    let compass_action = render_compass(ctx, status);
    render_mode_hint(ctx, status.mode);
    render_form(ctx, ui_state, status);
    if ui_state.shortcuts_open {
        render_shortcuts_modal(ctx, ui_state);
    }

    toolbar_action.or(menu_action).or(compass_action)
}

fn hint_for(action: &UiAction) -> String {
    ShortcutRegistry::hint(action).unwrap_or_default()
}

fn render_toolbar(ctx: &Context, status: &MapStatus) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("map_toolbar"))
        .anchor(Align2::CENTER_TOP, Vec2::new(0.0, sizing::MARGIN))
        .show(ctx, |ui| {
            toolbar_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(4.0, 0.0);

                    let point_hint = hint_for(&UiAction::StartPoint);
                    if ModeButton::new("Add point", "Place the location marker")
                        .shortcut(&point_hint)
                        .active(status.mode == DrawMode::DrawingPoint)
                        .show(ui)
                    {
                        action = Some(UiAction::StartPoint);
                    }

                    let polygon_hint = hint_for(&UiAction::StartPolygon);
                    if ModeButton::new("Add boundary", "Draw the area boundary")
                        .shortcut(&polygon_hint)
                        .active(status.mode == DrawMode::DrawingPolygon)
                        .show(ui)
                    {
                        action = Some(UiAction::StartPolygon);
                    }

                    vertical_separator(ui);

                    let labels = LAYERS.map(BaseLayer::label);
                    let current = LAYERS
                        .iter()
                        .position(|l| *l == status.base_layer)
                        .unwrap_or(0);
                    if let Some(index) =
                        LayerSwitch::new(&labels, current, "Base layer style (L)").show(ui)
                    {
                        action = Some(UiAction::SetBaseLayer(LAYERS[index]));
                    }

                    vertical_separator(ui);

                    let clear_hint = hint_for(&UiAction::ClearAll);
                    if ActionButton::new("Clear all")
                        .shortcut(&clear_hint)
                        .danger()
                        .enabled(!status.geometries.is_empty() || status.mode != DrawMode::Idle)
                        .show(ui)
                    {
                        action = Some(UiAction::ClearAll);
                    }
                });
            });
        });

    action
}

fn render_file_menu(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("file_button"))
        .anchor(Align2::LEFT_TOP, Vec2::new(sizing::MARGIN, sizing::MARGIN))
        .show(ctx, |ui| {
            toolbar_frame().show(ui, |ui| {
                if ModeButton::new("\u{2630} File", "Open or save geometries")
                    .active(ui_state.menu_open)
                    .show(ui)
                {
                    ui_state.menu_open = !ui_state.menu_open;
                }
            });
        });

    if ui_state.menu_open {
        egui::Area::new(egui::Id::new("file_menu_dropdown"))
            .anchor(Align2::LEFT_TOP, Vec2::new(sizing::MARGIN, 56.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    ui.set_width(200.0);
                    ui.vertical(|ui| {
                        ui.spacing_mut().item_spacing = Vec2::new(0.0, 2.0);

                        if menu_item(ui, "Open GeoJSON...", &hint_for(&UiAction::OpenGeoJson)) {
                            action = Some(UiAction::OpenGeoJson);
                            ui_state.menu_open = false;
                        }
                        if menu_item(ui, "Save GeoJSON...", &hint_for(&UiAction::SaveGeoJson)) {
                            action = Some(UiAction::SaveGeoJson);
                            ui_state.menu_open = false;
                        }

                        menu_separator(ui);

                        if menu_item(ui, "Keyboard shortcuts", "") {
                            ui_state.shortcuts_open = true;
                            ui_state.menu_open = false;
                        }
                    });
                });
            });
    }

    action
}

fn render_compass(ctx: &Context, status: &MapStatus) -> Option<UiAction> {
    let mut action = None;
    egui::Area::new(egui::Id::new("compass"))
        .anchor(Align2::RIGHT_TOP, Vec2::new(-sizing::MARGIN, sizing::MARGIN))
        .show(ctx, |ui| {
            let hint = hint_for(&UiAction::ResetRotation);
            if CompassButton::new(status.bearing as f32, "Reset rotation")
                .shortcut(&hint)
                .show(ui)
            {
                action = Some(UiAction::ResetRotation);
            }
        });
    action
}

fn render_mode_hint(ctx: &Context, mode: DrawMode) {
    let text = match mode {
        DrawMode::Idle => return,
        DrawMode::DrawingPoint => "Click the map to place the point. Esc cancels.",
        DrawMode::DrawingPolygon => {
            "Click to add vertices. Double-click or click the first vertex to finish. Esc cancels."
        }
    };
    egui::Area::new(egui::Id::new("mode_hint"))
        .anchor(Align2::CENTER_TOP, Vec2::new(0.0, 56.0))
        .interactable(false)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.label(RichText::new(text).size(12.0).color(theme::TEXT));
            });
        });
}

fn format_lon_lat(pos: LonLat) -> String {
    format!("{:.6}, {:.6}", pos.lon, pos.lat)
}

fn render_form(ctx: &Context, ui_state: &mut UiState, status: &MapStatus) {
    egui::Area::new(egui::Id::new("geometry_form"))
        .anchor(Align2::LEFT_BOTTOM, Vec2::new(sizing::MARGIN, -sizing::MARGIN))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(280.0);
                ui.vertical(|ui| {
                    section_label(ui, "Location");
                    match &status.geometries.point {
                        Some(point) => key_value_row(ui, "lon, lat", &format_lon_lat(point.position())),
                        None => key_value_row(ui, "lon, lat", "not set"),
                    }
                    ui.add_space(6.0);

                    section_label(ui, "Area");
                    match &status.geometries.polygon {
                        Some(polygon) => {
                            let vertices = polygon.distinct_vertices().len();
                            key_value_row(ui, "vertices", &vertices.to_string());
                            if let Some((sw, ne)) = polygon.bounds() {
                                key_value_row(ui, "sw", &format_lon_lat(sw));
                                key_value_row(ui, "ne", &format_lon_lat(ne));
                            }
                        }
                        None => key_value_row(ui, "vertices", "not set"),
                    }
                    ui.add_space(6.0);

                    section_label(ui, "Map");
                    key_value_row(ui, "layer", status.base_layer.label());
                    key_value_row(ui, "zoom", &format!("{:.1}", status.zoom));
                    if let Some(cursor) = status.cursor {
                        key_value_row(ui, "cursor", &format_lon_lat(cursor));
                    }
                    key_value_row(ui, "changes", &status.change_count.to_string());

                    ui.add_space(4.0);
                    ui.checkbox(&mut ui_state.show_json, "Show GeoJSON");
                    if ui_state.show_json {
                        let json = serde_json::to_string_pretty(
                            &status.geometries.to_feature_collection(),
                        )
                        .unwrap_or_default();
                        egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                            ui.label(
                                RichText::new(json)
                                    .size(10.0)
                                    .family(egui::FontFamily::Monospace),
                            );
                        });
                    }

                    if let Some(notice) = &ui_state.notice {
                        ui.add_space(4.0);
                        ui.label(RichText::new(notice).size(11.0).color(theme::DANGER));
                    }
                });
            });
        });
}

fn render_shortcuts_modal(ctx: &Context, ui_state: &mut UiState) {
    // Backdrop
    egui::Area::new(egui::Id::new("shortcuts_backdrop"))
        .fixed_pos(Pos2::ZERO)
        .order(egui::Order::Middle)
        .show(ctx, |ui| {
            let screen_rect = ctx.input(|i| i.content_rect());
            let response = ui.allocate_rect(screen_rect, egui::Sense::click());
            ui.painter()
                .rect_filled(screen_rect, 0.0, Color32::from_black_alpha(80));
            if response.clicked() {
                ui_state.shortcuts_open = false;
            }
        });

    egui::Area::new(egui::Id::new("shortcuts_modal"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(360.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Keyboard Shortcuts").size(15.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ActionButton::new("\u{2715}").show(ui) {
                            ui_state.shortcuts_open = false;
                        }
                    });
                });
                ui.add_space(8.0);
                for shortcut in ShortcutRegistry::all() {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(shortcut.format())
                                .size(12.0)
                                .family(egui::FontFamily::Monospace)
                                .color(theme::TEXT_MUTED),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(RichText::new(shortcut.description).size(12.0));
                        });
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_lon_lat() {
        assert_eq!(
            format_lon_lat(LonLat::new(84.0, 28.3)),
            "84.000000, 28.300000"
        );
    }

    #[test]
    fn test_every_toolbar_action_has_a_hint() {
        for action in [
            UiAction::StartPoint,
            UiAction::StartPolygon,
            UiAction::ResetRotation,
            UiAction::ClearAll,
            UiAction::OpenGeoJson,
            UiAction::SaveGeoJson,
        ] {
            assert!(!hint_for(&action).is_empty(), "{action:?} has no shortcut");
        }
    }
}
