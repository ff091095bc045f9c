//! Map control widgets for egui.
//!
//! - **Buttons**: mode buttons, action buttons, the compass, the layer switch
//! - **Menu**: menu items, separators, floating panel frames
//! - **Layout**: section labels, separators, key/value rows

pub mod buttons;
pub mod layout;
pub mod menu;

pub use buttons::{ActionButton, CompassButton, LayerSwitch, ModeButton};
pub use layout::{key_value_row, section_label, vertical_separator};
pub use menu::{menu_item, menu_item_enabled, menu_separator, panel_frame, toolbar_frame};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Toolbar button height
    pub const BUTTON_HEIGHT: f32 = 28.0;
    /// Compass diameter
    pub const COMPASS: f32 = 36.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
    /// Gap between a floating panel and the window edge
    pub const MARGIN: f32 = 12.0;
}

/// Standard colors used across widgets and the map overlays.
pub mod theme {
    use egui::Color32;

    pub const TEXT: Color32 = Color32::from_rgb(51, 65, 85);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(100, 116, 139);
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Active mode / primary action (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Destructive action (red)
    pub const DANGER: Color32 = Color32::from_rgb(220, 38, 38);
    pub const HOVER_BG: Color32 = Color32::from_rgb(241, 245, 249);
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(245, 245, 247, 245);
    /// Point marker fill
    pub const POINT: Color32 = Color32::from_rgb(239, 68, 68);
    /// Polygon outline
    pub const AREA: Color32 = Color32::from_rgb(37, 99, 235);
    /// Sketch in progress
    pub const SKETCH: Color32 = Color32::from_rgb(245, 158, 11);
}
