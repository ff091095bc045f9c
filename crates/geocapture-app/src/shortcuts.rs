//! Keyboard shortcut registry and documentation.

use egui::Key;

use crate::ui::UiAction;

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: Key,
    pub ctrl: bool,
    pub description: &'static str,
    pub action: UiAction,
}

impl Shortcut {
    pub const fn new(key: Key, ctrl: bool, description: &'static str, action: UiAction) -> Self {
        Self {
            key,
            ctrl,
            description,
            action,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        if self.ctrl {
            format!("Ctrl+{}", self.key.name())
        } else {
            self.key.name().to_string()
        }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new(Key::P, false, "Add point", UiAction::StartPoint),
            Shortcut::new(Key::B, false, "Add boundary", UiAction::StartPolygon),
            Shortcut::new(Key::L, false, "Toggle street / satellite", UiAction::ToggleBaseLayer),
            Shortcut::new(Key::R, false, "Reset rotation", UiAction::ResetRotation),
            Shortcut::new(Key::Q, false, "Rotate left", UiAction::RotateLeft),
            Shortcut::new(Key::E, false, "Rotate right", UiAction::RotateRight),
            Shortcut::new(Key::Delete, false, "Clear all", UiAction::ClearAll),
            Shortcut::new(Key::Escape, false, "Cancel drawing", UiAction::CancelDrawing),
            Shortcut::new(Key::O, true, "Open GeoJSON...", UiAction::OpenGeoJson),
            Shortcut::new(Key::S, true, "Save GeoJSON...", UiAction::SaveGeoJson),
        ]
    }

    /// Find the action bound to a key press.
    pub fn action_for(key: Key, ctrl: bool) -> Option<UiAction> {
        Self::all()
            .into_iter()
            .find(|s| s.key == key && s.ctrl == ctrl)
            .map(|s| s.action)
    }

    /// Display text for the shortcut bound to `action`, if any.
    pub fn hint(action: &UiAction) -> Option<String> {
        Self::all()
            .into_iter()
            .find(|s| &s.action == action)
            .map(|s| s.format())
    }

    /// Collect the actions for this frame's key presses.
    pub fn collect(ctx: &egui::Context) -> Vec<UiAction> {
        if ctx.wants_keyboard_input() {
            return Vec::new();
        }
        ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        modifiers,
                        ..
                    } => Self::action_for(*key, modifiers.command),
                    _ => None,
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let open = Shortcut::new(Key::O, true, "Open", UiAction::OpenGeoJson);
        assert_eq!(open.format(), "Ctrl+O");
        let point = Shortcut::new(Key::P, false, "Add point", UiAction::StartPoint);
        assert_eq!(point.format(), "P");
    }

    #[test]
    fn test_action_lookup_respects_ctrl() {
        assert_eq!(
            ShortcutRegistry::action_for(Key::S, true),
            Some(UiAction::SaveGeoJson)
        );
        assert_eq!(ShortcutRegistry::action_for(Key::S, false), None);
        assert_eq!(
            ShortcutRegistry::action_for(Key::Delete, false),
            Some(UiAction::ClearAll)
        );
    }

    #[test]
    fn test_keys_are_unique() {
        let all = ShortcutRegistry::all();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(!(a.key == b.key && a.ctrl == b.ctrl), "{} bound twice", a.format());
            }
        }
    }

    #[test]
    fn test_hint() {
        assert_eq!(
            ShortcutRegistry::hint(&UiAction::ResetRotation).as_deref(),
            Some("R")
        );
    }
}
