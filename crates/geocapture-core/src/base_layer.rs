//! Base layer styles and the shared street/satellite preference.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Background raster style beneath the vector overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseLayer {
    #[default]
    Street,
    Satellite,
}

impl BaseLayer {
    /// The other preset.
    pub fn toggled(self) -> Self {
        match self {
            BaseLayer::Street => BaseLayer::Satellite,
            BaseLayer::Satellite => BaseLayer::Street,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BaseLayer::Street => "Street",
            BaseLayer::Satellite => "Satellite",
        }
    }

    /// XYZ tile URL template for the tile service.
    pub fn tile_url_template(self) -> &'static str {
        match self {
            BaseLayer::Street => "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            BaseLayer::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
        }
    }

    pub fn attribution(self) -> &'static str {
        match self {
            BaseLayer::Street => "© OpenStreetMap contributors",
            BaseLayer::Satellite => "Tiles © Esri",
        }
    }

    /// Background colour shown where no tile has painted.
    pub fn background_rgb(self) -> [u8; 3] {
        match self {
            BaseLayer::Street => [242, 239, 233],
            BaseLayer::Satellite => [38, 52, 40],
        }
    }
}

/// Cheaply cloneable handle to the user's base layer choice.
///
/// Clones share the same value, so the host and the editor see each other's
/// changes without any global state.
#[derive(Debug, Clone, Default)]
pub struct BaseLayerPreference(Rc<Cell<BaseLayer>>);

impl BaseLayerPreference {
    pub fn new(layer: BaseLayer) -> Self {
        Self(Rc::new(Cell::new(layer)))
    }

    pub fn get(&self) -> BaseLayer {
        self.0.get()
    }

    pub fn set(&self, layer: BaseLayer) {
        self.0.set(layer);
    }

    /// Switch to the other preset and return it.
    pub fn toggle(&self) -> BaseLayer {
        let next = self.get().toggled();
        self.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_cycles() {
        assert_eq!(BaseLayer::Street.toggled(), BaseLayer::Satellite);
        assert_eq!(BaseLayer::Satellite.toggled(), BaseLayer::Street);
    }

    #[test]
    fn test_preference_is_shared_between_clones() {
        let pref = BaseLayerPreference::default();
        let other = pref.clone();
        assert_eq!(other.toggle(), BaseLayer::Satellite);
        assert_eq!(pref.get(), BaseLayer::Satellite);
    }

    #[test]
    fn test_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&BaseLayer::Satellite).unwrap(),
            "\"satellite\""
        );
    }

    #[test]
    fn test_tile_templates_have_placeholders() {
        for layer in [BaseLayer::Street, BaseLayer::Satellite] {
            let url = layer.tile_url_template();
            assert!(url.contains("{z}") && url.contains("{x}") && url.contains("{y}"));
        }
    }
}
