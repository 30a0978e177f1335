use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use foundation::position::Position;
use foundation::view::{DEFAULT_CENTRE, DEFAULT_ZOOM, ViewState};

pub const DEFAULT_TILE_URL_TEMPLATE: &str = "https://raw.githubusercontent.com/mejrs/layers_rs3/cb4b7dd75787c52cd635178b15ee5e44f17e42f9/mapsquares/-1/{plane}/{z}_{x}_{y}.png";

/// Map configuration, usually shipped as `map-config.json` next to the page.
///
/// Every field is optional in JSON; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Tile URL with a `{plane}` placeholder. `{z}`, `{x}`, `{y}` are left to
    /// the tile layer.
    pub tile_url_template: String,
    pub min_zoom: i32,
    pub max_zoom: i32,
    /// Highest zoom with real tile images; the surface upscales beyond it.
    pub max_native_zoom: i32,
    pub default_centre: Position,
    pub default_zoom: i32,
    /// Edge length, in grid units, of the rectangle shown when the selection
    /// tool first opens.
    pub selection_size: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url_template: DEFAULT_TILE_URL_TEMPLATE.to_string(),
            min_zoom: -4,
            max_zoom: 5,
            max_native_zoom: 3,
            default_centre: DEFAULT_CENTRE,
            default_zoom: DEFAULT_ZOOM,
            selection_size: 32.0,
        }
    }
}

impl MapConfig {
    pub fn from_json_str(s: &str) -> Result<Self, FormatError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FormatError> {
        if self.min_zoom > self.max_zoom {
            return Err(FormatError::ZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if !(self.selection_size.is_finite() && self.selection_size > 0.0) {
            return Err(FormatError::SelectionSize(self.selection_size));
        }
        if !self.default_centre.is_in_world() {
            return Err(FormatError::DefaultCentre(self.default_centre));
        }
        Ok(())
    }

    pub fn clamp_zoom(&self, zoom: i32) -> i32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    pub fn default_view(&self) -> ViewState {
        ViewState::new(self.default_centre, self.default_zoom)
    }

    /// Tile URL template for one plane.
    pub fn tile_url_for_plane(&self, plane: i32) -> String {
        self.tile_url_template.replace("{plane}", &plane.to_string())
    }
}
