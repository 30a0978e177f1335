use serde::{Deserialize, Serialize};

use foundation::bounds::ProjectedBounds;

use crate::error::PanelError;
use crate::selection::SelectionOwner;

/// One field of the selection panel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelField {
    Width,
    Height,
    Area,
    West,
    East,
    North,
    South,
    Center,
}

impl PanelField {
    pub const ALL: [PanelField; 8] = [
        PanelField::Width,
        PanelField::Height,
        PanelField::Area,
        PanelField::West,
        PanelField::East,
        PanelField::North,
        PanelField::South,
        PanelField::Center,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PanelField::Width => "width",
            PanelField::Height => "height",
            PanelField::Area => "area",
            PanelField::West => "west",
            PanelField::East => "east",
            PanelField::North => "north",
            PanelField::South => "south",
            PanelField::Center => "center",
        }
    }

    pub fn parse(name: &str) -> Result<Self, PanelError> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| PanelError::UnknownField(name.to_string()))
    }

    /// Area and centre are derived from the other fields.
    pub fn is_editable(self) -> bool {
        !matches!(self, PanelField::Area | PanelField::Center)
    }
}

impl std::fmt::Display for PanelField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Numbers currently shown by the panel.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct PanelValues {
    pub width: f64,
    pub height: f64,
    pub area: f64,
    pub west: f64,
    pub east: f64,
    pub north: f64,
    pub south: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl PanelValues {
    pub fn from_bounds(bounds: ProjectedBounds) -> Self {
        let center = bounds.center();
        Self {
            width: bounds.width(),
            height: bounds.height(),
            area: bounds.area(),
            west: bounds.west(),
            east: bounds.east(),
            north: bounds.north(),
            south: bounds.south(),
            center_x: center.lng,
            center_y: center.lat,
        }
    }
}

/// Text for each input of the panel, keyed by field name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelDisplay {
    pub width: String,
    pub height: String,
    pub area: String,
    pub west: String,
    pub east: String,
    pub north: String,
    pub south: String,
    pub center: String,
}

impl From<PanelValues> for PanelDisplay {
    fn from(v: PanelValues) -> Self {
        Self {
            width: v.width.to_string(),
            height: v.height.to_string(),
            area: v.area.to_string(),
            west: v.west.to_string(),
            east: v.east.to_string(),
            north: v.north.to_string(),
            south: v.south.to_string(),
            center: format!("{}, {}", v.center_x, v.center_y),
        }
    }
}

/// Numeric view of the selection with editable edge and size fields.
///
/// Display only: edits come back as requested bounds for the selection tool,
/// the panel's own values change only through [`SelectionPanel::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionPanel {
    values: PanelValues,
}

impl SelectionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, bounds: ProjectedBounds) {
        self.values = PanelValues::from_bounds(bounds);
    }

    pub fn values(&self) -> PanelValues {
        self.values
    }

    pub fn display(&self) -> PanelDisplay {
        self.values.into()
    }

    /// Bounds the user asked for by typing `raw` into `field`.
    ///
    /// Width and height keep west/south and move east/north; edges are taken
    /// as typed. The other fields come from the current values.
    pub fn on_field_changed(
        &self,
        field: PanelField,
        raw: &str,
    ) -> Result<ProjectedBounds, PanelError> {
        if !field.is_editable() {
            return Err(PanelError::ReadOnlyField(field));
        }
        let value = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| PanelError::InvalidNumber {
                field,
                value: raw.to_string(),
            })?;

        let v = self.values;
        let (west, south, east, north) = match field {
            PanelField::Width => (v.west, v.south, v.west + value, v.south + v.height),
            PanelField::Height => (v.west, v.south, v.west + v.width, v.south + value),
            PanelField::West => (value, v.south, v.east, v.north),
            PanelField::East => (v.west, v.south, value, v.north),
            PanelField::North => (v.west, v.south, v.east, value),
            PanelField::South => (v.west, value, v.east, v.north),
            PanelField::Area | PanelField::Center => {
                return Err(PanelError::ReadOnlyField(field));
            }
        };
        Ok(ProjectedBounds::from_edges(west, south, east, north))
    }

    pub fn on_named_field_changed(
        &self,
        name: &str,
        raw: &str,
    ) -> Result<ProjectedBounds, PanelError> {
        self.on_field_changed(PanelField::parse(name)?, raw)
    }
}

impl SelectionOwner for SelectionPanel {
    fn selection_changed(&mut self, bounds: ProjectedBounds) {
        self.update(bounds);
    }
}
