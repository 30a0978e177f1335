use serde::{Deserialize, Serialize};

use crate::math::ZoomContext;
use crate::position::Position;

pub const DEFAULT_CENTRE: Position = Position::new(3200, 3200, 0);
pub const DEFAULT_ZOOM: i32 = 0;

/// What the user currently sees: centre cell, zoom and plane.
///
/// `plane` always equals `center.plane`; [`ViewState::new`] enforces it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub center: Position,
    pub zoom: i32,
    pub plane: i32,
}

impl ViewState {
    pub fn new(center: Position, zoom: i32) -> Self {
        Self {
            center,
            zoom,
            plane: center.plane,
        }
    }

    pub fn zoom_context(&self) -> ZoomContext {
        ZoomContext::new(self.zoom)
    }

    pub fn with_plane(self, plane: i32) -> Self {
        Self::new(self.center.with_plane(plane), self.zoom)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_CENTRE, DEFAULT_ZOOM)
    }
}
