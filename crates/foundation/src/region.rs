use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::position::{MAX_X, MAX_Y, MIN_X, MIN_Y, Position};

/// Region (map square) edge lengths in grid units.
pub const REGION_WIDTH: i32 = 64;
pub const REGION_HEIGHT: i32 = 64;

/// Low bits of a region id hold the y index, the remaining bits the x index.
pub const REGION_Y_BITS: u32 = 8;
pub const REGION_Y_MASK: i32 = (1 << REGION_Y_BITS) - 1;

/// Fixed-size square tile of the grid, addressed by a bit-packed id.
///
/// Only ids whose decoded origin lies inside the world can be constructed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Region {
    id: i32,
}

impl Region {
    pub fn from_id(id: i32) -> Result<Self, GridError> {
        if id < 0 {
            return Err(GridError::InvalidRegion(i64::from(id)));
        }
        let region = Self { id };
        let origin = region.origin_position();
        if !(MIN_X..=MAX_X).contains(&origin.x) || !(MIN_Y..=MAX_Y).contains(&origin.y) {
            return Err(GridError::InvalidRegion(i64::from(id)));
        }
        Ok(region)
    }

    pub fn from_position(pos: Position) -> Result<Self, GridError> {
        if !(MIN_X..=MAX_X).contains(&pos.x) || !(MIN_Y..=MAX_Y).contains(&pos.y) {
            return Err(GridError::InvalidCoordinate {
                x: i64::from(pos.x),
                y: i64::from(pos.y),
            });
        }
        let x_index = pos.x / REGION_WIDTH;
        let y_index = pos.y / REGION_HEIGHT;
        Self::from_id((x_index << REGION_Y_BITS) | y_index)
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn x_index(&self) -> i32 {
        self.id >> REGION_Y_BITS
    }

    pub fn y_index(&self) -> i32 {
        self.id & REGION_Y_MASK
    }

    /// South-west corner of the region, on plane 0.
    pub fn origin_position(&self) -> Position {
        Position::new(
            self.x_index() * REGION_WIDTH,
            self.y_index() * REGION_HEIGHT,
            0,
        )
    }

    /// Centre of the region, on plane 0.
    pub fn centre_position(&self) -> Position {
        let origin = self.origin_position();
        Position::new(
            origin.x + REGION_WIDTH / 2,
            origin.y + REGION_HEIGHT / 2,
            origin.plane,
        )
    }

    /// Offset of `pos` from this region's origin ("local" coordinates).
    pub fn local_offset(&self, pos: Position) -> (i32, i32) {
        let origin = self.origin_position();
        (pos.x - origin.x, pos.y - origin.y)
    }
}

impl TryFrom<i32> for Region {
    type Error = GridError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Self::from_id(id)
    }
}

impl From<Region> for i32 {
    fn from(region: Region) -> Self {
        region.id
    }
}
