use serde::{Deserialize, Serialize};

use crate::bounds::ProjectedBounds;
use crate::error::GridError;
use crate::math::{self, ProjectedPoint, ZoomContext};
use crate::region::Region;

/// Addressable world, inclusive.
pub const MIN_X: i32 = 0;
pub const MAX_X: i32 = 6399;
pub const MIN_Y: i32 = 0;
pub const MAX_Y: i32 = 12799;
/// Highest vertical plane (floor) index.
pub const MAX_PLANE: i32 = 3;

/// One grid cell of the world on a given plane.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub plane: i32,
}

impl Position {
    /// Literal constructor. No range check; see [`Position::try_new`] and
    /// [`Position::clamped`] for validated input.
    pub const fn new(x: i32, y: i32, plane: i32) -> Self {
        Self { x, y, plane }
    }

    pub fn try_new(x: i64, y: i64, plane: i64) -> Result<Self, GridError> {
        if !(i64::from(MIN_X)..=i64::from(MAX_X)).contains(&x)
            || !(i64::from(MIN_Y)..=i64::from(MAX_Y)).contains(&y)
        {
            return Err(GridError::InvalidCoordinate { x, y });
        }
        if !(0..=i64::from(MAX_PLANE)).contains(&plane) {
            return Err(GridError::InvalidPlane(plane));
        }
        Ok(Self::new(x as i32, y as i32, plane as i32))
    }

    /// Clamps each axis to the world on its own. Used for user-editable input.
    pub fn clamped(x: i64, y: i64, plane: i64) -> Self {
        Self::new(
            x.clamp(i64::from(MIN_X), i64::from(MAX_X)) as i32,
            y.clamp(i64::from(MIN_Y), i64::from(MAX_Y)) as i32,
            plane.clamp(0, i64::from(MAX_PLANE)) as i32,
        )
    }

    pub fn is_in_world(&self) -> bool {
        (MIN_X..=MAX_X).contains(&self.x)
            && (MIN_Y..=MAX_Y).contains(&self.y)
            && (0..=MAX_PLANE).contains(&self.plane)
    }

    pub fn with_plane(self, plane: i32) -> Self {
        Self { plane, ..self }
    }

    pub fn from_projected(point: ProjectedPoint, ctx: ZoomContext, plane: i32) -> Self {
        math::from_projected(point, ctx, plane)
    }

    pub fn to_projected(self, ctx: ZoomContext) -> ProjectedPoint {
        math::to_projected(self, ctx)
    }

    /// Unit-cell rectangle for rendering this position.
    pub fn cell_bounds(self, ctx: ZoomContext) -> ProjectedBounds {
        math::cell_bounds(self, ctx)
    }

    pub fn region(self) -> Result<Region, GridError> {
        Region::from_position(self)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.plane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_bounds_each_axis_independently() {
        assert_eq!(
            Position::clamped(i64::from(MAX_X) + 1000, -5, 9),
            Position::new(MAX_X, MIN_Y, MAX_PLANE)
        );
        assert_eq!(Position::clamped(3200, 3200, 0), Position::new(3200, 3200, 0));
        assert!(Position::clamped(i64::MIN, i64::MAX, -1).is_in_world());
    }

    #[test]
    fn try_new_rejects_out_of_range() {
        assert_eq!(
            Position::try_new(-1, 0, 0),
            Err(GridError::InvalidCoordinate { x: -1, y: 0 })
        );
        assert_eq!(Position::try_new(0, 0, 4), Err(GridError::InvalidPlane(4)));
        assert_eq!(Position::try_new(10, 20, 1), Ok(Position::new(10, 20, 1)));
    }

    #[test]
    fn display_and_with_plane() {
        let p = Position::new(3200, 3201, 0).with_plane(2);
        assert_eq!(p.to_string(), "(3200, 3201, 2)");
    }
}
