//! Grid <-> projected coordinate transform.
//!
//! Two affine stages:
//! - grid units to tile pixels at a given zoom (`PIXELS_PER_UNIT_NATIVE` at
//!   `NATIVE_ZOOM`, doubling with every zoom step, pixel y grows southwards);
//! - tile pixels to projected units with the simple-CRS scale `2^zoom`.
//!
//! Every scale factor is a power of two, so the round trip through both stages
//! is exact for integer grid positions at every zoom level.

use serde::{Deserialize, Serialize};

use super::ProjectedPoint;
use crate::bounds::ProjectedBounds;
use crate::position::Position;

/// Edge length of one tile image in pixels.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Zoom level at which tile pixels map 1:1 to image pixels.
pub const NATIVE_ZOOM: i32 = 2;

/// Pixels covered by one grid unit at `NATIVE_ZOOM` (one 64-unit region per tile).
pub const PIXELS_PER_UNIT_NATIVE: f64 = 4.0;

/// Zoom state handed to every transform call. There is no ambient zoom.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomContext {
    pub zoom: i32,
}

impl ZoomContext {
    pub fn new(zoom: i32) -> Self {
        Self { zoom }
    }

    /// Tile pixels per grid unit at this zoom.
    pub fn pixels_per_unit(self) -> f64 {
        PIXELS_PER_UNIT_NATIVE * 2f64.powi(self.zoom.saturating_sub(NATIVE_ZOOM))
    }

    /// Tile pixels per projected unit at this zoom.
    pub fn crs_scale(self) -> f64 {
        2f64.powi(self.zoom)
    }

    /// Projected point to tile pixels.
    pub fn project(self, p: ProjectedPoint) -> [f64; 2] {
        let s = self.crs_scale();
        [p.lng * s, -p.lat * s]
    }

    /// Tile pixels to projected point.
    pub fn unproject(self, px: [f64; 2]) -> ProjectedPoint {
        let s = self.crs_scale();
        ProjectedPoint::new(-px[1] / s, px[0] / s)
    }
}

/// Address of the tile image containing a position.
///
/// Rows count upwards from 0. The map widget counts them downwards from -1,
/// so its row `r` is image row `-r - 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub plane: i32,
    pub zoom: i32,
    pub col: i64,
    pub row: i64,
}

/// Pixel position of the centre of `pos`'s unit cell.
pub fn to_pixel(pos: Position, ctx: ZoomContext) -> [f64; 2] {
    let ppu = ctx.pixels_per_unit();
    [
        (f64::from(pos.x) + 0.5) * ppu,
        -((f64::from(pos.y) + 0.5) * ppu),
    ]
}

/// Cell containing pixel `px`. Fractional input is floored.
pub fn from_pixel(px: [f64; 2], ctx: ZoomContext, plane: i32) -> Position {
    let ppu = ctx.pixels_per_unit();
    let x = (px[0] / ppu).floor() as i32;
    let y = (-px[1] / ppu).floor() as i32;
    Position::new(x, y, plane)
}

/// Projected point at the centre of `pos`'s unit cell. Never fails.
pub fn to_projected(pos: Position, ctx: ZoomContext) -> ProjectedPoint {
    ctx.unproject(to_pixel(pos, ctx))
}

/// Grid cell containing `point`, on `plane`.
pub fn from_projected(point: ProjectedPoint, ctx: ZoomContext, plane: i32) -> Position {
    from_pixel(ctx.project(point), ctx, plane)
}

/// Renderable unit-cell rectangle `[x, x+1] x [y, y+1]`.
pub fn cell_bounds(pos: Position, ctx: ZoomContext) -> ProjectedBounds {
    let ppu = ctx.pixels_per_unit();
    let x0 = f64::from(pos.x) * ppu;
    let y0 = f64::from(pos.y) * ppu;
    let sw = ctx.unproject([x0, -y0]);
    let ne = ctx.unproject([x0 + ppu, -(y0 + ppu)]);
    ProjectedBounds::from_corners(sw, ne)
}

pub fn tile_for(pos: Position, ctx: ZoomContext) -> TileCoord {
    let [px, py] = to_pixel(pos, ctx);
    TileCoord {
        plane: pos.plane,
        zoom: ctx.zoom,
        col: (px / TILE_SIZE_PX).floor() as i64,
        row: (-py / TILE_SIZE_PX).floor() as i64,
    }
}
