use serde::{Deserialize, Serialize};

use crate::math::ProjectedPoint;

/// Axis-aligned rectangle in projected space.
///
/// Built through [`ProjectedBounds::from_corners`], which orders the edges, so
/// `west <= east` and `south <= north` hold for every value of this type.
/// Deserialized edges go through [`ProjectedBounds::from_edges`] as well.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEdges")]
pub struct ProjectedBounds {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

#[derive(Deserialize)]
struct RawEdges {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl From<RawEdges> for ProjectedBounds {
    fn from(e: RawEdges) -> Self {
        Self::from_edges(e.west, e.south, e.east, e.north)
    }
}

/// Which corner of a [`ProjectedBounds`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    SouthWest,
    NorthWest,
    NorthEast,
    SouthEast,
}

impl Corner {
    /// Vertex order used everywhere: SW, NW, NE, SE.
    pub const ALL: [Corner; 4] = [
        Corner::SouthWest,
        Corner::NorthWest,
        Corner::NorthEast,
        Corner::SouthEast,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Corner::SouthWest => Corner::NorthEast,
            Corner::NorthWest => Corner::SouthEast,
            Corner::NorthEast => Corner::SouthWest,
            Corner::SouthEast => Corner::NorthWest,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Corner::SouthWest => 0,
            Corner::NorthWest => 1,
            Corner::NorthEast => 2,
            Corner::SouthEast => 3,
        }
    }
}

impl ProjectedBounds {
    /// Rectangle spanned by two arbitrary corner points.
    pub fn from_corners(a: ProjectedPoint, b: ProjectedPoint) -> Self {
        Self {
            west: a.lng.min(b.lng),
            south: a.lat.min(b.lat),
            east: a.lng.max(b.lng),
            north: a.lat.max(b.lat),
        }
    }

    /// Rectangle from four edges given in any order per axis.
    pub fn from_edges(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self::from_corners(
            ProjectedPoint::new(south, west),
            ProjectedPoint::new(north, east),
        )
    }

    /// Zero-area rectangle at `p`.
    pub fn point(p: ProjectedPoint) -> Self {
        Self::from_corners(p, p)
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> ProjectedPoint {
        self.corner(Corner::SouthWest)
            .midpoint(self.corner(Corner::NorthEast))
    }

    pub fn corner(&self, corner: Corner) -> ProjectedPoint {
        match corner {
            Corner::SouthWest => ProjectedPoint::new(self.south, self.west),
            Corner::NorthWest => ProjectedPoint::new(self.north, self.west),
            Corner::NorthEast => ProjectedPoint::new(self.north, self.east),
            Corner::SouthEast => ProjectedPoint::new(self.south, self.east),
        }
    }

    /// Corners in SW, NW, NE, SE order.
    pub fn corners(&self) -> [ProjectedPoint; 4] {
        Corner::ALL.map(|c| self.corner(c))
    }

    pub fn contains(&self, p: ProjectedPoint) -> bool {
        (self.west..=self.east).contains(&p.lng) && (self.south..=self.north).contains(&p.lat)
    }

    pub fn is_finite(&self) -> bool {
        self.west.is_finite()
            && self.south.is_finite()
            && self.east.is_finite()
            && self.north.is_finite()
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }
}
