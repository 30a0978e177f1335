use crate::position::MAX_PLANE;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("region id {0} does not decode to an origin inside the world")]
    InvalidRegion(i64),
    #[error("coordinate ({x}, {y}) lies outside the addressable world")]
    InvalidCoordinate { x: i64, y: i64 },
    #[error("plane {0} outside 0..={max}", max = MAX_PLANE)]
    InvalidPlane(i64),
}
