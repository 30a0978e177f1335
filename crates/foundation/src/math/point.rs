use serde::{Deserialize, Serialize};

/// A point in the rendering surface's projected space.
///
/// `lat` grows northwards and `lng` eastwards. In this world both axes are
/// measured in grid units, so a projected point is a fractional grid position.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub lat: f64,
    pub lng: f64,
}

impl ProjectedPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.lat + other.lat) / 2.0, (self.lng + other.lng) / 2.0)
    }
}

impl std::ops::Add for ProjectedPoint {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.lat + other.lat, self.lng + other.lng)
    }
}

impl std::ops::Sub for ProjectedPoint {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.lat - other.lat, self.lng - other.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::ProjectedPoint;

    #[test]
    fn add_sub() {
        let a = ProjectedPoint::new(1.0, 2.0);
        let b = ProjectedPoint::new(-0.5, 4.0);
        assert_eq!(a + b, ProjectedPoint::new(0.5, 6.0));
        assert_eq!(a - b, ProjectedPoint::new(1.5, -2.0));
    }

    #[test]
    fn midpoint_and_finiteness() {
        let a = ProjectedPoint::new(3200.0, 3200.0);
        let b = ProjectedPoint::new(3190.0, 3210.0);
        assert_eq!(a.midpoint(b), ProjectedPoint::new(3195.0, 3205.0));
        assert!(a.is_finite());
        assert!(!ProjectedPoint::new(f64::NAN, 0.0).is_finite());
    }
}
