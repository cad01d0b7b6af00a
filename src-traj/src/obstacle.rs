use serde::{Deserialize, Serialize};

/// A vertex of an obstacle polygon, in field coordinates (or chassis
/// coordinates for bumpers).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePoint {
    pub x: f64,
    pub y: f64,
}

impl ObstaclePoint {
    pub fn new(x: f64, y: f64) -> ObstaclePoint {
        ObstaclePoint { x, y }
    }
}

impl From<(f64, f64)> for ObstaclePoint {
    fn from((x, y): (f64, f64)) -> ObstaclePoint {
        ObstaclePoint { x, y }
    }
}

/// A convex or non-convex closed region to keep clear of, described by its
/// polygon vertices inflated by `safety_radius`. A single vertex with a
/// positive radius is a disc; the chassis footprint (bumpers) uses the same
/// representation. Clearance between an obstacle and the bumpers is the
/// Minkowski sum of the two radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub safety_radius: f64,
    pub points: Vec<ObstaclePoint>,
}

impl Obstacle {
    pub fn new(safety_radius: f64, points: impl IntoIterator<Item = impl Into<ObstaclePoint>>) -> Obstacle {
        Obstacle {
            safety_radius,
            points: points.into_iter().map(Into::into).collect(),
        }
    }

    /// A disc of the given radius centred at `(x, y)`.
    pub fn disc(radius: f64, x: f64, y: f64) -> Obstacle {
        Obstacle::new(radius, [(x, y)])
    }

    pub fn is_valid(&self) -> bool {
        self.safety_radius >= 0.0 && !self.points.is_empty()
    }

    /// The polygon edges as index pairs; a two-vertex polygon is a single
    /// segment, not a doubled one.
    pub(crate) fn edge_indices(&self) -> Vec<(usize, usize)> {
        match self.points.len() {
            0 | 1 => Vec::new(),
            2 => vec![(0, 1)],
            n => (0..n).map(|i| (i, (i + 1) % n)).collect(),
        }
    }
}
