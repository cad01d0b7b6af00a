//! Constraint sets over ℝ and ℝ².
//!
//! Each set knows whether its parameters are well-formed (`is_valid`) and how
//! to emit the solver relations realizing membership (`apply`). Constraint
//! kinds are a closed sum: every emitter produces a different shape of
//! expression, so dispatch is an exhaustive match rather than a trait object.

use serde::{Deserialize, Serialize};

use holotraj_opti::{Expr, Opti, eq, ge, le};

use crate::error::Error;

/// A closed interval `[lower, upper]` over ℝ; infinite endpoints drop the
/// corresponding bound. Valid iff `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalSet1d {
    pub lower: f64,
    pub upper: f64,
}

impl IntervalSet1d {
    pub fn new(lower: f64, upper: f64) -> IntervalSet1d {
        IntervalSet1d { lower, upper }
    }

    /// The degenerate interval `[value, value]`.
    pub fn exact(value: f64) -> IntervalSet1d {
        IntervalSet1d {
            lower: value,
            upper: value,
        }
    }

    /// All of ℝ.
    pub fn r1() -> IntervalSet1d {
        IntervalSet1d {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.lower == self.upper
    }

    pub fn is_valid(&self) -> bool {
        self.lower <= self.upper
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn apply<O: Opti>(&self, opti: &mut O, z: &Expr) {
        if self.is_exact() {
            opti.subject_to(eq(z, self.lower));
            return;
        }
        if self.lower.is_finite() {
            opti.subject_to(ge(z, self.lower));
        }
        if self.upper.is_finite() {
            opti.subject_to(le(z, self.upper));
        }
    }
}

/// Axis-aligned product of two intervals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularSet2d {
    pub x_range: IntervalSet1d,
    pub y_range: IntervalSet1d,
}

impl RectangularSet2d {
    pub fn new(x_range: IntervalSet1d, y_range: IntervalSet1d) -> RectangularSet2d {
        RectangularSet2d { x_range, y_range }
    }

    /// The single point `(x, y)`.
    pub fn point(x: f64, y: f64) -> RectangularSet2d {
        RectangularSet2d {
            x_range: IntervalSet1d::exact(x),
            y_range: IntervalSet1d::exact(y),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.x_range.is_valid() && self.y_range.is_valid()
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x_range.contains(x) && self.y_range.contains(y)
    }

    pub fn apply<O: Opti>(&self, opti: &mut O, x: &Expr, y: &Expr) {
        self.x_range.apply(opti, x);
        self.y_range.apply(opti, y);
    }
}

/// The line through the origin with direction `theta`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearSet2d {
    pub theta: f64,
}

impl LinearSet2d {
    pub fn new(theta: f64) -> LinearSet2d {
        LinearSet2d { theta }
    }

    pub fn is_valid(&self) -> bool {
        self.theta.is_finite()
    }

    pub fn apply<O: Opti>(&self, opti: &mut O, x: &Expr, y: &Expr) {
        let (sin, cos) = self.theta.sin_cos();
        opti.subject_to(eq(x * sin - y * cos, 0.0));
    }
}

/// Which side of an elliptical boundary is feasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EllipticalDirection {
    /// On or inside the boundary.
    Inside,
    /// Exactly on the boundary.
    Centered,
    /// On or outside the boundary.
    Outside,
}

/// An origin-centred ellipse with the feasible region picked by `direction`.
/// Valid iff both radii are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipticalSet2d {
    pub x_radius: f64,
    pub y_radius: f64,
    pub direction: EllipticalDirection,
}

impl EllipticalSet2d {
    pub fn new(x_radius: f64, y_radius: f64, direction: EllipticalDirection) -> EllipticalSet2d {
        EllipticalSet2d {
            x_radius,
            y_radius,
            direction,
        }
    }

    /// A circle of the given radius.
    pub fn circular(radius: f64, direction: EllipticalDirection) -> EllipticalSet2d {
        EllipticalSet2d::new(radius, radius, direction)
    }

    pub fn is_circular(&self) -> bool {
        self.x_radius == self.y_radius
    }

    pub fn is_r2(&self) -> bool {
        self.x_radius == f64::INFINITY && self.y_radius == f64::INFINITY
    }

    pub fn is_valid(&self) -> bool {
        self.x_radius > 0.0 && self.y_radius > 0.0
    }

    fn level(&self, x: f64, y: f64) -> f64 {
        (x / self.x_radius).powi(2) + (y / self.y_radius).powi(2)
    }

    /// Validate a fixed point against the set, for use while seeding. The
    /// solver never sees this; an excluded point is a configuration error.
    pub fn check_vector(&self, x: f64, y: f64) -> Result<(), Error> {
        let level = self.level(x, y);
        let compatible = match self.direction {
            EllipticalDirection::Inside => level <= 1.0,
            EllipticalDirection::Centered => (level - 1.0).abs() <= 1e-9,
            EllipticalDirection::Outside => level >= 1.0,
        };
        if compatible {
            return Ok(());
        }
        let relation = match self.direction {
            EllipticalDirection::Inside => "on or inside",
            EllipticalDirection::Centered => "on",
            EllipticalDirection::Outside => "on or outside",
        };
        Err(Error::IncompatibleTrajectory(format!(
            "({}, {}) is not {} an ellipse with x radius of {} and y radius of {}",
            x, y, relation, self.x_radius, self.y_radius
        )))
    }

    pub fn apply<O: Opti>(&self, opti: &mut O, x: &Expr, y: &Expr) {
        let level = (x / self.x_radius).sq() + (y / self.y_radius).sq();
        match self.direction {
            EllipticalDirection::Inside => opti.subject_to(le(level, 1.0)),
            EllipticalDirection::Centered => opti.subject_to(eq(level, 1.0)),
            EllipticalDirection::Outside => opti.subject_to(ge(level, 1.0)),
        }
    }
}

/// The angular sector `[theta_min, theta_max]` of directions from the origin.
/// Valid iff the sector is non-empty and spans at most π, keeping the two
/// half-plane cuts convex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeSet2d {
    pub theta_min: f64,
    pub theta_max: f64,
}

impl ConeSet2d {
    pub fn new(theta_min: f64, theta_max: f64) -> ConeSet2d {
        ConeSet2d {
            theta_min,
            theta_max,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.theta_min <= self.theta_max && self.theta_max - self.theta_min <= std::f64::consts::PI
    }

    pub fn apply<O: Opti>(&self, opti: &mut O, x: &Expr, y: &Expr) {
        // (x, y) counterclockwise of the lower edge and clockwise of the
        // upper edge.
        let (sin_min, cos_min) = self.theta_min.sin_cos();
        let (sin_max, cos_max) = self.theta_max.sin_cos();
        opti.subject_to(ge(y * cos_min - x * sin_min, 0.0));
        opti.subject_to(ge(x * sin_max - y * cos_max, 0.0));
    }
}

/// A planar constraint region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Set2d {
    Rectangular(RectangularSet2d),
    Linear(LinearSet2d),
    Elliptical(EllipticalSet2d),
    Cone(ConeSet2d),
}

impl Set2d {
    /// The single point `(x, y)`.
    pub fn point(x: f64, y: f64) -> Set2d {
        Set2d::Rectangular(RectangularSet2d::point(x, y))
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Set2d::Rectangular(set) => set.is_valid(),
            Set2d::Linear(set) => set.is_valid(),
            Set2d::Elliptical(set) => set.is_valid(),
            Set2d::Cone(set) => set.is_valid(),
        }
    }

    pub fn apply<O: Opti>(&self, opti: &mut O, x: &Expr, y: &Expr) {
        match self {
            Set2d::Rectangular(set) => set.apply(opti, x, y),
            Set2d::Linear(set) => set.apply(opti, x, y),
            Set2d::Elliptical(set) => set.apply(opti, x, y),
            Set2d::Cone(set) => set.apply(opti, x, y),
        }
    }
}
