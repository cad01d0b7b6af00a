//! Cubic Hermite splines through pose control points.

use crate::path::InitialGuessPoint;

/// A C¹ cubic Hermite interpolant through a sequence of values, one unit of
/// parameter per span. Tangents are Catmull-Rom in the interior and
/// one-sided at the ends, so the curve passes through every control value in
/// order.
#[derive(Debug, Clone)]
pub struct CubicHermiteSpline1d {
    values: Vec<f64>,
    tangents: Vec<f64>,
}

impl CubicHermiteSpline1d {
    /// Fit through `values` (at least two).
    pub fn from_values(values: &[f64]) -> CubicHermiteSpline1d {
        let n = values.len();
        let mut tangents = vec![0.0; n];
        tangents[0] = values[1] - values[0];
        tangents[n - 1] = values[n - 1] - values[n - 2];
        for i in 1..n - 1 {
            tangents[i] = (values[i + 1] - values[i - 1]) / 2.0;
        }
        CubicHermiteSpline1d {
            values: values.to_vec(),
            tangents,
        }
    }

    pub fn span_count(&self) -> usize {
        self.values.len() - 1
    }

    /// Evaluate at `u` in `[0, span_count]`; out-of-range parameters clamp.
    pub fn position(&self, u: f64) -> f64 {
        let spans = self.span_count();
        let u = u.clamp(0.0, spans as f64);
        let span = (u.floor() as usize).min(spans - 1);
        let t = u - span as f64;

        let h00 = 2.0 * t.powi(3) - 3.0 * t.powi(2) + 1.0;
        let h10 = t.powi(3) - 2.0 * t.powi(2) + t;
        let h01 = -2.0 * t.powi(3) + 3.0 * t.powi(2);
        let h11 = t.powi(3) - t.powi(2);

        h00 * self.values[span]
            + h10 * self.tangents[span]
            + h01 * self.values[span + 1]
            + h11 * self.tangents[span + 1]
    }
}

/// Cubic Hermite interpolation of full poses: x, y and unwrapped heading
/// splined independently over a shared parameter.
#[derive(Debug, Clone)]
pub struct PoseSpline {
    x: CubicHermiteSpline1d,
    y: CubicHermiteSpline1d,
    heading: CubicHermiteSpline1d,
}

impl PoseSpline {
    /// Fit through the control poses (at least two).
    pub fn through(points: &[InitialGuessPoint]) -> PoseSpline {
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        let headings: Vec<f64> = points.iter().map(|p| p.heading).collect();
        PoseSpline {
            x: CubicHermiteSpline1d::from_values(&xs),
            y: CubicHermiteSpline1d::from_values(&ys),
            heading: CubicHermiteSpline1d::from_values(&headings),
        }
    }

    pub fn span_count(&self) -> usize {
        self.x.span_count()
    }

    pub fn sample(&self, u: f64) -> InitialGuessPoint {
        InitialGuessPoint::new(self.x.position(u), self.y.position(u), self.heading.position(u))
    }

    /// Polyline estimate of the curve's arc length.
    pub fn arc_length_estimate(&self) -> f64 {
        let subdivisions = 8 * self.span_count();
        let step = self.span_count() as f64 / subdivisions as f64;
        let mut length = 0.0;
        let mut previous = self.sample(0.0);
        for i in 1..=subdivisions {
            let current = self.sample(i as f64 * step);
            length += (current.x - previous.x).hypot(current.y - previous.y);
            previous = current;
        }
        length
    }

    /// Total heading travel over the control values.
    pub fn heading_span(&self) -> f64 {
        self.heading
            .values
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).abs())
            .sum()
    }
}
