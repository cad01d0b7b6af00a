//! Seed assignment for the trajectory NLP.
//!
//! The seed influences convergence, never feasibility: every segment's guess
//! poses come from a cubic Hermite spline through its control points, dt from
//! a nominal schedule derived from the drivetrain limits, and velocities and
//! accelerations from the same implicit-Euler differences the kinematic
//! constraints use, so the seed satisfies those identically.

use ndarray::{Array1, Array2};

use crate::drivetrain::SwerveDrivetrain;
use crate::path::Path;
use crate::spline::PoseSpline;

/// Fraction of the wheel-speed limit the seed schedule assumes.
const NOMINAL_SPEED_FRACTION: f64 = 0.8;
/// Smallest seeded interval duration (s).
const MIN_SEED_DT: f64 = 0.01;

/// A complete initial assignment for the decision variables.
#[derive(Debug, Clone)]
pub struct InitialGuess {
    /// Sample poses, S×3 (x, y, heading).
    pub poses: Array2<f64>,
    /// Interval durations, length S−1.
    pub dt: Array1<f64>,
    /// Sample velocities, S×3 (vx, vy, omega).
    pub velocities: Array2<f64>,
    /// Sample accelerations, S×3 (ax, ay, alpha).
    pub accelerations: Array2<f64>,
}

/// Build the seed for a validated path. Waypoint `i` contributes its
/// `control_interval_count` samples, interpolated along the pose spline from
/// the previous waypoint's pose through waypoint `i`'s guess points.
pub fn generate_initial_guess(drivetrain: &SwerveDrivetrain, path: &Path) -> InitialGuess {
    let sample_total = path.sample_total();
    let mut poses = Array2::zeros((sample_total, 3));
    let mut dt = Array1::zeros(sample_total - 1);

    let nominal_speed = NOMINAL_SPEED_FRACTION * drivetrain.top_wheel_speed();
    let nominal_angular_speed = nominal_speed / drivetrain.max_module_extent().max(1e-6);

    let first = path.waypoints[0].pose_guess();
    poses[[0, 0]] = first.x;
    poses[[0, 1]] = first.y;
    poses[[0, 2]] = first.heading;

    let mut cursor = 0usize;
    let mut previous = first;
    for waypoint in &path.waypoints[1..] {
        let mut control = vec![previous];
        control.extend(waypoint.initial_guess_points.iter().copied());
        let spline = PoseSpline::through(&control);

        let n = waypoint.control_interval_count;
        let spans = spline.span_count() as f64;
        for i in 1..=n {
            let pose = spline.sample(i as f64 / n as f64 * spans);
            poses[[cursor + i, 0]] = pose.x;
            poses[[cursor + i, 1]] = pose.y;
            poses[[cursor + i, 2]] = pose.heading;
        }

        let segment_time = (spline.arc_length_estimate() / nominal_speed)
            .max(spline.heading_span() / nominal_angular_speed);
        let interval = (segment_time / n as f64).max(MIN_SEED_DT);
        for i in 0..n {
            dt[cursor + i] = interval;
        }

        cursor += n;
        previous = waypoint.pose_guess();
    }

    let mut velocities = Array2::zeros((sample_total, 3));
    let mut accelerations = Array2::zeros((sample_total, 3));
    for k in 1..sample_total {
        for channel in 0..3 {
            velocities[[k, channel]] =
                (poses[[k, channel]] - poses[[k - 1, channel]]) / dt[k - 1];
        }
    }
    for k in 1..sample_total {
        for channel in 0..3 {
            accelerations[[k, channel]] =
                (velocities[[k, channel]] - velocities[[k - 1, channel]]) / dt[k - 1];
        }
    }

    InitialGuess {
        poses,
        dt,
        velocities,
        accelerations,
    }
}
