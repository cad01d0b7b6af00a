//! HoloTraj - time-optimal trajectory generation for holonomic drivetrains
//!
//! This program is free software: you can redistribute it and/or modify
//! it under the terms of the GNU General Public License as published by
//! the Free Software Foundation, either version 3 of the License, or
//! (at your option) any later version.
//!
//! This program is distributed in the hope that it will be useful,
//! but WITHOUT ANY WARRANTY; without even the implied warranty of
//! MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//! GNU General Public License for more details.
//!
//! You should have received a copy of the GNU General Public License
//! along with this program.  If not, see <https://www.gnu.org/licenses/>.
//!
//! A declarative [`Path`] (waypoints, constraint sets, obstacles, initial
//! guesses) and a [`SwerveDrivetrain`] model are translated into a nonlinear
//! program over per-sample kinematics, per-interval durations and per-module
//! forces, seeded from cubic Hermite pose splines and solved through the
//! [`holotraj_opti`] backend. [`generate`] returns the time-optimal
//! [`HolonomicTrajectory`] or an [`Error`].

// Re-export the modelling facade
pub use holotraj_opti as opti;

/// Drivetrain models
pub mod drivetrain;
/// Error types
pub mod error;
/// Seed assignment for the solver
pub mod initial_guess;
/// Obstacles and bumpers
pub mod obstacle;
/// Paths, waypoints and constraints
pub mod path;
/// The trajectory optimization problem
pub mod problem;
/// Constraint sets over ℝ and ℝ²
pub mod set;
/// Cubic Hermite pose splines
pub mod spline;
/// Trajectory values
pub mod trajectory;

// Re-export commonly used items
pub use drivetrain::{SwerveDrivetrain, SwerveModule};
pub use error::Error;
pub use obstacle::{Obstacle, ObstaclePoint};
pub use path::{Constraint, InitialGuessPoint, Path, Waypoint};
pub use problem::{HolonomicTrajectoryOptimizationProblem, generate};
pub use set::{
    ConeSet2d, EllipticalDirection, EllipticalSet2d, IntervalSet1d, LinearSet2d, RectangularSet2d,
    Set2d,
};
pub use trajectory::{HolonomicState, HolonomicTrajectory, HolonomicTrajectorySample};
