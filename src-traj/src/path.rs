//! Declarative path description: waypoints, constraints and initial guesses.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::obstacle::Obstacle;
use crate::set::{IntervalSet1d, RectangularSet2d, Set2d};

/// A seed pose for the solver, in field coordinates with an unwrapped
/// heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialGuessPoint {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl InitialGuessPoint {
    pub fn new(x: f64, y: f64, heading: f64) -> InitialGuessPoint {
        InitialGuessPoint { x, y, heading }
    }
}

/// A constraint on the chassis state at a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    /// Position lies in the set.
    Translation(Set2d),
    /// Heading lies in the interval.
    Heading(IntervalSet1d),
    /// Position and heading constrained together.
    Pose(Set2d, IntervalSet1d),
    /// Velocity vector lies in the set.
    Velocity(Set2d),
    /// Angular velocity lies in the interval.
    AngularVelocity(IntervalSet1d),
    /// Bumpers stay clear of the obstacle.
    Obstacle(Obstacle),
}

impl Constraint {
    pub fn is_valid(&self) -> bool {
        match self {
            Constraint::Translation(set) | Constraint::Velocity(set) => set.is_valid(),
            Constraint::Heading(range) | Constraint::AngularVelocity(range) => range.is_valid(),
            Constraint::Pose(set, range) => set.is_valid() && range.is_valid(),
            Constraint::Obstacle(obstacle) => obstacle.is_valid(),
        }
    }
}

/// A target chassis state along the path.
///
/// `constraints` bind the sample ending this waypoint's segment;
/// `segment_constraints` bind every other sample of the segment.
/// `control_interval_count` sets the segment's resolution (0 for the leading
/// waypoint only). `initial_guess_points` are distributed between the
/// previous waypoint and this one, the last being this waypoint's own pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub constraints: Vec<Constraint>,
    pub segment_constraints: Vec<Constraint>,
    pub control_interval_count: usize,
    pub initial_guess_points: Vec<InitialGuessPoint>,
}

impl Waypoint {
    pub fn new(
        constraints: Vec<Constraint>,
        segment_constraints: Vec<Constraint>,
        control_interval_count: usize,
        initial_guess_points: Vec<InitialGuessPoint>,
    ) -> Waypoint {
        Waypoint {
            constraints,
            segment_constraints,
            control_interval_count,
            initial_guess_points,
        }
    }

    /// A waypoint pinned to a pose, leaving velocities free.
    pub fn pose_pinned(x: f64, y: f64, heading: f64, control_interval_count: usize) -> Waypoint {
        Waypoint::new(
            vec![
                Constraint::Translation(Set2d::point(x, y)),
                Constraint::Heading(IntervalSet1d::exact(heading)),
            ],
            Vec::new(),
            control_interval_count,
            vec![InitialGuessPoint::new(x, y, heading)],
        )
    }

    /// A waypoint pinned to a pose at a full stop.
    pub fn rest_pinned(x: f64, y: f64, heading: f64, control_interval_count: usize) -> Waypoint {
        let mut waypoint = Waypoint::pose_pinned(x, y, heading, control_interval_count);
        waypoint
            .constraints
            .push(Constraint::Velocity(Set2d::Rectangular(
                RectangularSet2d::point(0.0, 0.0),
            )));
        waypoint
            .constraints
            .push(Constraint::AngularVelocity(IntervalSet1d::exact(0.0)));
        waypoint
    }

    /// The waypoint's own pose guess (the last initial-guess point).
    pub(crate) fn pose_guess(&self) -> InitialGuessPoint {
        self.initial_guess_points[self.initial_guess_points.len() - 1]
    }
}

/// An ordered sequence of waypoints with path-wide constraints and the
/// chassis footprint used for obstacle clearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub waypoints: Vec<Waypoint>,
    pub global_constraints: Vec<Constraint>,
    pub bumpers: Obstacle,
}

impl Path {
    pub fn new(waypoints: Vec<Waypoint>, bumpers: Obstacle) -> Path {
        Path {
            waypoints,
            global_constraints: Vec::new(),
            bumpers,
        }
    }

    /// Total number of samples: one for the leading waypoint plus each
    /// segment's control intervals.
    pub fn sample_total(&self) -> usize {
        1 + self
            .waypoints
            .iter()
            .map(|waypoint| waypoint.control_interval_count)
            .sum::<usize>()
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.waypoints.len() < 2 {
            return Err(Error::IncompatibleTrajectory(format!(
                "path must have at least 2 waypoints, but has {}",
                self.waypoints.len()
            )));
        }
        if self.waypoints[0].control_interval_count != 0 {
            return Err(Error::IncompatibleTrajectory(format!(
                "the leading waypoint must have 0 control intervals, but has {}",
                self.waypoints[0].control_interval_count
            )));
        }
        for (index, waypoint) in self.waypoints.iter().enumerate() {
            if index > 0 && waypoint.control_interval_count == 0 {
                return Err(Error::IncompatibleTrajectory(format!(
                    "waypoint {index} has an empty segment (0 control intervals)"
                )));
            }
            if waypoint.initial_guess_points.is_empty() {
                return Err(Error::IncompatibleTrajectory(format!(
                    "waypoint {index} has no initial guess points"
                )));
            }
            for constraint in waypoint
                .constraints
                .iter()
                .chain(waypoint.segment_constraints.iter())
            {
                validate_constraint(constraint, &format!("waypoint {index}"))?;
            }
            // elliptical position constraints must admit the waypoint's own
            // pose guess, or the seed starts in an excluded region
            let guess = waypoint.pose_guess();
            for constraint in &waypoint.constraints {
                if let Constraint::Translation(Set2d::Elliptical(set))
                | Constraint::Pose(Set2d::Elliptical(set), _) = constraint
                {
                    set.check_vector(guess.x, guess.y)?;
                }
            }
        }
        for constraint in &self.global_constraints {
            validate_constraint(constraint, "path")?;
        }
        if !self.bumpers.is_valid() {
            return Err(Error::IncompatibleTrajectory(
                "bumpers must have a non-negative safety radius and at least one point".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_constraint(constraint: &Constraint, owner: &str) -> Result<(), Error> {
    if !constraint.is_valid() {
        return Err(Error::IncompatibleTrajectory(format!(
            "{owner} has an ill-formed constraint: {constraint:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bumpers() -> Obstacle {
        Obstacle::new(0.0, [(0.5, 0.5), (-0.5, 0.5), (-0.5, -0.5), (0.5, -0.5)])
    }

    #[test]
    fn sample_total_counts_segments() {
        let path = Path::new(
            vec![
                Waypoint::rest_pinned(0.0, 0.0, 0.0, 0),
                Waypoint::pose_pinned(2.0, 0.0, 0.0, 10),
                Waypoint::rest_pinned(4.0, 0.0, 0.0, 20),
            ],
            bumpers(),
        );
        assert_eq!(path.sample_total(), 31);
        assert!(path.validate().is_ok());
    }

    #[test]
    fn too_few_waypoints_rejected() {
        let path = Path::new(vec![Waypoint::rest_pinned(0.0, 0.0, 0.0, 0)], bumpers());
        assert!(matches!(
            path.validate(),
            Err(Error::IncompatibleTrajectory(_))
        ));
    }

    #[test]
    fn leading_waypoint_must_have_no_intervals() {
        let path = Path::new(
            vec![
                Waypoint::rest_pinned(0.0, 0.0, 0.0, 5),
                Waypoint::rest_pinned(4.0, 0.0, 0.0, 10),
            ],
            bumpers(),
        );
        assert!(path.validate().is_err());
    }

    #[test]
    fn empty_interior_segment_rejected() {
        let path = Path::new(
            vec![
                Waypoint::rest_pinned(0.0, 0.0, 0.0, 0),
                Waypoint::pose_pinned(2.0, 0.0, 0.0, 0),
                Waypoint::rest_pinned(4.0, 0.0, 0.0, 10),
            ],
            bumpers(),
        );
        assert!(path.validate().is_err());
    }

    #[test]
    fn elliptical_position_constraint_must_admit_the_pose_guess() {
        use crate::set::{EllipticalDirection, EllipticalSet2d};
        let mut finish = Waypoint::rest_pinned(4.0, 0.0, 0.0, 10);
        finish
            .constraints
            .push(Constraint::Translation(Set2d::Elliptical(
                EllipticalSet2d::circular(1.0, EllipticalDirection::Inside),
            )));
        let path = Path::new(
            vec![Waypoint::rest_pinned(0.0, 0.0, 0.0, 0), finish],
            bumpers(),
        );
        let message = path.validate().unwrap_err().to_string();
        assert!(message.contains("not on or inside"));
    }

    #[test]
    fn waypoint_needs_a_guess_point() {
        let mut waypoint = Waypoint::rest_pinned(4.0, 0.0, 0.0, 10);
        waypoint.initial_guess_points.clear();
        let path = Path::new(
            vec![Waypoint::rest_pinned(0.0, 0.0, 0.0, 0), waypoint],
            bumpers(),
        );
        assert!(path.validate().is_err());
    }
}
