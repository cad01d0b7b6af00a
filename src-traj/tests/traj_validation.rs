use holotraj::{
	Constraint, EllipticalDirection, EllipticalSet2d, Error, Obstacle, ObstaclePoint, Path, Set2d,
	SwerveDrivetrain, SwerveModule, Waypoint, generate,
};

fn drivetrain() -> SwerveDrivetrain {
	SwerveDrivetrain::new(
		45.0,
		6.0,
		vec![
			SwerveModule::new(0.6, 0.6, 0.04, 70.0, 2.0),
			SwerveModule::new(0.6, -0.6, 0.04, 70.0, 2.0),
			SwerveModule::new(-0.6, 0.6, 0.04, 70.0, 2.0),
			SwerveModule::new(-0.6, -0.6, 0.04, 70.0, 2.0),
		],
	)
}

fn bumpers() -> Obstacle {
	Obstacle::new(0.0, [(0.5, 0.5), (-0.5, 0.5), (-0.5, -0.5), (0.5, -0.5)])
}

fn expect_incompatible(result: Result<holotraj::HolonomicTrajectory, Error>) {
	match result {
		Err(Error::IncompatibleTrajectory(_)) => {}
		Err(other) => panic!("expected an incompatible-trajectory error, got {other}"),
		Ok(_) => panic!("ill-formed input produced a trajectory"),
	}
}

#[test]
fn negative_ellipse_radius_is_rejected_at_build_time() {
	let bad_set = EllipticalSet2d::new(-1.0, 1.0, EllipticalDirection::Inside);
	assert!(!bad_set.is_valid());

	let mut finish = Waypoint::rest_pinned(4.0, 0.0, 0.0, 10);
	finish
		.constraints
		.push(Constraint::Translation(Set2d::Elliptical(bad_set)));
	let path = Path::new(
		vec![Waypoint::rest_pinned(0.0, 0.0, 0.0, 0), finish],
		bumpers(),
	);
	expect_incompatible(generate(&drivetrain(), &path));
}

#[test]
fn empty_interior_segment_is_rejected() {
	let path = Path::new(
		vec![
			Waypoint::rest_pinned(0.0, 0.0, 0.0, 0),
			Waypoint::pose_pinned(2.0, 0.0, 0.0, 0),
			Waypoint::rest_pinned(4.0, 0.0, 0.0, 10),
		],
		bumpers(),
	);
	expect_incompatible(generate(&drivetrain(), &path));
}

#[test]
fn single_waypoint_path_is_rejected() {
	let path = Path::new(vec![Waypoint::rest_pinned(0.0, 0.0, 0.0, 0)], bumpers());
	expect_incompatible(generate(&drivetrain(), &path));
}

#[test]
fn leading_waypoint_with_intervals_is_rejected() {
	let path = Path::new(
		vec![
			Waypoint::rest_pinned(0.0, 0.0, 0.0, 8),
			Waypoint::rest_pinned(4.0, 0.0, 0.0, 10),
		],
		bumpers(),
	);
	expect_incompatible(generate(&drivetrain(), &path));
}

#[test]
fn negative_obstacle_safety_radius_is_rejected() {
	let mut finish = Waypoint::rest_pinned(4.0, 0.0, 0.0, 10);
	finish
		.segment_constraints
		.push(Constraint::Obstacle(Obstacle::disc(-0.5, 2.0, 0.0)));
	let path = Path::new(
		vec![Waypoint::rest_pinned(0.0, 0.0, 0.0, 0), finish],
		bumpers(),
	);
	expect_incompatible(generate(&drivetrain(), &path));
}

#[test]
fn empty_bumper_polygon_is_rejected() {
	let path = Path::new(
		vec![
			Waypoint::rest_pinned(0.0, 0.0, 0.0, 0),
			Waypoint::rest_pinned(4.0, 0.0, 0.0, 10),
		],
		Obstacle::new(0.0, Vec::<ObstaclePoint>::new()),
	);
	expect_incompatible(generate(&drivetrain(), &path));
}

#[test]
fn non_positive_drivetrain_parameters_are_rejected() {
	let path = Path::new(
		vec![
			Waypoint::rest_pinned(0.0, 0.0, 0.0, 0),
			Waypoint::rest_pinned(4.0, 0.0, 0.0, 10),
		],
		bumpers(),
	);

	let mut massless = drivetrain();
	massless.mass = 0.0;
	expect_incompatible(generate(&massless, &path));

	let mut no_modules = drivetrain();
	no_modules.modules.clear();
	expect_incompatible(generate(&no_modules, &path));
}
