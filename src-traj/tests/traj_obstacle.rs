use holotraj::{
	Constraint, HolonomicState, InitialGuessPoint, Obstacle, Path, SwerveDrivetrain, SwerveModule,
	Waypoint, generate,
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

const BUMPER_CORNERS: [(f64, f64); 4] = [(0.5, 0.5), (-0.5, 0.5), (-0.5, -0.5), (0.5, -0.5)];

fn bumpers() -> Obstacle {
	Obstacle::new(0.0, BUMPER_CORNERS)
}

fn point_segment_distance(px: f64, py: f64, a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let length_sq = dx * dx + dy * dy;
	let t = (((px - a.0) * dx + (py - a.1) * dy) / length_sq).clamp(0.0, 1.0);
	let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
	(px - cx).hypot(py - cy)
}

/// Distance from a field point to the oriented bumper polygon boundary.
fn bumper_clearance(state: &HolonomicState, px: f64, py: f64) -> f64 {
	let (sin, cos) = state.heading.sin_cos();
	let corners: Vec<(f64, f64)> = BUMPER_CORNERS
		.iter()
		.map(|(bx, by)| {
			(
				state.x + bx * cos - by * sin,
				state.y + bx * sin + by * cos,
			)
		})
		.collect();
	(0..corners.len())
		.map(|i| point_segment_distance(px, py, corners[i], corners[(i + 1) % corners.len()]))
		.fold(f64::INFINITY, f64::min)
}

#[test]
fn detour_clears_a_disc_obstacle() {
	let obstacle = Obstacle::disc(1.0, 2.0, 0.0);

	let mut finish = Waypoint::rest_pinned(4.0, 0.0, 0.0, 36);
	finish.segment_constraints.push(Constraint::Obstacle(obstacle));
	finish
		.initial_guess_points
		.insert(0, InitialGuessPoint::new(2.0, 1.6, 0.0));

	let path = Path::new(
		vec![Waypoint::rest_pinned(0.0, 0.0, 0.0, 0), finish],
		bumpers(),
	);

	let trajectory = generate(&drivetrain(), &path).expect("obstacle detour should solve");
	assert_eq!(trajectory.state_count(), 37);

	// the bumper polygon stays out of the disc at every sample
	for state in trajectory.states() {
		let clearance = bumper_clearance(state, 2.0, 0.0);
		assert!(
			clearance >= 1.0 - 1e-3,
			"bumpers {clearance} m from the obstacle centre at ({}, {})",
			state.x,
			state.y
		);
	}

	// going around costs time over the unobstructed dash
	let straight = Path::new(
		vec![
			Waypoint::rest_pinned(0.0, 0.0, 0.0, 0),
			Waypoint::rest_pinned(4.0, 0.0, 0.0, 30),
		],
		bumpers(),
	);
	let straight_time = generate(&drivetrain(), &straight)
		.expect("unobstructed dash should solve")
		.total_time();
	assert!(
		trajectory.total_time() > straight_time,
		"detour {} s not slower than straight {} s",
		trajectory.total_time(),
		straight_time
	);
}
