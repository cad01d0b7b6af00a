use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use holotraj::opti::cancellation_flag;
use holotraj::{
	Constraint, Error, InitialGuessPoint, Obstacle, Path, SwerveDrivetrain, SwerveModule,
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

fn bumpers() -> Obstacle {
	Obstacle::new(0.0, [(0.5, 0.5), (-0.5, 0.5), (-0.5, -0.5), (0.5, -0.5)])
}

fn obstacle_path() -> Path {
	let mut finish = Waypoint::rest_pinned(4.0, 0.0, 0.0, 36);
	finish
		.segment_constraints
		.push(Constraint::Obstacle(Obstacle::disc(1.0, 2.0, 0.0)));
	finish
		.initial_guess_points
		.insert(0, InitialGuessPoint::new(2.0, 1.6, 0.0));
	Path::new(vec![Waypoint::rest_pinned(0.0, 0.0, 0.0, 0), finish], bumpers())
}

// A single test: the cancellation flag is process-wide, so a concurrent
// second solve in this binary would race with the canceller thread.
#[test]
fn cancellation_aborts_the_solve_and_clears_for_the_next() {
	let canceller = thread::spawn(|| {
		thread::sleep(Duration::from_millis(100));
		cancellation_flag().store(1, Ordering::SeqCst);
	});

	let result = generate(&drivetrain(), &obstacle_path());
	canceller.join().unwrap();

	match result {
		Err(Error::TrajectoryGeneration(message)) => {
			assert!(
				message.contains("cancelled"),
				"unexpected failure message: {message}"
			);
		}
		Err(other) => panic!("unexpected error kind: {other}"),
		Ok(_) => panic!("cancelled solve produced a trajectory"),
	}

	// the flag is cleared at the start of every solve, so a stale request
	// does not poison the next one
	let short = Path::new(
		vec![
			Waypoint::rest_pinned(0.0, 0.0, 0.0, 0),
			Waypoint::rest_pinned(0.5, 0.0, 0.0, 4),
		],
		bumpers(),
	);
	let trajectory = generate(&drivetrain(), &short).expect("solve after cancellation should work");
	assert_eq!(trajectory.state_count(), 5);
}
