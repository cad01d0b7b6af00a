//! Assembly and solution of the trajectory NLP.

use holotraj_opti::{Expr, Opti, SlsqpOpti, eq, ge, le};

use crate::drivetrain::SwerveDrivetrain;
use crate::error::Error;
use crate::initial_guess::generate_initial_guess;
use crate::obstacle::Obstacle;
use crate::path::{Constraint, Path};
use crate::trajectory::{HolonomicState, HolonomicTrajectory, HolonomicTrajectorySample};

/// Hard bounds on every interval duration (s).
const MIN_INTERVAL_DURATION: f64 = 1e-6;
const MAX_INTERVAL_DURATION: f64 = 3.0;

/// Generate a time-optimal trajectory for `drivetrain` along `path` with the
/// default SLSQP backend.
///
/// Validation failures surface as [`Error::IncompatibleTrajectory`] before
/// any solver work; solver failures (including cancellation through
/// [`holotraj_opti::cancellation_flag`]) surface as
/// [`Error::TrajectoryGeneration`] and produce no partial trajectory.
pub fn generate(drivetrain: &SwerveDrivetrain, path: &Path) -> Result<HolonomicTrajectory, Error> {
    HolonomicTrajectoryOptimizationProblem::new(SlsqpOpti::new(), drivetrain, path)?.generate()
}

/// The trajectory NLP over a concrete backend.
///
/// Owns one decision variable per kinematic quantity and sample, one dt per
/// control interval, and world-frame force variables per module and sample.
/// Constraint application order is deterministic: kinematics, time,
/// waypoint/segment/global constraints in waypoint order, then dynamics.
pub struct HolonomicTrajectoryOptimizationProblem<O: Opti> {
    opti: O,
    sample_total: usize,
    dt: Vec<Expr>,
    x: Vec<Expr>,
    y: Vec<Expr>,
    theta: Vec<Expr>,
    vx: Vec<Expr>,
    vy: Vec<Expr>,
    omega: Vec<Expr>,
    ax: Vec<Expr>,
    ay: Vec<Expr>,
    alpha: Vec<Expr>,
}

impl<O: Opti> HolonomicTrajectoryOptimizationProblem<O> {
    /// Validate the inputs and assemble the full NLP on `opti`.
    pub fn new(mut opti: O, drivetrain: &SwerveDrivetrain, path: &Path) -> Result<Self, Error> {
        drivetrain.validate()?;
        path.validate()?;

        let sample_total = path.sample_total();

        let mut x = Vec::with_capacity(sample_total);
        let mut y = Vec::with_capacity(sample_total);
        let mut theta = Vec::with_capacity(sample_total);
        for _ in 0..sample_total {
            x.push(opti.decision_variable());
            y.push(opti.decision_variable());
            theta.push(opti.decision_variable());
        }

        let mut dt = Vec::with_capacity(sample_total - 1);
        for _ in 0..sample_total - 1 {
            dt.push(opti.decision_variable());
        }

        let mut vx = Vec::with_capacity(sample_total);
        let mut vy = Vec::with_capacity(sample_total);
        let mut omega = Vec::with_capacity(sample_total);
        let mut ax = Vec::with_capacity(sample_total);
        let mut ay = Vec::with_capacity(sample_total);
        let mut alpha = Vec::with_capacity(sample_total);
        for _ in 0..sample_total {
            vx.push(opti.decision_variable());
            vy.push(opti.decision_variable());
            omega.push(opti.decision_variable());
            ax.push(opti.decision_variable());
            ay.push(opti.decision_variable());
            alpha.push(opti.decision_variable());
        }

        Self::apply_kinematics_constraints(
            &mut opti, &dt, &x, &y, &theta, &vx, &vy, &omega, &ax, &ay, &alpha,
        );
        Self::apply_time_constraints(&mut opti, &dt, path);
        Self::apply_path_constraints(&mut opti, path, &x, &y, &theta, &vx, &vy, &omega);
        let (force_x, force_y) = Self::apply_dynamics_constraints(
            &mut opti, drivetrain, &theta, &vx, &vy, &omega, &ax, &ay, &alpha,
        );
        Self::apply_initial_guess(
            &mut opti, drivetrain, path, &dt, &x, &y, &theta, &vx, &vy, &omega, &ax, &ay, &alpha,
            &force_x, &force_y,
        );

        Ok(HolonomicTrajectoryOptimizationProblem {
            opti,
            sample_total,
            dt,
            x,
            y,
            theta,
            vx,
            vy,
            omega,
            ax,
            ay,
            alpha,
        })
    }

    /// Solve and extract the trajectory.
    pub fn generate(mut self) -> Result<HolonomicTrajectory, Error> {
        self.opti
            .solve()
            .map_err(|failure| Error::TrajectoryGeneration(failure.to_string()))?;
        Ok(self.construct_trajectory())
    }

    /// Forward-Euler integration, implicit on the state side: each identity
    /// uses the velocity at sample k, not k−1.
    #[allow(clippy::too_many_arguments)]
    fn apply_kinematics_constraints(
        opti: &mut O,
        dt: &[Expr],
        x: &[Expr],
        y: &[Expr],
        theta: &[Expr],
        vx: &[Expr],
        vy: &[Expr],
        omega: &[Expr],
        ax: &[Expr],
        ay: &[Expr],
        alpha: &[Expr],
    ) {
        for k in 1..x.len() {
            let sample_dt = &dt[k - 1];
            opti.subject_to(eq(&x[k - 1] + &vx[k] * sample_dt, &x[k]));
            opti.subject_to(eq(&y[k - 1] + &vy[k] * sample_dt, &y[k]));
            opti.subject_to(eq(&theta[k - 1] + &omega[k] * sample_dt, &theta[k]));
            opti.subject_to(eq(&vx[k - 1] + &ax[k] * sample_dt, &vx[k]));
            opti.subject_to(eq(&vy[k - 1] + &ay[k] * sample_dt, &vy[k]));
            opti.subject_to(eq(&omega[k - 1] + &alpha[k] * sample_dt, &omega[k]));
        }
    }

    /// dt bounds, uniform sampling within each segment, and the total-time
    /// objective.
    fn apply_time_constraints(opti: &mut O, dt: &[Expr], path: &Path) {
        for interval in dt {
            opti.subject_to(ge(interval, MIN_INTERVAL_DURATION));
            opti.subject_to(le(interval, MAX_INTERVAL_DURATION));
        }

        let mut cursor = 0usize;
        for waypoint in &path.waypoints[1..] {
            let n = waypoint.control_interval_count;
            for i in 1..n {
                opti.subject_to(eq(&dt[cursor + i], &dt[cursor + i - 1]));
            }
            cursor += n;
        }

        let mut total_time = Expr::constant(0.0);
        for interval in dt {
            total_time = total_time + interval;
        }
        opti.minimize(total_time);
    }

    /// Waypoint constraints bind the last sample of each waypoint's segment,
    /// segment constraints every other sample of the segment, and global
    /// constraints every sample.
    fn apply_path_constraints(
        opti: &mut O,
        path: &Path,
        x: &[Expr],
        y: &[Expr],
        theta: &[Expr],
        vx: &[Expr],
        vy: &[Expr],
        omega: &[Expr],
    ) {
        let apply_at = apply_constraints::<O>;

        apply_at(opti, path, 0, &path.global_constraints, x, y, theta, vx, vy, omega);
        apply_at(opti, path, 0, &path.waypoints[0].constraints, x, y, theta, vx, vy, omega);

        let mut cursor = 0usize;
        for waypoint in &path.waypoints[1..] {
            let n = waypoint.control_interval_count;
            for i in 1..n {
                apply_at(opti, path, cursor + i, &path.global_constraints, x, y, theta, vx, vy, omega);
                apply_at(opti, path, cursor + i, &waypoint.segment_constraints, x, y, theta, vx, vy, omega);
            }
            apply_at(opti, path, cursor + n, &path.global_constraints, x, y, theta, vx, vy, omega);
            apply_at(opti, path, cursor + n, &waypoint.constraints, x, y, theta, vx, vy, omega);
            cursor += n;
        }
    }

    /// Swerve dynamics at every sample: per-module ground speed and force
    /// limits, and the chassis force/torque balances. Returns the
    /// `[module][sample]` force variables for seeding.
    #[allow(clippy::too_many_arguments)]
    fn apply_dynamics_constraints(
        opti: &mut O,
        drivetrain: &SwerveDrivetrain,
        theta: &[Expr],
        vx: &[Expr],
        vy: &[Expr],
        omega: &[Expr],
        ax: &[Expr],
        ay: &[Expr],
        alpha: &[Expr],
    ) -> (Vec<Vec<Expr>>, Vec<Vec<Expr>>) {
        let module_count = drivetrain.modules.len();
        let mut force_x = vec![Vec::with_capacity(theta.len()); module_count];
        let mut force_y = vec![Vec::with_capacity(theta.len()); module_count];

        for k in 0..theta.len() {
            let sin_theta = theta[k].sin();
            let cos_theta = theta[k].cos();

            let mut net_force_x = Expr::constant(0.0);
            let mut net_force_y = Expr::constant(0.0);
            let mut net_torque = Expr::constant(0.0);

            for (m, module) in drivetrain.modules.iter().enumerate() {
                // module offset rotated into the field frame
                let offset_x = module.x * &cos_theta - module.y * &sin_theta;
                let offset_y = module.x * &sin_theta + module.y * &cos_theta;

                let module_vx = &vx[k] - &omega[k] * &offset_y;
                let module_vy = &vy[k] + &omega[k] * &offset_x;
                let top_speed = module.wheel_max_velocity();
                opti.subject_to(le(module_vx.sq() + module_vy.sq(), top_speed * top_speed));

                let fx = opti.decision_variable();
                let fy = opti.decision_variable();
                let top_force = module.wheel_max_force();
                opti.subject_to(le(fx.sq() + fy.sq(), top_force * top_force));

                net_force_x = net_force_x + &fx;
                net_force_y = net_force_y + &fy;
                net_torque = net_torque + (&offset_x * &fy - &offset_y * &fx);

                force_x[m].push(fx);
                force_y[m].push(fy);
            }

            opti.subject_to(eq(drivetrain.mass * &ax[k], net_force_x));
            opti.subject_to(eq(drivetrain.mass * &ay[k], net_force_y));
            opti.subject_to(eq(drivetrain.moment_of_inertia * &alpha[k], net_torque));
        }

        (force_x, force_y)
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_initial_guess(
        opti: &mut O,
        drivetrain: &SwerveDrivetrain,
        path: &Path,
        dt: &[Expr],
        x: &[Expr],
        y: &[Expr],
        theta: &[Expr],
        vx: &[Expr],
        vy: &[Expr],
        omega: &[Expr],
        ax: &[Expr],
        ay: &[Expr],
        alpha: &[Expr],
        force_x: &[Vec<Expr>],
        force_y: &[Vec<Expr>],
    ) {
        let guess = generate_initial_guess(drivetrain, path);

        for k in 0..x.len() {
            opti.set_initial(&x[k], guess.poses[[k, 0]]);
            opti.set_initial(&y[k], guess.poses[[k, 1]]);
            opti.set_initial(&theta[k], guess.poses[[k, 2]]);
            opti.set_initial(&vx[k], guess.velocities[[k, 0]]);
            opti.set_initial(&vy[k], guess.velocities[[k, 1]]);
            opti.set_initial(&omega[k], guess.velocities[[k, 2]]);
            opti.set_initial(&ax[k], guess.accelerations[[k, 0]]);
            opti.set_initial(&ay[k], guess.accelerations[[k, 1]]);
            opti.set_initial(&alpha[k], guess.accelerations[[k, 2]]);
        }
        for k in 0..dt.len() {
            opti.set_initial(&dt[k], guess.dt[k]);
        }

        // split the net seed force evenly across the modules
        let share = drivetrain.mass / drivetrain.modules.len() as f64;
        for m in 0..force_x.len() {
            for k in 0..x.len() {
                opti.set_initial(&force_x[m][k], share * guess.accelerations[[k, 0]]);
                opti.set_initial(&force_y[m][k], share * guess.accelerations[[k, 1]]);
            }
        }
    }

    fn state_at(&self, k: usize) -> HolonomicState {
        HolonomicState {
            x: self.opti.solution_value(&self.x[k]),
            y: self.opti.solution_value(&self.y[k]),
            heading: self.opti.solution_value(&self.theta[k]),
            vx: self.opti.solution_value(&self.vx[k]),
            vy: self.opti.solution_value(&self.vy[k]),
            omega: self.opti.solution_value(&self.omega[k]),
            ax: self.opti.solution_value(&self.ax[k]),
            ay: self.opti.solution_value(&self.ay[k]),
            alpha: self.opti.solution_value(&self.alpha[k]),
        }
    }

    fn construct_trajectory(&self) -> HolonomicTrajectory {
        let initial_state = self.state_at(0);
        let samples = (1..self.sample_total)
            .map(|k| {
                HolonomicTrajectorySample::new(
                    self.opti.solution_value(&self.dt[k - 1]),
                    self.state_at(k),
                )
            })
            .collect();
        HolonomicTrajectory::new(initial_state, samples)
    }
}

/// Emit the relations for a constraint list at one sample.
#[allow(clippy::too_many_arguments)]
fn apply_constraints<O: Opti>(
    opti: &mut O,
    path: &Path,
    sample: usize,
    constraints: &[Constraint],
    x: &[Expr],
    y: &[Expr],
    theta: &[Expr],
    vx: &[Expr],
    vy: &[Expr],
    omega: &[Expr],
) {
    for constraint in constraints {
        apply_constraint(
            opti,
            &path.bumpers,
            constraint,
            &x[sample],
            &y[sample],
            &theta[sample],
            &vx[sample],
            &vy[sample],
            &omega[sample],
        );
    }
}

/// Emit the relations for one constraint at one sample.
#[allow(clippy::too_many_arguments)]
fn apply_constraint<O: Opti>(
    opti: &mut O,
    bumpers: &Obstacle,
    constraint: &Constraint,
    x: &Expr,
    y: &Expr,
    theta: &Expr,
    vx: &Expr,
    vy: &Expr,
    omega: &Expr,
) {
    match constraint {
        Constraint::Translation(set) => set.apply(opti, x, y),
        Constraint::Heading(range) => range.apply(opti, theta),
        Constraint::Pose(set, range) => {
            set.apply(opti, x, y);
            range.apply(opti, theta);
        }
        Constraint::Velocity(set) => set.apply(opti, vx, vy),
        Constraint::AngularVelocity(range) => range.apply(opti, omega),
        Constraint::Obstacle(obstacle) => {
            apply_obstacle_constraint(opti, bumpers, obstacle, x, y, theta);
        }
    }
}

/// Keep the oriented bumper polygon at least the combined safety radius away
/// from the obstacle polygon: squared distance bounds for every bumper
/// corner against every obstacle vertex and edge, and every obstacle vertex
/// against every bumper edge.
fn apply_obstacle_constraint<O: Opti>(
    opti: &mut O,
    bumpers: &Obstacle,
    obstacle: &Obstacle,
    x: &Expr,
    y: &Expr,
    theta: &Expr,
) {
    let sin_theta = theta.sin();
    let cos_theta = theta.cos();

    let corners: Vec<(Expr, Expr)> = bumpers
        .points
        .iter()
        .map(|corner| {
            (
                x + corner.x * &cos_theta - corner.y * &sin_theta,
                y + corner.x * &sin_theta + corner.y * &cos_theta,
            )
        })
        .collect();

    let clearance = bumpers.safety_radius + obstacle.safety_radius;
    let clearance_sq = clearance * clearance;

    for (corner_x, corner_y) in &corners {
        for vertex in &obstacle.points {
            let dx = corner_x - vertex.x;
            let dy = corner_y - vertex.y;
            opti.subject_to(ge(dx.sq() + dy.sq(), clearance_sq));
        }
        for (a, b) in obstacle.edge_indices() {
            let ax = Expr::constant(obstacle.points[a].x);
            let ay = Expr::constant(obstacle.points[a].y);
            let bx = Expr::constant(obstacle.points[b].x);
            let by = Expr::constant(obstacle.points[b].y);
            let distance_sq = point_segment_distance_sq(corner_x, corner_y, &ax, &ay, &bx, &by);
            opti.subject_to(ge(distance_sq, clearance_sq));
        }
    }

    for vertex in &obstacle.points {
        let vertex_x = Expr::constant(vertex.x);
        let vertex_y = Expr::constant(vertex.y);
        for (a, b) in bumpers.edge_indices() {
            let (ax, ay) = &corners[a];
            let (bx, by) = &corners[b];
            let distance_sq = point_segment_distance_sq(&vertex_x, &vertex_y, ax, ay, bx, by);
            opti.subject_to(ge(distance_sq, clearance_sq));
        }
    }
}

/// Squared distance from `(px, py)` to the segment `(ax, ay)–(bx, by)`,
/// with the projection parameter clamped to the segment.
fn point_segment_distance_sq(
    px: &Expr,
    py: &Expr,
    ax: &Expr,
    ay: &Expr,
    bx: &Expr,
    by: &Expr,
) -> Expr {
    let dx = bx - ax;
    let dy = by - ay;
    let length_sq = dx.sq() + dy.sq();
    let t = ((px - ax) * &dx + (py - ay) * &dy) / &length_sq;
    let t = t.max(0.0).min(1.0);
    let closest_x = ax + &t * &dx;
    let closest_y = ay + &t * &dy;
    (px - &closest_x).sq() + (py - &closest_y).sq()
}
