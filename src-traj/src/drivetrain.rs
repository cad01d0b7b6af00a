use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One swerve module: an independently steered and driven wheel at a fixed
/// offset in the chassis frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwerveModule {
    /// Module position in the chassis frame (metres).
    pub x: f64,
    pub y: f64,
    /// Wheel radius (metres).
    pub wheel_radius: f64,
    /// Top wheel angular velocity (rad/s).
    pub wheel_max_angular_velocity: f64,
    /// Top wheel torque (N·m).
    pub wheel_max_torque: f64,
}

impl SwerveModule {
    pub fn new(
        x: f64,
        y: f64,
        wheel_radius: f64,
        wheel_max_angular_velocity: f64,
        wheel_max_torque: f64,
    ) -> SwerveModule {
        SwerveModule {
            x,
            y,
            wheel_radius,
            wheel_max_angular_velocity,
            wheel_max_torque,
        }
    }

    /// Top ground speed of the wheel contact patch (m/s).
    pub fn wheel_max_velocity(&self) -> f64 {
        self.wheel_radius * self.wheel_max_angular_velocity
    }

    /// Top ground force the wheel can transmit (N).
    pub fn wheel_max_force(&self) -> f64 {
        self.wheel_max_torque / self.wheel_radius
    }
}

/// A holonomic drivetrain built from swerve modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwerveDrivetrain {
    /// Chassis mass (kg).
    pub mass: f64,
    /// Chassis moment of inertia about the vertical axis (kg·m²).
    pub moment_of_inertia: f64,
    pub modules: Vec<SwerveModule>,
}

impl SwerveDrivetrain {
    pub fn new(mass: f64, moment_of_inertia: f64, modules: Vec<SwerveModule>) -> SwerveDrivetrain {
        SwerveDrivetrain {
            mass,
            moment_of_inertia,
            modules,
        }
    }

    /// The chassis speed no module can exceed: the slowest module's top
    /// wheel speed.
    pub fn top_wheel_speed(&self) -> f64 {
        self.modules
            .iter()
            .map(SwerveModule::wheel_max_velocity)
            .fold(f64::INFINITY, f64::min)
    }

    /// Largest module offset from the chassis origin.
    pub fn max_module_extent(&self) -> f64 {
        self.modules
            .iter()
            .map(|module| module.x.hypot(module.y))
            .fold(0.0, f64::max)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !(self.mass > 0.0) {
            return Err(Error::IncompatibleTrajectory(format!(
                "drivetrain mass must be positive, but is {}",
                self.mass
            )));
        }
        if !(self.moment_of_inertia > 0.0) {
            return Err(Error::IncompatibleTrajectory(format!(
                "drivetrain moment of inertia must be positive, but is {}",
                self.moment_of_inertia
            )));
        }
        if self.modules.is_empty() {
            return Err(Error::IncompatibleTrajectory(
                "drivetrain must have at least one module".to_string(),
            ));
        }
        for (index, module) in self.modules.iter().enumerate() {
            if !(module.wheel_radius > 0.0)
                || !(module.wheel_max_angular_velocity > 0.0)
                || !(module.wheel_max_torque > 0.0)
            {
                return Err(Error::IncompatibleTrajectory(format!(
                    "module {index} must have positive wheel radius, speed and torque limits"
                )));
            }
        }
        Ok(())
    }
}
