use thiserror::Error;

/// Failures surfaced by trajectory generation.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The path, drivetrain or one of their constraint sets is ill-formed.
    /// Raised during problem construction, before any solver work.
    #[error("incompatible trajectory: {0}")]
    IncompatibleTrajectory(String),

    /// The NLP solve failed, diverged or was cancelled. Carries the backend
    /// message verbatim; no partial trajectory is produced.
    #[error("trajectory generation failed: {0}")]
    TrajectoryGeneration(String),
}
