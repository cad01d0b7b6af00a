use serde::{Deserialize, Serialize};

/// The chassis state at one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HolonomicState {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub vx: f64,
    pub vy: f64,
    pub omega: f64,
    pub ax: f64,
    pub ay: f64,
    pub alpha: f64,
}

/// One trajectory sample: the duration of the interval leading into it and
/// the state reached at its end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HolonomicTrajectorySample {
    pub interval_duration: f64,
    pub state: HolonomicState,
}

impl HolonomicTrajectorySample {
    pub fn new(interval_duration: f64, state: HolonomicState) -> HolonomicTrajectorySample {
        HolonomicTrajectorySample {
            interval_duration,
            state,
        }
    }
}

/// A solved trajectory: the initial state plus one sample per control
/// interval. A pure value; rebuilding it from its `(dt, state)` tuples
/// reproduces it exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolonomicTrajectory {
    pub initial_state: HolonomicState,
    pub samples: Vec<HolonomicTrajectorySample>,
}

impl HolonomicTrajectory {
    pub fn new(
        initial_state: HolonomicState,
        samples: Vec<HolonomicTrajectorySample>,
    ) -> HolonomicTrajectory {
        HolonomicTrajectory {
            initial_state,
            samples,
        }
    }

    /// Number of states, including the initial one.
    pub fn state_count(&self) -> usize {
        1 + self.samples.len()
    }

    /// Total traversal time.
    pub fn total_time(&self) -> f64 {
        self.samples
            .iter()
            .map(|sample| sample.interval_duration)
            .sum()
    }

    /// All states in order, starting with the initial state.
    pub fn states(&self) -> impl Iterator<Item = &HolonomicState> {
        std::iter::once(&self.initial_state).chain(self.samples.iter().map(|sample| &sample.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(x: f64) -> HolonomicState {
        HolonomicState {
            x,
            y: 0.0,
            heading: 0.0,
            vx: 1.0,
            vy: 0.0,
            omega: 0.0,
            ax: 0.0,
            ay: 0.0,
            alpha: 0.0,
        }
    }

    #[test]
    fn counting_and_total_time() {
        let trajectory = HolonomicTrajectory::new(
            state(0.0),
            vec![
                HolonomicTrajectorySample::new(0.5, state(0.5)),
                HolonomicTrajectorySample::new(0.5, state(1.0)),
            ],
        );
        assert_eq!(trajectory.state_count(), 3);
        assert!((trajectory.total_time() - 1.0).abs() < 1e-12);
        assert_eq!(trajectory.states().count(), 3);
    }

    #[test]
    fn serde_round_trip_is_lossless() {
        let trajectory = HolonomicTrajectory::new(
            state(0.0),
            vec![
                HolonomicTrajectorySample::new(0.125, state(0.125)),
                HolonomicTrajectorySample::new(0.125, state(0.25)),
            ],
        );
        let json = serde_json::to_string(&trajectory).unwrap();
        let decoded: HolonomicTrajectory = serde_json::from_str(&json).unwrap();
        assert_eq!(trajectory, decoded);
    }

    #[test]
    fn rebuilding_from_samples_is_identity() {
        let trajectory = HolonomicTrajectory::new(
            state(0.0),
            vec![HolonomicTrajectorySample::new(0.25, state(0.25))],
        );
        let rebuilt = HolonomicTrajectory::new(
            trajectory.initial_state,
            trajectory
                .samples
                .iter()
                .map(|sample| HolonomicTrajectorySample::new(sample.interval_duration, sample.state))
                .collect(),
        );
        assert_eq!(trajectory, rebuilt);
    }
}
