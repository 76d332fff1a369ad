//! Environment abstraction consumed by the trainer.
//!
//! A CPG environment owns one oscillator per leg (see [`crate::cpg::CpgBank`])
//! and turns each policy action into per-leg parameter deltas whose foot
//! targets drive the simulated joints. The physics lives outside this crate.

use std::collections::HashMap;

/// Extra per-step diagnostics reported by an environment.
pub type StepInfo = HashMap<String, f32>;

/// Result from stepping an environment once.
#[derive(Debug, Clone, Default)]
pub struct EnvStep {
    /// Observation after the step [observation_dim]
    pub observation: Vec<f32>,
    /// Reward received
    pub reward: f32,
    /// Episode ended (goal, failure, or the environment's own time limit)
    pub done: bool,
    /// Named diagnostics (not used for learning)
    pub info: StepInfo,
}

impl EnvStep {
    /// Create a new step result with empty info.
    pub fn new(observation: Vec<f32>, reward: f32, done: bool) -> Self {
        Self {
            observation,
            reward,
            done,
            info: StepInfo::new(),
        }
    }

    /// Attach a named diagnostic.
    pub fn with_info(mut self, key: impl Into<String>, value: f32) -> Self {
        self.info.insert(key.into(), value);
        self
    }
}

/// Single (non-vectorized) continuous-action environment.
///
/// The trainer checks every returned observation against
/// [`Environment::observation_dim`] and fails the run on a mismatch.
pub trait Environment {
    /// Size of the observation vector.
    fn observation_dim(&self) -> usize;

    /// Size of the action vector.
    fn action_dim(&self) -> usize;

    /// Start a new episode and return its first observation.
    fn reset(&mut self) -> Vec<f32>;

    /// Apply one action.
    fn step(&mut self, action: &[f32]) -> EnvStep;

    /// Release resources. Called once when training ends.
    fn close(&mut self) {}
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn observation_dim(&self) -> usize {
        (**self).observation_dim()
    }

    fn action_dim(&self) -> usize {
        (**self).action_dim()
    }

    fn reset(&mut self) -> Vec<f32> {
        (**self).reset()
    }

    fn step(&mut self, action: &[f32]) -> EnvStep {
        (**self).step(action)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpg::CpgBank;

    /// Observation is the flattened foot targets of a two-leg bank.
    struct TwoLegEnv {
        bank: CpgBank,
        steps: usize,
        closed: bool,
    }

    impl TwoLegEnv {
        fn new() -> Self {
            Self {
                bank: CpgBank::new(0.01, &[0.0, std::f32::consts::PI]),
                steps: 0,
                closed: false,
            }
        }
    }

    impl Environment for TwoLegEnv {
        fn observation_dim(&self) -> usize {
            2 * self.bank.n_legs()
        }

        fn action_dim(&self) -> usize {
            self.bank.action_dim()
        }

        fn reset(&mut self) -> Vec<f32> {
            self.bank.reset();
            self.steps = 0;
            vec![0.0; self.observation_dim()]
        }

        fn step(&mut self, action: &[f32]) -> EnvStep {
            self.steps += 1;
            match self.bank.update(action) {
                Ok(targets) => {
                    let observation = targets.iter().flat_map(|t| [t.x, t.z]).collect();
                    EnvStep::new(observation, 1.0, self.steps >= 3)
                        .with_info("steps", self.steps as f32)
                }
                Err(_) => EnvStep::new(vec![], 0.0, true),
            }
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    #[test]
    fn test_cpg_environment_roundtrip() {
        let mut env = TwoLegEnv::new();
        assert_eq!(env.action_dim(), 6);

        let obs = env.reset();
        assert_eq!(obs.len(), env.observation_dim());

        let step = env.step(&[0.0; 6]);
        assert_eq!(step.observation.len(), 4);
        assert!(!step.done);
        assert_eq!(step.info.get("steps"), Some(&1.0));

        env.step(&[0.0; 6]);
        assert!(env.step(&[0.0; 6]).done);

        env.close();
        assert!(env.closed);
    }

    #[test]
    fn test_boxed_environment_forwards_calls() {
        let mut env: Box<dyn Environment> = Box::new(TwoLegEnv::new());

        assert_eq!(env.observation_dim(), 4);
        env.reset();
        assert!(env.step(&[1.0]).observation.is_empty());
        env.close();
    }

    #[test]
    fn test_default_close_is_noop() {
        struct Bare;
        impl Environment for Bare {
            fn observation_dim(&self) -> usize {
                1
            }
            fn action_dim(&self) -> usize {
                1
            }
            fn reset(&mut self) -> Vec<f32> {
                vec![0.0]
            }
            fn step(&mut self, _action: &[f32]) -> EnvStep {
                EnvStep::new(vec![0.0], 0.0, true)
            }
        }

        let mut env = Bare;
        env.close();
        assert_eq!(env.reset(), vec![0.0]);
    }
}
