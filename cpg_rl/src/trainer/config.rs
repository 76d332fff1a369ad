//! Configuration for PPO training of a CPG policy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::algorithms::surrogate_loss::SurrogateLossConfig;

/// Configuration validation error.
///
/// Returned when configuration parameters are invalid or inconsistent.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A count parameter (episodes, rollout_steps, etc.) must be positive.
    InvalidCount { field: &'static str, value: usize },
    /// A parameter is outside its valid range.
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// A parameter must be strictly positive and finite.
    NotPositive { field: &'static str, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCount { field, value } => {
                write!(f, "{} must be > 0, got {}", field, value)
            }
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                write!(f, "{} must be in [{}, {}], got {}", field, min, max, value)
            }
            ConfigError::NotPositive { field, value } => {
                write!(f, "{} must be positive and finite, got {}", field, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Trainer hyperparameters.
///
/// # Example
///
/// ```ignore
/// let config = TrainerConfig::default()
///     .with_episodes(100)
///     .with_rollout_steps(256)
///     .with_batch_size(64)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Optimizer learning rate
    pub learning_rate: f64,
    /// Discount factor
    pub gamma: f32,
    /// GAE trace decay
    pub gae_lambda: f32,
    /// Clipping range for the probability ratio
    pub clip_epsilon: f32,
    /// Entropy bonus weight
    pub entropy_coef: f32,
    /// Value loss weight
    pub value_coef: f32,
    /// Step cap per episode
    pub max_timesteps: usize,
    /// Buffer capacity; a full buffer triggers an update
    pub rollout_steps: usize,
    /// Optimization epochs per update
    pub epochs: usize,
    /// Episodes per run
    pub episodes: usize,
    /// Minibatch size (the last chunk of an epoch may be shorter)
    pub batch_size: usize,
    /// Added to the advantage std before dividing
    pub advantage_epsilon: f32,
    /// Seed for the minibatch shuffle and the backend sampling RNG
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            gamma: 0.99,
            gae_lambda: 0.95,
            clip_epsilon: 0.2,
            entropy_coef: 0.01,
            value_coef: 0.5,
            max_timesteps: 1000,
            rollout_steps: 100,
            epochs: 10,
            episodes: 10,
            batch_size: 32,
            advantage_epsilon: 1e-8,
            seed: 0,
        }
    }
}

impl TrainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters.
    ///
    /// # Validation Rules
    ///
    /// - Counts (episodes, max_timesteps, rollout_steps, epochs, batch_size) > 0
    /// - gamma, gae_lambda ∈ [0, 1]
    /// - clip_epsilon ∈ (0, 1]
    /// - learning_rate > 0
    /// - value_coef, entropy_coef, advantage_epsilon ≥ 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("episodes", self.episodes),
            ("max_timesteps", self.max_timesteps),
            ("rollout_steps", self.rollout_steps),
            ("epochs", self.epochs),
            ("batch_size", self.batch_size),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(ConfigError::InvalidCount { field, value });
            }
        }

        check_range("gamma", self.gamma, 0.0, 1.0)?;
        check_range("gae_lambda", self.gae_lambda, 0.0, 1.0)?;
        if self.clip_epsilon <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "clip_epsilon",
                value: self.clip_epsilon as f64,
            });
        }
        check_range("clip_epsilon", self.clip_epsilon, 0.0, 1.0)?;

        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ConfigError::NotPositive {
                field: "learning_rate",
                value: self.learning_rate,
            });
        }

        check_range("value_coef", self.value_coef, 0.0, f32::MAX)?;
        check_range("entropy_coef", self.entropy_coef, 0.0, f32::MAX)?;
        check_range("advantage_epsilon", self.advantage_epsilon, 0.0, f32::MAX)?;

        Ok(())
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    /// Loss hyperparameters derived from this configuration.
    pub fn loss_config(&self) -> SurrogateLossConfig {
        SurrogateLossConfig {
            clip_epsilon: self.clip_epsilon,
            value_coef: self.value_coef,
            entropy_coef: self.entropy_coef,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_gae_lambda(mut self, lambda: f32) -> Self {
        self.gae_lambda = lambda;
        self
    }

    pub fn with_clip_epsilon(mut self, epsilon: f32) -> Self {
        self.clip_epsilon = epsilon;
        self
    }

    pub fn with_entropy_coef(mut self, coef: f32) -> Self {
        self.entropy_coef = coef;
        self
    }

    pub fn with_value_coef(mut self, coef: f32) -> Self {
        self.value_coef = coef;
        self
    }

    pub fn with_max_timesteps(mut self, steps: usize) -> Self {
        self.max_timesteps = steps;
        self
    }

    pub fn with_rollout_steps(mut self, steps: usize) -> Self {
        self.rollout_steps = steps;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_advantage_epsilon(mut self, epsilon: f32) -> Self {
        self.advantage_epsilon = epsilon;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    // NaN fails both comparisons, so test for containment
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        })
    }
}
