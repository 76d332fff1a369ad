//! Episode buffer for on-policy PPO updates.
//!
//! Key characteristics:
//! - Preserves insertion order (GAE runs backwards over it)
//! - Fixed-shape contiguous storage sized at construction
//! - Bounded by `capacity` (the rollout length)
//! - Cleared after every optimization update

use std::fmt;

use crate::core::transition::Transition;

/// Error raised when a transition cannot be recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum BufferError {
    /// The buffer already holds `capacity` transitions.
    Full { capacity: usize },
    /// A vector field has the wrong length.
    Dimension {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A scalar field is NaN or infinite.
    NonFinite { field: &'static str, value: f32 },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::Full { capacity } => {
                write!(f, "episode buffer is full ({} transitions)", capacity)
            }
            BufferError::Dimension {
                field,
                expected,
                actual,
            } => write!(f, "{} must have length {}, got {}", field, expected, actual),
            BufferError::NonFinite { field, value } => {
                write!(f, "{} must be finite, got {}", field, value)
            }
        }
    }
}

impl std::error::Error for BufferError {}

/// Ordered, fixed-shape storage for one rollout segment.
#[derive(Debug, Clone)]
pub struct EpisodeBuffer {
    capacity: usize,
    observation_dim: usize,
    action_dim: usize,

    /// [len * observation_dim], row-major
    observations: Vec<f32>,
    /// [len * action_dim], row-major
    actions: Vec<f32>,
    rewards: Vec<f32>,
    log_probs: Vec<f32>,
    values: Vec<f32>,
    next_values: Vec<f32>,
    dones: Vec<bool>,
}

impl EpisodeBuffer {
    /// Create an empty buffer holding at most `capacity` transitions.
    pub fn new(capacity: usize, observation_dim: usize, action_dim: usize) -> Self {
        Self {
            capacity,
            observation_dim,
            action_dim,
            observations: Vec::with_capacity(capacity * observation_dim),
            actions: Vec::with_capacity(capacity * action_dim),
            rewards: Vec::with_capacity(capacity),
            log_probs: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            next_values: Vec::with_capacity(capacity),
            dones: Vec::with_capacity(capacity),
        }
    }

    /// Append a transition after validating its shape and scalars.
    ///
    /// On error the buffer is left unchanged.
    pub fn push(&mut self, transition: Transition) -> Result<(), BufferError> {
        if self.is_full() {
            return Err(BufferError::Full {
                capacity: self.capacity,
            });
        }
        check_len("observation", self.observation_dim, transition.observation.len())?;
        check_len("action", self.action_dim, transition.action.len())?;
        check_finite("reward", transition.reward)?;
        check_finite("log_prob", transition.log_prob)?;
        check_finite("value", transition.value)?;
        check_finite("next_value", transition.next_value)?;

        self.observations.extend_from_slice(&transition.observation);
        self.actions.extend_from_slice(&transition.action);
        self.rewards.push(transition.reward);
        self.log_probs.push(transition.log_prob);
        self.values.push(transition.value);
        self.next_values.push(transition.next_value);
        self.dones.push(transition.done);
        Ok(())
    }

    /// Drop all transitions, keeping the allocation.
    pub fn clear(&mut self) {
        self.observations.clear();
        self.actions.clear();
        self.rewards.clear();
        self.log_probs.clear();
        self.values.clear();
        self.next_values.clear();
        self.dones.clear();
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn observation_dim(&self) -> usize {
        self.observation_dim
    }

    pub fn action_dim(&self) -> usize {
        self.action_dim
    }

    /// All observations, flat [len * observation_dim].
    pub fn observations(&self) -> &[f32] {
        &self.observations
    }

    /// All actions, flat [len * action_dim].
    pub fn actions(&self) -> &[f32] {
        &self.actions
    }

    pub fn rewards(&self) -> &[f32] {
        &self.rewards
    }

    pub fn log_probs(&self) -> &[f32] {
        &self.log_probs
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn next_values(&self) -> &[f32] {
        &self.next_values
    }

    pub fn dones(&self) -> &[bool] {
        &self.dones
    }

    /// Observation row of transition `index`.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    pub fn observation(&self, index: usize) -> &[f32] {
        let start = index * self.observation_dim;
        &self.observations[start..start + self.observation_dim]
    }

    /// Action row of transition `index`.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    pub fn action(&self, index: usize) -> &[f32] {
        let start = index * self.action_dim;
        &self.actions[start..start + self.action_dim]
    }
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<(), BufferError> {
    if expected == actual {
        Ok(())
    } else {
        Err(BufferError::Dimension {
            field,
            expected,
            actual,
        })
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<(), BufferError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(BufferError::NonFinite { field, value })
    }
}
