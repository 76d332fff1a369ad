//! One oscillator per leg, driven from a flat action vector.
//!
//! Actions are laid out as consecutive triples, one per leg:
//!
//! ```text
//! [amp_0, freq_0, phase_0, amp_1, freq_1, phase_1, ...]
//! ```

use std::fmt;

use super::oscillator::{FootTarget, LegGeometry, Oscillator};

/// Number of action components consumed by each leg.
pub const ACTIONS_PER_LEG: usize = 3;

/// Error raised when an action vector does not match the leg count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpgError {
    /// Action vector length is not `3 * legs`.
    ActionLength { expected: usize, actual: usize },
}

impl fmt::Display for CpgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpgError::ActionLength { expected, actual } => {
                write!(f, "expected {} action components, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for CpgError {}

/// Independent per-leg oscillators sharing a timestep.
#[derive(Debug, Clone)]
pub struct CpgBank {
    legs: Vec<Oscillator>,
    initial_phases: Vec<f32>,
}

impl CpgBank {
    /// Create one oscillator per entry of `initial_phases`.
    pub fn new(dt: f32, initial_phases: &[f32]) -> Self {
        Self::with_geometry(dt, initial_phases, LegGeometry::default())
    }

    /// Create the bank with a shared leg geometry.
    pub fn with_geometry(dt: f32, initial_phases: &[f32], geometry: LegGeometry) -> Self {
        let legs = initial_phases
            .iter()
            .map(|&phase| Oscillator::new(dt, phase).with_geometry(geometry))
            .collect();
        Self {
            legs,
            initial_phases: initial_phases.to_vec(),
        }
    }

    pub fn n_legs(&self) -> usize {
        self.legs.len()
    }

    /// Length of the action vector [`update`](Self::update) expects.
    pub fn action_dim(&self) -> usize {
        self.legs.len() * ACTIONS_PER_LEG
    }

    pub fn legs(&self) -> &[Oscillator] {
        &self.legs
    }

    /// Reset every leg to its initial phase offset and default parameters.
    pub fn reset(&mut self) {
        for (leg, &phase) in self.legs.iter_mut().zip(self.initial_phases.iter()) {
            leg.reset(phase);
        }
    }

    /// Step every leg with its action triple.
    pub fn update(&mut self, actions: &[f32]) -> Result<Vec<FootTarget>, CpgError> {
        if actions.len() != self.action_dim() {
            return Err(CpgError::ActionLength {
                expected: self.action_dim(),
                actual: actions.len(),
            });
        }

        Ok(self
            .legs
            .iter_mut()
            .zip(actions.chunks_exact(ACTIONS_PER_LEG))
            .map(|(leg, deltas)| leg.update(deltas[0], deltas[1], deltas[2]))
            .collect())
    }
}
