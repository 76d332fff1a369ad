//! Central pattern generator for leg-tip trajectories.
//!
//! - [`Oscillator`]: per-leg state machine turning bounded parameter deltas
//!   into a smooth swing/stance foot trajectory
//! - [`CpgBank`]: one oscillator per leg, driven by a flat action vector

pub mod bank;
pub mod oscillator;


pub use bank::{CpgBank, CpgError, ACTIONS_PER_LEG};
pub use oscillator::{
    wrap_phase, FootTarget, LegGeometry, Oscillator, ParamRange, AMPLITUDE_CONVERGENCE_RATE,
    AMPLITUDE_RANGE, DEFAULT_AMPLITUDE, DEFAULT_FREQUENCY, DELTA_SCALE, FREQUENCY_RANGE,
    PHASE_RANGE,
};
