//! Single-leg central pattern generator.
//!
//! The oscillator keeps two layers of state:
//!
//! - **Target parameters** (`amplitude`, `frequency`, `phase`): nudged by the
//!   policy every control step and hard-clamped to their legal ranges.
//! - **Driving state** (`current_amplitude`, `current_phase`): the amplitude
//!   follows its target through a first-order lag and the phase integrates
//!   the target frequency, so the foot never jumps when the policy does.
//!
//! ## Foot trajectory
//!
//! ```text
//! x = -d_step * (A - 1) * cos(φ)
//! z = -h + g_c * sin(φ)    if sin(φ) > 0   (swing)
//! z = -h + g_p * sin(φ)    otherwise       (stance)
//! ```

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

/// Gain of the first-order lag pulling `current_amplitude` to its target.
pub const AMPLITUDE_CONVERGENCE_RATE: f32 = 30.0;

/// Fraction of a parameter's legal range covered by a unit delta.
pub const DELTA_SCALE: f32 = 0.005;

/// Default amplitude used at construction and reset.
pub const DEFAULT_AMPLITUDE: f32 = 0.01;

/// Default frequency used at construction and reset.
pub const DEFAULT_FREQUENCY: f32 = 0.5;

/// Closed interval a target parameter is held to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Width of the interval.
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Map a raw policy delta in [-1, 1] to a step in parameter units.
    pub fn scale_delta(&self, raw: f32) -> f32 {
        raw * DELTA_SCALE * self.span()
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Legal amplitude range.
pub const AMPLITUDE_RANGE: ParamRange = ParamRange::new(0.05, 0.35);

/// Legal frequency range.
pub const FREQUENCY_RANGE: ParamRange = ParamRange::new(0.1, 3.0);

/// Range used only to scale phase deltas; the phase itself is wrapped, not clamped.
pub const PHASE_RANGE: ParamRange = ParamRange::new(-PI, PI);

/// Fixed leg geometry shaping the foot trajectory (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegGeometry {
    /// Maximum step length `d_step`.
    pub step_length: f32,
    /// Body height above the stance line `h`.
    pub height: f32,
    /// Peak foot lift during swing `g_c`.
    pub swing_clearance: f32,
    /// Foot penetration during stance `g_p`. Zero gives a flat stance line.
    pub ground_clearance: f32,
}

impl Default for LegGeometry {
    fn default() -> Self {
        Self {
            step_length: 0.150,
            height: 0.30,
            swing_clearance: 0.10,
            ground_clearance: 0.0,
        }
    }
}

/// Desired foot position in the leg's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FootTarget {
    pub x: f32,
    pub z: f32,
}

impl From<FootTarget> for (f32, f32) {
    fn from(target: FootTarget) -> Self {
        (target.x, target.z)
    }
}

/// Per-leg oscillator state machine.
///
/// Owned by exactly one leg. Construction does not range-check its
/// arguments; the first [`update`](Self::update) clamps the targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Oscillator {
    dt: f32,
    geometry: LegGeometry,

    amplitude: f32,
    frequency: f32,
    phase: f32,

    current_amplitude: f32,
    current_phase: f32,
}

impl Oscillator {
    /// Create an oscillator with the default amplitude and frequency.
    pub fn new(dt: f32, phase: f32) -> Self {
        Self::with_params(dt, phase, DEFAULT_AMPLITUDE, DEFAULT_FREQUENCY)
    }

    /// Create an oscillator with explicit initial parameters.
    pub fn with_params(dt: f32, phase: f32, amplitude: f32, frequency: f32) -> Self {
        let oscillator = Self {
            dt,
            geometry: LegGeometry::default(),
            amplitude,
            frequency,
            phase,
            current_amplitude: amplitude,
            current_phase: phase,
        };
        log::trace!(
            "oscillator initialized: amplitude={amplitude}, frequency={frequency}, phase={phase}"
        );
        oscillator
    }

    /// Replace the leg geometry.
    pub fn with_geometry(mut self, geometry: LegGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Restore the default amplitude and frequency and discard smoothing history.
    pub fn reset(&mut self, phase: f32) {
        self.reset_with(phase, DEFAULT_AMPLITUDE, DEFAULT_FREQUENCY);
    }

    /// Reinitialize targets and driving state to the given values.
    pub fn reset_with(&mut self, phase: f32, amplitude: f32, frequency: f32) {
        self.amplitude = amplitude;
        self.frequency = frequency;
        self.phase = phase;
        self.current_amplitude = amplitude;
        self.current_phase = phase;
        log::trace!(
            "oscillator reset: amplitude={amplitude}, frequency={frequency}, phase={phase}"
        );
    }

    /// Apply one control step of parameter deltas and return the foot target.
    ///
    /// Deltas are expected in [-1, 1]; each moves its parameter by at most
    /// 0.5% of that parameter's range.
    pub fn update(
        &mut self,
        amplitude_delta: f32,
        frequency_delta: f32,
        phase_delta: f32,
    ) -> FootTarget {
        self.amplitude =
            AMPLITUDE_RANGE.clamp(self.amplitude + AMPLITUDE_RANGE.scale_delta(amplitude_delta));
        self.frequency =
            FREQUENCY_RANGE.clamp(self.frequency + FREQUENCY_RANGE.scale_delta(frequency_delta));
        self.phase = wrap_phase(self.phase + PHASE_RANGE.scale_delta(phase_delta));

        self.current_amplitude +=
            AMPLITUDE_CONVERGENCE_RATE * (self.amplitude - self.current_amplitude) * self.dt;
        self.current_phase = wrap_phase(self.current_phase + self.frequency * self.dt);

        let target = self.foot_target();
        log::trace!(
            "oscillator step: amplitude={}, frequency={}, phase={}, current_amplitude={}, current_phase={}, x={}, z={}",
            self.amplitude,
            self.frequency,
            self.phase,
            self.current_amplitude,
            self.current_phase,
            target.x,
            target.z
        );
        target
    }

    /// Foot target for the current driving state, without stepping.
    pub fn foot_target(&self) -> FootTarget {
        let g = &self.geometry;
        let (sin, cos) = self.current_phase.sin_cos();

        let x = -g.step_length * (self.current_amplitude - 1.0) * cos;
        let z = if sin > 0.0 {
            -g.height + g.swing_clearance * sin
        } else {
            -g.height + g.ground_clearance * sin
        };

        FootTarget { x, z }
    }

    /// True while the foot is in the swing half-cycle.
    pub fn in_swing(&self) -> bool {
        self.current_phase.sin() > 0.0
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn geometry(&self) -> &LegGeometry {
        &self.geometry
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn current_amplitude(&self) -> f32 {
        self.current_amplitude
    }

    pub fn current_phase(&self) -> f32 {
        self.current_phase
    }
}

/// Wrap an angle into [0, 2π).
pub fn wrap_phase(phase: f32) -> f32 {
    let wrapped = phase.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
