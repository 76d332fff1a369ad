//! Errors that abort a training run.

use std::fmt;

use crate::buffers::BufferError;
use crate::cpg::CpgError;
use crate::trainer::ConfigError;

/// Fatal training error.
///
/// There is no retry: a corrupted step cannot be recovered, so every
/// variant ends the run and is returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainError {
    /// Invalid trainer configuration.
    Config(ConfigError),
    /// A transition was rejected by the episode buffer.
    Buffer(BufferError),
    /// An action could not be routed to the oscillators.
    Cpg(CpgError),
    /// A vector from the environment or the model has the wrong size.
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A loss or model output became NaN or infinite.
    NonFinite { what: &'static str, value: f32 },
    /// Tensor data could not be read back from the device.
    Tensor(String),
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainError::Config(e) => write!(f, "invalid configuration: {}", e),
            TrainError::Buffer(e) => write!(f, "buffer error: {}", e),
            TrainError::Cpg(e) => write!(f, "CPG error: {}", e),
            TrainError::ShapeMismatch {
                what,
                expected,
                actual,
            } => write!(f, "{} has length {}, expected {}", what, actual, expected),
            TrainError::NonFinite { what, value } => {
                write!(f, "{} is not finite: {}", what, value)
            }
            TrainError::Tensor(msg) => write!(f, "tensor data error: {}", msg),
        }
    }
}

impl std::error::Error for TrainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrainError::Config(e) => Some(e),
            TrainError::Buffer(e) => Some(e),
            TrainError::Cpg(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for TrainError {
    fn from(e: ConfigError) -> Self {
        TrainError::Config(e)
    }
}

impl From<BufferError> for TrainError {
    fn from(e: BufferError) -> Self {
        TrainError::Buffer(e)
    }
}

impl From<CpgError> for TrainError {
    fn from(e: CpgError) -> Self {
        TrainError::Cpg(e)
    }
}

/// Result alias for training operations.
pub type Result<T> = std::result::Result<T, TrainError>;
