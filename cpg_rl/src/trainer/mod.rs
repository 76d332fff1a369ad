//! PPO training loop.
//!
//! - [`TrainerConfig`]: hyperparameters with validation
//! - [`Trainer`]: rollout collection, advantage estimation, minibatch epochs
//! - [`minibatch_schedule`]: seeded shuffle-and-chunk of buffer indices

pub mod config;
pub mod minibatch;
#[allow(clippy::module_inception)]
pub mod trainer;


pub use config::{ConfigError, TrainerConfig};
pub use minibatch::minibatch_schedule;
pub use trainer::{EpisodeReport, Trainer, TrainingReport, UpdateStats};
