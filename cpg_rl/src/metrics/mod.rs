//! Training metrics.
//!
//! ## Sinks
//!
//! - [`ConsoleSink`]: records through the `log` facade
//! - [`CsvSink`]: CSV file for analysis
//! - [`MemorySink`]: in-memory, for inspection
//! - [`MultiSink`]: combine multiple sinks
//! - [`NullSink`]: discard
//!
//! ## Keys
//!
//! Loss keys are recorded once per minibatch at the global environment step;
//! [`REWARD_TOTAL`] once per episode at the episode index.

pub mod sink;

pub use sink::{ConsoleSink, CsvSink, MemorySink, MetricsSink, MultiSink, NullSink, ScalarRecord};

/// Combined PPO loss.
pub const LOSS_TOTAL: &str = "Loss/Total";
/// Clipped surrogate policy loss.
pub const LOSS_POLICY: &str = "Loss/Policy";
/// Value function loss.
pub const LOSS_VALUE: &str = "Loss/Value";
/// Undiscounted episode reward.
pub const REWARD_TOTAL: &str = "Reward/Total";
