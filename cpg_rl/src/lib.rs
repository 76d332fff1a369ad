//! # cpg_rl: CPG Locomotion with PPO
//!
//! Per-leg central pattern generators that turn bounded parameter deltas into
//! smooth foot trajectories, and a PPO trainer that learns to drive them.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Trainer                             │
//! │                                                              │
//! │   Policy.act (valid)  ──► Environment.step ──► EpisodeBuffer │
//! │          ▲                   │ CpgBank                 │     │
//! │          │                   │  └ Oscillator × legs    ▼     │
//! │   optimizer.step ◄── surrogate loss ◄── GAE + normalize      │
//! │                        (epochs × shuffled minibatches)       │
//! │                                                              │
//! │   MetricsSink: Loss/Total, Loss/Policy, Loss/Value,          │
//! │                Reward/Total                                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Training is single-threaded and synchronous. The only randomness besides
//! action sampling is the minibatch shuffle, which uses a seeded generator.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use burn::backend::{Autodiff, NdArray};
//! use burn::optim::AdamConfig;
//! use cpg_rl::{ConsoleSink, GaussianActorCriticConfig, Trainer, TrainerConfig};
//!
//! type B = Autodiff<NdArray>;
//!
//! let env = MyQuadrupedEnv::new(); // implements Environment, owns a CpgBank
//! let model = GaussianActorCriticConfig::new(env.observation_dim(), env.action_dim())
//!     .init::<B>(&device);
//! let config = TrainerConfig::default().with_episodes(100).build()?;
//!
//! let optimizer = AdamConfig::new().init();
//! let mut trainer = Trainer::new(config, model, optimizer, env, ConsoleSink::new(), device)?;
//! let report = trainer.run()?;
//! ```

pub mod algorithms;
pub mod buffers;
pub mod core;
pub mod cpg;
pub mod environment;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod trainer;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use algorithms::{
    compute_gae, normalize_advantages, surrogate_loss, surrogate_loss_scalar, LossComponents,
    SurrogateLoss, SurrogateLossConfig,
};
pub use buffers::{BufferError, EpisodeBuffer};
pub use crate::core::Transition;
pub use cpg::{CpgBank, CpgError, FootTarget, LegGeometry, Oscillator};
pub use environment::{EnvStep, Environment, StepInfo};
pub use error::TrainError;
pub use metrics::{ConsoleSink, CsvSink, MemorySink, MetricsSink, MultiSink, NullSink};
pub use policy::{
    ActionEvaluation, GaussianActorCritic, GaussianActorCriticConfig, Policy, PolicyStep,
};
pub use trainer::{
    ConfigError, EpisodeReport, Trainer, TrainerConfig, TrainingReport, UpdateStats,
};
