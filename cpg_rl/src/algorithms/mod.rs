//! Algorithm components for PPO training.
//!
//! - `gae`: Generalized Advantage Estimation and advantage normalization
//! - `surrogate_loss`: Clipped surrogate objective, value loss, entropy bonus
//! - `gaussian`: Diagonal Gaussian sampling, log-probability and entropy

pub mod gae;
pub mod gaussian;
pub mod surrogate_loss;

#[cfg(test)]
mod tests;

pub use gae::{compute_gae, normalize_advantages};
pub use gaussian::{entropy_gaussian, log_prob_gaussian, sample_gaussian};
pub use surrogate_loss::{
    policy_drift, ppo_clip_loss, ppo_clip_loss_scalar, surrogate_loss, surrogate_loss_scalar,
    value_loss, value_loss_scalar, LossComponents, PolicyDrift, SurrogateLoss,
    SurrogateLossConfig,
};
