//! Clipped surrogate objective for PPO.
//!
//! This module provides the loss both as raw f32 computation (verification,
//! logging) and as tensor computation (gradients).
//!
//! ```text
//! r_t      = exp(log π_θ(a|s) - log π_θ_old(a|s))
//! L_policy = -E[min(r_t A_t, clip(r_t, 1-ε, 1+ε) A_t)]
//! L_value  = E[(V(s) - R_t)²]
//! L        = L_policy + c_v L_value - c_e E[H(π)]
//! ```

use burn::tensor::backend::Backend;
use burn::tensor::{ElementConversion, Tensor};
use serde::{Deserialize, Serialize};

/// Hyperparameters of the combined PPO objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurrogateLossConfig {
    /// Clipping range ε for the probability ratio
    pub clip_epsilon: f32,
    /// Weight of the value loss
    pub value_coef: f32,
    /// Weight of the entropy bonus
    pub entropy_coef: f32,
}

impl Default for SurrogateLossConfig {
    fn default() -> Self {
        Self {
            clip_epsilon: 0.2,
            value_coef: 0.5,
            entropy_coef: 0.01,
        }
    }
}

/// Loss tensors from one minibatch. `total` is the one to backpropagate.
#[derive(Debug, Clone)]
pub struct SurrogateLoss<B: Backend> {
    pub total: Tensor<B, 1>,
    pub policy_loss: Tensor<B, 1>,
    pub value_loss: Tensor<B, 1>,
    /// Mean policy entropy (the bonus, not its negation)
    pub entropy: Tensor<B, 1>,
}

impl<B: Backend> SurrogateLoss<B> {
    /// Read the scalar components back from the device.
    pub fn components(&self) -> LossComponents {
        LossComponents {
            total_loss: scalar(&self.total),
            policy_loss: scalar(&self.policy_loss),
            value_loss: scalar(&self.value_loss),
            entropy: scalar(&self.entropy),
        }
    }
}

/// Scalar loss components for logging.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LossComponents {
    pub total_loss: f32,
    pub policy_loss: f32,
    pub value_loss: f32,
    pub entropy: f32,
}

fn scalar<B: Backend>(tensor: &Tensor<B, 1>) -> f32 {
    tensor.clone().into_scalar().elem::<f32>()
}

/// PPO clipped surrogate loss (tensor computation for gradient).
///
/// # Arguments
///
/// * `log_probs` - Current policy log probs: [batch_size]
/// * `old_log_probs` - Behavior policy log probs (detached): [batch_size]
/// * `advantages` - Advantages (detached, normalized): [batch_size]
/// * `clip_epsilon` - Clipping range ε
///
/// # Returns
///
/// Negative mean of the pessimistic surrogate, shape [1]
pub fn ppo_clip_loss<B: Backend>(
    log_probs: Tensor<B, 1>,
    old_log_probs: Tensor<B, 1>,
    advantages: Tensor<B, 1>,
    clip_epsilon: f32,
) -> Tensor<B, 1> {
    let ratio = (log_probs - old_log_probs).exp();
    let clipped_ratio = ratio.clone().clamp(1.0 - clip_epsilon, 1.0 + clip_epsilon);

    let surr1 = ratio * advantages.clone();
    let surr2 = clipped_ratio * advantages;

    // Take minimum (pessimistic bound)
    -surr1.min_pair(surr2).mean()
}

/// Mean squared error between predicted values and return targets.
pub fn value_loss<B: Backend>(values: Tensor<B, 1>, returns: Tensor<B, 1>) -> Tensor<B, 1> {
    (values - returns).powf_scalar(2.0).mean()
}

/// Combined PPO objective over one minibatch.
///
/// `entropy` is the per-sample policy entropy [batch_size].
pub fn surrogate_loss<B: Backend>(
    log_probs: Tensor<B, 1>,
    old_log_probs: Tensor<B, 1>,
    advantages: Tensor<B, 1>,
    values: Tensor<B, 1>,
    returns: Tensor<B, 1>,
    entropy: Tensor<B, 1>,
    config: &SurrogateLossConfig,
) -> SurrogateLoss<B> {
    let policy_loss = ppo_clip_loss(log_probs, old_log_probs, advantages, config.clip_epsilon);
    let value_loss = value_loss(values, returns);
    let entropy = entropy.mean();

    let total = policy_loss.clone() + value_loss.clone().mul_scalar(config.value_coef)
        - entropy.clone().mul_scalar(config.entropy_coef);

    SurrogateLoss {
        total,
        policy_loss,
        value_loss,
        entropy,
    }
}

/// PPO clipped surrogate loss (scalar computation).
pub fn ppo_clip_loss_scalar(
    log_probs: &[f32],
    old_log_probs: &[f32],
    advantages: &[f32],
    clip_epsilon: f32,
) -> f32 {
    let n = log_probs.len();
    assert_eq!(old_log_probs.len(), n);
    assert_eq!(advantages.len(), n);

    if n == 0 {
        return 0.0;
    }

    let total: f32 = (0..n)
        .map(|i| {
            let ratio = (log_probs[i] - old_log_probs[i]).exp();
            let clipped_ratio = ratio.clamp(1.0 - clip_epsilon, 1.0 + clip_epsilon);
            (ratio * advantages[i]).min(clipped_ratio * advantages[i])
        })
        .sum();

    -total / n as f32
}

/// Value function loss (scalar computation).
pub fn value_loss_scalar(values: &[f32], returns: &[f32]) -> f32 {
    let n = values.len();
    assert_eq!(returns.len(), n);

    if n == 0 {
        return 0.0;
    }

    let mse: f32 = values
        .iter()
        .zip(returns.iter())
        .map(|(v, r)| (v - r).powi(2))
        .sum();

    mse / n as f32
}

/// Combined PPO objective (scalar computation).
pub fn surrogate_loss_scalar(
    log_probs: &[f32],
    old_log_probs: &[f32],
    advantages: &[f32],
    values: &[f32],
    returns: &[f32],
    entropy: &[f32],
    config: &SurrogateLossConfig,
) -> LossComponents {
    let policy_loss = ppo_clip_loss_scalar(log_probs, old_log_probs, advantages, config.clip_epsilon);
    let value_loss = value_loss_scalar(values, returns);
    let entropy = if entropy.is_empty() {
        0.0
    } else {
        entropy.iter().sum::<f32>() / entropy.len() as f32
    };

    LossComponents {
        total_loss: policy_loss + config.value_coef * value_loss - config.entropy_coef * entropy,
        policy_loss,
        value_loss,
        entropy,
    }
}

/// Policy drift diagnostics for one minibatch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolicyDrift {
    /// Approximate KL divergence E[log π_old - log π]
    pub approx_kl: f32,
    /// Fraction of ratios outside [1-ε, 1+ε]
    pub clip_fraction: f32,
}

/// Measure how far the current policy has moved from the behavior policy.
pub fn policy_drift(log_probs: &[f32], old_log_probs: &[f32], clip_epsilon: f32) -> PolicyDrift {
    let n = log_probs.len();
    assert_eq!(old_log_probs.len(), n);

    if n == 0 {
        return PolicyDrift::default();
    }

    let mut kl_sum = 0.0f32;
    let mut clipped = 0usize;
    for (&new, &old) in log_probs.iter().zip(old_log_probs.iter()) {
        kl_sum += old - new;
        let ratio = (new - old).exp();
        if ratio < 1.0 - clip_epsilon || ratio > 1.0 + clip_epsilon {
            clipped += 1;
        }
    }

    PolicyDrift {
        approx_kl: kl_sum / n as f32,
        clip_fraction: clipped as f32 / n as f32,
    }
}
