//! Diagonal Gaussian utilities for continuous CPG actions.
//!
//! Actions are unsquashed: the oscillator clamps its own targets, so the
//! policy emits raw deltas and no tanh correction is needed.
//!
//! ```text
//! log N(a; μ, σ) = Σ_i [-0.5 ((a_i - μ_i)/σ_i)² - log σ_i - 0.5 log 2π]
//! H(N(μ, σ))     = 0.5 D (1 + log 2π) + Σ_i log σ_i
//! ```

use burn::tensor::backend::Backend;
use burn::tensor::{Distribution, Tensor};

// Constants for numerical stability
const LOG_STD_MIN: f32 = -20.0;
const LOG_STD_MAX: f32 = 2.0;

fn half_log_two_pi() -> f32 {
    0.5 * (2.0 * std::f32::consts::PI).ln()
}

/// Sample from a diagonal Gaussian distribution.
///
/// # Arguments
/// * `mean` - Mean of the Gaussian: [batch_size, action_dim]
/// * `log_std` - Log standard deviation: [batch_size, action_dim]
///
/// # Returns
/// * `(samples, log_probs)` - samples [batch_size, action_dim] and their
///   log probabilities [batch_size] (summed over action dimensions)
pub fn sample_gaussian<B: Backend>(
    mean: Tensor<B, 2>,
    log_std: Tensor<B, 2>,
) -> (Tensor<B, 2>, Tensor<B, 1>) {
    let device = mean.device();
    let [batch_size, action_dim] = mean.dims();

    let log_std = log_std.clamp(LOG_STD_MIN, LOG_STD_MAX);
    let std = log_std.clone().exp();

    let noise: Tensor<B, 2> =
        Tensor::random([batch_size, action_dim], Distribution::Normal(0.0, 1.0), &device);

    // Reparameterization: sample = mean + std * noise
    let samples = mean + std * noise.clone();

    // (samples - mean) / std = noise
    let log_prob_per_dim = noise.powf_scalar(2.0).mul_scalar(-0.5) - log_std;
    let log_probs = log_prob_per_dim
        .sum_dim(1)
        .flatten::<1>(0, 1)
        .sub_scalar(half_log_two_pi() * action_dim as f32);

    (samples, log_probs)
}

/// Log probability of given actions under a diagonal Gaussian.
///
/// # Returns
/// * `log_probs` - [batch_size]
pub fn log_prob_gaussian<B: Backend>(
    actions: Tensor<B, 2>,
    mean: Tensor<B, 2>,
    log_std: Tensor<B, 2>,
) -> Tensor<B, 1> {
    let action_dim = actions.dims()[1];
    let log_std = log_std.clamp(LOG_STD_MIN, LOG_STD_MAX);
    let std = log_std.clone().exp();

    let normalized = (actions - mean) / std;
    let log_prob_per_dim = normalized.powf_scalar(2.0).mul_scalar(-0.5) - log_std;

    log_prob_per_dim
        .sum_dim(1)
        .flatten::<1>(0, 1)
        .sub_scalar(half_log_two_pi() * action_dim as f32)
}

/// Entropy of a diagonal Gaussian (analytical).
///
/// # Arguments
/// * `log_std` - Log standard deviation: [batch_size, action_dim]
///
/// # Returns
/// * `entropy` - Per-sample entropy: [batch_size]
pub fn entropy_gaussian<B: Backend>(log_std: Tensor<B, 2>) -> Tensor<B, 1> {
    let action_dim = log_std.dims()[1] as f32;
    let log_std = log_std.clamp(LOG_STD_MIN, LOG_STD_MAX);

    let constant = action_dim * (0.5 + half_log_two_pi());

    log_std.sum_dim(1).flatten::<1>(0, 1).add_scalar(constant)
}
