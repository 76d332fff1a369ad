//! Generalized Advantage Estimation.
//!
//! GAE provides a family of policy gradient estimators parameterized by λ:
//! - λ = 0: one-step TD (low variance, high bias)
//! - λ = 1: Monte Carlo (high variance, low bias)
//! - λ ∈ (0, 1): interpolation
//!
//! ## Formula
//!
//! A_t = δ_t + γλ (1 - d_t) A_{t+1}
//! where δ_t = r_t + γ V(s_{t+1}) (1 - d_t) - V(s_t)
//!
//! Each step carries its own V(s_{t+1}), recorded at collection time, so a
//! buffer that spans an episode boundary or a time-limit cut needs no
//! separate bootstrap value.
//!
//! ## References
//!
//! - Schulman et al., "High-Dimensional Continuous Control Using
//!   Generalized Advantage Estimation" (2016)

/// Compute GAE advantages and returns for one ordered buffer.
///
/// # Arguments
///
/// * `rewards` - rewards received [T]
/// * `values` - value estimates V(s_t) [T]
/// * `next_values` - value estimates V(s_{t+1}) [T]
/// * `dones` - episode termination flags [T]
/// * `gamma` - discount factor
/// * `gae_lambda` - GAE λ parameter
///
/// # Returns
///
/// (advantages, returns) - both [T], with returns = advantages + values
///
/// # Panics
///
/// If the input slices differ in length.
pub fn compute_gae(
    rewards: &[f32],
    values: &[f32],
    next_values: &[f32],
    dones: &[bool],
    gamma: f32,
    gae_lambda: f32,
) -> (Vec<f32>, Vec<f32>) {
    let n = rewards.len();
    assert_eq!(values.len(), n);
    assert_eq!(next_values.len(), n);
    assert_eq!(dones.len(), n);

    let mut advantages = vec![0.0f32; n];
    let mut returns = vec![0.0f32; n];

    let mut gae = 0.0f32;

    for t in (0..n).rev() {
        let not_done = if dones[t] { 0.0 } else { 1.0 };

        let delta = rewards[t] + gamma * next_values[t] * not_done - values[t];
        gae = delta + gamma * gae_lambda * not_done * gae;

        advantages[t] = gae;
        returns[t] = gae + values[t];
    }

    (advantages, returns)
}

/// Normalize advantages to zero mean and unit standard deviation in place.
///
/// Uses the sample (Bessel-corrected) standard deviation with `epsilon`
/// added to the denominator.
///
/// # Edge Cases
///
/// - Empty slice: no-op
/// - Single element: std is taken as 0, the element becomes 0.0
/// - All same values: every element becomes 0.0
pub fn normalize_advantages(advantages: &mut [f32], epsilon: f32) {
    let n = advantages.len();
    if n == 0 {
        return;
    }

    let mean = advantages.iter().sum::<f32>() / n as f32;
    let std = if n > 1 {
        let variance = advantages.iter().map(|a| (a - mean).powi(2)).sum::<f32>() / (n - 1) as f32;
        variance.sqrt()
    } else {
        0.0
    };

    if !mean.is_finite() || !std.is_finite() {
        log::warn!(
            "Non-finite statistics in advantage normalization: mean={}, std={}",
            mean,
            std
        );
    }

    for a in advantages.iter_mut() {
        *a = (*a - mean) / (std + epsilon);
    }
}
