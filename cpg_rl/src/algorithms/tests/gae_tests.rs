//! Tests for Generalized Advantage Estimation (GAE).
//!
//! They cover:
//! - Core recursion correctness (lambda extremes, per-step bootstrapping)
//! - Terminal handling inside and at the end of a buffer
//! - Advantage normalization edge cases
//! - Numerical stability boundaries

use crate::algorithms::gae::{compute_gae, normalize_advantages};

const GAMMA: f32 = 0.99;
const LAMBDA: f32 = 0.95;

/// Forward-sum reference: A_t = Σ_l (γλ)^l δ_{t+l}, stopping after a terminal.
fn reference_advantages(
    rewards: &[f32],
    values: &[f32],
    next_values: &[f32],
    dones: &[bool],
    gamma: f32,
    lambda: f32,
) -> Vec<f64> {
    let n = rewards.len();
    let deltas: Vec<f64> = (0..n)
        .map(|t| {
            let not_done = if dones[t] { 0.0 } else { 1.0 };
            rewards[t] as f64 + gamma as f64 * next_values[t] as f64 * not_done - values[t] as f64
        })
        .collect();

    (0..n)
        .map(|t| {
            let mut sum = 0.0f64;
            let mut weight = 1.0f64;
            for k in t..n {
                sum += weight * deltas[k];
                if dones[k] {
                    break;
                }
                weight *= gamma as f64 * lambda as f64;
            }
            sum
        })
        .collect()
}

// ============================================================================
// Core Algorithm Correctness Tests
// ============================================================================

/// A single terminal step has no bootstrapped continuation.
#[test]
fn test_single_terminal_step_is_reward_minus_value() {
    let (advantages, returns) = compute_gae(&[2.5], &[0.7], &[100.0], &[true], GAMMA, LAMBDA);

    assert_eq!(advantages.len(), 1);
    assert!((advantages[0] - 1.8).abs() < 1e-6, "got {}", advantages[0]);
    assert!((returns[0] - 2.5).abs() < 1e-6, "got {}", returns[0]);
}

/// gamma = 0 and lambda = 0 give the myopic advantage r_t - V(s_t).
#[test]
fn test_myopic_case() {
    let rewards = vec![1.0, -2.0, 0.5, 3.0];
    let values = vec![0.2, 0.4, -0.6, 1.0];
    let next_values = vec![5.0, -5.0, 7.0, 9.0];
    let dones = vec![false, true, false, false];

    let (advantages, _) = compute_gae(&rewards, &values, &next_values, &dones, 0.0, 0.0);

    for t in 0..4 {
        assert!(
            (advantages[t] - (rewards[t] - values[t])).abs() < 1e-6,
            "t={}: expected {}, got {}",
            t,
            rewards[t] - values[t],
            advantages[t]
        );
    }
}

/// Three-step episode ending in a terminal.
#[test]
fn test_three_step_terminal_episode() {
    let rewards = vec![1.0, 1.0, 1.0];
    let values = vec![0.0, 0.0, 0.0];
    let next_values = vec![0.0, 0.0, 0.0];
    let dones = vec![false, false, true];

    let (advantages, returns) = compute_gae(&rewards, &values, &next_values, &dones, GAMMA, LAMBDA);

    // A_2 = 1 (terminal), A_1 = 1 + 0.9405, A_0 = 1 + 0.9405 * A_1
    assert!((advantages[2] - 1.0).abs() < 1e-6);
    assert!((advantages[1] - 1.9405).abs() < 1e-5, "got {}", advantages[1]);
    assert!((advantages[0] - 2.825_040_3).abs() < 1e-5, "got {}", advantages[0]);

    let reference = reference_advantages(&rewards, &values, &next_values, &dones, GAMMA, LAMBDA);
    for t in 0..3 {
        assert!((advantages[t] as f64 - reference[t]).abs() < 1e-5);
        assert!((returns[t] - advantages[t]).abs() < 1e-6, "values are zero");
    }
}

/// lambda = 0 reduces to one-step TD using each step's own next value.
#[test]
fn test_lambda_zero_uses_per_step_next_value() {
    let rewards = vec![1.0, 2.0, 3.0];
    let values = vec![0.5, 0.8, 1.0];
    let next_values = vec![0.8, 1.0, 1.2];
    let dones = vec![false, false, false];

    let (advantages, _) = compute_gae(&rewards, &values, &next_values, &dones, GAMMA, 0.0);

    for t in 0..3 {
        let expected = rewards[t] + GAMMA * next_values[t] - values[t];
        assert!(
            (advantages[t] - expected).abs() < 1e-5,
            "t={}: expected {}, got {}",
            t,
            expected,
            advantages[t]
        );
    }
}

/// lambda = 1 with zero values gives discounted reward-to-go.
#[test]
fn test_lambda_one_produces_discounted_returns() {
    let rewards = vec![1.0, 1.0, 1.0];
    let values = vec![0.0; 3];
    let next_values = vec![0.0; 3];
    let dones = vec![false; 3];

    let (advantages, _) = compute_gae(&rewards, &values, &next_values, &dones, GAMMA, 1.0);

    assert!((advantages[2] - 1.0).abs() < 1e-5);
    assert!((advantages[1] - 1.99).abs() < 1e-4);
    assert!((advantages[0] - 2.9701).abs() < 1e-4);
}

/// A terminal in the middle of the buffer stops the trace at that boundary.
#[test]
fn test_terminal_mid_buffer_cuts_trace() {
    let rewards = vec![1.0, 1.0, 5.0, 5.0];
    let values = vec![0.1, 0.2, 0.3, 0.4];
    let next_values = vec![0.2, 9.0, 0.4, 0.5];
    let dones = vec![false, true, false, false];

    let (full, _) = compute_gae(&rewards, &values, &next_values, &dones, GAMMA, LAMBDA);
    let (prefix, _) = compute_gae(
        &rewards[..2],
        &values[..2],
        &next_values[..2],
        &dones[..2],
        GAMMA,
        LAMBDA,
    );

    // Later episode does not leak into the earlier one
    assert!((full[0] - prefix[0]).abs() < 1e-6);
    assert!((full[1] - prefix[1]).abs() < 1e-6);
    // Terminal step ignores its next value
    assert!((full[1] - (1.0 - 0.2)).abs() < 1e-6);
}

/// A time-limit cut (not done) still bootstraps from the recorded next value.
#[test]
fn test_truncated_last_step_bootstraps() {
    let (advantages, _) = compute_gae(&[1.0], &[0.5], &[2.0], &[false], GAMMA, LAMBDA);

    let expected = 1.0 + GAMMA * 2.0 - 0.5;
    assert!((advantages[0] - expected).abs() < 1e-6);
}

/// Returns are always advantages plus values.
#[test]
fn test_returns_equal_advantages_plus_values() {
    let rewards = vec![0.3, -1.0, 2.0, 0.0, 1.5];
    let values = vec![1.0, -0.5, 0.25, 0.75, -2.0];
    let next_values = vec![-0.5, 0.25, 0.75, -2.0, 0.1];
    let dones = vec![false, false, true, false, false];

    let (advantages, returns) = compute_gae(&rewards, &values, &next_values, &dones, GAMMA, LAMBDA);

    for t in 0..5 {
        assert!((returns[t] - (advantages[t] + values[t])).abs() < 1e-6);
    }
}

#[test]
fn test_empty_buffer() {
    let (advantages, returns) = compute_gae(&[], &[], &[], &[], GAMMA, LAMBDA);
    assert!(advantages.is_empty());
    assert!(returns.is_empty());
}

// ============================================================================
// Advantage Normalization Tests
// ============================================================================

#[test]
fn test_normalize_uses_sample_std() {
    let mut advantages = vec![1.0, 3.0];
    normalize_advantages(&mut advantages, 1e-8);

    // mean 2, sample std √2
    let expected = 1.0 / 2.0f32.sqrt();
    assert!((advantages[0] + expected).abs() < 1e-5, "got {}", advantages[0]);
    assert!((advantages[1] - expected).abs() < 1e-5, "got {}", advantages[1]);
}

#[test]
fn test_normalize_uniform_advantages_become_zero() {
    let mut advantages = vec![4.2; 16];
    normalize_advantages(&mut advantages, 1e-8);

    for a in &advantages {
        assert!(a.is_finite());
        assert!(a.abs() < 1e-3, "got {}", a);
    }
}

#[test]
fn test_normalize_single_element_becomes_zero() {
    let mut advantages = vec![-7.0];
    normalize_advantages(&mut advantages, 1e-8);
    assert_eq!(advantages[0], 0.0);
}

#[test]
fn test_normalize_epsilon_in_denominator() {
    let mut advantages = vec![0.0, 2.0];
    // std = √2; with epsilon = 1 the spread shrinks
    normalize_advantages(&mut advantages, 1.0);

    let expected = 1.0 / (2.0f32.sqrt() + 1.0);
    assert!((advantages[1] - expected).abs() < 1e-5);
}

// ============================================================================
// Property-Based Tests with Proptest
// ============================================================================

mod proptest_gae {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: GAE stays finite and matches the forward-sum reference
        #[test]
        fn test_gae_matches_reference(
            steps in prop::collection::vec(
                (-10.0f32..10.0, -10.0f32..10.0, -10.0f32..10.0, any::<bool>()),
                1..40,
            ),
            gamma in 0.0f32..=1.0,
            lambda in 0.0f32..=1.0,
        ) {
            let rewards: Vec<f32> = steps.iter().map(|s| s.0).collect();
            let values: Vec<f32> = steps.iter().map(|s| s.1).collect();
            let next_values: Vec<f32> = steps.iter().map(|s| s.2).collect();
            let dones: Vec<bool> = steps.iter().map(|s| s.3).collect();

            let (advantages, returns) =
                compute_gae(&rewards, &values, &next_values, &dones, gamma, lambda);
            let reference =
                reference_advantages(&rewards, &values, &next_values, &dones, gamma, lambda);

            for t in 0..rewards.len() {
                prop_assert!(advantages[t].is_finite());
                prop_assert!(returns[t].is_finite());
                let tolerance = 1e-3 * (1.0 + reference[t].abs());
                prop_assert!(
                    (advantages[t] as f64 - reference[t]).abs() < tolerance,
                    "t={}: {} vs {}", t, advantages[t], reference[t]
                );
            }
        }

        /// Property: normalized advantages have zero mean
        #[test]
        fn test_normalization_zero_mean(
            raw in prop::collection::vec(-1e3f32..1e3, 2..100),
        ) {
            let mut advantages = raw.clone();
            normalize_advantages(&mut advantages, 1e-8);

            let mean = advantages.iter().sum::<f32>() / advantages.len() as f32;
            for a in &advantages {
                prop_assert!(a.is_finite());
            }
            prop_assert!(mean.abs() < 1e-3, "mean {}", mean);
        }
    }
}
