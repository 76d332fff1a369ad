//! Policy model capability consumed by the trainer.
//!
//! A policy is a `burn` module that can be queried in two modes:
//!
//! - **Rollout**: on the inner backend via `model.valid()`, no graph is built.
//! - **Update**: on the autodiff backend, so the loss can be backpropagated.
//!
//! Implement [`Policy`] for `B: Backend` (not just `AutodiffBackend`) and both
//! modes come for free.

mod gaussian_actor_critic;

pub use gaussian_actor_critic::{GaussianActorCritic, GaussianActorCriticConfig};

use burn::module::Module;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Output of [`Policy::act`] for a batch of observations.
#[derive(Debug, Clone)]
pub struct PolicyStep<B: Backend> {
    /// Sampled actions [batch, action_dim]
    pub actions: Tensor<B, 2>,
    /// Log probability of each sampled action [batch]
    pub log_probs: Tensor<B, 1>,
    /// State value estimates [batch]
    pub values: Tensor<B, 1>,
}

/// Output of [`Policy::evaluate_actions`] for recorded actions.
#[derive(Debug, Clone)]
pub struct ActionEvaluation<B: Backend> {
    /// Log probability of each recorded action [batch]
    pub log_probs: Tensor<B, 1>,
    /// Policy entropy per sample [batch]
    pub entropy: Tensor<B, 1>,
    /// State value estimates [batch]
    pub values: Tensor<B, 1>,
}

/// Actor-critic policy over continuous actions.
pub trait Policy<B: Backend>: Module<B> {
    /// Size of the observation vector the model expects.
    fn observation_dim(&self) -> usize;

    /// Size of the action vector the model emits.
    fn action_dim(&self) -> usize;

    /// Sample actions for a batch of observations.
    fn act(&self, observations: Tensor<B, 2>) -> PolicyStep<B>;

    /// Score previously taken actions under the current parameters.
    fn evaluate_actions(
        &self,
        observations: Tensor<B, 2>,
        actions: Tensor<B, 2>,
    ) -> ActionEvaluation<B>;

    /// State value estimates [batch].
    ///
    /// Defaults to the values returned by [`Policy::act`]; override when the
    /// critic can be evaluated on its own.
    fn value(&self, observations: Tensor<B, 2>) -> Tensor<B, 1> {
        self.act(observations).values
    }
}
