//! Default diagonal-Gaussian actor-critic.
//!
//! Separate tanh MLPs for the actor mean and the critic, plus a single learned
//! log-std shared by every state:
//!
//! ```text
//! actor:  obs → Linear → tanh → Linear → tanh → Linear → mean [action_dim]
//! critic: obs → Linear → tanh → Linear → tanh → Linear → value [1]
//! log_std = Param([action_dim])
//! ```

use burn::config::Config;
use burn::module::{Module, Param};
use burn::nn::{Linear, LinearConfig};
use burn::tensor::activation::tanh;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::{ActionEvaluation, Policy, PolicyStep};
use crate::algorithms::gaussian::{entropy_gaussian, log_prob_gaussian, sample_gaussian};

/// Configuration for [`GaussianActorCritic`].
#[derive(Config, Debug)]
pub struct GaussianActorCriticConfig {
    /// Observation vector size
    pub observation_dim: usize,
    /// Action vector size (3 per leg for a CPG bank)
    pub action_dim: usize,
    /// Width of both hidden layers
    #[config(default = 64)]
    pub hidden_size: usize,
    /// Initial log standard deviation (0.0 gives std = 1)
    #[config(default = 0.0)]
    pub initial_log_std: f32,
}

impl GaussianActorCriticConfig {
    /// Initialize the model on `device`.
    pub fn init<B: Backend>(&self, device: &B::Device) -> GaussianActorCritic<B> {
        GaussianActorCritic {
            actor_0: LinearConfig::new(self.observation_dim, self.hidden_size).init(device),
            actor_1: LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            actor_mean: LinearConfig::new(self.hidden_size, self.action_dim).init(device),
            log_std: Param::from_tensor(
                Tensor::zeros([self.action_dim], device).add_scalar(self.initial_log_std),
            ),
            critic_0: LinearConfig::new(self.observation_dim, self.hidden_size).init(device),
            critic_1: LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            critic_head: LinearConfig::new(self.hidden_size, 1).init(device),
        }
    }
}

/// Actor-critic with a state-independent Gaussian exploration scale.
#[derive(Module, Debug)]
pub struct GaussianActorCritic<B: Backend> {
    actor_0: Linear<B>,
    actor_1: Linear<B>,
    actor_mean: Linear<B>,
    log_std: Param<Tensor<B, 1>>,
    critic_0: Linear<B>,
    critic_1: Linear<B>,
    critic_head: Linear<B>,
}

impl<B: Backend> GaussianActorCritic<B> {
    /// Forward pass returning (mean, log_std, values).
    ///
    /// `log_std` is broadcast to [batch, action_dim]; `values` is [batch].
    pub fn forward(&self, observations: Tensor<B, 2>) -> (Tensor<B, 2>, Tensor<B, 2>, Tensor<B, 1>) {
        let batch_size = observations.dims()[0];

        let actor = tanh(self.actor_0.forward(observations.clone()));
        let actor = tanh(self.actor_1.forward(actor));
        let mean = self.actor_mean.forward(actor);

        let log_std = self.log_std.val().unsqueeze_dim(0).repeat_dim(0, batch_size);

        let values = self.critic(observations);

        (mean, log_std, values)
    }

    fn critic(&self, observations: Tensor<B, 2>) -> Tensor<B, 1> {
        let critic = tanh(self.critic_0.forward(observations));
        let critic = tanh(self.critic_1.forward(critic));
        self.critic_head.forward(critic).flatten::<1>(0, 1)
    }

    /// Current log standard deviation [action_dim].
    pub fn log_std(&self) -> Tensor<B, 1> {
        self.log_std.val()
    }
}

impl<B: Backend> Policy<B> for GaussianActorCritic<B> {
    fn observation_dim(&self) -> usize {
        // Linear weights are stored [d_input, d_output]
        self.actor_0.weight.val().dims()[0]
    }

    fn action_dim(&self) -> usize {
        self.log_std.val().dims()[0]
    }

    fn act(&self, observations: Tensor<B, 2>) -> PolicyStep<B> {
        let (mean, log_std, values) = self.forward(observations);
        let (actions, log_probs) = sample_gaussian(mean, log_std);

        PolicyStep {
            actions,
            log_probs,
            values,
        }
    }

    fn evaluate_actions(
        &self,
        observations: Tensor<B, 2>,
        actions: Tensor<B, 2>,
    ) -> ActionEvaluation<B> {
        let (mean, log_std, values) = self.forward(observations);

        ActionEvaluation {
            log_probs: log_prob_gaussian(actions, mean, log_std.clone()),
            entropy: entropy_gaussian(log_std),
            values,
        }
    }

    fn value(&self, observations: Tensor<B, 2>) -> Tensor<B, 1> {
        self.critic(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use burn::module::AutodiffModule;
    use burn::tensor::{Distribution, ElementConversion};
    use crate::test_utils::backend_rng_guard;

    type B = NdArray<f32>;
    type AB = Autodiff<NdArray<f32>>;

    fn model<Bk: Backend>() -> GaussianActorCritic<Bk> {
        GaussianActorCriticConfig::new(5, 6)
            .with_hidden_size(16)
            .init(&Default::default())
    }

    #[test]
    fn test_config_defaults() {
        let config = GaussianActorCriticConfig::new(4, 12);
        assert_eq!(config.hidden_size, 64);
        assert_eq!(config.initial_log_std, 0.0);
    }

    #[test]
    fn test_dimensions() {
        let _rng = backend_rng_guard();
        let model = model::<B>();
        assert_eq!(model.observation_dim(), 5);
        assert_eq!(model.action_dim(), 6);
    }

    #[test]
    fn test_act_shapes() {
        let _rng = backend_rng_guard();
        let model = model::<B>();
        let obs = Tensor::<B, 2>::random([3, 5], Distribution::Default, &Default::default());

        let step = model.act(obs);

        assert_eq!(step.actions.dims(), [3, 6]);
        assert_eq!(step.log_probs.dims(), [3]);
        assert_eq!(step.values.dims(), [3]);
    }

    #[test]
    fn test_evaluate_actions_shapes_and_entropy() {
        let _rng = backend_rng_guard();
        let model = GaussianActorCriticConfig::new(5, 2)
            .with_hidden_size(8)
            .with_initial_log_std(-0.5)
            .init::<B>(&Default::default());
        let device = Default::default();
        let obs = Tensor::<B, 2>::zeros([4, 5], &device);
        let actions = Tensor::<B, 2>::zeros([4, 2], &device);

        let eval = model.evaluate_actions(obs, actions);

        assert_eq!(eval.log_probs.dims(), [4]);
        assert_eq!(eval.entropy.dims(), [4]);
        assert_eq!(eval.values.dims(), [4]);

        let entropy: Vec<f32> = eval.entropy.into_data().to_vec::<f32>().unwrap();
        let expected = 2.0 * (0.5 + 0.5 * (2.0 * std::f32::consts::PI).ln()) - 1.0;
        assert!((entropy[0] - expected).abs() < 1e-5, "{} vs {}", entropy[0], expected);
    }

    #[test]
    fn test_act_log_probs_match_evaluation() {
        let _rng = backend_rng_guard();
        let model = model::<B>();
        let obs = Tensor::<B, 2>::random([2, 5], Distribution::Default, &Default::default());

        let step = model.act(obs.clone());
        let eval = model.evaluate_actions(obs, step.actions);

        let sampled: Vec<f32> = step.log_probs.into_data().to_vec::<f32>().unwrap();
        let evaluated: Vec<f32> = eval.log_probs.into_data().to_vec::<f32>().unwrap();
        for (a, b) in sampled.iter().zip(evaluated.iter()) {
            assert!((a - b).abs() < 1e-4, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_value_matches_act_values() {
        let _rng = backend_rng_guard();
        let model = model::<B>();
        let obs = Tensor::<B, 2>::random([3, 5], Distribution::Default, &Default::default());

        let from_act: Vec<f32> = model.act(obs.clone()).values.into_data().to_vec::<f32>().unwrap();
        let direct: Vec<f32> = model.value(obs).into_data().to_vec::<f32>().unwrap();

        assert_eq!(from_act, direct);
    }

    #[test]
    fn test_valid_model_is_a_policy() {
        let _rng = backend_rng_guard();
        let model = model::<AB>();
        let inner = model.valid();
        let obs = Tensor::<B, 2>::zeros([1, 5], &Default::default());

        let step = inner.act(obs);

        assert_eq!(step.actions.dims(), [1, 6]);
    }

    #[test]
    fn test_log_std_receives_gradient() {
        let _rng = backend_rng_guard();
        let model = model::<AB>();
        let device = Default::default();
        let obs = Tensor::<AB, 2>::zeros([2, 5], &device);

        let eval = model.evaluate_actions(obs, Tensor::<AB, 2>::zeros([2, 6], &device));
        let grads = eval.entropy.mean().backward();

        let grad = model.log_std.val().grad(&grads).expect("log_std should have a gradient");
        let mean_grad: f32 = grad.mean().into_scalar().elem();
        // d(mean entropy)/d(log_std_i) = 1
        assert!((mean_grad - 1.0).abs() < 1e-5);
    }
}
