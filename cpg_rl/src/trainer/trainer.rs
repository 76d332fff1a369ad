//! Single-environment PPO trainer.
//!
//! # Control flow
//!
//! ```text
//! for episode in 0..episodes:
//!     obs = env.reset()
//!     for t in 0..max_timesteps:
//!         (a, log π(a|s), V(s)) = policy.act(obs)          // model.valid(), no graph
//!         (obs', r, done, _)   = env.step(a)
//!         V(s')                = policy.value(obs')
//!         buffer.push(obs, a, r, log π, V(s), V(s'), done)
//!         if done || t + 1 == max_timesteps || buffer.is_full():
//!             update()                                      // GAE, epochs × minibatches
//!         if done: break
//! ```
//!
//! The shuffle RNG is owned by the trainer and seeded from the configuration.
//! The backend RNG behind action sampling is seeded from the same value when
//! the trainer is built, so a run is reproducible from `config.seed` and the
//! initial weights. On backends with a process-wide generator (NdArray), any
//! other tensor sampling between `new` and the end of a run shifts the draws.

use std::marker::PhantomData;

use burn::module::AutodiffModule;
use burn::optim::{GradientsParams, Optimizer};
use burn::tensor::backend::{AutodiffBackend, Backend};
use burn::tensor::Tensor;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::config::TrainerConfig;
use super::minibatch::minibatch_schedule;
use crate::algorithms::gae::{compute_gae, normalize_advantages};
use crate::algorithms::surrogate_loss::{policy_drift, surrogate_loss};
use crate::buffers::EpisodeBuffer;
use crate::core::Transition;
use crate::environment::Environment;
use crate::error::{Result, TrainError};
use crate::metrics::{MetricsSink, LOSS_POLICY, LOSS_TOTAL, LOSS_VALUE, REWARD_TOTAL};
use crate::policy::Policy;

/// Summary of one optimization cycle (means over all minibatches).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UpdateStats {
    /// Transitions consumed
    pub transitions: usize,
    /// Optimizer steps taken
    pub minibatches: usize,
    pub total_loss: f32,
    pub policy_loss: f32,
    pub value_loss: f32,
    pub entropy: f32,
    pub approx_kl: f32,
    pub clip_fraction: f32,
}

/// Outcome of one episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeReport {
    pub index: usize,
    /// Undiscounted sum of rewards
    pub total_reward: f32,
    pub steps: usize,
    pub updates: usize,
    /// Ended by the environment rather than the timestep cap
    pub terminated: bool,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingReport {
    pub episodes: Vec<EpisodeReport>,
    pub total_steps: usize,
    pub total_updates: usize,
}

impl TrainingReport {
    /// Mean episode reward, 0.0 for an empty run.
    pub fn mean_reward(&self) -> f32 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        self.episodes.iter().map(|e| e.total_reward).sum::<f32>() / self.episodes.len() as f32
    }
}

/// PPO trainer driving one environment with one policy model.
///
/// # Type Parameters
///
/// - `B`: autodiff backend used for updates (rollouts use `B::InnerBackend`)
/// - `M`: policy model
/// - `O`: optimizer
/// - `E`: environment
/// - `S`: metrics sink
/// - `R`: shuffle RNG
pub struct Trainer<B, M, O, E, S, R = Xoshiro256PlusPlus>
where
    B: AutodiffBackend,
{
    config: TrainerConfig,
    model: M,
    optimizer: O,
    env: E,
    sink: S,
    device: B::Device,
    rng: R,
    buffer: EpisodeBuffer,
    global_step: usize,
    total_updates: usize,
    last_update: Option<UpdateStats>,
    _backend: PhantomData<B>,
}

impl<B, M, O, E, S> Trainer<B, M, O, E, S, Xoshiro256PlusPlus>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + Policy<B>,
    M::InnerModule: Policy<B::InnerBackend>,
    O: Optimizer<M, B>,
    E: Environment,
    S: MetricsSink,
{
    /// Create a trainer with a shuffle RNG seeded from `config.seed`.
    ///
    /// Also seeds the backend RNG used for action sampling with `config.seed`.
    ///
    /// Fails if the configuration is invalid or the model and environment
    /// disagree on observation or action size.
    pub fn new(
        config: TrainerConfig,
        model: M,
        optimizer: O,
        env: E,
        sink: S,
        device: B::Device,
    ) -> Result<Self> {
        config.validate()?;
        check_len("model observation_dim", env.observation_dim(), model.observation_dim())?;
        check_len("model action_dim", env.action_dim(), model.action_dim())?;

        let buffer =
            EpisodeBuffer::new(config.rollout_steps, env.observation_dim(), env.action_dim());
        let rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
        B::seed(&device, config.seed);

        Ok(Self {
            config,
            model,
            optimizer,
            env,
            sink,
            device,
            rng,
            buffer,
            global_step: 0,
            total_updates: 0,
            last_update: None,
            _backend: PhantomData,
        })
    }
}

impl<B, M, O, E, S, R> Trainer<B, M, O, E, S, R>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + Policy<B>,
    M::InnerModule: Policy<B::InnerBackend>,
    O: Optimizer<M, B>,
    E: Environment,
    S: MetricsSink,
    R: Rng,
{
    /// Replace the shuffle RNG.
    pub fn with_rng<R2: Rng>(self, rng: R2) -> Trainer<B, M, O, E, S, R2> {
        Trainer {
            config: self.config,
            model: self.model,
            optimizer: self.optimizer,
            env: self.env,
            sink: self.sink,
            device: self.device,
            rng,
            buffer: self.buffer,
            global_step: self.global_step,
            total_updates: self.total_updates,
            last_update: self.last_update,
            _backend: PhantomData,
        }
    }

    /// Run every configured episode.
    ///
    /// Opens the sink first; closes the environment and the sink afterwards,
    /// whether or not an episode failed.
    pub fn run(&mut self) -> Result<TrainingReport> {
        self.sink.open();
        let result = self.run_episodes();
        self.env.close();
        self.sink.close();
        result
    }

    fn run_episodes(&mut self) -> Result<TrainingReport> {
        let mut report = TrainingReport::default();

        for index in 0..self.config.episodes {
            let episode = self.run_episode(index)?;
            report.total_steps += episode.steps;
            report.total_updates += episode.updates;
            report.episodes.push(episode);
        }

        log::info!(
            "Training finished: {} episodes, {} steps, {} updates, mean reward {:.3}",
            report.episodes.len(),
            report.total_steps,
            report.total_updates,
            report.mean_reward()
        );

        Ok(report)
    }

    /// Collect one episode, updating whenever the trigger fires.
    ///
    /// Records [`REWARD_TOTAL`] at step `index`.
    pub fn run_episode(&mut self, index: usize) -> Result<EpisodeReport> {
        let obs_dim = self.env.observation_dim();
        let action_dim = self.env.action_dim();
        let max_timesteps = self.config.max_timesteps;

        let mut policy = self.model.valid();
        let mut observation = self.env.reset();
        check_len("observation", obs_dim, observation.len())?;

        let mut report = EpisodeReport {
            index,
            total_reward: 0.0,
            steps: 0,
            updates: 0,
            terminated: false,
        };

        for t in 0..max_timesteps {
            let obs_tensor =
                Tensor::<B::InnerBackend, 1>::from_floats(observation.as_slice(), &self.device)
                    .reshape([1, obs_dim]);
            let step = policy.act(obs_tensor);

            let action = tensor_to_vec(step.actions)?;
            check_len("action", action_dim, action.len())?;
            let log_prob = first("log_prob", tensor_to_vec(step.log_probs)?)?;
            let value = first("value", tensor_to_vec(step.values)?)?;

            let env_step = self.env.step(&action);
            check_len("observation", obs_dim, env_step.observation.len())?;

            let next_tensor = Tensor::<B::InnerBackend, 1>::from_floats(
                env_step.observation.as_slice(),
                &self.device,
            )
            .reshape([1, obs_dim]);
            let next_value = first("next_value", tensor_to_vec(policy.value(next_tensor))?)?;

            // the cap does not mark the transition done: V(s') still bootstraps
            self.buffer.push(Transition::new(
                observation,
                action,
                env_step.reward,
                log_prob,
                value,
                next_value,
                env_step.done,
            ))?;

            report.total_reward += env_step.reward;
            report.steps += 1;
            self.global_step += 1;
            observation = env_step.observation;

            if env_step.done || t + 1 == max_timesteps || self.buffer.is_full() {
                self.update()?;
                report.updates += 1;
                policy = self.model.valid();
            }

            if env_step.done {
                report.terminated = true;
                break;
            }
        }

        self.sink.add_scalar(REWARD_TOTAL, index, report.total_reward);
        log::info!(
            "Episode {}: reward={:.3}, steps={}, updates={}{}",
            index,
            report.total_reward,
            report.steps,
            report.updates,
            if report.terminated { "" } else { " (timestep cap)" }
        );

        Ok(report)
    }

    /// Run one optimization cycle over the buffer, then clear it.
    ///
    /// An empty buffer is a no-op returning default stats.
    pub fn update(&mut self) -> Result<UpdateStats> {
        let n = self.buffer.len();
        if n == 0 {
            return Ok(UpdateStats::default());
        }

        let obs_dim = self.buffer.observation_dim();
        let action_dim = self.buffer.action_dim();
        let loss_config = self.config.loss_config();

        let (mut advantages, returns) = compute_gae(
            self.buffer.rewards(),
            self.buffer.values(),
            self.buffer.next_values(),
            self.buffer.dones(),
            self.config.gamma,
            self.config.gae_lambda,
        );
        normalize_advantages(&mut advantages, self.config.advantage_epsilon);

        let old_log_probs = self.buffer.log_probs();

        let mut model = self.model.clone();
        let mut stats = UpdateStats {
            transitions: n,
            ..UpdateStats::default()
        };

        for _epoch in 0..self.config.epochs {
            for batch in minibatch_schedule(&mut self.rng, n, self.config.batch_size) {
                let batch_size = batch.len();

                let batch_obs: Vec<f32> = batch
                    .iter()
                    .flat_map(|&i| self.buffer.observation(i))
                    .copied()
                    .collect();
                let batch_actions: Vec<f32> = batch
                    .iter()
                    .flat_map(|&i| self.buffer.action(i))
                    .copied()
                    .collect();
                let batch_old_log_probs: Vec<f32> =
                    batch.iter().map(|&i| old_log_probs[i]).collect();
                let batch_advantages: Vec<f32> = batch.iter().map(|&i| advantages[i]).collect();
                let batch_returns: Vec<f32> = batch.iter().map(|&i| returns[i]).collect();

                let obs_tensor = Tensor::<B, 1>::from_floats(batch_obs.as_slice(), &self.device)
                    .reshape([batch_size, obs_dim]);
                let actions_tensor =
                    Tensor::<B, 1>::from_floats(batch_actions.as_slice(), &self.device)
                        .reshape([batch_size, action_dim]);

                let evaluation = model.evaluate_actions(obs_tensor, actions_tensor);
                let new_log_probs = tensor_to_vec(evaluation.log_probs.clone())?;
                check_len("evaluated log_probs", batch_size, new_log_probs.len())?;

                let loss = surrogate_loss(
                    evaluation.log_probs,
                    Tensor::from_floats(batch_old_log_probs.as_slice(), &self.device),
                    Tensor::from_floats(batch_advantages.as_slice(), &self.device),
                    evaluation.values,
                    Tensor::from_floats(batch_returns.as_slice(), &self.device),
                    evaluation.entropy,
                    &loss_config,
                );
                let components = loss.components();
                if !components.total_loss.is_finite() {
                    return Err(TrainError::NonFinite {
                        what: "total loss",
                        value: components.total_loss,
                    });
                }

                let grads = loss.total.backward();
                let grads = GradientsParams::from_grads(grads, &model);
                model = self.optimizer.step(self.config.learning_rate, model, grads);

                self.sink.add_scalar(LOSS_TOTAL, self.global_step, components.total_loss);
                self.sink
                    .add_scalar(LOSS_POLICY, self.global_step, components.policy_loss);
                self.sink.add_scalar(LOSS_VALUE, self.global_step, components.value_loss);

                let drift =
                    policy_drift(&new_log_probs, &batch_old_log_probs, loss_config.clip_epsilon);
                stats.minibatches += 1;
                stats.total_loss += components.total_loss;
                stats.policy_loss += components.policy_loss;
                stats.value_loss += components.value_loss;
                stats.entropy += components.entropy;
                stats.approx_kl += drift.approx_kl;
                stats.clip_fraction += drift.clip_fraction;
            }
        }

        if stats.minibatches > 0 {
            let m = stats.minibatches as f32;
            stats.total_loss /= m;
            stats.policy_loss /= m;
            stats.value_loss /= m;
            stats.entropy /= m;
            stats.approx_kl /= m;
            stats.clip_fraction /= m;
        }

        self.model = model;
        self.buffer.clear();
        self.total_updates += 1;
        self.last_update = Some(stats);

        log::debug!(
            "Update {} at step {}: n={}, loss={:.4}, policy={:.4}, value={:.4}, entropy={:.4}, kl={:.5}, clip={:.3}",
            self.total_updates,
            self.global_step,
            n,
            stats.total_loss,
            stats.policy_loss,
            stats.value_loss,
            stats.entropy,
            stats.approx_kl,
            stats.clip_fraction
        );

        Ok(stats)
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// The current (trained) model.
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Environment steps taken across all episodes.
    pub fn global_step(&self) -> usize {
        self.global_step
    }

    /// Optimization cycles completed.
    pub fn total_updates(&self) -> usize {
        self.total_updates
    }

    /// Stats of the most recent non-empty update.
    pub fn last_update(&self) -> Option<&UpdateStats> {
        self.last_update.as_ref()
    }

    /// Transitions waiting for the next update.
    pub fn pending_transitions(&self) -> usize {
        self.buffer.len()
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(TrainError::ShapeMismatch {
            what,
            expected,
            actual,
        })
    }
}

fn tensor_to_vec<Bk: Backend, const D: usize>(tensor: Tensor<Bk, D>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| TrainError::Tensor(format!("{:?}", e)))
}

fn first(what: &'static str, values: Vec<f32>) -> Result<f32> {
    match values.as_slice() {
        [value] => Ok(*value),
        _ => Err(TrainError::ShapeMismatch {
            what,
            expected: 1,
            actual: values.len(),
        }),
    }
}
