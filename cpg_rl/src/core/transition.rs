//! Transition record collected once per environment step.

/// One environment step as seen by the acting policy.
///
/// Immutable once recorded; the [`EpisodeBuffer`](crate::buffers::EpisodeBuffer)
/// copies its fields into contiguous storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Observation the action was taken from
    pub observation: Vec<f32>,
    /// Continuous action vector
    pub action: Vec<f32>,
    /// Reward received
    pub reward: f32,
    /// Log probability of the action under the behavior policy: log π(a|s)
    pub log_prob: f32,
    /// Value estimate at the observation: V(s)
    pub value: f32,
    /// Value estimate at the next observation: V(s')
    pub next_value: f32,
    /// Environment signaled episode termination
    pub done: bool,
}

impl Transition {
    pub fn new(
        observation: Vec<f32>,
        action: Vec<f32>,
        reward: f32,
        log_prob: f32,
        value: f32,
        next_value: f32,
        done: bool,
    ) -> Self {
        Self {
            observation,
            action,
            reward,
            log_prob,
            value,
            next_value,
            done,
        }
    }
}
