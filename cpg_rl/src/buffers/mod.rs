//! Experience storage for the trainer.

pub mod episode_buffer;


pub use episode_buffer::{BufferError, EpisodeBuffer};
