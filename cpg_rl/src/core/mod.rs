//! Core data types shared by the buffer and the trainer.

pub mod transition;

pub use transition::Transition;
