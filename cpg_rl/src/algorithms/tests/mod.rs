//! Tests for the algorithms module.
//!
//! # Test Organization
//!
//! - `gae_tests`: Generalized Advantage Estimation and normalization
//! - `surrogate_loss_tests`: Clipped surrogate, value loss, combined objective

pub mod gae_tests;
