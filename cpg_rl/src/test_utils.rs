//! Shared helpers for unit tests.

use parking_lot::{const_mutex, Mutex, MutexGuard};

static BACKEND_RNG: Mutex<()> = const_mutex(());

/// Serialize tests that draw from the backend RNG.
///
/// NdArray keeps one process-wide generator, so weight init and
/// `Tensor::random` in concurrently running tests interleave their draws.
/// Hold the guard for the whole test.
pub(crate) fn backend_rng_guard() -> MutexGuard<'static, ()> {
    BACKEND_RNG.lock()
}
