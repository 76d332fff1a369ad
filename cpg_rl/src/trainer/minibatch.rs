//! Minibatch index schedule.

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle `0..n` and split it, in order, into chunks of `batch_size`.
///
/// Every index appears in exactly one chunk; only the last chunk may be
/// shorter than `batch_size`. Returns no chunks when `n == 0`.
///
/// # Panics
///
/// If `batch_size` is zero.
pub fn minibatch_schedule<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    batch_size: usize,
) -> Vec<Vec<usize>> {
    assert!(batch_size > 0, "batch_size must be > 0");

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);

    indices.chunks(batch_size).map(|chunk| chunk.to_vec()).collect()
}
