//! Uniform sampling without replacement.

use rand::Rng;
use rand::seq::SliceRandom;

/// Pick `amount` distinct indices from `0..len`, uniformly and in random order.
///
/// Runs a partial Fisher–Yates shuffle over an index vector, so only `amount`
/// swaps are made. `amount` is capped at `len`.
pub fn sample_indices<R: Rng + ?Sized>(rng: &mut R, len: usize, amount: usize) -> Vec<usize> {
    let amount = amount.min(len);
    let mut indices: Vec<usize> = (0..len).collect();
    let (picked, _rest) = indices.partial_shuffle(rng, amount);
    picked.to_vec()
}
