//! Sampling primitives shared by the linkage phases.

use rand::{Rng, RngCore};

use crate::errors::GenerationError;

/// Draw `amount` distinct positions from `0..pool_len`.
///
/// Fails when the pool is smaller than the requested amount; there is no
/// shrink-to-fit fallback.
pub fn sample_indices(
    pool_len: usize,
    amount: usize,
    phase: &'static str,
    rng: &mut dyn RngCore,
) -> Result<Vec<usize>, GenerationError> {
    if amount > pool_len {
        return Err(GenerationError::Sampling {
            phase,
            requested: amount,
            available: pool_len,
        });
    }
    Ok(rand::seq::index::sample(rng, pool_len, amount).into_vec())
}

/// Draw `amount` distinct entries of `pool` without replacement.
pub fn sample_from(
    pool: &[usize],
    amount: usize,
    phase: &'static str,
    rng: &mut dyn RngCore,
) -> Result<Vec<usize>, GenerationError> {
    let picks = sample_indices(pool.len(), amount, phase, rng)?;
    Ok(picks.into_iter().map(|pick| pool[pick]).collect())
}

/// Draw one uniformly random position from `0..len`.
pub fn pick_index(
    len: usize,
    phase: &'static str,
    rng: &mut dyn RngCore,
) -> Result<usize, GenerationError> {
    if len == 0 {
        return Err(GenerationError::EmptyPool { phase });
    }
    Ok(rng.random_range(0..len))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn samples_without_replacement() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let picks = sample_indices(10, 10, "test", &mut rng).expect("sample");
        let unique: HashSet<usize> = picks.iter().copied().collect();
        assert_eq!(unique.len(), 10);
        assert!(picks.iter().all(|pick| *pick < 10));
    }

    #[test]
    fn oversized_sample_is_an_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = sample_indices(3, 4, "test", &mut rng).expect_err("too many");
        assert!(matches!(
            err,
            GenerationError::Sampling {
                requested: 4,
                available: 3,
                ..
            }
        ));
    }

    #[test]
    fn sample_from_maps_back_to_pool_values() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let pool = [4, 8, 15, 16, 23, 42];
        let picks = sample_from(&pool, 3, "test", &mut rng).expect("sample");
        assert_eq!(picks.len(), 3);
        assert!(picks.iter().all(|pick| pool.contains(pick)));
    }

    #[test]
    fn picking_from_empty_pool_is_an_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(matches!(
            pick_index(0, "test", &mut rng),
            Err(GenerationError::EmptyPool { phase: "test" })
        ));
    }
}
