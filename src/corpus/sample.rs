// Seeded uniform sampling without replacement.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use super::CorpusRow;

/// Indices of `n` distinct rows out of `population`, in draw order.
///
/// The same `(population, n, seed)` always yields the same indices.
pub fn sample_indices(population: usize, n: usize, seed: u64) -> Result<Vec<usize>> {
    if n > population {
        anyhow::bail!(
            "Cannot sample {n} rows from a corpus of {population} without replacement"
        );
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(index::sample(&mut rng, population, n).into_vec())
}

/// Draw `n` rows uniformly at random without replacement.
pub fn sample_rows(rows: &[CorpusRow], n: usize, seed: u64) -> Result<Vec<CorpusRow>> {
    Ok(sample_indices(rows.len(), n, seed)?
        .into_iter()
        .map(|i| rows[i].clone())
        .collect())
}
