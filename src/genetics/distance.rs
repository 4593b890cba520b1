//! Compatibility distance used for speciation.

use ndarray::Array2;
use rayon::prelude::*;

use super::genome::Genome;
use super::params::Params;

/// Genomes with fewer connection genes than this are not size-normalised.
pub const NORMALIZATION_THRESHOLD: usize = 20;

impl Genome {
    /// Structural and weight dissimilarity to `other`.
    ///
    /// `excess_coefficient * E / N + disjoint_coefficient * D / N +
    /// weight_coefficient * W`, where `E` and `D` count excess and disjoint
    /// genes on both sides, `W` is the mean absolute weight difference of
    /// matching genes and `N` is the larger connection count, or 1 below
    /// [`NORMALIZATION_THRESHOLD`].
    pub fn compatibility_distance(
        &self,
        other: &Genome,
        excess_coefficient: f64,
        disjoint_coefficient: f64,
        weight_coefficient: f64,
    ) -> f64 {
        let alignment = self.align(other);

        let longest = self.connections.len().max(other.connections.len());
        let n = if longest < NORMALIZATION_THRESHOLD {
            1.0
        } else {
            longest as f64
        };

        excess_coefficient * alignment.excess_count() as f64 / n
            + disjoint_coefficient * alignment.disjoint_count() as f64 / n
            + weight_coefficient * alignment.average_weight_difference()
    }

    /// [`Genome::compatibility_distance`] with the coefficients from `params`.
    pub fn distance(&self, other: &Genome, params: &Params) -> f64 {
        self.compatibility_distance(
            other,
            params.excess_coefficient,
            params.disjoint_coefficient,
            params.weight_coefficient,
        )
    }
}

/// Pairwise compatibility distances, computed in parallel.
///
/// The matrix is symmetric with a zero diagonal.
pub fn distance_matrix(genomes: &[Genome], params: &Params) -> Array2<f64> {
    let n = genomes.len();
    let rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            (i + 1..n)
                .map(|j| genomes[i].distance(&genomes[j], params))
                .collect()
        })
        .collect();

    let mut matrix = Array2::zeros((n, n));
    for (i, row) in rows.iter().enumerate() {
        for (offset, &d) in row.iter().enumerate() {
            let j = i + 1 + offset;
            matrix[[i, j]] = d;
            matrix[[j, i]] = d;
        }
    }
    matrix
}
