#![allow(dead_code)]

use std::collections::VecDeque;

use strand::genetics::gene::{ConnectionGene, NodeGene, NodeRole};
use strand::genetics::genome::Genome;
use strand::genetics::random::RandomSource;

/// Installs a test logger once per test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Replays a fixed script of draws and panics when a draw is not scripted.
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    chances: VecDeque<bool>,
    reals: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chances(mut self, values: &[bool]) -> Self {
        self.chances.extend(values);
        self
    }

    pub fn reals(mut self, values: &[f64]) -> Self {
        self.reals.extend(values);
        self
    }

    pub fn indices(mut self, values: &[usize]) -> Self {
        self.indices.extend(values);
        self
    }

    pub fn is_exhausted(&self) -> bool {
        self.chances.is_empty() && self.reals.is_empty() && self.indices.is_empty()
    }
}

impl RandomSource for ScriptedRandom {
    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().expect("unscripted chance draw")
    }

    fn real(&mut self, min: f64, max: f64, _inclusive: bool) -> f64 {
        let value = self.reals.pop_front().expect("unscripted real draw");
        assert!(
            value >= min && value <= max,
            "scripted real {value} outside [{min}, {max}]"
        );
        value
    }

    fn index(&mut self, len: usize) -> usize {
        let value = self.indices.pop_front().expect("unscripted index draw");
        assert!(value < len, "scripted index {value} out of range {len}");
        value
    }
}

/// Two hand-built genomes over nodes 1, 2 (inputs), 3 (output) and 4 (hidden).
///
/// Left carries innovations 1, 2, 4 and 8; right carries 1, 3 and 5. Against
/// each other: 1 matches, left 2 and 4 are disjoint, left 8 is excess, right 3
/// and 5 are disjoint.
pub fn aligned_pair() -> (Genome, Genome) {
    let nodes = || {
        vec![
            NodeGene::new(1, NodeRole::Input),
            NodeGene::new(2, NodeRole::Input),
            NodeGene::new(3, NodeRole::Output),
            NodeGene::new(4, NodeRole::Hidden),
        ]
    };
    let left = Genome::from_genes(
        nodes(),
        vec![
            ConnectionGene::new(1, 3, 0.5, true, 1),
            ConnectionGene::new(2, 3, 0.1, true, 2),
            ConnectionGene::new(1, 4, 0.2, true, 4),
            ConnectionGene::new(4, 3, 0.3, true, 8),
        ],
    )
    .expect("left genome is valid");
    let right = Genome::from_genes(
        nodes(),
        vec![
            ConnectionGene::new(1, 3, 0.25, true, 1),
            ConnectionGene::new(2, 4, 0.6, true, 3),
            ConnectionGene::new(4, 3, 0.7, true, 5),
        ],
    )
    .expect("right genome is valid");
    (left, right)
}
