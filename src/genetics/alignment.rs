//! Gene alignment by innovation number.
//!
//! Two genomes' connection genes fall into three classes:
//!
//! - **matching**: the innovation number exists in both genomes;
//! - **disjoint**: not matching, and below the other genome's highest innovation;
//! - **excess**: not matching, and above every innovation in the other genome.
//!
//! Every gene of both genomes lands in exactly one class.

use std::collections::{HashMap, HashSet};

use super::gene::{ConnectionGene, Innovation};
use super::genome::Genome;

/// Non-matching genes of one genome, relative to the other.
#[derive(Debug, Clone, Default)]
pub struct Unmatched<'a> {
    /// Genes inside the other genome's innovation range, in gene order.
    pub disjoint: Vec<&'a ConnectionGene>,
    /// Genes beyond the other genome's innovation range, in gene order.
    pub excess: Vec<&'a ConnectionGene>,
}

impl<'a> Unmatched<'a> {
    fn classify(
        genome: &'a Genome,
        other_innovations: &HashSet<Innovation>,
        other_max: Option<Innovation>,
    ) -> Self {
        let mut unmatched = Self::default();
        for gene in genome.connections() {
            if other_innovations.contains(&gene.innovation()) {
                continue;
            }
            match other_max {
                Some(max) if gene.innovation() < max => unmatched.disjoint.push(gene),
                _ => unmatched.excess.push(gene),
            }
        }
        unmatched
    }

    /// Disjoint genes followed by excess genes.
    pub fn structural(&self) -> impl Iterator<Item = &'a ConnectionGene> + '_ {
        self.disjoint.iter().chain(self.excess.iter()).copied()
    }

    /// Number of disjoint plus excess genes.
    pub fn len(&self) -> usize {
        self.disjoint.len() + self.excess.len()
    }

    /// Whether every gene matched.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classification of two genomes' connection genes.
#[derive(Debug, Clone)]
pub struct Alignment<'a> {
    /// `(left, right)` gene pairs sharing an innovation, ascending by innovation.
    pub matching: Vec<(&'a ConnectionGene, &'a ConnectionGene)>,
    /// Left genome's non-matching genes.
    pub left: Unmatched<'a>,
    /// Right genome's non-matching genes.
    pub right: Unmatched<'a>,
}

impl<'a> Alignment<'a> {
    /// Aligns `left` against `right`.
    pub fn of(left: &'a Genome, right: &'a Genome) -> Self {
        let left_innovations: HashSet<Innovation> = left
            .connections()
            .iter()
            .map(ConnectionGene::innovation)
            .collect();
        let right_by_innovation: HashMap<Innovation, &'a ConnectionGene> = right
            .connections()
            .iter()
            .map(|gene| (gene.innovation(), gene))
            .collect();
        let right_innovations: HashSet<Innovation> = right_by_innovation.keys().copied().collect();

        let mut matching: Vec<_> = left
            .connections()
            .iter()
            .filter_map(|gene| {
                right_by_innovation
                    .get(&gene.innovation())
                    .map(|other| (gene, *other))
            })
            .collect();
        matching.sort_by_key(|(gene, _)| gene.innovation());

        Self {
            matching,
            left: Unmatched::classify(left, &right_innovations, right.max_innovation()),
            right: Unmatched::classify(right, &left_innovations, left.max_innovation()),
        }
    }

    /// Disjoint genes counted on both sides.
    pub fn disjoint_count(&self) -> usize {
        self.left.disjoint.len() + self.right.disjoint.len()
    }

    /// Excess genes counted on both sides.
    pub fn excess_count(&self) -> usize {
        self.left.excess.len() + self.right.excess.len()
    }

    /// Mean absolute weight difference over matching pairs, 0 with none.
    pub fn average_weight_difference(&self) -> f64 {
        if self.matching.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .matching
            .iter()
            .map(|(left, right)| (left.weight - right.weight).abs())
            .sum();
        total / self.matching.len() as f64
    }
}

impl Genome {
    /// Aligns this genome's connection genes against `other`'s.
    pub fn align<'a>(&'a self, other: &'a Genome) -> Alignment<'a> {
        Alignment::of(self, other)
    }
}
