//! Recombination of two parent genomes.

use std::collections::HashSet;

use log::{debug, trace};

use super::gene::{ConnectionGene, NodeId};
use super::genome::Genome;
use super::random::RandomSource;

impl Genome {
    /// Produces an offspring of `self` and `other`.
    ///
    /// `self` is taken as the fitter parent unless `equal_fitness` is set.
    ///
    /// 1. Matching genes, in ascending innovation order, come from either
    ///    parent with equal probability. If either parent has the gene
    ///    disabled the copy is disabled with probability `disabled_chance`
    ///    and enabled otherwise.
    /// 2. `self`'s disjoint and excess genes are inherited, and `other`'s too
    ///    when fitness is tied. A gene joining a pair of nodes the offspring
    ///    already connects is dropped.
    /// 3. Node genes referenced by an inherited connection are copied from
    ///    both parents' pools, deduplicated by id, and the offspring's node
    ///    counter restarts at the number of inherited nodes plus one.
    pub fn crossover<R: RandomSource>(
        &self,
        other: &Genome,
        disabled_chance: f64,
        equal_fitness: bool,
        rng: &mut R,
    ) -> Genome {
        let alignment = self.align(other);
        let mut child = Genome::empty();

        for &(mine, theirs) in &alignment.matching {
            let mut gene = if rng.chance(0.5) { *mine } else { *theirs };
            if !mine.enabled || !theirs.enabled {
                gene.enabled = !rng.chance(disabled_chance);
            }
            child.inherit(gene);
        }

        for gene in alignment.left.structural() {
            child.inherit(*gene);
        }
        if equal_fitness {
            for gene in alignment.right.structural() {
                child.inherit(*gene);
            }
        }

        let referenced: HashSet<NodeId> = child
            .connections
            .iter()
            .flat_map(|gene| [gene.source(), gene.dest()])
            .collect();
        let mut copied = HashSet::with_capacity(referenced.len());
        for node in self.nodes.iter().chain(other.nodes.iter()) {
            if referenced.contains(&node.id()) && copied.insert(node.id()) {
                child.nodes.push(*node);
            }
        }
        child.next_node_id = child.nodes.len() as NodeId + 1;

        debug!(
            "crossover: {} matching, {} from primary, {} from secondary -> {} nodes, {} connections",
            alignment.matching.len(),
            alignment.left.len(),
            if equal_fitness { alignment.right.len() } else { 0 },
            child.nodes.len(),
            child.connections.len()
        );
        child
    }

    fn inherit(&mut self, gene: ConnectionGene) {
        if self.has_connection(gene.source(), gene.dest()) {
            trace!(
                "dropping inherited gene {}: {} -> {} already present",
                gene.innovation(),
                gene.source(),
                gene.dest()
            );
            return;
        }
        self.connections.push(gene);
    }
}
