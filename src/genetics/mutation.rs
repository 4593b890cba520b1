//! Weight and structural mutation operators.

use log::{debug, trace};

use super::gene::{ConnectionGene, Innovation, NodeGene, NodeId, NodeRole};
use super::genome::Genome;
use super::innovation::InnovationTracker;
use super::params::Params;
use super::random::RandomSource;

/// What a call to [`Genome::mutate`] changed structurally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationReport {
    /// Hidden node created by a split, if any.
    pub added_node: Option<NodeId>,
    /// Innovation of the connection added, if any.
    pub added_connection: Option<Innovation>,
}

impl Genome {
    /// Perturbs and/or replaces connection weights.
    ///
    /// Each gene, disabled ones included, rolls two independent checks in
    /// order: with `perturb_chance` a delta of magnitude up to
    /// `perturb_amplitude` and random sign is added; then with
    /// `new_value_chance` the weight is replaced by a fresh draw from `[0, 1)`.
    /// When both fire the replacement wins.
    pub fn mutate_weights<R: RandomSource>(
        &mut self,
        perturb_chance: f64,
        perturb_amplitude: f64,
        new_value_chance: f64,
        rng: &mut R,
    ) {
        for gene in &mut self.connections {
            if rng.chance(perturb_chance) {
                let magnitude = rng.real(0.0, perturb_amplitude, true);
                let delta = if rng.chance(0.5) { magnitude } else { -magnitude };
                gene.weight += delta;
            }
            if rng.chance(new_value_chance) {
                gene.weight = rng.real(0.0, 1.0, false);
            }
        }
    }

    /// Splits a random connection with a new hidden node.
    ///
    /// The split gene is disabled and replaced by `source -> new` with weight
    /// 1.0 and `new -> dest` carrying the old weight, both enabled. Returns
    /// the new node's id, or `None` when the genome has no connections.
    pub fn add_random_node_gene<R, T>(&mut self, rng: &mut R, tracker: &mut T) -> Option<NodeId>
    where
        R: RandomSource,
        T: InnovationTracker,
    {
        if self.connections.is_empty() {
            debug!("add node skipped: genome has no connections");
            return None;
        }

        let index = rng.index(self.connections.len());
        let split = self.connections.get_mut(index)?;
        split.enabled = false;
        let (source, dest) = split.endpoints();
        let weight = split.weight;
        let split_innovation = split.innovation();

        let node = self.allocate_node_id();
        self.nodes.push(NodeGene::new(node, NodeRole::Hidden));

        let incoming = self.claim_innovation(tracker, source, node);
        self.connections
            .push(ConnectionGene::new(source, node, 1.0, true, incoming));
        let outgoing = self.claim_innovation(tracker, node, dest);
        self.connections
            .push(ConnectionGene::new(node, dest, weight, true, outgoing));

        debug!(
            "split connection {split_innovation} ({source} -> {dest}) with node {node}, \
             new innovations {incoming} and {outgoing}"
        );
        Some(node)
    }

    /// Tries up to `max_attempts` random node pairs for a new connection.
    ///
    /// A pair is accepted when the nodes differ, the source is not an output,
    /// the destination is not an input and no gene already joins them. The
    /// first accepted pair gets an enabled gene with a weight from `[0, 1)`,
    /// which is returned. `None` means nothing was added.
    pub fn add_random_connection_gene<R, T>(
        &mut self,
        max_attempts: usize,
        rng: &mut R,
        tracker: &mut T,
    ) -> Option<&ConnectionGene>
    where
        R: RandomSource,
        T: InnovationTracker,
    {
        for attempt in 0..max_attempts {
            let source = *rng.pick(&self.nodes)?;
            let dest = *rng.pick(&self.nodes)?;

            if !self.accepts_connection(&source, &dest) {
                trace!(
                    "attempt {attempt}: rejected {} -> {}",
                    source.id(),
                    dest.id()
                );
                continue;
            }

            let weight = rng.real(0.0, 1.0, false);
            let innovation = self.claim_innovation(tracker, source.id(), dest.id());
            debug!(
                "added connection {innovation} ({} -> {}) after {} attempts",
                source.id(),
                dest.id(),
                attempt + 1
            );
            self.connections.push(ConnectionGene::new(
                source.id(),
                dest.id(),
                weight,
                true,
                innovation,
            ));
            return self.connections.last();
        }

        debug!("add connection gave up after {max_attempts} attempts");
        None
    }

    /// One generation's mutation pass driven by `params`.
    ///
    /// Weights are mutated first, then a node split is rolled with
    /// `add_node_chance`, then a new connection with `add_connection_chance`.
    pub fn mutate<R, T>(&mut self, params: &Params, rng: &mut R, tracker: &mut T) -> MutationReport
    where
        R: RandomSource,
        T: InnovationTracker,
    {
        self.mutate_weights(
            params.perturb_chance,
            params.perturb_amplitude,
            params.new_value_chance,
            rng,
        );

        let mut report = MutationReport::default();
        if rng.chance(params.add_node_chance) {
            report.added_node = self.add_random_node_gene(rng, tracker);
        }
        if rng.chance(params.add_connection_chance) {
            report.added_connection = self
                .add_random_connection_gene(params.add_connection_attempts, rng, tracker)
                .map(ConnectionGene::innovation);
        }
        report
    }

    /// Asks `tracker` for the number of a new `source -> dest` gene.
    ///
    /// A number this genome already carries is replaced by a fresh one above
    /// its highest innovation.
    fn claim_innovation<T: InnovationTracker>(
        &self,
        tracker: &mut T,
        source: NodeId,
        dest: NodeId,
    ) -> Innovation {
        let innovation = tracker.innovation(source, dest);
        if self.connection_by_innovation(innovation).is_none() {
            return innovation;
        }
        let fresh = tracker.fresh(self.max_innovation().unwrap_or(0));
        debug!(
            "innovation {innovation} for {source} -> {dest} already in genome, using {fresh}"
        );
        fresh
    }

    fn accepts_connection(&self, source: &NodeGene, dest: &NodeGene) -> bool {
        source.id() != dest.id()
            && source.can_emit()
            && dest.can_receive()
            && !self.has_connection(source.id(), dest.id())
    }
}
