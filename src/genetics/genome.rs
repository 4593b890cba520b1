//! The genome ("strand"): ordered node and connection genes.
//!
//! Construction and queries live here. Mutation, alignment, crossover and
//! distance are implemented on [`Genome`] in their own modules.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::gene::{ConnectionGene, Innovation, NodeGene, NodeId, NodeRole};
use super::random::RandomSource;

/// A genome built from hand-supplied genes broke one of its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenomeError {
    /// Node ids start at 1.
    #[error("node id 0 is not a valid id")]
    ZeroNodeId,
    /// Two node genes share an id.
    #[error("node id {0} appears more than once")]
    DuplicateNode(NodeId),
    /// A connection references a node the genome does not have.
    #[error("connection {innovation} references missing node {node}")]
    DanglingConnection {
        /// Innovation of the offending connection.
        innovation: Innovation,
        /// Missing node id.
        node: NodeId,
    },
    /// A connection starts at an output node.
    #[error("connection {0} starts at an output node")]
    OutputSource(Innovation),
    /// A connection ends at an input node.
    #[error("connection {0} ends at an input node")]
    InputDestination(Innovation),
    /// Two connections join the same ordered pair of nodes.
    #[error("more than one connection from {from} to {to}")]
    DuplicatePair {
        /// Source node id.
        from: NodeId,
        /// Destination node id.
        to: NodeId,
    },
    /// Two connections carry the same innovation number.
    #[error("innovation {0} appears more than once")]
    DuplicateInnovation(Innovation),
}

/// One candidate network: node genes, connection genes and a node-id counter.
///
/// Genes are owned values. Cloning a genome copies every gene, so a clone or
/// an offspring never aliases its parents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GenomeData")]
pub struct Genome {
    /// Creation order: inputs, outputs, then hidden nodes.
    pub(crate) nodes: Vec<NodeGene>,
    /// Creation order, not sorted by innovation.
    pub(crate) connections: Vec<ConnectionGene>,
    pub(crate) next_node_id: NodeId,
}

/// Unchecked field data of a [`Genome`], as it appears on the wire.
///
/// Deserializing a [`Genome`] goes through this type and then
/// [`Genome::validate`], so no decode path yields a broken genome.
#[derive(Debug, Deserialize)]
pub struct GenomeData {
    nodes: Vec<NodeGene>,
    connections: Vec<ConnectionGene>,
    next_node_id: NodeId,
}

impl TryFrom<GenomeData> for Genome {
    type Error = GenomeError;

    fn try_from(data: GenomeData) -> Result<Self, Self::Error> {
        let genome = Self {
            nodes: data.nodes,
            connections: data.connections,
            next_node_id: data.next_node_id,
        };
        genome.validate()?;
        Ok(genome)
    }
}

/// Another name for [`Genome`].
pub type Strand = Genome;

impl Default for Genome {
    fn default() -> Self {
        Self::empty()
    }
}

impl Genome {
    /// Creates a fully connected genome.
    ///
    /// Inputs get ids `1..=inputs`, outputs the ids after them. Every input is
    /// connected to every output with a weight drawn from `[0, 1)`. Innovation
    /// numbers follow the input-major pair order starting at 1, so genomes
    /// built with the same shape align gene for gene.
    pub fn new<R: RandomSource>(
        inputs: usize,
        outputs: usize,
        enabled: bool,
        rng: &mut R,
    ) -> Self {
        let mut genome = Self::empty();
        genome.nodes.reserve(inputs + outputs);
        genome.connections.reserve(inputs * outputs);

        for _ in 0..inputs {
            let id = genome.allocate_node_id();
            genome.nodes.push(NodeGene::new(id, NodeRole::Input));
        }
        for _ in 0..outputs {
            let id = genome.allocate_node_id();
            genome.nodes.push(NodeGene::new(id, NodeRole::Output));
        }

        let mut innovation: Innovation = 1;
        for i in 0..inputs {
            for o in 0..outputs {
                let source = genome.nodes[i].id();
                let dest = genome.nodes[inputs + o].id();
                let weight = rng.real(0.0, 1.0, false);
                genome
                    .connections
                    .push(ConnectionGene::new(source, dest, weight, enabled, innovation));
                innovation += 1;
            }
        }

        genome
    }

    /// Creates a genome with no genes and the node counter at 1.
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            connections: Vec::new(),
            next_node_id: 1,
        }
    }

    /// Builds a genome from existing genes, checking every invariant.
    ///
    /// The node counter continues after the largest node id.
    pub fn from_genes(
        nodes: Vec<NodeGene>,
        connections: Vec<ConnectionGene>,
    ) -> Result<Self, GenomeError> {
        let next_node_id = nodes.iter().map(NodeGene::id).max().unwrap_or(0) + 1;
        let genome = Self {
            nodes,
            connections,
            next_node_id,
        };
        genome.validate()?;
        Ok(genome)
    }

    /// Checks the genome invariants.
    pub fn validate(&self) -> Result<(), GenomeError> {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if node.id() == 0 {
                return Err(GenomeError::ZeroNodeId);
            }
            if !ids.insert(node.id()) {
                return Err(GenomeError::DuplicateNode(node.id()));
            }
        }

        let mut pairs = HashSet::with_capacity(self.connections.len());
        let mut innovations = HashSet::with_capacity(self.connections.len());
        for gene in &self.connections {
            let innovation = gene.innovation();
            let source = self.node(gene.source()).ok_or(GenomeError::DanglingConnection {
                innovation,
                node: gene.source(),
            })?;
            let dest = self.node(gene.dest()).ok_or(GenomeError::DanglingConnection {
                innovation,
                node: gene.dest(),
            })?;
            if !source.can_emit() {
                return Err(GenomeError::OutputSource(innovation));
            }
            if !dest.can_receive() {
                return Err(GenomeError::InputDestination(innovation));
            }
            if !pairs.insert(gene.endpoints()) {
                return Err(GenomeError::DuplicatePair {
                    from: gene.source(),
                    to: gene.dest(),
                });
            }
            if !innovations.insert(innovation) {
                return Err(GenomeError::DuplicateInnovation(innovation));
            }
        }
        Ok(())
    }

    /// Node genes in creation order.
    pub fn nodes(&self) -> &[NodeGene] {
        &self.nodes
    }

    /// Connection genes in creation order.
    pub fn connections(&self) -> &[ConnectionGene] {
        &self.connections
    }

    /// Mutable access to connection genes for weight and enabled edits.
    pub fn connections_mut(&mut self) -> &mut [ConnectionGene] {
        &mut self.connections
    }

    /// The id the counter would hand out next.
    pub fn next_node_id(&self) -> NodeId {
        self.next_node_id
    }

    /// Looks up a node gene by id.
    pub fn node(&self, id: NodeId) -> Option<&NodeGene> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Looks up a connection gene by innovation number.
    pub fn connection_by_innovation(&self, innovation: Innovation) -> Option<&ConnectionGene> {
        self.connections
            .iter()
            .find(|gene| gene.innovation() == innovation)
    }

    /// Whether any gene, enabled or not, joins `source` to `dest`.
    pub fn has_connection(&self, source: NodeId, dest: NodeId) -> bool {
        self.connections
            .iter()
            .any(|gene| gene.endpoints() == (source, dest))
    }

    /// Number of nodes with the given role.
    pub fn count_role(&self, role: NodeRole) -> usize {
        self.nodes.iter().filter(|node| node.role() == role).count()
    }

    /// Number of hidden nodes.
    pub fn hidden_count(&self) -> usize {
        self.count_role(NodeRole::Hidden)
    }

    /// Number of enabled connection genes.
    pub fn enabled_count(&self) -> usize {
        self.connections.iter().filter(|gene| gene.enabled).count()
    }

    /// Highest innovation number present, if any.
    pub fn max_innovation(&self) -> Option<Innovation> {
        self.connections
            .iter()
            .map(ConnectionGene::innovation)
            .max()
    }

    /// Takes the next free node id and advances the counter.
    ///
    /// Ids already present are skipped, which matters after crossover resets
    /// the counter below an inherited id.
    pub(crate) fn allocate_node_id(&mut self) -> NodeId {
        while self.node(self.next_node_id).is_some() {
            self.next_node_id += 1;
        }
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Genome: {} inputs, {} outputs, {} hidden, {}/{} connections enabled",
            self.count_role(NodeRole::Input),
            self.count_role(NodeRole::Output),
            self.hidden_count(),
            self.enabled_count(),
            self.connections.len()
        )?;
        for gene in &self.connections {
            writeln!(
                f,
                "  [{:>4}] {} -> {} w={:.4}{}",
                gene.innovation(),
                gene.source(),
                gene.dest(),
                gene.weight,
                if gene.enabled { "" } else { " (disabled)" }
            )?;
        }
        Ok(())
    }
}
