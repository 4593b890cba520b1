//! Node and connection genes.

use serde::{Deserialize, Serialize};

/// Identity of a node gene, unique within one genome.
pub type NodeId = u32;

/// Historical marker shared by connection genes born from the same structural mutation.
pub type Innovation = u64;

/// Role of a neuron in the encoded network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    /// Sensor neuron, never the destination of a connection.
    Input,
    /// Actuator neuron, never the source of a connection.
    Output,
    /// Neuron created by splitting a connection.
    Hidden,
}

/// One neuron: identity plus role.
///
/// The role is fixed at creation; there is no setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeGene {
    id: NodeId,
    role: NodeRole,
}

impl NodeGene {
    /// Creates a node gene.
    pub fn new(id: NodeId, role: NodeRole) -> Self {
        Self { id, role }
    }

    /// Node identity.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Node role.
    #[inline]
    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// Whether a connection may start at this node.
    #[inline]
    pub fn can_emit(&self) -> bool {
        self.role != NodeRole::Output
    }

    /// Whether a connection may end at this node.
    #[inline]
    pub fn can_receive(&self) -> bool {
        self.role != NodeRole::Input
    }
}

/// A directed, weighted edge between two node ids.
///
/// Disabled genes stay in the genome so crossover or later mutation can
/// express them again. Endpoints and innovation number are fixed; weight and
/// enabled flag are what mutation touches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionGene {
    source: NodeId,
    dest: NodeId,
    /// Connection weight.
    pub weight: f64,
    /// Whether the connection is expressed.
    pub enabled: bool,
    innovation: Innovation,
}

impl ConnectionGene {
    /// Creates a connection gene.
    pub fn new(
        source: NodeId,
        dest: NodeId,
        weight: f64,
        enabled: bool,
        innovation: Innovation,
    ) -> Self {
        Self {
            source,
            dest,
            weight,
            enabled,
            innovation,
        }
    }

    /// Source node id.
    #[inline]
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Destination node id.
    #[inline]
    pub fn dest(&self) -> NodeId {
        self.dest
    }

    /// The `(source, dest)` pair.
    #[inline]
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.source, self.dest)
    }

    /// Innovation number.
    #[inline]
    pub fn innovation(&self) -> Innovation {
        self.innovation
    }
}
