//! # Strand - NEAT genome encoding and evolutionary operators
//!
//! A genome ("strand") encodes one candidate neural network as node genes and
//! connection genes. Connection genes carry innovation numbers, which let
//! genomes with independently grown topologies be aligned gene by gene.
//!
//! ## Features
//!
//! - Fully connected construction from input/output counts
//! - Weight perturbation and replacement
//! - Structural mutation: node splits and new connections
//! - Gene alignment into matching, disjoint and excess genes
//! - Fitness-biased crossover
//! - Normalised compatibility distance for speciation
//! - Tagged JSON persistence through a type registry
//!
//! Randomness and innovation numbering are always passed in explicitly, so
//! every operator is reproducible from the same sequence of draws.
//!
//! ## Core Modules
//!
//! - [`genetics::genome`] - Genome data and construction
//! - [`genetics::mutation`] - Weight and structural mutation
//! - [`genetics::alignment`] - Matching / disjoint / excess classification
//! - [`genetics::crossover`] - Offspring from two parents
//! - [`genetics::distance`] - Compatibility distance
//! - [`genetics::registry`] - Tagged (de)serialization

/// Genetic encoding and operators.
pub mod genetics {
    /// Gene alignment by innovation number.
    pub mod alignment;
    /// Crossover of two parent genomes.
    pub mod crossover;
    /// Compatibility distance between genomes.
    pub mod distance;
    /// Node and connection genes.
    pub mod gene;
    /// The genome and its construction.
    pub mod genome;
    /// Innovation number assignment for new connections.
    ///
    /// The [`innovation::InnovationTracker`] trait is what structural mutations
    /// call; [`innovation::InnovationCounter`] is the stock implementation.
    pub mod innovation;
    /// Weight and structural mutation.
    pub mod mutation;
    /// Operator parameters.
    pub mod params;
    /// Randomness source injected into stochastic operators.
    pub mod random;
    /// Tagged persistence registry.
    pub mod registry;
}
