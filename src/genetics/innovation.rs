//! Historical marking for new connection genes.
//!
//! Structural mutations ask an [`InnovationTracker`] for the number of every
//! connection they create. Whether two genomes making the same structural
//! change receive the same number is a policy of the tracker, not of the genome.

use std::collections::HashMap;

use log::trace;
use serde::{Deserialize, Serialize};

use super::gene::{Innovation, NodeId};

/// Hands out innovation numbers for new connection genes.
pub trait InnovationTracker {
    /// Returns the innovation number for a new `source -> dest` connection.
    ///
    /// May return a number handed out before, depending on the tracker's policy.
    fn innovation(&mut self, source: NodeId, dest: NodeId) -> Innovation;

    /// Returns a number never handed out before and greater than `floor`.
    ///
    /// Genomes fall back to this when [`InnovationTracker::innovation`]
    /// answers with a number they already carry.
    fn fresh(&mut self, floor: Innovation) -> Innovation;
}

impl<T: InnovationTracker + ?Sized> InnovationTracker for &mut T {
    fn innovation(&mut self, source: NodeId, dest: NodeId) -> Innovation {
        (**self).innovation(source, dest)
    }

    fn fresh(&mut self, floor: Innovation) -> Innovation {
        (**self).fresh(floor)
    }
}

/// When identical structural mutations share a number.
///
/// Sharing is keyed on the `(source, dest)` node ids alone. Node ids are
/// allocated per genome, so two genomes that split different connections can
/// both create node 4, and their unrelated `4 -> 3` genes then share a number
/// and align as matching genes. Use [`InnovationPolicy::Unique`] when that
/// conflation is unwanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InnovationPolicy {
    /// Every request receives a fresh number.
    Unique,
    /// Requests for the same `(source, dest)` pair share a number until
    /// [`InnovationCounter::start_generation`] is called.
    #[default]
    PerGeneration,
    /// Requests for the same `(source, dest)` pair always share a number.
    Global,
}

/// Monotonically increasing innovation counter.
#[derive(Debug, Clone)]
pub struct InnovationCounter {
    next: Innovation,
    policy: InnovationPolicy,
    /// Numbers below this were assigned by genome construction.
    layout_end: Innovation,
    seen: HashMap<(NodeId, NodeId), Innovation>,
}

impl Default for InnovationCounter {
    fn default() -> Self {
        Self::new(InnovationPolicy::default())
    }
}

impl InnovationCounter {
    /// Creates a counter whose first number is 1.
    pub fn new(policy: InnovationPolicy) -> Self {
        Self {
            next: 1,
            policy,
            layout_end: 1,
            seen: HashMap::new(),
        }
    }

    /// Creates a counter for genomes built with `inputs` inputs and `outputs` outputs.
    ///
    /// Construction numbers connections `1..=inputs * outputs` in input-major
    /// order; this counter continues after them and knows those pairs, so
    /// deduplicating policies agree with freshly built genomes.
    pub fn for_layout(inputs: usize, outputs: usize, policy: InnovationPolicy) -> Self {
        let mut counter = Self::new(policy);
        let mut innovation: Innovation = 1;
        for i in 0..inputs {
            for o in 0..outputs {
                let source = (i + 1) as NodeId;
                let dest = (inputs + o + 1) as NodeId;
                counter.seen.insert((source, dest), innovation);
                innovation += 1;
            }
        }
        counter.next = innovation;
        counter.layout_end = innovation;
        counter
    }

    /// Active policy.
    pub fn policy(&self) -> InnovationPolicy {
        self.policy
    }

    /// The number the next fresh request will receive.
    pub fn peek(&self) -> Innovation {
        self.next
    }

    /// Forgets the pairs recorded during the current generation.
    ///
    /// Only has an effect under [`InnovationPolicy::PerGeneration`]; the
    /// construction layout is always kept.
    pub fn start_generation(&mut self) {
        if self.policy != InnovationPolicy::PerGeneration {
            return;
        }
        let layout_end = self.layout_end;
        self.seen.retain(|_, innovation| *innovation < layout_end);
    }

    fn take_next(&mut self) -> Innovation {
        let innovation = self.next;
        self.next += 1;
        innovation
    }
}

impl InnovationTracker for InnovationCounter {
    fn innovation(&mut self, source: NodeId, dest: NodeId) -> Innovation {
        if self.policy == InnovationPolicy::Unique {
            return self.take_next();
        }
        if let Some(&known) = self.seen.get(&(source, dest)) {
            trace!("reusing innovation {known} for {source} -> {dest}");
            return known;
        }
        let innovation = self.take_next();
        self.seen.insert((source, dest), innovation);
        innovation
    }

    fn fresh(&mut self, floor: Innovation) -> Innovation {
        self.next = self.next.max(floor + 1);
        self.take_next()
    }
}
