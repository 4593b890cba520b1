#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

mod common;

use std::collections::HashSet;

use common::{ScriptedRandom, init_logging};
use strand::genetics::gene::NodeRole;
use strand::genetics::genome::Genome;
use strand::genetics::innovation::{InnovationCounter, InnovationPolicy};
use strand::genetics::params::Params;
use strand::genetics::random::RngSource;

fn single_gene_genome(weight: f64) -> Genome {
    let mut rng = ScriptedRandom::new().reals(&[weight]);
    Genome::new(1, 1, true, &mut rng)
}

#[test]
fn test_perturbation_stays_within_amplitude() {
    for seed in 0..200 {
        let mut rng = RngSource::seeded(seed);
        let mut genome = single_gene_genome(0.5);

        genome.mutate_weights(1.0, 0.1, 0.0, &mut rng);

        let weight = genome.connections()[0].weight;
        assert!(
            (0.4..=0.6).contains(&weight),
            "seed {seed}: weight {weight} left [0.4, 0.6]"
        );
    }
}

#[test]
fn test_perturbation_draw_order() {
    // perturb fires, magnitude 0.07, negative sign, no replacement
    let mut rng = ScriptedRandom::new()
        .chances(&[true, false, false])
        .reals(&[0.07]);
    let mut genome = single_gene_genome(0.5);

    genome.mutate_weights(0.9, 0.1, 0.1, &mut rng);

    assert!((genome.connections()[0].weight - 0.43).abs() < 1e-12);
    assert!(rng.is_exhausted());
}

#[test]
fn test_replacement_wins_over_perturbation() {
    let mut rng = ScriptedRandom::new()
        .chances(&[true, true, true])
        .reals(&[0.05, 0.9]);
    let mut genome = single_gene_genome(0.5);

    genome.mutate_weights(0.5, 0.1, 0.5, &mut rng);

    assert_eq!(genome.connections()[0].weight, 0.9);
    assert!(rng.is_exhausted());
}

#[test]
fn test_weight_mutation_touches_disabled_genes() {
    let mut rng = ScriptedRandom::new().chances(&[false, true]).reals(&[0.33]);
    let mut genome = single_gene_genome(0.5);
    genome.connections_mut()[0].enabled = false;

    genome.mutate_weights(0.0, 0.1, 1.0, &mut rng);

    assert_eq!(genome.connections()[0].weight, 0.33);
    assert!(!genome.connections()[0].enabled);
}

#[test]
fn test_weight_mutation_keeps_structure() {
    let mut rng = RngSource::seeded(9);
    let mut genome = Genome::new(4, 3, true, &mut rng);
    let before = genome.clone();

    genome.mutate_weights(1.0, 0.5, 0.5, &mut rng);

    assert_eq!(genome.nodes(), before.nodes());
    assert_eq!(genome.connections().len(), before.connections().len());
    for (after, before) in genome.connections().iter().zip(before.connections()) {
        assert_eq!(after.endpoints(), before.endpoints());
        assert_eq!(after.innovation(), before.innovation());
        assert_eq!(after.enabled, before.enabled);
    }
}

#[test]
fn test_add_node_splits_connection() {
    init_logging();
    let mut rng = ScriptedRandom::new().reals(&[0.3, 0.6]).indices(&[1]);
    let mut genome = Genome::new(2, 1, true, &mut rng);
    let mut tracker = InnovationCounter::for_layout(2, 1, InnovationPolicy::Unique);

    let node = genome.add_random_node_gene(&mut rng, &mut tracker);

    assert_eq!(node, Some(4));
    assert!(rng.is_exhausted());
    assert_eq!(genome.nodes().len(), 4);
    assert_eq!(genome.hidden_count(), 1);
    assert_eq!(genome.node(4).map(|n| n.role()), Some(NodeRole::Hidden));

    let split = genome.connection_by_innovation(2).expect("split gene kept");
    assert!(!split.enabled);
    assert_eq!(split.weight, 0.6);

    assert_eq!(genome.connections().len(), 4);
    let incoming = &genome.connections()[2];
    assert_eq!(incoming.endpoints(), (2, 4));
    assert_eq!(incoming.weight, 1.0);
    assert!(incoming.enabled);
    assert_eq!(incoming.innovation(), 3);

    let outgoing = &genome.connections()[3];
    assert_eq!(outgoing.endpoints(), (4, 3));
    assert_eq!(outgoing.weight, 0.6);
    assert!(outgoing.enabled);
    assert_eq!(outgoing.innovation(), 4);

    assert_eq!(genome.next_node_id(), 5);
}

#[test]
fn test_add_node_can_split_disabled_gene() {
    let mut rng = ScriptedRandom::new().reals(&[0.2]).indices(&[0]);
    let mut genome = Genome::new(1, 1, false, &mut rng);
    let mut tracker = InnovationCounter::for_layout(1, 1, InnovationPolicy::Unique);

    assert_eq!(genome.add_random_node_gene(&mut rng, &mut tracker), Some(3));
    assert_eq!(genome.enabled_count(), 2);
}

#[test]
fn test_add_node_without_connections_is_noop() {
    let mut rng = ScriptedRandom::new();
    let mut genome = Genome::new(2, 0, true, &mut rng);
    let mut tracker = InnovationCounter::default();
    let before = genome.clone();

    assert_eq!(genome.add_random_node_gene(&mut rng, &mut tracker), None);
    assert_eq!(genome, before);
    assert_eq!(tracker.peek(), 1);
}

#[test]
fn test_add_connection_exhausts_on_saturated_genome() {
    init_logging();
    let mut rng = RngSource::seeded(5);
    let mut genome = Genome::new(3, 2, true, &mut rng);
    let mut tracker = InnovationCounter::for_layout(3, 2, InnovationPolicy::Unique);

    let added = genome.add_random_connection_gene(50, &mut rng, &mut tracker);

    assert!(added.is_none());
    assert_eq!(genome.connections().len(), 6);
    assert_eq!(tracker.peek(), 7);
}

#[test]
fn test_add_connection_retries_until_legal() {
    // nodes: 1, 2 inputs; 3 output; 4 hidden (split of 1 -> 3)
    let mut rng = ScriptedRandom::new()
        .reals(&[0.3, 0.6, 0.42])
        .indices(&[0, 2, 3, 0, 3, 3, 3, 1, 3]);
    let mut genome = Genome::new(2, 1, true, &mut rng);
    let mut tracker = InnovationCounter::for_layout(2, 1, InnovationPolicy::Unique);
    genome.add_random_node_gene(&mut rng, &mut tracker);

    // 3 -> 4: output source. 1 -> 4: already present. 4 -> 4: self loop. 2 -> 4: legal.
    let added = genome
        .add_random_connection_gene(10, &mut rng, &mut tracker)
        .copied()
        .expect("a legal pair was scripted");

    assert!(rng.is_exhausted());
    assert_eq!(added.endpoints(), (2, 4));
    assert_eq!(added.weight, 0.42);
    assert!(added.enabled);
    assert_eq!(added.innovation(), 5);
    assert_eq!(genome.connections().len(), 5);
    assert_eq!(genome.connections().last(), Some(&added));
}

#[test]
fn test_add_connection_rejects_input_destination() {
    let mut rng = ScriptedRandom::new().reals(&[0.5]).indices(&[0, 0]);
    let mut genome = Genome::new(1, 1, true, &mut rng);
    let mut tracker = InnovationCounter::for_layout(1, 1, InnovationPolicy::Unique);
    let before = genome.clone();

    assert!(
        genome
            .add_random_connection_gene(1, &mut rng, &mut tracker)
            .is_none()
    );
    assert_eq!(genome, before);
}

#[test]
fn test_add_connection_zero_attempts() {
    let mut rng = ScriptedRandom::new().reals(&[0.5]);
    let mut genome = Genome::new(1, 1, true, &mut rng);
    let mut tracker = InnovationCounter::default();

    assert!(
        genome
            .add_random_connection_gene(0, &mut rng, &mut tracker)
            .is_none()
    );
}

#[test]
fn test_structural_mutations_preserve_invariants() {
    init_logging();
    let mut rng = RngSource::seeded(2024);
    let mut tracker = InnovationCounter::for_layout(3, 2, InnovationPolicy::PerGeneration);
    let mut genome = Genome::new(3, 2, true, &mut rng);

    for step in 0..300 {
        if step % 3 == 0 {
            genome.add_random_node_gene(&mut rng, &mut tracker);
        } else {
            genome.add_random_connection_gene(20, &mut rng, &mut tracker);
        }
        if step % 10 == 0 {
            tracker.start_generation();
        }

        assert_eq!(genome.validate(), Ok(()), "step {step}");
        let pairs: HashSet<_> = genome.connections().iter().map(|g| g.endpoints()).collect();
        assert_eq!(pairs.len(), genome.connections().len());
        for gene in genome.connections() {
            let source = genome.node(gene.source()).expect("source exists");
            let dest = genome.node(gene.dest()).expect("dest exists");
            assert_ne!(source.role(), NodeRole::Output);
            assert_ne!(dest.role(), NodeRole::Input);
        }
    }

    assert_eq!(genome.count_role(NodeRole::Input), 3);
    assert_eq!(genome.count_role(NodeRole::Output), 2);
    assert_eq!(genome.hidden_count(), 100);
}

#[test]
fn test_mutate_reports_structural_changes() {
    let params = Params {
        add_node_chance: 1.0,
        add_connection_chance: 1.0,
        add_connection_attempts: 50,
        ..Params::default()
    };
    let mut rng = RngSource::seeded(11);
    let mut tracker = InnovationCounter::for_layout(2, 1, InnovationPolicy::Unique);
    let mut genome = Genome::new(2, 1, true, &mut rng);

    let report = genome.mutate(&params, &mut rng, &mut tracker);

    assert_eq!(report.added_node, Some(4));
    assert_eq!(genome.hidden_count(), 1);
    if let Some(innovation) = report.added_connection {
        assert!(genome.connection_by_innovation(innovation).is_some());
        assert_eq!(genome.connections().len(), 5);
    } else {
        assert_eq!(genome.connections().len(), 4);
    }
}

#[test]
fn test_mutate_without_structural_chances() {
    let params = Params {
        add_node_chance: 0.0,
        add_connection_chance: 0.0,
        ..Params::default()
    };
    let mut rng = RngSource::seeded(12);
    let mut tracker = InnovationCounter::default();
    let mut genome = Genome::new(3, 3, true, &mut rng);

    for _ in 0..20 {
        let report = genome.mutate(&params, &mut rng, &mut tracker);
        assert_eq!(report.added_node, None);
        assert_eq!(report.added_connection, None);
    }
    assert_eq!(genome.connections().len(), 9);
    assert_eq!(genome.nodes().len(), 6);
}

#[test]
fn test_default_tracker_never_reuses_construction_numbers() {
    init_logging();
    let mut rng = ScriptedRandom::new().reals(&[0.5]).indices(&[0]);
    let mut genome = Genome::new(1, 1, true, &mut rng);
    let mut tracker = InnovationCounter::default();

    genome.add_random_node_gene(&mut rng, &mut tracker);

    let innovations: Vec<_> = genome.connections().iter().map(|g| g.innovation()).collect();
    assert_eq!(innovations, vec![1, 2, 3]);
    assert_eq!(genome.validate(), Ok(()));
    assert_eq!(genome.align(&genome).matching.len(), 3);
    assert_eq!(genome.compatibility_distance(&genome, 1.0, 1.0, 0.4), 0.0);
}

#[test]
fn test_mismatched_layout_tracker_stays_consistent() {
    let mut rng = ScriptedRandom::new()
        .reals(&[0.1, 0.2, 0.3])
        .indices(&[0]);
    let mut genome = Genome::new(3, 1, true, &mut rng);
    let mut tracker = InnovationCounter::for_layout(2, 1, InnovationPolicy::Global);

    assert_eq!(genome.add_random_node_gene(&mut rng, &mut tracker), Some(5));

    let innovations: Vec<_> = genome.connections().iter().map(|g| g.innovation()).collect();
    assert_eq!(innovations, vec![1, 2, 3, 4, 5]);
    assert_eq!(genome.validate(), Ok(()));
}

#[test]
fn test_shared_number_taken_by_other_gene_is_replaced() {
    use strand::genetics::innovation::InnovationTracker;

    let mut tracker = InnovationCounter::new(InnovationPolicy::Global);
    // Another lineage already owns 1 for 1 -> 3.
    assert_eq!(tracker.innovation(1, 3), 1);

    let mut rng = ScriptedRandom::new().reals(&[0.5]).indices(&[0]);
    let mut genome = Genome::new(1, 1, true, &mut rng);
    genome.add_random_node_gene(&mut rng, &mut tracker);

    let incoming = &genome.connections()[1];
    assert_eq!(incoming.endpoints(), (1, 3));
    assert_eq!(incoming.innovation(), 2);
    assert_eq!(genome.connections()[2].innovation(), 3);
    assert_eq!(genome.validate(), Ok(()));
}

#[test]
fn test_default_tracker_long_run_stays_valid() {
    let mut rng = RngSource::seeded(404);
    let mut tracker = InnovationCounter::default();
    let mut genome = Genome::new(3, 2, true, &mut rng);

    for step in 0..200 {
        if step % 2 == 0 {
            genome.add_random_node_gene(&mut rng, &mut tracker);
        } else {
            genome.add_random_connection_gene(20, &mut rng, &mut tracker);
        }
        if step % 25 == 0 {
            tracker.start_generation();
        }
        assert_eq!(genome.validate(), Ok(()), "step {step}");
    }
}
