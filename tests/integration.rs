//! Integration tests for neurogenome

use neurogenome::checkpoint::Checkpoint;
use neurogenome::{activation, Error, Genome, MutationRates, NetworkConfig, NeuralNet, NeuroRng};

fn assert_shape_invariants(net: &NeuralNet) {
    let sizes = net.sizes();
    assert_eq!(net.layers().len(), sizes.len() - 1);
    for i in 1..sizes.len() {
        let layer = &net.layers()[i - 1];
        assert_eq!(layer.weights().dim(), (sizes[i], sizes[i - 1]), "weights of layer {}", i);
        assert_eq!(layer.biases().len(), sizes[i], "biases of layer {}", i);
    }
    assert!(net.check_invariants().is_ok());
}

#[test]
fn test_forward_pass_is_deterministic() {
    let inputs = [0.3f32, -0.7, 0.9];

    let mut a = NeuralNet::new(&[3, 5, 2], &mut NeuroRng::new(2024)).unwrap();
    let mut b = NeuralNet::new(&[3, 5, 2], &mut NeuroRng::new(2024)).unwrap();

    let out_a = a.feed_forward(&inputs).unwrap();
    let out_b = b.feed_forward(&inputs).unwrap();

    let bits_a: Vec<u32> = out_a.iter().map(|v| v.to_bits()).collect();
    let bits_b: Vec<u32> = out_b.iter().map(|v| v.to_bits()).collect();
    assert_eq!(bits_a, bits_b);
}

#[test]
fn test_activations_are_bounded() {
    let mut rng = NeuroRng::new(5);
    for _ in 0..20 {
        let mut net = NeuralNet::new(&[4, 6, 6, 3], &mut rng).unwrap();
        let inputs: Vec<f32> = (0..4).map(|_| rng.random_float(-1.0, 1.0)).collect();
        net.feed_forward(&inputs).unwrap();

        for layer in &net.activations()[1..] {
            assert!(layer.iter().all(|&a| a > -1.0 && a < 1.0));
        }
    }
}

#[test]
fn test_all_ones_scenario() {
    let mut net = NeuralNet::new(&[2, 3, 1], &mut NeuroRng::new(42)).unwrap();
    net.fill(1.0, 1.0);

    let outputs = net.feed_forward(&[1.0, 1.0]).unwrap();

    let hidden = activation(2.0);
    assert!((hidden - 0.96403).abs() < 1e-4);
    for &a in net.activations()[1].iter() {
        assert!((a - hidden).abs() < 1e-4);
    }

    // Bias is not applied, so the output is the squashed sum of three hidden values
    assert_eq!(outputs.len(), 1);
    assert!((outputs[0] - activation(3.0 * hidden)).abs() < 1e-4);
    assert!((outputs[0] - 0.99387).abs() < 1e-3);
}

#[test]
fn test_genome_roundtrip_after_growth() {
    let mut rng = NeuroRng::new(77);
    let mut net = NeuralNet::new(&[3, 4, 4, 2], &mut rng).unwrap();
    net.grow_layer(2, &mut rng).unwrap();
    net.grow_layer(1, &mut rng).unwrap();

    let text = net.to_genome().to_string();
    let restored = text.parse::<Genome>().unwrap().to_network().unwrap();

    assert_eq!(restored.sizes(), net.sizes());
    assert_eq!(restored.layers(), net.layers());
    assert_shape_invariants(&restored);
}

#[test]
fn test_mutation_shape_invariants() {
    let mut rng = NeuroRng::new(31337);
    let mut net = NeuralNet::new(&[5, 3, 4, 2], &mut rng).unwrap();
    let rates = MutationRates {
        layer_growth: 0.1,
        weight_mutation: 0.5,
        bias_mutation: 0.5,
        ..MutationRates::default()
    };

    for _ in 0..300 {
        net.mutate(&rates, &mut rng);
        assert_shape_invariants(&net);
        assert_eq!(net.sizes()[0], 5);
    }

    assert!(net.sizes()[1..].iter().zip([3, 4, 2]).any(|(&now, start)| now > start));
    assert_eq!(net.feed_forward(&[0.1; 5]).unwrap().len(), net.output_size());
}

#[test]
fn test_default_rates_run_long() {
    let mut rng = NeuroRng::new(8);
    let mut net = NeuralNet::new(&[4, 4, 2], &mut rng).unwrap();
    let rates = MutationRates::default();

    for _ in 0..5_000 {
        net.mutate(&rates, &mut rng);
    }

    assert_shape_invariants(&net);
    assert_eq!(net.sizes()[0], 4);
    assert!(net.is_valid());
}

#[test]
fn test_crossover_shape_law() {
    let mut rng = NeuroRng::new(99);
    let mut mother = NeuralNet::new(&[3, 4, 4, 2], &mut rng).unwrap();
    let mut father = NeuralNet::new(&[3, 4, 4, 2], &mut rng).unwrap();

    mother.grow_layer(1, &mut rng).unwrap();
    mother.grow_layer(3, &mut rng).unwrap();
    father.grow_layer(2, &mut rng).unwrap();
    father.grow_layer(2, &mut rng).unwrap();

    let child = NeuralNet::crossover(&mother, &father, &mut rng).unwrap();

    for i in 0..child.layer_count() {
        assert_eq!(child.sizes()[i], mother.sizes()[i].max(father.sizes()[i]));
    }
    assert_shape_invariants(&child);
}

#[test]
fn test_crossover_inheritance_law() {
    let mut rng = NeuroRng::new(4242);
    let mut mother = NeuralNet::new(&[2, 3, 2], &mut rng).unwrap();
    let mut father = NeuralNet::new(&[2, 3, 2], &mut rng).unwrap();
    mother.grow_layer(2, &mut rng).unwrap();
    father.grow_layer(1, &mut rng).unwrap();

    let child = NeuralNet::crossover(&mother, &father, &mut rng).unwrap();

    for i in 1..child.layer_count() {
        for j in 0..child.sizes()[i] {
            let b = child.bias(i, j).unwrap();
            match (mother.bias(i, j), father.bias(i, j)) {
                (Some(m), Some(f)) => assert!(b == m || b == f),
                (Some(m), None) => assert_eq!(b, m),
                (None, Some(f)) => assert_eq!(b, f),
                (None, None) => unreachable!("bias beyond both parents"),
            }

            for k in 0..child.sizes()[i - 1] {
                let w = child.weight(i, j, k).unwrap();
                match (mother.weight(i, j, k), father.weight(i, j, k)) {
                    (Some(m), Some(f)) => assert!(w == m || w == f),
                    (Some(m), None) => assert_eq!(w, m),
                    (None, Some(f)) => assert_eq!(w, f),
                    (None, None) => assert_fresh_sample(w),
                }
            }
        }
    }
}

/// Values drawn at construction lie in [-1, 1) on the 0.001 grid
fn assert_fresh_sample(value: f32) {
    assert!((-1.0..1.0).contains(&value), "{} outside [-1, 1)", value);
    let scaled = value * 1000.0;
    assert!((scaled - scaled.round()).abs() < 1e-3, "{} not a multiple of 0.001", value);
}

#[test]
fn test_crossover_position_owned_by_neither_parent() {
    let mut rng = NeuroRng::new(99);
    let mut mother = NeuralNet::new(&[2, 3, 2], &mut rng).unwrap();
    let mut father = NeuralNet::new(&[2, 3, 2], &mut rng).unwrap();
    mother.grow_layer(2, &mut rng).unwrap();
    father.grow_layer(1, &mut rng).unwrap();
    assert_eq!(mother.sizes(), &[2, 3, 3]);
    assert_eq!(father.sizes(), &[2, 4, 2]);

    let child = NeuralNet::crossover(&mother, &father, &mut rng).unwrap();
    assert_eq!(child.sizes(), &[2, 4, 3]);

    // Neuron 2 of layer 2 only exists in the mother, input 3 only in the father
    assert_eq!(mother.weight(2, 2, 3), None);
    assert_eq!(father.weight(2, 2, 3), None);
    let gap = child.weight(2, 2, 3).expect("child owns the position");
    assert_fresh_sample(gap);

    // Its neighbours still come from their single owner
    assert_eq!(child.weight(2, 2, 0), mother.weight(2, 2, 0));
    assert_eq!(child.weight(2, 0, 3), father.weight(2, 0, 3));
    assert_eq!(child.weight(2, 1, 3), father.weight(2, 1, 3));
}

#[test]
fn test_malformed_genome_layer_count() {
    let err = "3;2_4;0.1_0.2_0.3_0.4_0.5_0.6_0.7_0.8;0.1_0.2_0.3_0.4"
        .parse::<Genome>()
        .unwrap_err();
    assert!(matches!(err, Error::MalformedGenome(_)));

    let genome = Genome::new(3, vec![2, 4], vec![0.0; 8], vec![0.0; 4]);
    assert!(matches!(NeuralNet::from_genome(&genome), Err(Error::MalformedGenome(_))));
}

#[test]
fn test_genome_file_persistence() {
    let config = NetworkConfig::with_layers(vec![4, 6, 3]).with_seed(555);
    let (mut net, mut rng) = NeuralNet::from_config(&config).unwrap();
    for _ in 0..50 {
        net.mutate(&config.mutation_rates, &mut rng);
    }

    let path = std::env::temp_dir().join("neurogenome_integration_genome.aps");
    net.save_genome(&path).expect("Failed to save genome");
    let mut loaded = NeuralNet::load_genome(&path).expect("Failed to load genome");

    assert_eq!(loaded.sizes(), net.sizes());
    assert_eq!(loaded.layers(), net.layers());

    let inputs = [0.2, 0.4, -0.6, 0.8];
    assert_eq!(loaded.feed_forward(&inputs).unwrap(), net.feed_forward(&inputs).unwrap());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_corrupt_genome_file() {
    let path = std::env::temp_dir().join("neurogenome_integration_corrupt.aps");
    std::fs::write(&path, "2;2_1;0.5_oops;0.1").unwrap();

    assert!(matches!(NeuralNet::load_genome(&path), Err(Error::MalformedGenome(_))));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_observer_sees_every_pass() {
    let mut net = NeuralNet::new(&[2, 2], &mut NeuroRng::new(1)).unwrap();
    let rx = net.subscribe();

    let first = net.feed_forward(&[1.0, 0.0]).unwrap();
    let second = net.feed_forward(&[0.0, 1.0]).unwrap();
    assert!(net.feed_forward(&[1.0]).is_err());

    let received: Vec<Vec<f32>> = rx.try_iter().collect();
    assert_eq!(received, vec![first, second]);

    drop(rx);
    net.feed_forward(&[0.5, 0.5]).unwrap();
    assert_eq!(net.observer_count(), 0);
}

#[test]
fn test_population_checkpoint() {
    let config = NetworkConfig::with_layers(vec![3, 3, 1]).with_seed(10);
    let mut rng = NeuroRng::new(10);

    let mut population: Vec<NeuralNet> = (0..8)
        .map(|_| NeuralNet::new(&config.layer_sizes, &mut rng).unwrap())
        .collect();
    for net in &mut population {
        net.grow_layer(1, &mut rng).unwrap();
    }

    let checkpoint = Checkpoint::from_networks(3, config, &population, rng.seed());
    let path = std::env::temp_dir().join("neurogenome_integration_checkpoint.bin");
    checkpoint.save(&path).expect("Failed to save checkpoint");

    let loaded = Checkpoint::load(&path).expect("Failed to load checkpoint");
    let restored = loaded.networks().unwrap();

    assert_eq!(loaded.generation, 3);
    assert_eq!(restored.len(), population.len());
    for (a, b) in restored.iter().zip(&population) {
        assert_eq!(a.sizes(), b.sizes());
        assert_eq!(a.layers(), b.layers());
    }

    std::fs::remove_file(&path).ok();
}
