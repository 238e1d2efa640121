//! # neurogenome
//!
//! Evolvable feedforward neural networks for scoring behaviours in a
//! simulation loop.
//!
//! ## Features
//!
//! - **Layered**: dense per-layer weight and bias tensors
//! - **Evolvable**: weight, bias and layer-growth mutations plus crossover
//!   between parents of different shapes
//! - **Persistent**: flat text genomes and binary population checkpoints
//! - **Reproducible**: every random choice goes through a seeded [`NeuroRng`]
//!
//! ## Quick Start
//!
//! ```rust
//! use neurogenome::{MutationRates, NeuralNet, NeuroRng};
//!
//! let mut rng = NeuroRng::new(42);
//! let mut mother = NeuralNet::new(&[2, 4, 1], &mut rng).unwrap();
//! let father = NeuralNet::new(&[2, 4, 1], &mut rng).unwrap();
//!
//! mother.mutate(&MutationRates::default(), &mut rng);
//! let mut child = NeuralNet::crossover(&mother, &father, &mut rng).unwrap();
//!
//! let outputs = child.feed_forward(&[0.5, -0.5]).unwrap();
//! assert_eq!(outputs.len(), 1);
//! ```
//!
//! ## Genomes
//!
//! ```rust
//! use neurogenome::{Genome, NeuralNet, NeuroRng};
//!
//! let mut rng = NeuroRng::new(7);
//! let net = NeuralNet::new(&[2, 3, 1], &mut rng).unwrap();
//!
//! let text = net.to_genome().to_string();
//! let genome: Genome = text.parse().unwrap();
//! let restored = genome.to_network().unwrap();
//! assert_eq!(restored.sizes(), net.sizes());
//! ```

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod genome;
pub mod neural;

// Re-export main types
pub use checkpoint::Checkpoint;
pub use config::{Config, LoggingConfig, NetworkConfig};
pub use error::{Error, Result};
pub use genome::Genome;
pub use neural::{activation, Layer, MutationRates, MutationReport, NeuralNet, NeuroRng};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
