//! Evolvable feedforward networks.
//!
//! Implements layered networks with:
//! - Dense per-layer weight and bias tensors
//! - Forward propagation with output listeners
//! - Weight, bias and layer-growth mutations
//! - Crossover between networks of diverged shape

mod rng;
mod network;
mod mutations;
mod crossover;
pub mod observer;

pub use rng::{activation, NeuroRng};
pub use network::{Layer, NeuralNet};
pub(crate) use network::validate_topology;
pub use mutations::{MutationRates, MutationReport};
pub use observer::Observers;
