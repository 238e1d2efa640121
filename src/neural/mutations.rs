//! In-place weight, bias and layer-growth mutations.

use super::rng::NeuroRng;
use super::network::{Layer, NeuralNet};
use crate::error::{Error, Result};
use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};

/// Per-layer mutation probabilities and perturbation strengths
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationRates {
    /// Probability of growing a layer by one neuron
    pub layer_growth: f32,
    /// Probability of perturbing one weight of a layer
    pub weight_mutation: f32,
    /// Probability of perturbing one bias of a layer
    pub bias_mutation: f32,
    /// Weight perturbations are drawn from [-strength, strength)
    pub weight_strength: f32,
    /// Bias perturbations are drawn from [-strength, strength)
    pub bias_strength: f32,
}

impl Default for MutationRates {
    fn default() -> Self {
        Self {
            layer_growth: 0.001,
            weight_mutation: 0.25,
            bias_mutation: 0.1,
            weight_strength: 0.2,
            bias_strength: 0.2,
        }
    }
}

/// What a single [`NeuralNet::mutate`] call changed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MutationReport {
    pub layers_grown: usize,
    pub weights_mutated: usize,
    pub biases_mutated: usize,
}

impl MutationReport {
    pub fn total(&self) -> usize {
        self.layers_grown + self.weights_mutated + self.biases_mutated
    }

    pub fn merge(&mut self, other: MutationReport) {
        self.layers_grown += other.layers_grown;
        self.weights_mutated += other.weights_mutated;
        self.biases_mutated += other.biases_mutated;
    }
}

impl NeuralNet {
    /// Apply one round of mutations to every non-input layer, in order.
    ///
    /// Growth, weight and bias trials are independent; every one that fires
    /// is applied within this call.
    pub fn mutate(&mut self, rates: &MutationRates, rng: &mut NeuroRng) -> MutationReport {
        let mut report = MutationReport::default();

        for i in 1..self.sizes.len() {
            if rng.chance(rates.layer_growth) {
                self.append_neuron(i, rng);
                report.layers_grown += 1;
                log::debug!("Layer {} grew to {} neurons", i, self.sizes[i]);
            }

            if rng.chance(rates.weight_mutation) {
                let neuron = rng.random_int(0, self.sizes[i]);
                let input = rng.random_int(0, self.sizes[i - 1]);
                let delta = rng.random_float(-rates.weight_strength, rates.weight_strength);
                self.layers[i - 1].weights[[neuron, input]] += delta;
                report.weights_mutated += 1;
                log::trace!("Weight ({}, {}, {}) += {}", i, neuron, input, delta);
            }

            if rng.chance(rates.bias_mutation) {
                let neuron = rng.random_int(0, self.sizes[i]);
                let delta = rng.random_float(-rates.bias_strength, rates.bias_strength);
                self.layers[i - 1].biases[neuron] += delta;
                report.biases_mutated += 1;
                log::trace!("Bias ({}, {}) += {}", i, neuron, delta);
            }
        }

        report
    }

    /// Grow layer `layer` by one neuron, resizing every dependent tensor.
    ///
    /// The input layer cannot grow.
    pub fn grow_layer(&mut self, layer: usize, rng: &mut NeuroRng) -> Result<()> {
        if layer == 0 || layer >= self.sizes.len() {
            return Err(Error::InvalidTopology(format!(
                "cannot grow layer {} of a {}-layer network",
                layer,
                self.sizes.len()
            )));
        }
        self.append_neuron(layer, rng);
        Ok(())
    }

    /// Add one neuron to layer `i` (1 <= i < L) together with its incoming
    /// weights, its bias, its activation slot and one extra input weight for
    /// every neuron of layer `i + 1`.
    fn append_neuron(&mut self, i: usize, rng: &mut NeuroRng) {
        let current_size = self.sizes[i];

        add_weight_row(&mut self.layers[i - 1], rng);

        if i + 1 < self.sizes.len() {
            add_weight_column(&mut self.layers[i], rng);
        }

        let mut slots = Array1::<f32>::zeros(current_size + 1);
        slots
            .slice_mut(s![..current_size])
            .assign(&self.activations[i]);
        self.activations[i] = slots;

        self.sizes[i] = current_size + 1;
    }
}

/// New neuron: one more row of incoming weights and one more bias
fn add_weight_row(layer: &mut Layer, rng: &mut NeuroRng) {
    let (rows, cols) = layer.weights.dim();

    let mut new_weights = Array2::<f32>::zeros((rows + 1, cols));
    new_weights.slice_mut(s![..rows, ..]).assign(&layer.weights);
    for k in 0..cols {
        new_weights[[rows, k]] = rng.random_float(-1.0, 1.0);
    }
    layer.weights = new_weights;

    let mut new_biases = Array1::<f32>::zeros(rows + 1);
    new_biases.slice_mut(s![..rows]).assign(&layer.biases);
    new_biases[rows] = rng.random_float(-1.0, 1.0);
    layer.biases = new_biases;
}

/// Wider previous layer: one more incoming weight for every neuron
fn add_weight_column(layer: &mut Layer, rng: &mut NeuroRng) {
    let (rows, cols) = layer.weights.dim();

    let mut new_weights = Array2::<f32>::zeros((rows, cols + 1));
    new_weights.slice_mut(s![.., ..cols]).assign(&layer.weights);
    for j in 0..rows {
        new_weights[[j, cols]] = rng.random_float(-1.0, 1.0);
    }
    layer.weights = new_weights;
}
