//! Neural network structure and forward propagation.

use super::rng::{activation, NeuroRng};
use super::observer::Observers;
use crate::error::{Error, Result};
use ndarray::{Array1, Array2};
use std::sync::mpsc::Receiver;

/// Parameters of one non-input layer.
///
/// Row `j` of `weights` holds the incoming weights of neuron `j`, so the
/// shape is `(neurons, inputs)` and `biases` has one entry per row.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub(crate) weights: Array2<f32>,
    pub(crate) biases: Array1<f32>,
}

impl Layer {
    /// Create a layer with every weight and bias drawn from (-1, 1)
    pub fn random(n_inputs: usize, n_neurons: usize, rng: &mut NeuroRng) -> Self {
        let weights = Array2::from_shape_fn((n_neurons, n_inputs), |_| rng.random_float(-1.0, 1.0));
        let biases = Array1::from_shape_fn(n_neurons, |_| rng.random_float(-1.0, 1.0));
        Self { weights, biases }
    }

    pub(crate) fn from_parts(weights: Array2<f32>, biases: Array1<f32>) -> Self {
        Self { weights, biases }
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn biases(&self) -> &Array1<f32> {
        &self.biases
    }

    #[inline]
    pub fn n_inputs(&self) -> usize {
        self.weights.ncols()
    }

    #[inline]
    pub fn n_neurons(&self) -> usize {
        self.weights.nrows()
    }

    /// Weighted sums of `inputs` squashed through [`activation`].
    ///
    /// Biases are carried by the layer but not added here.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output.mapv_inplace(activation);
        output
    }
}

/// Layered feedforward network whose layers can grow one neuron at a time.
#[derive(Clone, Debug)]
pub struct NeuralNet {
    /// Neurons per layer, `sizes[0]` being the input width
    pub(crate) sizes: Vec<usize>,
    /// `layers[i - 1]` holds the parameters of layer `i`
    pub(crate) layers: Vec<Layer>,
    /// Last computed value of every neuron, input layer included
    pub(crate) activations: Vec<Array1<f32>>,
    observers: Observers,
}

/// Reject topologies with fewer than two layers or an empty layer
pub(crate) fn validate_topology(sizes: &[usize]) -> Result<()> {
    if sizes.len() < 2 {
        return Err(Error::InvalidTopology(format!(
            "need at least 2 layers, got {}",
            sizes.len()
        )));
    }
    if let Some(idx) = sizes.iter().position(|&n| n == 0) {
        return Err(Error::InvalidTopology(format!("layer {} has no neurons", idx)));
    }
    Ok(())
}

impl NeuralNet {
    /// Create a randomly initialized network with the given layer sizes
    pub fn new(sizes: &[usize], rng: &mut NeuroRng) -> Result<Self> {
        validate_topology(sizes)?;

        let layers = sizes
            .windows(2)
            .map(|pair| Layer::random(pair[0], pair[1], rng))
            .collect();

        Ok(Self::from_parts(sizes.to_vec(), layers))
    }

    /// Assemble a network from already-shaped layers.
    ///
    /// Callers guarantee that `layers` matches `sizes`.
    pub(crate) fn from_parts(sizes: Vec<usize>, layers: Vec<Layer>) -> Self {
        let activations = sizes.iter().map(|&n| Array1::zeros(n)).collect();
        Self {
            sizes,
            layers,
            activations,
            observers: Observers::new(),
        }
    }

    /// Run a forward pass and notify listeners with the produced outputs
    pub fn feed_forward(&mut self, inputs: &[f32]) -> Result<Vec<f32>> {
        if inputs.len() != self.sizes[0] {
            return Err(Error::DimensionMismatch {
                expected: self.sizes[0],
                found: inputs.len(),
            });
        }

        self.activations[0] = Array1::from_vec(inputs.to_vec());
        for i in 1..self.sizes.len() {
            let next = self.layers[i - 1].forward(&self.activations[i - 1]);
            self.activations[i] = next;
        }

        let outputs = self.outputs();
        self.observers.notify(&outputs);
        Ok(outputs)
    }

    /// Register a listener for forward-pass outputs
    pub fn subscribe(&mut self) -> Receiver<Vec<f32>> {
        self.observers.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn input_size(&self) -> usize {
        self.sizes[0]
    }

    #[inline]
    pub fn output_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// Parameter layers, one per non-input layer
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn activations(&self) -> &[Array1<f32>] {
        &self.activations
    }

    /// Activations of the output layer from the last forward pass
    pub fn outputs(&self) -> Vec<f32> {
        self.activations[self.activations.len() - 1].to_vec()
    }

    /// Incoming weight `k` of neuron `j` in layer `layer` (1-based on layers)
    pub fn weight(&self, layer: usize, neuron: usize, input: usize) -> Option<f32> {
        let params = self.layers.get(layer.checked_sub(1)?)?;
        params.weights.get((neuron, input)).copied()
    }

    pub fn weight_mut(&mut self, layer: usize, neuron: usize, input: usize) -> Option<&mut f32> {
        let params = self.layers.get_mut(layer.checked_sub(1)?)?;
        params.weights.get_mut((neuron, input))
    }

    pub fn bias(&self, layer: usize, neuron: usize) -> Option<f32> {
        let params = self.layers.get(layer.checked_sub(1)?)?;
        params.biases.get(neuron).copied()
    }

    pub fn bias_mut(&mut self, layer: usize, neuron: usize) -> Option<&mut f32> {
        let params = self.layers.get_mut(layer.checked_sub(1)?)?;
        params.biases.get_mut(neuron)
    }

    /// Overwrite every weight and bias with fixed values
    pub fn fill(&mut self, weight: f32, bias: f32) {
        for layer in &mut self.layers {
            layer.weights.fill(weight);
            layer.biases.fill(bias);
        }
    }

    /// Number of hidden neurons (complexity metric)
    #[inline]
    pub fn complexity(&self) -> usize {
        self.sizes[1..self.sizes.len() - 1].iter().sum()
    }

    /// Get total number of parameters (weights + biases)
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.biases.len())
            .sum()
    }

    /// Check if network is valid (no NaN/Inf)
    pub fn is_valid(&self) -> bool {
        self.layers.iter().all(|layer| {
            layer.weights.iter().all(|w| w.is_finite()) && layer.biases.iter().all(|b| b.is_finite())
        })
    }

    /// Verify that every tensor agrees with `sizes`
    pub fn check_invariants(&self) -> Result<()> {
        validate_topology(&self.sizes)?;
        if self.layers.len() != self.sizes.len() - 1 {
            return Err(Error::InvalidTopology(format!(
                "{} parameter layers for {} layers",
                self.layers.len(),
                self.sizes.len()
            )));
        }
        if self.activations.len() != self.sizes.len() {
            return Err(Error::InvalidTopology(format!(
                "{} activation slots for {} layers",
                self.activations.len(),
                self.sizes.len()
            )));
        }

        for i in 1..self.sizes.len() {
            let layer = &self.layers[i - 1];
            if layer.n_inputs() != self.sizes[i - 1] {
                return Err(Error::InvalidTopology(format!(
                    "layer {} neurons take {} inputs, previous layer has {}",
                    i,
                    layer.n_inputs(),
                    self.sizes[i - 1]
                )));
            }
            if layer.n_neurons() != self.sizes[i] || layer.biases.len() != self.sizes[i] {
                return Err(Error::InvalidTopology(format!(
                    "layer {} has {} weight rows and {} biases for {} neurons",
                    i,
                    layer.n_neurons(),
                    layer.biases.len(),
                    self.sizes[i]
                )));
            }
        }

        for (i, slots) in self.activations.iter().enumerate() {
            if slots.len() != self.sizes[i] {
                return Err(Error::InvalidTopology(format!(
                    "layer {} has {} activation slots for {} neurons",
                    i,
                    slots.len(),
                    self.sizes[i]
                )));
            }
        }
        Ok(())
    }
}
