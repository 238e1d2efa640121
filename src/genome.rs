//! Flattened, persistable snapshots of a network.
//!
//! Text layout, fields separated by `;` and values by `_`:
//!
//! ```text
//! layerCount;n0_n1_..;w0_w1_..;b0_b1_..
//! ```
//!
//! Weights are flattened layer by layer, then neuron, then incoming weight.
//! Biases are flattened layer by layer, then neuron. Floats are written in
//! their shortest round-trip form, so a save/load cycle is bit-exact.

use crate::error::{Error, Result};
use crate::neural::{Layer, NeuralNet};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Separates the four top-level fields
pub const RECORD_SEPARATOR: char = ';';
/// Separates values within a field
pub const VALUE_SEPARATOR: char = '_';

/// Immutable value snapshot of a network's topology and parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    layer_count: usize,
    neurons_per_layer: Vec<usize>,
    weights: Vec<f32>,
    biases: Vec<f32>,
}

impl Genome {
    pub fn new(
        layer_count: usize,
        neurons_per_layer: Vec<usize>,
        weights: Vec<f32>,
        biases: Vec<f32>,
    ) -> Self {
        Self {
            layer_count,
            neurons_per_layer,
            weights,
            biases,
        }
    }

    /// Flatten a network
    pub fn from_network(net: &NeuralNet) -> Self {
        let weights = net
            .layers()
            .iter()
            .flat_map(|layer| layer.weights().iter().copied())
            .collect();
        let biases = net
            .layers()
            .iter()
            .flat_map(|layer| layer.biases().iter().copied())
            .collect();

        Self {
            layer_count: net.layer_count(),
            neurons_per_layer: net.sizes().to_vec(),
            weights,
            biases,
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    pub fn neurons_per_layer(&self) -> &[usize] {
        &self.neurons_per_layer
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn biases(&self) -> &[f32] {
        &self.biases
    }

    /// Number of weights the declared topology requires, `None` on overflow
    pub fn expected_weights(&self) -> Option<usize> {
        self.neurons_per_layer
            .windows(2)
            .try_fold(0usize, |total, pair| total.checked_add(pair[0].checked_mul(pair[1])?))
    }

    /// Number of biases the declared topology requires, `None` on overflow
    pub fn expected_biases(&self) -> Option<usize> {
        self.neurons_per_layer
            .iter()
            .skip(1)
            .try_fold(0usize, |total, &n| total.checked_add(n))
    }

    /// Check that the declared topology accounts for exactly the values present
    pub fn validate(&self) -> Result<()> {
        if self.layer_count != self.neurons_per_layer.len() {
            return Err(Error::MalformedGenome(format!(
                "declares {} layers but lists {} layer sizes",
                self.layer_count,
                self.neurons_per_layer.len()
            )));
        }
        if self.layer_count < 2 {
            return Err(Error::MalformedGenome(format!(
                "needs at least 2 layers, declares {}",
                self.layer_count
            )));
        }
        if let Some(idx) = self.neurons_per_layer.iter().position(|&n| n == 0) {
            return Err(Error::MalformedGenome(format!("layer {} has no neurons", idx)));
        }

        let expected = self.expected_weights().ok_or_else(|| too_large(&self.neurons_per_layer))?;
        if self.weights.len() != expected {
            return Err(Error::MalformedGenome(format!(
                "topology {:?} needs {} weights, found {}",
                self.neurons_per_layer,
                expected,
                self.weights.len()
            )));
        }

        let expected = self.expected_biases().ok_or_else(|| too_large(&self.neurons_per_layer))?;
        if self.biases.len() != expected {
            return Err(Error::MalformedGenome(format!(
                "topology {:?} needs {} biases, found {}",
                self.neurons_per_layer,
                expected,
                self.biases.len()
            )));
        }
        Ok(())
    }

    /// Rebuild the network this genome describes
    pub fn to_network(&self) -> Result<NeuralNet> {
        self.validate()?;

        let mut layers = Vec::with_capacity(self.layer_count - 1);
        let mut weight_offset = 0;
        let mut bias_offset = 0;

        for pair in self.neurons_per_layer.windows(2) {
            let (n_inputs, n_neurons) = (pair[0], pair[1]);
            let n_weights = n_inputs * n_neurons;

            let weights = Array2::from_shape_vec(
                (n_neurons, n_inputs),
                self.weights[weight_offset..weight_offset + n_weights].to_vec(),
            )
            .map_err(|e| Error::MalformedGenome(e.to_string()))?;
            let biases = Array1::from_vec(self.biases[bias_offset..bias_offset + n_neurons].to_vec());

            layers.push(Layer::from_parts(weights, biases));
            weight_offset += n_weights;
            bias_offset += n_neurons;
        }

        Ok(NeuralNet::from_parts(self.neurons_per_layer.clone(), layers))
    }

    /// Write the text form to `path` in one piece
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_string())?;
        log::info!(
            "Genome saved: {:?} ({:?})",
            path.as_ref(),
            self.neurons_per_layer
        );
        Ok(())
    }

    /// Read and fully parse a genome from `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let genome: Genome = text.parse()?;
        log::debug!("Genome loaded: {:?} ({:?})", path.as_ref(), genome.neurons_per_layer);
        Ok(genome)
    }
}

fn too_large(sizes: &[usize]) -> Error {
    Error::MalformedGenome(format!("topology {:?} is too large to address", sizes))
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", VALUE_SEPARATOR)?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.layer_count, RECORD_SEPARATOR)?;
        write_joined(f, &self.neurons_per_layer)?;
        write!(f, "{}", RECORD_SEPARATOR)?;
        write_joined(f, &self.weights)?;
        write!(f, "{}", RECORD_SEPARATOR)?;
        write_joined(f, &self.biases)
    }
}

fn parse_token<T: FromStr>(token: &str, what: &str) -> Result<T> {
    let token = token.trim();
    token
        .parse()
        .map_err(|_| Error::MalformedGenome(format!("invalid {} '{}'", what, token)))
}

/// Split one field into values; a single trailing separator is tolerated
fn parse_values<T: FromStr>(field: &str, what: &str) -> Result<Vec<T>> {
    let field = field.trim();
    let field = field.strip_suffix(VALUE_SEPARATOR).unwrap_or(field);
    if field.is_empty() {
        return Ok(Vec::new());
    }
    field
        .split(VALUE_SEPARATOR)
        .map(|token| parse_token(token, what))
        .collect()
}

impl FromStr for Genome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.trim().split(RECORD_SEPARATOR).collect();
        if fields.len() != 4 {
            return Err(Error::MalformedGenome(format!(
                "expected 4 fields separated by '{}', found {}",
                RECORD_SEPARATOR,
                fields.len()
            )));
        }

        let genome = Genome::new(
            parse_token(fields[0], "layer count")?,
            parse_values(fields[1], "layer size")?,
            parse_values(fields[2], "weight")?,
            parse_values(fields[3], "bias")?,
        );
        genome.validate()?;
        Ok(genome)
    }
}

impl NeuralNet {
    /// Flatten this network into a genome
    pub fn to_genome(&self) -> Genome {
        Genome::from_network(self)
    }

    /// Rebuild a network from a genome
    pub fn from_genome(genome: &Genome) -> Result<Self> {
        genome.to_network()
    }

    pub fn save_genome<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_genome().save(path)
    }

    pub fn load_genome<P: AsRef<Path>>(path: P) -> Result<Self> {
        Genome::load(path)?.to_network()
    }
}
