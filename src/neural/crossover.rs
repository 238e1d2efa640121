//! Genetic crossover between neural networks.

use super::rng::NeuroRng;
use super::network::NeuralNet;
use crate::error::{Error, Result};

/// Probability that a scalar both parents own is taken from the mother
const MOTHER_INHERITANCE: f32 = 0.5;

impl NeuralNet {
    /// Combine two parents into a fresh child.
    ///
    /// The child takes the larger of the two sizes for every layer. Each
    /// weight and bias comes from the mother or the father with equal odds
    /// when both own that position, and from the only owner otherwise.
    /// Positions neither parent owns keep their random initial value.
    pub fn crossover(mother: &Self, father: &Self, rng: &mut NeuroRng) -> Result<Self> {
        if mother.layer_count() != father.layer_count() {
            return Err(Error::IncompatibleParents {
                mother: mother.layer_count(),
                father: father.layer_count(),
            });
        }

        let sizes: Vec<usize> = mother
            .sizes
            .iter()
            .zip(&father.sizes)
            .map(|(&m, &f)| m.max(f))
            .collect();

        let mut child = Self::new(&sizes, rng)?;

        for (idx, layer) in child.layers.iter_mut().enumerate() {
            let from_mother = &mother.layers[idx];
            let from_father = &father.layers[idx];

            for ((j, k), w) in layer.weights.indexed_iter_mut() {
                let m = from_mother.weights.get((j, k)).copied();
                let f = from_father.weights.get((j, k)).copied();
                if let Some(value) = inherit(m, f, rng) {
                    *w = value;
                }
            }

            for (j, b) in layer.biases.indexed_iter_mut() {
                let m = from_mother.biases.get(j).copied();
                let f = from_father.biases.get(j).copied();
                if let Some(value) = inherit(m, f, rng) {
                    *b = value;
                }
            }
        }

        log::debug!(
            "Crossover {:?} x {:?} -> {:?}",
            mother.sizes,
            father.sizes,
            child.sizes
        );

        Ok(child)
    }
}

fn inherit(mother: Option<f32>, father: Option<f32>, rng: &mut NeuroRng) -> Option<f32> {
    match (mother, father) {
        (Some(m), Some(f)) => Some(if rng.chance(MOTHER_INHERITANCE) { m } else { f }),
        (Some(m), None) => Some(m),
        (None, Some(f)) => Some(f),
        (None, None) => None,
    }
}
