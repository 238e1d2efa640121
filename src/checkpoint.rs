//! Binary checkpoints of a population of genomes.

use crate::config::NetworkConfig;
use crate::error::{Error, Result};
use crate::genome::Genome;
use crate::neural::NeuralNet;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const MAGIC: &[u8; 4] = b"NGEN";

/// Population snapshot for resuming an evolution run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Version for compatibility checking
    pub version: u32,
    /// Generation the population belongs to
    pub generation: u64,
    /// Configuration the population was created with
    pub config: NetworkConfig,
    /// One genome per individual
    pub genomes: Vec<Genome>,
    /// Random seed (for reproducibility)
    pub random_seed: u64,
}

impl Checkpoint {
    /// Current checkpoint version
    pub const VERSION: u32 = 1;

    pub fn new(generation: u64, config: NetworkConfig, genomes: Vec<Genome>, random_seed: u64) -> Self {
        Self {
            version: Self::VERSION,
            generation,
            config,
            genomes,
            random_seed,
        }
    }

    /// Snapshot a population of networks
    pub fn from_networks(
        generation: u64,
        config: NetworkConfig,
        networks: &[NeuralNet],
        random_seed: u64,
    ) -> Self {
        let genomes = networks.iter().map(NeuralNet::to_genome).collect();
        Self::new(generation, config, genomes, random_seed)
    }

    /// Rebuild every network; fails on the first malformed genome
    pub fn networks(&self) -> Result<Vec<NeuralNet>> {
        self.genomes.iter().map(Genome::to_network).collect()
    }

    /// Save checkpoint to binary file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        let encoded = bincode::serialize(self)?;
        writer.write_all(&encoded)?;
        writer.flush()?;

        log::info!(
            "Checkpoint saved: {:?} (generation {}, {} genomes)",
            path.as_ref(),
            self.generation,
            self.genomes.len()
        );
        Ok(())
    }

    /// Load checkpoint from binary file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(Error::InvalidFormat("Invalid magic bytes".to_string()));
        }

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        let checkpoint: Checkpoint = bincode::deserialize(&buffer)?;

        if checkpoint.version != Self::VERSION {
            return Err(Error::VersionMismatch {
                expected: Self::VERSION,
                found: checkpoint.version,
            });
        }

        Ok(checkpoint)
    }

    /// Get approximate size in bytes
    pub fn size_bytes(&self) -> usize {
        bincode::serialized_size(self).unwrap_or(0) as usize
    }
}
