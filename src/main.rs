//! neurogenome - CLI Entry Point
//!
//! Create, evaluate, mutate and breed networks stored as genome files.

use clap::{Parser, Subcommand};
use neurogenome::{Config, MutationReport, NeuralNet, NeuroRng};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "neurogenome")]
#[command(version)]
#[command(about = "Evolvable feedforward networks persisted as genomes")]
struct Cli {
    /// Configuration file (YAML); defaults are used when it is missing
    #[arg(short, long, global = true, default_value = "neurogenome.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "neurogenome.yaml")]
        output: PathBuf,
    },

    /// Create a random network from the configured layer sizes
    Create {
        /// Genome file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Random seed (overrides the configuration)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run one forward pass and print the outputs
    Feed {
        /// Genome file
        genome: PathBuf,

        /// Comma-separated input values
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        inputs: Vec<f32>,
    },

    /// Apply mutation rounds to a genome
    Mutate {
        /// Genome file to mutate
        genome: PathBuf,

        /// Genome file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Number of mutation rounds
        #[arg(short, long, default_value = "1")]
        rounds: u32,

        /// Random seed (overrides the configuration)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Breed a child from two parent genomes
    Crossover {
        /// Mother genome file
        mother: PathBuf,

        /// Father genome file
        father: PathBuf,

        /// Genome file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Random seed (overrides the configuration)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print topology and parameter statistics of a genome
    Inspect {
        /// Genome file
        genome: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.log_level.as_str()),
    )
    .init();

    match cli.command {
        Commands::Init { output } => generate_config(output)?,
        Commands::Create { output, seed } => create_network(&config, output, seed)?,
        Commands::Feed { genome, inputs } => feed_network(genome, &inputs)?,
        Commands::Mutate {
            genome,
            output,
            rounds,
            seed,
        } => mutate_network(&config, genome, output, rounds, seed)?,
        Commands::Crossover {
            mother,
            father,
            output,
            seed,
        } => breed_networks(&config, mother, father, output, seed)?,
        Commands::Inspect { genome } => inspect_genome(genome)?,
    }

    Ok(())
}

fn load_config(path: &Path) -> neurogenome::Result<Config> {
    if path.exists() {
        Config::from_file(path)
    } else {
        Ok(Config::default())
    }
}

fn generate_config(output: PathBuf) -> neurogenome::Result<()> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}

fn create_network(config: &Config, output: PathBuf, seed: Option<u64>) -> neurogenome::Result<()> {
    let mut network_config = config.network.clone();
    if seed.is_some() {
        network_config.rng_seed = seed;
    }

    let (net, rng) = NeuralNet::from_config(&network_config)?;
    net.save_genome(&output)?;

    println!("Created network {:?}", net.sizes());
    println!("  Parameters: {}", net.parameter_count());
    println!("  Seed: {}", rng.seed());
    println!("  Genome: {:?}", output);
    Ok(())
}

fn feed_network(genome: PathBuf, inputs: &[f32]) -> neurogenome::Result<()> {
    let mut net = NeuralNet::load_genome(&genome)?;
    let outputs = net.feed_forward(inputs)?;

    let formatted: Vec<String> = outputs.iter().map(|v| format!("{:.6}", v)).collect();
    println!("{}", formatted.join(","));
    Ok(())
}

fn mutate_network(
    config: &Config,
    genome: PathBuf,
    output: PathBuf,
    rounds: u32,
    seed: Option<u64>,
) -> neurogenome::Result<()> {
    let mut net = NeuralNet::load_genome(&genome)?;
    let mut rng = NeuroRng::from_seed_option(seed.or(config.network.rng_seed));
    let rates = &config.network.mutation_rates;

    let mut report = MutationReport::default();
    for _ in 0..rounds {
        report.merge(net.mutate(rates, &mut rng));
    }
    net.save_genome(&output)?;

    println!("=== Mutation Complete ===");
    println!("Rounds: {}", rounds);
    println!("Layers grown: {}", report.layers_grown);
    println!("Weights mutated: {}", report.weights_mutated);
    println!("Biases mutated: {}", report.biases_mutated);
    println!("Topology: {:?}", net.sizes());
    println!("Seed: {}", rng.seed());
    Ok(())
}

fn breed_networks(
    config: &Config,
    mother: PathBuf,
    father: PathBuf,
    output: PathBuf,
    seed: Option<u64>,
) -> neurogenome::Result<()> {
    let mother = NeuralNet::load_genome(&mother)?;
    let father = NeuralNet::load_genome(&father)?;
    let mut rng = NeuroRng::from_seed_option(seed.or(config.network.rng_seed));

    let child = NeuralNet::crossover(&mother, &father, &mut rng)?;
    child.save_genome(&output)?;

    println!("Mother: {:?}", mother.sizes());
    println!("Father: {:?}", father.sizes());
    println!("Child:  {:?}", child.sizes());
    println!("Child genome: {:?}", output);
    Ok(())
}

fn inspect_genome(genome: PathBuf) -> neurogenome::Result<()> {
    println!("=== Genome Analysis ===");
    println!("File: {:?}", genome);
    println!();

    let net = NeuralNet::load_genome(&genome)?;

    println!("Layers: {}", net.layer_count());
    println!("Topology: {:?}", net.sizes());
    println!("Hidden neurons: {}", net.complexity());
    println!("Parameters: {}", net.parameter_count());
    println!("Valid: {}", net.is_valid());
    println!();

    for (idx, layer) in net.layers().iter().enumerate() {
        let (w_min, w_max) = min_max(layer.weights().iter().copied());
        let (b_min, b_max) = min_max(layer.biases().iter().copied());
        println!(
            "Layer {}: {} neurons x {} inputs, weights [{:.3}, {:.3}], biases [{:.3}, {:.3}]",
            idx + 1,
            layer.n_neurons(),
            layer.n_inputs(),
            w_min,
            w_max,
            b_min,
            b_max
        );
    }

    Ok(())
}

fn min_max(values: impl Iterator<Item = f32>) -> (f32, f32) {
    values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
