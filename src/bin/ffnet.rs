//! Build a feed-forward network and run one forward pass.
//!
//! Usage: cargo run --bin ffnet -- --widths 100,100,100,30,10 --node perceptron --fill 1.0

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ffnet::{Model, ModelConfig, NodeKind};
use log::info;
use ndarray::Array1;
use ndarray_rand::rand::{rngs::StdRng, SeedableRng};

#[derive(Parser, Debug)]
#[command(name = "ffnet", about = "Run a forward pass through a feed-forward network")]
struct Args {
    /// JSON layer description. Takes precedence over --widths and --node.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Layer widths, the first one being the input layer.
    #[arg(short, long, value_delimiter = ',', default_value = "100,100,100,30,10")]
    widths: Vec<usize>,

    /// Node kind of every layer after the input layer.
    #[arg(short, long, default_value = "perceptron")]
    node: NodeKind,

    /// Comma separated input values.
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    input: Option<Vec<f64>>,

    /// Value of every input when --input is not given.
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    fill: f64,

    /// Seed for the weight initialization.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ModelConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ModelConfig::from_widths(&args.widths, args.node),
    };

    let model = match args.seed {
        Some(seed) => Model::from_config_with_rng(&config, &mut StdRng::seed_from_u64(seed)),
        None => Model::from_config(&config),
    }
    .context("failed to build the model")?;
    info!("model has {} layers", model.depth());
    println!("{}", model.details());

    let input = match args.input {
        Some(values) => Array1::from(values),
        None => Array1::from_elem(model.input_width(), args.fill),
    };
    let output = model
        .forward(input.view())
        .context("forward pass failed")?;
    println!("{}", output);

    Ok(())
}
