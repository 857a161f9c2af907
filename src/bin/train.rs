//! Runs the self-play, train and pit loop with the convolutional network.
//!
//! Usage: cargo run --release --features torch --bin train -- --iterations 80

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use zerochess::config::{SearchConfig, SelfPlayConfig, TrainingConfig};
use zerochess::engine::conv_net_evaluator::{ConvNetConfig, ConvNetEvaluator};
use zerochess::engine::trainer::Trainer;

#[derive(Parser, Debug)]
#[command(name = "train")]
#[command(about = "Train a chess network by self-play", long_about = None)]
struct Args {
    #[arg(long, default_value_t = 80)]
    iterations: usize,

    /// Self-play episodes per iteration
    #[arg(long, default_value_t = 100)]
    episodes: usize,

    /// Simulations per move
    #[arg(long, default_value_t = 25)]
    sims: usize,

    #[arg(long, default_value_t = 1.0)]
    c_puct: f32,

    /// Win fraction a candidate needs to replace the current network
    #[arg(long, default_value_t = 0.55)]
    threshold: f32,

    #[arg(long, default_value_t = 20)]
    pit_games: usize,

    #[arg(long, default_value_t = 4)]
    residual_blocks: usize,

    #[arg(long, default_value_t = 64)]
    filters: i64,

    /// Weights to start from
    #[arg(long)]
    checkpoint: Option<PathBuf>,

    /// Where to save the final weights
    #[arg(long, default_value = "model.ot")]
    output: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let net_config = ConvNetConfig::default().with_tower(args.residual_blocks, args.filters);
    let model = match &args.checkpoint {
        Some(path) => ConvNetEvaluator::load(net_config, path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConvNetEvaluator::new(net_config),
    };

    let search = SearchConfig::new().with_simulations(args.sims).with_c_puct(args.c_puct);
    let config = TrainingConfig::new()
        .with_self_play(SelfPlayConfig::new().with_search(search))
        .with_iterations(args.iterations)
        .with_episodes(args.episodes)
        .with_pit_games(args.pit_games)
        .with_threshold(args.threshold)
        .with_output(args.output.clone());

    let mut trainer = Trainer::with_seed(model, config, args.seed);
    let accepted = trainer.run()?;
    info!(
        "Accepted {}/{} candidates, saved to {}",
        accepted,
        args.iterations,
        args.output.display()
    );
    Ok(())
}
