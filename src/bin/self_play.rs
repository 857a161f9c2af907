//! Generates self-play training data with the uniform evaluator and writes it with bincode.
//!
//! Usage: cargo run --release --bin self_play -- --games 10 --output examples.bin

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use zerochess::config::{DirichletNoise, MoveSelection, SearchConfig, SelfPlayConfig};
use zerochess::engine::self_play::{LabeledExample, SelfPlay};
use zerochess::engine::uniform_evaluator::UniformEvaluator;
use zerochess::rules::ChessPosition;

#[derive(Parser, Debug)]
#[command(name = "self_play")]
#[command(about = "Play self-play episodes and save the labeled positions", long_about = None)]
struct Args {
    /// Number of episodes to play
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Simulations per move
    #[arg(long, default_value_t = 25)]
    sims: usize,

    /// PUCT exploration constant
    #[arg(long, default_value_t = 1.0)]
    c_puct: f32,

    /// Time steps kept in the encoded state
    #[arg(long, default_value_t = 1)]
    history: usize,

    /// Mix Dirichlet noise into the root priors
    #[arg(long)]
    noise: bool,

    /// Play the most visited move instead of sampling
    #[arg(long)]
    greedy: bool,

    /// Start from this FEN instead of the standard position
    #[arg(long)]
    fen: Option<String>,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Where to write the examples
    #[arg(long, default_value = "examples.bin")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut search = SearchConfig::new().with_simulations(args.sims).with_c_puct(args.c_puct);
    if args.noise {
        search = search.with_root_noise(DirichletNoise::default());
    }
    let selection = if args.greedy { MoveSelection::Greedy } else { MoveSelection::Sample };
    let config = SelfPlayConfig::new()
        .with_search(search)
        .with_history(args.history)
        .with_selection(selection);

    let start = match &args.fen {
        Some(fen) => ChessPosition::from_fen(fen).context("invalid --fen")?,
        None => ChessPosition::initial(),
    };

    let mut self_play = SelfPlay::with_seed(UniformEvaluator, config, args.seed)?;
    let mut examples: Vec<LabeledExample> = Vec::new();
    for game in 0..args.games {
        let episode = self_play.run_episode_from(start.clone())?;
        info!(
            "Game {}/{}: {} plies, {:?}",
            game + 1,
            args.games,
            episode.plies,
            episode.outcome.termination
        );
        examples.extend(episode.into_labeled()?);
    }

    let file = File::create(&args.output).with_context(|| format!("creating {}", args.output.display()))?;
    bincode::serialize_into(BufWriter::new(file), &examples)?;
    info!("Wrote {} examples to {}", examples.len(), args.output.display());
    Ok(())
}
