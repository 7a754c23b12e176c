use chess_mind::agent::ai::SelfPlayTrainer;
use chess_mind::game_repr::GameOutcome;
use chess_mind::{Engine, EngineConfig};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "self-play",
    about = "Train the evaluation network by playing the engine against itself"
)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of games to play (overrides the configuration)
    #[arg(long)]
    games: Option<usize>,

    /// Directory receiving network_<id>.txt and book_<id>.txt
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Network file to resume training from
    #[arg(long)]
    network: Option<PathBuf>,

    /// Record book file to resume from
    #[arg(long)]
    record_book: Option<PathBuf>,

    /// Play and grow the record book without training the network
    #[arg(long)]
    no_train: bool,

    /// Random seed (overrides the configuration)
    #[arg(long)]
    seed: Option<u64>,
}

fn run(args: Args) -> chess_mind::Result<()> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(games) = args.games {
        config.training.games = games;
    }
    if let Some(dir) = args.output_dir {
        config.training.output_dir = dir;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.no_train {
        config.training.train_network = false;
    }

    let mut engine = Engine::new(config)?;
    if let Some(path) = &args.network {
        engine.load_network(path)?;
    }
    if let Some(path) = &args.record_book {
        engine.load_record_book(path)?;
    }

    let mut trainer = SelfPlayTrainer::new(engine);
    let records = trainer.run()?;

    let count = |outcome: GameOutcome| records.iter().filter(|r| r.outcome == outcome).count();
    info!(
        "played {} games: {} white wins, {} black wins, {} draws, record book has {} positions",
        records.len(),
        count(GameOutcome::WhiteWins),
        count(GameOutcome::BlackWins),
        count(GameOutcome::Draw),
        trainer.engine().record_book().len()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
