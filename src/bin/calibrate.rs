use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tinyrand::{Seeded, Wyrand};
use tracing::{debug, info};

use swingfit::calibrate::{Calibrator, Config};
use swingfit::file;
use swingfit::player::{PlayerData, Roster};
use swingfit::print;
use swingfit::season::{MonteCarloSeason, SeasonSimulator};
use swingfit::stats::{BoxScore, StatsAggregator};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// player to calibrate; lists the roster when omitted
    player: Option<String>,

    /// JSON file to source the player roster from
    #[clap(short = 'r', long, default_value = "data/roster.json")]
    roster: PathBuf,

    /// JSON calibration config; defaults apply when omitted
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// number of search rounds
    #[clap(long)]
    rounds: Option<u64>,

    /// number of candidates evaluated per round
    #[clap(long)]
    candidates: Option<usize>,

    /// seed for the random number generator
    #[clap(short = 's', long, default_value_t = 42)]
    seed: u64,

    /// write the effective config to the given file
    #[clap(long)]
    write_config: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if let Some(0) = self.rounds {
            bail!("at least one round must be specified");
        }
        if let Some(0) = self.candidates {
            bail!("at least one candidate must be specified");
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let mut config: Config = match &args.config {
        None => Config::default(),
        Some(path) => file::read_json(path)?,
    };
    if let Some(rounds) = args.rounds {
        config.search.rounds = rounds;
    }
    if let Some(candidates) = args.candidates {
        config.search.candidates_per_round = candidates;
    }
    if let Some(path) = &args.write_config {
        file::write_json(path, &config)?;
        info!("wrote config to {}", path.display());
    }

    let roster = Roster::read_json_file(&args.roster)?;
    let Some(player) = &args.player else {
        info!("players in {}: {:?}", args.roster.display(), roster.names());
        return Ok(());
    };

    let calibrator: Calibrator = Calibrator::try_from(config)?;
    let mut rand = Wyrand::seed(args.seed);
    let result = calibrator.calibrate_player(&roster, player, &mut rand)?;
    info!(
        "calibrated {player}: {} with error {:.6} (initial {:.6}) after {} rounds, {} evaluations and {} improvements, took {:.3}s",
        result.abilities,
        result.error,
        result.initial_error,
        result.rounds,
        result.evaluations,
        result.improvements.len(),
        result.elapsed.as_millis() as f64 / 1_000.
    );

    let anchor = roster.anchor_abilities(player)?;
    let target = roster.target_stats(player)?;
    let distribution = calibrator
        .model()
        .probabilities(&result.abilities, target.hbp_rate);
    let counts = MonteCarloSeason.simulate(&distribution, target.plate_appearances, &mut rand);
    let simulated = BoxScore.aggregate(&counts, target.plate_appearances);

    let abilities_table = print::tabulate_abilities(&anchor, &result.abilities);
    info!("Abilities:\n{}", Console::default().render(&abilities_table));
    let distribution_table = print::tabulate_distribution(&distribution);
    info!("Outcome distribution:\n{}", Console::default().render(&distribution_table));
    let stats_table = print::tabulate_stats(&target, &simulated);
    info!("Target vs. simulated:\n{}", Console::default().render(&stats_table));
    Ok(())
}
