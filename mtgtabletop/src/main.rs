use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

use mtgtabletop::{Options, ScryfallClient, ScryfallSource, SheetConfig};

/// Turn Magic: The Gathering deck lists in .dec format into deck faces for
/// Tabletop Simulator.
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// one or more deck lists in .dec format
    #[arg(required = true, value_name = "DECK")]
    decks: Vec<PathBuf>,
    /// print status messages
    #[arg(short, long)]
    verbose: bool,
    /// pick a random artwork for every basic land
    #[arg(long, alias = "randomize-lands")]
    randomise_lands: bool,
    /// JSON file with the grid geometry and output settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// URL or file of the hidden card image in the last cell
    #[arg(long, value_name = "LOCATION")]
    cardback: Option<String>,
    /// directory for the deck faces, defaults to the directory of each deck
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

fn sheet_config(opts: &Opts) -> mtgtabletop::Result<SheetConfig> {
    let mut config = match &opts.config {
        Some(path) => SheetConfig::from_file(path)?,
        None => SheetConfig::default(),
    };
    if let Some(cardback) = &opts.cardback {
        config.cardback = cardback.clone();
    }
    config.validated()
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    if let Err(e) = mtgtabletop::setup_logger(opts.verbose) {
        eprintln!("couldn't set up logging: {}", e);
    }

    let config = match sheet_config(&opts) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(dir) = &opts.output_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            error!("couldn't create output directory {}: {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
    }

    let source = match ScryfallClient::new() {
        Ok(client) => ScryfallSource::new(client),
        Err(e) => {
            error!("couldn't create http client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = Options {
        config,
        randomise_lands: opts.randomise_lands,
        output_dir: opts.output_dir.clone(),
    };
    let mut rng = rand::thread_rng();
    let outcomes = mtgtabletop::process_decks(&opts.decks, &options, &source, &mut rng);

    let failed = outcomes.iter().filter(|(_, o)| o.is_err()).count();
    if failed > 0 {
        error!("{} of {} decks failed", failed, outcomes.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
