//! Reads a corpus, builds a chain from it, and prints generated sentences separated by blank
//! lines.
//!
//! Usage: `babble [--sentences N] [--limit N] [--seed SEED] [--input PATH] < corpus.txt`

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use env_logger::Env;
use log::{debug, info};
use markov_babble::{Chain, Request, SentenceGenerator};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate sentences using Markov chains", long_about = None)]
struct Cli {
    /// Number of sentences to generate (> 0)
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    sentences: i64,

    /// Maximum word count of a sentence (0 for no maximum)
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    limit: i64,

    /// Seed the random number generator for reproducible output
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Read the corpus from a file instead of stdin
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q)
    #[arg(short = 'q', long, action = ArgAction::Count)]
    quiet: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let request = Request::new(cli.sentences, cli.limit)?;

    let chain = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("could not open {}", path.display()))?;
            Chain::from_reader(BufReader::new(file))?
        }
        None => Chain::from_reader(io::stdin().lock())?,
    };
    info!("learned {} states", chain.len());

    let rng = match cli.seed {
        Some(seed) => {
            debug!("seeding with {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let mut generator = SentenceGenerator::new(&chain, rng);
    let mut out = io::stdout().lock();
    for sentence in generator.sentences(request.limit).take(request.sentences) {
        writeln!(out, "{}\n", sentence?)?;
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = if quiet > 0 {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if verbose > 0 || quiet > 0 {
        builder.filter_level(level);
    }
    let _ = builder.try_init();
}
