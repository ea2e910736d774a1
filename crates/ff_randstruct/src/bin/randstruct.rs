use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use ff_randstruct::FailurePolicy;
use ff_randstruct::Generator;
use ff_randstruct::GeneratorConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Classic,
    Multiloop,
}

/// Generate random RNA secondary structures in dot-bracket notation.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Starting configuration.
    #[arg(long, value_enum, default_value = "classic")]
    preset: Preset,

    /// JSON configuration file (replaces the preset).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum number of unpaired bases before the builder may stop.
    #[arg(short, long)]
    length: Option<usize>,

    /// Seed for reproducible output.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Only accept structures containing the motif.
    #[arg(long)]
    force_motif: bool,

    /// Motif to search for after collapsing runs of unpaired bases.
    #[arg(long)]
    motif: Option<String>,

    /// Give up motif search after this many structures.
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Abort on the first failed generation attempt.
    #[arg(long)]
    strict: bool,

    /// Number of structures to print.
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Require the printed structures to be pairwise distinct.
    #[arg(long)]
    unique: bool,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    dump_config: bool,

    /// Verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn configuration(&self) -> Result<GeneratorConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_json_file(path)?,
            None => match self.preset {
                Preset::Classic => GeneratorConfig::classic(),
                Preset::Multiloop => GeneratorConfig::multiloop(),
            },
        };
        if let Some(length) = self.length {
            config.builder.lengthmin = length;
        }
        if self.force_motif {
            config.motif.force = true;
        }
        if let Some(motif) = &self.motif {
            config.motif.motif = motif.clone();
        }
        if self.max_attempts.is_some() {
            config.motif.max_attempts = self.max_attempts;
        }
        if self.strict {
            config.motif.on_failure = FailurePolicy::Propagate;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config = cli.configuration()?;
    if cli.dump_config {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }

    let generator = Generator::try_from(&config)?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    info!("Using seed {seed}.");

    let structures = if cli.unique {
        let mut rng = StdRng::seed_from_u64(seed);
        generator.sample_unique(cli.count, 1000 * cli.count.max(1), &mut rng)?
    } else {
        generator.sample_batch(cli.count, seed)?
    };

    for s in structures {
        println!("{s} {:>4}", s.len());
    }
    Ok(())
}
