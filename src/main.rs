//! fpgen command line.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fpgen::{Counts, GenResult, Generator, GeneratorConfig};

/// Generate edge-case SMT-LIB floating-point benchmarks
#[derive(Parser, Debug)]
#[command(name = "fpgen")]
#[command(version, long_about = None)]
struct Cli {
    /// Variants per class tuple for the classification predicates
    #[arg(long, value_name = "N", default_value_t = 0)]
    test_classify: u32,

    /// Variants per class tuple for the comparison relations
    #[arg(long, value_name = "N", default_value_t = 0)]
    test_relations: u32,

    /// Variants per class tuple for unary arithmetic
    #[arg(long, value_name = "N", default_value_t = 0)]
    test_unary: u32,

    /// Variants per class tuple for binary arithmetic
    #[arg(long, value_name = "N", default_value_t = 0)]
    test_binary: u32,

    /// Variants per class tuple for fused multiply-add
    #[arg(long, value_name = "N", default_value_t = 0)]
    test_ternary: u32,

    /// Variants per class tuple (or random interior per corner) for conversions
    #[arg(long, value_name = "N", default_value_t = 0)]
    test_conversion: u32,

    /// Output root; one directory per operator is created below it
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Salt prepended to every seed string
    #[arg(long, value_name = "S")]
    seed_salt: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn counts(&self) -> Counts {
        Counts {
            classify: self.test_classify,
            relations: self.test_relations,
            unary: self.test_unary,
            binary: self.test_binary,
            ternary: self.test_ternary,
            conversion: self.test_conversion,
        }
    }

    fn load_config(&self) -> GenResult<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_json_file(path)?,
            None => GeneratorConfig::default(),
        };
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(salt) = &self.seed_salt {
            config.seed_salt = salt.clone();
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> GenResult<usize> {
    let config = cli.load_config()?;
    let mut generator = Generator::new(config)?;
    generator.run(&cli.counts())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match run(&cli) {
        Ok(written) => {
            log::info!("wrote {} benchmarks", written);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
