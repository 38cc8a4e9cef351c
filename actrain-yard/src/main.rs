use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use actrain_core::{Outcome, Regulator};
use actrain_yard::{watchdog, StdDelay, TrainFactory};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "actrain", about = "Run staged actuator trains", version)]
struct Cli {
    /// Extra train definitions (TOML)
    #[arg(long, short = 'c', global = true, env = "ACTRAIN_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered trains
    List,

    /// Print the stage layout of a train
    Summary {
        /// Train name
        train: String,
    },

    /// Ignite a train and block until it finishes
    Run {
        /// Train name
        train: String,

        /// Stage to start from
        #[arg(long, default_value = "0")]
        from: usize,

        /// Extinguish the train after this many seconds
        #[arg(long)]
        timeout_s: Option<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let mut factory = TrainFactory::new();
    if let Some(path) = &cli.config {
        factory
            .load_toml(path)
            .with_context(|| format!("loading {}", path.display()))?;
    }

    match cli.command {
        Commands::List => {
            for name in factory.names() {
                println!("{name}");
            }
            Ok(())
        }
        Commands::Summary { train } => {
            let regulator = Regulator::new();
            let train = factory.build(&train, &regulator)?;
            print!("{}", train.summary());
            Ok(())
        }
        Commands::Run {
            train,
            from,
            timeout_s,
        } => run(&factory, &train, from, timeout_s),
    }
}

fn run(factory: &TrainFactory, name: &str, from: usize, timeout_s: Option<f64>) -> anyhow::Result<()> {
    let timeout = timeout_s
        .map(Duration::try_from_secs_f64)
        .transpose()
        .context("invalid --timeout-s")?;

    let regulator = Regulator::new();
    let mut train = factory.build(name, &regulator)?;

    let outcome = thread::scope(|s| {
        let (done, finished) = mpsc::channel::<()>();
        if let Some(timeout) = timeout {
            let regulator = &regulator;
            s.spawn(move || watchdog::watch(regulator, &finished, timeout));
        }

        let mut last_stage = None;
        let outcome = train.ignite_with(from, &mut StdDelay, |train| {
            let stage = train.current_stage_index();
            if last_stage != Some(stage) {
                last_stage = Some(stage);
                for actuator in train.stage_actuators(stage) {
                    debug!(
                        stage,
                        actuator = actuator.name(),
                        target = ?actuator.target(),
                        "stage member"
                    );
                }
            }
        });
        drop(done);
        outcome
    })?;

    match outcome {
        Outcome::Success => info!(train = name, "train completed"),
        Outcome::Cancelled => warn!(train = name, "train extinguished"),
    }
    Ok(())
}
