//! Denim CLI - run grid population simulations from the terminal.

mod founders;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use denim_core::SimulationConfig;
use denim_world::{ConsoleRenderer, GlyphTable, Renderer, Simulation};
use std::path::{Path, PathBuf};
use tokio::signal;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "denim")]
#[command(author, version, long_about = None)]
#[command(about = "Denim - evolving populations on a walled grid")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation, rendering each epoch
    Run {
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of epochs (overrides the configuration)
        #[arg(short, long)]
        epochs: Option<u64>,

        /// Random seed (overrides the configuration)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Delay between epochs in milliseconds
        #[arg(long, default_value = "200")]
        interval_ms: u64,

        /// Skip rendering; only print the final report
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the effective configuration as JSON
    Config {
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_telemetry(cli.json_logs)?;

    match cli.command {
        Commands::Run {
            config,
            epochs,
            seed,
            interval_ms,
            quiet,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(epochs) = epochs {
                config.num_epochs = epochs;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            run(config, Duration::from_millis(interval_ms.max(1)), quiet).await
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(SimulationConfig::default()),
    }
}

async fn run(config: SimulationConfig, pace: Duration, quiet: bool) -> Result<()> {
    let glyphs = GlyphTable::default();
    glyphs.check_complete()?;

    let mut placement = founders::scatter(&config);
    let num_epochs = config.num_epochs;
    let mut sim = Simulation::new(config, &mut placement)?;
    let mut renderer = ConsoleRenderer::new(std::io::stdout(), glyphs);

    if !quiet {
        renderer.render_board(sim.board())?;
    }

    let mut ticker = interval(pace);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    for _ in 0..num_epochs {
        tokio::select! {
            _ = &mut shutdown => {
                info!(epoch = sim.board().epoch(), "Stopping between epochs");
                break;
            }
            _ = ticker.tick() => {}
        }

        let board = sim.step()?;
        if !quiet {
            renderer.render_board(board)?;
        }
    }

    let report = sim.report();
    renderer.render_text(&serde_json::to_string_pretty(&report)?)?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
