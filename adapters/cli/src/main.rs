#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Claimfield session.

mod route;
mod text_backend;

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use claimfield_core::{AgentKind, SessionConfig};
use claimfield_rendering::{Color, Presentation, RenderingBackend, Scene};
use claimfield_system_simulation::Simulation;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::{route::Route, text_backend::TextBackend};

const WINDOW_TITLE: &str = "claimfield";
const BACKGROUND: Color = Color::from_rgb_u8(0x22, 0x22, 0x22);

/// Headless Claimfield territory simulation.
#[derive(Parser, Debug)]
#[command(name = "claimfield", version)]
struct Args {
    /// TOML file with session settings; omitted fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Overrides the session seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the number of bots.
    #[arg(long)]
    bots: Option<usize>,

    /// Scripted player input, repeated until the run ends. Each leg is a
    /// heading (N, S, W or E) followed by the ticks it is held for.
    #[arg(long, default_value = "E30,S30,W30,N30")]
    route: String,

    /// Stop as soon as the player dies instead of letting the bots play on.
    #[arg(long)]
    stop_on_game_over: bool,

    /// Log every claim in addition to session milestones.
    #[arg(long, short)]
    verbose: bool,
}

/// Entry point for the Claimfield command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install the log subscriber")?;

    let config = load_config(&args)?;
    let route: Route = args
        .route
        .parse()
        .with_context(|| format!("invalid --route `{}`", args.route))?;

    let mut simulation = Simulation::new(config).context("invalid session configuration")?;
    let scene = Scene::from_world(simulation.world(), BACKGROUND);
    let backend = TextBackend::new(args.ticks, route, args.stop_on_game_over, io::stdout());
    backend.run(
        Presentation::new(WINDOW_TITLE, BACKGROUND, scene),
        |_, input, scene| {
            simulation.step(input.keys);
            scene.refresh(simulation.world());
        },
    )?;

    info!(
        ticks = simulation.tick(),
        game_over = simulation.is_game_over(),
        "session finished"
    );
    println!("final scoreboard after {} ticks", simulation.tick());
    let mut bot_number = 0;
    for entry in simulation.scoreboard() {
        let name = match entry.kind {
            AgentKind::Player => "You".to_owned(),
            AgentKind::Bot => {
                bot_number += 1;
                format!("Bot{bot_number}")
            }
        };
        let status = if entry.alive { "alive" } else { "dead" };
        println!("  {name:<6}{:>5}  {status}", entry.score);
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => SessionConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(bots) = args.bots {
        config.bot_count = bots;
    }
    config.validate().context("invalid session configuration")?;
    Ok(config)
}
