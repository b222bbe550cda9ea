//! # Parcelbots Main Entry Point
//!
//! Headless driver: loads the configuration and board, then runs the game
//! from a script file, fully automated, or interactively from stdin.

use clap::Parser;
use log::{error, info, warn};
use parcelbots::{
    BoardLayout, GameConfig, InputEvent, InputHandler, LogSink, ParcelError, ParcelResult,
    Renderer, TextRenderer, TurnController,
};
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Events go to the log and to the message panel under the board.
type Console = (LogSink, TextRenderer<io::Stdout>);

/// Command line arguments for Parcelbots.
#[derive(Parser, Debug)]
#[command(name = "parcelbots")]
#[command(about = "Robots pick up numbered packages and race to deliver them")]
#[command(version)]
struct Args {
    /// Game configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Board layout file (JSON); the built-in 8x8 board is used otherwise
    #[arg(short, long)]
    board: Option<PathBuf>,

    /// Run script commands from this file
    #[arg(long)]
    script: Option<PathBuf>,

    /// Random seed for package numbers and automated placement
    #[arg(short, long)]
    seed: Option<u64>,

    /// Make every player automated
    #[arg(long)]
    auto: bool,

    /// Stop after this many turns (automated runs without a winning score
    /// stop after 1000 turns by default)
    #[arg(long)]
    max_turns: Option<u64>,

    /// Print the final state as JSON instead of drawing the board
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ParcelResult<()> {
    let args = Args::parse();

    // Initialize logging
    initialize_logging(&args.log_level)?;

    info!("Starting Parcelbots v{}", parcelbots::VERSION);

    let mut controller = build_controller(&args)?;

    #[cfg(feature = "dev-tools")]
    let _span = tracing::info_span!("game", seed = controller.config().seed).entered();

    if let Some(path) = &args.script {
        info!("Running script {}", path.display());
        let text = std::fs::read_to_string(path)?;
        controller.run_script(text.lines());
    } else if all_automated(&controller) {
        let limit = controller.config().auto_turn_limit(args.max_turns);
        info!("Running automated game (turn limit: {:?})", limit);
        let steps = controller.run_automated(limit);
        info!("Automated players took {} steps", steps);
    } else {
        run_interactive(&mut controller, &args)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);
    } else {
        show(&mut controller)?;
    }
    Ok(())
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> ParcelResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(log_level))
            .with_target(false)
            .try_init()
            .map_err(|err| ParcelError::InvalidConfig(format!("cannot start logging: {}", err)))?;
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_timestamp(None)
            .try_init()
            .map_err(|err| ParcelError::InvalidConfig(format!("cannot start logging: {}", err)))?;
    }

    Ok(())
}

fn build_controller(args: &Args) -> ParcelResult<TurnController<Console>> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::new(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.auto {
        config = config.with_all_automated();
    }

    let layout = match &args.board {
        Some(path) => BoardLayout::from_json_file(path)?,
        None => BoardLayout::standard(),
    };

    TurnController::with_sink(config, layout, (LogSink, TextRenderer::stdout())).map_err(|err| {
        error!("Failed to set up the game: {}", err);
        err
    })
}

fn all_automated(controller: &TurnController<Console>) -> bool {
    let config = controller.config();
    (0..config.num_players).all(|player| config.controller_for(player).is_automated())
}

fn show(controller: &mut TurnController<Console>) -> ParcelResult<()> {
    let snapshot = controller.snapshot();
    controller.sink_mut().1.render(&snapshot)
}

fn turn_limit_reached(controller: &TurnController<Console>, max_turns: Option<u64>) -> bool {
    max_turns.is_some_and(|limit| controller.state().turn_number >= limit)
}

/// Reads commands from stdin until `quit`, end of input, or the turn limit.
/// Automated players act between human commands.
fn run_interactive(controller: &mut TurnController<Console>, args: &Args) -> ParcelResult<()> {
    let input_handler = InputHandler::new();
    println!("Commands: place c4, select 2, up/down/left/right, switch, reset, quit");

    controller.run_automated(args.max_turns);
    if !args.json {
        show(controller)?;
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        let Some(event) = input_handler.parse_line(&line) else {
            if !line.trim().is_empty() {
                warn!("Unrecognized command: {}", line.trim());
            }
            continue;
        };

        controller.handle_input(event);
        if event == InputEvent::Quit {
            break;
        }

        controller.run_automated(args.max_turns);
        if !args.json {
            show(controller)?;
        }
        if turn_limit_reached(controller, args.max_turns) {
            info!("Turn limit reached");
            break;
        }
        if !controller.is_running() {
            println!("Game over. Type reset to play again or quit to leave.");
        }
    }
    Ok(())
}
